//! # Console — O Oráculo Interativo
//!
//! Implementação de [`Oracle`] sobre um par leitura/escrita de terminal.
//! É a transcrição clássica de consulta dos shells EMYCIN: o operador
//! responde perguntas e pode, a qualquer momento, **interrogar o sistema
//! de volta**.
//!
//! ## Comandos Durante uma Pergunta
//!
//! | Comando | Efeito |
//! |---------|--------|
//! | `?` | mostra o tipo/valores aceitos pelo parâmetro |
//! | `rule` | mostra a regra em avaliação |
//! | `why` | explica por que a pergunta está sendo feita |
//! | `help` | mostra o resumo de comandos |
//! | `unknown` | recusa — o oráculo não sabe |
//! | `<val>` | resposta única e definitiva (CF implícito 1.0) |
//! | `<v1> <cf1>, <v2> <cf2>, ...` | múltiplas respostas com CFs |
//!
//! Comandos de introspecção são efeitos locais: o laço repergunta sem
//! consumir a tentativa de resolução. Uma resposta que não converte para
//! o tipo do parâmetro é reportada e reperguntada — nunca propaga erro.
//!
//! O dublê [`ScriptedOracle`] responde de um roteiro pré-carregado e
//! registra o que foi perguntado; é o oráculo dos testes e de execuções
//! não interativas.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};

use crate::oracle::{parse_reply, Answer, Oracle, Question};

/// Resumo de comandos mostrado pelo comando `help`.
pub const HELP: &str = "Digite uma das opções:
?        - ver os valores aceitos por este parâmetro
rule     - mostrar a regra em avaliação
why      - ver por que esta pergunta está sendo feita
help     - mostrar esta mensagem
unknown  - se a resposta não é conhecida
<val>    - uma resposta única e definitiva
<val1> <cf1>, <val2> <cf2>, ...
         - múltiplas respostas com fatores de certeza.";

/// Oráculo interativo sobre qualquer par `BufRead`/`Write`.
///
/// Genérico sobre os fluxos para que os testes possam dirigi-lo com
/// buffers em memória.
pub struct ConsoleOracle<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl ConsoleOracle<BufReader<io::Stdin>, io::Stdout> {
    /// Console sobre stdin/stdout do processo.
    pub fn stdio() -> Self {
        Self {
            input: BufReader::new(io::stdin()),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> ConsoleOracle<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn say(&mut self, text: &str) {
        let _ = writeln!(self.output, "{}", text);
    }
}

impl<R: BufRead, W: Write> Oracle for ConsoleOracle<R, W> {
    fn ask(&mut self, question: &Question) -> Answer {
        loop {
            let _ = write!(self.output, "{} ", question.prompt());
            let _ = self.output.flush();

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                // Fim da entrada: trata como recusa
                Ok(0) => return Answer::Unknown,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "falha lendo resposta do console");
                    return Answer::Unknown;
                }
            }

            match line.trim() {
                "" => continue,
                "unknown" => return Answer::Unknown,
                "help" => self.say(HELP),
                "why" => self.say(&question.why),
                "rule" => self.say(&question.rule_text),
                "?" => {
                    let hint = format!(
                        "{} deve ser do tipo {}",
                        question.parameter.name,
                        question.parameter.type_string()
                    );
                    self.say(&hint);
                }
                reply => match parse_reply(&question.parameter, reply) {
                    Ok(pairs) => return Answer::Values(pairs),
                    Err(err) => {
                        let complaint =
                            format!("Resposta inválida ({}). Digite ? para ver as opções.", err);
                        self.say(&complaint);
                    }
                },
            }
        }
    }
}

/// Oráculo de roteiro: responde de um mapa parâmetro → resposta textual e
/// registra cada pergunta recebida.
///
/// Parâmetros fora do roteiro (ou roteirizados como `"unknown"`) recebem
/// recusa. As respostas passam pelo mesmo [`parse_reply`] do console.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    replies: HashMap<String, String>,

    /// Nomes de parâmetro perguntados, na ordem.
    pub asked: Vec<String>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roteiriza uma resposta (estilo builder).
    pub fn with(mut self, param: &str, reply: &str) -> Self {
        self.replies.insert(param.to_string(), reply.to_string());
        self
    }
}

impl Oracle for ScriptedOracle {
    fn ask(&mut self, question: &Question) -> Answer {
        self.asked.push(question.parameter.name.clone());
        match self.replies.get(&question.parameter.name) {
            None => Answer::Unknown,
            Some(reply) if reply == "unknown" => Answer::Unknown,
            Some(reply) => match parse_reply(&question.parameter, reply) {
                Ok(pairs) => Answer::Values(pairs),
                Err(err) => {
                    tracing::warn!(
                        param = %question.parameter.name,
                        error = %err,
                        "resposta roteirizada inválida"
                    );
                    Answer::Unknown
                }
            },
        }
    }
}
