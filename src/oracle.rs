//! # Oráculo e Introspecção — Fronteiras com o Mundo Externo
//!
//! O motor nunca conversa diretamente com um terminal: quando nenhuma
//! regra resolve um parâmetro, ele pergunta a um [`Oracle`] — um operador
//! humano no console, um script de teste, ou qualquer outra fonte de
//! respostas. Este módulo define esse contrato e os tipos que atravessam a
//! fronteira.
//!
//! ## As Peças
//!
//! - [`Question`] — pergunta autocontida: leva o [`Parameter`] (para
//!   validação de tipo), a [`Instance`], o texto da regra em avaliação e a
//!   explicação `why` pré-computada. O oráculo não precisa de nenhuma
//!   referência de volta ao shell.
//! - [`Answer`] — desfecho: valores com CF, ou recusa (`Unknown`).
//!   Pedidos de introspecção (`help`/`why`/`rule`/`?`) são efeitos locais
//!   do oráculo e **não** aparecem aqui — o oráculo repergunta sem
//!   consumir a tentativa de resolução.
//! - [`parse_reply`] — análise das respostas textuais: um valor único com
//!   CF implícito de 1.0, ou pares `val1 cf1, val2 cf2, ...`. Falha de
//!   análise é recuperável (repergunta), nunca fatal.
//! - [`TraceSink`] + [`CurrentRule`] — o sink observacional que recebe a
//!   regra em avaliação (ou os marcadores de fase inicial/objetivo).
//!
//! ## Exemplo de Resposta com Múltiplos Valores
//!
//! ```text
//! Qual é o valor de name para material-0? epoxy 0.6, steel 0.4
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use thiserror::Error;

use crate::core::{CertaintyError, Cf, Instance, Parameter, ParameterError, Rule, Value};

/// Fonte externa de respostas para parâmetros que as regras não resolvem.
///
/// O contrato é bloqueante e sem estado visível para o motor: cada
/// chamada devolve um desfecho final para aquela pergunta. O shell
/// garante que a mesma `(parâmetro, instância)` não é perguntada duas
/// vezes na mesma sessão.
pub trait Oracle {
    /// Pergunta o valor de um parâmetro para uma instância.
    fn ask(&mut self, question: &Question) -> Answer;
}

/// Pergunta autocontida enviada ao oráculo.
#[derive(Clone, Debug)]
pub struct Question {
    /// Declaração do parâmetro perguntado — dá o tipo para validação e o
    /// texto do comando `?`.
    pub parameter: Parameter,

    /// Instância sobre a qual se pergunta.
    pub instance: Instance,

    /// Texto da regra em avaliação, para o comando `rule`.
    pub rule_text: String,

    /// Explicação pré-computada para o comando `why`: o que já se sabe e
    /// qual premissa esta pergunta tenta satisfazer.
    pub why: String,
}

impl Question {
    /// Linha de prompt exibida ao operador.
    pub fn prompt(&self) -> String {
        format!(
            "Qual é o valor de {} para {}?",
            self.parameter.name, self.instance
        )
    }
}

/// Desfecho de uma pergunta ao oráculo.
#[derive(Clone, Debug, PartialEq)]
pub enum Answer {
    /// Um ou mais valores, cada um com seu CF.
    Values(Vec<(Value, Cf)>),

    /// Recusa explícita — o oráculo não sabe.
    Unknown,
}

/// Erro de análise de uma resposta textual do oráculo.
///
/// Sempre recuperável: a camada interativa reporta e repergunta.
#[derive(Debug, Error)]
pub enum ReplyError {
    /// Resposta vazia.
    #[error("resposta vazia")]
    Empty,

    /// Um trecho de lista não está na forma `valor cf`.
    #[error("\"{chunk}\" não está na forma \"valor cf\"")]
    MalformedPair { chunk: String },

    /// O valor não converte para o tipo do parâmetro.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// O CF informado não é um fator de certeza válido.
    #[error(transparent)]
    Certainty(#[from] CertaintyError),
}

/// Par `valor cf` de uma resposta em lista: o CF é o último token.
fn pair_regex() -> &'static Regex {
    static PAIR: OnceLock<Regex> = OnceLock::new();
    PAIR.get_or_init(|| {
        Regex::new(r"^\s*(\S+)\s+(-?(?:\d+\.?\d*|\.\d+))\s*$").expect("regex de par válida")
    })
}

/// Analisa uma resposta textual do oráculo para o tipo do parâmetro.
///
/// Duas formas:
/// - `"valor"` — um único valor definitivo, CF implícito de 1.0
/// - `"val1 cf1, val2 cf2, ..."` — múltiplos valores com CFs explícitos
///
/// Cada valor passa pela conversão de tipo do parâmetro
/// ([`Parameter::parse`]) e cada CF pela validação de [`Cf::new`].
pub fn parse_reply(parameter: &Parameter, reply: &str) -> Result<Vec<(Value, Cf)>, ReplyError> {
    let reply = reply.trim();
    if reply.is_empty() {
        return Err(ReplyError::Empty);
    }

    if reply.contains(',') {
        let mut pairs = Vec::new();
        for chunk in reply.split(',') {
            let captures = pair_regex()
                .captures(chunk)
                .ok_or_else(|| ReplyError::MalformedPair {
                    chunk: chunk.trim().to_string(),
                })?;
            let value = parameter.parse(&captures[1])?;
            let raw_cf: f64 =
                captures[2]
                    .parse()
                    .map_err(|_| ReplyError::MalformedPair {
                        chunk: chunk.trim().to_string(),
                    })?;
            pairs.push((value, Cf::new(raw_cf)?));
        }
        Ok(pairs)
    } else {
        Ok(vec![(parameter.parse(reply)?, Cf::TRUE)])
    }
}

/// O que o raciocinador está avaliando agora — exposto ao sink de
/// introspecção e aos comandos `why`/`rule` do console.
#[derive(Clone, Debug)]
pub enum CurrentRule {
    /// Fase de coleta dos parâmetros iniciais do contexto.
    Initial,

    /// Fase de perseguição dos parâmetros de objetivo.
    Goal,

    /// Uma regra concreta em avaliação.
    Rule(Arc<Rule>),
}

impl fmt::Display for CurrentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrentRule::Initial => write!(f, "fase inicial"),
            CurrentRule::Goal => write!(f, "fase de objetivos"),
            CurrentRule::Rule(rule) => write!(f, "REGRA {}", rule.num),
        }
    }
}

/// Sink observacional de introspecção: recebe a regra (ou marcador de
/// fase) prestes a ser avaliada. Sem valor de retorno — apenas observa.
pub trait TraceSink {
    fn on_rule(&mut self, current: &CurrentRule);
}

/// Sink padrão: encaminha cada anúncio para `tracing::debug!`.
#[derive(Debug, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn on_rule(&mut self, current: &CurrentRule) {
        tracing::debug!(avaliando = %current, "introspecção");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ParamKind;

    fn number_param() -> Parameter {
        Parameter::new("working-stress", "material", ParamKind::Number)
    }

    fn text_param() -> Parameter {
        Parameter::new("name", "material", ParamKind::Text)
    }

    // ─── parse_reply ───────────────────────────────────────────

    #[test]
    fn single_value_gets_implicit_true() {
        let pairs = parse_reply(&number_param(), "50").unwrap();
        assert_eq!(pairs, vec![(Value::Number(50.0), Cf::TRUE)]);
    }

    #[test]
    fn pair_list_with_explicit_cfs() {
        let pairs = parse_reply(&text_param(), "epoxy 0.6, steel 0.4").unwrap();
        assert_eq!(
            pairs,
            vec![
                (Value::Text("epoxy".into()), Cf::new(0.6).unwrap()),
                (Value::Text("steel".into()), Cf::new(0.4).unwrap()),
            ]
        );
    }

    #[test]
    fn negative_cf_is_accepted() {
        let pairs = parse_reply(&text_param(), "epoxy -0.3, steel 1").unwrap();
        assert_eq!(pairs[0].1, Cf::new(-0.3).unwrap());
        assert_eq!(pairs[1].1, Cf::TRUE);
    }

    #[test]
    fn rejects_empty_reply() {
        assert!(matches!(
            parse_reply(&text_param(), "   "),
            Err(ReplyError::Empty)
        ));
    }

    #[test]
    fn rejects_malformed_pair() {
        assert!(matches!(
            parse_reply(&text_param(), "epoxy 0.6, steel"),
            Err(ReplyError::MalformedPair { .. })
        ));
    }

    /// O tipo do parâmetro governa a conversão mesmo em listas.
    #[test]
    fn rejects_type_mismatch() {
        assert!(matches!(
            parse_reply(&number_param(), "alto"),
            Err(ReplyError::Parameter(_))
        ));
        assert!(matches!(
            parse_reply(&number_param(), "alto 0.5, 50 0.5"),
            Err(ReplyError::Parameter(_))
        ));
    }

    /// CF fora de [-1, 1] é recusado na análise, não em tempo de
    /// inferência.
    #[test]
    fn rejects_out_of_range_cf() {
        assert!(matches!(
            parse_reply(&text_param(), "epoxy 1.5, steel 0.2"),
            Err(ReplyError::Certainty(_))
        ));
    }

    #[test]
    fn prompt_mentions_param_and_instance() {
        let question = Question {
            parameter: text_param(),
            instance: Instance {
                context: "material".into(),
                seq: 0,
            },
            rule_text: String::new(),
            why: String::new(),
        };
        assert_eq!(
            question.prompt(),
            "Qual é o valor de name para material-0?"
        );
    }
}
