//! # Parameter — Atributo Tipado de um Contexto
//!
//! Um [`Parameter`] declara um atributo nomeado de um contexto — por
//! exemplo, `working-stress` de um `material` — junto com o **tipo** dos
//! valores aceitos e a estratégia de resolução preferida.
//!
//! ## Tipos de Valor ([`ParamKind`])
//!
//! | Tipo | Aceita | Exemplo |
//! |------|--------|---------|
//! | `Number` | números reais | `50`, `2.75` |
//! | `Text` | qualquer token textual | `epoxy` |
//! | `Enum` | um conjunto fechado de strings | `(baixo, médio, alto)` |
//!
//! O tipo governa a conversão das respostas brutas do oráculo em valores
//! ([`Parameter::parse`]) — uma resposta que não converte é recusada e
//! reperguntada, nunca propagada como erro fatal.
//!
//! ## `ask_first`
//!
//! Com `ask_first` ligado, o motor consulta o oráculo **antes** de tentar
//! derivação por regras; caso contrário as regras vêm primeiro e o oráculo
//! é o recurso final.
//!
//! ## Criação Permissiva por Referência
//!
//! Uma regra ou contexto pode mencionar um parâmetro nunca declarado. Em
//! vez de falhar, o shell registra automaticamente um parâmetro padrão
//! ([`Parameter::default_for`]: tipo `Text`, sem `ask_first`). O
//! comportamento é deliberado e visível no log.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Erro de conversão de uma resposta bruta para o tipo declarado.
///
/// Recuperável por definição: a camada que pergunta repete a pergunta.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParameterError {
    /// O token não é um número finito.
    #[error("\"{raw}\" não é um número válido para o parâmetro {param}")]
    InvalidNumber { param: String, raw: String },

    /// O token não pertence ao conjunto enumerado de valores legais.
    #[error("\"{raw}\" deve ser um dentre ({options}) para o parâmetro {param}")]
    NotInEnum {
        param: String,
        raw: String,
        options: String,
    },
}

/// Tipo dos valores aceitos por um parâmetro.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Números reais finitos.
    Number,

    /// Texto livre (um token).
    Text,

    /// Conjunto fechado de valores textuais legais.
    Enum(Vec<String>),
}

/// Declaração de um atributo tipado de um contexto.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Parameter {
    /// Nome do parâmetro (ex: "working-stress").
    pub name: String,

    /// Contexto ao qual o parâmetro pertence. Documentacional — a chave de
    /// um fato é sempre (parâmetro, instância).
    #[serde(default)]
    pub context: Option<String>,

    /// Tipo dos valores aceitos.
    pub kind: ParamKind,

    /// Perguntar ao oráculo antes de tentar regras?
    #[serde(default)]
    pub ask_first: bool,
}

impl Parameter {
    /// Cria um parâmetro associado a um contexto, sem `ask_first`.
    pub fn new(name: &str, context: &str, kind: ParamKind) -> Self {
        Self {
            name: name.to_string(),
            context: Some(context.to_string()),
            kind,
            ask_first: false,
        }
    }

    /// Liga o flag `ask_first` (estilo builder).
    pub fn ask_first(mut self) -> Self {
        self.ask_first = true;
        self
    }

    /// Parâmetro padrão registrado automaticamente quando uma regra ou
    /// contexto referencia um nome nunca declarado: tipo `Text`, sem
    /// contexto, sem `ask_first`.
    pub fn default_for(name: &str) -> Self {
        Self {
            name: name.to_string(),
            context: None,
            kind: ParamKind::Text,
            ask_first: false,
        }
    }

    /// Converte um token bruto (resposta do oráculo ou literal de arquivo)
    /// no tipo declarado.
    ///
    /// # Erros
    ///
    /// - [`ParameterError::InvalidNumber`] para `Number` com token não
    ///   numérico (NaN e infinitos também são recusados)
    /// - [`ParameterError::NotInEnum`] para `Enum` com token fora do
    ///   conjunto legal
    pub fn parse(&self, raw: &str) -> Result<Value, ParameterError> {
        let raw = raw.trim();
        match &self.kind {
            ParamKind::Number => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Value::Number(n)),
                _ => Err(ParameterError::InvalidNumber {
                    param: self.name.clone(),
                    raw: raw.to_string(),
                }),
            },
            ParamKind::Text => Ok(Value::Text(raw.to_string())),
            ParamKind::Enum(options) => {
                if options.iter().any(|o| o == raw) {
                    Ok(Value::Text(raw.to_string()))
                } else {
                    Err(ParameterError::NotInEnum {
                        param: self.name.clone(),
                        raw: raw.to_string(),
                        options: options.join(", "),
                    })
                }
            }
        }
    }

    /// Descrição legível dos valores aceitos, usada pelo comando `?` do
    /// console.
    pub fn type_string(&self) -> String {
        match &self.kind {
            ParamKind::Number => "número".to_string(),
            ParamKind::Text => "texto".to_string(),
            ParamKind::Enum(options) => format!("({})", options.join(", ")),
        }
    }
}

/// Valor de um parâmetro em tempo de execução.
///
/// ## Invariante
///
/// `Number` nunca carrega NaN nem infinito — [`Parameter::parse`] recusa
/// ambos e JSON não os representa. Isso torna lícitas as implementações de
/// `Eq`/`Hash` abaixo, que usam a representação em bits do `f64` para que
/// valores numéricos possam servir de chave no mapa valor→CF de um fato.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Valor numérico (sempre finito).
    Number(f64),

    /// Valor textual.
    Text(String),
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            // Representação em bits: consistente com == para números finitos
            Value::Number(n) => {
                0u8.hash(state);
                n.to_bits().hash(state);
            }
            Value::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}
