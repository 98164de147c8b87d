//! # Condition — Comparação de um Parâmetro com um Literal
//!
//! Uma condição compara o valor de um parâmetro (para uma instância de
//! contexto) com um literal, usando um operador de um conjunto fechado.
//! Condições formam tanto as **premissas** quanto as **conclusões** das
//! regras.
//!
//! ## Duas Formas, Uma Ligação Explícita
//!
//! | Forma | Segundo campo | Onde aparece |
//! |-------|---------------|--------------|
//! | [`Condition`] | nome de contexto | definição de regras (genérica) |
//! | [`BoundCondition`] | [`Instance`] | avaliação (concreta) |
//!
//! Uma regra é definida sobre *contextos* para valer para toda instância;
//! na avaliação, [`Condition::bind`] substitui cada referência de contexto
//! pela instância corrente da sessão. A distinção é um par de tipos
//! explícito — nenhuma inspeção de tipo em tempo de execução.
//!
//! ## Operadores ([`Op`])
//!
//! Enumeração fechada (`=`, `>=`, `<=`) mapeada para a lógica de comparação
//! na avaliação. Números comparam numericamente, textos
//! lexicograficamente, tipos mistos nunca casam.
//!
//! ## Avaliação
//!
//! [`eval_condition`] calcula o CF de que a condição vale: dobra com
//! [`Cf::or`] o CF de **cada valor armazenado que satisfaz** o operador.
//! Sem valor que satisfaça, o resultado é [`Cf::UNKNOWN`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::certainty::Cf;
use super::context::{Instance, InstanceMap};
use super::fact_store::ValueMap;
use super::parameter::Value;

/// Operador de comparação de uma condição — conjunto fechado.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Igualdade exata.
    #[serde(rename = "=")]
    Equal,

    /// Maior ou igual.
    #[serde(rename = ">=")]
    GreaterOrEqual,

    /// Menor ou igual.
    #[serde(rename = "<=")]
    LessOrEqual,
}

impl Op {
    /// Aplica o operador: `actual op expected`.
    ///
    /// Números comparam numericamente; textos, lexicograficamente; um
    /// número nunca casa com um texto (nem o contrário).
    pub fn compare(&self, actual: &Value, expected: &Value) -> bool {
        match (actual, expected) {
            (Value::Number(a), Value::Number(b)) => match self {
                Op::Equal => a == b,
                Op::GreaterOrEqual => a >= b,
                Op::LessOrEqual => a <= b,
            },
            (Value::Text(a), Value::Text(b)) => match self {
                Op::Equal => a == b,
                Op::GreaterOrEqual => a >= b,
                Op::LessOrEqual => a <= b,
            },
            _ => false,
        }
    }

    /// Símbolo legível do operador, para transcrições e relatórios.
    pub fn label(&self) -> &'static str {
        match self {
            Op::Equal => "=",
            Op::GreaterOrEqual => ">=",
            Op::LessOrEqual => "<=",
        }
    }
}

/// Condição **não ligada** — referencia um contexto pelo nome.
///
/// É a forma usada nas definições de regra, genérica sobre instâncias.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Nome do parâmetro comparado.
    pub param: String,

    /// Nome do contexto cuja instância corrente será substituída na
    /// ligação.
    pub context: String,

    /// Operador de comparação.
    pub op: Op,

    /// Literal contra o qual o valor do parâmetro é comparado.
    pub value: Value,
}

impl Condition {
    pub fn new(param: &str, context: &str, op: Op, value: Value) -> Self {
        Self {
            param: param.to_string(),
            context: context.to_string(),
            op,
            value,
        }
    }

    /// Liga a condição à instância corrente do seu contexto.
    ///
    /// Retorna `None` quando a sessão não tem instância corrente para o
    /// contexto referenciado — a regra que contém a condição é então
    /// inaplicável.
    pub fn bind(&self, instances: &InstanceMap) -> Option<BoundCondition> {
        let instance = instances.get(&self.context)?.clone();
        Some(BoundCondition {
            param: self.param.clone(),
            instance,
            op: self.op,
            value: self.value.clone(),
        })
    }
}

/// Formato `param contexto op literal`, ex: `working-stress material >= 50`.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.param,
            self.context,
            self.op.label(),
            self.value
        )
    }
}

/// Condição **ligada** — referencia uma instância concreta.
///
/// Produzida por [`Condition::bind`] durante a avaliação.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundCondition {
    /// Nome do parâmetro comparado.
    pub param: String,

    /// Instância concreta sob avaliação.
    pub instance: Instance,

    /// Operador de comparação.
    pub op: Op,

    /// Literal contra o qual o valor do parâmetro é comparado.
    pub value: Value,
}

/// Mesmo formato legível da forma não ligada: o nome do contexto da
/// instância ocupa o segundo campo.
impl fmt::Display for BoundCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.param,
            self.instance.context,
            self.op.label(),
            self.value
        )
    }
}

/// Calcula o CF de que uma condição ligada vale, dado o mapa valor→CF de
/// `(param, instância)`.
///
/// Dobra com [`Cf::or`] o CF de cada valor armazenado que satisfaz
/// `op(valor, literal)`. Sem valor que satisfaça: [`Cf::UNKNOWN`].
pub fn eval_condition(condition: &BoundCondition, values: &ValueMap) -> Cf {
    let mut total = Cf::UNKNOWN;
    for (value, cf) in values {
        if condition.op.compare(value, &condition.value) {
            total = total.or(*cf);
        }
    }
    total
}
