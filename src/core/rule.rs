//! # Rule — Implicação Ponderada por Certeza
//!
//! Uma [`Rule`] é uma implicação `SE premissas ENTÃO conclusões` com um
//! **CF base** que pondera a força da implicação.
//!
//! - As **premissas** são conjuntivas: todas precisam valer para a regra
//!   disparar, e o CF conjuntivo é o `min` dos CFs individuais.
//! - As **conclusões** são atualizadas com
//!   `cf_efetivo = cf_base × cf_conjuntivo` quando a regra dispara.
//!
//! Regras são imutáveis após definidas e **genéricas sobre contextos**:
//! premissas e conclusões são [`Condition`]s não ligadas, então uma única
//! definição vale para toda instância de seus contextos. A avaliação em si
//! vive no motor de inferência ([`crate::inference::rules`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::certainty::Cf;
use super::condition::{BoundCondition, Condition};
use super::context::InstanceMap;

/// Implicação imutável de premissas conjuntivas para conclusões, ponderada
/// por um CF base validado.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rule {
    /// Identificador numérico da regra, usado em transcrições.
    pub num: u32,

    /// Premissas conjuntivas, na ordem de avaliação declarada.
    pub premises: Vec<Condition>,

    /// Conclusões derivadas quando a regra dispara.
    pub conclusions: Vec<Condition>,

    /// CF base da implicação.
    pub cf: Cf,
}

impl Rule {
    pub fn new(num: u32, premises: Vec<Condition>, conclusions: Vec<Condition>, cf: Cf) -> Self {
        Self {
            num,
            premises,
            conclusions,
            cf,
        }
    }

    /// Liga todas as premissas às instâncias correntes da sessão.
    ///
    /// `None` se alguma premissa referencia um contexto sem instância
    /// corrente — a regra é inaplicável nesta sessão.
    pub fn bound_premises(&self, instances: &InstanceMap) -> Option<Vec<BoundCondition>> {
        self.premises.iter().map(|p| p.bind(instances)).collect()
    }

    /// Liga todas as conclusões às instâncias correntes da sessão.
    pub fn bound_conclusions(&self, instances: &InstanceMap) -> Option<Vec<BoundCondition>> {
        self.conclusions.iter().map(|c| c.bind(instances)).collect()
    }
}

/// Bloco legível usado pelos comandos de introspecção `rule` e `why`:
///
/// ```text
/// REGRA 1
/// SE
///     working-stress material >= 50
///     specific-gravity material <= 2
/// ENTÃO 0.11
///     name material = epoxy+0.7glass-fiber
/// ```
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "REGRA {}", self.num)?;
        writeln!(f, "SE")?;
        for premise in &self.premises {
            writeln!(f, "    {}", premise)?;
        }
        writeln!(f, "ENTÃO {}", self.cf)?;
        for (i, conclusion) in self.conclusions.iter().enumerate() {
            if i + 1 == self.conclusions.len() {
                write!(f, "    {}", conclusion)?;
            } else {
                writeln!(f, "    {}", conclusion)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::condition::Op;
    use crate::core::context::Instance;
    use crate::core::parameter::Value;

    fn sample_rule() -> Rule {
        Rule::new(
            1,
            vec![Condition::new(
                "working-stress",
                "material",
                Op::GreaterOrEqual,
                Value::Number(50.0),
            )],
            vec![Condition::new(
                "name",
                "material",
                Op::Equal,
                Value::Text("epoxy".into()),
            )],
            Cf::new(0.11).unwrap(),
        )
    }

    #[test]
    fn binding_follows_current_instances() {
        let rule = sample_rule();
        let mut instances = InstanceMap::new();
        instances.insert(
            "material".into(),
            Instance {
                context: "material".into(),
                seq: 2,
            },
        );
        let premises = rule.bound_premises(&instances).unwrap();
        assert_eq!(premises[0].instance.seq, 2);
        let conclusions = rule.bound_conclusions(&instances).unwrap();
        assert_eq!(conclusions[0].instance.seq, 2);
    }

    #[test]
    fn binding_fails_without_instance() {
        let rule = sample_rule();
        assert!(rule.bound_premises(&InstanceMap::new()).is_none());
    }

    #[test]
    fn display_block() {
        let text = sample_rule().to_string();
        assert!(text.starts_with("REGRA 1\nSE\n"));
        assert!(text.contains("    working-stress material >= 50"));
        assert!(text.contains("ENTÃO 0.11"));
        assert!(text.ends_with("    name material = epoxy"));
    }

    /// Um arquivo de conhecimento com CF base fora de [-1, 1] é recusado
    /// na desserialização da regra.
    #[test]
    fn deserialization_rejects_invalid_cf() {
        let json = r#"{
            "num": 9,
            "premises": [],
            "conclusions": [],
            "cf": 1.4
        }"#;
        assert!(serde_json::from_str::<Rule>(json).is_err());
    }
}
