//! # Base de Demonstração — Seleção de Materiais
//!
//! A base de conhecimento de exemplo embutida no binário: um contexto
//! `material` cujo objetivo é determinar o `name` do material adequado a
//! partir de três dados de engenharia perguntados de antemão
//! (`working-stress`, `specific-gravity`, `cost-per-unit-strength`).
//!
//! As quatro regras concluem candidatos distintos com CFs base de 0.11,
//! 0.3, 0.4 e 0.19 — deliberadamente baixos: cada regra é uma sugestão
//! fraca, e o relatório final apresenta a distribuição de candidatos, não
//! um vencedor único.
//!
//! As definições vivem em `data/materials.json`, no mesmo formato que o
//! binário aceita como argumento; o arquivo serve de exemplo do esquema.

use crate::kb::KnowledgeFile;

/// Definições da base de materiais, embutidas em tempo de compilação.
const MATERIALS_JSON: &str = include_str!("../data/materials.json");

/// Desserializa a base de materiais embutida.
///
/// # Erros
///
/// Só falha se o JSON embutido estiver fora do esquema — um erro de
/// construção do binário, não de execução.
pub fn knowledge() -> anyhow::Result<KnowledgeFile> {
    let file = serde_json::from_str(MATERIALS_JSON)?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cf;

    #[test]
    fn embedded_base_is_well_formed() {
        let file = knowledge().unwrap();
        assert_eq!(file.consult, vec!["material"]);
        assert_eq!(file.contexts[0].goals, vec!["name"]);
        assert_eq!(file.rules.len(), 4);
    }

    #[test]
    fn base_cfs_match_the_catalogue() {
        let file = knowledge().unwrap();
        let cfs: Vec<Cf> = file.rules.iter().map(|r| r.cf).collect();
        assert_eq!(
            cfs,
            vec![
                Cf::new(0.11).unwrap(),
                Cf::new(0.3).unwrap(),
                Cf::new(0.4).unwrap(),
                Cf::new(0.19).unwrap(),
            ]
        );
    }

    #[test]
    fn every_rule_concludes_a_name() {
        let file = knowledge().unwrap();
        for rule in &file.rules {
            assert_eq!(rule.conclusions.len(), 1);
            assert_eq!(rule.conclusions[0].param, "name");
        }
    }
}
