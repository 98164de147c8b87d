//! # Base de Conhecimento — Carga de Definições em JSON
//!
//! Módulo responsável por desserializar um **arquivo de conhecimento**
//! (contextos, parâmetros e regras) e registrá-lo em um [`Shell`] antes de
//! qualquer sessão.
//!
//! ## Formato do Arquivo
//!
//! JSON com quatro seções, todas opcionais exceto pelo que o domínio
//! exigir:
//!
//! ```json
//! {
//!   "consult": ["material"],
//!   "contexts": [
//!     { "name": "material",
//!       "initial_data": ["working-stress"],
//!       "goals": ["name"] }
//!   ],
//!   "parameters": [
//!     { "name": "working-stress", "context": "material",
//!       "kind": "number", "ask_first": true }
//!   ],
//!   "rules": [
//!     { "num": 1,
//!       "premises": [
//!         { "param": "working-stress", "context": "material",
//!           "op": ">=", "value": 50 }
//!       ],
//!       "conclusions": [
//!         { "param": "name", "context": "material",
//!           "op": "=", "value": "epoxy+0.7glass-fiber" }
//!       ],
//!       "cf": 0.11 }
//!   ]
//! }
//! ```
//!
//! A validação acontece na desserialização: um `cf` fora de [-1, 1] é
//! recusado na carga, não em tempo de inferência. Carregar definições
//! nunca toca o estado de sessão do shell.

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::core::{Context, Parameter, Rule};
use crate::oracle::Oracle;
use crate::shell::Shell;

/// Arquivo de conhecimento desserializado: definições + lista de
/// contextos a consultar.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct KnowledgeFile {
    /// Contextos a consultar em `execute`, na ordem.
    #[serde(default)]
    pub consult: Vec<String>,

    /// Contextos declarados.
    #[serde(default)]
    pub contexts: Vec<Context>,

    /// Parâmetros declarados.
    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Regras declaradas.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl KnowledgeFile {
    /// Carrega um arquivo de conhecimento do disco.
    ///
    /// # Erros
    ///
    /// Retorna erro se o arquivo não puder ser lido ou se o JSON for
    /// inválido para o esquema (incluindo CFs fora de [-1, 1]).
    pub fn load(path: &Path) -> anyhow::Result<KnowledgeFile> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("falha ao ler {}", path.display()))?;
        let file: KnowledgeFile = serde_json::from_str(&json)
            .with_context(|| format!("falha ao desserializar {}", path.display()))?;
        tracing::info!(
            contexts = file.contexts.len(),
            parameters = file.parameters.len(),
            rules = file.rules.len(),
            "base de conhecimento carregada"
        );
        Ok(file)
    }

    /// Registra todas as definições no shell. Deve acontecer antes de
    /// qualquer `execute`.
    pub fn register<O: Oracle>(self, shell: &mut Shell<O>) {
        for context in self.contexts {
            shell.define_context(context);
        }
        for parameter in self.parameters {
            shell.define_param(parameter);
        }
        for rule in self.rules {
            shell.define_rule(rule);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedOracle;
    use crate::core::{Cf, Instance, Value};

    const MINIMAL: &str = r#"{
        "consult": ["material"],
        "contexts": [
            { "name": "material", "initial_data": ["working-stress"], "goals": ["name"] }
        ],
        "parameters": [
            { "name": "working-stress", "context": "material", "kind": "number", "ask_first": true },
            { "name": "name", "context": "material", "kind": "text" }
        ],
        "rules": [
            { "num": 1,
              "premises": [
                  { "param": "working-stress", "context": "material", "op": ">=", "value": 50 }
              ],
              "conclusions": [
                  { "param": "name", "context": "material", "op": "=", "value": "epoxy" }
              ],
              "cf": 0.7 }
        ]
    }"#;

    #[test]
    fn parses_the_documented_format() {
        let file: KnowledgeFile = serde_json::from_str(MINIMAL).unwrap();
        assert_eq!(file.consult, vec!["material"]);
        assert_eq!(file.contexts.len(), 1);
        assert_eq!(file.parameters.len(), 2);
        assert_eq!(file.rules[0].cf, Cf::new(0.7).unwrap());
    }

    /// Um arquivo carregado dirige uma consulta completa.
    #[test]
    fn registered_file_drives_a_consultation() {
        let file: KnowledgeFile = serde_json::from_str(MINIMAL).unwrap();
        let mut shell = Shell::new(ScriptedOracle::new().with("working-stress", "60"));
        file.register(&mut shell);

        let findings = shell.execute(&["material"]);
        let instance = Instance {
            context: "material".into(),
            seq: 0,
        };
        let names = &findings.results[&instance]["name"];
        assert_eq!(names[&Value::Text("epoxy".into())], Cf::new(0.7).unwrap());
    }

    #[test]
    fn rejects_invalid_rule_cf() {
        let broken = MINIMAL.replace("\"cf\": 0.7", "\"cf\": 2.0");
        assert!(serde_json::from_str::<KnowledgeFile>(&broken).is_err());
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let file: KnowledgeFile = serde_json::from_str("{}").unwrap();
        assert!(file.consult.is_empty());
        assert!(file.contexts.is_empty());
    }
}
