//! # Context — Categoria de Sujeito de Raciocínio
//!
//! Um [`Context`] é um **tipo de coisa sobre a qual se raciocina** — por
//! exemplo, `material` em uma consulta de seleção de materiais, ou
//! `paciente` em um domínio clínico.
//!
//! Cada contexto declara duas listas ordenadas de parâmetros:
//!
//! - **initial_data** — resolvidos antes da perseguição dos objetivos
//!   (dados coletados de antemão, uma das marcas do EMYCIN)
//! - **goals** — resolvidos para produzir o relatório final
//!
//! ## Instâncias
//!
//! Uma [`Instance`] é uma ocorrência concreta de um contexto, identificada
//! por `(nome do contexto, número de sequência)`. O contador de sequência
//! pertence ao contexto e **nunca é reiniciado** durante a vida do
//! processo, garantindo identidades globalmente únicas mesmo entre sessões
//! de consulta distintas. A *instância corrente* de cada contexto é estado
//! de sessão e vive no shell, não aqui.
//!
//! ## Exemplo
//!
//! ```rust
//! use crate::core::Context;
//!
//! let mut ctx = Context::new(
//!     "material",
//!     &["working-stress", "specific-gravity"],
//!     &["name"],
//! );
//! let a = ctx.instantiate();
//! let b = ctx.instantiate();
//! assert_eq!(a.to_string(), "material-0");
//! assert_eq!(b.to_string(), "material-1");
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mapa de contexto → instância corrente, mantido por sessão de consulta.
///
/// As regras são definidas sobre nomes de contexto; na avaliação, cada
/// referência é substituída pela instância corrente registrada aqui.
pub type InstanceMap = HashMap<String, Instance>;

/// Categoria nomeada de sujeito de raciocínio, com seus parâmetros
/// iniciais e de objetivo.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Context {
    /// Nome do contexto (ex: "material").
    pub name: String,

    /// Parâmetros a resolver **antes** de perseguir os objetivos,
    /// na ordem declarada.
    #[serde(default)]
    pub initial_data: Vec<String>,

    /// Parâmetros de objetivo, resolvidos para compor o relatório final,
    /// na ordem declarada.
    #[serde(default)]
    pub goals: Vec<String>,

    /// Contador monotônico de instâncias. Não serializado: identidade de
    /// instância é estado de processo, não configuração.
    #[serde(skip)]
    count: u64,
}

impl Context {
    /// Cria um contexto com as listas de parâmetros iniciais e de objetivo.
    pub fn new(name: &str, initial_data: &[&str], goals: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            initial_data: initial_data.iter().map(|p| p.to_string()).collect(),
            goals: goals.iter().map(|p| p.to_string()).collect(),
            count: 0,
        }
    }

    /// Cunha uma nova instância deste contexto.
    ///
    /// O contador avança e nunca retrocede — instâncias de sessões
    /// anteriores permanecem distinguíveis das atuais.
    pub fn instantiate(&mut self) -> Instance {
        let instance = Instance {
            context: self.name.clone(),
            seq: self.count,
        };
        self.count += 1;
        tracing::debug!(instance = %instance, "contexto instanciado");
        instance
    }
}

/// Identidade opaca de uma ocorrência concreta de um contexto.
///
/// Serve de chave (junto com o nome do parâmetro) para o armazém de fatos
/// e para os conjuntos `known`/`asked` da sessão.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instance {
    /// Nome do contexto de origem.
    pub context: String,

    /// Número de sequência dentro do contexto.
    pub seq: u64,
}

/// Formato legível `contexto-n`, por exemplo `material-0`.
impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.context, self.seq)
    }
}
