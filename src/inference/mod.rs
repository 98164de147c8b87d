//! # Módulo Inference — Motor de Aplicação de Regras
//!
//! Este módulo contém o **motor de regras** do Consultor Especialista:
//! a avaliação de aplicabilidade em duas passadas, a aplicação de
//! conclusões com CF efetivo e a disciplina de aplicar todas as regras
//! candidatas.
//!
//! O motor é deliberadamente cego para a origem dos fatos: ele enxerga o
//! mundo através do trait [`Resolver`], que o shell implementa para
//! fornecer o armazém, as instâncias correntes, o gancho de recursão do
//! encadeamento para trás e o sink de introspecção.
//!
//! ## Exemplo
//!
//! ```text
//! find_out("name") → use_rules(regras de name)
//!   → apply(REGRA 1) → applicable → resolve("working-stress") → ...
//! ```
//!
//! Veja [`rules`] para a semântica completa.

/// Sub-módulo com `applicable`/`apply`/`use_rules` e o trait [`Resolver`].
pub mod rules;

/// Re-exports do motor para acesso via `crate::inference::use_rules`.
pub use rules::{applicable, apply, use_rules, Resolver};
