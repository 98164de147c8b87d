//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Este módulo agrupa os **tipos fundamentais** do shell de sistema
//! especialista. Tudo no Consultor Especialista gira em torno deles:
//!
//! - [`Cf`] — fator de certeza validado em [-1, 1], com os operadores de
//!   combinação ao estilo MYCIN
//! - [`Context`] — categoria de sujeito de raciocínio (ex: "material"),
//!   com parâmetros iniciais e de objetivo
//! - [`Instance`] — ocorrência concreta de um contexto: (nome, sequência)
//! - [`Parameter`] — atributo tipado de um contexto, com a estratégia de
//!   resolução (`ask_first`)
//! - [`Condition`] / [`BoundCondition`] — comparação de um parâmetro com
//!   um literal, nas formas genérica (contexto) e concreta (instância)
//! - [`Rule`] — implicação ponderada de premissas conjuntivas para
//!   conclusões
//! - [`FactStore`] — armazém (parâmetro, instância) → valor→CF da sessão
//!
//! ## Quem Usa o Quê
//!
//! O motor de inferência ([`crate::inference`]) avalia [`Rule`]s contra o
//! [`FactStore`]; o shell ([`crate::shell`]) é dono do armazém e dos
//! registros e dirige o encadeamento para trás; o oráculo
//! ([`crate::oracle`]) converte respostas externas em [`Value`]s tipados
//! pelos [`Parameter`]s.

/// Sub-módulo com o fator de certeza [`Cf`] e sua álgebra.
pub mod certainty;

/// Sub-módulo com [`Context`], [`Instance`] e o mapa de instâncias
/// correntes.
pub mod context;

/// Sub-módulo com [`Parameter`], [`ParamKind`] e o valor tipado [`Value`].
pub mod parameter;

/// Sub-módulo com [`Condition`], [`BoundCondition`], o operador [`Op`] e a
/// avaliação pura de condições.
pub mod condition;

/// Sub-módulo com a implicação ponderada [`Rule`].
pub mod rule;

/// Sub-módulo com o armazém de fatos [`FactStore`].
pub mod fact_store;

// Re-exports para conveniência — permite usar `crate::core::Cf` diretamente.
pub use certainty::{CertaintyError, Cf};
pub use condition::{eval_condition, BoundCondition, Condition, Op};
pub use context::{Context, Instance, InstanceMap};
pub use fact_store::{FactKey, FactStore, ValueMap};
pub use parameter::{ParamKind, Parameter, ParameterError, Value};
pub use rule::Rule;
