//! # FactStore — Armazém de Fatos com Certeza
//!
//! O [`FactStore`] guarda tudo o que a sessão de consulta sabe: para cada
//! chave `(parâmetro, instância)`, um **mapa valor→CF** com as hipóteses
//! acumuladas sobre o valor daquele parâmetro.
//!
//! ## Invariantes
//!
//! - Para uma chave fixa, há **no máximo um CF por valor distinto**.
//! - [`update`](FactStore::update) é o **único mutador**: nova evidência
//!   sobre um valor já registrado combina-se com a existente via
//!   [`Cf::or`] — nunca sobrescreve, nunca remove.
//! - A ausência de valores para uma chave significa "nenhuma conclusão
//!   aplicável", não um erro.
//!
//! ## Exemplo
//!
//! ```rust
//! use crate::core::{Cf, FactStore, Instance, Value};
//!
//! let inst = Instance { context: "material".into(), seq: 0 };
//! let mut store = FactStore::new();
//!
//! store.update("name", &inst, Value::Text("epoxy".into()), Cf::new(0.6).unwrap());
//! store.update("name", &inst, Value::Text("epoxy".into()), Cf::new(0.4).unwrap());
//!
//! // 0.6 OR 0.4 = 0.76 — evidências independentes reforçam-se
//! let cf = store.cf("name", &inst, &Value::Text("epoxy".into()));
//! assert!((cf.value() - 0.76).abs() < 1e-9);
//! ```

use std::collections::HashMap;

use super::certainty::Cf;
use super::context::Instance;
use super::parameter::Value;

/// Mapa valor→CF de uma chave `(parâmetro, instância)`.
///
/// A ordem de inserção é irrelevante: a combinação por [`Cf::or`] é
/// comutativa.
pub type ValueMap = HashMap<Value, Cf>;

/// Chave de um fato: nome do parâmetro + instância concreta.
pub type FactKey = (String, Instance);

/// Armazém em memória dos fatos de uma sessão de consulta.
///
/// Estado de sessão puro — limpo pelo shell no início de cada `execute` e
/// nunca persistido entre execuções.
#[derive(Debug, Default)]
pub struct FactStore {
    facts: HashMap<FactKey, ValueMap>,
}

impl FactStore {
    /// Cria um armazém vazio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapa valor→CF de `(param, inst)`, criando uma entrada vazia se a
    /// chave ainda não existe (a entrada criada aparece em iterações
    /// posteriores).
    pub fn values(&mut self, param: &str, instance: &Instance) -> &mut ValueMap {
        self.facts
            .entry((param.to_string(), instance.clone()))
            .or_default()
    }

    /// Leitura sem efeito colateral do mapa valor→CF de `(param, inst)`.
    ///
    /// Usada pelo caminho de explicação (`why`), que não deve criar
    /// entradas.
    pub fn values_ref(&self, param: &str, instance: &Instance) -> Option<&ValueMap> {
        self.facts.get(&(param.to_string(), instance.clone()))
    }

    /// CF armazenado para um valor específico, `Cf::UNKNOWN` se ausente.
    /// Não altera a certeza de nenhum outro valor.
    pub fn cf(&self, param: &str, instance: &Instance, value: &Value) -> Cf {
        self.values_ref(param, instance)
            .and_then(|values| values.get(value).copied())
            .unwrap_or(Cf::UNKNOWN)
    }

    /// Combina nova evidência sobre `(param, inst, valor)` com a já
    /// existente via [`Cf::or`] e armazena o resultado.
    ///
    /// Único mutador do armazém: nunca sobrescreve um CF por substituição
    /// e nunca remove um valor.
    pub fn update(&mut self, param: &str, instance: &Instance, value: Value, cf: Cf) {
        let entry = self
            .values(param, instance)
            .entry(value)
            .or_insert(Cf::UNKNOWN);
        let updated = entry.or(cf);
        *entry = updated;
        tracing::debug!(param, instance = %instance, cf = %updated, "fato atualizado");
    }

    /// Cópia do mapa valor→CF de `(param, inst)` — usada para congelar os
    /// resultados de objetivo no relatório final. Vazio se a chave não
    /// existe.
    pub fn snapshot(&self, param: &str, instance: &Instance) -> ValueMap {
        self.values_ref(param, instance).cloned().unwrap_or_default()
    }

    /// Remove todos os fatos. Chamado pelo shell ao iniciar uma sessão.
    pub fn clear(&mut self) {
        self.facts.clear();
    }

    /// Número de chaves `(param, inst)` registradas.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
