//! # Relatório — Formatação dos Resultados de uma Consulta
//!
//! Converte um [`Findings`] no relatório textual apresentado ao final da
//! sessão: uma seção por instância, com a distribuição valor→CF de cada
//! parâmetro de objetivo ordenada por CF decrescente.
//!
//! Um conjunto de valores vazio é apresentado como "nenhuma conclusão
//! aplicável" — ausência de conclusão não é erro.

use std::fmt::Write as _;

use crate::core::{Cf, Value, ValueMap};
use crate::shell::Findings;

/// Renderiza o relatório final de uma consulta.
pub fn render(findings: &Findings) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Consulta iniciada em {}",
        findings.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    // Ordena instâncias por (contexto, sequência) para saída determinística
    let mut instances: Vec<_> = findings.results.keys().collect();
    instances.sort_by(|a, b| (&a.context, a.seq).cmp(&(&b.context, b.seq)));

    for instance in instances {
        let _ = writeln!(out, "===========");
        let _ = writeln!(out, "Resultados para {}:", instance);

        let by_param = &findings.results[instance];
        let mut params: Vec<_> = by_param.keys().collect();
        params.sort();

        for param in params {
            let values = &by_param[param];
            if values.is_empty() {
                let _ = writeln!(out, "  {}: nenhuma conclusão aplicável", param);
                continue;
            }
            let _ = writeln!(out, "  {}: {}", param, format_distribution(values));
        }
    }
    out
}

/// Distribuição valor→CF em uma linha, ordenada por CF decrescente
/// (desempate pelo valor, para estabilidade).
fn format_distribution(values: &ValueMap) -> String {
    let mut entries: Vec<(&Value, &Cf)> = values.iter().collect();
    entries.sort_by(|(va, a), (vb, b)| {
        b.value()
            .partial_cmp(&a.value())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| va.to_string().cmp(&vb.to_string()))
    });
    let parts: Vec<String> = entries
        .iter()
        .map(|(value, cf)| format!("{} (cf {})", value, cf))
        .collect();
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Instance;
    use chrono::Utc;
    use std::collections::HashMap;

    fn findings_with(values: ValueMap) -> Findings {
        let instance = Instance {
            context: "material".into(),
            seq: 0,
        };
        let mut by_param = HashMap::new();
        by_param.insert("name".to_string(), values);
        let mut results = HashMap::new();
        results.insert(instance, by_param);
        Findings {
            started_at: Utc::now(),
            results,
        }
    }

    #[test]
    fn orders_values_by_descending_cf() {
        let mut values = ValueMap::new();
        values.insert(Value::Text("epoxy".into()), Cf::new(0.11).unwrap());
        values.insert(Value::Text("stainless-steel".into()), Cf::new(0.4).unwrap());
        let text = render(&findings_with(values));
        let steel = text.find("stainless-steel").unwrap();
        let epoxy = text.find("epoxy").unwrap();
        assert!(steel < epoxy);
        assert!(text.contains("Resultados para material-0:"));
        assert!(text.contains("(cf 0.40)"));
    }

    #[test]
    fn empty_distribution_is_not_an_error() {
        let text = render(&findings_with(ValueMap::new()));
        assert!(text.contains("name: nenhuma conclusão aplicável"));
    }
}
