//! # Aplicação de Regras com Fatores de Certeza
//!
//! Implementação da semântica de **aplicabilidade** e **aplicação** de
//! regras sobre o armazém de fatos — o núcleo do encadeamento para trás.
//!
//! ## O Contrato em Três Funções
//!
//! - [`applicable`] — o CF conjuntivo das premissas de uma regra, em duas
//!   passadas (ver abaixo)
//! - [`apply`] — anuncia a regra ao sink de introspecção, calcula
//!   `cf_efetivo = cf_base × applicable(...)` e, se afirmativamente
//!   verdadeiro, atualiza cada conclusão no armazém
//! - [`use_rules`] — aplica **todas** as regras candidatas, nunca parando
//!   na primeira que dispara
//!
//! ## As Duas Passadas de `applicable`
//!
//! **Passada 1 — rejeição rápida.** Cada premissa é avaliada apenas contra
//! os fatos já conhecidos, sem acionar o [`Resolver`]. Se alguma premissa
//! é afirmativamente falsa, a regra é rejeitada com `Cf::FALSE` sem fazer
//! nenhuma pergunta — o oráculo nunca é consultado por uma regra que não
//! pode disparar.
//!
//! **Passada 2 — avaliação completa.** Cada premissa é reavaliada, agora
//! permitindo que o resolver derive recursivamente os fatos que faltam
//! (é aqui que o `find_out` do shell reentra). Os CFs das premissas são
//! dobrados com [`Cf::and`]; no momento em que a conjunção acumulada deixa
//! de ser afirmativamente verdadeira, a avaliação aborta com `Cf::FALSE`.
//!
//! A estrutura em duas passadas é uma otimização de interação, não uma
//! diferença semântica: sobre fatos já conhecidos, a passada 1 chega ao
//! mesmo veredito que a passada 2 chegaria.
//!
//! ## Por que `use_rules` aplica todas as regras
//!
//! Uma regra posterior pode **reduzir** a certeza de uma conclusão que uma
//! regra anterior elevou — a combinação por `Cf::or` só é correta se toda
//! regra contribuinte de fato rodar. Parar na primeira que dispara levaria
//! a conclusões erradas. (É o ponto em que este motor difere de um Prolog:
//! não se deduz apenas verdades novas.)

use std::sync::Arc;

use crate::core::{eval_condition, BoundCondition, Cf, FactStore, InstanceMap, Rule};

/// Estratégia de resolução de fatos — a interface que o shell implementa
/// para que a avaliação de premissas possa encadear para trás.
///
/// Substitui o callback `find_out` do desenho clássico por um objeto de
/// estratégia explícito: a avaliação só deriva fatos mais fundos quando o
/// chamador fornece um resolver, e o mesmo objeto dá acesso ao armazém,
/// às instâncias correntes e ao sink de introspecção.
pub trait Resolver {
    /// Gancho de recursão — tenta derivar mais valores para
    /// `(param, instância)` por regras ou pelo oráculo. Retorna `true` se
    /// a resolução teve sucesso.
    fn resolve(&mut self, param: &str, instance: &crate::core::Instance) -> bool;

    /// Armazém de fatos da sessão corrente.
    fn facts(&mut self) -> &mut FactStore;

    /// Instâncias correntes por contexto.
    fn instances(&self) -> &InstanceMap;

    /// Notifica qual regra está prestes a ser avaliada (introspecção).
    fn trace(&mut self, rule: &Arc<Rule>);
}

/// CF conjuntivo das premissas de `rule` — a aplicabilidade da regra.
///
/// Avaliação em duas passadas (ver documentação do módulo). Uma premissa
/// cujo contexto não tem instância corrente torna a regra inaplicável.
pub fn applicable<R: Resolver>(rule: &Rule, ctx: &mut R) -> Cf {
    // Passada 1: rejeição rápida pelos fatos já conhecidos, sem resolver
    for premise in &rule.premises {
        let Some(bound) = premise.bind(ctx.instances()) else {
            tracing::warn!(
                rule = rule.num,
                context = %premise.context,
                "premissa referencia contexto sem instância corrente"
            );
            return Cf::FALSE;
        };
        let cf = eval_known(ctx, &bound);
        if cf.is_false() {
            tracing::debug!(rule = rule.num, premise = %bound, "rejeição rápida");
            return Cf::FALSE;
        }
    }

    // Passada 2: avaliação completa, com derivação recursiva habilitada
    let mut total = Cf::TRUE;
    for premise in &rule.premises {
        let Some(bound) = premise.bind(ctx.instances()) else {
            return Cf::FALSE;
        };
        ctx.resolve(&bound.param, &bound.instance);
        let cf = eval_known(ctx, &bound);
        total = total.and(cf);
        if !total.is_true() {
            return Cf::FALSE;
        }
    }
    total
}

/// Avalia uma premissa ligada contra os fatos correntes do resolver.
fn eval_known<R: Resolver>(ctx: &mut R, bound: &BoundCondition) -> Cf {
    let values = ctx.facts().values(&bound.param, &bound.instance);
    eval_condition(bound, values)
}

/// Tenta aplicar `rule`: anuncia a regra ao sink **antes** da avaliação,
/// calcula o CF efetivo e, se afirmativamente verdadeiro, atualiza cada
/// conclusão no armazém. Retorna `true` se a regra disparou.
pub fn apply<R: Resolver>(rule: &Arc<Rule>, ctx: &mut R) -> bool {
    // Anunciada antes da avaliação: é esta regra que o comando `why`
    // mostra enquanto as premissas geram perguntas
    ctx.trace(rule);

    let cf = rule.cf * applicable(rule, ctx);
    if !cf.is_true() {
        tracing::debug!(rule = rule.num, cf = %cf, "regra não disparou");
        return false;
    }

    let Some(conclusions) = rule.bound_conclusions(ctx.instances()) else {
        tracing::warn!(
            rule = rule.num,
            "conclusão referencia contexto sem instância corrente"
        );
        return false;
    };
    for conclusion in conclusions {
        let BoundCondition {
            param,
            instance,
            value,
            ..
        } = conclusion;
        ctx.facts().update(&param, &instance, value, cf);
    }
    tracing::debug!(rule = rule.num, cf = %cf, "regra disparou");
    true
}

/// Aplica **todas** as regras candidatas; `true` se pelo menos uma
/// disparou.
pub fn use_rules<R: Resolver>(rules: &[Arc<Rule>], ctx: &mut R) -> bool {
    let mut fired = false;
    for rule in rules {
        if apply(rule, ctx) {
            fired = true;
        }
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Condition, Instance, Op, Value};

    /// Resolver de teste: fatos pré-carregados, registro de quais
    /// (param, instância) foram pedidos ao gancho de recursão e de quais
    /// regras foram anunciadas.
    struct TestResolver {
        facts: FactStore,
        instances: InstanceMap,
        resolved: Vec<String>,
        traced: Vec<u32>,
    }

    impl TestResolver {
        fn new() -> Self {
            let mut instances = InstanceMap::new();
            instances.insert("material".into(), material());
            Self {
                facts: FactStore::new(),
                instances,
                resolved: Vec::new(),
                traced: Vec::new(),
            }
        }

        fn with_fact(mut self, param: &str, value: Value, cf: f64) -> Self {
            self.facts
                .update(param, &material(), value, Cf::new(cf).unwrap());
            self
        }
    }

    impl Resolver for TestResolver {
        fn resolve(&mut self, param: &str, _instance: &Instance) -> bool {
            self.resolved.push(param.to_string());
            false
        }

        fn facts(&mut self) -> &mut FactStore {
            &mut self.facts
        }

        fn instances(&self) -> &InstanceMap {
            &self.instances
        }

        fn trace(&mut self, rule: &Arc<Rule>) {
            self.traced.push(rule.num);
        }
    }

    fn material() -> Instance {
        Instance {
            context: "material".into(),
            seq: 0,
        }
    }

    fn premise(param: &str, op: Op, value: Value) -> Condition {
        Condition::new(param, "material", op, value)
    }

    fn name_rule(num: u32, name: &str, cf: f64, premises: Vec<Condition>) -> Arc<Rule> {
        Arc::new(Rule::new(
            num,
            premises,
            vec![Condition::new(
                "name",
                "material",
                Op::Equal,
                Value::Text(name.into()),
            )],
            Cf::new(cf).unwrap(),
        ))
    }

    // ─── applicable ────────────────────────────────────────────

    #[test]
    fn applicable_is_conjunctive_min() {
        let rule = name_rule(
            1,
            "epoxy",
            0.5,
            vec![
                premise("working-stress", Op::GreaterOrEqual, Value::Number(50.0)),
                premise("specific-gravity", Op::LessOrEqual, Value::Number(2.0)),
            ],
        );
        let mut ctx = TestResolver::new()
            .with_fact("working-stress", Value::Number(60.0), 0.8)
            .with_fact("specific-gravity", Value::Number(1.5), 0.6);
        let cf = applicable(&rule, &mut ctx);
        assert_eq!(cf, Cf::new(0.6).unwrap());
    }

    #[test]
    fn applicable_aborts_on_unknown_premise() {
        let rule = name_rule(
            1,
            "epoxy",
            0.5,
            vec![premise(
                "specific-gravity",
                Op::LessOrEqual,
                Value::Number(2.0),
            )],
        );
        let mut ctx = TestResolver::new();
        assert_eq!(applicable(&rule, &mut ctx), Cf::FALSE);
        // O gancho de recursão chegou a ser consultado (passada 2)
        assert_eq!(ctx.resolved, vec!["specific-gravity"]);
    }

    /// Propriedade de rejeição rápida: uma premissa afirmativamente falsa
    /// contra os fatos conhecidos impede qualquer consulta ao resolver
    /// pelas demais premissas.
    #[test]
    fn fast_rejection_never_resolves() {
        let rule = name_rule(
            1,
            "epoxy",
            0.5,
            vec![
                premise("working-stress", Op::GreaterOrEqual, Value::Number(50.0)),
                premise("specific-gravity", Op::LessOrEqual, Value::Number(2.0)),
            ],
        );
        // working-stress afirmativamente falso: CF -1.0 no único valor
        let mut ctx =
            TestResolver::new().with_fact("working-stress", Value::Number(60.0), -1.0);
        assert_eq!(applicable(&rule, &mut ctx), Cf::FALSE);
        assert!(ctx.resolved.is_empty());
    }

    #[test]
    fn missing_instance_makes_rule_inapplicable() {
        let rule = name_rule(
            1,
            "epoxy",
            0.5,
            vec![Condition::new(
                "temperatura",
                "ambiente", // contexto jamais instanciado
                Op::GreaterOrEqual,
                Value::Number(20.0),
            )],
        );
        let mut ctx = TestResolver::new();
        assert_eq!(applicable(&rule, &mut ctx), Cf::FALSE);
    }

    // ─── apply ─────────────────────────────────────────────────

    #[test]
    fn apply_scales_base_cf_and_updates_conclusions() {
        let rule = name_rule(
            1,
            "epoxy",
            0.11,
            vec![premise("working-stress", Op::GreaterOrEqual, Value::Number(50.0))],
        );
        let mut ctx = TestResolver::new().with_fact("working-stress", Value::Number(50.0), 1.0);
        assert!(apply(&rule, &mut ctx));
        let cf = ctx
            .facts
            .cf("name", &material(), &Value::Text("epoxy".into()));
        assert_eq!(cf, Cf::new(0.11).unwrap());
    }

    /// A regra é anunciada ao sink mesmo quando não dispara.
    #[test]
    fn apply_traces_before_evaluating() {
        let rule = name_rule(
            7,
            "epoxy",
            0.5,
            vec![premise("working-stress", Op::GreaterOrEqual, Value::Number(50.0))],
        );
        let mut ctx = TestResolver::new();
        assert!(!apply(&rule, &mut ctx));
        assert_eq!(ctx.traced, vec![7]);
    }

    /// Um CF efetivo abaixo do corte não contribui nada.
    #[test]
    fn apply_requires_affirmative_effective_cf() {
        // Base 0.2 × premissa 0.4 = 0.08 ≤ corte 0.1
        let rule = name_rule(
            1,
            "epoxy",
            0.2,
            vec![premise("working-stress", Op::GreaterOrEqual, Value::Number(50.0))],
        );
        let mut ctx = TestResolver::new().with_fact("working-stress", Value::Number(55.0), 0.4);
        assert!(!apply(&rule, &mut ctx));
        assert_eq!(
            ctx.facts
                .cf("name", &material(), &Value::Text("epoxy".into())),
            Cf::UNKNOWN
        );
    }

    // ─── use_rules ─────────────────────────────────────────────

    /// Propriedade todas-as-regras-disparam: duas regras concluindo o
    /// mesmo valor combinam seus CFs efetivos por OR, em qualquer ordem.
    #[test]
    fn all_rules_fire_and_or_combine() {
        let a = name_rule(
            1,
            "epoxy",
            0.6,
            vec![premise("working-stress", Op::GreaterOrEqual, Value::Number(50.0))],
        );
        let b = name_rule(
            2,
            "epoxy",
            0.4,
            vec![premise("working-stress", Op::GreaterOrEqual, Value::Number(40.0))],
        );
        let expected = Cf::new(0.6).unwrap().or(Cf::new(0.4).unwrap());

        for rules in [vec![a.clone(), b.clone()], vec![b.clone(), a.clone()]] {
            let mut ctx =
                TestResolver::new().with_fact("working-stress", Value::Number(60.0), 1.0);
            assert!(use_rules(&rules, &mut ctx));
            let cf = ctx
                .facts
                .cf("name", &material(), &Value::Text("epoxy".into()));
            assert!((cf.value() - expected.value()).abs() < 1e-9);
        }
    }

    #[test]
    fn use_rules_reports_when_nothing_fires() {
        let rule = name_rule(
            1,
            "epoxy",
            0.5,
            vec![premise("working-stress", Op::GreaterOrEqual, Value::Number(50.0))],
        );
        let mut ctx = TestResolver::new();
        assert!(!use_rules(&[rule], &mut ctx));
    }
}
