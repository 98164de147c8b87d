//! # Shell — O Raciocinador por Encadeamento para Trás
//!
//! O [`Shell`] é o **coração do sistema** — dono dos registros de
//! conhecimento (contextos, parâmetros, índice de regras), do estado de
//! sessão e do laço de controle que dirige uma consulta completa.
//!
//! ## O Ciclo de Consulta
//!
//! ```text
//! execute(["material"])
//!   │
//!   ├── 1. clear() — zera o estado de sessão
//!   │
//!   ├── 2. instantiate("material") → material-0
//!   │
//!   ├── 3. FASE INICIAL
//!   │   └── find_out(param) para cada parâmetro de initial_data
//!   │
//!   ├── 4. FASE DE OBJETIVOS
//!   │   └── find_out(param) para cada parâmetro de goals
//!   │
//!   └── 5. Congela valor→CF de cada objetivo em Findings
//! ```
//!
//! ## `find_out` — O Ponto Único de Recursão
//!
//! Para resolver `(parâmetro, instância)`, o `find_out`:
//!
//! 1. Retorna imediatamente se o par já está em `known` (memoização)
//! 2. Escolhe a estratégia pelo flag `ask_first` do parâmetro:
//!    oráculo-depois-regras, ou regras-depois-oráculo
//! 3. A derivação por regras passa **o próprio shell** como
//!    [`Resolver`] ao motor — é assim que a avaliação de uma premissa
//!    reentra em `find_out`, formando o encadeamento para trás
//! 4. Sucesso marca o par como `known`; fracasso **não** é memoizado
//!    (apenas o conjunto `asked` impede reperguntar o oráculo)
//!
//! ## Estado de Sessão vs. Configuração
//!
//! | Vive entre sessões | Zerado a cada `execute` |
//! |--------------------|-------------------------|
//! | contextos (e seus contadores de instância) | fatos (`FactStore`) |
//! | parâmetros | `known` / `asked` |
//! | índice de regras | instâncias correntes |
//! | | regra corrente |

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::{
    eval_condition, Cf, Context, FactStore, Instance, InstanceMap, Parameter, Rule, ValueMap,
};
use crate::inference::{use_rules, Resolver};
use crate::oracle::{Answer, CurrentRule, LogSink, Oracle, Question, TraceSink};

/// Erro das operações de registro e instanciação do shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// Instanciação de um contexto que nunca foi declarado. (A criação
    /// permissiva por referência vale para parâmetros, não para
    /// contextos.)
    #[error("contexto não declarado: {0}")]
    UnknownContext(String),
}

/// Resultado de uma sessão de consulta: para cada instância processada,
/// o mapa valor→CF de cada parâmetro de objetivo.
///
/// Só aparecem instâncias de contextos que declararam pelo menos um
/// objetivo. Um mapa de valores vazio significa "nenhuma conclusão
/// aplicável" — não é um erro.
#[derive(Debug)]
pub struct Findings {
    /// Instante de início da sessão.
    pub started_at: DateTime<Utc>,

    /// instância → (parâmetro de objetivo → valor→CF).
    pub results: HashMap<Instance, HashMap<String, ValueMap>>,
}

/// Estado de uma sessão de consulta — integralmente zerado por
/// [`Shell::clear`] no início de cada `execute`.
#[derive(Default)]
struct Session {
    /// Fatos acumulados nesta sessão.
    facts: FactStore,

    /// Pares (parâmetro, instância) já resolvidos com sucesso.
    /// Memoização: impede regras de redisparar e perguntas repetidas.
    known: HashSet<(String, Instance)>,

    /// Pares (parâmetro, instância) já postos ao oráculo — mesmo que ele
    /// tenha recusado. Impede reperguntas dentro da sessão.
    asked: HashSet<(String, Instance)>,

    /// Instância corrente de cada contexto.
    instances: InstanceMap,

    /// Instância sob consideração (a última instanciada).
    current: Option<Instance>,

    /// O que está sendo avaliado agora, para introspecção.
    current_rule: Option<CurrentRule>,
}

/// Shell de sistema especialista: registros + sessão + laço de controle.
///
/// ## Concorrência
///
/// O shell é síncrono e monossessão: no máximo uma consulta ativa por
/// instância. Quem precisar compartilhá-lo entre threads deve tratar a
/// sessão inteira (`execute`) como uma única seção crítica.
pub struct Shell<O: Oracle> {
    /// Contextos declarados, por nome.
    contexts: HashMap<String, Context>,

    /// Parâmetros declarados, por nome. Cresce por criação permissiva
    /// quando uma regra referencia um nome nunca declarado.
    params: HashMap<String, Parameter>,

    /// Índice de regras: parâmetro de conclusão → regras que o derivam.
    /// Resposta O(1) para "quais regras podem concluir P?".
    rules: HashMap<String, Vec<Arc<Rule>>>,

    /// Fonte externa de respostas.
    oracle: O,

    /// Sink observacional de introspecção.
    sink: Box<dyn TraceSink>,

    /// Estado da sessão corrente.
    session: Session,
}

impl<O: Oracle> Shell<O> {
    /// Cria um shell com o sink de introspecção padrão ([`LogSink`]).
    pub fn new(oracle: O) -> Self {
        Self::with_sink(oracle, Box::new(LogSink))
    }

    /// Cria um shell com um sink de introspecção específico.
    pub fn with_sink(oracle: O, sink: Box<dyn TraceSink>) -> Self {
        Self {
            contexts: HashMap::new(),
            params: HashMap::new(),
            rules: HashMap::new(),
            oracle,
            sink,
            session: Session::default(),
        }
    }

    // ─── registros (configuração, persistem entre sessões) ────

    /// Declara um contexto.
    pub fn define_context(&mut self, context: Context) {
        tracing::debug!(context = %context.name, "contexto declarado");
        self.contexts.insert(context.name.clone(), context);
    }

    /// Declara um parâmetro.
    pub fn define_param(&mut self, parameter: Parameter) {
        tracing::debug!(param = %parameter.name, "parâmetro declarado");
        self.params.insert(parameter.name.clone(), parameter);
    }

    /// Declara uma regra, indexando-a sob cada parâmetro que aparece em
    /// suas conclusões.
    pub fn define_rule(&mut self, rule: Rule) {
        let rule = Arc::new(rule);
        tracing::debug!(rule = rule.num, cf = %rule.cf, "regra declarada");
        for conclusion in &rule.conclusions {
            self.rules
                .entry(conclusion.param.clone())
                .or_default()
                .push(rule.clone());
        }
    }

    /// Parâmetro pelo nome, com criação permissiva: um nome nunca
    /// declarado ganha um [`Parameter::default_for`] registrado na hora.
    pub fn parameter(&mut self, name: &str) -> &Parameter {
        self.params.entry(name.to_string()).or_insert_with(|| {
            tracing::debug!(param = name, "parâmetro criado por referência");
            Parameter::default_for(name)
        })
    }

    /// Regras capazes de concluir `param`, na ordem de declaração.
    fn rules_for(&mut self, param: &str) -> Vec<Arc<Rule>> {
        self.rules.entry(param.to_string()).or_default().clone()
    }

    /// Acesso de leitura ao armazém de fatos da sessão corrente.
    pub fn fact_store(&self) -> &FactStore {
        &self.session.facts
    }

    /// Acesso de leitura ao oráculo (útil para inspecionar dublês de
    /// teste).
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    // ─── sessão ────────────────────────────────────────────────

    /// Zera todo o estado de sessão. Os registros (e os contadores de
    /// instância dos contextos) não são afetados.
    pub fn clear(&mut self) {
        self.session.facts.clear();
        self.session.known.clear();
        self.session.asked.clear();
        self.session.instances.clear();
        self.session.current = None;
        self.session.current_rule = None;
    }

    /// Cunha uma nova instância do contexto e a registra como corrente.
    ///
    /// # Erros
    ///
    /// [`ShellError::UnknownContext`] se o contexto nunca foi declarado.
    pub fn instantiate(&mut self, context_name: &str) -> Result<Instance, ShellError> {
        let context = self
            .contexts
            .get_mut(context_name)
            .ok_or_else(|| ShellError::UnknownContext(context_name.to_string()))?;
        let instance = context.instantiate();
        self.session
            .instances
            .insert(context_name.to_string(), instance.clone());
        self.session.current = Some(instance.clone());
        Ok(instance)
    }

    fn set_current_rule(&mut self, current: CurrentRule) {
        self.sink.on_rule(&current);
        self.session.current_rule = Some(current);
    }

    // ─── encadeamento para trás ────────────────────────────────

    /// Determina valores possíveis para `(param, instância)` usando
    /// regras e o oráculo. `true` se algum valor foi encontrado.
    ///
    /// Sem instância explícita, usa a instância corrente da sessão. Este
    /// é o ponto único de recursão do encadeamento para trás: a avaliação
    /// de premissas reentra aqui através do trait [`Resolver`].
    pub fn find_out(&mut self, param: &str, instance: Option<Instance>) -> bool {
        let Some(instance) = instance.or_else(|| self.session.current.clone()) else {
            tracing::warn!(param, "find_out sem instância corrente");
            return false;
        };

        let key = (param.to_string(), instance.clone());
        if self.session.known.contains(&key) {
            return true;
        }

        let ask_first = self.parameter(param).ask_first;
        let rules = self.rules_for(param);
        tracing::debug!(
            param,
            instance = %instance,
            ask_first,
            candidates = rules.len(),
            "resolvendo parâmetro"
        );

        let success = if ask_first {
            self.ask_oracle(param, &instance) || self.apply_rules(&rules)
        } else {
            self.apply_rules(&rules) || self.ask_oracle(param, &instance)
        };

        if success {
            self.session.known.insert(key);
        }
        success
    }

    /// Aplica todas as regras candidatas, com o próprio shell como
    /// estratégia de resolução recursiva.
    fn apply_rules(&mut self, rules: &[Arc<Rule>]) -> bool {
        use_rules(rules, self)
    }

    /// Consulta o oráculo para `(param, instância)`.
    ///
    /// Se o par já foi perguntado nesta sessão, devolve `false` sem
    /// reperguntar — recusa anterior vale como "sem informação nova".
    fn ask_oracle(&mut self, param: &str, instance: &Instance) -> bool {
        let key = (param.to_string(), instance.clone());
        if !self.session.asked.insert(key) {
            return false;
        }

        let parameter = self.parameter(param).clone();
        let question = Question {
            parameter,
            instance: instance.clone(),
            rule_text: self.render_current_rule(),
            why: self.explain_why(param),
        };

        match self.oracle.ask(&question) {
            Answer::Values(pairs) if !pairs.is_empty() => {
                for (value, cf) in pairs {
                    self.session.facts.update(param, instance, value, cf);
                }
                true
            }
            _ => {
                tracing::debug!(param, instance = %instance, "oráculo sem resposta");
                false
            }
        }
    }

    // ─── introspecção ──────────────────────────────────────────

    /// Texto da regra em avaliação, para o comando `rule` do console.
    fn render_current_rule(&self) -> String {
        match &self.session.current_rule {
            Some(CurrentRule::Rule(rule)) => rule.to_string(),
            Some(marker) => format!("({} — nenhuma regra em avaliação)", marker),
            None => "(nenhuma regra em avaliação)".to_string(),
        }
    }

    /// Explicação para o comando `why`: qual regra motiva a pergunta,
    /// separando premissas já satisfeitas das ainda em avaliação.
    fn explain_why(&self, param: &str) -> String {
        use std::fmt::Write as _;

        let mut out = format!("Por que o valor de {} está sendo perguntado?\n", param);
        match &self.session.current_rule {
            Some(CurrentRule::Initial) => {
                let _ = write!(out, "{} é um dos parâmetros iniciais do contexto.", param);
            }
            Some(CurrentRule::Goal) => {
                let _ = write!(out, "{} é um dos parâmetros de objetivo do contexto.", param);
            }
            Some(CurrentRule::Rule(rule)) => {
                let mut satisfied = Vec::new();
                let mut pending = Vec::new();
                for premise in &rule.premises {
                    let Some(bound) = premise.bind(&self.session.instances) else {
                        pending.push(premise.clone());
                        continue;
                    };
                    // Avaliação só sobre fatos conhecidos — sem recursão
                    let cf = self
                        .session
                        .facts
                        .values_ref(&bound.param, &bound.instance)
                        .map(|values| eval_condition(&bound, values))
                        .unwrap_or(Cf::UNKNOWN);
                    if cf.is_true() {
                        satisfied.push(premise.clone());
                    } else {
                        pending.push(premise.clone());
                    }
                }
                if !satisfied.is_empty() {
                    out.push_str("Sabe-se que:\n");
                    for premise in &satisfied {
                        let _ = writeln!(out, "    {}", premise);
                    }
                    out.push_str("Portanto,\n");
                }
                let remaining = Rule::new(rule.num, pending, rule.conclusions.clone(), rule.cf);
                let _ = write!(out, "{}", remaining);
            }
            None => {
                let _ = write!(out, "{} foi solicitado diretamente.", param);
            }
        }
        out
    }

    // ─── laço de nível superior ────────────────────────────────

    /// Roda uma sessão de consulta completa sobre os contextos nomeados,
    /// na ordem dada.
    ///
    /// Para cada contexto: instancia, resolve os parâmetros iniciais,
    /// resolve os objetivos e congela os resultados. Um contexto não
    /// declarado é registrado em log e ignorado — a sessão nunca é fatal
    /// e sempre devolve um mapeamento (possivelmente parcial).
    pub fn execute(&mut self, context_names: &[&str]) -> Findings {
        self.clear();
        let started_at = Utc::now();
        tracing::info!(contexts = ?context_names, "iniciando sessão de consulta");

        let mut results = HashMap::new();
        for name in context_names {
            let (initial, goals) = match self.contexts.get(*name) {
                Some(context) => (context.initial_data.clone(), context.goals.clone()),
                None => {
                    tracing::warn!(context = name, "contexto não declarado — ignorado");
                    continue;
                }
            };
            let instance = match self.instantiate(name) {
                Ok(instance) => instance,
                Err(_) => continue,
            };

            // Dados iniciais antes de raciocinar sobre os objetivos —
            // uma das marcas do EMYCIN
            self.set_current_rule(CurrentRule::Initial);
            for param in &initial {
                self.find_out(param, None);
            }

            self.set_current_rule(CurrentRule::Goal);
            for param in &goals {
                self.find_out(param, None);
            }

            if !goals.is_empty() {
                let mut by_param = HashMap::new();
                for param in &goals {
                    by_param.insert(param.clone(), self.session.facts.snapshot(param, &instance));
                }
                results.insert(instance, by_param);
            }
        }

        tracing::info!(instances = results.len(), "sessão concluída");
        Findings {
            started_at,
            results,
        }
    }
}

/// O shell é a estratégia de resolução do motor de regras: `resolve`
/// reentra em [`Shell::find_out`], fechando o ciclo do encadeamento para
/// trás.
impl<O: Oracle> Resolver for Shell<O> {
    fn resolve(&mut self, param: &str, instance: &Instance) -> bool {
        self.find_out(param, Some(instance.clone()))
    }

    fn facts(&mut self) -> &mut FactStore {
        &mut self.session.facts
    }

    fn instances(&self) -> &InstanceMap {
        &self.session.instances
    }

    fn trace(&mut self, rule: &Arc<Rule>) {
        self.set_current_rule(CurrentRule::Rule(rule.clone()));
    }
}
