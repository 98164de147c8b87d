#![allow(dead_code, unused_imports)]
#![allow(rustdoc::broken_intra_doc_links, rustdoc::invalid_html_tags)]
//! # Consultor Especialista — Expert Consultation Shell
//!
//! **Ponto de entrada principal** do Consultor Especialista, um shell de
//! sistema especialista ao estilo MYCIN/EMYCIN: raciocínio aproximado por
//! fatores de certeza, encadeamento para trás sobre regras declaradas e
//! consulta a um operador humano quando nenhuma regra resolve um
//! parâmetro.
//!
//! ## Fluxo de Execução
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging (RUST_LOG honrado, padrão info)
//!   ├── Escolhe a base de conhecimento:
//!   │   ├── argumento na linha de comando → arquivo JSON
//!   │   └── sem argumento → base embutida de seleção de materiais
//!   ├── Registra contextos, parâmetros e regras no Shell
//!   ├── Roda uma sessão de consulta com o oráculo de console
//!   └── Imprime o relatório final (valor→CF por objetivo)
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Consulta com a base de materiais embutida
//! cargo run
//!
//! # Consulta com uma base própria
//! cargo run -- minha-base.json
//!
//! # Com logs detalhados do encadeamento
//! RUST_LOG=debug cargo run
//! ```
//!
//! Durante a consulta, digite `help` para ver os comandos de
//! introspecção (`why`, `rule`, `?`, `unknown`).

// Declaração dos módulos da aplicação.
// Cada módulo corresponde a uma camada da arquitetura:

/// Módulo `core` — tipos fundamentais: Cf, Context, Parameter, Condition,
/// Rule, FactStore.
mod core;

/// Módulo `inference` — motor de aplicação de regras (duas passadas,
/// todas-as-regras-disparam).
mod inference;

/// Módulo `shell` — o raciocinador: registros, estado de sessão,
/// find_out/execute.
mod shell;

/// Módulo `oracle` — contratos de oráculo e introspecção, análise de
/// respostas.
mod oracle;

/// Módulo `console` — oráculo interativo de terminal e dublê roteirizado.
mod console;

/// Módulo `kb` — carga de bases de conhecimento em JSON.
mod kb;

/// Módulo `materials` — base de demonstração de seleção de materiais.
mod materials;

/// Módulo `report` — formatação do relatório final.
mod report;

use std::path::Path;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::console::ConsoleOracle;
use crate::shell::Shell;

/// Função principal do Consultor Especialista: uma sessão de consulta
/// completa, do registro da base ao relatório.
///
/// # Erros
///
/// Retorna erro se a base de conhecimento indicada não puder ser lida ou
/// desserializada. A consulta em si nunca é fatal: parâmetros sem
/// resolução aparecem no relatório como "nenhuma conclusão aplicável".
fn main() -> Result<()> {
    // Configura o sistema de logging/tracing.
    // Aceita a variável de ambiente RUST_LOG para configurar o nível.
    // Exemplo: RUST_LOG=debug cargo run
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🩺 Consultor Especialista — Starting...");

    // Escolhe a base de conhecimento: arquivo passado na linha de
    // comando, ou a base embutida de seleção de materiais.
    let knowledge = match std::env::args().nth(1) {
        Some(path) => kb::KnowledgeFile::load(Path::new(&path))?,
        None => materials::knowledge()?,
    };
    let consult = knowledge.consult.clone();

    let mut shell = Shell::new(ConsoleOracle::stdio());
    knowledge.register(&mut shell);

    println!("Iniciando a consulta. Para ajuda ao responder, digite \"help\".");
    let names: Vec<&str> = consult.iter().map(String::as_str).collect();
    let findings = shell.execute(&names);

    print!("{}", report::render(&findings));
    Ok(())
}
