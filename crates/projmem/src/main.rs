//! projmem - Project Memory CLI
//!
//! Git-scoped persistent memory over PostgreSQL. One invocation resolves
//! the scope, opens one connection, runs one operation, and prints one
//! JSON document on stdout. Diagnostics go to stderr.

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use projmem_core::{Database, EntryStore, ProjectScope};

mod cli;
mod commands;
mod config;
mod output;

use cli::{Cli, Commands};
use output::Report;

#[tokio::main]
async fn main() {
    // Logs must not contaminate stdout: the JSON document owns it.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("projmem=warn")))
        .init();

    let cli = Cli::parse();

    let (report, code) = match run(cli).await {
        Ok(body) => (Report::success(body), 0),
        Err(err) => (Report::error(format!("{err:#}")), exit_code(&err)),
    };

    println!("{}", report.render());
    std::process::exit(code);
}

/// Resolve the scope, open the connection, run the command, close the
/// connection. The connection is released whether or not the command
/// succeeded.
async fn run(cli: Cli) -> anyhow::Result<Value> {
    let config = config::Config::load()?;
    let scope = ProjectScope::detect();

    let db = Database::connect(&config.database.url).await?;
    let mut store = EntryStore::new(db, &config.search.language);

    let outcome = dispatch(cli.command, &scope, &mut store).await;
    let closed = store.close().await;

    let body = outcome?;
    closed?;
    Ok(body)
}

async fn dispatch(
    command: Commands,
    scope: &ProjectScope,
    store: &mut EntryStore,
) -> anyhow::Result<Value> {
    match command {
        Commands::Add(args) => commands::add::execute(args, scope, store).await,
        Commands::Search {
            query,
            limit,
            all_branches,
        } => commands::search::execute(&query, limit, all_branches, scope, store).await,
        Commands::List(args) => commands::list::execute(args, scope, store).await,
        Commands::Todos => commands::list::todos(scope, store).await,
        Commands::Decisions => commands::list::decisions(scope, store).await,
        Commands::Context => commands::list::context(scope, store).await,
        Commands::Summary => commands::summary::execute(scope, store).await,
        Commands::Update(args) => commands::update::execute(args, store).await,
    }
}

/// Map a failure to the process exit code.
///
/// An empty update patch is reported as an error document but exits 0;
/// every other failure exits 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<projmem_core::Error>() {
        Some(projmem_core::Error::NoUpdateFields) => 0,
        _ => 1,
    }
}
