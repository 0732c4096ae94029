//! # TB - Task Board
//!
//! A terminal task board over a hosted task table (PostgREST endpoint of a
//! hosted Postgres project).
//!
//! ## Key Features
//!
//! - **Priority ranking**: every new task is ranked after the current highest
//!   priority, and the board is ordered by ascending priority, newest first.
//! - **Color bands**: priorities `#7+` show red, `#4-6` brand orange, the rest
//!   green; the status drives the icon and text color.
//! - **Inline notes**: edit the notes of one task at a time, straight from
//!   the board.
//! - **Scriptable**: `list`, `add` and `note` go through the same rules as the
//!   interactive board.
//!
//! ## Quick Start
//!
//! ```bash
//! # Point the board at a project
//! export SUPABASE_URL=https://<project>.supabase.co
//! export SUPABASE_ANON_KEY=<anon key>
//!
//! # Launch the board
//! tb
//!
//! # Add a task via CLI
//! tb add "Revisar contrato" --desc "Cláusula 4" --trigger "Jurídico"
//!
//! # List tasks
//! tb list --limit 10
//! ```
//!
//! Settings can also live in `~/.task_board/config.toml`:
//!
//! ```toml
//! [store]
//! url = "https://<project>.supabase.co"
//! api_key = "<anon key>"
//! table = "task_tech"
//!
//! [log]
//! level = "info"
//! ```
//!
//! Logs are written to `~/.task_board/logs/`.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod fields;
pub mod logging;
pub mod store;
pub mod task;
pub mod view_model;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod dispatch;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::{Overrides, Settings};
use store::{rest::RestStore, TaskStore};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Ui);

    // Completions need no connection settings.
    if let Commands::Completions { shell } = command {
        cmd_completions(shell);
        return Ok(());
    }

    let app_dir = config::app_dir();
    let settings = Settings::load(
        &app_dir,
        cli.config.as_deref(),
        Overrides {
            url: cli.url,
            table: cli.table,
        },
    )
    .context("Failed to load settings")?;

    let _guard = logging::init(&settings.log_dir(&app_dir), &settings.log.level)?;
    tracing::info!(table = %settings.store.table, "starting");

    let store: Arc<dyn TaskStore> = Arc::new(
        RestStore::new(&settings.store).context("Failed to set up the store client")?,
    );

    match command {
        Commands::Ui => cmd_ui(store, &settings.store.table).await,
        Commands::List { limit, status } => cmd_list(store, limit, status).await,
        Commands::Add {
            title,
            desc,
            trigger,
            status,
        } => cmd_add(store, title, desc, trigger, status).await,
        Commands::Note { id, text } => cmd_note(store, id, text).await,
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}
