//! Command implementations for the CLI interface.
//!
//! Every handler drives a [`TaskListViewModel`] against the configured store,
//! so the command line goes through exactly the same load, create and note
//! rules as the terminal UI.

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::fields::{PriorityBand, Status, StatusArg};
use crate::store::{StoreError, TaskStore};
use crate::task::{Task, TaskDraft, TaskId};
use crate::tui::run::run_tui;
use crate::view_model::TaskListViewModel;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// List tasks in display order.
    List {
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
        /// Only tasks with this status label (case-insensitive).
        #[arg(long)]
        status: Option<String>,
    },

    /// Add a new task ranked after every existing one.
    Add {
        /// Short title for the task.
        title: String,
        /// Longer description.
        #[arg(long)]
        desc: String,
        /// What originated the task.
        #[arg(long)]
        trigger: String,
        /// Status: pendente | em-andamento | concluido.
        #[arg(long, value_enum, default_value_t = StatusArg::Pendente)]
        status: StatusArg,
    },

    /// Replace the notes of a task.
    Note {
        /// Task ID.
        id: TaskId,
        /// New notes text.
        text: String,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub async fn cmd_ui(store: Arc<dyn TaskStore>, table: &str) -> Result<()> {
    run_tui(store, table).await.context("UI error")
}

/// Load tasks and print them as a table.
pub async fn cmd_list(
    store: Arc<dyn TaskStore>,
    limit: Option<usize>,
    status: Option<String>,
) -> Result<()> {
    let mut vm = TaskListViewModel::new(store);
    load(&mut vm).await?;

    let wanted = status.as_deref().map(Status::parse);
    let mut filtered: Vec<&Task> = vm
        .tasks()
        .iter()
        .filter(|t| match &wanted {
            Some(s) => t.status.as_ref() == Some(s),
            None => true,
        })
        .collect();

    if let Some(n) = limit {
        filtered.truncate(n);
    }

    print!("{}", format_table(&filtered));
    Ok(())
}

/// Create a task from the command-line fields.
pub async fn cmd_add(
    store: Arc<dyn TaskStore>,
    title: String,
    desc: String,
    trigger: String,
    status: StatusArg,
) -> Result<()> {
    let draft = TaskDraft {
        task: title,
        description: desc,
        status: status.into(),
        trigger,
    };
    draft.validate()?;

    let mut vm = TaskListViewModel::new(store);
    load(&mut vm).await?;

    let new = vm.prepare_create(&draft);
    let result = vm.store().insert(&new).await;
    let outcome = result.clone();
    vm.finish_create(result);
    let created = outcome.context("Failed to create task")?;
    vm.load().await;

    for t in &created {
        println!("Added task {} with priority {}", t.id, t.priority);
    }
    print!("{}", format_table(&created.iter().collect::<Vec<_>>()));
    Ok(())
}

/// Replace the notes of one task.
pub async fn cmd_note(store: Arc<dyn TaskStore>, id: TaskId, text: String) -> Result<()> {
    let mut vm = TaskListViewModel::new(store);
    load(&mut vm).await?;

    if !vm.start_note_edit(id) {
        bail!("Task {id} not found.");
    }
    vm.set_note_draft(text.clone());

    let result = vm.store().update_notes(id, &text).await;
    let outcome = result.clone();
    vm.finish_save_note(id, text, result);
    outcome.context("Failed to save notes")?;

    println!("Updated notes of task {id}");
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Run a load and surface its failure, which the view model only logs.
async fn load(vm: &mut TaskListViewModel) -> Result<()> {
    vm.begin_load();
    let result = vm.store().fetch_all().await;
    let outcome: Result<(), StoreError> = result.as_ref().map(|_| ()).map_err(Clone::clone);
    vm.finish_load(result);
    outcome.context("Failed to load tasks")
}

pub fn format_band(band: PriorityBand) -> &'static str {
    match band {
        PriorityBand::High => "high",
        PriorityBand::Medium => "medium",
        PriorityBand::Low => "low",
    }
}

/// Render tasks as a fixed-width table.
pub fn format_table(tasks: &[&Task]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<4} {:<7} {:<13} {:<28} {:<14} {}",
        "ID", "Pri", "Band", "Status", "Title", "Trigger", "Notes"
    );
    for t in tasks {
        let status = t.status.as_ref().map(Status::label).unwrap_or("N/A");
        let _ = writeln!(
            out,
            "{:<5} {:<4} {:<7} {:<13} {:<28} {:<14} {}",
            t.id,
            t.priority,
            format_band(t.priority.band()),
            truncate(status, 13),
            truncate(t.task.as_deref().unwrap_or("-"), 28),
            truncate(t.trigger.as_deref().unwrap_or("N/A"), 14),
            t.notes.as_deref().unwrap_or("-").replace('\n', " "),
        );
    }
    out
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
