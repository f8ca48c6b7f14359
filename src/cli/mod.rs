//! Command-line interface
//!
//! The CLI is the external display layer: it builds a `Plate` from the
//! configured documents, refreshes it, and renders the requested view.

pub mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::warn;
use std::path::PathBuf;

use crate::config::Config;
use crate::models::{Task, TaskKind};
use crate::plate::{FsSource, Plate};

#[derive(Parser)]
#[command(
    name = "plate",
    version,
    about = "Extracts a trusted task list from plain-text outline documents"
)]
pub struct Cli {
    /// Path to the rc file (default: ~/.platerc)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit JSON instead of formatted sections
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Next actions and due recurring tasks for the current contexts
    Next,
    /// Inbox-emptying tasks
    Inboxes,
    /// Reminders
    Reminders,
    /// Section counts for every task kind
    All,
    /// Look up a #id cross-reference
    Id { id: String },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let rules = config.context_rules();
    let source = FsSource::new(&config.inboxes, &config.projects);
    let mut plate = Plate::new(source, rules, config.warn_days);
    plate.refresh()?;
    for diagnostic in plate.diagnostics() {
        warn!("skipped line: {}", diagnostic);
    }

    match cli.command.unwrap_or(Command::Next) {
        Command::Next => {
            let mut tasks = plate.eligible(TaskKind::NextAction);
            tasks.extend(plate.eligible(TaskKind::Recur));
            print_view(&plate, &tasks, cli.json)?;
        }
        Command::Inboxes => {
            let tasks = plate.eligible(TaskKind::Inbox);
            print_view(&plate, &tasks, cli.json)?;
        }
        Command::Reminders => {
            let tasks = plate.eligible(TaskKind::Reminder);
            print_view(&plate, &tasks, cli.json)?;
        }
        Command::All => {
            for kind in [
                TaskKind::Inbox,
                TaskKind::NextAction,
                TaskKind::Recur,
                TaskKind::Reminder,
            ] {
                let tasks = plate.eligible(kind);
                println!("{}", output::render_counts(kind, &tasks, plate.now()));
            }
        }
        Command::Id { id } => match plate.lookup_id(&id) {
            Some(entry) => {
                let state = if entry.done { "done" } else { "open" };
                println!(
                    "#{} -> {}:{} ({})",
                    id,
                    entry.source.doc.as_str(),
                    entry.source.line,
                    state
                );
            }
            None => anyhow::bail!("unknown id: {}", id),
        },
    }
    Ok(())
}

fn print_view<S: crate::plate::DocumentSource>(
    plate: &Plate<S>,
    tasks: &[&Task],
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", output::render_json(tasks, plate.now())?);
    } else {
        println!("{}", output::render_sections(tasks, plate.now()));
    }
    Ok(())
}
