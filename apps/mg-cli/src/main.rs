//! # mg-cli
//!
//! Command-line interface for meeting goal boards.
//!
//! - `mg ingest <file>` — load an extraction result as the current board
//! - `mg show` / `mg team` — inspect the board
//! - `mg meeting|goal|subtask|dep ...` — validated edits
//!
//! Board state lives in `.mg/` under the project root; every successful
//! edit is appended to `.mg/events.jsonl`.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mg_goal::BoardConfig;
use tracing_subscriber::EnvFilter;

/// Meeting goals CLI — review and edit goals extracted from a meeting.
#[derive(Parser)]
#[command(name = "mg", version, about)]
struct Cli {
    /// Project root directory (defaults to current directory).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the board with an extraction result (JSON file, or `-` for stdin).
    Ingest {
        /// Path to the result JSON.
        source: String,
    },
    /// Show the meeting and its goals.
    Show,
    /// Discard the saved board.
    Clear,
    /// Edit the meeting header.
    Meeting {
        #[command(subcommand)]
        command: commands::board::MeetingCommands,
    },
    /// Add, edit and remove goals.
    Goal {
        #[command(subcommand)]
        command: commands::goal::GoalCommands,
    },
    /// Add, rename and remove subtasks.
    Subtask {
        #[command(subcommand)]
        command: commands::subtask::SubtaskCommands,
    },
    /// Manage dependency edges between goals.
    Dep {
        #[command(subcommand)]
        command: commands::dep::DepCommands,
    },
    /// List assignees and the goals assigned to each.
    Team,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't mix with command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mg_goal=warn,mg_cli=warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    let project_root = cli.project_root.canonicalize().unwrap_or(cli.project_root);
    let config = BoardConfig::for_project(&project_root);
    tracing::debug!(project_root = %project_root.display(), "board config resolved");

    match &cli.command {
        Commands::Ingest { source } => commands::board::ingest(&config, source),
        Commands::Show => commands::board::show(&config),
        Commands::Clear => commands::board::clear(&config),
        Commands::Meeting { command } => commands::board::execute(command, &config),
        Commands::Goal { command } => commands::goal::execute(command, &config),
        Commands::Subtask { command } => commands::subtask::execute(command, &config),
        Commands::Dep { command } => commands::dep::execute(command, &config),
        Commands::Team => commands::team::execute(&config),
    }
}
