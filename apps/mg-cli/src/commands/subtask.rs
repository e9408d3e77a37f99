// subtask.rs — Subtask subcommands: add, update, remove.

use clap::Subcommand;
use mg_goal::{BoardConfig, GoalId, SubtaskId};

use super::Board;

#[derive(Subcommand)]
pub enum SubtaskCommands {
    /// Append a subtask to a goal.
    Add {
        goal: GoalId,
        /// Subtask name (defaults to the configured placeholder).
        #[arg(long)]
        name: Option<String>,
    },
    /// Rename a subtask.
    Update {
        goal: GoalId,
        id: SubtaskId,
        name: String,
    },
    /// Remove a subtask.
    Remove { goal: GoalId, id: SubtaskId },
}

pub fn execute(cmd: &SubtaskCommands, config: &BoardConfig) -> anyhow::Result<()> {
    let mut board = Board::open(config)?;

    match cmd {
        SubtaskCommands::Add { goal, name } => {
            let subtask = match name {
                Some(name) => board.store.add_named_subtask(*goal, name.clone())?,
                None => board.store.add_subtask(*goal)?,
            };
            board.save()?;
            println!("Subtask {} added to goal #{}", subtask.id, goal);
        }
        SubtaskCommands::Update { goal, id, name } => {
            board.store.update_subtask(*goal, *id, name.clone())?;
            board.save()?;
            println!("Subtask {} of goal #{} renamed.", id, goal);
        }
        SubtaskCommands::Remove { goal, id } => {
            board.store.remove_subtask(*goal, *id)?;
            board.save()?;
            println!("Subtask {} removed from goal #{}", id, goal);
        }
    }

    Ok(())
}
