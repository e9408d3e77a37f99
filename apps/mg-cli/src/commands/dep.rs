// dep.rs — Dependency subcommands: add, remove, order, check.
//
// `mg dep add 3 2` records "goal 3 depends on goal 2". Edges that would
// close a cycle are refused; adding an edge that already exists is
// reported and treated as success.

use clap::Subcommand;
use mg_goal::{BoardConfig, GoalId};

use super::{goal_label, Board};

#[derive(Subcommand)]
pub enum DepCommands {
    /// Make GOAL depend on DEPENDENCY.
    Add { goal: GoalId, dependency: GoalId },
    /// Remove the edge GOAL → DEPENDENCY.
    Remove { goal: GoalId, dependency: GoalId },
    /// List goals with dependencies before dependents.
    Order,
    /// Report dangling ids, self-dependencies and cycles in the board.
    Check,
}

pub fn execute(cmd: &DepCommands, config: &BoardConfig) -> anyhow::Result<()> {
    match cmd {
        DepCommands::Add { goal, dependency } => add_dependency(config, *goal, *dependency),
        DepCommands::Remove { goal, dependency } => {
            let mut board = Board::open(config)?;
            board.store.remove_dependency(*goal, *dependency)?;
            board.save()?;
            println!("Goal #{} no longer depends on #{}", goal, dependency);
            Ok(())
        }
        DepCommands::Order => show_order(config),
        DepCommands::Check => check(config),
    }
}

fn add_dependency(config: &BoardConfig, goal: GoalId, dependency: GoalId) -> anyhow::Result<()> {
    let mut board = Board::open(config)?;
    match board.store.add_dependency(goal, dependency) {
        Ok(()) => {
            board.save()?;
            println!("Goal #{} now depends on #{}", goal, dependency);
            Ok(())
        }
        Err(e) if e.is_soft() => {
            println!("{} (nothing to do)", e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn show_order(config: &BoardConfig) -> anyhow::Result<()> {
    let board = Board::open(config)?;
    let order = board.store.execution_order()?;
    if order.is_empty() {
        println!("No goals.");
        return Ok(());
    }
    for (step, id) in order.iter().enumerate() {
        if let Some(goal) = board.store.goal(*id) {
            println!("{:>3}. {}", step + 1, goal_label(goal, 50));
        }
    }
    Ok(())
}

fn check(config: &BoardConfig) -> anyhow::Result<()> {
    let board = Board::open(config)?;
    let issues = board.store.integrity_issues();
    if issues.is_empty() {
        println!("No integrity issues.");
        return Ok(());
    }
    for issue in &issues {
        println!("- {}", issue);
    }
    println!("\n{} issue(s) found.", issues.len());
    Ok(())
}
