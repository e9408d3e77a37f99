// goal.rs — Goal subcommands: add, remove, update, show.

use clap::Subcommand;
use mg_goal::{AssigneeInput, BoardConfig, GoalId, GoalUpdate, NewGoal};

use super::{goal_label, Board};

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Append a new goal (Medium priority, assigned to "Unassigned").
    Add {
        /// Goal name (defaults to the configured new-goal name).
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a goal and every dependency on it.
    Remove {
        id: GoalId,
    },
    /// Edit a goal's fields.
    Update {
        id: GoalId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// High, Medium or Low.
        #[arg(long)]
        priority: Option<String>,
        /// Comma-separated names, e.g. "Ana, Bo".
        #[arg(long)]
        assignees: Option<String>,
    },
    /// Show one goal with its subtasks, dependencies and dependents.
    Show {
        id: GoalId,
    },
}

pub fn execute(cmd: &GoalCommands, config: &BoardConfig) -> anyhow::Result<()> {
    match cmd {
        GoalCommands::Add { name, description } => {
            add_goal(config, name.as_deref(), description.as_deref())
        }
        GoalCommands::Remove { id } => remove_goal(config, *id),
        GoalCommands::Update {
            id,
            name,
            description,
            priority,
            assignees,
        } => update_goal(
            config,
            *id,
            GoalUpdate {
                name: name.clone(),
                description: description.clone(),
                priority: priority.clone(),
                assignees: assignees.clone().map(AssigneeInput::Raw),
            },
        ),
        GoalCommands::Show { id } => show_goal(config, *id),
    }
}

fn add_goal(
    config: &BoardConfig,
    name: Option<&str>,
    description: Option<&str>,
) -> anyhow::Result<()> {
    let mut board = Board::open(config)?;
    let defaults = board.settings.new_goal();
    let goal = board.store.add_goal(NewGoal {
        name: name.map_or(defaults.name, str::to_string),
        description: description.map_or(defaults.description, str::to_string),
    })?;
    board.save()?;

    println!("Goal added: {}", goal_label(&goal, 40));
    Ok(())
}

fn remove_goal(config: &BoardConfig, id: GoalId) -> anyhow::Result<()> {
    let mut board = Board::open(config)?;
    let dependents: Vec<GoalId> = board.store.dependents_of(id).iter().map(|g| g.id).collect();
    board.store.remove_goal(id)?;
    board.save()?;

    println!("Removed goal #{}", id);
    if !dependents.is_empty() {
        let ids: Vec<String> = dependents.iter().map(|d| format!("#{d}")).collect();
        println!("  Unlinked from: {}", ids.join(", "));
    }
    Ok(())
}

fn update_goal(config: &BoardConfig, id: GoalId, update: GoalUpdate) -> anyhow::Result<()> {
    if update.is_empty() {
        println!("Nothing to update.");
        return Ok(());
    }
    let mut board = Board::open(config)?;
    board.store.update_goal(id, update)?;
    board.save()?;
    println!("Goal #{} updated.", id);
    Ok(())
}

fn show_goal(config: &BoardConfig, id: GoalId) -> anyhow::Result<()> {
    let board = Board::open(config)?;
    let Some(g) = board.store.goal(id) else {
        anyhow::bail!(mg_goal::GoalError::GoalNotFound(id));
    };

    println!("Goal:        #{}", g.id);
    println!("Name:        {}", g.name);
    println!("Description: {}", g.description);
    println!("Priority:    {}", g.priority);
    println!("Assignees:   {}", g.assignees.join(", "));

    if !g.subtasks.is_empty() {
        println!("Subtasks:");
        for s in &g.subtasks {
            println!("  {}. {}", s.id, s.name);
        }
    }

    let deps = board.store.dependencies_of(id);
    if !deps.is_empty() {
        println!("Depends on:");
        for d in deps {
            println!("  {}", goal_label(d, 40));
        }
    }
    let dependents = board.store.dependents_of(id);
    if !dependents.is_empty() {
        println!("Needed by:");
        for d in dependents {
            println!("  {}", goal_label(d, 40));
        }
    }

    Ok(())
}
