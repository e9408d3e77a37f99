// team.rs — Team view: each assignee with the goals assigned to them.

use mg_goal::BoardConfig;

use super::{goal_label, Board};

pub fn execute(config: &BoardConfig) -> anyhow::Result<()> {
    let board = Board::open(config)?;
    let assignees = board.store.all_assignees();
    if assignees.is_empty() {
        println!("No assignees.");
        return Ok(());
    }

    for person in &assignees {
        println!("{}", person);
        for goal in board.store.goals_for_assignee(person) {
            println!("  {}", goal_label(goal, 20));
        }
    }
    println!("\n{} assignee(s).", assignees.len());

    Ok(())
}
