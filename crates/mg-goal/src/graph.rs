// graph.rs — Dependency graph algorithms over a goal slice.
//
// The graph is implicit: each goal's `dependencies` set lists its outgoing
// edges (g→d, "g depends on d"). Boards hold dozens of goals at most, so
// everything here walks the slice directly instead of maintaining indexes.
//
// Ingested data is trusted as-is and may already contain dangling ids,
// self-edges or cycles. Every walk therefore tracks visited ids and
// skips ids that resolve to no goal.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::model::{Goal, GoalId};

/// Map from id to goal. The first goal wins when ids repeat.
fn index(goals: &[Goal]) -> HashMap<GoalId, &Goal> {
    let mut map = HashMap::with_capacity(goals.len());
    for goal in goals {
        map.entry(goal.id).or_insert(goal);
    }
    map
}

/// True if `target` is reachable from `start` by following one or more
/// dependency edges.
pub fn reaches(goals: &[Goal], start: GoalId, target: GoalId) -> bool {
    let by_id = index(goals);
    let Some(start_goal) = by_id.get(&start) else {
        return false;
    };

    let mut visited = HashSet::new();
    let mut stack: Vec<GoalId> = start_goal.dependencies.iter().copied().collect();

    while let Some(current) = stack.pop() {
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(goal) = by_id.get(&current) {
            stack.extend(
                goal.dependencies
                    .iter()
                    .filter(|id| !visited.contains(*id))
                    .copied(),
            );
        }
    }

    false
}

/// True if adding the edge `goal_id → dependency_id` would close a cycle,
/// i.e. `dependency_id` already depends on `goal_id` directly or
/// transitively.
pub fn would_create_cycle(goals: &[Goal], goal_id: GoalId, dependency_id: GoalId) -> bool {
    let verdict = goal_id == dependency_id || reaches(goals, dependency_id, goal_id);
    tracing::debug!(
        goal_id,
        dependency_id,
        cycle = verdict,
        "dependency cycle check"
    );
    verdict
}

/// A consistency problem found in goal data.
///
/// Mutations through the store never introduce these; they can only arrive
/// with ingested data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// More than one goal carries this id.
    DuplicateGoalId { goal_id: GoalId },
    /// A dependency names a goal that does not exist.
    DanglingDependency {
        goal_id: GoalId,
        dependency_id: GoalId,
    },
    /// A goal lists itself as a dependency.
    SelfDependency { goal_id: GoalId },
    /// These goals sit on at least one dependency cycle (display order).
    Cycle { goal_ids: Vec<GoalId> },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityIssue::DuplicateGoalId { goal_id } => {
                write!(f, "goal id {} is used more than once", goal_id)
            }
            IntegrityIssue::DanglingDependency {
                goal_id,
                dependency_id,
            } => write!(
                f,
                "goal {} depends on missing goal {}",
                goal_id, dependency_id
            ),
            IntegrityIssue::SelfDependency { goal_id } => {
                write!(f, "goal {} depends on itself", goal_id)
            }
            IntegrityIssue::Cycle { goal_ids } => {
                let ids: Vec<String> = goal_ids.iter().map(|id| format!("#{id}")).collect();
                write!(f, "dependency cycle through {}", ids.join(", "))
            }
        }
    }
}

/// List every integrity problem in `goals`, in display order.
pub fn integrity_issues(goals: &[Goal]) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();
    let by_id = index(goals);

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for goal in goals {
        if !seen.insert(goal.id) && reported.insert(goal.id) {
            issues.push(IntegrityIssue::DuplicateGoalId { goal_id: goal.id });
        }
    }

    for goal in goals {
        for &dep in &goal.dependencies {
            if dep == goal.id {
                issues.push(IntegrityIssue::SelfDependency { goal_id: goal.id });
            } else if !by_id.contains_key(&dep) {
                issues.push(IntegrityIssue::DanglingDependency {
                    goal_id: goal.id,
                    dependency_id: dep,
                });
            }
        }
    }

    // Self-edges are already reported on their own.
    let mut on_cycle: Vec<GoalId> = Vec::new();
    for goal in goals {
        if on_cycle.contains(&goal.id) {
            continue;
        }
        let cyclic = goal
            .dependencies
            .iter()
            .filter(|&&dep| dep != goal.id)
            .any(|&dep| reaches(goals, dep, goal.id));
        if cyclic {
            on_cycle.push(goal.id);
        }
    }
    if !on_cycle.is_empty() {
        issues.push(IntegrityIssue::Cycle { goal_ids: on_cycle });
    }

    issues
}

/// Order goal ids so every goal comes after the goals it depends on.
///
/// Among goals that are ready at the same time, display order wins, so an
/// edge-free board comes back in display order. Dangling dependency ids are
/// ignored. Fails with `CircularDependency` naming one edge of a cycle when
/// no such order exists.
pub fn execution_order(goals: &[Goal]) -> Result<Vec<GoalId>, GoalError> {
    // Positions of the first goal with each id; later duplicates are skipped.
    let mut position: HashMap<GoalId, usize> = HashMap::new();
    for (pos, goal) in goals.iter().enumerate() {
        position.entry(goal.id).or_insert(pos);
    }
    let unique: Vec<usize> = goals
        .iter()
        .enumerate()
        .filter(|(pos, goal)| position[&goal.id] == *pos)
        .map(|(pos, _)| pos)
        .collect();

    let mut pending: HashMap<usize, usize> = HashMap::new();
    let mut dependents: HashMap<usize, Vec<usize>> = HashMap::new();
    for &pos in &unique {
        let deps: Vec<usize> = goals[pos]
            .dependencies
            .iter()
            .filter_map(|dep| position.get(dep).copied())
            .collect();
        pending.insert(pos, deps.len());
        for dep_pos in deps {
            dependents.entry(dep_pos).or_default().push(pos);
        }
    }

    let mut ready: BTreeSet<usize> = unique
        .iter()
        .copied()
        .filter(|pos| pending[pos] == 0)
        .collect();
    let mut order = Vec::with_capacity(unique.len());
    let mut emitted = HashSet::new();

    while let Some(pos) = ready.pop_first() {
        order.push(goals[pos].id);
        emitted.insert(pos);
        for &dependent in dependents.get(&pos).map(Vec::as_slice).unwrap_or_default() {
            if let Some(count) = pending.get_mut(&dependent) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    if order.len() == unique.len() {
        return Ok(order);
    }

    let stuck = unique
        .iter()
        .copied()
        .find(|pos| !emitted.contains(pos))
        .map(|pos| &goals[pos]);
    match stuck {
        Some(goal) => {
            let dependency_id = goal
                .dependencies
                .iter()
                .copied()
                .find(|dep| position.get(dep).is_some_and(|p| !emitted.contains(p)))
                .unwrap_or(goal.id);
            Err(GoalError::CircularDependency {
                goal_id: goal.id,
                dependency_id,
            })
        }
        None => Ok(order),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;

    fn goal(id: GoalId, deps: &[GoalId]) -> Goal {
        Goal {
            id,
            name: format!("Goal {id}"),
            description: String::new(),
            priority: Priority::Medium,
            assignees: vec![],
            subtasks: vec![],
            dependencies: deps.iter().copied().collect(),
            meeting_id: 1,
        }
    }

    /// 3 depends on 2, 2 depends on 1.
    fn chain() -> Vec<Goal> {
        vec![goal(1, &[]), goal(2, &[1]), goal(3, &[2])]
    }

    #[test]
    fn reaches_follows_transitive_edges() {
        let goals = chain();
        assert!(reaches(&goals, 3, 1));
        assert!(reaches(&goals, 3, 2));
        assert!(!reaches(&goals, 1, 3));
    }

    #[test]
    fn reaches_does_not_count_start_without_an_edge() {
        let goals = chain();
        assert!(!reaches(&goals, 1, 1));
    }

    #[test]
    fn reaches_terminates_on_existing_cycle() {
        let goals = vec![goal(1, &[2]), goal(2, &[1]), goal(3, &[])];
        assert!(!reaches(&goals, 1, 3));
        assert!(reaches(&goals, 1, 1));
    }

    #[test]
    fn reaches_skips_dangling_ids() {
        let goals = vec![goal(1, &[99]), goal(2, &[1])];
        assert!(!reaches(&goals, 2, 5));
        assert!(reaches(&goals, 2, 99));
    }

    #[test]
    fn closing_the_chain_is_a_cycle() {
        let goals = chain();
        assert!(would_create_cycle(&goals, 1, 3));
        assert!(would_create_cycle(&goals, 2, 2));
        assert!(!would_create_cycle(&goals, 3, 1));
    }

    #[test]
    fn integrity_of_clean_data_is_empty() {
        assert!(integrity_issues(&chain()).is_empty());
    }

    #[test]
    fn integrity_reports_every_issue_kind() {
        let goals = vec![
            goal(1, &[2]),
            goal(2, &[1]),
            goal(3, &[3, 42]),
            goal(3, &[]),
        ];
        let issues = integrity_issues(&goals);
        assert!(issues.contains(&IntegrityIssue::DuplicateGoalId { goal_id: 3 }));
        assert!(issues.contains(&IntegrityIssue::SelfDependency { goal_id: 3 }));
        assert!(issues.contains(&IntegrityIssue::DanglingDependency {
            goal_id: 3,
            dependency_id: 42
        }));
        assert!(issues.contains(&IntegrityIssue::Cycle {
            goal_ids: vec![1, 2]
        }));
    }

    #[test]
    fn execution_order_puts_dependencies_first() {
        let goals = vec![goal(3, &[2]), goal(2, &[1]), goal(1, &[])];
        assert_eq!(execution_order(&goals).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn execution_order_keeps_display_order_for_independent_goals() {
        let goals = vec![goal(5, &[]), goal(2, &[]), goal(9, &[5])];
        assert_eq!(execution_order(&goals).unwrap(), vec![5, 2, 9]);
    }

    #[test]
    fn execution_order_ignores_dangling_ids() {
        let goals = vec![goal(1, &[77]), goal(2, &[1])];
        assert_eq!(execution_order(&goals).unwrap(), vec![1, 2]);
    }

    #[test]
    fn execution_order_rejects_cycles() {
        let goals = vec![goal(1, &[2]), goal(2, &[1]), goal(3, &[])];
        let err = execution_order(&goals).unwrap_err();
        assert!(matches!(
            err,
            GoalError::CircularDependency {
                goal_id: 1,
                dependency_id: 2
            }
        ));
    }

    #[test]
    fn issue_display_is_readable() {
        let issue = IntegrityIssue::Cycle {
            goal_ids: vec![1, 2],
        };
        assert_eq!(issue.to_string(), "dependency cycle through #1, #2");
    }
}
