// model.rs — Meeting, Goal and Subtask: the data the board holds.
//
// Field names and JSON shapes match what the extraction service returns,
// so a snapshot serializes back to the same document it was ingested from.
//
// The edit payloads (`NewGoal`, `GoalUpdate`, `MeetingUpdate`) live here too;
// they carry raw user input that the store validates before applying.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GoalError;

/// Goal identifier. Unique within the current goal collection.
pub type GoalId = i64;

/// Subtask identifier. Unique only within its parent goal.
pub type SubtaskId = i64;

/// Assignee given to every goal created through `add_goal`.
pub const UNASSIGNED: &str = "Unassigned";

/// Goal priority as the extraction service reports it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = GoalError;

    /// Accepts the three names in any letter case, ignoring surrounding
    /// whitespace. Anything else is `InvalidPriority`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| GoalError::InvalidPriority(s.to_string()))
    }
}

/// The meeting a set of goals was extracted from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub summary: String,
}

/// A step within a goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subtask {
    pub id: SubtaskId,
    pub name: String,
}

/// A task-like unit with priority, assignees, subtasks and dependency edges.
///
/// `dependencies` holds the ids this goal depends on: an edge g→d means
/// goal g cannot start before goal d.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub dependencies: BTreeSet<GoalId>,
    pub meeting_id: i64,
}

impl Goal {
    pub fn depends_on(&self, goal_id: GoalId) -> bool {
        self.dependencies.contains(&goal_id)
    }

    pub fn subtask(&self, subtask_id: SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == subtask_id)
    }

    pub fn has_assignee(&self, name: &str) -> bool {
        self.assignees.iter().any(|a| a == name)
    }

    /// Next subtask id: one past the largest existing id, or 1.
    pub(crate) fn next_subtask_id(&self) -> Option<SubtaskId> {
        next_id(self.subtasks.iter().map(|s| s.id))
    }
}

/// One past the largest of `ids`, or 1 when there are none. `None` once
/// `i64::MAX` is taken.
pub(crate) fn next_id(ids: impl Iterator<Item = i64>) -> Option<i64> {
    match ids.max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Read-only copy of the whole board, handed to rendering collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub meeting: Meeting,
    pub goals: Vec<Goal>,
}

/// Caller-supplied defaults for a goal created through `add_goal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub name: String,
    pub description: String,
}

impl Default for NewGoal {
    fn default() -> Self {
        Self {
            name: "New Goal".to_string(),
            description: String::new(),
        }
    }
}

/// Assignees as an editor supplies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssigneeInput {
    /// Already split into names.
    List(Vec<String>),
    /// A single comma-delimited string, e.g. `"Ana, Bo,,Cy"`.
    Raw(String),
}

impl AssigneeInput {
    /// Trim every name and drop empties. Order is kept; duplicates are not
    /// removed.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            AssigneeInput::List(names) => clean_names(names.iter().map(String::as_str)),
            AssigneeInput::Raw(raw) => clean_names(raw.split(',')),
        }
    }
}

fn clean_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    names
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

/// Partial update for a goal. `None` fields are left unchanged.
///
/// Priority is kept as text so the store can reject unknown values with
/// `InvalidPriority` instead of the editor guessing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub assignees: Option<AssigneeInput>,
}

impl GoalUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.assignees.is_none()
    }
}

/// Partial update for the meeting header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingUpdate {
    pub title: Option<String>,
    /// `Some(None)` clears the date.
    pub date: Option<Option<String>>,
    pub summary: Option<String>,
}
