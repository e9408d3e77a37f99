// error.rs — Error types for the goal board.

use thiserror::Error;

use crate::model::{GoalId, SubtaskId};

/// Errors returned by board operations.
///
/// Every store operation checks its preconditions before touching state, so
/// an `Err` always means nothing was mutated.
#[derive(Debug, Error)]
pub enum GoalError {
    /// The extraction result was malformed or was an error response.
    #[error("invalid extraction result: {0}")]
    InvalidResult(String),

    /// An edit was attempted before any meeting was ingested.
    #[error("no meeting loaded")]
    NoMeetingLoaded,

    /// No goal with this id exists in the current collection.
    #[error("goal not found: {0}")]
    GoalNotFound(GoalId),

    /// The goal exists but has no subtask with this id.
    #[error("subtask {subtask_id} not found on goal {goal_id}")]
    SubtaskNotFound {
        goal_id: GoalId,
        subtask_id: SubtaskId,
    },

    /// The goal does not depend on the given id.
    #[error("goal {goal_id} does not depend on goal {dependency_id}")]
    DependencyNotFound {
        goal_id: GoalId,
        dependency_id: GoalId,
    },

    /// The edge already exists. The requested end state holds.
    #[error("goal {goal_id} already depends on goal {dependency_id}")]
    DuplicateDependency {
        goal_id: GoalId,
        dependency_id: GoalId,
    },

    /// A goal cannot depend on itself.
    #[error("goal {0} cannot depend on itself")]
    SelfDependency(GoalId),

    /// Adding the edge would close a cycle.
    #[error("circular dependency: goal {dependency_id} already depends on goal {goal_id} (directly or transitively)")]
    CircularDependency {
        goal_id: GoalId,
        dependency_id: GoalId,
    },

    /// The largest id in use is `i64::MAX`, so no next id exists.
    #[error("no {0} id left after {max}", max = i64::MAX)]
    IdsExhausted(&'static str),

    /// Priority text did not match High, Medium or Low.
    #[error("invalid priority `{0}`; expected High, Medium or Low")]
    InvalidPriority(String),

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize board data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The settings file could not be parsed.
    #[error("config error: {0}")]
    ConfigError(String),

    /// A notification dispatch failed (non-fatal).
    #[error("notification error: {0}")]
    NotificationError(String),
}

impl GoalError {
    /// True for outcomes that report a no-op rather than a failure.
    ///
    /// Callers may surface these as informational messages.
    pub fn is_soft(&self) -> bool {
        matches!(self, GoalError::DuplicateDependency { .. })
    }
}
