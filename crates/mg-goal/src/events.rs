// events.rs — Change notifications for board views.
//
// The store emits one BoardEvent after every successful mutation. Views
// (card grid, goal table, dependency graph) subscribe through a
// NotificationSink and re-render on receipt; the events log sink keeps a
// JSONL trail of edits.
//
// Dispatch is synchronous: by the time a mutating call returns, every sink
// has seen its event. Failed operations emit nothing.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GoalError;
use crate::model::{GoalId, SubtaskId};

/// What changed on the board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum BoardChange {
    /// A new extraction result replaced the whole board.
    Ingested { meeting_id: i64, goal_count: usize },

    /// The meeting header was edited.
    MeetingUpdated { meeting_id: i64 },

    GoalAdded { goal_id: GoalId },

    /// A goal was removed. `unlinked` lists the goals whose dependency
    /// sets pointed at it and were cleaned up.
    GoalRemoved {
        goal_id: GoalId,
        unlinked: Vec<GoalId>,
    },

    GoalUpdated { goal_id: GoalId },

    SubtaskAdded {
        goal_id: GoalId,
        subtask_id: SubtaskId,
    },

    SubtaskUpdated {
        goal_id: GoalId,
        subtask_id: SubtaskId,
    },

    SubtaskRemoved {
        goal_id: GoalId,
        subtask_id: SubtaskId,
    },

    DependencyAdded {
        goal_id: GoalId,
        dependency_id: GoalId,
    },

    DependencyRemoved {
        goal_id: GoalId,
        dependency_id: GoalId,
    },
}

impl BoardChange {
    /// Get the event type name as a string.
    pub fn event_type(&self) -> &str {
        match self {
            BoardChange::Ingested { .. } => "ingested",
            BoardChange::MeetingUpdated { .. } => "meeting_updated",
            BoardChange::GoalAdded { .. } => "goal_added",
            BoardChange::GoalRemoved { .. } => "goal_removed",
            BoardChange::GoalUpdated { .. } => "goal_updated",
            BoardChange::SubtaskAdded { .. } => "subtask_added",
            BoardChange::SubtaskUpdated { .. } => "subtask_updated",
            BoardChange::SubtaskRemoved { .. } => "subtask_removed",
            BoardChange::DependencyAdded { .. } => "dependency_added",
            BoardChange::DependencyRemoved { .. } => "dependency_removed",
        }
    }

    /// True if the dependency graph view needs to be redrawn, not just the
    /// goal cards.
    pub fn affects_graph(&self) -> bool {
        !matches!(
            self,
            BoardChange::MeetingUpdated { .. }
                | BoardChange::SubtaskAdded { .. }
                | BoardChange::SubtaskUpdated { .. }
                | BoardChange::SubtaskRemoved { .. }
        )
    }
}

/// A change plus when it happened, as delivered to sinks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardEvent {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub change: BoardChange,
}

impl BoardEvent {
    pub fn new(change: BoardChange) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            change,
        }
    }

    pub fn event_type(&self) -> &str {
        self.change.event_type()
    }
}

/// Receives board events.
///
/// Implementations decide what a refresh means: redraw a view, append to
/// a log, forward to another process.
pub trait NotificationSink: Send {
    /// Handle an event. Errors are logged but don't stop the dispatch.
    fn send(&self, event: &BoardEvent) -> Result<(), GoalError>;
}

/// Appends events as JSONL to a file, one line per event.
///
/// The parent directory is created on first use, so a fresh project can
/// point the sink at `.mg/events.jsonl` before anything else exists.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(path: &Path, source: std::io::Error) -> GoalError {
        GoalError::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}

impl NotificationSink for LogSink {
    fn send(&self, event: &BoardEvent) -> Result<(), GoalError> {
        // A serialization failure leaves the file untouched.
        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| Self::io_error(dir, e))?;
        }

        // Single append per event.
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|e| Self::io_error(&self.path, e))
    }
}

/// Collects events in memory. Clones share the same buffer, so a view can
/// keep one handle and give the other to the store.
#[derive(Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<BoardEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every event received so far, leaving the buffer empty.
    pub fn drain(&self) -> Vec<BoardEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for MemorySink {
    fn send(&self, event: &BoardEvent) -> Result<(), GoalError> {
        self.events
            .lock()
            .map_err(|e| GoalError::NotificationError(e.to_string()))?
            .push(event.clone());
        Ok(())
    }
}

/// Fans each board event out to every subscribed sink, in subscription
/// order. A failing sink is logged and skipped; the rest still receive the
/// event and the mutation that produced it stands.
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver `event` and return how many sinks accepted it.
    pub fn dispatch(&self, event: &BoardEvent) -> usize {
        let mut delivered = 0;
        for sink in &self.sinks {
            match sink.send(event) {
                Ok(()) => delivered += 1,
                Err(e) => tracing::warn!(
                    event_type = event.event_type(),
                    event_id = %event.event_id,
                    error = %e,
                    "board event not delivered"
                ),
            }
        }
        tracing::debug!(
            event_type = event.event_type(),
            delivered,
            sinks = self.sinks.len(),
            "board event dispatched"
        );
        delivered
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
