//! # mg-goal
//!
//! Goal board for meeting extraction results.
//!
//! An extraction service turns a meeting transcript into a meeting record
//! plus a list of goals: tasks with assignees, subtasks, priorities and
//! dependency links. This crate holds that result and edits it safely.
//!
//! ## Key components
//!
//! - [`GoalGraphStore`] — the board (Empty → Loaded) and its validated edit
//!   API; rejects dependency edges that would close a cycle
//! - [`parse_result`] — turns a service response into an [`ExtractionResult`]
//! - [`BoardEvent`] / [`EventDispatcher`] / [`NotificationSink`] — change
//!   notifications for views
//! - [`SessionFile`] — JSON persistence between CLI runs
//! - [`BoardConfig`] / [`BoardSettings`] — `.mg/` layout and defaults

pub mod config;
pub mod error;
pub mod events;
pub mod graph;
pub mod ingest;
pub mod model;
pub mod session;
pub mod store;

pub use config::{BoardConfig, BoardSettings};
pub use error::GoalError;
pub use events::{BoardChange, BoardEvent, EventDispatcher, LogSink, MemorySink, NotificationSink};
pub use graph::IntegrityIssue;
pub use ingest::{parse_result, parse_result_str, ExtractionResult};
pub use model::{
    AssigneeInput, BoardSnapshot, Goal, GoalId, GoalUpdate, Meeting, MeetingUpdate, NewGoal,
    Priority, Subtask, SubtaskId,
};
pub use session::SessionFile;
pub use store::{GoalGraphStore, StoreState};
