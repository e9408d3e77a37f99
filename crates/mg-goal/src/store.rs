// store.rs — GoalGraphStore: the board's single source of truth.
//
// The store holds the current meeting and its goals and is the only thing
// allowed to change them. Every mutation validates first and applies second,
// so an error leaves the board exactly as it was. After each successful
// mutation the store dispatches a BoardEvent so views can refresh.
//
// Lifecycle:
//   Empty --ingest--> Loaded --ingest--> Loaded
// Edits and derived queries need Loaded; ingest is valid from either state.

use std::fmt;

use crate::error::GoalError;
use crate::events::{BoardChange, BoardEvent, EventDispatcher, NotificationSink};
use crate::graph::{self, IntegrityIssue};
use crate::ingest::{self, ExtractionResult};
use crate::model::{
    self, BoardSnapshot, Goal, GoalId, GoalUpdate, Meeting, MeetingUpdate, NewGoal, Priority, Subtask,
    SubtaskId, UNASSIGNED,
};

/// Name given to subtasks created without one.
pub const SUBTASK_PLACEHOLDER: &str = "New subtask";

/// Store lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreState {
    /// Nothing ingested yet.
    Empty,
    /// A meeting and its goals are loaded.
    Loaded(BoardSnapshot),
}

impl fmt::Display for StoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreState::Empty => write!(f, "empty"),
            StoreState::Loaded(_) => write!(f, "loaded"),
        }
    }
}

/// Holds the meeting and goals and enforces their invariants.
///
/// Views get read-only access (`goals()`, `snapshot()`); every change goes
/// through a method here.
pub struct GoalGraphStore {
    state: StoreState,
    dispatcher: EventDispatcher,
    subtask_placeholder: String,
}

impl GoalGraphStore {
    /// Create an empty store with no sinks.
    pub fn new() -> Self {
        Self {
            state: StoreState::Empty,
            dispatcher: EventDispatcher::new(),
            subtask_placeholder: SUBTASK_PLACEHOLDER.to_string(),
        }
    }

    /// Use `dispatcher` for change notifications.
    pub fn with_dispatcher(mut self, dispatcher: EventDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Name new subtasks `name` instead of the built-in placeholder.
    pub fn with_subtask_placeholder(mut self, name: impl Into<String>) -> Self {
        self.subtask_placeholder = name.into();
        self
    }

    /// Subscribe a sink to change notifications.
    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.dispatcher.add_sink(sink);
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, StoreState::Loaded(_))
    }

    // ── Ingestion ────────────────────────────────────────────────

    /// Replace the board with a freshly extracted result.
    ///
    /// The result is taken as given: dependency ids are not checked against
    /// the batch and acyclicity is not re-verified. Problems found in the
    /// data are logged as warnings only.
    pub fn ingest(&mut self, result: ExtractionResult) {
        for issue in graph::integrity_issues(&result.goals) {
            tracing::warn!(meeting_id = result.meeting.id, "ingested data: {}", issue);
        }

        let change = BoardChange::Ingested {
            meeting_id: result.meeting.id,
            goal_count: result.goals.len(),
        };
        tracing::info!(
            meeting_id = result.meeting.id,
            goals = result.goals.len(),
            "board ingested"
        );
        self.state = StoreState::Loaded(result);
        self.notify(change);
    }

    /// Parse a response body and ingest it. On `InvalidResult` the current
    /// board is kept.
    pub fn ingest_value(&mut self, body: &serde_json::Value) -> Result<(), GoalError> {
        let result = ingest::parse_result(body).inspect_err(|e| {
            tracing::warn!("rejected extraction result: {}", e);
        })?;
        self.ingest(result);
        Ok(())
    }

    // ── Read access ──────────────────────────────────────────────

    /// A copy of the whole board, or `None` before the first ingest.
    pub fn snapshot(&self) -> Option<BoardSnapshot> {
        match &self.state {
            StoreState::Empty => None,
            StoreState::Loaded(board) => Some(board.clone()),
        }
    }

    pub fn meeting(&self) -> Option<&Meeting> {
        match &self.state {
            StoreState::Empty => None,
            StoreState::Loaded(board) => Some(&board.meeting),
        }
    }

    /// Goals in display order. Empty before the first ingest.
    pub fn goals(&self) -> &[Goal] {
        match &self.state {
            StoreState::Empty => &[],
            StoreState::Loaded(board) => &board.goals,
        }
    }

    pub fn goal(&self, goal_id: GoalId) -> Option<&Goal> {
        self.goals().iter().find(|g| g.id == goal_id)
    }

    // ── Meeting edits ────────────────────────────────────────────

    /// Edit the meeting header.
    pub fn update_meeting(&mut self, update: MeetingUpdate) -> Result<(), GoalError> {
        let board = self.board_mut()?;
        let meeting = &mut board.meeting;
        if let Some(title) = update.title {
            meeting.title = title;
        }
        if let Some(date) = update.date {
            meeting.date = date;
        }
        if let Some(summary) = update.summary {
            meeting.summary = summary;
        }
        let meeting_id = meeting.id;
        self.notify(BoardChange::MeetingUpdated { meeting_id });
        Ok(())
    }

    // ── Goal edits ───────────────────────────────────────────────

    /// Append a new goal built from `defaults`.
    ///
    /// The goal gets the next free id, Medium priority, a single
    /// "Unassigned" assignee, no subtasks and no dependencies.
    pub fn add_goal(&mut self, defaults: NewGoal) -> Result<Goal, GoalError> {
        let board = self.board_mut()?;
        let id = model::next_id(board.goals.iter().map(|g| g.id))
            .ok_or(GoalError::IdsExhausted("goal"))?;
        let goal = Goal {
            id,
            name: defaults.name,
            description: defaults.description,
            priority: Priority::Medium,
            assignees: vec![UNASSIGNED.to_string()],
            subtasks: Vec::new(),
            dependencies: Default::default(),
            meeting_id: board.meeting.id,
        };
        board.goals.push(goal.clone());

        tracing::info!(goal_id = id, "goal added");
        self.notify(BoardChange::GoalAdded { goal_id: id });
        Ok(goal)
    }

    /// Remove a goal and every dependency edge pointing at it.
    pub fn remove_goal(&mut self, goal_id: GoalId) -> Result<(), GoalError> {
        let board = self.board_mut()?;
        let pos = board
            .goals
            .iter()
            .position(|g| g.id == goal_id)
            .ok_or(GoalError::GoalNotFound(goal_id))?;
        board.goals.remove(pos);

        let mut unlinked = Vec::new();
        for goal in &mut board.goals {
            if goal.dependencies.remove(&goal_id) {
                unlinked.push(goal.id);
            }
        }

        tracing::info!(goal_id, unlinked = unlinked.len(), "goal removed");
        self.notify(BoardChange::GoalRemoved { goal_id, unlinked });
        Ok(())
    }

    /// Apply a partial update to a goal.
    ///
    /// The priority is parsed before anything is written, so an invalid
    /// value leaves every field untouched.
    pub fn update_goal(&mut self, goal_id: GoalId, update: GoalUpdate) -> Result<(), GoalError> {
        let board = self.board_mut()?;
        let goal = find_goal_mut(&mut board.goals, goal_id)?;

        let priority = update
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?;

        if let Some(name) = update.name {
            goal.name = name;
        }
        if let Some(description) = update.description {
            goal.description = description;
        }
        if let Some(priority) = priority {
            goal.priority = priority;
        }
        if let Some(assignees) = update.assignees {
            goal.assignees = assignees.normalize();
        }

        tracing::info!(goal_id, "goal updated");
        self.notify(BoardChange::GoalUpdated { goal_id });
        Ok(())
    }

    // ── Subtask edits ────────────────────────────────────────────

    /// Append a placeholder subtask to a goal.
    pub fn add_subtask(&mut self, goal_id: GoalId) -> Result<Subtask, GoalError> {
        let placeholder = self.subtask_placeholder.clone();
        self.add_named_subtask(goal_id, placeholder)
    }

    /// Append a subtask called `name` to a goal.
    pub fn add_named_subtask(
        &mut self,
        goal_id: GoalId,
        name: impl Into<String>,
    ) -> Result<Subtask, GoalError> {
        let board = self.board_mut()?;
        let goal = find_goal_mut(&mut board.goals, goal_id)?;
        let subtask = Subtask {
            id: goal
                .next_subtask_id()
                .ok_or(GoalError::IdsExhausted("subtask"))?,
            name: name.into(),
        };
        goal.subtasks.push(subtask.clone());

        tracing::info!(goal_id, subtask_id = subtask.id, "subtask added");
        self.notify(BoardChange::SubtaskAdded {
            goal_id,
            subtask_id: subtask.id,
        });
        Ok(subtask)
    }

    /// Rename a subtask.
    pub fn update_subtask(
        &mut self,
        goal_id: GoalId,
        subtask_id: SubtaskId,
        name: impl Into<String>,
    ) -> Result<(), GoalError> {
        let board = self.board_mut()?;
        let goal = find_goal_mut(&mut board.goals, goal_id)?;
        let subtask = goal
            .subtasks
            .iter_mut()
            .find(|s| s.id == subtask_id)
            .ok_or(GoalError::SubtaskNotFound {
                goal_id,
                subtask_id,
            })?;
        subtask.name = name.into();

        self.notify(BoardChange::SubtaskUpdated {
            goal_id,
            subtask_id,
        });
        Ok(())
    }

    pub fn remove_subtask(
        &mut self,
        goal_id: GoalId,
        subtask_id: SubtaskId,
    ) -> Result<(), GoalError> {
        let board = self.board_mut()?;
        let goal = find_goal_mut(&mut board.goals, goal_id)?;
        let pos = goal
            .subtasks
            .iter()
            .position(|s| s.id == subtask_id)
            .ok_or(GoalError::SubtaskNotFound {
                goal_id,
                subtask_id,
            })?;
        goal.subtasks.remove(pos);

        self.notify(BoardChange::SubtaskRemoved {
            goal_id,
            subtask_id,
        });
        Ok(())
    }

    // ── Dependency edits ─────────────────────────────────────────

    /// Make `goal_id` depend on `dependency_id`.
    ///
    /// Checks run in order and the first failure wins: both goals exist,
    /// the ids differ, the edge is new (`DuplicateDependency` is a soft
    /// no-op), and the edge does not close a cycle.
    pub fn add_dependency(
        &mut self,
        goal_id: GoalId,
        dependency_id: GoalId,
    ) -> Result<(), GoalError> {
        let board = self.board_mut()?;
        let goal = board
            .goals
            .iter()
            .find(|g| g.id == goal_id)
            .ok_or(GoalError::GoalNotFound(goal_id))?;
        if !board.goals.iter().any(|g| g.id == dependency_id) {
            return Err(GoalError::GoalNotFound(dependency_id));
        }
        if goal_id == dependency_id {
            return Err(GoalError::SelfDependency(goal_id));
        }
        if goal.depends_on(dependency_id) {
            return Err(GoalError::DuplicateDependency {
                goal_id,
                dependency_id,
            });
        }
        if graph::would_create_cycle(&board.goals, goal_id, dependency_id) {
            tracing::warn!(goal_id, dependency_id, "rejected circular dependency");
            return Err(GoalError::CircularDependency {
                goal_id,
                dependency_id,
            });
        }

        find_goal_mut(&mut board.goals, goal_id)?
            .dependencies
            .insert(dependency_id);

        tracing::info!(goal_id, dependency_id, "dependency added");
        self.notify(BoardChange::DependencyAdded {
            goal_id,
            dependency_id,
        });
        Ok(())
    }

    pub fn remove_dependency(
        &mut self,
        goal_id: GoalId,
        dependency_id: GoalId,
    ) -> Result<(), GoalError> {
        let board = self.board_mut()?;
        let goal = find_goal_mut(&mut board.goals, goal_id)?;
        if !goal.dependencies.remove(&dependency_id) {
            return Err(GoalError::DependencyNotFound {
                goal_id,
                dependency_id,
            });
        }

        tracing::info!(goal_id, dependency_id, "dependency removed");
        self.notify(BoardChange::DependencyRemoved {
            goal_id,
            dependency_id,
        });
        Ok(())
    }

    // ── Derived queries ──────────────────────────────────────────

    /// Distinct assignee names across all goals, in first-seen order.
    pub fn all_assignees(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for goal in self.goals() {
            for assignee in &goal.assignees {
                if !names.contains(assignee) {
                    names.push(assignee.clone());
                }
            }
        }
        names
    }

    pub fn goals_for_assignee(&self, name: &str) -> Vec<&Goal> {
        self.goals().iter().filter(|g| g.has_assignee(name)).collect()
    }

    /// Goals that `goal_id` depends on. Ids with no matching goal are
    /// skipped; an unknown `goal_id` yields an empty list.
    pub fn dependencies_of(&self, goal_id: GoalId) -> Vec<&Goal> {
        let Some(goal) = self.goal(goal_id) else {
            return Vec::new();
        };
        goal.dependencies
            .iter()
            .filter_map(|&dep| self.goal(dep))
            .collect()
    }

    /// Goals that depend on `goal_id`, in display order.
    pub fn dependents_of(&self, goal_id: GoalId) -> Vec<&Goal> {
        self.goals()
            .iter()
            .filter(|g| g.depends_on(goal_id))
            .collect()
    }

    /// Goal ids with dependencies before dependents.
    pub fn execution_order(&self) -> Result<Vec<GoalId>, GoalError> {
        graph::execution_order(self.goals())
    }

    /// Consistency problems in the current data. Only ingested data can
    /// have any.
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        graph::integrity_issues(self.goals())
    }

    // ── Internals ────────────────────────────────────────────────

    fn board_mut(&mut self) -> Result<&mut BoardSnapshot, GoalError> {
        match &mut self.state {
            StoreState::Empty => Err(GoalError::NoMeetingLoaded),
            StoreState::Loaded(board) => Ok(board),
        }
    }

    fn notify(&self, change: BoardChange) {
        self.dispatcher.dispatch(&BoardEvent::new(change));
    }
}

impl Default for GoalGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

fn find_goal_mut(goals: &mut [Goal], goal_id: GoalId) -> Result<&mut Goal, GoalError> {
    goals
        .iter_mut()
        .find(|g| g.id == goal_id)
        .ok_or(GoalError::GoalNotFound(goal_id))
}
