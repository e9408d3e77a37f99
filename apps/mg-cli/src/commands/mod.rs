// mod.rs — Shared plumbing for board subcommands.
//
// Every command opens the saved board, runs one operation through the
// store, and saves the board again if the operation succeeded.

pub mod board;
pub mod dep;
pub mod goal;
pub mod subtask;
pub mod team;

use mg_goal::{BoardConfig, BoardSettings, Goal, GoalGraphStore, LogSink, SessionFile};

/// The saved board for one project, opened for a single command.
pub struct Board {
    pub store: GoalGraphStore,
    pub settings: BoardSettings,
    session: SessionFile,
}

impl Board {
    /// Load settings and the saved board; attach the events log.
    pub fn open(config: &BoardConfig) -> anyhow::Result<Self> {
        let mut board = Self::unrestored(config)?;
        board.session.restore(&mut board.store)?;
        // Attached after restore so reopening the board isn't logged as an ingest.
        board.attach_log(config);
        Ok(board)
    }

    /// Like `open`, but ignore the saved board. For commands that replace it
    /// wholesale, so an unreadable session file can't block them.
    pub fn open_fresh(config: &BoardConfig) -> anyhow::Result<Self> {
        let mut board = Self::unrestored(config)?;
        board.attach_log(config);
        Ok(board)
    }

    fn unrestored(config: &BoardConfig) -> anyhow::Result<Self> {
        let settings = config.settings()?;
        let store =
            GoalGraphStore::new().with_subtask_placeholder(settings.defaults.subtask_name.clone());
        Ok(Self {
            store,
            settings,
            session: SessionFile::new(&config.session_file),
        })
    }

    fn attach_log(&mut self, config: &BoardConfig) {
        self.store.add_sink(Box::new(LogSink::new(&config.events_log)));
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.session.persist(&self.store)?;
        Ok(())
    }
}

/// `#id: name`, with the name cut to `max` characters.
pub fn goal_label(goal: &Goal, max: usize) -> String {
    format!("#{}: {}", goal.id, truncate(&goal.name, max))
}

/// Cut `s` to at most `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
