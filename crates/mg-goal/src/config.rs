// config.rs — Board configuration.
//
// BoardConfig fixes where a project keeps its board state: the saved
// session, the events log and the settings file, all under `.mg/` in the
// project root. BoardSettings holds the user-tunable defaults read from
// `.mg/config.toml`:
//
//   [defaults]
//   goal_name = "New Goal"
//   goal_description = ""
//   subtask_name = "New subtask"

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::model::NewGoal;
use crate::store::SUBTASK_PLACEHOLDER;

/// File layout for one project's board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Root directory of the project.
    pub project_root: PathBuf,

    /// Saved board (JSON, extraction-result shape).
    pub session_file: PathBuf,

    /// Append-only JSONL log of board changes.
    pub events_log: PathBuf,

    /// Optional TOML settings file.
    pub settings_file: PathBuf,
}

impl BoardConfig {
    /// Create a config with the standard `.mg/` layout for a project.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref().to_path_buf();
        let mg_dir = root.join(".mg");
        Self {
            project_root: root,
            session_file: mg_dir.join("session.json"),
            events_log: mg_dir.join("events.jsonl"),
            settings_file: mg_dir.join("config.toml"),
        }
    }

    /// Load the settings file, or defaults if it doesn't exist.
    pub fn settings(&self) -> Result<BoardSettings, GoalError> {
        BoardSettings::load_or_default(&self.settings_file)
    }
}

/// User-tunable settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSettings {
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Defaults for newly created goals and subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_goal_name")]
    pub goal_name: String,

    #[serde(default)]
    pub goal_description: String,

    #[serde(default = "default_subtask_name")]
    pub subtask_name: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            goal_name: default_goal_name(),
            goal_description: String::new(),
            subtask_name: default_subtask_name(),
        }
    }
}

// Serde default functions
fn default_goal_name() -> String {
    NewGoal::default().name
}

fn default_subtask_name() -> String {
    SUBTASK_PLACEHOLDER.to_string()
}

impl BoardSettings {
    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> Result<Self, GoalError> {
        toml::from_str(content).map_err(|e| GoalError::ConfigError(e.to_string()))
    }

    /// Load settings from a file.
    pub fn load(path: &Path) -> Result<Self, GoalError> {
        let content = std::fs::read_to_string(path).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load settings, returning defaults if the file doesn't exist. A file
    /// that exists but does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, GoalError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Defaults for `GoalGraphStore::add_goal`.
    pub fn new_goal(&self) -> NewGoal {
        NewGoal {
            name: self.defaults.goal_name.clone(),
            description: self.defaults.goal_description.clone(),
        }
    }
}
