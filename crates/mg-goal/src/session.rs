// session.rs — SessionFile: keeps a board between CLI invocations.
//
// The board is written as one pretty-printed JSON document with the same
// shape the extraction service returns, so a saved session can be fed back
// through `mg ingest` or inspected by hand.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GoalError;
use crate::ingest;
use crate::model::BoardSnapshot;
use crate::store::GoalGraphStore;

/// JSON file holding the last saved board.
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Save a board (creates or overwrites). Creates parent directories.
    pub fn save(&self, snapshot: &BoardSnapshot) -> Result<(), GoalError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| GoalError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json).map_err(|source| GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(())
    }

    /// Load the saved board, or `None` if nothing was saved yet.
    ///
    /// The file goes through the same parser as a live extraction result.
    pub fn load(&self) -> Result<Option<BoardSnapshot>, GoalError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path).map_err(|source| GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;
        ingest::parse_result_str(&json).map(Some)
    }

    /// Load the saved board into `store`. Returns false if nothing was saved.
    pub fn restore(&self, store: &mut GoalGraphStore) -> Result<bool, GoalError> {
        match self.load()? {
            Some(snapshot) => {
                store.ingest(snapshot);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Save the store's board. A store with nothing loaded writes nothing.
    pub fn persist(&self, store: &GoalGraphStore) -> Result<(), GoalError> {
        match store.snapshot() {
            Some(snapshot) => self.save(&snapshot),
            None => Ok(()),
        }
    }

    /// Delete the saved board. Returns false if there was none.
    pub fn clear(&self) -> Result<bool, GoalError> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path).map_err(|source| GoalError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(true)
    }
}
