//! Best score persisted as decimal text.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable files count as a high score of 0.
    pub fn load(&self) -> u32 {
        match fs::read_to_string(&self.path) {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                debug!(path = %self.path.display(), "high score file is not a number");
                0
            }),
            Err(_) => 0,
        }
    }

    /// Overwrites the whole file.
    pub fn save(&self, score: u32) -> Result<()> {
        fs::write(&self.path, score.to_string())?;
        Ok(())
    }
}
