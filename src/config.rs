use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::advice;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub highscore_file: PathBuf,
    pub advice_url: String,
    pub advice_timeout_secs: u64,
    /// Logs go to a file because the terminal is the game surface.
    pub log_file: PathBuf,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            highscore_file: PathBuf::from("highscore.txt"),
            advice_url: advice::DEFAULT_URL.to_string(),
            advice_timeout_secs: 5,
            log_file: PathBuf::from("dodge-tui.log"),
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn advice_timeout(&self) -> Duration {
        Duration::from_secs(self.advice_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dodge.toml");
        fs::write(&path, "highscore_file = \"/tmp/best.txt\"\nseed = 7\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.highscore_file, PathBuf::from("/tmp/best.txt"));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.advice_url, advice::DEFAULT_URL);
        assert_eq!(config.advice_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn bad_toml_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dodge.toml");
        fs::write(&path, "advice_timeout_secs = \"soon\"").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("dodge.toml"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
