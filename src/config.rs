// Copyright 2023 Remi Bernotavicius

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const DEFAULT_DATABASE_FILE_NAME: &str = "data.sqlite";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Relative paths are resolved against the data directory.
    pub database_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            log_level: "info".into(),
        }
    }
}

impl Config {
    /// Reads the configuration at `path`. A missing or unreadable file gives the defaults.
    ///
    /// This runs before the logger is set up, so problems are returned as a message for the
    /// caller to log once it is.
    pub fn load(path: &Path) -> (Self, Option<String>) {
        match Self::read(path) {
            Ok(config) => (config, None),
            Err(error) => (
                Self::default(),
                Some(format!(
                    "using default configuration, couldn't read {}: {error}",
                    path.display()
                )),
            ),
        }
    }

    fn read(path: &Path) -> crate::Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        match &self.database_path {
            Some(path) => data_dir.join(path),
            None => data_dir.join(DEFAULT_DATABASE_FILE_NAME),
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
