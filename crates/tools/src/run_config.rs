//! Settings for a tools run, read from TOML.
//!
//! ```toml
//! seed = 7
//! player_name = "Mira"
//! difficulty = "Hard"
//! campaign = "tower.toml"
//!
//! [engine]
//! starting_hp = 5
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_core::{Campaign, Difficulty, EngineConfig};

use crate::high_score_file::JsonScoreStore;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub seed: u64,
    pub player_name: String,
    pub difficulty: Difficulty,
    /// Campaign TOML; the built-in demo tower when unset.
    pub campaign: Option<PathBuf>,
    /// High-score JSON file; the platform data directory when unset.
    pub high_score_path: Option<PathBuf>,
    pub engine: EngineConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            player_name: "Player".to_string(),
            difficulty: Difficulty::default(),
            campaign: None,
            high_score_path: None,
            engine: EngineConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        read_toml(path)
    }

    /// Relative campaign paths resolve against `base`, usually the config
    /// file's directory.
    pub fn campaign(&self, base: &Path) -> Result<Campaign, ConfigError> {
        match &self.campaign {
            Some(path) => read_toml(&base.join(path)),
            None => Ok(Campaign::demo()),
        }
    }

    pub fn score_path(&self) -> Option<PathBuf> {
        self.high_score_path.clone().or_else(JsonScoreStore::default_path)
    }

    /// Wall-clock time `pulses` would take at the configured difficulty.
    pub fn play_time(&self, pulses: u64) -> Duration {
        let pulses = u32::try_from(pulses).unwrap_or(u32::MAX);
        self.difficulty.pulse_interval().saturating_mul(pulses)
    }
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    toml::from_str(&text).map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })
}
