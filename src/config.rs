// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::model::item::{Contact, MAX_PRIORITY};
use crate::model::location::Location;
use crate::model::parser::{Vocabulary, default_priority_words};
use crate::storage::LocalStorage;
use anyhow::{Context, Error, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::{fmt, fs, io};

fn default_user_name() -> String {
    "default".to_string()
}

fn default_priority_map() -> BTreeMap<String, u8> {
    default_priority_words().into_iter().collect()
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// Owner written to every record (`UserName`).
    #[serde(default = "default_user_name")]
    pub user_name: String,
    /// Values accepted after `#`.
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Words accepted after `!`, mapped to a priority (1 is most urgent).
    #[serde(default = "default_priority_map")]
    pub priority_words: BTreeMap<String, u8>,
    /// Values accepted after `+`.
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_name: default_user_name(),
            labels: Vec::new(),
            log_level: default_log_level(),
            priority_words: default_priority_map(),
            contacts: Vec::new(),
        }
    }
}

/// No config file at the expected path. Callers usually fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigNotFound(pub PathBuf);

impl fmt::Display for ConfigNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No goteam config at {}", self.0.display())
    }
}

impl std::error::Error for ConfigNotFound {}

impl Config {
    /// Reads and parses the config file. A missing file is a `ConfigNotFound` error.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigNotFound(path).into());
            }
            Err(e) => return Err(e).with_context(|| format!("Reading {}", path.display())),
        };
        toml::from_str(&contents).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Like `load`, but a missing file yields the defaults. Broken files are still errors.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("{}, using defaults", e);
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_missing_config_error(err: &Error) -> bool {
        err.downcast_ref::<ConfigNotFound>().is_some()
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Unknown level names fall back to `warn`.
    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.trim().parse().unwrap_or(LevelFilter::Warn)
    }

    /// Extraction vocabulary from the configured words plus the known locations.
    pub fn vocabulary(&self, locations: &[Location]) -> Vocabulary {
        let priorities = self
            .priority_words
            .iter()
            .filter(|&(word, &p)| !word.trim().is_empty() && (1..=MAX_PRIORITY).contains(&p))
            .map(|(word, &p)| (word.trim().to_string(), p))
            .collect();
        Vocabulary {
            labels: self.labels.clone(),
            priorities,
            locations: locations.to_vec(),
            contacts: self.contacts.clone(),
        }
    }
}
