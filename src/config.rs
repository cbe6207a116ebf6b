use crate::error::AtatError;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Repositories,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Repositories => "repositories",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[ConfigKey::Repositories]
    }
}

pub type Config = HashMap<ConfigKey, Value>;

/// Filename for the project-specific configuration within the .atat directory.
pub const PROJECT_CONFIG_FILENAME: &str = "config.json";
/// Directory name for project-specific configuration.
pub const PROJECT_CONFIG_DIR: &str = ".atat";

/// Parses a JSON configuration file content into a map of configuration values.
///
/// Expects `content` to be a JSON object with configuration keys
/// (e.g., {"repositories": [...], ...}). Unknown keys are dropped.
///
/// - Returns an empty map if the input `content` is empty or contains only whitespace.
/// - Returns an `Err` if the JSON is invalid or is not an object.
pub fn parse_config(content: &[u8]) -> Result<Config> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    let value: Value = serde_json::from_slice(content).context("Failed to parse config JSON")?;

    if let Value::Object(map) = &value {
        let config_map = ConfigKey::all()
            .iter()
            .filter_map(|key| map.get(key.as_str()).map(|val| (*key, val.clone())))
            .collect();
        return Ok(config_map);
    }

    Err(anyhow::anyhow!("Config must be a JSON object"))
}

/// Renders the configuration as the pretty-printed JSON object stored on disk.
pub fn serialize_config(config: &Config) -> Result<String> {
    let object: serde_json::Map<String, Value> = config
        .iter()
        .map(|(key, value)| (key.as_str().to_string(), value.clone()))
        .collect();
    serde_json::to_string_pretty(&Value::Object(object))
        .context("Failed to serialize config to JSON")
}

/// Merges `updates` into `base_config` and returns a new configuration map.
///
/// - Keys from `updates` are added to a clone of `base_config`.
/// - If a key exists in both, the value from `updates` overwrites the value in the cloned `base_config`.
pub fn update_config(base_config: &Config, updates: &Config) -> Config {
    let mut new_config = base_config.clone();
    for (key, value) in updates {
        new_config.insert(*key, value.clone());
    }
    new_config
}

/// Configured repositories in order. Entries that are not strings are skipped.
pub fn repositories(config: &Config) -> Vec<String> {
    config
        .get(&ConfigKey::Repositories)
        .and_then(Value::as_array)
        .map(|repos| {
            repos
                .iter()
                .filter_map(|repo| repo.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// The repository push and pull operate on.
pub fn first_repository(config: &Config) -> Result<String, AtatError> {
    let first = config
        .get(&ConfigKey::Repositories)
        .and_then(Value::as_array)
        .and_then(|repos| repos.first())
        .ok_or(AtatError::NoRepositoryConfigured)?;

    first
        .as_str()
        .map(str::to_string)
        .ok_or(AtatError::InvalidRepositoryConfiguration)
}

pub fn contains_repository(config: &Config, repo: &str) -> bool {
    repositories(config).iter().any(|existing| existing == repo)
}

/// Returns a copy of `config` with `repo` appended, or unchanged if already present.
pub fn with_repository_added(config: &Config, repo: &str) -> Config {
    if contains_repository(config, repo) {
        return config.clone();
    }

    let mut repos = repositories(config);
    repos.push(repo.to_string());
    let updates = HashMap::from([(ConfigKey::Repositories, Value::from(repos))]);
    update_config(config, &updates)
}

/// Returns a copy of `config` without `repo`. The key is dropped once no repository is left.
pub fn with_repository_removed(config: &Config, repo: &str) -> Config {
    let remaining: Vec<String> = repositories(config)
        .into_iter()
        .filter(|existing| existing != repo)
        .collect();

    let mut new_config = config.clone();
    if remaining.is_empty() {
        new_config.remove(&ConfigKey::Repositories);
    } else {
        new_config.insert(ConfigKey::Repositories, Value::from(remaining));
    }
    new_config
}
