// ⚙️ Configuration - JSON file with defaults for every field
//
// Resolution order: explicit path (--config) → SPLIT_BILL_CONFIG → built-in defaults.

use crate::forms::add_friend::DEFAULT_IMAGE_TEMPLATE;
use crate::friend::{Friend, FriendId};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "SPLIT_BILL_CONFIG";

// ============================================================================
// FRIEND SEED
// ============================================================================

/// A friend present at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FriendSeed {
    pub id: String,
    pub name: String,
    /// Defaults to the configured image template + id
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub balance: f64,
}

impl FriendSeed {
    fn new(id: &str, name: &str, balance: f64) -> Self {
        FriendSeed {
            id: id.to_string(),
            name: name.to_string(),
            image: None,
            balance,
        }
    }

    pub fn to_friend(&self, image_template: &str) -> Friend {
        let image = self
            .image
            .clone()
            .unwrap_or_else(|| format!("{}{}", image_template, self.id));
        Friend::new(FriendId::new(self.id.clone()), self.name.clone(), image)
            .with_balance(self.balance)
    }
}

// ============================================================================
// SERVER CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix for new friends' avatar URLs
    pub image_template: String,

    /// Symbol shown after amounts
    pub currency: String,

    /// Friends loaded at startup, in display order
    pub friends: Vec<FriendSeed>,

    /// `EnvFilter` directive used when RUST_LOG is unset
    pub log_filter: String,

    /// TUI log destination; None means logs are dropped
    pub log_file: Option<PathBuf>,

    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            image_template: DEFAULT_IMAGE_TEMPLATE.to_string(),
            currency: "€".to_string(),
            friends: vec![
                FriendSeed::new("118836", "Clark", -7.0),
                FriendSeed::new("933372", "Sarah", 20.0),
                FriendSeed::new("499476", "Anthony", 0.0),
            ],
            log_filter: "info".to_string(),
            log_file: None,
            server: ServerConfig::default(),
        }
    }
}

impl Config {
    /// Load config from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Explicit path wins, then the environment variable, then defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(PathBuf::from(path)),
            None => Ok(Config::default()),
        }
    }

    /// Seed ids must be unique and balances finite
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for seed in &self.friends {
            if !seen.insert(seed.id.as_str()) {
                bail!("Duplicate friend id in config: {}", seed.id);
            }
            if !seed.balance.is_finite() {
                bail!("Balance for friend {} is not a finite number", seed.id);
            }
        }
        Ok(())
    }

    pub fn seed_friends(&self) -> Vec<Friend> {
        self.friends
            .iter()
            .map(|seed| seed.to_friend(&self.image_template))
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_seeds() {
        let config = Config::default();
        let friends = config.seed_friends();

        assert_eq!(friends.len(), 3);
        assert_eq!(friends[0].name, "Clark");
        assert_eq!(friends[0].balance, -7.0);
        assert_eq!(friends[0].image, "https://i.pravatar.cc/48?u=118836");
        assert_eq!(friends[1].name, "Sarah");
        assert_eq!(friends[1].balance, 20.0);
        assert_eq!(friends[2].balance, 0.0);
    }

    #[test]
    fn test_from_file_partial_uses_defaults() {
        let file = write_config(r#"{ "currency": "$", "server": { "bind": "0.0.0.0:8080" } }"#);

        let config = Config::from_file(file.path()).unwrap();

        assert_eq!(config.currency, "$");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.image_template, DEFAULT_IMAGE_TEMPLATE);
        assert_eq!(config.friends.len(), 3);
    }

    #[test]
    fn test_from_file_custom_friends() {
        let file = write_config(
            r#"{
                "image_template": "https://img.test/",
                "friends": [
                    { "id": "a", "name": "Ana", "balance": 3.5 },
                    { "id": "b", "name": "Bo", "image": "https://bo.test/me.png" }
                ]
            }"#,
        );

        let friends = Config::from_file(file.path()).unwrap().seed_friends();

        assert_eq!(friends.len(), 2);
        assert_eq!(friends[0].image, "https://img.test/a");
        assert_eq!(friends[0].balance, 3.5);
        assert_eq!(friends[1].image, "https://bo.test/me.png");
        assert_eq!(friends[1].balance, 0.0);
    }

    #[test]
    fn test_duplicate_seed_ids_rejected() {
        let file = write_config(
            r#"{ "friends": [ { "id": "a", "name": "Ana" }, { "id": "a", "name": "Al" } ] }"#,
        );

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Duplicate friend id"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = Config::load(Some(Path::new("/definitely/not/here.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_json_is_error() {
        let file = write_config("{ not json");
        assert!(Config::from_file(file.path()).is_err());
    }
}
