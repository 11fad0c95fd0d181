//!
//! Configuration loading for kebablint: the `[global]` table plus per-rule
//! tables from `.kebablint.toml` / `kebablint.toml`, with key normalization
//! so `[md115]` and `[MD115]` both address the same rule.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::rules;

/// Config file names searched in the working directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &[".kebablint.toml", "kebablint.toml"];

/// Normalizes configuration keys: rule names (`md115`) are uppercased,
/// everything else becomes lowercase kebab-case.
pub fn normalize_key(key: &str) -> String {
    if key.len() == 5
        && key.to_ascii_lowercase().starts_with("md")
        && key[2..].chars().all(|c| c.is_ascii_digit())
    {
        key.to_ascii_uppercase()
    } else {
        key.replace('_', "-").to_ascii_lowercase()
    }
}

/// Free-form values of one rule's config table
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RuleConfig {
    #[serde(flatten)]
    pub values: BTreeMap<String, toml::Value>,
}

/// The complete configuration loaded from a config file
#[derive(Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,

    #[serde(flatten)]
    pub rules: BTreeMap<String, RuleConfig>,
}

/// Global configuration options
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// When non-empty, only these rules run
    pub enable: Vec<String>,

    /// Rules to switch off
    pub disable: Vec<String>,

    /// Files to exclude (glob patterns)
    pub exclude: Vec<String>,

    /// Files to include (glob patterns, discovery mode only)
    pub include: Vec<String>,

    /// Respect .gitignore files when scanning directories
    pub respect_gitignore: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            enable: Vec::new(),
            disable: Vec::new(),
            exclude: Vec::new(),
            include: Vec::new(),
            respect_gitignore: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: Box<toml::de::Error>,
    },
    #[error("config file already exists: {path}")]
    AlreadyExists { path: String },
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Load configuration from `path`, or search the working directory for the
/// well-known file names. No file at all is not an error: defaults apply.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return load_from_file(path);
    }
    for name in CONFIG_FILE_NAMES {
        if Path::new(name).exists() {
            return load_from_file(name);
        }
    }
    log::debug!("no config file found, using defaults");
    Ok(Config::default())
}

fn load_from_file(path: &str) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_config(&content, path)
}

fn parse_config(content: &str, path: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source: Box::new(source),
    })?;

    // Rule tables may be written in any case
    config.rules = config
        .rules
        .into_iter()
        .map(|(key, value)| (normalize_key(&key), value))
        .collect();

    Ok(config)
}

/// Fetch one typed value out of a rule's config table
pub fn get_rule_config_value<T: DeserializeOwned>(
    config: &Config,
    rule_name: &str,
    key: &str,
) -> Option<T> {
    config
        .rules
        .get(rule_name)?
        .values
        .get(key)
        .and_then(|value| T::deserialize(value.clone()).ok())
}

/// The commented template written by `kebablint init`
pub fn default_config_content() -> String {
    let mut content = String::from(
        "# kebablint configuration\n\
         \n\
         [global]\n\
         # Only run these rules (empty = all)\n\
         enable = []\n\
         # Switch rules off\n\
         disable = []\n\
         # Extra include/exclude glob patterns\n\
         include = []\n\
         exclude = []\n\
         respect_gitignore = true\n",
    );

    for rule in rules::all_rules(&Config::default()) {
        if let Some((name, value)) = rule.default_config_section() {
            if let Ok(table) = toml::to_string(&value) {
                content.push_str(&format!("\n[{name}]\n{table}"));
            }
        }
    }

    content
}

/// Create a default configuration file at the specified path
pub fn create_default_config(path: &str) -> Result<(), ConfigError> {
    if Path::new(path).exists() {
        return Err(ConfigError::AlreadyExists {
            path: path.to_string(),
        });
    }
    fs::write(path, default_config_content()).map_err(|source| ConfigError::Write {
        path: path.to_string(),
        source,
    })
}
