//! Typed per-rule configuration.
//!
//! Rule tables arrive as free-form TOML in [`crate::config::Config`]; this
//! module deserializes them into each rule's config struct, going through
//! serde_json values so rules only declare plain derive structs.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Trait for rule configurations
pub trait RuleConfig: Serialize + DeserializeOwned + Default + Clone {
    /// The rule name (e.g., "MD115")
    const RULE_NAME: &'static str;
}

/// Load a rule's configuration from the global config, falling back to
/// defaults when the table is absent or does not fit the struct.
pub fn load_rule_config<T: RuleConfig>(config: &crate::config::Config) -> T {
    config
        .rules
        .get(T::RULE_NAME)
        .and_then(|rule_config| serde_json::to_value(&rule_config.values).ok())
        .and_then(|json_value| serde_json::from_value(json_value).ok())
        .unwrap_or_default()
}

/// Convert a JSON value to a TOML value for default config generation
pub fn json_to_toml_value(json_val: &serde_json::Value) -> Option<toml::Value> {
    serde_json::from_value(json_val.clone()).ok()
}
