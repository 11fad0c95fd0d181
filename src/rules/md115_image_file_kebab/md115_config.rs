use crate::rule_config_serde::RuleConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MD115Config {
    /// Also check absolute http(s) image URLs
    #[serde(default)]
    pub check_external: bool,

    /// Exact file names (with extension) exempt from the check
    #[serde(default)]
    pub ignored_names: Vec<String>,
}

impl RuleConfig for MD115Config {
    const RULE_NAME: &'static str = "MD115";
}
