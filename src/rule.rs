//!
//! Defines the Rule trait and the types rules produce: warnings, fixes,
//! errors, and the inline comment handling for enabling/disabling rules.

use serde::Serialize;
use std::ops::Range;
use thiserror::Error;

use crate::lint_context::LintContext;

#[derive(Debug, Error)]
pub enum LintError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Fix failed: {0}")]
    FixFailed(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parsing error: {0}")]
    ParsingError(String),
}

pub type LintResult = Result<Vec<LintWarning>, LintError>;

/// One reported violation. Line and column are 1-indexed.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct LintWarning {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub severity: Severity,
    pub fix: Option<Fix>,
    pub rule_name: Option<&'static str>,
}

/// A replacement over a byte range of the original content.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct Fix {
    pub range: Range<usize>,
    pub replacement: String,
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Type of rule for selective processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCategory {
    Heading,
    List,
    CodeBlock,
    Link,
    Image,
    Html,
    Whitespace,
    Other,
}

pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;

    fn check(&self, ctx: &LintContext) -> LintResult;

    /// Return the content with this rule's violations repaired. Rules that
    /// cannot repair anything return the content unchanged.
    fn fix(&self, ctx: &LintContext) -> Result<String, LintError>;

    /// Cheap pre-check so documents without relevant elements skip the rule.
    fn should_skip(&self, _ctx: &LintContext) -> bool {
        false
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Other
    }

    fn as_any(&self) -> &dyn std::any::Any;

    /// Rule name plus default config table, for rules that carry config.
    fn default_config_section(&self) -> Option<(String, toml::Value)> {
        None
    }

    /// Factory: create a rule from config (if present), or use defaults.
    fn from_config(_config: &crate::config::Config) -> Box<dyn Rule>
    where
        Self: Sized,
    {
        panic!(
            "from_config not implemented for rule: {}",
            std::any::type_name::<Self>()
        );
    }
}

/// A `<!-- kebablint-disable ... -->` style toggle found on a line.
/// `true` disables, `false` re-enables; the list is empty for the global form.
fn parse_toggle(line: &str) -> Option<(bool, Vec<&str>)> {
    const MARKERS: [(&str, bool); 4] = [
        ("<!-- kebablint-disable", true),
        ("<!-- markdownlint-disable", true),
        ("<!-- kebablint-enable", false),
        ("<!-- markdownlint-enable", false),
    ];

    let start = line.find("<!--")?;
    let comment = &line[start..];
    for (prefix, disables) in MARKERS {
        if let Some(rest) = comment.strip_prefix(prefix) {
            let end = rest.find("-->").unwrap_or(rest.len());
            let rules: Vec<&str> = rest[..end].split_whitespace().collect();
            return Some((disables, rules));
        }
    }
    None
}

/// Check if a rule is disabled at a specific line via inline comments.
/// `line_num` is a 0-based line index; toggles on that line still apply.
pub fn is_rule_disabled_at_line(content: &str, rule_name: &str, line_num: usize) -> bool {
    let mut disabled = false;

    for line in content.lines().take(line_num + 1) {
        if let Some((disables, rules)) = parse_toggle(line) {
            if rules.is_empty() || rules.contains(&rule_name) {
                disabled = disables;
            }
        }
    }

    disabled
}

/// Check if a rule is disabled anywhere up to the end of the content.
pub fn is_rule_disabled_by_comment(content: &str, rule_name: &str) -> bool {
    is_rule_disabled_at_line(content, rule_name, content.lines().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_disable_applies_to_later_lines() {
        let content = "line one\n<!-- kebablint-disable -->\nline three";
        assert!(!is_rule_disabled_at_line(content, "MD115", 0));
        assert!(is_rule_disabled_at_line(content, "MD115", 1));
        assert!(is_rule_disabled_at_line(content, "MD115", 2));
    }

    #[test]
    fn rule_specific_disable_only_affects_named_rule() {
        let content = "<!-- kebablint-disable MD115 -->\ntext";
        assert!(is_rule_disabled_at_line(content, "MD115", 1));
        assert!(!is_rule_disabled_at_line(content, "MD999", 1));
    }

    #[test]
    fn enable_comment_reverses_disable() {
        let content = "<!-- kebablint-disable MD115 -->\nmid\n<!-- kebablint-enable MD115 -->\nafter";
        assert!(is_rule_disabled_at_line(content, "MD115", 1));
        assert!(!is_rule_disabled_at_line(content, "MD115", 3));
    }

    #[test]
    fn markdownlint_spelling_is_accepted() {
        let content = "<!-- markdownlint-disable MD115 -->\ntext";
        assert!(is_rule_disabled_at_line(content, "MD115", 1));
        assert!(is_rule_disabled_by_comment(content, "MD115"));
    }

    #[test]
    fn toggle_after_text_on_same_line_counts() {
        let content = "Some text <!-- kebablint-disable -->\nnext";
        assert!(is_rule_disabled_at_line(content, "MD115", 1));
    }
}
