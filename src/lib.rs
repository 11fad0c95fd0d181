//! kebablint — a Markdown linter that keeps image file names in
//! lowercase kebab-case (rule MD115).

pub mod config;
pub mod exit_codes;
pub mod lint_context;
pub mod rule;
pub mod rule_config_serde;
pub mod rules;

pub use crate::lint_context::LintContext;
use crate::rule::{LintResult, Rule};
use std::time::Instant;

/// Lint a document against the given rules.
/// Assumes `rules` is the final, configured, and filtered set to execute.
/// Warnings come back sorted by (line, column); a clean document yields
/// an empty vector, never an error.
pub fn lint(content: &str, rules: &[Box<dyn Rule>]) -> LintResult {
    let mut warnings = Vec::new();

    // Parse the document once, rules share the context
    let ctx = LintContext::new(content);

    for rule in rules {
        if rule.should_skip(&ctx) {
            continue;
        }

        let started = Instant::now();
        let mut rule_warnings = rule.check(&ctx)?;
        log::debug!("rule {} took {:?}", rule.name(), started.elapsed());

        // Inline <!-- kebablint-disable --> comments win over everything
        rule_warnings.retain(|warning| {
            !rule::is_rule_disabled_at_line(content, rule.name(), warning.line.saturating_sub(1))
        });

        warnings.extend(rule_warnings);
    }

    warnings.sort_by(|a, b| a.line.cmp(&b.line).then(a.column.cmp(&b.column)));

    Ok(warnings)
}
