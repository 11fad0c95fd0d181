use crate::lint_context::LintContext;
use crate::rule::{LintError, LintResult, LintWarning, Rule, RuleCategory, Severity};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use url::Url;

pub mod md115_config;
use md115_config::MD115Config;

/// One or more `[a-z0-9]` groups separated by single hyphens
static KEBAB_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

/// Rule MD115: Image file names should be lowercase kebab-case
///
/// This rule is triggered when an image reference points at a file whose
/// name is not lowercase kebab-case (e.g. `MyImage.png`, `my_image.png`).
/// Remote `http(s)` targets are exempt unless `check_external` is set,
/// since third-party hosts do not follow the repository's convention.
#[derive(Clone, Default)]
pub struct MD115ImageFileKebab {
    config: MD115Config,
}

impl MD115ImageFileKebab {
    pub fn new() -> Self {
        Self {
            config: MD115Config::default(),
        }
    }

    pub fn from_config_struct(config: MD115Config) -> Self {
        Self { config }
    }

    /// The file name the image points at, or `None` when the target is
    /// outside the scope of the check (remote URL, no-file scheme).
    fn target_file_name(&self, raw_url: &str) -> Option<String> {
        let target = raw_url.trim();

        if let Ok(parsed) = Url::parse(target) {
            match parsed.scheme() {
                "http" | "https" => {
                    if !self.config.check_external {
                        return None;
                    }
                    let name = parsed
                        .path_segments()
                        .and_then(|mut segments| segments.next_back())
                        .unwrap_or("");
                    return Some(name.to_string());
                }
                // data:, mailto: and friends carry no file name to check
                _ => return None,
            }
        }

        // Protocol-relative URLs point at a remote host too
        if target.starts_with("//") && !self.config.check_external {
            return None;
        }

        // Local path: drop query/fragment, then take the last segment
        let path_part = target.split(['?', '#']).next().unwrap_or(target);
        let name = path_part.rsplit('/').next().unwrap_or(path_part);
        Some(name.to_string())
    }

    /// Conformance predicate from the rule's grammar: the stem (file name
    /// minus its final extension) splits on `-` into non-empty `[a-z0-9]+`
    /// segments. An underivable stem does not conform.
    fn is_kebab_case(file_name: &str) -> bool {
        let stem = match Path::new(file_name).file_stem().and_then(|s| s.to_str()) {
            Some(stem) if !stem.is_empty() => stem,
            _ => return false,
        };
        KEBAB_STEM.is_match(stem)
    }
}

impl Rule for MD115ImageFileKebab {
    fn name(&self) -> &'static str {
        "MD115"
    }

    fn description(&self) -> &'static str {
        "Image file names should be lowercase kebab-case"
    }

    fn check(&self, ctx: &LintContext) -> LintResult {
        let mut warnings = Vec::new();

        for image in &ctx.images {
            let Some(file_name) = self.target_file_name(&image.url) else {
                continue;
            };
            if self.config.ignored_names.iter().any(|n| n == &file_name) {
                continue;
            }
            if Self::is_kebab_case(&file_name) {
                continue;
            }

            let shown = if file_name.is_empty() {
                image.url.clone()
            } else {
                file_name
            };
            warnings.push(LintWarning {
                rule_name: Some(self.name()),
                line: image.line,
                column: image.start_col + 1,
                end_line: image.line,
                end_column: image.end_col + 1,
                message: format!("Image file name '{shown}' should be lowercase kebab-case"),
                severity: Severity::Warning,
                // Renaming the file on disk is outside the document
                fix: None,
            });
        }

        Ok(warnings)
    }

    fn fix(&self, ctx: &LintContext) -> Result<String, LintError> {
        Ok(ctx.content.to_string())
    }

    fn should_skip(&self, ctx: &LintContext) -> bool {
        ctx.images.is_empty()
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Image
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn default_config_section(&self) -> Option<(String, toml::Value)> {
        let json_value = serde_json::to_value(&self.config).ok()?;
        Some((
            self.name().to_string(),
            crate::rule_config_serde::json_to_toml_value(&json_value)?,
        ))
    }

    fn from_config(config: &crate::config::Config) -> Box<dyn Rule>
    where
        Self: Sized,
    {
        let rule_config = crate::rule_config_serde::load_rule_config::<MD115Config>(config);
        Box::new(Self::from_config_struct(rule_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint_context::LintContext;

    fn check(content: &str) -> Vec<LintWarning> {
        let rule = MD115ImageFileKebab::new();
        let ctx = LintContext::new(content);
        rule.check(&ctx).unwrap()
    }

    #[test]
    fn test_kebab_case_image_passes() {
        assert!(check("![alt](my-cool-image.png)").is_empty());
    }

    #[test]
    fn test_pascal_case_image_fails() {
        let result = check("![alt](MyCoolImage.png)");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].line, 1);
        assert_eq!(result[0].rule_name, Some("MD115"));
        assert!(result[0].message.contains("lowercase kebab-case"));
        assert!(result[0].message.contains("MyCoolImage.png"));
    }

    #[test]
    fn test_snake_case_image_fails() {
        assert_eq!(check("![alt](my_cool_image.png)").len(), 1);
    }

    #[test]
    fn test_double_hyphen_fails() {
        assert_eq!(check("![alt](my--image.png)").len(), 1);
    }

    #[test]
    fn test_leading_and_trailing_hyphen_fail() {
        assert_eq!(check("![alt](-image.png)").len(), 1);
        assert_eq!(check("![alt](image-.png)").len(), 1);
    }

    #[test]
    fn test_space_in_name_fails() {
        // Destinations with spaces need the angle-bracket form
        assert_eq!(check("![alt](<my image.png>)").len(), 1);
    }

    #[test]
    fn test_single_word_passes() {
        assert!(check("![alt](chart.png)").is_empty());
    }

    #[test]
    fn test_digits_only_segments_pass() {
        assert!(check("![alt](404.png)").is_empty());
        assert!(check("![alt](chart-2024.png)").is_empty());
    }

    #[test]
    fn test_no_extension_checked_on_stem() {
        assert!(check("![alt](diagrams/flow-chart)").is_empty());
        assert_eq!(check("![alt](diagrams/FlowChart)").len(), 1);
    }

    #[test]
    fn test_dot_in_stem_fails() {
        // Only the final extension is stripped
        assert_eq!(check("![alt](my.image.png)").len(), 1);
    }

    #[test]
    fn test_directory_prefix_is_ignored() {
        assert!(check("![alt](Assets/Sub_Dir/good-name.png)").is_empty());
        assert_eq!(check("![alt](assets/Bad_Name.png)").len(), 1);
    }

    #[test]
    fn test_empty_target_fails() {
        let result = check("![alt]()");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_query_and_fragment_are_stripped() {
        assert!(check("![alt](images/my-image.png?raw=1)").is_empty());
        assert_eq!(check("![alt](images/My_Image.png#section)").len(), 1);
    }

    #[test]
    fn test_remote_url_exempt_by_default() {
        assert!(check("![alt](https://example.com/images/Bad_Name.PNG)").is_empty());
        assert!(check("![alt](http://example.com/Bad.png)").is_empty());
    }

    #[test]
    fn test_remote_url_checked_when_configured() {
        let rule = MD115ImageFileKebab::from_config_struct(MD115Config {
            check_external: true,
            ignored_names: Vec::new(),
        });
        let ctx = LintContext::new("![alt](https://example.com/images/Bad_Name.png)");
        assert_eq!(rule.check(&ctx).unwrap().len(), 1);

        let ctx = LintContext::new("![alt](https://example.com/images/good-name.png)");
        assert!(rule.check(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_data_url_is_never_checked() {
        assert!(check("![alt](data:image/png;base64,iVBORw0KGgo=)").is_empty());
    }

    #[test]
    fn test_ignored_names_are_exempt() {
        let rule = MD115ImageFileKebab::from_config_struct(MD115Config {
            check_external: false,
            ignored_names: vec!["Legacy_Logo.png".to_string()],
        });
        let ctx = LintContext::new("![alt](assets/Legacy_Logo.png)\n![alt](assets/Other_Logo.png)");
        let result = rule.check(&ctx).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result[0].message.contains("Other_Logo.png"));
    }

    #[test]
    fn test_reference_image_checks_resolved_target() {
        let content = "![alt][logo]\n\n[logo]: assets/Logo_Final.png";
        let result = check(content);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].line, 1);
    }

    #[test]
    fn test_images_in_code_blocks_are_ignored() {
        let content = "```\n![alt](Bad_Name.png)\n```\n\nUse `![x](Also_Bad.png)` syntax";
        assert!(check(content).is_empty());
    }

    #[test]
    fn test_check_is_idempotent() {
        let rule = MD115ImageFileKebab::new();
        let ctx = LintContext::new("![a](One_Bad.png)\n![b](Two_Bad.png)");
        let first = rule.check(&ctx).unwrap();
        let second = rule.check(&ctx).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fix_returns_content_unchanged() {
        let rule = MD115ImageFileKebab::new();
        let content = "![alt](Bad_Name.png)\n";
        let ctx = LintContext::new(content);
        assert_eq!(rule.fix(&ctx).unwrap(), content);
        let result = rule.check(&ctx).unwrap();
        assert!(result[0].fix.is_none());
    }

    #[test]
    fn test_column_positions() {
        let result = check("Text before ![alt](Bad_Name.png)");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].column, 13);
    }

    #[test]
    fn test_uppercase_extension_does_not_matter() {
        // The extension is outside the checked stem
        assert!(check("![alt](photo.PNG)").is_empty());
    }
}
