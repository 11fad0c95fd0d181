mod md115_image_file_kebab;

pub use md115_image_file_kebab::MD115ImageFileKebab;
pub use md115_image_file_kebab::md115_config::MD115Config;

use crate::config::Config;
use crate::rule::Rule;

/// All rules known to the linter, configured from `config`.
pub fn all_rules(config: &Config) -> Vec<Box<dyn Rule>> {
    vec![MD115ImageFileKebab::from_config(config)]
}
