use kebablint_lib::LintContext;
use kebablint_lib::rule::Rule;
use kebablint_lib::rules::MD115ImageFileKebab;
use proptest::prelude::*;

fn check_count(content: &str) -> usize {
    let rule = MD115ImageFileKebab::new();
    let ctx = LintContext::new(content);
    rule.check(&ctx).unwrap().len()
}

proptest! {
    #[test]
    fn kebab_file_names_are_never_flagged(stem in r"[a-z0-9]{1,8}(-[a-z0-9]{1,8}){0,3}") {
        let content = format!("![alt]({stem}.png)");
        prop_assert_eq!(check_count(&content), 0);
    }

    #[test]
    fn kebab_names_without_extension_are_never_flagged(stem in r"[a-z0-9]{1,8}(-[a-z0-9]{1,8}){0,3}") {
        let content = format!("![alt](diagrams/{stem})");
        prop_assert_eq!(check_count(&content), 0);
    }

    #[test]
    fn underscores_are_always_flagged(a in r"[a-z0-9]{1,8}", b in r"[a-z0-9]{1,8}") {
        let content = format!("![alt]({a}_{b}.png)");
        prop_assert_eq!(check_count(&content), 1);
    }

    #[test]
    fn uppercase_is_always_flagged(prefix in r"[a-z0-9]{0,4}", upper in r"[A-Z]", suffix in r"[a-z0-9]{0,4}") {
        let content = format!("![alt]({prefix}{upper}{suffix}.png)");
        prop_assert_eq!(check_count(&content), 1);
    }

    #[test]
    fn double_hyphens_are_always_flagged(a in r"[a-z0-9]{1,6}", b in r"[a-z0-9]{1,6}") {
        let content = format!("![alt]({a}--{b}.png)");
        prop_assert_eq!(check_count(&content), 1);
    }

    #[test]
    fn edge_hyphens_are_always_flagged(stem in r"[a-z0-9]{1,8}") {
        prop_assert_eq!(check_count(&format!("![alt](-{stem}.png)")), 1);
        prop_assert_eq!(check_count(&format!("![alt]({stem}-.png)")), 1);
    }

    #[test]
    fn checking_twice_gives_identical_results(stem in r"[a-zA-Z0-9_-]{1,12}") {
        let rule = MD115ImageFileKebab::new();
        let content = format!("![alt]({stem}.png)");
        let ctx = LintContext::new(&content);
        let first = rule.check(&ctx).unwrap();
        let second = rule.check(&ctx).unwrap();
        prop_assert_eq!(first, second);
    }
}
