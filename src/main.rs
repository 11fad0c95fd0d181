use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use kebablint_lib::LintContext;
use kebablint_lib::config::{self, Config};
use kebablint_lib::exit_codes::exit;
use kebablint_lib::rule::Rule;
use kebablint_lib::rules;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files or directories to lint.
    /// If provided, these paths take precedence over include patterns.
    #[arg(required = false)]
    paths: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<String>,

    /// Fix issues automatically where possible
    #[arg(short, long, default_value = "false")]
    fix: bool,

    /// List all available rules
    #[arg(short, long, default_value = "false")]
    list_rules: bool,

    /// Disable specific rules (comma-separated)
    #[arg(short, long)]
    disable: Option<String>,

    /// Enable only specific rules (comma-separated)
    #[arg(short, long)]
    enable: Option<String>,

    /// Exclude specific files or directories (comma-separated glob patterns)
    #[arg(long)]
    exclude: Option<String>,

    /// Include only specific files or directories (comma-separated glob patterns).
    /// Ignored when explicit paths are provided.
    #[arg(long)]
    include: Option<String>,

    /// Ignore .gitignore files when scanning directories
    #[arg(long, default_value = "false")]
    no_gitignore: bool,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long)]
    quiet: bool,

    /// Command to run
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration file
    Init,
}

fn split_rule_list(list: &str) -> HashSet<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

fn split_patterns(list: &str) -> Vec<String> {
    list.split(',')
        .map(|pattern| pattern.trim().to_string())
        .filter(|pattern| !pattern.is_empty())
        .collect()
}

/// The final set of rules to run, after CLI and config precedence:
/// CLI --enable is exclusive and wins outright; otherwise config enable
/// (exclusive when non-empty), then config disable, then CLI --disable.
fn get_enabled_rules(cli: &Cli, config: &Config) -> Vec<Box<dyn Rule>> {
    let all_rules = rules::all_rules(config);

    let cli_enable = cli.enable.as_deref().map(split_rule_list);
    let cli_disable = cli.disable.as_deref().map(split_rule_list);

    let final_rules: Vec<Box<dyn Rule>> = if let Some(enabled) = &cli_enable {
        all_rules
            .into_iter()
            .filter(|rule| enabled.contains(rule.name()))
            .collect()
    } else {
        let config_enable: HashSet<&str> =
            config.global.enable.iter().map(String::as_str).collect();
        let config_disable: HashSet<&str> =
            config.global.disable.iter().map(String::as_str).collect();

        let mut enabled_rules = all_rules;
        if !config_enable.is_empty() {
            enabled_rules.retain(|rule| config_enable.contains(rule.name()));
        }
        enabled_rules.retain(|rule| !config_disable.contains(rule.name()));
        if let Some(disabled) = &cli_disable {
            enabled_rules.retain(|rule| !disabled.contains(rule.name()));
        }
        enabled_rules
    };

    if cli.verbose && !cli.quiet {
        println!("Enabled rules:");
        for rule in &final_rules {
            println!("  - {} ({})", rule.name(), rule.description());
        }
        println!();
    }

    final_rules
}

/// Find all markdown files under `paths` using the `ignore` walker
fn find_markdown_files(paths: &[String], cli: &Cli, config: &Config) -> Result<Vec<String>> {
    let first_path = paths.first().cloned().unwrap_or_else(|| ".".to_string());
    let mut walk_builder = WalkBuilder::new(first_path);
    for path in paths.iter().skip(1) {
        walk_builder.add(path);
    }

    let mut types_builder = ignore::types::TypesBuilder::new();
    types_builder.add_defaults();
    types_builder
        .add("markdown", "*.md")
        .context("markdown type definition")?;
    types_builder
        .add("markdown", "*.markdown")
        .context("markdown type definition")?;
    types_builder.select("markdown");
    walk_builder.types(types_builder.build().context("file type filter")?);

    // Include patterns only apply in discovery mode ("kebablint ."),
    // explicit paths beat them
    let is_discovery_mode = paths.len() == 1 && paths[0] == ".";

    let exclude_patterns = cli
        .exclude
        .as_deref()
        .map(split_patterns)
        .unwrap_or_else(|| config.global.exclude.clone());
    let include_patterns = if is_discovery_mode {
        cli.include
            .as_deref()
            .map(split_patterns)
            .unwrap_or_else(|| config.global.include.clone())
    } else {
        Vec::new()
    };

    if !include_patterns.is_empty() || !exclude_patterns.is_empty() {
        let mut override_builder = OverrideBuilder::new(".");
        for pattern in &include_patterns {
            override_builder
                .add(pattern)
                .with_context(|| format!("invalid include pattern '{pattern}'"))?;
        }
        for pattern in &exclude_patterns {
            override_builder
                .add(&format!("!{pattern}"))
                .with_context(|| format!("invalid exclude pattern '{pattern}'"))?;
        }
        walk_builder.overrides(override_builder.build().context("glob overrides")?);
    }

    let use_gitignore = config.global.respect_gitignore && !cli.no_gitignore;
    walk_builder.ignore(use_gitignore);
    walk_builder.git_ignore(use_gitignore);
    walk_builder.git_global(use_gitignore);
    walk_builder.git_exclude(use_gitignore);
    walk_builder.parents(use_gitignore);
    walk_builder.hidden(true);
    walk_builder.require_git(false);

    let mut file_paths = Vec::new();
    for result in walk_builder.build() {
        match result {
            Ok(entry) => {
                let path = entry.path();
                if path.is_file() {
                    let file_path = path.to_string_lossy();
                    file_paths.push(
                        file_path
                            .strip_prefix("./")
                            .unwrap_or(&file_path)
                            .to_string(),
                    );
                }
            }
            Err(err) => eprintln!("Error walking directory: {err}"),
        }
    }

    file_paths.sort();
    file_paths.dedup();

    // The type filter already selects markdown, this guards explicit paths
    file_paths.retain(|file_path| {
        Path::new(file_path)
            .extension()
            .is_some_and(|ext| ext == "md" || ext == "markdown")
    });

    Ok(file_paths)
}

/// Lint one file. Returns (has_issues, issues_found, issues_fixed, fixable).
fn process_file(
    file_path: &str,
    rules: &[Box<dyn Rule>],
    fix: bool,
    verbose: bool,
    quiet: bool,
) -> (bool, usize, usize, usize) {
    if verbose && !quiet {
        println!("Processing file: {file_path}");
    }

    let mut content = match std::fs::read_to_string(file_path) {
        Ok(content) => content,
        Err(err) => {
            if !quiet {
                eprintln!(
                    "{} Failed to read file {file_path}: {err}",
                    "Error:".red().bold()
                );
            }
            return (false, 0, 0, 0);
        }
    };

    let all_warnings = match kebablint_lib::lint(&content, rules) {
        Ok(warnings) => warnings,
        Err(err) => {
            eprintln!("{} Failed to lint {file_path}: {err}", "Error:".red().bold());
            return (false, 0, 0, 0);
        }
    };

    let total_warnings = all_warnings.len();
    let fixable_warnings = all_warnings.iter().filter(|w| w.fix.is_some()).count();

    if total_warnings == 0 {
        return (false, 0, 0, 0);
    }

    if !quiet {
        for warning in &all_warnings {
            let rule_name = warning.rule_name.unwrap_or("unknown");
            let fix_indicator = if warning.fix.is_some() {
                if fix { " [fixed]" } else { " [*]" }
            } else {
                ""
            };

            println!(
                "{}:{}:{}: {} {}{}",
                file_path.blue().underline(),
                warning.line.to_string().cyan(),
                warning.column.to_string().cyan(),
                format!("[{rule_name}]").yellow(),
                warning.message,
                fix_indicator.green()
            );
        }
    }

    let mut warnings_fixed = 0;
    if fix {
        for rule in rules {
            let has_fixable = all_warnings
                .iter()
                .any(|w| w.rule_name == Some(rule.name()) && w.fix.is_some());
            if !has_fixable {
                continue;
            }

            let fix_result = {
                let ctx = LintContext::new(&content);
                rule.fix(&ctx)
            };
            match fix_result {
                Ok(fixed_content) => {
                    if fixed_content != content {
                        warnings_fixed += all_warnings
                            .iter()
                            .filter(|w| w.rule_name == Some(rule.name()) && w.fix.is_some())
                            .count();
                        content = fixed_content;
                    }
                }
                Err(err) => {
                    eprintln!(
                        "{} Failed to apply fix for rule {}: {err}",
                        "Warning:".yellow().bold(),
                        rule.name()
                    );
                }
            }
        }

        if warnings_fixed > 0 {
            if let Err(err) = std::fs::write(file_path, &content) {
                eprintln!(
                    "{} Failed to write fixed content to file {file_path}: {err}",
                    "Error:".red().bold()
                );
            }
        }
    }

    (true, total_warnings, warnings_fixed, fixable_warnings)
}

fn print_results(
    cli: &Cli,
    has_issues: bool,
    files_with_issues: usize,
    total_issues: usize,
    total_issues_fixed: usize,
    total_fixable_issues: usize,
    total_files_processed: usize,
    duration_ms: u64,
) {
    if cli.quiet {
        return;
    }

    let file_text = if total_files_processed == 1 { "file" } else { "files" };

    if has_issues {
        if cli.fix && total_issues_fixed > 0 {
            let fixed_file_text = if files_with_issues == 1 { "file" } else { "files" };
            println!(
                "\n{} Fixed {total_issues_fixed}/{total_issues} issues in {files_with_issues} {fixed_file_text} ({duration_ms}ms)",
                "Fixed:".green().bold()
            );
        } else {
            let files_display = if files_with_issues == total_files_processed {
                format!("{files_with_issues}")
            } else {
                format!("{files_with_issues}/{total_files_processed}")
            };
            println!(
                "\n{} Found {total_issues} issues in {files_display} {file_text} ({duration_ms}ms)",
                "Issues:".yellow().bold()
            );
            if !cli.fix && total_fixable_issues > 0 {
                println!(
                    "Run with `--fix` to automatically fix {total_fixable_issues} of the {total_issues} issues"
                );
            }
        }
    } else {
        println!(
            "\n{} No issues found in {total_files_processed} {file_text} ({duration_ms}ms)",
            "Success:".green().bold()
        );
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        match config::create_default_config(".kebablint.toml") {
            Ok(()) => {
                if !cli.quiet {
                    println!("Created default configuration file: .kebablint.toml");
                }
                exit::success();
            }
            Err(err) => {
                eprintln!("{}: {err}", "Error".red().bold());
                exit::tool_error();
            }
        }
    }

    // A config file that exists but cannot be loaded is a tool error,
    // whether it was named explicitly or discovered
    let config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {err}", "Error".red().bold());
            exit::tool_error();
        }
    };

    if cli.list_rules {
        for rule in rules::all_rules(&config) {
            println!("{} - {}", rule.name(), rule.description());
        }
        exit::success();
    }

    let enabled_rules = get_enabled_rules(&cli, &config);

    if cli.paths.is_empty() {
        eprintln!(
            "{}: No files or directories specified. Please provide at least one path to lint.",
            "Error".red().bold()
        );
        exit::tool_error();
    }

    let file_paths = match find_markdown_files(&cli.paths, &cli, &config) {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!(
                "{}: Failed to find markdown files: {err:#}",
                "Error".red().bold()
            );
            exit::tool_error();
        }
    };

    if file_paths.is_empty() {
        if !cli.quiet {
            println!("No markdown files found to check.");
        }
        exit::success();
    }

    let start_time = Instant::now();

    let mut has_issues = false;
    let mut files_with_issues = 0;
    let mut total_issues = 0;
    let mut total_issues_fixed = 0;
    let mut total_fixable_issues = 0;
    let mut total_files_processed = 0;

    for file_path in &file_paths {
        let (file_has_issues, issues_found, issues_fixed, fixable_issues) =
            process_file(file_path, &enabled_rules, cli.fix, cli.verbose, cli.quiet);

        total_files_processed += 1;
        total_issues_fixed += issues_fixed;
        total_fixable_issues += fixable_issues;

        if file_has_issues {
            has_issues = true;
            files_with_issues += 1;
            total_issues += issues_found;
        }
    }

    let duration_ms = start_time.elapsed().as_millis() as u64;

    print_results(
        &cli,
        has_issues,
        files_with_issues,
        total_issues,
        total_issues_fixed,
        total_fixable_issues,
        total_files_processed,
        duration_ms,
    );

    if has_issues {
        exit::violations_found();
    }
}
