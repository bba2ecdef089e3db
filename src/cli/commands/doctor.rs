//! Doctor command - verify tokens, data files and configuration.

use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::{Path, PathBuf};

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(config_path: Option<&PathBuf>, settings: &Settings) -> anyhow::Result<()> {
    Output::header("lingo doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("Access tokens").bold());
    let token_checks = vec![
        check_token(&settings.lyrics.token_env, "lyrics lookups (lingo augment)"),
        check_token(&settings.playlist.token_env, "playlist creation (lingo playlists)"),
    ];
    for check in &token_checks {
        check.print();
    }
    checks.extend(token_checks);

    println!();

    println!("{}", style("Data files").bold());
    let data_checks = check_data_files(settings);
    for check in &data_checks {
        check.print();
    }
    checks.extend(data_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!("{} error(s) found.", errors));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed.");
    }

    Ok(())
}

/// Tokens are only needed by the network stages, so a missing one is a warning.
fn check_token(var: &str, needed_for: &str) -> CheckResult {
    match std::env::var(var) {
        Ok(token) if token.trim().is_empty() => CheckResult::error(
            var,
            "empty",
            &format!("Set with: export {}='...'", var),
        ),
        Ok(token) => CheckResult::ok(var, &format!("configured ({})", mask(&token))),
        Err(_) => CheckResult::warning(
            var,
            "not set",
            &format!("Needed for {}. Set with: export {}='...'", needed_for, var),
        ),
    }
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn check_data_files(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let data_dir = settings.data_dir();
    if data_dir.is_dir() {
        results.push(CheckResult::ok("Data directory", &data_dir.display().to_string()));
    } else {
        results.push(CheckResult::warning(
            "Data directory",
            &format!("{} (will be created)", data_dir.display()),
            "Directory will be created on first use",
        ));
    }

    results.push(check_file(
        "Catalog",
        &settings.catalog_path(),
        "Export your library's tracks to this file",
    ));
    results.push(check_file("Scored tracks", &settings.scored_path(), "Create with: lingo detect"));
    results.push(check_file(
        "Augmented tracks",
        &settings.augmented_path(),
        "Create with: lingo augment",
    ));

    results
}

fn check_file(name: &str, path: &Path, hint: &str) -> CheckResult {
    match std::fs::metadata(path) {
        Ok(meta) => CheckResult::ok(
            name,
            &format!("{} ({})", path.display(), format_size(meta.len())),
        ),
        Err(_) => CheckResult::warning(name, &format!("{} (not created yet)", path.display()), hint),
    }
}

fn check_config_file(config_path: Option<&PathBuf>) -> CheckResult {
    let path = config_path
        .cloned()
        .unwrap_or_else(Settings::default_config_path);
    if path.exists() {
        CheckResult::ok("Config file", &path.display().to_string())
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to override them (see: lingo config show)", path.display()),
        )
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_warning() {
        let result = check_token("LINGO_DOCTOR_TOKEN_THAT_IS_NEVER_SET", "tests");
        assert_eq!(result.status, CheckStatus::Warning);
        assert!(result.hint.unwrap().contains("export LINGO_DOCTOR_TOKEN_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("short"), "****");
        assert_eq!(mask("abcdefghijklmnop"), "abcd...mnop");
    }

    #[test]
    fn test_check_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracks.json");
        assert_eq!(check_file("Catalog", &path, "hint").status, CheckStatus::Warning);

        std::fs::write(&path, "[]").unwrap();
        let result = check_file("Catalog", &path, "hint");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.message.ends_with("(2 B)"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
    }
}
