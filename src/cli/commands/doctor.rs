//! Doctor command - verify system requirements and configuration.

use crate::chunking::WindowChunker;
use crate::cli::Output;
use crate::config::Settings;
use console::style;

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
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Svar Doctor");
    println!();
    println!("Checking configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_check = check_openai_api_key();
    api_check.print();
    checks.push(api_check);

    println!();

    println!("{}", style("Storage").bold());
    let storage_checks = check_storage(settings);
    for check in &storage_checks {
        check.print();
    }
    checks.extend(storage_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_checks = check_configuration(settings);
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Svar.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Svar is ready to use.");
    }

    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_openai_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check storage configuration.
fn check_storage(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    match settings.store.provider.as_str() {
        "sqlite" => {
            let db_path = settings.sqlite_path();
            if db_path.exists() {
                let size = std::fs::metadata(&db_path)
                    .map(|m| format_size(m.len()))
                    .unwrap_or_else(|_| "unknown size".to_string());
                results.push(CheckResult::ok(
                    "Database",
                    &format!("{} ({})", db_path.display(), size),
                ));
            } else {
                results.push(CheckResult::warning(
                    "Database",
                    &format!("{} (not created yet)", db_path.display()),
                    "Database will be created on first ingest",
                ));
            }
        }
        "memory" => {
            results.push(CheckResult::warning(
                "Store provider",
                "memory (collections are lost when the process exits)",
                "Set store.provider = \"sqlite\" to keep collections",
            ));
        }
        other => {
            results.push(CheckResult::error(
                "Store provider",
                &format!("unknown provider '{}'", other),
                "Valid providers: sqlite, memory",
            ));
        }
    }

    results
}

/// Check configuration values.
fn check_configuration(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let config_path = Settings::default_config_path();
    if config_path.exists() {
        results.push(CheckResult::ok(
            "Config file",
            &format!("{}", config_path.display()),
        ));
    } else {
        results.push(CheckResult::warning(
            "Config file",
            "using defaults",
            "Create one with: svar config show > config.toml",
        ));
    }

    match WindowChunker::new(settings.chunking.max_chars, settings.chunking.overlap) {
        Ok(_) => results.push(CheckResult::ok(
            "Chunking",
            &format!(
                "max_chars = {}, overlap = {}",
                settings.chunking.max_chars, settings.chunking.overlap
            ),
        )),
        Err(e) => results.push(CheckResult::error(
            "Chunking",
            &format!("{}", e),
            "overlap must be smaller than max_chars",
        )),
    }

    if settings.retrieval.top_k == 0 {
        results.push(CheckResult::error(
            "Retrieval",
            "top_k is 0",
            "Set retrieval.top_k to at least 1",
        ));
    } else {
        results.push(CheckResult::ok(
            "Retrieval",
            &format!("top_k = {}", settings.retrieval.top_k),
        ));
    }

    results
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
