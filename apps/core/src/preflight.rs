//! Preflight Check System
//!
//! Verifies configuration and the wordlist before the dispatcher starts.
//! A failed critical check aborts startup; nothing here runs mid-game.

use crate::config::Settings;
use crate::game::Dictionary;
use serde::Serialize;
use tracing::{info, warn};

/// Result of a single check
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    pub ready_to_start: bool,
    pub summary: String,
}

impl PreflightReport {
    /// Failed critical checks, formatted for a startup diagnostic.
    pub fn failures(&self) -> String {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| match &c.details {
                Some(d) => format!("{}: {} ({})", c.name, c.message, d),
                None => format!("{}: {}", c.name, c.message),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Result of preflight: the report plus the dictionary when it loaded.
#[derive(Debug)]
pub struct Preflight {
    pub report: PreflightReport,
    pub dictionary: Option<Dictionary>,
}

/// Performs all preflight checks. The dictionary is loaded here, once.
pub fn run_preflight_checks(settings: &Settings) -> Preflight {
    info!("Running preflight checks");

    let mut checks = vec![check_credentials(settings), check_wordlist_file(settings)];

    let (dictionary_check, dictionary) = if checks[1].passed {
        check_dictionary(settings)
    } else {
        (
            CheckResult::fail("dictionary", "Skipped - wordlist file unavailable", None),
            None,
        )
    };
    checks.push(dictionary_check);
    checks.push(check_delay(settings));

    let all_passed = checks.iter().all(|c| c.passed);
    let critical_passed = checks
        .iter()
        .filter(|c| is_critical_check(&c.name))
        .all(|c| c.passed);

    let summary = if all_passed {
        "All checks passed. Ready to play.".to_string()
    } else if critical_passed {
        "Some non-critical checks failed. Starting with warnings.".to_string()
    } else {
        "Critical checks failed. Cannot start.".to_string()
    };

    for check in &checks {
        if check.passed {
            info!("  ✅ {}: {}", check.name, check.message);
        } else {
            warn!("  ❌ {}: {}", check.name, check.message);
            if let Some(details) = &check.details {
                warn!("      Details: {}", details);
            }
        }
    }
    info!("Summary: {}", summary);

    Preflight {
        report: PreflightReport {
            all_passed,
            checks,
            ready_to_start: critical_passed,
            summary,
        },
        dictionary,
    }
}

fn is_critical_check(name: &str) -> bool {
    matches!(name, "credentials" | "wordlist_file" | "dictionary")
}

// --- Individual Checks ---

fn check_credentials(settings: &Settings) -> CheckResult {
    if settings.api_id > 0 && !settings.api_hash.trim().is_empty() {
        CheckResult::pass("credentials", "API_ID and API_HASH are set")
    } else {
        CheckResult::fail("credentials", "API_ID and API_HASH must be set", None)
    }
}

fn check_wordlist_file(settings: &Settings) -> CheckResult {
    let path = &settings.wordlist_path;
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => CheckResult::pass(
            "wordlist_file",
            &format!("{} ({} bytes)", path.display(), meta.len()),
        ),
        Ok(meta) if meta.is_file() => CheckResult::fail(
            "wordlist_file",
            "Wordlist file is empty",
            Some(path.display().to_string()),
        ),
        Ok(_) => CheckResult::fail(
            "wordlist_file",
            "Wordlist path is not a file",
            Some(path.display().to_string()),
        ),
        Err(e) => CheckResult::fail(
            "wordlist_file",
            "Wordlist file not readable",
            Some(format!("{}: {}", path.display(), e)),
        ),
    }
}

fn check_dictionary(settings: &Settings) -> (CheckResult, Option<Dictionary>) {
    match Dictionary::load(&settings.wordlist_path) {
        Ok(dictionary) => (
            CheckResult::pass("dictionary", &format!("{} words loaded", dictionary.len())),
            Some(dictionary),
        ),
        Err(e) => (
            CheckResult::fail("dictionary", "Failed to load wordlist", Some(e.to_string())),
            None,
        ),
    }
}

fn check_delay(settings: &Settings) -> CheckResult {
    if settings.message_delay_secs == 0 {
        CheckResult::fail(
            "message_delay",
            "Zero delay between guesses invites provider throttling",
            None,
        )
    } else {
        CheckResult::pass(
            "message_delay",
            &format!("{} seconds between guesses", settings.message_delay_secs),
        )
    }
}
