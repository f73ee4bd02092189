//! Runtime configuration, read from the environment (and `.env` via `dotenv` in `main`).

use crate::actors::turn::GameRules;
use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

pub const DEFAULT_BOT_USERNAME: &str = "OctopusEN_Bot";
pub const DEFAULT_PASS_LABEL: &str = "Pass ♻️";
pub const DEFAULT_MESSAGE_DELAY_SECS: u64 = 5;
pub const DEFAULT_SKIP_GRACE_SECS: u64 = 6;
/// Upper bound on the delay between guesses, for both config and `/time`.
pub const MAX_MESSAGE_DELAY_SECS: u64 = 3600;

/// Log output flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("Unknown LOG_FORMAT: {}", other))),
        }
    }
}

/// Everything the process needs to start.
#[derive(Debug, Clone, Validate)]
pub struct Settings {
    /// Platform application id.
    #[validate(range(min = 1))]
    pub api_id: i64,
    /// Platform application hash.
    #[validate(length(min = 1))]
    pub api_hash: String,
    /// One lower-case word per line, UTF-8.
    pub wordlist_path: PathBuf,
    /// Username of the game bot whose broadcasts we answer, without `@`.
    #[validate(length(min = 1))]
    pub bot_username: String,
    /// Initial delay between guesses; changed at runtime with `/time`.
    #[validate(range(max = 3600))]
    pub message_delay_secs: u64,
    /// Wait before pressing the pass button.
    #[validate(range(max = 60))]
    pub skip_grace_secs: u64,
    /// Label of the pass button on game broadcasts.
    #[validate(length(min = 1))]
    pub pass_label: String,
    pub log_format: LogFormat,
}

impl Settings {
    /// Reads and validates settings from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        let api_id = required("API_ID")?
            .trim()
            .parse::<i64>()
            .map_err(|e| AppError::Config(format!("API_ID must be numeric: {}", e)))?;

        let settings = Settings {
            api_id,
            api_hash: required("API_HASH")?,
            wordlist_path: PathBuf::from(required("WORDLIST_PATH")?),
            bot_username: optional("GAME_BOT_USERNAME")
                .map(|u| u.trim_start_matches('@').to_string())
                .unwrap_or_else(|| DEFAULT_BOT_USERNAME.to_string()),
            message_delay_secs: parsed("MESSAGE_DELAY_SECS", DEFAULT_MESSAGE_DELAY_SECS)?,
            skip_grace_secs: parsed("SKIP_GRACE_SECS", DEFAULT_SKIP_GRACE_SECS)?,
            pass_label: optional("PASS_BUTTON_LABEL").unwrap_or_else(|| DEFAULT_PASS_LABEL.to_string()),
            log_format: parsed("LOG_FORMAT", LogFormat::default())?,
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn message_delay(&self) -> Duration {
        Duration::from_secs(self.message_delay_secs)
    }

    pub fn game_rules(&self) -> GameRules {
        GameRules {
            bot_username: self.bot_username.clone(),
            pass_label: self.pass_label.clone(),
            skip_grace: Duration::from_secs(self.skip_grace_secs),
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &str) -> Result<String, AppError> {
    optional(key).ok_or_else(|| AppError::Config(format!("{} environment variable must be set", key)))
}

fn parsed<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}
