//! Pattern extraction from game-bot broadcasts.
//!
//! A broadcast ends with two meaningful lines:
//!
//! ```text
//! 🔤 3 letter A B C T
//! c _ t
//! ```
//!
//! The rack line always starts with an ordinal and a label word, which are
//! dropped unconditionally. The pattern line uses `_` for unknown positions.

use crate::error::AppError;
use crate::game::pattern::{BlankPattern, Rack};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Leading tokens on the rack line (ordinal, label) that carry no letters.
const RACK_PREFIX_TOKENS: usize = 2;

// Letters, numbers and `_` only: `\w` would also keep combining marks and
// joiners, which are what emoji sequences are built from.
static DECORATIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{L}\p{N}_\s,.!?]").expect("Invalid regex: decoration filter")
});

/// Rack and pattern pulled out of one broadcast. Empty when nothing usable was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub rack: Rack,
    pub pattern: BlankPattern,
}

impl Extraction {
    /// A turn is only detected when both halves are present.
    pub fn is_empty(&self) -> bool {
        self.rack.is_empty() || self.pattern.is_empty()
    }
}

/// Removes emojis and other glyphs while keeping letters, digits, whitespace and `,.!?`.
pub fn strip_decorations(text: &str) -> Cow<'_, str> {
    DECORATIONS.replace_all(text, "")
}

/// Joins the letter tokens of a rack line, dropping the ordinal and label tokens.
///
/// Returns an empty string when the line has fewer than three tokens.
pub fn format_rack(line: &str) -> String {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() <= RACK_PREFIX_TOKENS {
        warn!(line, "Rack line has no letter tokens");
        return String::new();
    }
    tokens[RACK_PREFIX_TOKENS..].concat().to_uppercase()
}

/// Parses a pattern line, ignoring the spaces the bot puts between positions.
pub fn parse_pattern(line: &str) -> BlankPattern {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    BlankPattern::parse(&compact)
}

/// Extracts the rack and pattern of a broadcast. Never fails: malformed
/// messages produce an empty `Extraction`.
pub fn extract(text: &str) -> Extraction {
    match try_extract(text) {
        Ok(extraction) => extraction,
        Err(e) => {
            debug!("{}", e);
            Extraction::default()
        }
    }
}

fn try_extract(text: &str) -> Result<Extraction, AppError> {
    let cleaned = strip_decorations(text);
    let lines: Vec<&str> = cleaned
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let [.., rack_line, pattern_line] = lines.as_slice() else {
        return Err(AppError::Extraction(format!(
            "expected a rack line and a pattern line, found {} line(s)",
            lines.len()
        )));
    };

    let rack = Rack::new(format_rack(rack_line));
    if rack.is_empty() {
        return Err(AppError::Extraction(format!("no rack in line {:?}", rack_line)));
    }

    let pattern = parse_pattern(pattern_line);
    if pattern.is_empty() {
        return Err(AppError::Extraction("empty pattern line".to_string()));
    }

    Ok(Extraction { rack, pattern })
}
