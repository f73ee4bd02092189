//! Dictionary index.
//!
//! Loaded once at startup from a one-word-per-line UTF-8 file. Words are
//! bucketed by character length; within a bucket, insertion order is kept.

use crate::error::AppError;
use crate::game::pattern::{BlankPattern, Rack};
use crate::game::resolver;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::info;

/// Immutable, normalised word set.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    by_length: HashMap<usize, Vec<String>>,
    total: usize,
}

impl Dictionary {
    /// Loads and normalises a wordlist file.
    ///
    /// Fails with `AppError::Config` when the file cannot be read or holds no usable words.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read wordlist {}: {}", path.display(), e))
        })?;

        let dictionary = Self::from_words(content.lines());
        if dictionary.is_empty() {
            return Err(AppError::Config(format!(
                "Wordlist {} contains no usable words",
                path.display()
            )));
        }

        info!(words = dictionary.len(), path = %path.display(), "Dictionary loaded");
        Ok(dictionary)
    }

    /// Builds an index from in-memory words, applying the same normalisation as `load`.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut by_length: HashMap<usize, Vec<String>> = HashMap::new();

        for raw in words {
            let word = raw.as_ref().trim().to_lowercase();
            if word.is_empty() || !seen.insert(word.clone()) {
                continue;
            }
            by_length.entry(word.chars().count()).or_default().push(word);
        }

        Self {
            by_length,
            total: seen.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words_of_length(word.chars().count())
            .iter()
            .any(|w| w == word)
    }

    /// All words with exactly `len` characters, in insertion order.
    pub fn words_of_length(&self, len: usize) -> &[String] {
        self.by_length.get(&len).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Words that fit `pattern` and can be spelled from `rack`.
    pub fn lookup(&self, rack: &Rack, pattern: &BlankPattern) -> Vec<String> {
        resolver::resolve(rack, pattern, self)
    }
}
