//! Word resolution: every dictionary word that fits the pattern and the rack.

use crate::game::dictionary::Dictionary;
use crate::game::pattern::{letter_counts, BlankPattern, Rack};

/// Returns all dictionary words of the pattern's length that agree with its
/// literals and use no letter more often than the rack provides.
///
/// Letters at fixed positions count against the rack as well. An empty rack
/// or pattern yields no words.
pub fn resolve(rack: &Rack, pattern: &BlankPattern, dictionary: &Dictionary) -> Vec<String> {
    if rack.is_empty() || pattern.is_empty() {
        return Vec::new();
    }

    let available = rack.counts();
    dictionary
        .words_of_length(pattern.len())
        .iter()
        .filter(|word| pattern.matches(word))
        .filter(|word| {
            letter_counts(word)
                .iter()
                .all(|(c, n)| available.get(c).is_some_and(|have| n <= have))
        })
        .cloned()
        .collect()
}
