//! Topic tag normalization.
//!
//! Topics are free text typed by users or copied from the catalog, so the same
//! tag shows up with different widths, spacing and casing. Stored topics keep
//! the first spelling seen and drop later duplicates.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::error::ApiError;

/// Most topics a single problem may carry
pub const MAX_TOPICS: usize = 20;

/// Longest topic, in characters, after normalization
pub const MAX_TOPIC_CHARS: usize = 50;

/// Normalize a single topic for storage.
///
/// 1. Unicode NFKC, so full-width and compatibility forms fold to plain text
/// 2. Collapse runs of whitespace to one space and trim the ends
pub fn normalize_topic(topic: &str) -> String {
    topic
        .nfkc()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a topic list, dropping blanks and case-insensitive duplicates.
///
/// Order of first appearance is preserved.
pub fn normalize_topics<I, S>(topics: I) -> Result<Vec<String>, ApiError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();

    for topic in topics {
        let topic = normalize_topic(topic.as_ref());
        if topic.is_empty() {
            continue;
        }

        if topic.chars().count() > MAX_TOPIC_CHARS {
            return Err(ApiError::Validation(format!(
                "Topic '{topic}' is longer than {MAX_TOPIC_CHARS} characters"
            )));
        }

        if seen.insert(topic.to_lowercase()) {
            normalized.push(topic);
        }
    }

    if normalized.len() > MAX_TOPICS {
        return Err(ApiError::Validation(format!(
            "A problem can have at most {MAX_TOPICS} topics, got {}",
            normalized.len()
        )));
    }

    Ok(normalized)
}
