//! Cheap pairwise signals: set overlap, tags, time and titles

use std::collections::HashSet;
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::note::Note;
use crate::text;

const ONE_HOUR_SECS: i64 = 3600;
const ONE_DAY_SECS: i64 = 24 * ONE_HOUR_SECS;
const SEVEN_DAYS_SECS: i64 = 7 * ONE_DAY_SECS;

/// Jaccard similarity of two sets; 0 when either set is empty
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}

/// Jaccard similarity of the content words (longer than two characters)
pub fn word_jaccard(a: &Note, b: &Note) -> f64 {
    jaccard(&text::unique_words(&a.content), &text::unique_words(&b.content))
}

/// Jaccard similarity of the tag sets
pub fn tag_jaccard(a: &Note, b: &Note) -> f64 {
    if a.tags.is_empty() || b.tags.is_empty() {
        return 0.0;
    }

    let intersection = a.tags.intersection(&b.tags).count();
    let union = a.tags.len() + b.tags.len() - intersection;

    intersection as f64 / union as f64
}

/// Jaccard similarity of whitespace-split, lowercased title words
pub fn title_word_jaccard(a: &Note, b: &Note) -> f64 {
    let words = |title: &str| -> HashSet<String> {
        title.split_whitespace().map(str::to_lowercase).collect()
    };

    jaccard(&words(&a.title), &words(&b.title))
}

/// Linear decay between `full_window` (score 1.0) and seven days (score 0.0)
fn proximity(a: DateTime<Utc>, b: DateTime<Utc>, full_window: i64) -> f64 {
    let diff = (a - b).num_seconds().abs();

    if diff < full_window {
        1.0
    } else if diff > SEVEN_DAYS_SECS {
        0.0
    } else {
        1.0 - diff as f64 / SEVEN_DAYS_SECS as f64
    }
}

/// Temporal proximity of last updates: 1.0 within an hour, 0.0 past a week
pub fn temporal_proximity(a: &Note, b: &Note) -> f64 {
    proximity(a.updated, b.updated, ONE_HOUR_SECS)
}

/// Coarser temporal proximity used by the pre-filter: 1.0 within a day
pub fn quick_temporal_proximity(a: &Note, b: &Note) -> f64 {
    proximity(a.updated, b.updated, ONE_DAY_SECS)
}

/// Title similarity: one minus normalized Levenshtein distance of lowercased titles
pub fn title_similarity(a: &Note, b: &Note) -> f64 {
    let title_a: Vec<char> = a.title.to_lowercase().chars().collect();
    let title_b: Vec<char> = b.title.to_lowercase().chars().collect();

    let max_len = title_a.len().max(title_b.len());
    if max_len == 0 {
        return 0.0;
    }

    1.0 - levenshtein(&title_a, &title_b) as f64 / max_len as f64
}

/// Minimum number of single-character edits turning `a` into `b`
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev_row: Vec<usize> = (0..=b.len()).collect();
    let mut curr_row = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr_row[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b.len()]
}
