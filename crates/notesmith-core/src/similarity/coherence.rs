//! Content coherence: similarity of how two notes are written
//!
//! Four structural comparisons, none of which look at shared vocabulary
//! directly:
//! - sentence patterns (length, count, questions)
//! - conceptual density (vocabulary diversity, repeated words)
//! - semantic flow (transition words, topic continuity between sentences)
//! - writing style (punctuation, capitalization, list markup)
//!
//! Every component is clamped to `[0, 1]`. A note without any words scores
//! 0 against everything.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::note::Note;
use crate::similarity::heuristics::jaccard;
use crate::text::{self, Sentence};

const SENTENCE_PATTERN_WEIGHT: f64 = 0.30;
const DENSITY_WEIGHT: f64 = 0.25;
const FLOW_WEIGHT: f64 = 0.25;
const STYLE_WEIGHT: f64 = 0.20;

const PUNCTUATION: &str = ".,;:!?-()[]{}\"'";

static TRANSITION_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn get_transition_words() -> &'static HashSet<&'static str> {
    TRANSITION_WORDS.get_or_init(|| {
        [
            "however", "therefore", "thus", "hence", "moreover", "furthermore",
            "additionally", "consequently", "meanwhile", "nevertheless", "nonetheless",
            "although", "though", "whereas", "while", "because", "since", "if", "then", "so",
            "yet", "still", "also", "besides", "indeed",
        ]
        .iter()
        .copied()
        .collect()
    })
}

fn unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Per-note measurements reused by several components
struct Profile<'a> {
    content: &'a str,
    sentences: Vec<Sentence<'a>>,
    frequencies: HashMap<String, usize>,
    total_words: usize,
}

impl<'a> Profile<'a> {
    fn new(content: &'a str) -> Self {
        Profile {
            content,
            sentences: text::sentences(content),
            frequencies: text::word_frequencies(content).into_iter().collect(),
            total_words: text::count_words(content),
        }
    }

    fn has_words(&self) -> bool {
        !self.frequencies.is_empty()
    }
}

/// Composite "thought similarity" between two notes
pub fn thought_similarity(a: &Note, b: &Note) -> f64 {
    let profile_a = Profile::new(&a.content);
    let profile_b = Profile::new(&b.content);

    if !profile_a.has_words() || !profile_b.has_words() {
        return 0.0;
    }

    let score = SENTENCE_PATTERN_WEIGHT * sentence_patterns(&profile_a, &profile_b)
        + DENSITY_WEIGHT * conceptual_density(&profile_a, &profile_b)
        + FLOW_WEIGHT * semantic_flow(&profile_a, &profile_b)
        + STYLE_WEIGHT * writing_style(&profile_a, &profile_b);

    unit(score)
}

fn sentence_patterns(a: &Profile<'_>, b: &Profile<'_>) -> f64 {
    if a.sentences.is_empty() || b.sentences.is_empty() {
        return 0.0;
    }

    let mean_len = |sentences: &[Sentence<'_>]| -> f64 {
        sentences.iter().map(Sentence::len).sum::<usize>() as f64 / sentences.len() as f64
    };
    let (len_a, len_b) = (mean_len(&a.sentences), mean_len(&b.sentences));
    let length_similarity = 1.0 - ((len_a - len_b).abs() / len_a.max(len_b)).min(1.0);

    let (count_a, count_b) = (a.sentences.len(), b.sentences.len());
    let count_ratio = count_a.min(count_b) as f64 / count_a.max(count_b) as f64;

    let question_ratio = |sentences: &[Sentence<'_>]| -> f64 {
        sentences.iter().filter(|s| s.is_question).count() as f64 / sentences.len() as f64
    };
    let question_similarity =
        1.0 - (question_ratio(&a.sentences) - question_ratio(&b.sentences)).abs();

    unit(0.4 * length_similarity + 0.3 * count_ratio + 0.3 * question_similarity)
}

fn conceptual_density(a: &Profile<'_>, b: &Profile<'_>) -> f64 {
    if a.total_words == 0 || b.total_words == 0 {
        return 0.0;
    }

    let diversity_a = a.frequencies.len() as f64 / a.total_words as f64;
    let diversity_b = b.frequencies.len() as f64 / b.total_words as f64;
    let diversity_similarity = unit(1.0 - (diversity_a - diversity_b).abs());

    unit(0.6 * diversity_similarity + 0.4 * repetition_similarity(a, b))
}

/// Jaccard similarity of the words each note uses more than once
fn repetition_similarity(a: &Profile<'_>, b: &Profile<'_>) -> f64 {
    let repeated = |profile: &Profile<'_>| -> HashSet<String> {
        profile
            .frequencies
            .iter()
            .filter(|(_, &count)| count > 1)
            .map(|(word, _)| word.clone())
            .collect()
    };

    jaccard(&repeated(a), &repeated(b))
}

fn semantic_flow(a: &Profile<'_>, b: &Profile<'_>) -> f64 {
    if a.sentences.len() < 2 || b.sentences.len() < 2 {
        return 0.0;
    }

    let transitions_a = count_transitions(&a.sentences);
    let transitions_b = count_transitions(&b.sentences);
    let transition_similarity = if transitions_a == 0 && transitions_b == 0 {
        1.0
    } else {
        transitions_a.min(transitions_b) as f64 / transitions_a.max(transitions_b) as f64
    };

    let continuity_similarity =
        1.0 - (topic_continuity(&a.sentences) - topic_continuity(&b.sentences)).abs();

    unit(0.5 * transition_similarity + 0.5 * continuity_similarity)
}

/// Count connective words, including the two-word "in fact"
fn count_transitions(sentences: &[Sentence<'_>]) -> usize {
    let transitions = get_transition_words();

    sentences
        .iter()
        .map(|sentence| {
            let words = text::split_words(sentence.text);
            let single = words
                .iter()
                .filter(|w| transitions.contains(w.as_str()))
                .count();
            let in_fact = words
                .windows(2)
                .filter(|pair| pair[0] == "in" && pair[1] == "fact")
                .count();
            single + in_fact
        })
        .sum()
}

/// Mean vocabulary overlap between consecutive sentences
fn topic_continuity(sentences: &[Sentence<'_>]) -> f64 {
    if sentences.len() < 2 {
        return 0.0;
    }

    let total: f64 = sentences
        .windows(2)
        .map(|pair| {
            jaccard(
                &text::unique_words(pair[0].text),
                &text::unique_words(pair[1].text),
            )
        })
        .sum();

    total / (sentences.len() - 1) as f64
}

fn writing_style(a: &Profile<'_>, b: &Profile<'_>) -> f64 {
    let density = |content: &str, predicate: fn(char) -> bool| -> f64 {
        let len = content.chars().count().max(1);
        content.chars().filter(|&c| predicate(c)).count() as f64 / len as f64
    };

    let is_punctuation: fn(char) -> bool = |c| PUNCTUATION.contains(c);
    let is_capital: fn(char) -> bool = char::is_uppercase;

    let punctuation_similarity = unit(
        1.0 - (density(a.content, is_punctuation) - density(b.content, is_punctuation)).abs()
            * 100.0,
    );
    let capitalization_similarity =
        unit(1.0 - (density(a.content, is_capital) - density(b.content, is_capital)).abs() * 10.0);
    let list_similarity = if uses_list_markup(a.content) == uses_list_markup(b.content) {
        1.0
    } else {
        0.3
    };

    unit(0.4 * punctuation_similarity + 0.3 * capitalization_similarity + 0.3 * list_similarity)
}

fn uses_list_markup(content: &str) -> bool {
    content.contains("- ") || content.contains("* ") || content.contains("1.")
}
