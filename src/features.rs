//! Text features used by the classifier.
//!
//! Everything here is derived from the paragraph text alone; formatting
//! signals live on [`FormattingInfo`](crate::FormattingInfo) and are combined
//! with these in the classifier.
//!
//! ## Sentence-likeness
//!
//! Headings are short fragments without terminal punctuation. A paragraph is
//! *sentence-like* when it ends with `.` `!` `?` or a closing quote, contains
//! any sentence terminator, or runs to ten words or more.
//!
//! ```text
//! "CHAPTER ONE"                      -> not sentence-like
//! "The Return of the King"           -> not sentence-like
//! "He came back."                    -> sentence-like (terminator)
//! "one two three ... ten"            -> sentence-like (length)
//! ```
//!
//! This is a fast heuristic and deliberately imprecise: "Mr. Smith" counts as
//! sentence-like, a long title without punctuation counts as sentence-like.
//! No grammar analysis is attempted.

use serde::{Deserialize, Serialize};

/// Longest text, in Unicode scalar values, that can be a short phrase.
pub const SHORT_PHRASE_MAX_CHARS: usize = 120;

/// Most words a quoted one-liner may have.
pub const QUOTED_ONELINER_MAX_WORDS: usize = 20;

/// Words at which any paragraph counts as sentence-like.
const SENTENCE_WORDS: usize = 10;

const TERMINATORS: [char; 3] = ['.', '!', '?'];

const QUOTE_PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')];

/// Features derived from a paragraph's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParagraphFeatures {
    /// Number of whitespace-delimited tokens.
    pub word_count: usize,
    /// Text has at least one uppercase letter and no lowercase letters.
    pub all_caps: bool,
    /// At most `max_header_words` words and at most 120 characters.
    pub short_phrase: bool,
    /// Ends or contains sentence punctuation, or is long.
    pub sentence_like: bool,
    /// Up to 20 words wrapped in a matching pair of quotes.
    pub quoted_oneliner: bool,
}

impl ParagraphFeatures {
    /// Derive features from paragraph text.
    ///
    /// Word splitting is whitespace-based and script agnostic.
    ///
    /// ```rust
    /// use parachunk::ParagraphFeatures;
    ///
    /// let f = ParagraphFeatures::extract("CHAPTER ONE", 15);
    /// assert_eq!(f.word_count, 2);
    /// assert!(f.all_caps);
    /// assert!(f.short_phrase);
    /// assert!(!f.sentence_like);
    ///
    /// let q = ParagraphFeatures::extract("\"Stay.\"", 15);
    /// assert!(q.quoted_oneliner);
    /// ```
    #[must_use]
    pub fn extract(text: &str, max_header_words: usize) -> Self {
        let text = text.trim();
        let word_count = word_count(text);
        let char_len = text.chars().count();

        Self {
            word_count,
            all_caps: is_all_caps(text),
            short_phrase: word_count <= max_header_words && char_len <= SHORT_PHRASE_MAX_CHARS,
            sentence_like: is_sentence_like(text, word_count),
            quoted_oneliner: word_count <= QUOTED_ONELINER_MAX_WORDS && is_quoted(text),
        }
    }
}

/// Count whitespace-delimited words.
#[must_use]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn is_all_caps(text: &str) -> bool {
    text.chars().any(char::is_uppercase) && !text.chars().any(char::is_lowercase)
}

fn is_sentence_like(text: &str, word_count: usize) -> bool {
    let ends_terminal = text
        .chars()
        .next_back()
        .is_some_and(|c| TERMINATORS.contains(&c) || matches!(c, '"' | '\'' | '”' | '’'));

    ends_terminal || text.contains(TERMINATORS) || word_count >= SENTENCE_WORDS
}

fn is_quoted(text: &str) -> bool {
    let (Some(first), Some(last)) = (text.chars().next(), text.chars().next_back()) else {
        return false;
    };
    QUOTE_PAIRS
        .iter()
        .any(|&(open, close)| first == open && last == close)
}
