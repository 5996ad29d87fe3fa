//! Chunk size bounds and overlap configuration.
//!
//! ## Min vs Max
//!
//! Body paragraphs are merged greedily until the next paragraph would push the
//! chunk past `max` words. Short paragraphs make that a problem:
//!
//! ```text
//! min = 50, max = 100
//! Paragraphs (words): [30, 90, 20]
//!
//! Greedy only:  [30] [90] [20]      <- 30 is well under the minimum
//! Min-priority: [30 + 90] [20]      <- pull one more paragraph in
//! ```
//!
//! When the greedy fill stops below `min`, exactly one more paragraph is pulled
//! in even though it breaks `max`. The minimum wins that tie; `max` is a soft
//! cap. A single paragraph already longer than `max` is emitted alone and never
//! split.
//!
//! ## Overlap
//!
//! Each chunk after the first in a heading section is prefixed with the last
//! `max(1, floor(words * ratio))` words of the chunk before it.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default minimum words per chunk.
pub const DEFAULT_MIN_WORDS: usize = 180;
/// Default maximum words per chunk.
pub const DEFAULT_MAX_WORDS: usize = 250;
/// Default overlap ratio.
pub const DEFAULT_OVERLAP_RATIO: f64 = 0.20;

/// Minimum and maximum words per chunk.
///
/// # Examples
///
/// ```rust
/// use parachunk::WordBounds;
///
/// let bounds = WordBounds::new(50, 100).unwrap();
/// assert_eq!(bounds.min(), 50);
/// assert_eq!(bounds.max(), 100);
///
/// // Inverted bounds are rejected up front
/// assert!(WordBounds::new(200, 100).is_err());
///
/// // Range syntax
/// let bounds = WordBounds::try_from(50..=100).unwrap();
/// assert_eq!(bounds.max(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWordBounds", into = "RawWordBounds")]
pub struct WordBounds {
    min: usize,
    max: usize,
}

impl WordBounds {
    /// Create bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroMaxWords`] if `max == 0` and
    /// [`Error::InvalidWordBounds`] if `min > max`.
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if max == 0 {
            return Err(Error::ZeroMaxWords);
        }
        if min > max {
            return Err(Error::InvalidWordBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Minimum words a chunk should reach.
    #[must_use]
    pub const fn min(&self) -> usize {
        self.min
    }

    /// Soft maximum words per chunk.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.max
    }

    /// Whether adding `additional` words to `current` stays within `max`.
    #[must_use]
    pub const fn fits(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) <= self.max
    }

    /// Whether a chunk of `words` is still short of `min`.
    #[must_use]
    pub const fn is_short(&self, words: usize) -> bool {
        words < self.min
    }
}

impl Default for WordBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_WORDS,
            max: DEFAULT_MAX_WORDS,
        }
    }
}

impl TryFrom<std::ops::RangeInclusive<usize>> for WordBounds {
    type Error = Error;

    fn try_from(range: std::ops::RangeInclusive<usize>) -> Result<Self> {
        Self::new(*range.start(), *range.end())
    }
}

#[derive(Serialize, Deserialize)]
struct RawWordBounds {
    min_words: usize,
    max_words: usize,
}

impl TryFrom<RawWordBounds> for WordBounds {
    type Error = Error;

    fn try_from(raw: RawWordBounds) -> Result<Self> {
        Self::new(raw.min_words, raw.max_words)
    }
}

impl From<WordBounds> for RawWordBounds {
    fn from(b: WordBounds) -> Self {
        Self {
            min_words: b.min,
            max_words: b.max,
        }
    }
}

/// Word bounds plus the trailing-context overlap ratio.
///
/// ```rust
/// use parachunk::ChunkingConfig;
///
/// let cfg = ChunkingConfig::new(50, 100, 0.2).unwrap();
/// assert_eq!(cfg.overlap_words(80), 16);
/// assert_eq!(cfg.overlap_words(3), 1); // never less than one word
///
/// assert!(ChunkingConfig::new(50, 100, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChunkingConfig", into = "RawChunkingConfig")]
pub struct ChunkingConfig {
    bounds: WordBounds,
    overlap_ratio: f64,
}

impl ChunkingConfig {
    /// Create a chunking configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds are invalid or `overlap_ratio` is not
    /// finite or outside `[0, 1)`.
    pub fn new(min_words: usize, max_words: usize, overlap_ratio: f64) -> Result<Self> {
        Self::from_bounds(WordBounds::new(min_words, max_words)?, overlap_ratio)
    }

    /// Create from already validated bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOverlapRatio`] for a ratio outside `[0, 1)`.
    pub fn from_bounds(bounds: WordBounds, overlap_ratio: f64) -> Result<Self> {
        if !overlap_ratio.is_finite() || !(0.0..1.0).contains(&overlap_ratio) {
            return Err(Error::InvalidOverlapRatio(overlap_ratio));
        }
        Ok(Self {
            bounds,
            overlap_ratio,
        })
    }

    /// The word bounds.
    #[must_use]
    pub const fn bounds(&self) -> WordBounds {
        self.bounds
    }

    /// Fraction of the previous chunk repeated as prefix.
    #[must_use]
    pub const fn overlap_ratio(&self) -> f64 {
        self.overlap_ratio
    }

    /// Number of trailing words carried over from a chunk of `prev_words`.
    ///
    /// `max(1, floor(prev_words * ratio))`, or 0 for an empty chunk.
    #[must_use]
    pub fn overlap_words(&self, prev_words: usize) -> usize {
        if prev_words == 0 {
            return 0;
        }
        let take = (prev_words as f64 * self.overlap_ratio).floor() as usize;
        take.clamp(1, prev_words)
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            bounds: WordBounds::default(),
            overlap_ratio: DEFAULT_OVERLAP_RATIO,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct RawChunkingConfig {
    min_words: usize,
    max_words: usize,
    overlap_ratio: f64,
}

impl Default for RawChunkingConfig {
    fn default() -> Self {
        ChunkingConfig::default().into()
    }
}

impl TryFrom<RawChunkingConfig> for ChunkingConfig {
    type Error = Error;

    fn try_from(raw: RawChunkingConfig) -> Result<Self> {
        Self::new(raw.min_words, raw.max_words, raw.overlap_ratio)
    }
}

impl From<ChunkingConfig> for RawChunkingConfig {
    fn from(c: ChunkingConfig) -> Self {
        Self {
            min_words: c.bounds.min,
            max_words: c.bounds.max,
            overlap_ratio: c.overlap_ratio,
        }
    }
}
