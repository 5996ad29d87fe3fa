//! Classification configuration.
//!
//! All types deserialize with defaults for missing fields, so a TOML file only
//! needs to name what it changes:
//!
//! ```toml
//! [classification]
//! max_header_words = 12
//!
//! [classification.levels.h2]
//! minimum_font_size = 15.0
//! require_bold = true
//!
//! [quotation]
//! treat_bold_as_quote = false
//!
//! [chunking]
//! min_words = 120
//! max_words = 200
//! ```
//!
//! Deserialized values are not trusted: call [`PipelineConfig::validate`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Alignment, ChunkingConfig, Error, Result};

/// Formatting rule for one heading level.
///
/// Fields missing from a configured level fall back to [`LevelRule::default`]
/// (13pt, bold not required), not to that level's built-in rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelRule {
    /// Whether this level is detected at all.
    pub enabled: bool,
    /// Average or maximum font size must reach this (points).
    pub minimum_font_size: f64,
    /// Require some bold (any bold run, or >= 40% bold coverage).
    pub require_bold: bool,
    /// Alignments a heading at this level may have.
    pub allowed_alignments: BTreeSet<Alignment>,
    /// Require the text to be a short phrase.
    pub require_short_phrase: bool,
}

impl LevelRule {
    /// An enabled rule with the given minimum size, all alignments allowed,
    /// short phrase required, bold not required.
    #[must_use]
    pub fn with_min_size(minimum_font_size: f64) -> Self {
        Self {
            enabled: true,
            minimum_font_size,
            require_bold: false,
            allowed_alignments: Alignment::ALL.into_iter().collect(),
            require_short_phrase: true,
        }
    }

    /// Require bold.
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.require_bold = true;
        self
    }

    /// Restrict alignments.
    #[must_use]
    pub fn aligned(mut self, alignments: &[Alignment]) -> Self {
        self.allowed_alignments = alignments.iter().copied().collect();
        self
    }

    /// A rule that never matches.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for LevelRule {
    fn default() -> Self {
        Self::with_min_size(13.0)
    }
}

/// The three heading level rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelRules {
    /// Level 1.
    pub h1: LevelRule,
    /// Level 2.
    pub h2: LevelRule,
    /// Level 3.
    pub h3: LevelRule,
}

impl LevelRules {
    /// Rules with their level names, in evaluation order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&'static str, &LevelRule)> {
        [("h1", &self.h1), ("h2", &self.h2), ("h3", &self.h3)].into_iter()
    }
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            h1: LevelRule::with_min_size(14.0).bold(),
            h2: LevelRule::with_min_size(13.0),
            h3: LevelRule::with_min_size(13.0),
        }
    }
}

/// Heading detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// When false every paragraph is body text and nothing is classified.
    pub auto_detect: bool,
    /// Most words a short phrase may have.
    pub max_header_words: usize,
    /// Penalize sentence-like text in the heading score.
    pub suppress_sentence_like: bool,
    /// Penalize quoted one-liners in the heading score.
    pub suppress_quoted_oneliners: bool,
    /// Per-level rules.
    pub levels: LevelRules,
}

impl ClassificationConfig {
    /// Manual mode: classification bypassed entirely.
    #[must_use]
    pub fn manual() -> Self {
        Self {
            auto_detect: false,
            ..Self::default()
        }
    }

    /// Check ranges.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHeaderWords`] for `max_header_words == 0`,
    /// [`Error::InvalidFontSize`] for a negative or non-finite minimum size.
    pub fn validate(&self) -> Result<()> {
        if self.max_header_words == 0 {
            return Err(Error::InvalidHeaderWords);
        }
        for (level, rule) in self.levels.iter() {
            let size = rule.minimum_font_size;
            if !size.is_finite() || size < 0.0 {
                return Err(Error::InvalidFontSize { level, size });
            }
        }
        Ok(())
    }
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            auto_detect: true,
            max_header_words: 15,
            suppress_sentence_like: true,
            suppress_quoted_oneliners: true,
            levels: LevelRules::default(),
        }
    }
}

/// Quotation detection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuotationConfig {
    /// Formatting-based quote rules only apply up to this many words.
    pub short_word_cutoff: usize,
    /// Short centered paragraphs are quotes.
    pub treat_centered_as_quote: bool,
    /// Short bold paragraphs are quotes.
    pub treat_bold_as_quote: bool,
    /// Short italic paragraphs are quotes.
    pub treat_italic_as_quote: bool,
    /// Quoted one-liners are quotes regardless of formatting.
    pub treat_quoted_oneliners_as_quote: bool,
}

impl QuotationConfig {
    /// Never flag anything as a quotation.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            short_word_cutoff: 0,
            treat_centered_as_quote: false,
            treat_bold_as_quote: false,
            treat_italic_as_quote: false,
            treat_quoted_oneliners_as_quote: false,
        }
    }
}

impl Default for QuotationConfig {
    fn default() -> Self {
        Self {
            short_word_cutoff: 60,
            treat_centered_as_quote: true,
            treat_bold_as_quote: true,
            treat_italic_as_quote: true,
            treat_quoted_oneliners_as_quote: true,
        }
    }
}

/// Everything a run of the pipeline needs besides the document itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Heading detection.
    pub classification: ClassificationConfig,
    /// Quotation detection.
    pub quotation: QuotationConfig,
    /// Chunk sizing and overlap.
    pub chunking: ChunkingConfig,
}

impl PipelineConfig {
    /// Check every section.
    ///
    /// Chunking bounds are validated when deserialized or constructed, so only
    /// classification needs an explicit pass.
    ///
    /// # Errors
    ///
    /// See [`ClassificationConfig::validate`].
    pub fn validate(&self) -> Result<()> {
        self.classification.validate()
    }
}
