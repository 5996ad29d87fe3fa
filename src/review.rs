//! Reviewer overrides and the review session.
//!
//! Classification is a pure function of the paragraphs and the configuration.
//! Manual corrections never touch that result. They live in a separate map
//! keyed by `original_index`, and are merged in when rows are resolved:
//!
//! ```text
//! paragraphs ──classify──► base rows ─┐
//!                                     ├──resolve──► final rows ──assemble──► output
//! reviewer edits ──► override map ────┘
//! ```
//!
//! Overrides always win over the classifier. Re-running assembly after more
//! edits needs no invalidation: nothing is cached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    BookInfo, ChunkAssembler, Classifier, HeadingLevel, LabeledRow, OutputRow, Paragraph,
};

/// Manual corrections for one row. `None` keeps the classifier's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RowOverride {
    /// Level-1 heading flag.
    pub is_h1: Option<bool>,
    /// Level-2 heading flag.
    pub is_h2: Option<bool>,
    /// Level-3 heading flag.
    pub is_h3: Option<bool>,
    /// Quotation flag.
    pub is_quote: Option<bool>,
}

impl RowOverride {
    /// Make the row a heading at `level`, or plain text for `None`.
    /// Clears the quotation flag.
    #[must_use]
    pub fn heading(level: Option<HeadingLevel>) -> Self {
        Self {
            is_h1: Some(level == Some(HeadingLevel::H1)),
            is_h2: Some(level == Some(HeadingLevel::H2)),
            is_h3: Some(level == Some(HeadingLevel::H3)),
            is_quote: Some(false),
        }
    }

    /// Set or clear the quotation flag only.
    #[must_use]
    pub fn quote(is_quote: bool) -> Self {
        Self {
            is_quote: Some(is_quote),
            ..Self::default()
        }
    }

    /// Layer `other` on top of `self`: fields set in `other` win.
    #[must_use]
    pub fn then(self, other: Self) -> Self {
        Self {
            is_h1: other.is_h1.or(self.is_h1),
            is_h2: other.is_h2.or(self.is_h2),
            is_h3: other.is_h3.or(self.is_h3),
            is_quote: other.is_quote.or(self.is_quote),
        }
    }

    /// Apply to a row.
    pub fn apply(&self, row: &mut LabeledRow) {
        if let Some(v) = self.is_h1 {
            row.is_h1 = v;
        }
        if let Some(v) = self.is_h2 {
            row.is_h2 = v;
        }
        if let Some(v) = self.is_h3 {
            row.is_h3 = v;
        }
        if let Some(v) = self.is_quote {
            row.is_quote = v;
        }
    }
}

/// Overrides keyed by `original_index`.
pub type Overrides = BTreeMap<usize, RowOverride>;

/// Merge base rows with overrides into the final rows.
///
/// Overrides naming an index that has no row are ignored.
#[must_use]
pub fn apply_overrides(rows: &[LabeledRow], overrides: &Overrides) -> Vec<LabeledRow> {
    rows.iter()
        .map(|row| {
            let mut row = row.clone();
            if let Some(o) = overrides.get(&row.original_index()) {
                o.apply(&mut row);
            }
            row
        })
        .collect()
}

/// One document under review.
///
/// Created when a document is loaded, edited through the `set_*` methods,
/// and dropped when the next document replaces it.
///
/// ```rust
/// use parachunk::{
///     BookInfo, ChunkAssembler, Classifier, HeadingLevel, Paragraph, ReviewSession,
/// };
///
/// let paragraphs = vec![
///     Paragraph::plain(0, "Prologue"),
///     Paragraph::plain(1, "It was a dark and stormy night."),
/// ];
/// let mut session = ReviewSession::classify(paragraphs, &Classifier::default());
///
/// // No font sizes, so nothing was detected; tag the heading by hand.
/// assert!(session.set_heading(0, Some(HeadingLevel::H1)));
///
/// let out = session.generate(&ChunkAssembler::default(), &BookInfo::default());
/// assert_eq!(out.len(), 1);
/// assert_eq!(out[0].chapter_name, "Prologue");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    rows: Vec<LabeledRow>,
    overrides: Overrides,
}

impl ReviewSession {
    /// Classify paragraphs and start a session with no overrides.
    pub fn classify<I>(paragraphs: I, classifier: &Classifier) -> Self
    where
        I: IntoIterator<Item = Paragraph>,
    {
        Self::from_rows(classifier.classify_document(paragraphs))
    }

    /// Start a session from already classified rows.
    #[must_use]
    pub fn from_rows(rows: Vec<LabeledRow>) -> Self {
        Self {
            rows,
            overrides: Overrides::new(),
        }
    }

    /// The classifier's rows, without overrides.
    #[must_use]
    pub fn base_rows(&self) -> &[LabeledRow] {
        &self.rows
    }

    /// Current overrides.
    #[must_use]
    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// Record an override, layered on any earlier one for the same row.
    ///
    /// Returns `false` (and records nothing) if no row has `index`.
    pub fn set_override(&mut self, index: usize, change: RowOverride) -> bool {
        if !self.contains(index) {
            tracing::warn!(index, "override for unknown paragraph ignored");
            return false;
        }
        let merged = self
            .overrides
            .get(&index)
            .map_or(change, |prev| prev.then(change));
        self.overrides.insert(index, merged);
        true
    }

    /// Make a row a heading at `level`, or body text for `None`.
    pub fn set_heading(&mut self, index: usize, level: Option<HeadingLevel>) -> bool {
        self.set_override(index, RowOverride::heading(level))
    }

    /// Set or clear a row's quotation flag.
    pub fn set_quote(&mut self, index: usize, is_quote: bool) -> bool {
        self.set_override(index, RowOverride::quote(is_quote))
    }

    /// Record many overrides at once. Returns how many were accepted.
    pub fn extend_overrides(
        &mut self,
        overrides: impl IntoIterator<Item = (usize, RowOverride)>,
    ) -> usize {
        overrides
            .into_iter()
            .filter(|&(index, change)| self.set_override(index, change))
            .count()
    }

    /// Drop the override for a row. Returns whether one existed.
    pub fn clear_override(&mut self, index: usize) -> bool {
        self.overrides.remove(&index).is_some()
    }

    /// Base rows with overrides applied.
    #[must_use]
    pub fn resolved_rows(&self) -> Vec<LabeledRow> {
        apply_overrides(&self.rows, &self.overrides)
    }

    /// Assemble output rows from the resolved rows.
    #[must_use]
    pub fn generate(&self, assembler: &ChunkAssembler, book: &BookInfo) -> Vec<OutputRow> {
        let rows = assembler.assemble(&self.resolved_rows(), book);
        tracing::info!(rows = rows.len(), overrides = self.overrides.len(), "output ready");
        rows
    }

    fn contains(&self, index: usize) -> bool {
        self.rows.iter().any(|r| r.original_index() == index)
    }
}
