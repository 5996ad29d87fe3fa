//! The Paragraph type: one block of document text with its formatting.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left aligned (also the fallback when a document says nothing).
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
    /// Justified.
    Justify,
}

impl Alignment {
    /// All four alignments, in declaration order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Center, Self::Right, Self::Justify];

    /// Lowercase name, as used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formatting of a single text run, as reported by a document reader.
///
/// Only direct formatting is recorded: a run whose boldness is inherited
/// from its style reads as not bold.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunFormat {
    /// The run's text.
    pub text: String,
    /// Directly bold.
    pub bold: bool,
    /// Directly italic.
    pub italic: bool,
    /// Font size in points, if set on the run.
    pub font_size: Option<f64>,
}

impl RunFormat {
    /// Create a plain run with no formatting.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Paragraph-level formatting summary.
///
/// Coverage fractions are computed over character counts of the text runs.
/// A paragraph with no runs has zero coverage and no font size; an absent
/// size means "unknown", never zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingInfo {
    /// Mean of the run font sizes that are set.
    pub average_font_size: Option<f64>,
    /// Largest run font size that is set.
    pub maximum_font_size: Option<f64>,
    /// Fraction of characters in bold runs, in `[0, 1]`.
    pub bold_coverage_fraction: f64,
    /// Whether any non-empty run is bold.
    pub any_bold: bool,
    /// Fraction of characters in italic runs, in `[0, 1]`.
    pub italic_coverage_fraction: f64,
    /// Whether any non-empty run is italic.
    pub any_italic: bool,
    /// Paragraph alignment.
    pub alignment: Alignment,
    /// Named paragraph style, lowercased (e.g. `"heading 1"`).
    pub named_style: String,
}

impl FormattingInfo {
    /// Summarize run-level formatting into paragraph-level statistics.
    ///
    /// ```rust
    /// use parachunk::{Alignment, FormattingInfo, RunFormat};
    ///
    /// let runs = [
    ///     RunFormat { text: "Bold".into(), bold: true, italic: false, font_size: Some(16.0) },
    ///     RunFormat { text: " rest".into(), bold: false, italic: false, font_size: Some(12.0) },
    /// ];
    /// let fmt = FormattingInfo::from_runs(&runs, Alignment::Center, "Heading 1");
    ///
    /// assert!(fmt.any_bold);
    /// assert!((fmt.bold_coverage_fraction - 4.0 / 9.0).abs() < 1e-9);
    /// assert_eq!(fmt.maximum_font_size, Some(16.0));
    /// assert_eq!(fmt.average_font_size, Some(14.0));
    /// assert_eq!(fmt.named_style, "heading 1");
    /// ```
    #[must_use]
    pub fn from_runs(runs: &[RunFormat], alignment: Alignment, style: &str) -> Self {
        let total: usize = runs.iter().map(|r| r.text.chars().count()).sum();
        let covered = |pick: fn(&RunFormat) -> bool| -> f64 {
            if total == 0 {
                return 0.0;
            }
            let n: usize = runs
                .iter()
                .filter(|r| pick(r))
                .map(|r| r.text.chars().count())
                .sum();
            n as f64 / total as f64
        };

        let sizes: Vec<f64> = runs.iter().filter_map(|r| r.font_size).collect();
        let average_font_size = if sizes.is_empty() {
            None
        } else {
            Some(sizes.iter().sum::<f64>() / sizes.len() as f64)
        };
        let maximum_font_size = sizes.iter().copied().reduce(f64::max);

        Self {
            average_font_size,
            maximum_font_size,
            bold_coverage_fraction: covered(|r| r.bold),
            any_bold: runs.iter().any(|r| r.bold && !r.text.is_empty()),
            italic_coverage_fraction: covered(|r| r.italic),
            any_italic: runs.iter().any(|r| r.italic && !r.text.is_empty()),
            alignment,
            named_style: style.to_lowercase(),
        }
    }
}

/// One paragraph of the input document.
///
/// `original_index` is assigned in document order by the reader and is the
/// stable key used to re-associate reviewer overrides with rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Position of the paragraph in the source document.
    pub original_index: usize,
    /// Paragraph text, trimmed.
    pub raw_text: String,
    /// Formatting summary.
    #[serde(default)]
    pub formatting: FormattingInfo,
}

impl Paragraph {
    /// Create a paragraph. The text is trimmed.
    #[must_use]
    pub fn new(original_index: usize, raw_text: &str, formatting: FormattingInfo) -> Self {
        Self {
            original_index,
            raw_text: raw_text.trim().to_string(),
            formatting,
        }
    }

    /// Create a paragraph with default (unknown) formatting.
    #[must_use]
    pub fn plain(original_index: usize, raw_text: &str) -> Self {
        Self::new(original_index, raw_text, FormattingInfo::default())
    }

    /// Whether the text is empty after trimming.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}
