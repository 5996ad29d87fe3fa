//! Paragraph classification: heading level, quotation, or body.
//!
//! ## The Pipeline
//!
//! ```text
//! Paragraph ──► style override? ──yes──► heading (rules skipped)
//!                    │ no
//!                    ▼
//!              level rules h1, h2, h3 ──► first match wins, score
//!                    │
//!                    ▼
//!              quotation rules (independent)
//!                    │
//!                    ▼
//!              heading wins: quote cleared on heading rows
//! ```
//!
//! ## Level Rules
//!
//! A level matches when it is enabled, the average or maximum font size
//! reaches its minimum, the alignment is allowed, bold is present if required
//! (any bold run or at least 40% bold coverage), and the text is a short
//! phrase if required. A paragraph without font size information never
//! passes the size check.
//!
//! Levels are evaluated in order and the first match decides the flag. The
//! heading score does not depend on the level, so the maximum over all
//! satisfied levels is the score of the winning level:
//!
//! | Signal | Score |
//! |--------|-------|
//! | bold (any run, or >= 60% coverage) | +1 |
//! | all caps | +1 |
//! | centered | +1 |
//! | short phrase | +1 |
//! | style name contains "heading" | +2 |
//! | sentence-like (when suppressed) | -2 |
//! | quoted one-liner (when suppressed) | -2 |
//!
//! The score is a confidence hint for reviewers; it never gates a match.
//!
//! ## Manual Mode
//!
//! With `auto_detect` off every row is body text with score 0 and no derived
//! features. A reviewer then tags headings by hand through
//! [`ReviewSession`](crate::ReviewSession).

use serde::{Deserialize, Serialize};

use crate::{
    Alignment, ClassificationConfig, HeadingLevel, LevelRule, Paragraph, ParagraphFeatures,
    QuotationConfig, Result,
};

/// Bold coverage that satisfies a `require_bold` rule.
const REQUIRED_BOLD_FRACTION: f64 = 0.4;

/// Coverage at which bold or italic counts as an emphasis signal.
const EMPHASIS_FRACTION: f64 = 0.6;

/// A paragraph with its classification.
///
/// The flags are plain fields: a reviewer may overwrite them before chunk
/// assembly, and assembly trusts whatever they say.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRow {
    /// The classified paragraph.
    #[serde(flatten)]
    pub paragraph: Paragraph,
    /// Level-1 heading.
    pub is_h1: bool,
    /// Level-2 heading.
    pub is_h2: bool,
    /// Level-3 heading.
    pub is_h3: bool,
    /// Standalone quotation.
    pub is_quote: bool,
    /// Heading confidence.
    pub heading_score: i32,
    /// Derived text features; `None` in manual mode.
    pub features: Option<ParagraphFeatures>,
}

impl LabeledRow {
    /// An unclassified body row.
    #[must_use]
    pub fn body(paragraph: Paragraph) -> Self {
        Self {
            paragraph,
            is_h1: false,
            is_h2: false,
            is_h3: false,
            is_quote: false,
            heading_score: 0,
            features: None,
        }
    }

    /// Stable index of the underlying paragraph.
    #[must_use]
    pub fn original_index(&self) -> usize {
        self.paragraph.original_index
    }

    /// Paragraph text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.paragraph.raw_text
    }

    /// The heading level, if any flag is set. Higher levels take precedence
    /// when a reviewer set more than one.
    #[must_use]
    pub fn heading_level(&self) -> Option<HeadingLevel> {
        if self.is_h1 {
            Some(HeadingLevel::H1)
        } else if self.is_h2 {
            Some(HeadingLevel::H2)
        } else if self.is_h3 {
            Some(HeadingLevel::H3)
        } else {
            None
        }
    }

    /// Whether any heading flag is set.
    #[must_use]
    pub fn is_heading(&self) -> bool {
        self.is_h1 || self.is_h2 || self.is_h3
    }

    /// Set exactly one heading flag, or clear all of them.
    pub fn set_heading(&mut self, level: Option<HeadingLevel>) {
        self.is_h1 = level == Some(HeadingLevel::H1);
        self.is_h2 = level == Some(HeadingLevel::H2);
        self.is_h3 = level == Some(HeadingLevel::H3);
    }
}

/// Validated classification settings.
///
/// ```rust
/// use parachunk::{Alignment, Classifier, FormattingInfo, Paragraph};
///
/// let classifier = Classifier::default();
/// let heading = Paragraph::new(0, "CHAPTER ONE", FormattingInfo {
///     average_font_size: Some(18.0),
///     maximum_font_size: Some(18.0),
///     any_bold: true,
///     bold_coverage_fraction: 1.0,
///     alignment: Alignment::Center,
///     ..FormattingInfo::default()
/// });
///
/// let row = classifier.classify(&heading);
/// assert!(row.is_h1);
/// assert!(!row.is_quote); // headings are never quotes
/// assert_eq!(row.heading_score, 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassificationConfig,
    quotes: QuotationConfig,
}

impl Classifier {
    /// Create a classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails [`ClassificationConfig::validate`].
    pub fn new(config: ClassificationConfig, quotes: QuotationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, quotes })
    }

    /// The heading settings.
    #[must_use]
    pub fn config(&self) -> &ClassificationConfig {
        &self.config
    }

    /// The quotation settings.
    #[must_use]
    pub fn quotes(&self) -> &QuotationConfig {
        &self.quotes
    }

    /// Classify one paragraph.
    #[must_use]
    pub fn classify(&self, paragraph: &Paragraph) -> LabeledRow {
        classify(paragraph, &self.config, &self.quotes)
    }

    /// Classify a document, dropping empty paragraphs and preserving order.
    pub fn classify_document<I>(&self, paragraphs: I) -> Vec<LabeledRow>
    where
        I: IntoIterator<Item = Paragraph>,
    {
        let mut rows: Vec<LabeledRow> = Vec::new();
        for paragraph in paragraphs {
            if paragraph.is_empty() {
                continue;
            }
            if let Some(prev) = rows.last() {
                if paragraph.original_index <= prev.original_index() {
                    tracing::warn!(
                        index = paragraph.original_index,
                        previous = prev.original_index(),
                        "paragraph indices are not strictly increasing"
                    );
                }
            }
            rows.push(self.classify(&paragraph));
        }

        tracing::debug!(
            rows = rows.len(),
            headings = rows.iter().filter(|r| r.is_heading()).count(),
            quotes = rows.iter().filter(|r| r.is_quote).count(),
            auto_detect = self.config.auto_detect,
            "classified document"
        );
        rows
    }
}

/// Classify one paragraph against explicit settings.
///
/// Total: never fails, whatever the text or formatting.
#[must_use]
pub fn classify(
    paragraph: &Paragraph,
    config: &ClassificationConfig,
    quotes: &QuotationConfig,
) -> LabeledRow {
    let mut row = LabeledRow::body(paragraph.clone());
    if !config.auto_detect {
        return row;
    }

    let features = ParagraphFeatures::extract(&paragraph.raw_text, config.max_header_words);
    let style = paragraph.formatting.named_style.to_lowercase();
    let score = heading_score(paragraph, &features, &style, config);

    let level = style_level(&style).or_else(|| {
        [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3]
            .into_iter()
            .zip(config.levels.iter())
            .find(|(_, (_, rule))| rule_matches(rule, paragraph, &features))
            .map(|(level, _)| level)
    });

    row.set_heading(level);
    row.heading_score = if level.is_some() { score } else { 0 };
    row.is_quote = level.is_none() && is_quotation(paragraph, &features, quotes);
    row.features = Some(features);
    row
}

/// Heading level forced by a named style such as "heading 2".
///
/// `style` must already be lowercased.
fn style_level(style: &str) -> Option<HeadingLevel> {
    let named = |n: u8| style.contains(&format!("heading {n}")) || style == format!("heading{n}");
    if named(1) {
        Some(HeadingLevel::H1)
    } else if named(2) {
        Some(HeadingLevel::H2)
    } else if named(3) {
        Some(HeadingLevel::H3)
    } else {
        None
    }
}

fn rule_matches(rule: &LevelRule, paragraph: &Paragraph, features: &ParagraphFeatures) -> bool {
    let fmt = &paragraph.formatting;
    if !rule.enabled {
        return false;
    }

    let big_enough = [fmt.average_font_size, fmt.maximum_font_size]
        .into_iter()
        .flatten()
        .any(|size| size >= rule.minimum_font_size);
    if !big_enough {
        return false;
    }

    if !rule.allowed_alignments.contains(&fmt.alignment) {
        return false;
    }
    if rule.require_bold && !fmt.any_bold && fmt.bold_coverage_fraction < REQUIRED_BOLD_FRACTION {
        return false;
    }
    if rule.require_short_phrase && !features.short_phrase {
        return false;
    }
    true
}

fn heading_score(
    paragraph: &Paragraph,
    features: &ParagraphFeatures,
    style: &str,
    config: &ClassificationConfig,
) -> i32 {
    let fmt = &paragraph.formatting;
    let mut score = 0;

    if is_bold(paragraph) {
        score += 1;
    }
    if features.all_caps {
        score += 1;
    }
    if fmt.alignment == Alignment::Center {
        score += 1;
    }
    if features.short_phrase {
        score += 1;
    }
    if style.contains("heading") {
        score += 2;
    }
    if config.suppress_sentence_like && features.sentence_like {
        score -= 2;
    }
    if config.suppress_quoted_oneliners && features.quoted_oneliner {
        score -= 2;
    }
    score
}

fn is_bold(paragraph: &Paragraph) -> bool {
    let fmt = &paragraph.formatting;
    fmt.any_bold || fmt.bold_coverage_fraction >= EMPHASIS_FRACTION
}

fn is_italic(paragraph: &Paragraph) -> bool {
    let fmt = &paragraph.formatting;
    fmt.any_italic || fmt.italic_coverage_fraction >= EMPHASIS_FRACTION
}

fn is_quotation(
    paragraph: &Paragraph,
    features: &ParagraphFeatures,
    quotes: &QuotationConfig,
) -> bool {
    if quotes.treat_quoted_oneliners_as_quote && features.quoted_oneliner {
        return true;
    }
    if features.word_count > quotes.short_word_cutoff {
        return false;
    }
    (quotes.treat_centered_as_quote && paragraph.formatting.alignment == Alignment::Center)
        || (quotes.treat_bold_as_quote && is_bold(paragraph))
        || (quotes.treat_italic_as_quote && is_italic(paragraph))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormattingInfo;

    fn para(text: &str, fmt: FormattingInfo) -> Paragraph {
        Paragraph::new(0, text, fmt)
    }

    fn sized(size: f64) -> FormattingInfo {
        FormattingInfo {
            average_font_size: Some(size),
            maximum_font_size: Some(size),
            ..FormattingInfo::default()
        }
    }

    fn bold_sized(size: f64) -> FormattingInfo {
        FormattingInfo {
            any_bold: true,
            bold_coverage_fraction: 1.0,
            ..sized(size)
        }
    }

    fn classify_default(p: &Paragraph) -> LabeledRow {
        Classifier::default().classify(p)
    }

    #[test]
    fn test_big_bold_is_h1() {
        let row = classify_default(&para("The Beginning", bold_sized(16.0)));
        assert!(row.is_h1);
        assert!(!row.is_h2 && !row.is_h3);
    }

    #[test]
    fn test_big_not_bold_falls_to_h2() {
        // h1 requires bold; h2 matches at 13pt
        let row = classify_default(&para("The Beginning", sized(16.0)));
        assert!(!row.is_h1);
        assert!(row.is_h2);
        assert!(!row.is_h3);
    }

    #[test]
    fn test_first_match_wins() {
        // Satisfies h1, h2 and h3; only h1 is set
        let row = classify_default(&para("Overview", bold_sized(20.0)));
        assert_eq!(row.heading_level(), Some(HeadingLevel::H1));
        assert!(!row.is_h2 && !row.is_h3);
    }

    #[test]
    fn test_missing_font_size_never_heading() {
        let fmt = FormattingInfo {
            any_bold: true,
            bold_coverage_fraction: 1.0,
            ..FormattingInfo::default()
        };
        let row = classify_default(&para("Overview", fmt));
        assert!(!row.is_heading());
    }

    #[test]
    fn test_max_size_alone_passes() {
        let fmt = FormattingInfo {
            average_font_size: Some(11.0),
            maximum_font_size: Some(14.0),
            ..FormattingInfo::default()
        };
        assert!(classify_default(&para("Overview", fmt)).is_h2);
    }

    #[test]
    fn test_partial_bold_satisfies_required_bold() {
        let fmt = FormattingInfo {
            bold_coverage_fraction: 0.5,
            ..sized(16.0)
        };
        assert!(classify_default(&para("Overview", fmt)).is_h1);
    }

    #[test]
    fn test_long_text_not_heading() {
        let text = "word ".repeat(16);
        let row = classify_default(&para(&text, bold_sized(20.0)));
        assert!(!row.is_heading());
    }

    #[test]
    fn test_alignment_restriction() {
        let mut config = ClassificationConfig::default();
        config.levels.h1 = LevelRule::with_min_size(14.0).aligned(&[Alignment::Center]);
        config.levels.h2 = LevelRule::disabled();
        config.levels.h3 = LevelRule::disabled();
        let quotes = QuotationConfig::default();

        let left = para("Overview", sized(16.0));
        assert!(!classify(&left, &config, &quotes).is_heading());

        let centered = para(
            "Overview",
            FormattingInfo {
                alignment: Alignment::Center,
                ..sized(16.0)
            },
        );
        assert!(classify(&centered, &config, &quotes).is_h1);
    }

    #[test]
    fn test_style_override_wins() {
        let fmt = FormattingInfo {
            named_style: "heading 2".into(),
            ..bold_sized(30.0)
        };
        let row = classify_default(&para("A long sentence that is clearly prose.", fmt));
        assert!(row.is_h2);
        assert!(!row.is_h1 && !row.is_h3);
    }

    #[test]
    fn test_style_without_space() {
        let fmt = FormattingInfo {
            named_style: "heading3".into(),
            ..FormattingInfo::default()
        };
        assert!(classify_default(&para("Notes", fmt)).is_h3);
    }

    #[test]
    fn test_style_case_insensitive() {
        let styled = |name: &str| FormattingInfo {
            named_style: name.into(),
            ..FormattingInfo::default()
        };
        let lower = classify_default(&para("Overview", styled("heading 1")));
        for name in ["Heading 1", "HEADING 1"] {
            let row = classify_default(&para("Overview", styled(name)));
            assert!(row.is_h1, "{name}");
            assert_eq!(row.heading_score, lower.heading_score, "{name}");
        }
        // short phrase + heading style
        assert_eq!(lower.heading_score, 3);

        let from_json: Paragraph = serde_json::from_str(
            r#"{"original_index": 0, "raw_text": "Overview",
                "formatting": {"named_style": "Heading 1"}}"#,
        )
        .unwrap();
        assert_eq!(classify_default(&from_json).heading_score, 3);
    }

    #[test]
    fn test_score_signals() {
        let fmt = FormattingInfo {
            alignment: Alignment::Center,
            named_style: "heading 1".into(),
            ..bold_sized(20.0)
        };
        // bold + caps + center + short + heading style
        assert_eq!(classify_default(&para("PART ONE", fmt)).heading_score, 6);

        // sentence-like penalty
        let row = classify_default(&para("It ends.", sized(14.0)));
        assert!(row.is_h2);
        assert_eq!(row.heading_score, 1 - 2);
    }

    #[test]
    fn test_score_penalty_respects_switch() {
        let config = ClassificationConfig {
            suppress_sentence_like: false,
            ..ClassificationConfig::default()
        };
        let row = classify(
            &para("It ends.", sized(14.0)),
            &config,
            &QuotationConfig::default(),
        );
        assert_eq!(row.heading_score, 1);
    }

    #[test]
    fn test_quoted_oneliner_is_quote() {
        let row = classify_default(&Paragraph::plain(0, "\"Stay.\""));
        assert!(row.is_quote);
        assert!(!row.is_heading());
    }

    #[test]
    fn test_short_italic_is_quote_long_is_not() {
        let italic = FormattingInfo {
            any_italic: true,
            italic_coverage_fraction: 1.0,
            ..FormattingInfo::default()
        };
        assert!(classify_default(&para("A short aside", italic.clone())).is_quote);

        let long = "word ".repeat(61);
        assert!(!classify_default(&para(&long, italic)).is_quote);
    }

    #[test]
    fn test_quote_switches() {
        let centered = para(
            "A centered line",
            FormattingInfo {
                alignment: Alignment::Center,
                ..FormattingInfo::default()
            },
        );
        let config = ClassificationConfig::default();
        assert!(classify(&centered, &config, &QuotationConfig::default()).is_quote);

        let quotes = QuotationConfig {
            treat_centered_as_quote: false,
            ..QuotationConfig::default()
        };
        assert!(!classify(&centered, &config, &quotes).is_quote);
        assert!(!classify(&centered, &config, &QuotationConfig::disabled()).is_quote);
    }

    #[test]
    fn test_heading_suppresses_quote() {
        // Bold and short: would be a quote, but it is a heading first
        let row = classify_default(&para("Overview", bold_sized(16.0)));
        assert!(row.is_h1);
        assert!(!row.is_quote);
    }

    #[test]
    fn test_manual_mode_bypasses_everything() {
        let classifier =
            Classifier::new(ClassificationConfig::manual(), QuotationConfig::default()).unwrap();
        let row = classifier.classify(&para("\"Stay.\"", bold_sized(30.0)));
        assert!(!row.is_heading());
        assert!(!row.is_quote);
        assert_eq!(row.heading_score, 0);
        assert!(row.features.is_none());
    }

    #[test]
    fn test_classify_document_drops_empty() {
        let rows = Classifier::default().classify_document(vec![
            Paragraph::plain(0, "first"),
            Paragraph::plain(1, "   "),
            Paragraph::plain(2, "second"),
        ]);
        let indices: Vec<usize> = rows.iter().map(LabeledRow::original_index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClassificationConfig {
            max_header_words: 0,
            ..ClassificationConfig::default()
        };
        assert!(Classifier::new(config, QuotationConfig::default()).is_err());
    }
}
