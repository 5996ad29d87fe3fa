//! # parachunk
//!
//! Heading-aware paragraph chunking for retrieval-augmented generation (RAG).
//!
//! ## The Problem
//!
//! Books and long reports carry their structure in formatting, not markup. A
//! chapter title is "the short bold 16pt line", an epigraph is "the centered
//! italic line". Plain-text chunkers throw that away:
//!
//! - A chunk that straddles two chapters retrieves as neither
//! - A heading merged into body text pollutes the embedding
//! - An epigraph glued to the next paragraph misattributes the quote
//! - Overlap that crosses a chapter boundary leaks context between sections
//!
//! parachunk reads the formatting first, then chunks inside the structure it
//! found.
//!
//! ## The Pipeline
//!
//! ```text
//! .docx ──extract──► Paragraphs ──classify──► LabeledRows ──(review)──► assemble ──► OutputRows
//!                    text + fmt               h1/h2/h3/quote            merge+overlap  flat records
//! ```
//!
//! ### Classification
//!
//! Each paragraph becomes a level-1/2/3 heading, a quotation, or body text.
//! A named style such as "Heading 2" decides outright. Otherwise per-level
//! rules check font size, bold, alignment and length; the first level that
//! matches wins. Short centered, bold or italic paragraphs and quoted
//! one-liners become quotations unless they are headings.
//!
//! ### Assembly
//!
//! Body paragraphs between two boundaries (headings or quotations) form a
//! section. Each section is merged greedily into chunks of `min..=max` words
//! and every chunk after the first repeats the tail of the one before it:
//!
//! ```text
//! # Chapter 1                 (h1)
//! para 40w  ┐
//! para 40w  ┘ ──► chunk "Chapter 1": 80 words
//! "Stay."                     (quote) ──► standalone row
//! para 300w   ──► chunk "Chapter 1": 300 words (too long to merge, never split)
//! ```
//!
//! Overlap never crosses a heading or a quotation.
//!
//! ## Quick Start
//!
//! ```rust
//! use parachunk::{BookInfo, FormattingInfo, Paragraph, Pipeline, PipelineConfig};
//!
//! let title = FormattingInfo {
//!     average_font_size: Some(18.0),
//!     maximum_font_size: Some(18.0),
//!     any_bold: true,
//!     bold_coverage_fraction: 1.0,
//!     ..FormattingInfo::default()
//! };
//! let paragraphs = vec![
//!     Paragraph::new(0, "The Beginning", title),
//!     Paragraph::plain(1, "It was a bright cold day in April."),
//! ];
//!
//! let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//! let rows = pipeline.run(paragraphs, &BookInfo::new("Novel", "Someone"));
//!
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].chapter_name, "The Beginning");
//! ```
//!
//! ## Features
//!
//! | Feature | Adds |
//! |---------|------|
//! | `docx` | [`DocxDocument`]: paragraphs and formatting from `.docx` files |
//! | `csv` | [`write_csv`]: the tabular output format |
//! | `cli` | the `parachunk` binary (implies `docx` and `csv`) |

mod assemble;
mod bounds;
mod classify;
mod config;
mod emit;
mod error;
mod features;
mod heading;
mod paragraph;
mod pipeline;
mod review;

#[cfg(feature = "docx")]
mod docx;

pub use assemble::{assemble_chunks, Chunk, ChunkAssembler, PARAGRAPH_SEPARATOR};
pub use bounds::{
    ChunkingConfig, WordBounds, DEFAULT_MAX_WORDS, DEFAULT_MIN_WORDS, DEFAULT_OVERLAP_RATIO,
};
pub use classify::{classify, Classifier, LabeledRow};
pub use config::{ClassificationConfig, LevelRule, LevelRules, PipelineConfig, QuotationConfig};
pub use emit::{BookInfo, OutputRow, RowEmitter, UNKNOWN_AUTHOR, UNKNOWN_BOOK};
pub use error::{Error, Result};
pub use features::{word_count, ParagraphFeatures};
pub use heading::{HeadingLevel, HeadingPath, INTRODUCTION};
pub use paragraph::{Alignment, FormattingInfo, Paragraph, RunFormat};
pub use pipeline::Pipeline;
pub use review::{apply_overrides, Overrides, ReviewSession, RowOverride};

#[cfg(feature = "csv")]
pub use emit::write_csv;

#[cfg(feature = "docx")]
pub use docx::DocxDocument;

/// A reader that turns a document into ordered paragraphs.
///
/// Implementations must number paragraphs in document order with strictly
/// increasing `original_index` values. Empty paragraphs may be kept or
/// dropped; classification drops them either way.
///
/// ```rust
/// use parachunk::{Paragraph, ParagraphSource, Result};
///
/// struct Lines(&'static str);
///
/// impl ParagraphSource for Lines {
///     fn extract_paragraphs(&self) -> Result<Vec<Paragraph>> {
///         Ok(self.0.lines().enumerate().map(|(i, l)| Paragraph::plain(i, l)).collect())
///     }
/// }
///
/// let paragraphs = Lines("one\n\ntwo").extract_paragraphs().unwrap();
/// assert_eq!(paragraphs.len(), 3);
/// ```
pub trait ParagraphSource {
    /// Extract all paragraphs.
    ///
    /// # Errors
    ///
    /// Any failure to read the document, reported as a single error.
    fn extract_paragraphs(&self) -> Result<Vec<Paragraph>>;
}

impl ParagraphSource for [Paragraph] {
    fn extract_paragraphs(&self) -> Result<Vec<Paragraph>> {
        Ok(self.to_vec())
    }
}

impl ParagraphSource for Vec<Paragraph> {
    fn extract_paragraphs(&self) -> Result<Vec<Paragraph>> {
        Ok(self.clone())
    }
}
