//! Error types for parachunk.

/// Errors that can occur while configuring the pipeline or reading a document.
///
/// Classification and chunk assembly never fail once configured; every
/// variant here is either a configuration problem caught at construction
/// or a failure of the document reader.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Minimum words per chunk exceeds the maximum.
    #[error("min_words {min} exceeds max_words {max}")]
    InvalidWordBounds {
        /// The requested minimum.
        min: usize,
        /// The requested maximum.
        max: usize,
    },

    /// Maximum words per chunk must be > 0.
    #[error("max_words must be > 0")]
    ZeroMaxWords,

    /// Overlap ratio outside `[0, 1)` or not finite.
    #[error("overlap ratio {0} must be finite and in [0, 1)")]
    InvalidOverlapRatio(f64),

    /// A heading rule's minimum font size is negative or not finite.
    #[error("minimum font size {size} for {level} must be finite and >= 0")]
    InvalidFontSize {
        /// The heading level the rule belongs to.
        level: &'static str,
        /// The rejected size.
        size: f64,
    },

    /// `max_header_words` must be > 0.
    #[error("max_header_words must be > 0")]
    InvalidHeaderWords,

    /// The document could not be turned into paragraphs.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// I/O error while reading a document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The `.docx` container is not a readable ZIP archive.
    #[cfg(feature = "docx")]
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The `.docx` XML parts are malformed.
    #[cfg(feature = "docx")]
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Writing CSV output failed.
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for parachunk operations.
pub type Result<T> = std::result::Result<T, Error>;
