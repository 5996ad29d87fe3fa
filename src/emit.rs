//! Output records.
//!
//! One [`OutputRow`] per chunk or quotation. Field order is the column order
//! of the tabular output:
//!
//! ```text
//! book_name, author_name, h1, h2, h3, chapter_name, text_chunk, quotation
//! ```
//!
//! `text_chunk` keeps its blank-line paragraph separators as-is; CSV quoting
//! takes care of them. `quotation` is written as `true` / `false`.

use serde::{Deserialize, Serialize};

use crate::HeadingPath;

/// Book name used when none is given.
pub const UNKNOWN_BOOK: &str = "Unknown Book";
/// Author name used when none is given.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Book and author attached to every output row.
///
/// Deserializing goes through [`BookInfo::new`], so missing or blank names
/// get the same fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBookInfo")]
pub struct BookInfo {
    book_name: String,
    author_name: String,
}

impl BookInfo {
    /// Create book metadata. Blank names fall back to
    /// `"Unknown Book"` / `"Unknown Author"`.
    ///
    /// ```rust
    /// use parachunk::BookInfo;
    ///
    /// let info = BookInfo::new("  ", "Ada");
    /// assert_eq!(info.book_name(), "Unknown Book");
    /// assert_eq!(info.author_name(), "Ada");
    /// ```
    #[must_use]
    pub fn new(book_name: &str, author_name: &str) -> Self {
        let or = |s: &str, fallback: &str| {
            let s = s.trim();
            let name = if s.is_empty() { fallback } else { s };
            name.to_string()
        };
        Self {
            book_name: or(book_name, UNKNOWN_BOOK),
            author_name: or(author_name, UNKNOWN_AUTHOR),
        }
    }

    /// The book name.
    #[must_use]
    pub fn book_name(&self) -> &str {
        &self.book_name
    }

    /// The author name.
    #[must_use]
    pub fn author_name(&self) -> &str {
        &self.author_name
    }
}

impl Default for BookInfo {
    fn default() -> Self {
        Self::new("", "")
    }
}

/// One flat output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    /// Book name.
    pub book_name: String,
    /// Author name.
    pub author_name: String,
    /// Level-1 heading, empty if unset.
    pub h1: String,
    /// Level-2 heading, empty if unset.
    pub h2: String,
    /// Level-3 heading, empty if unset.
    pub h3: String,
    /// Set headings joined by `" | "`, or `"Introduction"`.
    pub chapter_name: String,
    /// Chunk or quotation text.
    pub text_chunk: String,
    /// Whether this row is a standalone quotation.
    pub quotation: bool,
}

impl OutputRow {
    /// Column names in output order.
    pub const COLUMNS: [&'static str; 8] = [
        "book_name",
        "author_name",
        "h1",
        "h2",
        "h3",
        "chapter_name",
        "text_chunk",
        "quotation",
    ];
}

/// Builds [`OutputRow`]s for one book.
#[derive(Debug, Clone, Default)]
pub struct RowEmitter {
    book: BookInfo,
}

impl RowEmitter {
    /// Create an emitter for `book`.
    #[must_use]
    pub fn new(book: BookInfo) -> Self {
        Self { book }
    }

    /// The book metadata.
    #[must_use]
    pub fn book(&self) -> &BookInfo {
        &self.book
    }

    /// A body chunk row.
    #[must_use]
    pub fn chunk(&self, path: &HeadingPath, text: String) -> OutputRow {
        self.row(path, text, false)
    }

    /// A standalone quotation row.
    #[must_use]
    pub fn quotation(&self, path: &HeadingPath, text: String) -> OutputRow {
        self.row(path, text, true)
    }

    fn row(&self, path: &HeadingPath, text_chunk: String, quotation: bool) -> OutputRow {
        OutputRow {
            book_name: self.book.book_name.clone(),
            author_name: self.book.author_name.clone(),
            h1: path.h1().unwrap_or_default().to_string(),
            h2: path.h2().unwrap_or_default().to_string(),
            h3: path.h3().unwrap_or_default().to_string(),
            chapter_name: path.chapter_name(),
            text_chunk,
            quotation,
        }
    }
}

/// Write rows as CSV. The header line is written even when `rows` is empty.
///
/// # Errors
///
/// Returns [`Error::Csv`](crate::Error::Csv) if serialization or the
/// underlying writer fails.
#[cfg(feature = "csv")]
pub fn write_csv<W: std::io::Write>(rows: &[OutputRow], writer: W) -> crate::Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(OutputRow::COLUMNS)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawBookInfo {
    book_name: String,
    author_name: String,
}

impl From<RawBookInfo> for BookInfo {
    fn from(raw: RawBookInfo) -> Self {
        Self::new(&raw.book_name, &raw.author_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeadingLevel;

    #[test]
    fn test_row_without_headings() {
        let emitter = RowEmitter::new(BookInfo::new("Book", "Author"));
        let row = emitter.chunk(&HeadingPath::default(), "text".into());
        assert_eq!(row.h1, "");
        assert_eq!(row.chapter_name, "Introduction");
        assert!(!row.quotation);
    }

    #[test]
    fn test_quotation_row_uses_path() {
        let mut path = HeadingPath::default();
        path.enter(HeadingLevel::H1, "One");
        path.enter(HeadingLevel::H2, "Two");
        let row = RowEmitter::default().quotation(&path, "\"Stay.\"".into());
        assert_eq!(row.book_name, UNKNOWN_BOOK);
        assert_eq!(row.author_name, UNKNOWN_AUTHOR);
        assert_eq!(row.h2, "Two");
        assert_eq!(row.h3, "");
        assert_eq!(row.chapter_name, "One | Two");
        assert!(row.quotation);
    }

    #[test]
    fn test_book_info_deserialize_applies_fallbacks() {
        let info: BookInfo =
            serde_json::from_str(r#"{"book_name": "  Dune ", "author_name": ""}"#).unwrap();
        assert_eq!(info, BookInfo::new("Dune", ""));
        assert_eq!(info.author_name(), UNKNOWN_AUTHOR);

        let info: BookInfo = serde_json::from_str("{}").unwrap();
        assert_eq!(info.book_name(), UNKNOWN_BOOK);
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_columns_and_literal_separators() {
        let emitter = RowEmitter::new(BookInfo::new("B", "A"));
        let rows = vec![
            emitter.chunk(&HeadingPath::default(), "first\n\nsecond".into()),
            emitter.quotation(&HeadingPath::default(), "q".into()),
        ];
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.starts_with(
            "book_name,author_name,h1,h2,h3,chapter_name,text_chunk,quotation\n"
        ));
        assert!(out.contains("\"first\n\nsecond\",false"));
        assert!(out.contains(",q,true"));
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_empty_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            format!("{}\n", OutputRow::COLUMNS.join(","))
        );
    }
}
