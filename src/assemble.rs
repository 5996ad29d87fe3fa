//! Chunk assembly: heading-aware merging with in-section overlap.
//!
//! ## The State Machine
//!
//! One pass over the labeled rows, no look-ahead:
//!
//! ```text
//!            body row: append to group
//!           ┌──────┐
//!           ▼      │
//!     ┌──────────────┐  heading row   ┌──────────┐
//!     │ ACCUMULATING │ ─────────────► │ EMITTING │ ── update heading path ─┐
//!     └──────────────┘  quote row     └──────────┘ ── emit quote alone ────┤
//!           ▲           end of rows                                        │
//!           └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! EMITTING flushes the group: merge, then overlap, then one row per chunk.
//! Nothing is carried across a flush, so the first chunk after a heading or
//! quotation never has an overlap prefix.
//!
//! ## Merging
//!
//! ```text
//! min = 50, max = 100
//! Group (words): [40, 40, 30, 300, 10]
//!
//! [40 + 40]        80: adding 30 would exceed 100, and 80 >= min
//! [30 + 300]       30 < min, so one more is pulled in (soft cap)
//! [10]             last paragraph
//! ```
//!
//! A paragraph that alone exceeds `max` is its own chunk.
//!
//! ## Overlap
//!
//! Chunk k > 0 in a group gets the last `max(1, floor(words * ratio))` words
//! of chunk k - 1 (before its own prefix) and a blank line in front:
//!
//! ```text
//! chunk 0: "a b c d e f g h i j"
//! chunk 1: "i j\n\nk l m n o"          ratio 0.2 -> 2 words
//! ```

use crate::{
    BookInfo, ChunkingConfig, HeadingPath, LabeledRow, OutputRow, Result, RowEmitter, WordBounds,
};

/// Separator between merged paragraphs and before an overlap prefix.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// One merged chunk of a heading section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Trailing words of the previous chunk, empty for the first chunk.
    pub overlap: String,
    /// The merged paragraphs.
    pub body: String,
    /// Words in `body`.
    pub words: usize,
    /// Paragraphs merged into `body`.
    pub paragraphs: usize,
}

impl Chunk {
    /// The chunk text: overlap prefix, blank line, body.
    #[must_use]
    pub fn text(&self) -> String {
        if self.overlap.is_empty() {
            self.body.clone()
        } else {
            format!("{}{PARAGRAPH_SEPARATOR}{}", self.overlap, self.body)
        }
    }
}

/// Groups body paragraphs under the heading hierarchy into overlapping chunks.
///
/// ## Example
///
/// ```rust
/// use parachunk::{BookInfo, ChunkAssembler, ChunkingConfig, LabeledRow, Paragraph};
///
/// let mut heading = LabeledRow::body(Paragraph::plain(0, "Chapter 1"));
/// heading.is_h1 = true;
/// let body = |i, n| LabeledRow::body(Paragraph::plain(i, &"word ".repeat(n)));
///
/// let rows = vec![heading, body(1, 40), body(2, 40)];
/// let assembler = ChunkAssembler::new(ChunkingConfig::new(50, 100, 0.2).unwrap());
/// let out = assembler.assemble(&rows, &BookInfo::new("Book", "Author"));
///
/// assert_eq!(out.len(), 1); // 40 + 40 fit in one chunk
/// assert_eq!(out[0].h1, "Chapter 1");
/// assert_eq!(out[0].text_chunk.split_whitespace().count(), 80);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ChunkAssembler {
    config: ChunkingConfig,
}

impl ChunkAssembler {
    /// Create an assembler.
    ///
    /// [`ChunkingConfig`] can only be built valid, so this cannot fail.
    #[must_use]
    pub const fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    /// The chunking configuration.
    #[must_use]
    pub const fn config(&self) -> ChunkingConfig {
        self.config
    }

    /// Turn labeled rows into output rows, in document order.
    ///
    /// Heading flags win over `is_quote` when both are set. Empty input gives
    /// empty output.
    #[must_use]
    pub fn assemble(&self, rows: &[LabeledRow], book: &BookInfo) -> Vec<OutputRow> {
        let mut run = Assembly {
            assembler: self,
            emitter: RowEmitter::new(book.clone()),
            path: HeadingPath::default(),
            group: Vec::new(),
            out: Vec::with_capacity(rows.len()),
        };

        for row in rows {
            if let Some(level) = row.heading_level() {
                run.flush();
                run.path.enter(level, row.text());
            } else if row.is_quote {
                run.flush();
                let quote = run.emitter.quotation(&run.path, row.text().to_string());
                run.out.push(quote);
            } else {
                let text = row.text().trim();
                if !text.is_empty() {
                    run.group.push(text);
                }
            }
        }
        run.flush();

        run.out
    }

    /// Merge and overlap one heading section's paragraphs.
    ///
    /// Exposed for callers that manage their own sections.
    #[must_use]
    pub fn chunk_group(&self, paragraphs: &[&str]) -> Vec<Chunk> {
        let mut chunks = merge(paragraphs, self.config.bounds());
        self.add_overlap(&mut chunks);
        chunks
    }

    fn add_overlap(&self, chunks: &mut [Chunk]) {
        for k in 1..chunks.len() {
            let prev: Vec<&str> = chunks[k - 1].body.split_whitespace().collect();
            let take = self.config.overlap_words(prev.len());
            let overlap = prev[prev.len() - take..].join(" ");
            chunks[k].overlap = overlap;
        }
    }
}

/// Mutable state of one `assemble` call.
struct Assembly<'a> {
    assembler: &'a ChunkAssembler,
    emitter: RowEmitter,
    path: HeadingPath,
    group: Vec<&'a str>,
    out: Vec<OutputRow>,
}

impl Assembly<'_> {
    fn flush(&mut self) {
        if self.group.is_empty() {
            return;
        }

        let chunks = self.assembler.chunk_group(&self.group);
        tracing::debug!(
            chapter = %self.path.chapter_name(),
            paragraphs = self.group.len(),
            chunks = chunks.len(),
            "flushed section"
        );

        for chunk in &chunks {
            tracing::trace!(
                words = chunk.words,
                paragraphs = chunk.paragraphs,
                overlap = chunk.overlap.split_whitespace().count(),
                "chunk"
            );
            let row = self.emitter.chunk(&self.path, chunk.text());
            self.out.push(row);
        }
        self.group.clear();
    }
}

/// Greedy left-to-right merge within one section.
fn merge(paragraphs: &[&str], bounds: WordBounds) -> Vec<Chunk> {
    let words: Vec<usize> = paragraphs
        .iter()
        .map(|p| p.split_whitespace().count())
        .collect();

    let mut chunks = Vec::new();
    let mut i = 0;
    while i < paragraphs.len() {
        if words[i] > bounds.max() {
            chunks.push(Chunk {
                overlap: String::new(),
                body: paragraphs[i].to_string(),
                words: words[i],
                paragraphs: 1,
            });
            i += 1;
            continue;
        }

        let mut j = i + 1;
        let mut total = words[i];
        while j < paragraphs.len() && bounds.fits(total, words[j]) {
            total += words[j];
            j += 1;
        }
        if bounds.is_short(total) && j < paragraphs.len() {
            total += words[j];
            j += 1;
        }

        chunks.push(Chunk {
            overlap: String::new(),
            body: paragraphs[i..j].join(PARAGRAPH_SEPARATOR),
            words: total,
            paragraphs: j - i,
        });
        i = j;
    }
    chunks
}

/// Assemble rows with explicit parameters.
///
/// # Errors
///
/// Returns an error for `min_words > max_words`, `max_words == 0`, or an
/// overlap ratio outside `[0, 1)`. Assembly itself cannot fail.
///
/// ```rust
/// use parachunk::assemble_chunks;
///
/// assert!(assemble_chunks(&[], "Book", "Author", 50, 100, 0.2).unwrap().is_empty());
/// assert!(assemble_chunks(&[], "Book", "Author", 200, 100, 0.2).is_err());
/// ```
pub fn assemble_chunks(
    rows: &[LabeledRow],
    book_name: &str,
    author_name: &str,
    min_words: usize,
    max_words: usize,
    overlap_ratio: f64,
) -> Result<Vec<OutputRow>> {
    let config = ChunkingConfig::new(min_words, max_words, overlap_ratio)?;
    Ok(ChunkAssembler::new(config).assemble(rows, &BookInfo::new(book_name, author_name)))
}
