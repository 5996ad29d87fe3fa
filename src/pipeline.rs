//! The whole run: classify, review, assemble.

use crate::{
    BookInfo, ChunkAssembler, Classifier, OutputRow, Paragraph, ParagraphSource, PipelineConfig,
    Result, ReviewSession,
};

/// A validated classifier and assembler built from one [`PipelineConfig`].
///
/// Holds no per-document state; reuse it across documents and threads.
///
/// ```rust
/// use parachunk::{BookInfo, Paragraph, Pipeline, PipelineConfig};
///
/// let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
/// let rows = pipeline.run(
///     vec![Paragraph::plain(0, "Some text."), Paragraph::plain(1, "\"A quote.\"")],
///     &BookInfo::new("Book", "Author"),
/// );
/// assert_eq!(rows.len(), 2);
/// assert!(rows[1].quotation);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    classifier: Classifier,
    assembler: ChunkAssembler,
}

impl Pipeline {
    /// Build a pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let PipelineConfig {
            classification,
            quotation,
            chunking,
        } = config;
        Ok(Self {
            classifier: Classifier::new(classification, quotation)?,
            assembler: ChunkAssembler::new(chunking),
        })
    }

    /// The classifier.
    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// The assembler.
    #[must_use]
    pub fn assembler(&self) -> &ChunkAssembler {
        &self.assembler
    }

    /// Classify paragraphs into a session open for overrides.
    pub fn review<I>(&self, paragraphs: I) -> ReviewSession
    where
        I: IntoIterator<Item = Paragraph>,
    {
        ReviewSession::classify(paragraphs, &self.classifier)
    }

    /// Read paragraphs from `source` and start a review session.
    ///
    /// # Errors
    ///
    /// Returns whatever the source reports; nothing past extraction can fail.
    pub fn review_source<S: ParagraphSource + ?Sized>(&self, source: &S) -> Result<ReviewSession> {
        Ok(self.review(source.extract_paragraphs()?))
    }

    /// Classify and assemble without overrides.
    pub fn run<I>(&self, paragraphs: I, book: &BookInfo) -> Vec<OutputRow>
    where
        I: IntoIterator<Item = Paragraph>,
    {
        self.review(paragraphs).generate(&self.assembler, book)
    }
}
