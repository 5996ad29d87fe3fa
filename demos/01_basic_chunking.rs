//! Basic Paragraph Chunking
//!
//! The minimal example: formatted paragraphs in, heading-tagged chunks out.
//!
//! ```bash
//! cargo run --example 01_basic_chunking
//! ```

use parachunk::{
    Alignment, BookInfo, ChunkingConfig, FormattingInfo, Paragraph, Pipeline, PipelineConfig,
};

fn main() {
    let title = FormattingInfo {
        average_font_size: Some(16.0),
        maximum_font_size: Some(16.0),
        bold_coverage_fraction: 1.0,
        any_bold: true,
        alignment: Alignment::Center,
        ..FormattingInfo::default()
    };
    let body = FormattingInfo {
        average_font_size: Some(11.0),
        maximum_font_size: Some(11.0),
        ..FormattingInfo::default()
    };

    let paragraphs = vec![
        Paragraph::new(0, "Learning From Data", title),
        Paragraph::new(
            1,
            "Machine learning models learn patterns from data. \
             They generalize these patterns to make predictions.",
            body.clone(),
        ),
        Paragraph::new(
            2,
            "This is fundamentally different from traditional programming, \
             where every rule is written by hand.",
            body.clone(),
        ),
        Paragraph::new(3, "\"All models are wrong, but some are useful.\"", body.clone()),
        Paragraph::new(
            4,
            "Deep learning extends this with multiple hidden layers. \
             Each layer learns increasingly abstract representations.",
            body,
        ),
    ];

    // Small bounds so a five-paragraph document yields several chunks
    let config = PipelineConfig {
        chunking: ChunkingConfig::new(10, 20, 0.2).expect("valid bounds"),
        ..PipelineConfig::default()
    };
    let pipeline = Pipeline::new(config).expect("valid configuration");
    let rows = pipeline.run(paragraphs, &BookInfo::new("Primer", "Anonymous"));

    println!("Rows: {}\n", rows.len());
    for (i, row) in rows.iter().enumerate() {
        let kind = if row.quotation { "quote" } else { "chunk" };
        println!("[{i}] {kind} in \"{}\":", row.chapter_name);
        println!("{}\n", row.text_chunk);
    }

    // Chunk 1 opens with the last words of chunk 0; the quotation and the
    // chunk after it never share overlap.
}
