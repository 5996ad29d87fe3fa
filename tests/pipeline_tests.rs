//! End-to-end tests: paragraphs in, flat rows out.

use parachunk::{
    assemble_chunks, Alignment, BookInfo, ChunkingConfig, Error, FormattingInfo, HeadingLevel,
    LabeledRow, Paragraph, Pipeline, PipelineConfig, RowOverride,
};

// =============================================================================
// Fixtures
// =============================================================================

fn fmt(size: f64, bold: bool, italic: bool, alignment: Alignment) -> FormattingInfo {
    FormattingInfo {
        average_font_size: Some(size),
        maximum_font_size: Some(size),
        bold_coverage_fraction: if bold { 1.0 } else { 0.0 },
        any_bold: bold,
        italic_coverage_fraction: if italic { 1.0 } else { 0.0 },
        any_italic: italic,
        alignment,
        named_style: "normal".to_string(),
    }
}

fn body_text(tag: &str, n: usize) -> String {
    (0..n)
        .map(|i| format!("{tag}{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A small book: part title, chapter title, epigraph, body, quoted line, body.
fn book() -> Vec<Paragraph> {
    vec![
        Paragraph::new(0, "PART ONE", fmt(18.0, true, false, Alignment::Center)),
        Paragraph::new(1, "The Arrival", fmt(13.0, false, false, Alignment::Left)),
        Paragraph::new(
            2,
            "Not all those who wander are lost.",
            fmt(12.0, false, true, Alignment::Center),
        ),
        Paragraph::new(3, &body_text("a", 30), fmt(12.0, false, false, Alignment::Justify)),
        Paragraph::new(4, &body_text("b", 30), fmt(12.0, false, false, Alignment::Justify)),
        Paragraph::new(5, "\"Who goes there?\"", fmt(12.0, false, false, Alignment::Left)),
        Paragraph::new(6, &body_text("c", 30), fmt(12.0, false, false, Alignment::Justify)),
    ]
}

fn pipeline(min: usize, max: usize, ratio: f64) -> Pipeline {
    Pipeline::new(PipelineConfig {
        chunking: ChunkingConfig::new(min, max, ratio).unwrap(),
        ..PipelineConfig::default()
    })
    .unwrap()
}

// =============================================================================
// Classification to Output
// =============================================================================

#[test]
fn book_classifies_and_assembles() {
    let p = pipeline(20, 40, 0.2);
    let session = p.review(book());
    let rows = session.base_rows();

    assert!(rows[0].is_h1, "18pt bold centered is a part title");
    assert!(rows[1].is_h2, "13pt without bold misses h1 and lands on h2");
    assert!(rows[2].is_quote, "short centered italic line is an epigraph");
    assert!(!rows[3].is_heading() && !rows[3].is_quote);
    assert!(rows[5].is_quote, "quoted one-liner");

    let out = session.generate(p.assembler(), &BookInfo::new("Novel", "Someone"));
    let kinds: Vec<(bool, usize)> = out
        .iter()
        .map(|r| (r.quotation, r.text_chunk.split_whitespace().count()))
        .collect();
    // epigraph, a (30), b (30 + 6 overlap), quote, c (30, no overlap)
    assert_eq!(
        kinds,
        vec![(true, 7), (false, 30), (false, 36), (true, 3), (false, 30)]
    );

    for row in &out {
        assert_eq!(row.book_name, "Novel");
        assert_eq!(row.h1, "PART ONE");
        assert_eq!(row.h2, "The Arrival");
        assert_eq!(row.chapter_name, "PART ONE | The Arrival");
    }
    assert!(out[2].text_chunk.starts_with("a24 a25 a26 a27 a28 a29\n\nb0 "));
    assert!(out[4].text_chunk.starts_with("c0 "));
}

#[test]
fn overrides_split_sections() {
    let p = pipeline(20, 40, 0.2);
    let mut session = p.review(book());

    // Paragraph 4 becomes a level-3 heading, the quoted line becomes body text
    assert!(session.set_heading(4, Some(HeadingLevel::H3)));
    assert!(session.set_quote(5, false));

    let out = session.generate(p.assembler(), &BookInfo::default());
    assert_eq!(out.len(), 3);

    assert_eq!(out[1].h3, "");
    assert_eq!(out[1].text_chunk, body_text("a", 30));

    assert_eq!(out[2].h3, body_text("b", 30));
    assert_eq!(out[2].chapter_name, format!("PART ONE | The Arrival | {}", body_text("b", 30)));
    // 3 + 30 words merge under the new heading
    assert_eq!(
        out[2].text_chunk,
        format!("\"Who goes there?\"\n\n{}", body_text("c", 30))
    );
}

#[test]
fn manual_mode_needs_overrides_for_structure() {
    let mut config = PipelineConfig::default();
    config.classification.auto_detect = false;
    let p = Pipeline::new(config).unwrap();

    let mut session = p.review(book());
    assert!(session.base_rows().iter().all(|r| r.features.is_none()));

    let out = session.generate(p.assembler(), &BookInfo::default());
    assert_eq!(out.len(), 1, "everything is body text, and it all fits in one chunk");
    assert_eq!(out[0].chapter_name, "Introduction");

    session.extend_overrides([(0, RowOverride::heading(Some(HeadingLevel::H1)))]);
    let out = session.generate(p.assembler(), &BookInfo::default());
    assert_eq!(out[0].chapter_name, "PART ONE");
}

// =============================================================================
// Worked Examples
// =============================================================================

#[test]
fn chapter_quote_and_oversized_paragraph() {
    let mut heading = LabeledRow::body(Paragraph::plain(0, "Chapter 1"));
    heading.is_h1 = true;
    let mut quote = LabeledRow::body(Paragraph::plain(3, "\"Stay.\""));
    quote.is_quote = true;
    let rows = vec![
        heading,
        LabeledRow::body(Paragraph::plain(1, &"word ".repeat(40))),
        LabeledRow::body(Paragraph::plain(2, &"word ".repeat(40))),
        quote,
        LabeledRow::body(Paragraph::plain(4, &"word ".repeat(300))),
    ];

    let out = assemble_chunks(&rows, "Book", "Author", 50, 100, 0.2).unwrap();
    assert_eq!(out.len(), 3);

    assert_eq!(out[0].text_chunk.split_whitespace().count(), 80);
    assert_eq!(out[0].h1, "Chapter 1");
    assert!(!out[0].quotation);

    assert_eq!(out[1].text_chunk, "\"Stay.\"");
    assert!(out[1].quotation);

    assert_eq!(out[2].text_chunk.split_whitespace().count(), 300);
    assert!(!out[2].quotation);
}

#[test]
fn empty_document_is_not_an_error() {
    let out = assemble_chunks(&[], "", "", 180, 250, 0.2).unwrap();
    assert!(out.is_empty());

    let out = pipeline(180, 250, 0.2).run(
        vec![Paragraph::plain(0, "  "), Paragraph::plain(1, "")],
        &BookInfo::default(),
    );
    assert!(out.is_empty());
}

#[test]
fn inverted_bounds_fail_fast() {
    assert!(matches!(
        assemble_chunks(&[], "", "", 300, 200, 0.2),
        Err(Error::InvalidWordBounds { min: 300, max: 200 })
    ));
    assert!(matches!(
        ChunkingConfig::new(10, 20, 1.0),
        Err(Error::InvalidOverlapRatio(_))
    ));
}

// =============================================================================
// Serialized Inputs
// =============================================================================

#[test]
fn paragraphs_from_json_default_formatting() {
    let json = r#"[
        {"original_index": 0, "raw_text": "Intro text."},
        {"original_index": 1, "raw_text": "Prologue",
         "formatting": {"average_font_size": 20.0, "any_bold": true, "alignment": "center"}}
    ]"#;
    let paragraphs: Vec<Paragraph> = serde_json::from_str(json).unwrap();
    assert_eq!(paragraphs[0].formatting, FormattingInfo::default());
    assert_eq!(paragraphs[1].formatting.alignment, Alignment::Center);

    let out = pipeline(1, 10, 0.2).run(paragraphs, &BookInfo::default());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].chapter_name, "Introduction");
}

#[test]
fn partial_toml_config_keeps_defaults() {
    let config: PipelineConfig = toml::from_str(
        r#"
        [classification]
        max_header_words = 8

        [classification.levels.h2]
        minimum_font_size = 15.0
        require_bold = true

        [chunking]
        min_words = 100
        max_words = 150
        "#,
    )
    .unwrap();

    assert_eq!(config.classification.max_header_words, 8);
    assert!(config.classification.suppress_sentence_like);
    assert!((config.classification.levels.h2.minimum_font_size - 15.0).abs() < 1e-9);
    assert!(config.classification.levels.h2.require_bold);
    assert!((config.classification.levels.h1.minimum_font_size - 14.0).abs() < 1e-9);
    assert_eq!(config.chunking.bounds().min(), 100);
    assert!((config.chunking.overlap_ratio() - 0.2).abs() < 1e-9);
    assert!(Pipeline::new(config).is_ok());
}

#[test]
fn inverted_toml_bounds_rejected() {
    let parsed: Result<PipelineConfig, _> = toml::from_str(
        r#"
        [chunking]
        min_words = 300
        max_words = 100
        "#,
    );
    assert!(parsed.is_err());
}

// =============================================================================
// DOCX to CSV
// =============================================================================

#[cfg(all(feature = "docx", feature = "csv"))]
mod docx_to_csv {
    use std::io::{Cursor, Write};

    use parachunk::{write_csv, BookInfo, DocxDocument, OutputRow, Pipeline, PipelineConfig};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn docx(body: &str) -> DocxDocument {
        let document = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(document.as_bytes()).unwrap();
        DocxDocument::from_bytes(zip.finish().unwrap().into_inner())
    }

    #[test]
    fn docx_document_to_csv() {
        let doc = docx(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Chapter One</w:t></w:r></w:p>
               <w:p><w:r><w:t>First paragraph of the chapter.</w:t></w:r></w:p>
               <w:p><w:r><w:t>Second paragraph &amp; more.</w:t></w:r></w:p>
               <w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Fin.</w:t></w:r></w:p>"#,
        );

        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        let rows = pipeline
            .review_source(&doc)
            .unwrap()
            .generate(pipeline.assembler(), &BookInfo::new("Tale", ""));
        assert_eq!(rows.len(), 2);

        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], OutputRow::COLUMNS.join(","));
        assert_eq!(
            lines[1],
            "Tale,Unknown Author,Chapter One,,,Chapter One,\"First paragraph of the chapter."
        );
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Second paragraph & more.\",false");
        assert_eq!(lines[4], "Tale,Unknown Author,Chapter One,,,Chapter One,Fin.,true");
    }
}
