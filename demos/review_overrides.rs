//! Reviewing Classification
//!
//! Plain text carries no font sizes, so nothing is detected as a heading.
//! A reviewer marks the structure by hand, and chunks are regenerated
//! without re-classifying.
//!
//! ```bash
//! cargo run --example review_overrides
//! ```

use parachunk::{
    BookInfo, ChunkAssembler, ChunkingConfig, Classifier, HeadingLevel, Paragraph, ReviewSession,
};

const TEXT: &str = "Prologue

The storm had been building all afternoon over the harbor.

Nobody on the docks paid it much attention until the bells began.

Part One

Morning came grey and quiet, the boats still tied where they had been left.";

fn main() {
    let paragraphs: Vec<Paragraph> = TEXT
        .split("\n\n")
        .enumerate()
        .map(|(i, text)| Paragraph::plain(i, text))
        .collect();

    let mut session = ReviewSession::classify(paragraphs, &Classifier::default());
    let assembler = ChunkAssembler::new(ChunkingConfig::new(5, 15, 0.2).expect("valid bounds"));
    let book = BookInfo::new("Harbor", "");

    println!("Before review:");
    for row in session.generate(&assembler, &book) {
        println!("  {:<20} {}", row.chapter_name, row.text_chunk.replace('\n', " / "));
    }

    session.set_heading(0, Some(HeadingLevel::H1));
    session.set_heading(3, Some(HeadingLevel::H1));

    println!("\nAfter marking paragraphs 0 and 3 as headings:");
    for row in session.generate(&assembler, &book) {
        println!("  {:<20} {}", row.chapter_name, row.text_chunk.replace('\n', " / "));
    }

    println!("\nOverrides: {:?}", session.overrides().keys().collect::<Vec<_>>());
}
