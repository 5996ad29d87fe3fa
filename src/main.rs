//! # parachunk CLI
//!
//! Turns a `.docx` book (or a JSON array of paragraphs) into heading-aware,
//! overlapping text chunks.
//!
//! ## Examples
//!
//! ```bash
//! # CSV to stdout
//! parachunk novel.docx --book "Novel" --author "Someone"
//!
//! # Smaller chunks, written to a file Excel opens cleanly
//! parachunk novel.docx --min-words 80 --max-words 120 -o chunks.csv --bom
//!
//! # Check what was detected before chunking
//! parachunk novel.docx --preview 40
//!
//! # Apply hand corrections: {"12": {"is_h1": true}, "57": {"is_quote": false}}
//! parachunk novel.docx --overrides fixes.json --format json
//! ```

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use parachunk::{
    BookInfo, ChunkingConfig, DocxDocument, LabeledRow, Overrides, Paragraph, ParagraphSource,
    Pipeline, PipelineConfig,
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// UTF-8 byte order mark, for spreadsheet tools that need it.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Characters of paragraph text shown per preview line.
const PREVIEW_EXCERPT_CHARS: usize = 60;

#[derive(Parser)]
#[command(name = "parachunk")]
#[command(about = "Heading-aware paragraph chunking for RAG")]
#[command(version)]
struct Cli {
    /// Input document: .docx, or .json holding an array of paragraphs
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Book name written to every row
    #[arg(long, default_value = "")]
    book: String,

    /// Author name written to every row
    #[arg(long, default_value = "")]
    author: String,

    /// Pipeline configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum words per chunk
    #[arg(long)]
    min_words: Option<usize>,

    /// Maximum words per chunk
    #[arg(long)]
    max_words: Option<usize>,

    /// Fraction of the previous chunk repeated at the start of the next
    #[arg(long)]
    overlap: Option<f64>,

    /// Disable heading detection; only overrides mark headings
    #[arg(long)]
    manual: bool,

    /// Reviewer overrides (JSON map from paragraph index to flags)
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "csv")]
    format: OutputFormat,

    /// Prefix CSV output with a UTF-8 byte order mark
    #[arg(long)]
    bom: bool,

    /// Print the first N classified paragraphs instead of chunking
    #[arg(long, value_name = "N")]
    preview: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Csv,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = load_config(&cli)?;
    let pipeline = Pipeline::new(config).context("Invalid configuration")?;

    let source = open_source(&cli.input)?;
    let mut session = pipeline
        .review_source(source.as_ref())
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    if let Some(path) = &cli.overrides {
        let overrides = load_overrides(path)?;
        let accepted = session.extend_overrides(overrides.iter().map(|(&i, &o)| (i, o)));
        if accepted < overrides.len() {
            warn!(
                ignored = overrides.len() - accepted,
                "some overrides name paragraphs that are not in the document"
            );
        }
    }

    let mut out = open_output(cli.output.as_deref())?;

    if let Some(n) = cli.preview {
        for row in session.resolved_rows().iter().take(n) {
            writeln!(out, "{}", preview_line(row))?;
        }
        out.flush()?;
        return Ok(());
    }

    let book = BookInfo::new(&cli.book, &cli.author);
    let rows = session.generate(pipeline.assembler(), &book);

    match cli.format {
        OutputFormat::Csv => {
            if cli.bom {
                out.write_all(UTF8_BOM)?;
            }
            parachunk::write_csv(&rows, &mut out).context("Failed to write CSV")?;
            info!("CSV ready with {} rows", rows.len());
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &rows).context("Failed to write JSON")?;
            writeln!(out)?;
            info!("JSON ready with {} rows", rows.len());
        }
    }
    out.flush()?;

    Ok(())
}

/// Config file first, then command-line flags on top.
fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };

    if cli.min_words.is_some() || cli.max_words.is_some() || cli.overlap.is_some() {
        let current = config.chunking;
        config.chunking = ChunkingConfig::new(
            cli.min_words.unwrap_or(current.bounds().min()),
            cli.max_words.unwrap_or(current.bounds().max()),
            cli.overlap.unwrap_or(current.overlap_ratio()),
        )
        .context("Invalid chunking options")?;
    }
    if cli.manual {
        config.classification.auto_detect = false;
    }

    Ok(config)
}

fn open_source(path: &Path) -> Result<Box<dyn ParagraphSource>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let file =
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let paragraphs: Vec<Paragraph> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse paragraphs from {}", path.display()))?;
        Ok(Box::new(paragraphs))
    } else {
        let doc = DocxDocument::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Box::new(doc))
    }
}

fn load_overrides(path: &Path) -> Result<Overrides> {
    let file =
        File::open(path).with_context(|| format!("Failed to open overrides {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse overrides {}", path.display()))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    Ok(writer)
}

/// `index  flags  score  words  excerpt`, where flags are `1 2 3 Q` or `.`.
fn preview_line(row: &LabeledRow) -> String {
    let flag = |set: bool, c: char| if set { c } else { '.' };
    let flags: String = [
        flag(row.is_h1, '1'),
        flag(row.is_h2, '2'),
        flag(row.is_h3, '3'),
        flag(row.is_quote, 'Q'),
    ]
    .iter()
    .collect();

    let text = row.text().replace(['\n', '\t'], " ");
    let mut excerpt: String = text.chars().take(PREVIEW_EXCERPT_CHARS).collect();
    if text.chars().count() > PREVIEW_EXCERPT_CHARS {
        excerpt.push_str("...");
    }

    format!(
        "{:>6}  {flags}  {:>3}  {:>5}  {excerpt}",
        row.original_index(),
        row.heading_score,
        parachunk::word_count(row.text()),
    )
}
