//! # pagecells
//!
//! Layout cell extraction for PDF pages.
//!
//! Positioned glyphs are grouped into words, words are clustered into
//! paragraph blocks, and blocks are put into reading order. Each block
//! becomes a [`Cell`] (bounding box, text, page, reading-order index), and
//! a directory of documents is written as a CSV submission with one
//! `id,solution` row per document.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pagecells::process_directory;
//!
//! fn main() -> pagecells::Result<()> {
//!     let summary = process_directory("glyphs/", "submission.csv")?;
//!     println!("{} documents written", summary.written);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Docstrum segmentation**: thresholds derived from each page's own spacing
//! - **Row-band fallback**: pages the statistics cannot handle still yield blocks
//! - **Column-aware reading order**: topological sort with a coordinate fallback
//! - **Failure isolation**: bad blocks, pages and documents are skipped, not fatal
//! - **Parallel processing**: uses Rayon for multi-page documents
//! - **CJK support**: no spaces inserted between CJK words

pub mod error;
pub mod extract;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{
    BatchProgress, BatchRunner, BatchSummary, DocumentOutcome, ExtractOptions, Extractor,
    PageOutcome, PageReport, StopFlag,
};
pub use geometry::{BoundingBox, Point};
pub use layout::{
    LayoutOptions, LayoutPipeline, ReadingOrderOptions, SegmentationStrategy, SegmenterOptions,
    WordOptions,
};
pub use model::{BlockType, Cell, DocumentResult, FontInfo, Glyph, TextBlock, TextLine, Word};
pub use render::{read_submission, JsonFormat, SubmissionWriter};
pub use source::{
    document_id, DocumentLoader, GlyphDump, GlyphDumpLoader, GlyphSource, MemoryDocument,
};

use std::path::Path;

/// Extract the cells of one page with default options.
///
/// # Example
///
/// ```
/// use pagecells::{extract_page, BoundingBox, Glyph};
///
/// let glyphs: Vec<Glyph> = "Hi"
///     .chars()
///     .enumerate()
///     .map(|(i, c)| {
///         let left = i as f32 * 6.0;
///         Glyph::new(c.to_string(), BoundingBox::new(left, 0.0, left + 6.0, 10.0))
///     })
///     .collect();
///
/// let cells = extract_page(&glyphs, 1);
/// assert_eq!(cells.len(), 1);
/// assert_eq!(cells[0].text, "Hi");
/// ```
pub fn extract_page(glyphs: &[Glyph], page: u32) -> Vec<Cell> {
    Extractor::default().extract_page(glyphs, page).cells
}

/// Extract the cells of one page with custom options.
pub fn extract_page_with_options(
    glyphs: &[Glyph],
    page: u32,
    options: ExtractOptions,
) -> Vec<Cell> {
    Extractor::new(options).extract_page(glyphs, page).cells
}

/// Extract a glyph dump file with default options.
///
/// # Example
///
/// ```no_run
/// use pagecells::{extract_file, DocumentOutcome};
///
/// match extract_file("glyphs/report.json") {
///     DocumentOutcome::Extracted(result) => println!("{} cells", result.cell_count()),
///     other => println!("nothing extracted from {}", other.id()),
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> DocumentOutcome {
    Extractor::default().extract_file(&GlyphDumpLoader::new(), path.as_ref())
}

/// Process every glyph dump in `input_dir` into a submission CSV.
pub fn process_directory<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_csv: Q,
) -> Result<BatchSummary> {
    process_directory_with_options(input_dir, output_csv, ExtractOptions::default())
}

/// Process every glyph dump in `input_dir` into a submission CSV with
/// custom options.
///
/// # Example
///
/// ```no_run
/// use pagecells::{process_directory_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new().sequential().with_font(true);
/// let summary = process_directory_with_options("glyphs/", "out.csv", options)?;
/// # Ok::<(), pagecells::Error>(())
/// ```
pub fn process_directory_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_csv: Q,
    options: ExtractOptions,
) -> Result<BatchSummary> {
    let runner = BatchRunner::new(Extractor::new(options), Box::new(GlyphDumpLoader::new()));
    let paths = runner.discover(input_dir)?;
    let mut sink = SubmissionWriter::create(output_csv)?;
    runner.run_paths(&paths, &mut sink, |_| {})
}
