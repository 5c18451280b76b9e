//! Page and document extraction with per-unit failure isolation.
//!
//! A bad block is skipped, a bad page is skipped, a bad document is
//! reported; none of them stops the caller. Each level returns an explicit
//! outcome value instead of an error so callers can count and log what
//! happened.

mod batch;
mod options;

pub use batch::{BatchProgress, BatchRunner, BatchSummary, StopFlag};
pub use options::ExtractOptions;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::error::Error;
use crate::layout::LayoutPipeline;
use crate::model::{Cell, DocumentResult, Glyph};
use crate::source::{document_id, DocumentLoader, GlyphSource};

/// Cells of one page and what it took to get them.
#[derive(Debug, Clone, Default)]
pub struct PageReport {
    /// Page number (1-indexed)
    pub page: u32,
    /// Cells in reading order, block indices dense from 0
    pub cells: Vec<Cell>,
    /// Blocks dropped because they had no visible text
    pub blank_blocks: usize,
    /// Blocks dropped because they could not be turned into cells
    pub failed_blocks: usize,
    /// Whether the row-band segmentation fallback ran
    pub segmentation_fallback: bool,
    /// Whether the coordinate-sort ordering fallback ran
    pub ordering_fallback: bool,
}

/// Result of processing one page.
#[derive(Debug)]
pub enum PageOutcome {
    /// The page was laid out (possibly yielding no cells)
    Extracted(PageReport),
    /// The page could not be processed and was skipped
    Failed {
        /// Page number (1-indexed)
        page: u32,
        /// Why the page was skipped
        error: Error,
    },
    /// Processing stopped before this page
    Cancelled,
}

/// Result of processing one document.
#[derive(Debug)]
pub enum DocumentOutcome {
    /// At least one cell was extracted
    Extracted(DocumentResult),
    /// The document was readable but produced no cells
    Empty {
        /// Document identifier
        id: String,
        /// Pages that could not be read
        skipped_pages: Vec<u32>,
    },
    /// The document could not be read
    Failed {
        /// Document identifier
        id: String,
        /// Why the document was skipped
        error: Error,
    },
    /// Processing stopped before the document was complete
    Cancelled {
        /// Document identifier
        id: String,
    },
}

impl DocumentOutcome {
    /// Identifier of the document.
    pub fn id(&self) -> &str {
        match self {
            DocumentOutcome::Extracted(result) => &result.id,
            DocumentOutcome::Empty { id, .. }
            | DocumentOutcome::Failed { id, .. }
            | DocumentOutcome::Cancelled { id } => id,
        }
    }

    /// Extracted cells, if any.
    pub fn result(&self) -> Option<&DocumentResult> {
        match self {
            DocumentOutcome::Extracted(result) => Some(result),
            _ => None,
        }
    }

    /// Pages skipped because they could not be read.
    pub fn skipped_pages(&self) -> &[u32] {
        match self {
            DocumentOutcome::Extracted(result) => &result.skipped_pages,
            DocumentOutcome::Empty { skipped_pages, .. } => skipped_pages,
            _ => &[],
        }
    }
}

/// Runs the layout pipeline over pages and documents.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    pipeline: LayoutPipeline,
    options: ExtractOptions,
}

impl Extractor {
    /// Create an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            pipeline: LayoutPipeline::new(&options.layout),
            options,
        }
    }

    /// Options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Turn the glyphs of one page into cells.
    ///
    /// Blank blocks are dropped without consuming a block index, so the
    /// emitted indices are always `0..cells.len()`.
    pub fn extract_page(&self, glyphs: &[Glyph], page: u32) -> PageReport {
        let layout = self.pipeline.layout(glyphs);
        let mut report = PageReport {
            page,
            segmentation_fallback: layout.segmentation_fallback,
            ordering_fallback: layout.ordering_fallback,
            ..PageReport::default()
        };

        for (position, block) in layout.blocks.iter().enumerate() {
            if block.is_blank() {
                report.blank_blocks += 1;
                continue;
            }
            let index = report.cells.len() as u32;
            match Cell::from_block(block, page, index, self.options.include_font) {
                Ok(cell) => report.cells.push(cell),
                Err(e) => {
                    log::warn!("Page {}: skipping block {}: {}", page, position, e);
                    report.failed_blocks += 1;
                }
            }
        }

        log::debug!(
            "Page {}: {} words, {} cells (segmentation fallback: {}, ordering fallback: {})",
            page,
            layout.word_count,
            report.cells.len(),
            report.segmentation_fallback,
            report.ordering_fallback
        );
        report
    }

    /// Read one page from a source and extract it.
    pub fn extract_source_page(&self, source: &dyn GlyphSource, page: u32) -> PageOutcome {
        match source.page_glyphs(page) {
            Ok(glyphs) => PageOutcome::Extracted(self.extract_page(&glyphs, page)),
            Err(error) => {
                log::error!("Error processing page {}: {}", page, error);
                PageOutcome::Failed { page, error }
            }
        }
    }

    /// Extract every page of a document.
    pub fn extract_document(&self, id: &str, source: &dyn GlyphSource) -> DocumentOutcome {
        self.extract_document_until(id, source, &AtomicBool::new(false))
    }

    /// Extract every page of a document unless `stop` is raised.
    ///
    /// A stopped document is reported as cancelled and none of its cells are
    /// returned.
    pub fn extract_document_until(
        &self,
        id: &str,
        source: &dyn GlyphSource,
        stop: &AtomicBool,
    ) -> DocumentOutcome {
        let page_count = match source.page_count() {
            Ok(count) => count,
            Err(error) => {
                log::error!("Error processing document {}: {}", id, error);
                return DocumentOutcome::Failed {
                    id: id.to_string(),
                    error,
                };
            }
        };

        let run_page = |page: u32| {
            if stop.load(Ordering::Relaxed) {
                return PageOutcome::Cancelled;
            }
            log::debug!("Processing page {} of {}", page, page_count);
            self.extract_source_page(source, page)
        };

        let outcomes: Vec<PageOutcome> = if self.options.parallel {
            (1..=page_count).into_par_iter().map(run_page).collect()
        } else {
            (1..=page_count).map(run_page).collect()
        };

        let mut result = DocumentResult::new(id);
        for outcome in outcomes {
            match outcome {
                PageOutcome::Extracted(report) => result.extend_page(report.cells),
                PageOutcome::Failed { page, .. } => result.skipped_pages.push(page),
                PageOutcome::Cancelled => {
                    return DocumentOutcome::Cancelled { id: id.to_string() };
                }
            }
        }

        if result.is_empty() {
            DocumentOutcome::Empty {
                id: id.to_string(),
                skipped_pages: result.skipped_pages,
            }
        } else {
            DocumentOutcome::Extracted(result)
        }
    }

    /// Open a file with `loader` and extract it.
    pub fn extract_file(&self, loader: &dyn DocumentLoader, path: &Path) -> DocumentOutcome {
        self.extract_file_until(loader, path, &AtomicBool::new(false))
    }

    /// Open a file with `loader` and extract it unless `stop` is raised.
    pub fn extract_file_until(
        &self,
        loader: &dyn DocumentLoader,
        path: &Path,
        stop: &AtomicBool,
    ) -> DocumentOutcome {
        let id = document_id(path);
        match loader.open(path) {
            Ok(source) => self.extract_document_until(&id, source.as_ref(), stop),
            Err(error) => {
                log::error!("Error processing document {}: {}", id, error);
                DocumentOutcome::Failed { id, error }
            }
        }
    }
}
