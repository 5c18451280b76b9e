//! Page layout pipeline.
//!
//! Glyphs → words ([`WordAssembler`]) → blocks ([`BlockSegmenter`]) →
//! ordered blocks ([`ReadingOrderResolver`]). Each stage is an explicitly
//! constructed value holding its own options; nothing is shared between
//! pages, so pages can be laid out on any thread.

mod options;
mod reading_order;
mod segmenter;
pub mod stats;
mod words;

pub use options::{
    LayoutOptions, ReadingOrderOptions, SegmentationStrategy, SegmenterOptions, WordOptions,
};
pub use reading_order::{coordinate_order, ReadingOrder, ReadingOrderResolver};
pub use segmenter::{BlockSegmenter, Segmentation, SpacingStats};
pub use words::WordAssembler;

use crate::model::{Glyph, TextBlock};

/// Result of laying out one page.
#[derive(Debug, Clone)]
pub struct PageLayout {
    /// Blocks in reading order
    pub blocks: Vec<TextBlock>,
    /// Number of words assembled from the glyphs
    pub word_count: usize,
    /// Whether the row-band segmentation fallback ran
    pub segmentation_fallback: bool,
    /// Whether the coordinate-sort ordering fallback ran
    pub ordering_fallback: bool,
}

/// The three layout stages wired together.
#[derive(Debug, Clone, Default)]
pub struct LayoutPipeline {
    words: WordAssembler,
    segmenter: BlockSegmenter,
    resolver: ReadingOrderResolver,
}

impl LayoutPipeline {
    /// Build the pipeline from options.
    pub fn new(options: &LayoutOptions) -> Self {
        Self {
            words: WordAssembler::new(options.words.clone()),
            segmenter: BlockSegmenter::new(options.segmenter.clone()),
            resolver: ReadingOrderResolver::new(options.reading_order.clone()),
        }
    }

    /// Lay out the glyphs of one page.
    pub fn layout(&self, glyphs: &[Glyph]) -> PageLayout {
        let words = self.words.assemble(glyphs);
        let word_count = words.len();

        let segmentation = self.segmenter.segment(words);
        let order = self.resolver.resolve(segmentation.blocks);

        PageLayout {
            blocks: order.blocks,
            word_count,
            segmentation_fallback: segmentation.used_fallback,
            ordering_fallback: order.used_fallback,
        }
    }

    /// Word stage.
    pub fn word_assembler(&self) -> &WordAssembler {
        &self.words
    }

    /// Segmentation stage.
    pub fn segmenter(&self) -> &BlockSegmenter {
        &self.segmenter
    }

    /// Reading-order stage.
    pub fn resolver(&self) -> &ReadingOrderResolver {
        &self.resolver
    }
}
