//! Layout pipeline options and configuration.

use serde::{Deserialize, Serialize};

/// Options for grouping glyphs into words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordOptions {
    /// Largest horizontal gap between adjacent glyphs, as a fraction of the
    /// glyph size
    pub max_gap_ratio: f32,

    /// Largest baseline offset between adjacent glyphs, as a fraction of the
    /// glyph size
    pub baseline_tolerance: f32,
}

impl WordOptions {
    /// Create word options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum gap ratio.
    pub fn with_max_gap_ratio(mut self, ratio: f32) -> Self {
        self.max_gap_ratio = ratio;
        self
    }

    /// Set the baseline tolerance.
    pub fn with_baseline_tolerance(mut self, tolerance: f32) -> Self {
        self.baseline_tolerance = tolerance;
        self
    }
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            max_gap_ratio: 0.25,
            baseline_tolerance: 0.3,
        }
    }
}

/// Which block segmentation algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationStrategy {
    /// Statistical nearest-neighbour clustering, row bands on failure
    #[default]
    Docstrum,
    /// Row bands only
    RowBands,
}

/// Options for clustering words into blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterOptions {
    /// Algorithm to run
    pub strategy: SegmentationStrategy,

    /// Within-line gap threshold as a multiple of the median within-line gap
    pub within_line_multiplier: f32,

    /// Minimum vertical overlap (fraction of the smaller height) for two
    /// words to share a baseline band
    pub line_overlap_ratio: f32,

    /// Line-pitch threshold as a multiple of the median line pitch
    pub between_line_multiplier: f32,

    /// Left-edge alignment tolerance as a multiple of the median line pitch
    pub alignment_tolerance: f32,

    /// Band height for the row-band fallback
    pub band_size: f32,
}

impl SegmenterOptions {
    /// Create segmenter options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the strategy.
    pub fn with_strategy(mut self, strategy: SegmentationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Use the row-band algorithm only.
    pub fn row_bands(mut self) -> Self {
        self.strategy = SegmentationStrategy::RowBands;
        self
    }

    /// Set the within-line multiplier.
    pub fn with_within_line_multiplier(mut self, multiplier: f32) -> Self {
        self.within_line_multiplier = multiplier;
        self
    }

    /// Set the between-line multiplier.
    pub fn with_between_line_multiplier(mut self, multiplier: f32) -> Self {
        self.between_line_multiplier = multiplier;
        self
    }

    /// Set the row band size.
    pub fn with_band_size(mut self, size: f32) -> Self {
        self.band_size = size;
        self
    }
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            strategy: SegmentationStrategy::Docstrum,
            within_line_multiplier: 3.0,
            line_overlap_ratio: 0.5,
            between_line_multiplier: 1.3,
            alignment_tolerance: 0.5,
            band_size: 5.0,
        }
    }
}

/// Options for reading-order resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingOrderOptions {
    /// Horizontal gap two blocks need to count as separate columns
    pub column_gap_tolerance: f32,

    /// Top-edge difference under which neither block precedes the other by
    /// height alone
    pub same_line_tolerance: f32,

    /// Skip the precedence graph and sort by coordinates
    pub coordinate_only: bool,
}

impl ReadingOrderOptions {
    /// Create reading-order options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column gap tolerance.
    pub fn with_column_gap_tolerance(mut self, tolerance: f32) -> Self {
        self.column_gap_tolerance = tolerance;
        self
    }

    /// Set the same-line tolerance.
    pub fn with_same_line_tolerance(mut self, tolerance: f32) -> Self {
        self.same_line_tolerance = tolerance;
        self
    }

    /// Sort by coordinates only.
    pub fn coordinate_only(mut self) -> Self {
        self.coordinate_only = true;
        self
    }
}

impl Default for ReadingOrderOptions {
    fn default() -> Self {
        Self {
            column_gap_tolerance: 0.0,
            same_line_tolerance: 0.0,
            coordinate_only: false,
        }
    }
}

/// Options for the whole page pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Word assembly
    pub words: WordOptions,
    /// Block segmentation
    pub segmenter: SegmenterOptions,
    /// Reading order
    pub reading_order: ReadingOrderOptions,
}

impl LayoutOptions {
    /// Create layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set word options.
    pub fn with_words(mut self, words: WordOptions) -> Self {
        self.words = words;
        self
    }

    /// Set segmenter options.
    pub fn with_segmenter(mut self, segmenter: SegmenterOptions) -> Self {
        self.segmenter = segmenter;
        self
    }

    /// Set reading-order options.
    pub fn with_reading_order(mut self, reading_order: ReadingOrderOptions) -> Self {
        self.reading_order = reading_order;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_options_builder() {
        let options = LayoutOptions::new()
            .with_words(WordOptions::new().with_max_gap_ratio(0.4))
            .with_segmenter(SegmenterOptions::new().row_bands().with_band_size(4.0))
            .with_reading_order(ReadingOrderOptions::new().coordinate_only());

        assert_eq!(options.words.max_gap_ratio, 0.4);
        assert_eq!(options.segmenter.strategy, SegmentationStrategy::RowBands);
        assert_eq!(options.segmenter.band_size, 4.0);
        assert!(options.reading_order.coordinate_only);
    }

    #[test]
    fn test_default_options() {
        let options = LayoutOptions::default();
        assert_eq!(options.segmenter.strategy, SegmentationStrategy::Docstrum);
        assert_eq!(options.segmenter.band_size, 5.0);
        assert_eq!(options.segmenter.between_line_multiplier, 1.3);
        assert!(!options.reading_order.coordinate_only);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: LayoutOptions =
            serde_json::from_str(r#"{"segmenter": {"strategy": "row_bands"}}"#).unwrap();
        assert_eq!(options.segmenter.strategy, SegmentationStrategy::RowBands);
        assert_eq!(options.segmenter.band_size, 5.0);
        assert_eq!(options.words, WordOptions::default());
    }
}
