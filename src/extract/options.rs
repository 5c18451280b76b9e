//! Extraction options and configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::LayoutOptions;

/// Options for extracting cells from documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Layout pipeline settings
    pub layout: LayoutOptions,

    /// Whether to lay out the pages of a document in parallel
    pub parallel: bool,

    /// Whether to attach the first glyph's font to each cell
    pub include_font: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Set layout options.
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    /// Enable or disable parallel page processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable font information on cells.
    pub fn with_font(mut self, include: bool) -> Self {
        self.include_font = include;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            parallel: true,
            include_font: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SegmentationStrategy;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new().sequential().with_font(true);
        assert!(!options.parallel);
        assert!(options.include_font);
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert!(options.parallel);
        assert!(!options.include_font);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        fs::write(
            &path,
            r#"{"parallel": false, "layout": {"segmenter": {"strategy": "row_bands"}}}"#,
        )
        .unwrap();

        let options = ExtractOptions::from_json_file(&path).unwrap();
        assert!(!options.parallel);
        assert_eq!(
            options.layout.segmenter.strategy,
            SegmentationStrategy::RowBands
        );
        assert!(ExtractOptions::from_json_file(dir.path().join("missing.json")).is_err());
    }
}
