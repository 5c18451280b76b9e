//! Glyph primitives supplied by the PDF access layer.

use crate::geometry::BoundingBox;

/// A single rendered character with its position.
///
/// Glyphs are produced by whatever reads the PDF and are read-only to the
/// layout pipeline. `text` is usually one character but may hold a ligature
/// or a multi-character mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Unicode text of the glyph
    pub text: String,
    /// Glyph bounding box in page space
    pub bbox: BoundingBox,
    /// Baseline y-coordinate
    pub baseline: f32,
    /// Font size in points, if the source knows it
    pub font_size: Option<f32>,
    /// Font name (e.g., "Helvetica-Bold"), if the source knows it
    pub font_name: Option<String>,
}

impl Glyph {
    /// Create a glyph whose baseline is the bottom of its box.
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            baseline: bbox.bottom(),
            bbox,
            font_size: None,
            font_name: None,
        }
    }

    /// Set an explicit baseline.
    pub fn with_baseline(mut self, baseline: f32) -> Self {
        self.baseline = baseline;
        self
    }

    /// Set font information.
    pub fn with_font(mut self, name: impl Into<String>, size: f32) -> Self {
        self.font_name = Some(name.into());
        self.font_size = Some(size);
        self
    }

    /// Size used for font-relative thresholds: the font size when known and
    /// positive, otherwise the glyph height.
    pub fn size(&self) -> f32 {
        match self.font_size {
            Some(size) if size > 0.0 && size.is_finite() => size,
            _ => self.bbox.height(),
        }
    }

    /// Whether the glyph renders only whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}
