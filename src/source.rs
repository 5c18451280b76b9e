//! Glyph sources: the boundary to whatever reads PDF files.
//!
//! The layout pipeline never parses PDFs itself. A [`DocumentLoader`] opens a
//! file into a [`GlyphSource`], which hands out the glyphs of one page at a
//! time. [`GlyphDumpLoader`] reads glyph geometry that an external PDF
//! tool has already written out as JSON.
//!
//! # Glyph dump format
//!
//! ```json
//! {
//!   "pages": [
//!     { "glyphs": [
//!         { "text": "H", "left": 72.0, "bottom": 700.0, "right": 80.0, "top": 712.0,
//!           "baseline": 702.0, "font_size": 12.0, "font_name": "Helvetica" }
//!     ] }
//!   ]
//! }
//! ```
//!
//! `baseline`, `font_size` and `font_name` are optional.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::model::Glyph;

/// Suffix some producers append to document stems; stripped from ids.
pub const COCO_STANDARD_SUFFIX: &str = ".coco_standard";

/// Page-by-page access to the glyphs of one document.
pub trait GlyphSource: Send + Sync {
    /// Number of pages in the document.
    fn page_count(&self) -> Result<u32>;

    /// Glyphs of a page (1-indexed), in no particular order.
    fn page_glyphs(&self, page: u32) -> Result<Vec<Glyph>>;
}

/// Opens documents into glyph sources.
pub trait DocumentLoader: Send + Sync {
    /// File extensions this loader handles (lowercase, without the dot).
    fn extensions(&self) -> &[&str];

    /// Open a document.
    fn open(&self, path: &Path) -> Result<Box<dyn GlyphSource>>;

    /// Whether the loader handles this path's extension (case-insensitive).
    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions().iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }
}

/// Document identifier for a file: the file name without its extension,
/// with a trailing `.coco_standard` removed.
///
/// # Example
///
/// ```
/// use pagecells::source::document_id;
///
/// assert_eq!(document_id("data/report.coco_standard.pdf"), "report");
/// assert_eq!(document_id("data/report.pdf"), "report");
/// ```
pub fn document_id<P: AsRef<Path>>(path: P) -> String {
    let stem = path
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.strip_suffix(COCO_STANDARD_SUFFIX) {
        Some(id) => id.to_string(),
        None => stem,
    }
}

/// Glyphs held in memory, one vector per page.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<Vec<Glyph>>,
}

impl MemoryDocument {
    /// Create a document from per-page glyphs.
    pub fn new(pages: Vec<Vec<Glyph>>) -> Self {
        Self { pages }
    }

    /// Append a page.
    pub fn add_page(&mut self, glyphs: Vec<Glyph>) {
        self.pages.push(glyphs);
    }
}

impl GlyphSource for MemoryDocument {
    fn page_count(&self) -> Result<u32> {
        Ok(self.pages.len() as u32)
    }

    fn page_glyphs(&self, page: u32) -> Result<Vec<Glyph>> {
        let total = self.pages.len() as u32;
        if page == 0 || page > total {
            return Err(Error::PageOutOfRange(page, total));
        }
        Ok(self.pages[(page - 1) as usize].clone())
    }
}

/// One glyph as written in a glyph dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRecord {
    /// Glyph text
    pub text: String,
    /// Left edge
    pub left: f32,
    /// Bottom edge
    pub bottom: f32,
    /// Right edge
    pub right: f32,
    /// Top edge
    pub top: f32,
    /// Baseline, defaults to the bottom edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f32>,
    /// Font size in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// Font name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_name: Option<String>,
}

impl From<&GlyphRecord> for Glyph {
    fn from(record: &GlyphRecord) -> Self {
        let bbox = BoundingBox::new(record.left, record.bottom, record.right, record.top);
        Glyph {
            text: record.text.clone(),
            baseline: record.baseline.unwrap_or_else(|| bbox.bottom()),
            bbox,
            font_size: record.font_size,
            font_name: record.font_name.clone(),
        }
    }
}

impl From<&Glyph> for GlyphRecord {
    fn from(glyph: &Glyph) -> Self {
        Self {
            text: glyph.text.clone(),
            left: glyph.bbox.left(),
            bottom: glyph.bbox.bottom(),
            right: glyph.bbox.right(),
            top: glyph.bbox.top(),
            baseline: Some(glyph.baseline),
            font_size: glyph.font_size,
            font_name: glyph.font_name.clone(),
        }
    }
}

/// One page of a glyph dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Glyphs of the page
    #[serde(default)]
    pub glyphs: Vec<GlyphRecord>,
}

/// A document's glyph geometry serialized as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphDump {
    /// Pages in physical order
    pub pages: Vec<PageRecord>,
}

impl GlyphDump {
    /// Parse a dump from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::GlyphAccess(e.to_string()))
    }

    /// Read a dump from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| Error::GlyphAccess(e.to_string()))
    }

    /// Read a dump from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::GlyphAccess(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Build a dump from in-memory pages.
    pub fn from_pages(pages: &[Vec<Glyph>]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|glyphs| PageRecord {
                    glyphs: glyphs.iter().map(GlyphRecord::from).collect(),
                })
                .collect(),
        }
    }

    /// Serialize to JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl GlyphSource for GlyphDump {
    fn page_count(&self) -> Result<u32> {
        Ok(self.pages.len() as u32)
    }

    fn page_glyphs(&self, page: u32) -> Result<Vec<Glyph>> {
        let total = self.pages.len() as u32;
        if page == 0 || page > total {
            return Err(Error::PageOutOfRange(page, total));
        }
        Ok(self.pages[(page - 1) as usize]
            .glyphs
            .iter()
            .map(Glyph::from)
            .collect())
    }
}

/// Loads JSON glyph dumps.
#[derive(Debug, Clone, Default)]
pub struct GlyphDumpLoader;

impl GlyphDumpLoader {
    /// Create a loader.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for GlyphDumpLoader {
    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn open(&self, path: &Path) -> Result<Box<dyn GlyphSource>> {
        Ok(Box::new(GlyphDump::open(path)?))
    }
}
