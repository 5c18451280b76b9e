//! Output cells and per-document results.

use serde::{Deserialize, Serialize};

use super::TextBlock;
use crate::error::{Error, Result};

/// Type tag of an emitted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// A paragraph-level text block
    #[default]
    Paragraph,
}

/// Font of the first glyph of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FontInfo {
    /// Font name
    pub name: String,
    /// Font size in points
    pub size: f32,
}

/// One positioned, typed, ordered paragraph block.
///
/// `x`/`y` are the left and bottom edges of the block in page space, with
/// `y` measured from the bottom of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Cell {
    /// Left edge
    pub x: f32,
    /// Bottom edge
    pub y: f32,
    /// Block width
    pub width: f32,
    /// Block height
    pub height: f32,
    /// Trimmed block text
    pub text: String,
    /// Block type tag
    pub block_type: BlockType,
    /// Page number (1-indexed)
    pub page: u32,
    /// Position in the page's reading order (0-indexed)
    pub block_index: u32,
    /// Font of the block's first glyph, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontInfo>,
}

impl Cell {
    /// Convert a block into a cell.
    ///
    /// Fails with [`Error::BlockEmission`] when the block geometry is not
    /// finite or its text is blank; callers skip such blocks.
    pub fn from_block(
        block: &TextBlock,
        page: u32,
        block_index: u32,
        include_font: bool,
    ) -> Result<Self> {
        let bbox = block.bbox();
        if !bbox.is_finite() {
            return Err(Error::BlockEmission {
                index: block_index as usize,
                reason: format!("non-finite bounding box {:?}", bbox),
            });
        }

        let text = block.text();
        if text.is_empty() {
            return Err(Error::BlockEmission {
                index: block_index as usize,
                reason: "blank text".to_string(),
            });
        }

        let font = if include_font {
            block.first_glyph().and_then(|g| {
                g.font_name.as_ref().map(|name| FontInfo {
                    name: name.clone(),
                    size: g.size(),
                })
            })
        } else {
            None
        };

        Ok(Self {
            x: bbox.left(),
            y: bbox.bottom(),
            width: bbox.width(),
            height: bbox.height(),
            text,
            block_type: BlockType::Paragraph,
            page,
            block_index,
            font,
        })
    }
}

/// All cells extracted from one document, ordered by (page, block index).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Document identifier derived from its file name
    pub id: String,
    /// Cells in emission order
    pub cells: Vec<Cell>,
    /// Pages that could not be read and contributed no cells
    #[serde(skip)]
    pub skipped_pages: Vec<u32>,
}

impl DocumentResult {
    /// Create an empty result for a document.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: Vec::new(),
            skipped_pages: Vec::new(),
        }
    }

    /// Append the cells of the next page.
    pub fn extend_page(&mut self, cells: Vec<Cell>) {
        self.cells.extend(cells);
    }

    /// Whether no cell was extracted.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cells of one page, in reading order.
    pub fn page_cells(&self, page: u32) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(move |c| c.page == page)
    }

    /// Concatenated text of all cells, one cell per line.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
