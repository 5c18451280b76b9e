//! Document model types for layout extraction.
//!
//! Glyphs come in from the PDF access layer, are grouped into words, lines
//! and blocks by the layout pipeline, and leave as [`Cell`]s collected in a
//! [`DocumentResult`].

mod cell;
mod glyph;
mod text;

pub use cell::{BlockType, Cell, DocumentResult, FontInfo};
pub use glyph::Glyph;
pub use text::{TextBlock, TextLine, Word};
