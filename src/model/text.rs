//! Word, line and block grouping levels.
//!
//! Every level owns its children and computes its bounding box as their
//! union at construction time. There are no setters: a box can never drift
//! away from the elements it covers.

use unicode_normalization::UnicodeNormalization;

use super::Glyph;
use crate::geometry::BoundingBox;

/// A sequence of adjacent glyphs, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    glyphs: Vec<Glyph>,
    bbox: BoundingBox,
    text: String,
}

impl Word {
    /// Build a word from glyphs already in reading order.
    ///
    /// Returns `None` for an empty glyph list. The text is the NFC
    /// normalization of the concatenated glyph texts, so accents that the
    /// PDF draws as separate combining glyphs are recomposed.
    pub fn from_glyphs(glyphs: Vec<Glyph>) -> Option<Self> {
        let bbox = BoundingBox::union_all(glyphs.iter().map(|g| &g.bbox))?;
        let text = glyphs
            .iter()
            .map(|g| g.text.as_str())
            .collect::<String>()
            .nfc()
            .collect();
        Some(Self { glyphs, bbox, text })
    }

    /// Build a single-glyph word spanning `bbox`.
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        let glyph = Glyph::new(text, bbox);
        Self {
            text: glyph.text.nfc().collect(),
            glyphs: vec![glyph],
            bbox,
        }
    }

    /// Bounding box (union of glyph boxes).
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Word text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Glyphs of the word, left to right.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// First glyph of the word.
    pub fn first_glyph(&self) -> &Glyph {
        &self.glyphs[0]
    }
}

/// Words sharing an approximate baseline, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    words: Vec<Word>,
    bbox: BoundingBox,
}

impl TextLine {
    /// Build a line from words, sorting them by left edge.
    pub fn from_words(mut words: Vec<Word>) -> Option<Self> {
        words.sort_by(|a, b| {
            a.bbox()
                .left()
                .partial_cmp(&b.bbox().left())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let bbox = BoundingBox::union_all(words.iter().map(Word::bbox))?;
        Some(Self { words, bbox })
    }

    /// Bounding box (union of word boxes).
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Words of the line, left to right.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Line text with words separated by single spaces.
    ///
    /// No space is inserted between two words whose touching characters are
    /// both from a script written without word spaces (Chinese, Japanese).
    pub fn text(&self) -> String {
        let mut result = String::new();
        let mut prev_last: Option<char> = None;

        for word in &self.words {
            let text = word.text();
            if text.is_empty() {
                continue;
            }
            if let Some(prev) = prev_last {
                let first = text.chars().next();
                let spaceless = is_spaceless_script_char(prev)
                    && first.map(is_spaceless_script_char).unwrap_or(false);
                if !spaceless {
                    result.push(' ');
                }
            }
            result.push_str(text);
            prev_last = text.chars().last();
        }

        result
    }
}

/// Lines judged to belong to one paragraph, ordered top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    lines: Vec<TextLine>,
    bbox: BoundingBox,
}

impl TextBlock {
    /// Build a block from lines in reading order.
    pub fn from_lines(lines: Vec<TextLine>) -> Option<Self> {
        let bbox = BoundingBox::union_all(lines.iter().map(TextLine::bbox))?;
        Some(Self { lines, bbox })
    }

    /// Bounding box (union of line boxes).
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Lines of the block, top to bottom.
    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Block text: line texts joined by a space, trimmed.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(TextLine::text)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    /// Whether the block has no visible text.
    pub fn is_blank(&self) -> bool {
        self.text().is_empty()
    }

    /// Total number of words in the block.
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.words().len()).sum()
    }

    /// First glyph of the block in reading order.
    pub fn first_glyph(&self) -> Option<&Glyph> {
        self.lines
            .first()
            .and_then(|l| l.words().first())
            .map(Word::first_glyph)
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs
    (0x4E00..=0x9FFF).contains(&code)
    // Extension A
    || (0x3400..=0x4DBF).contains(&code)
    // Extensions B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana and Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
