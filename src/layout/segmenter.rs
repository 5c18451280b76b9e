//! Block segmentation: words to lines to paragraph blocks.
//!
//! The primary algorithm is a Docstrum-style nearest-neighbour clustering.
//! Its thresholds are not constants: they are multiples of the median
//! within-line gap and the median line pitch measured on the page itself,
//! so the same settings work across font sizes and layout densities.
//!
//! When those statistics cannot be computed (too few words, no word with a
//! same-line neighbour, degenerate geometry) the page is segmented by
//! quantizing each word's bottom edge into fixed-size row bands instead.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::options::{SegmentationStrategy, SegmenterOptions};
use super::stats::median;
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::model::{TextBlock, TextLine, Word};

/// Blocks produced for one page.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Blocks in segmentation order (top to bottom, then left to right)
    pub blocks: Vec<TextBlock>,
    /// Whether the row-band fallback produced the blocks
    pub used_fallback: bool,
}

/// Spacing statistics measured on one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingStats {
    /// Median horizontal gap between a word and its right neighbour
    pub within_line: f32,
    /// Median vertical centroid distance between a line and the line below
    pub between_line: Option<f32>,
}

/// Clusters words into paragraph blocks.
#[derive(Debug, Clone, Default)]
pub struct BlockSegmenter {
    options: SegmenterOptions,
}

impl BlockSegmenter {
    /// Create a segmenter with the given options.
    pub fn new(options: SegmenterOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &SegmenterOptions {
        &self.options
    }

    /// Segment the words of a page.
    ///
    /// Never fails: any error from the statistical path is logged and the
    /// row-band fallback runs instead. A non-empty word list always yields
    /// at least one block.
    pub fn segment(&self, words: Vec<Word>) -> Segmentation {
        if words.is_empty() {
            return Segmentation {
                blocks: Vec::new(),
                used_fallback: false,
            };
        }

        if self.options.strategy == SegmentationStrategy::Docstrum {
            match self.docstrum(&words) {
                Ok(blocks) if !blocks.is_empty() => {
                    return Segmentation {
                        blocks,
                        used_fallback: false,
                    }
                }
                Ok(_) => log::warn!("Docstrum segmentation returned no blocks, using row bands"),
                Err(e) => log::warn!("{}, using row bands", e),
            }
        }

        Segmentation {
            blocks: self.row_bands(words),
            used_fallback: true,
        }
    }

    /// Statistical nearest-neighbour segmentation.
    pub fn docstrum(&self, words: &[Word]) -> Result<Vec<TextBlock>> {
        let within_line = self.within_line_spacing(words)?;
        let word_height = median(&words.iter().map(|w| w.bbox().height()).collect::<Vec<_>>())
            .ok_or_else(|| Error::Segmentation("no finite word heights".to_string()))?;

        let threshold = self.options.within_line_multiplier * within_line.max(0.1 * word_height);
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(Error::Segmentation(format!(
                "degenerate within-line threshold {}",
                threshold
            )));
        }

        let lines = self.group_lines(words, threshold)?;
        let between_line = between_line_spacing(&lines);

        log::debug!(
            "Docstrum: {} words, {} lines, within-line gap {:.2}, line pitch {:?}",
            words.len(),
            lines.len(),
            within_line,
            between_line
        );

        let blocks = match between_line {
            Some(pitch) if pitch.is_finite() && pitch > 0.0 => self.group_blocks(lines, pitch),
            Some(pitch) => {
                return Err(Error::Segmentation(format!(
                    "degenerate line pitch {}",
                    pitch
                )))
            }
            None => lines
                .into_iter()
                .filter_map(|l| TextBlock::from_lines(vec![l]))
                .collect(),
        };

        Ok(sort_blocks(blocks))
    }

    /// Spacing statistics of a page, as used by [`BlockSegmenter::docstrum`].
    pub fn spacing_stats(&self, words: &[Word]) -> Result<SpacingStats> {
        let within_line = self.within_line_spacing(words)?;
        let word_height = median(&words.iter().map(|w| w.bbox().height()).collect::<Vec<_>>())
            .unwrap_or(0.0);
        let threshold = self.options.within_line_multiplier * within_line.max(0.1 * word_height);
        let lines = self.group_lines(words, threshold)?;
        Ok(SpacingStats {
            within_line,
            between_line: between_line_spacing(&lines),
        })
    }

    /// Row-band segmentation: one block per band of bottom edges.
    pub fn row_bands(&self, words: Vec<Word>) -> Vec<TextBlock> {
        let band_size = if self.options.band_size > 0.0 {
            self.options.band_size
        } else {
            SegmenterOptions::default().band_size
        };

        let mut bands: BTreeMap<i64, Vec<Word>> = BTreeMap::new();
        for word in words {
            let key = (word.bbox().bottom() / band_size).round() as i64;
            bands.entry(key).or_default().push(word);
        }

        // Highest band first: top of the page first.
        bands
            .into_values()
            .rev()
            .filter_map(TextLine::from_words)
            .filter_map(|line| TextBlock::from_lines(vec![line]))
            .collect()
    }

    /// Median horizontal gap from each word to its nearest right neighbour
    /// on the same baseline band.
    fn within_line_spacing(&self, words: &[Word]) -> Result<f32> {
        let mut gaps = Vec::new();
        for (i, a) in words.iter().enumerate() {
            let nearest = words
                .iter()
                .enumerate()
                .filter(|(j, b)| {
                    *j != i
                        && b.bbox().left() >= a.bbox().right()
                        && self.same_band(a.bbox(), b.bbox())
                })
                .map(|(_, b)| a.bbox().horizontal_gap(b.bbox()))
                .min_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));
            if let Some(gap) = nearest {
                gaps.push(gap);
            }
        }

        median(&gaps).ok_or_else(|| {
            Error::Segmentation(format!(
                "no within-line neighbours among {} words",
                words.len()
            ))
        })
    }

    /// Whether two boxes share enough vertical extent to sit on one line.
    fn same_band(&self, a: &BoundingBox, b: &BoundingBox) -> bool {
        let min_height = a.height().min(b.height());
        min_height > 0.0 && a.vertical_overlap(b) >= self.options.line_overlap_ratio * min_height
    }

    /// Union words that share a band and lie within `threshold` of each
    /// other into lines.
    fn group_lines(&self, words: &[Word], threshold: f32) -> Result<Vec<TextLine>> {
        let mut sets = DisjointSets::new(words.len());
        for i in 0..words.len() {
            for j in (i + 1)..words.len() {
                let (a, b) = (words[i].bbox(), words[j].bbox());
                if self.same_band(a, b) && a.horizontal_gap(b) <= threshold {
                    sets.union(i, j);
                }
            }
        }

        let lines: Vec<TextLine> = sets
            .groups()
            .into_iter()
            .filter_map(|group| {
                TextLine::from_words(group.into_iter().map(|i| words[i].clone()).collect())
            })
            .collect();

        if lines.is_empty() {
            return Err(Error::Segmentation("line grouping produced nothing".to_string()));
        }
        Ok(lines)
    }

    /// Union vertically adjacent, horizontally related lines into blocks.
    fn group_blocks(&self, lines: Vec<TextLine>, pitch: f32) -> Vec<TextBlock> {
        let max_distance = self.options.between_line_multiplier * pitch;
        let align = self.options.alignment_tolerance * pitch;

        let mut sets = DisjointSets::new(lines.len());
        for i in 0..lines.len() {
            for j in 0..lines.len() {
                let (upper, lower) = (lines[i].bbox(), lines[j].bbox());
                let distance = upper.centroid().y - lower.centroid().y;
                if i == j || distance <= 0.0 || distance > max_distance {
                    continue;
                }
                let related = upper.overlaps_horizontally(lower)
                    || (upper.left() - lower.left()).abs() <= align;
                if related {
                    sets.union(i, j);
                }
            }
        }

        let mut lines: Vec<Option<TextLine>> = lines.into_iter().map(Some).collect();
        sets.groups()
            .into_iter()
            .filter_map(|group| {
                let mut members: Vec<TextLine> =
                    group.into_iter().filter_map(|i| lines[i].take()).collect();
                members.sort_by(|a, b| compare_top_down(a.bbox(), b.bbox()));
                TextBlock::from_lines(members)
            })
            .collect()
    }
}

/// Median vertical centroid distance from each line to the nearest line
/// below it that overlaps it horizontally.
fn between_line_spacing(lines: &[TextLine]) -> Option<f32> {
    let mut pitches = Vec::new();
    for (i, upper) in lines.iter().enumerate() {
        let nearest = lines
            .iter()
            .enumerate()
            .filter(|(j, lower)| {
                *j != i
                    && lower.bbox().centroid().y < upper.bbox().centroid().y
                    && upper.bbox().overlaps_horizontally(lower.bbox())
            })
            .map(|(_, lower)| upper.bbox().centroid().y - lower.bbox().centroid().y)
            .min_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));
        if let Some(pitch) = nearest {
            pitches.push(pitch);
        }
    }
    median(&pitches)
}

/// Top edge descending, then left edge ascending.
fn compare_top_down(a: &BoundingBox, b: &BoundingBox) -> Ordering {
    b.top()
        .partial_cmp(&a.top())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.left().partial_cmp(&b.left()).unwrap_or(Ordering::Equal))
}

fn sort_blocks(mut blocks: Vec<TextBlock>) -> Vec<TextBlock> {
    blocks.sort_by(|a, b| compare_top_down(a.bbox(), b.bbox()));
    blocks
}

/// Union-find over element indices.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Smaller root wins so groups are keyed by their first member.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }

    /// Members of every set, sets ordered by their smallest member.
    fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for i in 0..self.parent.len() {
            let root = self.find(i);
            by_root.entry(root).or_default().push(i);
        }
        by_root.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, left: f32, bottom: f32) -> Word {
        let width = text.chars().count() as f32 * 5.0;
        Word::new(text, BoundingBox::new(left, bottom, left + width, bottom + 10.0))
    }

    /// A paragraph of `rows` lines, each with three words, 14 units apart.
    fn paragraph(left: f32, top_bottom: f32, rows: usize) -> Vec<Word> {
        let mut words = Vec::new();
        for r in 0..rows {
            let y = top_bottom - r as f32 * 14.0;
            words.push(word("lorem", left, y));
            words.push(word("ipsum", left + 28.0, y));
            words.push(word("dolor", left + 56.0, y));
        }
        words
    }

    #[test]
    fn test_empty_words() {
        let seg = BlockSegmenter::default().segment(vec![]);
        assert!(seg.blocks.is_empty());
        assert!(!seg.used_fallback);
    }

    #[test]
    fn test_single_word_falls_back() {
        let seg = BlockSegmenter::default().segment(vec![word("alone", 10.0, 10.0)]);
        assert!(seg.used_fallback);
        assert_eq!(seg.blocks.len(), 1);
        assert_eq!(seg.blocks[0].text(), "alone");
    }

    #[test]
    fn test_paragraph_lines_merge_into_one_block() {
        let seg = BlockSegmenter::default().segment(paragraph(50.0, 700.0, 4));
        assert!(!seg.used_fallback);
        assert_eq!(seg.blocks.len(), 1);
        assert_eq!(seg.blocks[0].lines().len(), 4);
        assert!(seg.blocks[0].text().starts_with("lorem ipsum dolor lorem"));
    }

    #[test]
    fn test_section_break_splits_blocks() {
        let mut words = paragraph(50.0, 700.0, 3);
        words.extend(paragraph(50.0, 600.0, 3));
        let seg = BlockSegmenter::default().segment(words);
        assert!(!seg.used_fallback);
        assert_eq!(seg.blocks.len(), 2);
        assert!(seg.blocks[0].bbox().top() > seg.blocks[1].bbox().top());
    }

    #[test]
    fn test_column_gap_splits_blocks() {
        let mut words = paragraph(50.0, 700.0, 3);
        words.extend(paragraph(300.0, 700.0, 3));
        let seg = BlockSegmenter::default().segment(words);
        assert!(!seg.used_fallback);
        assert_eq!(seg.blocks.len(), 2);
        assert_eq!(seg.blocks[0].bbox().left(), 50.0);
        assert_eq!(seg.blocks[1].bbox().left(), 300.0);
    }

    #[test]
    fn test_spacing_stats() {
        let stats = BlockSegmenter::default()
            .spacing_stats(&paragraph(0.0, 500.0, 3))
            .unwrap();
        assert_eq!(stats.within_line, 3.0);
        assert_eq!(stats.between_line, Some(14.0));
    }

    #[test]
    fn test_row_bands_same_baseline_merge() {
        let words = vec![word("right", 40.0, 100.0), word("left", 0.0, 101.0)];
        let blocks = BlockSegmenter::default().row_bands(words);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].lines().len(), 1);
        assert_eq!(blocks[0].text(), "left right");
    }

    #[test]
    fn test_row_bands_split_beyond_band_size() {
        let words = vec![word("lower", 0.0, 94.0), word("upper", 0.0, 100.0)];
        let blocks = BlockSegmenter::default().row_bands(words);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text(), "upper");
        assert_eq!(blocks[1].text(), "lower");
    }

    #[test]
    fn test_forced_row_bands() {
        let segmenter = BlockSegmenter::new(SegmenterOptions::new().row_bands());
        let seg = segmenter.segment(paragraph(50.0, 700.0, 2));
        assert!(seg.used_fallback);
        assert_eq!(seg.blocks.len(), 2);
    }

    #[test]
    fn test_disjoint_sets_groups() {
        let mut sets = DisjointSets::new(5);
        sets.union(3, 1);
        sets.union(4, 0);
        assert_eq!(sets.groups(), vec![vec![0, 4], vec![1, 3], vec![2]]);
    }
}
