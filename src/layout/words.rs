//! Nearest-neighbour word assembly from glyph geometry.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;

use super::options::WordOptions;
use crate::model::{Glyph, Word};

/// Groups the glyphs of one page into words.
///
/// Each glyph is linked to its nearest neighbour on the right that sits on
/// the same baseline and within a font-size-relative gap; chains of links
/// become words. Glyphs made only of combining marks ride along with the
/// glyph they are drawn over instead of taking part in linking. Input order
/// is not assumed to be sorted.
#[derive(Debug, Clone, Default)]
pub struct WordAssembler {
    options: WordOptions,
}

/// A chosen link from one glyph to the next.
#[derive(Debug, Clone, Copy)]
struct Link {
    to: usize,
    gap: f32,
}

impl WordAssembler {
    /// Create an assembler with the given options.
    pub fn new(options: WordOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &WordOptions {
        &self.options
    }

    /// Assemble the words of a page.
    ///
    /// Whitespace glyphs separate words and are dropped. Words come out in
    /// the input order of their first glyph; glyphs inside a word are ordered
    /// left to right, each followed by the combining marks it hosts. An
    /// empty page yields no words.
    pub fn assemble(&self, glyphs: &[Glyph]) -> Vec<Word> {
        let mut ink: Vec<usize> = Vec::new();
        let mut spaces: Vec<usize> = Vec::new();
        let mut marks: Vec<usize> = Vec::new();
        for (i, glyph) in glyphs.iter().enumerate() {
            if glyph.is_whitespace() {
                spaces.push(i);
            } else if is_mark(glyph) {
                marks.push(i);
            } else {
                ink.push(i);
            }
        }

        // A mark without a host is linked like any other glyph.
        let mut attached: Vec<Vec<usize>> = vec![Vec::new(); glyphs.len()];
        let mut orphans = Vec::new();
        for m in marks {
            match self.host_of(glyphs, &ink, m) {
                Some(host) => attached[host].push(m),
                None => orphans.push(m),
            }
        }
        ink.extend(orphans);
        if ink.is_empty() {
            return Vec::new();
        }

        let by_left = |a: &usize, b: &usize| {
            glyphs[*a]
                .bbox
                .left()
                .partial_cmp(&glyphs[*b].bbox.left())
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(b))
        };
        ink.sort_by(by_left);
        spaces.sort_by(|a, b| {
            centroid_x(&glyphs[*a])
                .partial_cmp(&centroid_x(&glyphs[*b]))
                .unwrap_or(Ordering::Equal)
        });

        // Forward links: every glyph picks its nearest right neighbour.
        let mut successor: Vec<Option<Link>> = vec![None; glyphs.len()];
        for (pos, &i) in ink.iter().enumerate() {
            successor[i] = self.nearest_right(glyphs, &ink, pos, &spaces);
        }

        // Only the closest glyph keeps a contested successor.
        let mut predecessor: Vec<Option<(usize, f32)>> = vec![None; glyphs.len()];
        for &i in &ink {
            if let Some(link) = successor[i] {
                let keep = match predecessor[link.to] {
                    None => true,
                    Some((_, gap)) => link.gap < gap,
                };
                if keep {
                    predecessor[link.to] = Some((i, link.gap));
                }
            }
        }
        for &i in &ink {
            if let Some(link) = successor[i] {
                if predecessor[link.to].map(|(p, _)| p) != Some(i) {
                    successor[i] = None;
                }
            }
        }

        let mut heads: Vec<usize> = ink
            .iter()
            .copied()
            .filter(|&i| predecessor[i].is_none())
            .collect();
        heads.sort_unstable();

        let mut words = Vec::with_capacity(heads.len());
        for head in heads {
            let mut chain = Vec::new();
            let mut next = Some(head);
            while let Some(i) = next {
                chain.push(glyphs[i].clone());
                chain.extend(attached[i].iter().map(|&m| glyphs[m].clone()));
                next = successor[i].map(|link| link.to);
            }
            if let Some(word) = Word::from_glyphs(chain) {
                words.push(word);
            }
        }

        log::trace!("Assembled {} words from {} glyphs", words.len(), glyphs.len());
        words
    }

    /// Base glyph that combining mark `m` is drawn over: the one it overlaps
    /// most horizontally, sharing its baseline or stacked just above or below.
    fn host_of(&self, glyphs: &[Glyph], ink: &[usize], m: usize) -> Option<usize> {
        let mark = &glyphs[m];
        let mut best: Option<(usize, f32)> = None;
        for &k in ink {
            let base = &glyphs[k];
            let overlap = base.bbox.horizontal_overlap(&mark.bbox);
            if overlap <= 0.0 {
                continue;
            }
            let size = base.size();
            let same_line = (mark.baseline - base.baseline).abs()
                <= self.options.baseline_tolerance * size
                || base.bbox.vertical_gap(&mark.bbox) <= size;
            if !same_line {
                continue;
            }
            if best.map_or(true, |(_, most)| overlap > most) {
                best = Some((k, overlap));
            }
        }
        best.map(|(k, _)| k)
    }

    /// Nearest same-baseline glyph to the right of `ink[pos]`, if any is
    /// close enough and no whitespace glyph sits between the two.
    fn nearest_right(
        &self,
        glyphs: &[Glyph],
        ink: &[usize],
        pos: usize,
        spaces: &[usize],
    ) -> Option<Link> {
        let a = &glyphs[ink[pos]];
        let size = a.size();
        let max_gap = self.options.max_gap_ratio * size;
        let tolerance = self.options.baseline_tolerance * size;
        let a_center = centroid_x(a);

        // Glyphs sharing the left edge of `a` may sort before it.
        let start = ink.partition_point(|&k| glyphs[k].bbox.left() < a.bbox.left());

        let mut best: Option<(Link, f32)> = None;
        for &k in &ink[start..] {
            if k == ink[pos] {
                continue;
            }
            let b = &glyphs[k];
            if b.bbox.left() > a.bbox.right() + max_gap {
                break;
            }
            if centroid_x(b) <= a_center || (b.baseline - a.baseline).abs() > tolerance {
                continue;
            }
            let gap = a.bbox.horizontal_gap(&b.bbox);
            if gap > max_gap {
                continue;
            }
            let better = match best {
                None => true,
                Some((link, left)) => {
                    gap < link.gap || (gap == link.gap && b.bbox.left() < left)
                }
            };
            if better {
                best = Some((Link { to: k, gap }, b.bbox.left()));
            }
        }

        let (link, _) = best?;
        if space_between(glyphs, spaces, a, &glyphs[link.to], tolerance) {
            return None;
        }
        Some(link)
    }
}

fn is_mark(glyph: &Glyph) -> bool {
    !glyph.text.is_empty() && glyph.text.chars().all(is_combining_mark)
}

fn centroid_x(glyph: &Glyph) -> f32 {
    glyph.bbox.centroid().x
}

/// Whether a whitespace glyph on the same baseline lies between `a` and `b`.
fn space_between(glyphs: &[Glyph], spaces: &[usize], a: &Glyph, b: &Glyph, tolerance: f32) -> bool {
    let lo = centroid_x(a);
    let hi = centroid_x(b);
    let start = spaces.partition_point(|&s| centroid_x(&glyphs[s]) <= lo);
    spaces[start..]
        .iter()
        .map(|&s| &glyphs[s])
        .take_while(|s| centroid_x(s) < hi)
        .any(|s| (s.baseline - a.baseline).abs() <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;

    /// Lay out `text` as 6-unit-wide glyphs starting at `x`, baseline `y`.
    fn glyph_run(text: &str, x: f32, y: f32) -> Vec<Glyph> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let left = x + i as f32 * 6.0;
                Glyph::new(c.to_string(), BoundingBox::new(left, y, left + 6.0, y + 10.0))
                    .with_font("Helvetica", 10.0)
            })
            .collect()
    }

    fn texts(words: &[Word]) -> Vec<&str> {
        words.iter().map(Word::text).collect()
    }

    #[test]
    fn test_empty_page() {
        let words = WordAssembler::default().assemble(&[]);
        assert!(words.is_empty());
    }

    #[test]
    fn test_space_glyph_splits_words() {
        let glyphs = glyph_run("hello world", 0.0, 100.0);
        let words = WordAssembler::default().assemble(&glyphs);
        assert_eq!(texts(&words), vec!["hello", "world"]);
    }

    #[test]
    fn test_gap_splits_words_without_space_glyph() {
        let mut glyphs = glyph_run("ab", 0.0, 100.0);
        glyphs.extend(glyph_run("cd", 30.0, 100.0));
        let words = WordAssembler::default().assemble(&glyphs);
        assert_eq!(texts(&words), vec!["ab", "cd"]);
    }

    #[test]
    fn test_shuffled_input_is_ordered_left_to_right() {
        let mut glyphs = glyph_run("layout", 50.0, 300.0);
        glyphs.reverse();
        glyphs.swap(1, 4);
        let words = WordAssembler::default().assemble(&glyphs);
        assert_eq!(texts(&words), vec!["layout"]);
        assert_eq!(words[0].bbox().left(), 50.0);
        assert_eq!(words[0].bbox().right(), 86.0);
    }

    #[test]
    fn test_baseline_offset_splits_lines() {
        let mut glyphs = glyph_run("top", 0.0, 100.0);
        glyphs.extend(glyph_run("low", 18.0, 80.0));
        let words = WordAssembler::default().assemble(&glyphs);
        assert_eq!(words.len(), 2);
        assert!(texts(&words).contains(&"top"));
        assert!(texts(&words).contains(&"low"));
    }

    #[test]
    fn test_small_kerning_gap_is_joined() {
        let glyphs = vec![
            Glyph::new("A", BoundingBox::new(0.0, 0.0, 6.0, 10.0)).with_font("Times", 10.0),
            Glyph::new("V", BoundingBox::new(7.5, 0.0, 13.5, 10.0)).with_font("Times", 10.0),
        ];
        let words = WordAssembler::default().assemble(&glyphs);
        assert_eq!(texts(&words), vec!["AV"]);
    }

    #[test]
    fn test_combining_mark_joins_its_base_glyph() {
        let glyphs = vec![
            Glyph::new("e", BoundingBox::new(0.0, 0.0, 6.0, 10.0)),
            Glyph::new("\u{0301}", BoundingBox::new(1.0, 8.0, 5.0, 12.0)).with_baseline(0.0),
            Glyph::new("x", BoundingBox::new(6.0, 0.0, 12.0, 10.0)),
        ];
        let words = WordAssembler::default().assemble(&glyphs);
        assert_eq!(texts(&words), vec!["\u{e9}x"]);
        assert_eq!(words[0].glyphs().len(), 3);
        assert_eq!(words[0].bbox().top(), 12.0);
    }

    #[test]
    fn test_mark_before_base_in_input_still_attaches() {
        let glyphs = vec![
            Glyph::new("\u{0308}", BoundingBox::new(13.0, 11.0, 17.0, 13.0)),
            Glyph::new("n", BoundingBox::new(0.0, 0.0, 6.0, 10.0)),
            Glyph::new("a", BoundingBox::new(6.0, 0.0, 12.0, 10.0)),
            Glyph::new("i", BoundingBox::new(12.0, 0.0, 18.0, 10.0)),
            Glyph::new("v", BoundingBox::new(18.0, 0.0, 24.0, 10.0)),
            Glyph::new("e", BoundingBox::new(24.0, 0.0, 30.0, 10.0)),
        ];
        let words = WordAssembler::default().assemble(&glyphs);
        assert_eq!(texts(&words), vec!["na\u{ef}ve"]);
    }

    #[test]
    fn test_isolated_mark_stays_a_word() {
        let mut glyphs = glyph_run("ab", 0.0, 100.0);
        glyphs.push(Glyph::new("\u{0301}", BoundingBox::new(200.0, 300.0, 204.0, 304.0)));
        let words = WordAssembler::default().assemble(&glyphs);
        assert_eq!(texts(&words), vec!["ab", "\u{301}"]);
    }

    #[test]
    fn test_whitespace_only_page() {
        let glyphs = glyph_run("   ", 0.0, 0.0);
        assert!(WordAssembler::default().assemble(&glyphs).is_empty());
    }
}
