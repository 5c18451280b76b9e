//! Reading order determination for segmented blocks.
//!
//! Blocks are ordered by topologically sorting a "precedes" graph. Height on
//! the page decides most pairs, but a block wholly to the left of another
//! one it shares vertical extent with is read first, which keeps columns
//! together.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::options::ReadingOrderOptions;
use crate::error::{Error, Result};
use crate::geometry::BoundingBox;
use crate::model::TextBlock;

/// Blocks permuted into reading order.
#[derive(Debug, Clone)]
pub struct ReadingOrder {
    /// Blocks in reading order
    pub blocks: Vec<TextBlock>,
    /// Whether the coordinate-sort fallback produced the order
    pub used_fallback: bool,
}

/// Orders the blocks of a page.
#[derive(Debug, Clone, Default)]
pub struct ReadingOrderResolver {
    options: ReadingOrderOptions,
}

impl ReadingOrderResolver {
    /// Create a resolver with the given options.
    pub fn new(options: ReadingOrderOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &ReadingOrderOptions {
        &self.options
    }

    /// Permute blocks into reading order.
    ///
    /// The output always holds exactly the input blocks. If the precedence
    /// graph cannot be resolved, blocks are sorted top to bottom, then left
    /// to right.
    pub fn resolve(&self, blocks: Vec<TextBlock>) -> ReadingOrder {
        let boxes: Vec<BoundingBox> = blocks.iter().map(|b| *b.bbox()).collect();

        let (order, used_fallback) = if self.options.coordinate_only {
            (coordinate_order(&boxes), false)
        } else {
            match self.precedence_order(&boxes) {
                Ok(order) => (order, false),
                Err(e) => {
                    log::warn!("{}, falling back to coordinate order", e);
                    (coordinate_order(&boxes), true)
                }
            }
        };

        ReadingOrder {
            blocks: apply_permutation(blocks, &order),
            used_fallback,
        }
    }

    /// Whether the block at `a` is read before the block at `b`.
    pub fn precedes(&self, a: &BoundingBox, b: &BoundingBox) -> bool {
        let separate_columns = a.horizontal_gap(b) > self.options.column_gap_tolerance;
        if separate_columns && a.vertical_overlap(b) > 0.0 {
            return a.right() <= b.left();
        }
        a.top() > b.top() + self.options.same_line_tolerance
    }

    /// Topological order of the precedence graph (Kahn's algorithm).
    ///
    /// Among blocks whose predecessors are all placed, the highest top edge
    /// goes first, then the smallest left edge. Fails on a cycle.
    pub fn precedence_order(&self, boxes: &[BoundingBox]) -> Result<Vec<usize>> {
        let n = boxes.len();
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut in_degree = vec![0usize; n];

        for i in 0..n {
            for j in 0..n {
                if i != j && self.precedes(&boxes[i], &boxes[j]) {
                    successors[i].push(j);
                    in_degree[j] += 1;
                }
            }
        }

        let mut ready: BinaryHeap<Ready> = (0..n)
            .filter(|&i| in_degree[i] == 0)
            .map(|i| Ready::new(i, &boxes[i]))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Ready { index, .. }) = ready.pop() {
            order.push(index);
            for &next in &successors[index] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push(Ready::new(next, &boxes[next]));
                }
            }
        }

        if order.len() != n {
            return Err(Error::Ordering(format!(
                "precedence graph has a cycle ({} of {} blocks unplaced)",
                n - order.len(),
                n
            )));
        }
        Ok(order)
    }
}

/// Indices sorted top to bottom, then left to right.
pub fn coordinate_order(boxes: &[BoundingBox]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| {
        boxes[b]
            .top()
            .total_cmp(&boxes[a].top())
            .then_with(|| boxes[a].left().total_cmp(&boxes[b].left()))
    });
    order
}

fn apply_permutation(blocks: Vec<TextBlock>, order: &[usize]) -> Vec<TextBlock> {
    let mut slots: Vec<Option<TextBlock>> = blocks.into_iter().map(Some).collect();
    order.iter().filter_map(|&i| slots[i].take()).collect()
}

/// Heap entry for a block whose predecessors are all placed.
#[derive(Debug, Clone, Copy)]
struct Ready {
    index: usize,
    top: f32,
    left: f32,
}

impl Ready {
    fn new(index: usize, bbox: &BoundingBox) -> Self {
        Self {
            index,
            top: bbox.top(),
            left: bbox.left(),
        }
    }
}

impl Ord for Ready {
    // Greater pops first: higher top, then smaller left, then smaller index.
    fn cmp(&self, other: &Self) -> Ordering {
        self.top
            .total_cmp(&other.top)
            .then_with(|| other.left.total_cmp(&self.left))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Ready {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Ready {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ready {}
