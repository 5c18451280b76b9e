//! Geometric primitives for layout analysis.
//!
//! All coordinates live in PDF page space: the origin is the bottom-left
//! corner of the page and `y` grows upward, so a larger `top` means closer to
//! the top of the page.

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An immutable axis-aligned bounding box.
///
/// The constructor normalizes swapped edges, so `left <= right` and
/// `bottom <= top` always hold for finite inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    left: f32,
    bottom: f32,
    right: f32,
    top: f32,
}

impl BoundingBox {
    /// Create a box from its four edges.
    ///
    /// # Example
    ///
    /// ```
    /// use pagecells::geometry::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(10.0, 20.0, 110.0, 32.0);
    /// assert_eq!(bbox.width(), 100.0);
    /// assert_eq!(bbox.height(), 12.0);
    /// ```
    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        // NaN edges are kept as-is so is_finite() reports them.
        let (left, right) = if left <= right { (left, right) } else { (right, left) };
        let (bottom, top) = if bottom <= top { (bottom, top) } else { (top, bottom) };
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Create a box from its bottom-left corner and dimensions.
    pub fn from_origin(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.left
    }

    /// Right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.right
    }

    /// Bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    /// Top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.top
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Center point of the box.
    pub fn centroid(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.bottom + self.top) / 2.0,
        )
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }

    /// Union of every box in the iterator, or `None` if it is empty.
    pub fn union_all<'a, I>(boxes: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        boxes
            .into_iter()
            .fold(None, |acc: Option<BoundingBox>, b| match acc {
                Some(acc) => Some(acc.union(b)),
                None => Some(*b),
            })
    }

    /// Horizontal distance between the boxes, 0 if their x-extents overlap.
    pub fn horizontal_gap(&self, other: &BoundingBox) -> f32 {
        (other.left - self.right).max(self.left - other.right).max(0.0)
    }

    /// Vertical distance between the boxes, 0 if their y-extents overlap.
    pub fn vertical_gap(&self, other: &BoundingBox) -> f32 {
        (other.bottom - self.top).max(self.bottom - other.top).max(0.0)
    }

    /// Length of the shared x-interval, 0 if disjoint.
    pub fn horizontal_overlap(&self, other: &BoundingBox) -> f32 {
        (self.right.min(other.right) - self.left.max(other.left)).max(0.0)
    }

    /// Length of the shared y-interval, 0 if disjoint.
    pub fn vertical_overlap(&self, other: &BoundingBox) -> f32 {
        (self.top.min(other.top) - self.bottom.max(other.bottom)).max(0.0)
    }

    /// Whether the y-extents touch or overlap.
    pub fn overlaps_vertically(&self, other: &BoundingBox) -> bool {
        self.bottom <= other.top && other.bottom <= self.top
    }

    /// Whether the x-extents touch or overlap.
    pub fn overlaps_horizontally(&self, other: &BoundingBox) -> bool {
        self.left <= other.right && other.left <= self.right
    }

    /// Whether every edge is a finite number.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.bottom.is_finite()
            && self.right.is_finite()
            && self.top.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_edges() {
        let bbox = BoundingBox::new(50.0, 40.0, 10.0, 20.0);
        assert_eq!(bbox.left(), 10.0);
        assert_eq!(bbox.right(), 50.0);
        assert_eq!(bbox.bottom(), 20.0);
        assert_eq!(bbox.top(), 40.0);
    }

    #[test]
    fn test_union_and_centroid() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 5.0, 30.0, 25.0);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(0.0, 0.0, 30.0, 25.0));
        assert_eq!(u.centroid(), Point::new(15.0, 12.5));
    }

    #[test]
    fn test_union_all() {
        assert!(BoundingBox::union_all(&[]).is_none());
        let boxes = [
            BoundingBox::new(5.0, 5.0, 6.0, 6.0),
            BoundingBox::new(-1.0, 2.0, 3.0, 4.0),
        ];
        assert_eq!(
            BoundingBox::union_all(&boxes),
            Some(BoundingBox::new(-1.0, 2.0, 6.0, 6.0))
        );
    }

    #[test]
    fn test_gaps_are_symmetric_and_non_negative() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(14.0, 30.0, 20.0, 40.0);
        assert_eq!(a.horizontal_gap(&b), 4.0);
        assert_eq!(b.horizontal_gap(&a), 4.0);
        assert_eq!(a.vertical_gap(&b), 20.0);
        assert_eq!(b.vertical_gap(&a), 20.0);

        let c = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
        assert_eq!(a.horizontal_gap(&c), 0.0);
        assert_eq!(a.vertical_gap(&c), 0.0);
    }

    #[test]
    fn test_overlaps() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(6.0, 8.0, 20.0, 30.0);
        assert_eq!(a.horizontal_overlap(&b), 4.0);
        assert_eq!(a.vertical_overlap(&b), 2.0);
        assert!(a.overlaps_vertically(&b));
        assert!(a.overlaps_horizontally(&b));

        let far = BoundingBox::new(100.0, 100.0, 110.0, 110.0);
        assert_eq!(a.horizontal_overlap(&far), 0.0);
        assert!(!a.overlaps_vertically(&far));
    }

    #[test]
    fn test_is_finite() {
        assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_finite());
        assert!(!BoundingBox::new(0.0, f32::NAN, 1.0, 1.0).is_finite());
        assert!(!BoundingBox::from_origin(0.0, 0.0, f32::INFINITY, 1.0).is_finite());
    }
}
