//! Geometry primitives shared by the reveal and tilt engines
//!
//! All values are in CSS pixels, with `y` growing downwards as in client
//! coordinates.
use serde::{Deserialize, Serialize};

/// A point in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Per-edge offsets, used for root margins.
///
/// Positive values grow the box outwards, negative values shrink it, the same
/// convention as the `rootMargin` option of an intersection observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_finite(&self) -> bool {
        self.top.is_finite() && self.right.is_finite() && self.bottom.is_finite() && self.left.is_finite()
    }

    /// Format as a CSS length list, e.g. `0px 0px -50px 0px`
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// True when the box has no usable extent for dividing by its size
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.left.is_finite() && self.top.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right() && point.y >= self.top && point.y < self.bottom()
    }

    /// Grow (or shrink, for negative values) each edge by `insets`.
    /// The result never has a negative size.
    pub fn outset(&self, insets: &Insets) -> Rect {
        let left = self.left - insets.left;
        let top = self.top - insets.top;
        let width = (self.width + insets.left + insets.right).max(0.0);
        let height = (self.height + insets.top + insets.bottom).max(0.0);
        Rect::new(left, top, width, height)
    }

    /// Overlap of two boxes.
    ///
    /// Boxes that only share an edge still intersect, yielding a zero-size
    /// rectangle; `None` means they are fully apart.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }

        Some(Rect::new(left, top, right - left, bottom - top))
    }
}

/// Fraction of `target` visible inside `root` grown by `margin`.
///
/// Returns `None` when the target does not touch the root at all. A
/// zero-area target that touches the root counts as fully visible.
pub fn intersection_ratio(target: &Rect, root: &Rect, margin: &Insets) -> Option<f32> {
    let root = root.outset(margin);
    let overlap = target.intersection(&root)?;

    let area = target.area();
    if area <= 0.0 {
        return Some(1.0);
    }

    Some((overlap.area() / area).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_visible() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let card = Rect::new(100.0, 100.0, 200.0, 100.0);
        assert_eq!(intersection_ratio(&card, &viewport, &Insets::zero()), Some(1.0));
    }

    #[test]
    fn test_partially_visible() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        // Bottom quarter hangs below the fold
        let card = Rect::new(0.0, 525.0, 200.0, 100.0);
        let ratio = intersection_ratio(&card, &viewport, &Insets::zero()).unwrap();
        assert!((ratio - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_negative_bottom_margin_shrinks_root() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let margin = Insets::new(0.0, 0.0, -50.0, 0.0);
        let card = Rect::new(0.0, 560.0, 200.0, 100.0);
        assert_eq!(intersection_ratio(&card, &viewport, &margin), None);

        let card = Rect::new(0.0, 500.0, 200.0, 100.0);
        let ratio = intersection_ratio(&card, &viewport, &margin).unwrap();
        assert!((ratio - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_edge_adjacent_intersects_with_zero_ratio() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let card = Rect::new(0.0, 600.0, 200.0, 100.0);
        assert_eq!(intersection_ratio(&card, &viewport, &Insets::zero()), Some(0.0));
    }

    #[test]
    fn test_outset_never_negative() {
        let root = Rect::new(0.0, 0.0, 40.0, 40.0);
        let shrunk = root.outset(&Insets::new(-30.0, 0.0, -30.0, 0.0));
        assert_eq!(shrunk.height, 0.0);
    }

    #[test]
    fn test_degenerate() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, f32::NAN).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 10.0, 10.0).is_degenerate());
    }
}
