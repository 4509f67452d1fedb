//! Axis-aligned rectangle geometry for tanks, tiles and projectiles
//!
//! Rectangles are stored as top-left corner plus size, in arena units with
//! the y axis pointing down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Bound `v` to `[lo, hi]`.
///
/// Unlike `f32::clamp` this never panics: a degenerate range (`lo > hi`)
/// resolves to `lo`.
#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    let upper = if v < hi { v } else { hi };
    if upper > lo { upper } else { lo }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `2 * radius` centered on `center`
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Half-open overlap test; rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }

    /// True if the rectangle lies fully inside `[0, width] x [0, height]`
    pub fn inside(&self, width: f32, height: f32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

/// Strict interior intersection of two rectangles
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-3.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(12.5, 0.0, 10.0), 10.0);
        // Degenerate range resolves to the lower bound instead of panicking
        assert_eq!(clamp(4.0, 2.0, 1.0), 2.0);
    }

    #[test]
    fn test_overlap_interior() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 32.0, 32.0);
        let right = Rect::new(32.0, 0.0, 32.0, 32.0);
        let below = Rect::new(0.0, 32.0, 32.0, 32.0);
        assert!(!overlaps(&a, &right));
        assert!(!overlaps(&a, &below));
    }

    #[test]
    fn test_around_and_center() {
        let r = Rect::around(Vec2::new(100.0, 50.0), 4.0);
        assert_eq!(r, Rect::new(96.0, 46.0, 8.0, 8.0));
        assert_eq!(r.center(), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_inside_arena() {
        assert!(Rect::new(0.0, 0.0, 36.0, 36.0).inside(960.0, 600.0));
        assert!(!Rect::new(930.0, 0.0, 36.0, 36.0).inside(960.0, 600.0));
    }
}
