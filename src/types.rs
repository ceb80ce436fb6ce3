//! Geometric primitives shared by bubbles, tails and the scene.
//!
//! Points and offsets are plain `glam::DVec2` values in the coordinate space of
//! the container that holds every content region (y grows downward, like SVG).

use glam::DVec2;

/// Axis-aligned rectangle, used for content boxes and bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            min: DVec2::new(x, y),
            max: DVec2::new(x + width, y + height),
        }
    }

    pub fn from_center_size(center: DVec2, size: DVec2) -> Self {
        let half = size * 0.5;
        Rect {
            min: center - half,
            max: center + half,
        }
    }

    /// An empty rectangle that expands on the first point added.
    pub fn empty() -> Self {
        Rect {
            min: DVec2::splat(f64::MAX),
            max: DVec2::splat(f64::MIN),
        }
    }

    /// Check if the rect is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// A content box only counts as laid out once it has area.
    pub fn has_area(&self) -> bool {
        !self.is_empty() && self.width() > 0.0 && self.height() > 0.0 && self.is_finite()
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Expand to include a point
    pub fn expand_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Expand to include another rect
    pub fn expand_rect(&mut self, other: &Rect) {
        if other.is_empty() {
            return;
        }
        self.expand_point(other.min);
        self.expand_point(other.max);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    pub fn translate(&self, delta: DVec2) -> Rect {
        Rect {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Grow (or shrink, for negative amounts) by `amount` on every side.
    pub fn inflate(&self, amount: f64) -> Rect {
        Rect {
            min: self.min - DVec2::splat(amount),
            max: self.max + DVec2::splat(amount),
        }
    }
}

/// Rotate a vector 90° toward negative y for a positive x axis:
/// `(1, 0)` becomes `(0, -1)`. All perpendicular offsets in the crate use
/// this one convention so sides stay consistent between tails and handles.
#[inline]
pub fn perpendicular(v: DVec2) -> DVec2 {
    DVec2::new(v.y, -v.x)
}

/// Perpendicular displacement of `length` relative to `reference`.
/// A zero-length reference yields no displacement.
pub fn perpendicular_offset(reference: DVec2, length: f64) -> DVec2 {
    perpendicular(reference).normalize_or_zero() * length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_new_and_center() {
        let r = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(r.center(), DVec2::new(60.0, 40.0));
        assert_eq!(r.size(), DVec2::new(100.0, 40.0));
        assert!(r.has_area());
    }

    #[test]
    fn empty_rect_has_no_area() {
        assert!(Rect::empty().is_empty());
        assert!(!Rect::empty().has_area());
        assert!(!Rect::new(5.0, 5.0, 0.0, 10.0).has_area());
    }

    #[test]
    fn rect_expand() {
        let mut r = Rect::empty();
        r.expand_point(DVec2::new(1.0, 2.0));
        r.expand_point(DVec2::new(-3.0, 4.0));
        assert_eq!(r.min, DVec2::new(-3.0, 2.0));
        assert_eq!(r.max, DVec2::new(1.0, 4.0));
    }

    #[test]
    fn rect_contains_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(DVec2::new(0.0, 10.0)));
        assert!(!r.contains(DVec2::new(10.1, 5.0)));
    }

    #[test]
    fn perpendicular_convention() {
        assert_eq!(perpendicular(DVec2::new(1.0, 0.0)), DVec2::new(0.0, -1.0));
        let off = perpendicular_offset(DVec2::new(0.0, 5.0), 2.0);
        assert!((off - DVec2::new(2.0, 0.0)).length() < 1e-12);
        assert_eq!(perpendicular_offset(DVec2::ZERO, 3.0), DVec2::ZERO);
    }
}
