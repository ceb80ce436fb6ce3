//! Body outline generators.
//!
//! Each generator describes its outline in content-holder coordinates, where
//! the wrapped content box is the square `[-1, 1] x [-1, 1]`. [`Holder`]
//! places those points onto the real content box, so the whole body scales
//! with the content.

use std::f64::consts::{SQRT_2, TAU};

use glam::DVec2;

use crate::render::{PathShape, Shape, make_arc};
use crate::spec::Style;
use crate::types::Rect;

const SPEECH_SCALE: f64 = 1.5;
const SHOUT_POINTS: usize = 16;
const SHOUT_OUTER: f64 = 1.8;
const SHOUT_INNER: f64 = 1.45;
const CAPTION_PADDING: f64 = 4.0;
const THOUGHT_LOBES: usize = 12;
const THOUGHT_BASE: f64 = 1.45;
const THOUGHT_LOBE_DEPTH: f64 = 0.25;

/// Maps content-holder coordinates onto a content box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Holder {
    center: DVec2,
    half: DVec2,
}

impl Holder {
    pub fn new(content: Rect) -> Self {
        Holder {
            center: content.center(),
            half: content.size() * 0.5,
        }
    }

    pub fn place(&self, p: DVec2) -> DVec2 {
        self.center + p * self.half
    }

    fn ellipse(&self, scale: f64) -> Shape {
        Shape::Ellipse {
            center: self.center,
            radii: self.half * scale,
        }
    }

    /// Point on the holder-space circle of `radius` at `angle`.
    fn polar(&self, radius: f64, angle: f64) -> DVec2 {
        self.place(DVec2::new(angle.cos(), angle.sin()) * radius)
    }
}

/// The body outline for `style` around `content`; `None` for styles without
/// a body.
pub fn body_outline(style: Style, content: Rect) -> Option<Shape> {
    let holder = Holder::new(content);
    match style {
        Style::None => None,
        Style::Speech => Some(holder.ellipse(SPEECH_SCALE)),
        Style::Ellipse => Some(holder.ellipse(SQRT_2)),
        Style::Shout => Some(shout(&holder)),
        Style::Caption => Some(Shape::Path(PathShape::polygon(&caption_corners(content)))),
        Style::Thought => Some(thought_cloud(&holder)),
    }
}

fn shout(holder: &Holder) -> Shape {
    let points: Vec<DVec2> = (0..SHOUT_POINTS)
        .map(|i| {
            let radius = if i % 2 == 0 { SHOUT_OUTER } else { SHOUT_INNER };
            holder.polar(radius, TAU * i as f64 / SHOUT_POINTS as f64)
        })
        .collect();
    Shape::Path(PathShape::polygon(&points))
}

fn caption_corners(content: Rect) -> [DVec2; 4] {
    let r = content.inflate(CAPTION_PADDING);
    [
        r.min,
        DVec2::new(r.max.x, r.min.y),
        r.max,
        DVec2::new(r.min.x, r.max.y),
    ]
}

/// Scalloped cloud: one outward circular lobe between each pair of base points.
fn thought_cloud(holder: &Holder) -> Shape {
    let step = TAU / THOUGHT_LOBES as f64;
    let mut path = PathShape::new();
    for i in 0..THOUGHT_LOBES {
        let a0 = step * i as f64;
        let start = holder.polar(THOUGHT_BASE, a0);
        let bulge = holder.polar(THOUGHT_BASE + THOUGHT_LOBE_DEPTH, a0 + step / 2.0);
        let end = holder.polar(THOUGHT_BASE, a0 + step);
        path.push(make_arc(start, bulge, end));
    }
    Shape::Path(path.close())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> Rect {
        Rect::new(100.0, 50.0, 120.0, 40.0)
    }

    fn corners(r: Rect) -> [DVec2; 4] {
        [
            r.min,
            DVec2::new(r.max.x, r.min.y),
            r.max,
            DVec2::new(r.min.x, r.max.y),
        ]
    }

    #[test]
    fn none_has_no_body() {
        assert!(body_outline(Style::None, content()).is_none());
    }

    #[test]
    fn every_body_frames_its_content() {
        for style in [Style::Speech, Style::Shout, Style::Ellipse, Style::Caption, Style::Thought] {
            let shape = body_outline(style, content()).unwrap();
            assert!(shape.contains(content().center()), "{style}");
            // nudge corners inward so the exact circumscribing ellipse counts
            let inner = content().inflate(-0.01);
            for c in corners(inner) {
                assert!(shape.contains(c), "{style} misses corner {c}");
            }
        }
    }

    #[test]
    fn holder_maps_unit_square_to_content() {
        let holder = Holder::new(content());
        assert_eq!(holder.place(DVec2::new(-1.0, -1.0)), content().min);
        assert_eq!(holder.place(DVec2::new(1.0, 1.0)), content().max);
    }

    #[test]
    fn body_scales_with_content() {
        let small = body_outline(Style::Speech, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        let large = body_outline(Style::Speech, Rect::new(0.0, 0.0, 100.0, 10.0)).unwrap();
        assert!(large.bounds().width() > 9.0 * small.bounds().width());
    }

    #[test]
    fn thought_cloud_is_closed_arcs() {
        let Some(Shape::Path(path)) = body_outline(Style::Thought, content()) else {
            panic!("expected a path");
        };
        assert!(path.closed);
        assert_eq!(path.segments.len(), THOUGHT_LOBES);
        assert!(path.segments.iter().all(|s| !s.is_line()));
    }
}
