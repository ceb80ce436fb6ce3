use super::{TailContext, TailGeometry, TailParts, TailShape};
use crate::render::{PathShape, Shape};
use crate::types::perpendicular_offset;

/// A plain triangle: half the tail width either side of the root, meeting at
/// the tip. Used for joiner tails between chained bubbles.
#[derive(Debug, Clone, PartialEq)]
pub struct StraightTail {
    parts: TailParts,
}

impl StraightTail {
    pub fn new(parts: TailParts) -> Self {
        StraightTail { parts }
    }
}

impl TailShape for StraightTail {
    fn parts(&self) -> &TailParts {
        &self.parts
    }

    fn parts_mut(&mut self) -> &mut TailParts {
        &mut self.parts
    }

    fn geometry(&self, ctx: &TailContext<'_>) -> TailGeometry {
        let (root, tip) = (self.root(), self.tip());
        let half = perpendicular_offset(tip - root, ctx.options.tail_width / 2.0);
        let triangle = Shape::Path(PathShape::polygon(&[root + half, tip, root - half]));
        TailGeometry {
            lower: vec![(
                triangle.clone(),
                ctx.outline_style(ctx.options.outline_stroke_width),
            )],
            upper: vec![(triangle, ctx.fill_style())],
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;
    use crate::render::{RenderOptions, Segment};
    use crate::spec::TailSpec;
    use crate::types::Rect;

    #[test]
    fn triangle_straddles_root() {
        let options = RenderOptions::default();
        let ctx = TailContext::new(&options, Rect::new(-5.0, -5.0, 10.0, 10.0));
        let spec = TailSpec::new(DVec2::new(0.0, 100.0), DVec2::ZERO).with_joiner(true);
        let tail = StraightTail::new(TailParts::new(DVec2::ZERO, spec));
        let geometry = tail.geometry(&ctx);
        let Shape::Path(path) = &geometry.lower[0].0 else {
            panic!("expected a path");
        };
        assert!(path.closed);
        assert_eq!(path.segments.len(), 3);
        let Segment::Line { from, to } = path.segments[0] else {
            panic!("expected a line");
        };
        assert!((from.distance(DVec2::ZERO) - 6.0).abs() < 1e-9);
        assert_eq!(to, DVec2::new(0.0, 100.0));
        assert_eq!(tail.mid(), None);
    }
}
