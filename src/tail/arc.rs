use glam::DVec2;

use super::{MidpointControl, TailContext, TailGeometry, TailParts, TailShape};
use crate::render::geometry::perpendicular_bisector;
use crate::render::{PathShape, Shape, make_arc};
use crate::types::perpendicular_offset;

/// The default tail: a curved wedge from the bubble to the tip.
///
/// The raw midpoint only picks the curve. The wedge itself is built around
/// the point where that curve crosses the perpendicular bisector of
/// root..tip, so dragging the midpoint toward either end bends the tail
/// without thinning it.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcTail {
    parts: TailParts,
    control: MidpointControl,
}

/// Points the wedge outline passes through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcTailFrame {
    pub begin: DVec2,
    pub end: DVec2,
    pub adjusted_mid: DVec2,
    pub bulge_begin: DVec2,
    pub bulge_end: DVec2,
}

impl ArcTail {
    pub fn new(parts: TailParts) -> Self {
        let control = MidpointControl::from_spec(&parts.spec);
        ArcTail { parts, control }
    }

    pub fn frame(&self, width: f64) -> ArcTailFrame {
        arc_frame(self.parts.root, self.control.mid(), self.tip(), width)
    }
}

/// Construct the wedge frame for `root`, `mid`, `tip` and a base `width`.
pub fn arc_frame(root: DVec2, mid: DVec2, tip: DVec2, width: f64) -> ArcTailFrame {
    let trial = make_arc(root, mid, tip);
    let reach = 2.0 * (root.distance(tip) + root.distance(mid) + mid.distance(tip)) + 1.0;
    let (a, b) = perpendicular_bisector(root, tip, reach);
    // No crossing means a pathological midpoint; the raw one still draws.
    let adjusted_mid = trial
        .intersect_segment(a, b)
        .first()
        .map(|(_, p)| *p)
        .unwrap_or(mid);

    let base = perpendicular_offset(adjusted_mid - root, width / 2.0);
    let bulge = perpendicular_offset(tip - root, width / 4.0);
    ArcTailFrame {
        begin: root + base,
        end: root - base,
        adjusted_mid,
        bulge_begin: adjusted_mid + bulge,
        bulge_end: adjusted_mid - bulge,
    }
}

impl TailShape for ArcTail {
    fn parts(&self) -> &TailParts {
        &self.parts
    }

    fn parts_mut(&mut self) -> &mut TailParts {
        &mut self.parts
    }

    fn midpoint(&self) -> Option<&MidpointControl> {
        Some(&self.control)
    }

    fn midpoint_mut(&mut self) -> Option<&mut MidpointControl> {
        Some(&mut self.control)
    }

    fn geometry(&self, ctx: &TailContext<'_>) -> TailGeometry {
        let tip = self.tip();
        let frame = self.frame(ctx.options.tail_width);
        let mut outline = PathShape::new();
        outline.push(make_arc(frame.begin, frame.bulge_begin, tip));
        outline.push(make_arc(tip, frame.bulge_end, frame.end));
        let outline = Shape::Path(outline.close());

        TailGeometry {
            lower: vec![(
                outline.clone(),
                ctx.outline_style(ctx.options.outline_stroke_width),
            )],
            upper: vec![(outline, ctx.fill_style())],
        }
    }
}
