//! Midpoint handling shared by the curved tails, and the stroke-only curve
//! drawn for bubbles without a body.

use glam::DVec2;

use super::{TailContext, TailGeometry, TailParts, TailShape};
use crate::bubble::Bubble;
use crate::render::{PathShape, Shape, make_arc};
use crate::spec::TailSpec;

/// The curve control point of a tail, in auto or manual mode.
#[derive(Debug, Clone, PartialEq)]
pub struct MidpointControl {
    mid: DVec2,
    auto_curve: bool,
}

impl MidpointControl {
    pub fn from_spec(spec: &TailSpec) -> Self {
        MidpointControl {
            mid: spec.mid(),
            auto_curve: spec.auto_curve,
        }
    }

    pub fn mid(&self) -> DVec2 {
        self.mid
    }

    pub fn is_auto(&self) -> bool {
        self.auto_curve
    }

    pub fn write_into(&self, spec: &mut TailSpec) {
        spec.midpoint_x = self.mid.x;
        spec.midpoint_y = self.mid.y;
        spec.auto_curve = self.auto_curve;
    }

    /// In auto mode, recompute from scratch for the current root and tip.
    pub fn refresh(&mut self, root: DVec2, tip: DVec2, ctx: &TailContext<'_>) {
        if self.auto_curve {
            self.mid = auto_mid(root, tip, ctx);
        }
    }

    /// A manual midpoint near the root moves almost as far as the root did.
    pub fn root_moved(&mut self, old_root: DVec2, new_root: DVec2, tip: DVec2) {
        if !self.auto_curve {
            let t = fraction_along(self.mid, old_root, tip);
            self.mid += (new_root - old_root) * (1.0 - t);
        }
    }

    pub fn tip_moved(&mut self, root: DVec2, old_tip: DVec2, new_tip: DVec2) {
        if !self.auto_curve {
            let t = fraction_along(self.mid, root, old_tip);
            self.mid += (new_tip - old_tip) * t;
        }
    }

    /// A user-placed midpoint; turns auto mode off.
    pub fn set_manual(&mut self, mid: DVec2) {
        self.mid = mid;
        self.auto_curve = false;
    }

    /// Turn auto mode back on, discarding the manual position.
    pub fn reset_auto(&mut self, root: DVec2, tip: DVec2, ctx: &TailContext<'_>) {
        self.auto_curve = true;
        self.refresh(root, tip, ctx);
    }
}

/// Where `p` projects onto `a..b`, as a fraction clamped to `[0, 1]`.
fn fraction_along(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return 0.5;
    }
    ((p - a).dot(ab) / len2).clamp(0.0, 1.0)
}

/// The automatic midpoint: [`Bubble::default_mid`], pushed out of any other
/// bubble's content box when possible.
pub fn auto_mid(root: DVec2, tip: DVec2, ctx: &TailContext<'_>) -> DVec2 {
    let size = ctx.owner_content.has_area().then(|| ctx.owner_content.size());
    let mid = Bubble::default_mid(root, tip, size, ctx.parent_size);
    if !ctx.in_obstacle(mid) {
        return mid;
    }

    let base = (root + tip) * 0.5;
    let bend = mid - base;
    let clamp = |p: DVec2| match ctx.parent_size {
        Some(parent) => p.clamp(DVec2::ZERO, parent.max(DVec2::ZERO)),
        None => p,
    };
    [-1.0, 2.0, -2.0, 3.0, -3.0]
        .into_iter()
        .map(|k| clamp(base + bend * k))
        .find(|p| !ctx.in_obstacle(*p))
        .unwrap_or(mid)
}

/// A single stroked curve from root through the midpoint to the tip.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveTail {
    parts: TailParts,
    control: MidpointControl,
}

impl CurveTail {
    pub fn new(parts: TailParts) -> Self {
        let control = MidpointControl::from_spec(&parts.spec);
        CurveTail { parts, control }
    }
}

impl TailShape for CurveTail {
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
        let curve = make_arc(self.parts.root, self.control.mid(), self.tip());
        TailGeometry {
            lower: vec![(
                Shape::Path(PathShape::from_segment(curve)),
                ctx.line_style(ctx.options.outline_stroke_width),
            )],
            upper: Vec::new(),
        }
    }
}
