use glam::DVec2;

use super::{MidpointControl, TailContext, TailGeometry, TailParts, TailShape};
use crate::log::debug;
use crate::render::defaults::THOUGHT_MAX_BUBBLES;
use crate::render::{PathShape, Shape, make_arc};

/// A chain of small ellipses, growing from the tip toward the bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct ThoughtTail {
    parts: TailParts,
    control: MidpointControl,
}

impl ThoughtTail {
    pub fn new(parts: TailParts) -> Self {
        let control = MidpointControl::from_spec(&parts.spec);
        ThoughtTail { parts, control }
    }

    /// Centers and radii of the mini-bubbles, tip first.
    pub fn chain(&self, ctx: &TailContext<'_>) -> Vec<(DVec2, f64)> {
        let path = PathShape::from_segment(make_arc(self.tip(), self.control.mid(), self.parts.root));
        let length = path.length();
        let options = ctx.options;
        let inside_owner = |p: DVec2| match &ctx.owner_outline {
            Some(outline) => outline.contains(p),
            None => ctx.owner_content.contains(p),
        };

        let mut chain = Vec::new();
        let mut pos = 0.0;
        let mut separation = options.thought_start_separation;
        while chain.len() < THOUGHT_MAX_BUBBLES {
            let frac = if length > 0.0 { pos / length } else { 1.0 };
            let radius = options.thought_tip_radius
                + (options.thought_root_radius - options.thought_tip_radius) * frac;
            if pos + 2.0 * radius > length {
                debug!(count = chain.len(), "thought chain reached the bubble");
                break;
            }
            let Some(center) = path.point_at_length(pos + radius) else {
                break;
            };
            if inside_owner(center) {
                debug!(count = chain.len(), "thought chain ran into the bubble body");
                break;
            }
            chain.push((center, radius));
            pos += 2.0 * radius + separation;
            separation += options.thought_separation_growth;
        }
        chain
    }
}

impl TailShape for ThoughtTail {
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

    /// Mini-bubbles go in the upper layer so they may overlap the body.
    fn geometry(&self, ctx: &TailContext<'_>) -> TailGeometry {
        let style = ctx.outline_style(ctx.options.outline_stroke_width);
        let upper = self
            .chain(ctx)
            .into_iter()
            .map(|(center, r)| {
                let shape = Shape::Ellipse {
                    center,
                    radii: DVec2::new(r, r * ctx.options.thought_aspect),
                };
                (shape, style.clone())
            })
            .collect();
        TailGeometry {
            lower: Vec::new(),
            upper,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RenderOptions, Scene};
    use crate::spec::TailSpec;
    use crate::types::Rect;

    fn tail(tip: DVec2) -> ThoughtTail {
        let spec = TailSpec::new(tip, tip * 0.5 + DVec2::new(0.0, -10.0));
        ThoughtTail::new(TailParts::new(DVec2::ZERO, spec))
    }

    #[test]
    fn chain_grows_toward_root() {
        let options = RenderOptions::default();
        // owner box far away so only the arc length stops the chain
        let ctx = TailContext::new(&options, Rect::new(1000.0, 1000.0, 10.0, 10.0));
        let chain = tail(DVec2::new(200.0, 0.0)).chain(&ctx);
        assert!(!chain.is_empty());
        assert!(chain.len() < THOUGHT_MAX_BUBBLES);
        assert_eq!(chain[0].1, 7.0);
        assert!(chain.windows(2).all(|w| w[1].1 > w[0].1));
        assert!(chain.iter().all(|(_, r)| *r <= 20.0));
    }

    #[test]
    fn chain_terminates_for_any_length() {
        let options = RenderOptions::default();
        let ctx = TailContext::new(&options, Rect::new(1000.0, 1000.0, 10.0, 10.0));
        for len in [0.0, 1.0, 13.9, 14.0, 50.0, 400.0, 5000.0] {
            let chain = tail(DVec2::new(len, 0.0)).chain(&ctx);
            assert!(chain.len() <= THOUGHT_MAX_BUBBLES, "length {len}");
        }
        assert!(tail(DVec2::ZERO).chain(&ctx).is_empty());
    }

    #[test]
    fn chain_with_zero_spacing_is_capped() {
        let options = RenderOptions {
            thought_tip_radius: 0.0,
            thought_root_radius: 0.0,
            thought_start_separation: 0.0,
            thought_separation_growth: 0.0,
            ..Default::default()
        };
        let ctx = TailContext::new(&options, Rect::new(1000.0, 1000.0, 10.0, 10.0));
        assert_eq!(tail(DVec2::new(100.0, 0.0)).chain(&ctx).len(), THOUGHT_MAX_BUBBLES);
    }

    #[test]
    fn chain_stops_at_owner_body() {
        let options = RenderOptions::default();
        let far = TailContext::new(&options, Rect::new(1000.0, 1000.0, 10.0, 10.0));
        let mut near = TailContext::new(&options, Rect::new(-30.0, -30.0, 60.0, 60.0));
        near.owner_outline = Some(Shape::circle(DVec2::ZERO, 80.0));
        let t = tail(DVec2::new(200.0, 0.0));
        let all = t.chain(&far);
        let clipped = t.chain(&near);
        assert!(clipped.len() < all.len());
        assert!(clipped.iter().all(|(c, _)| c.length() > 80.0));
    }

    #[test]
    fn draws_only_upper_ellipses() {
        let options = RenderOptions::default();
        let ctx = TailContext::new(&options, Rect::new(-10.0, -10.0, 20.0, 20.0));
        let mut t = tail(DVec2::new(200.0, 40.0));
        let mut scene = Scene::new();
        t.make_shapes(&mut scene, &ctx);
        let upper = scene.layer(crate::render::LayerKind::Upper);
        assert!(!upper.is_empty());
        assert!(scene.layer(crate::render::LayerKind::Lower).is_empty());
        assert!(upper.iter().all(|item| matches!(item.shape, Shape::Ellipse { .. })));
    }
}
