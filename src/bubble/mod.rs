//! A bubble: one content region, its spec, its body and its tails.
//!
//! The body outline goes in the lower layer and an inset copy of it in the
//! upper layer, both at the bubble's level. Every outline of a level is drawn
//! before every fill of that level, so overlapping same-level bubbles read as
//! one merged shape.

pub mod outline;

use glam::DVec2;

use crate::errors::Result;
use crate::handle::HandleKind;
use crate::host::{ContentHost, RegionId, quietly};
use crate::log::{debug, warn};
use crate::render::{ItemId, ItemStyle, LayerKind, Paint, RenderOptions, Scene, Shape};
use crate::spec::{BubbleSpec, Style, TailSpec};
use crate::tail::{Tail, TailContext, TailShape};
use crate::types::{Rect, perpendicular};

/// Outcome of [`Bubble::adjust_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStatus {
    Ready { moved: bool },
    /// The region has no area yet; try again later.
    Deferred,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct BodyItems {
    outline: Option<ItemId>,
    fill: Option<ItemId>,
}

#[derive(Debug, Clone)]
pub struct Bubble {
    region: RegionId,
    spec: BubbleSpec,
    content: Option<Rect>,
    tails: Vec<Tail>,
    /// Tails replaced since the last draw; erased after their successors go in.
    stale_tails: Vec<Tail>,
    /// The spec's tail list is newer than `tails`.
    tails_dirty: bool,
    outline: Option<Shape>,
    body: BodyItems,
    handles_visible: bool,
    discovery: usize,
    /// Created before layout; the style's default tail still has to be placed.
    awaiting_default: bool,
}

impl Bubble {
    pub fn new(region: RegionId, spec: BubbleSpec, discovery: usize) -> Self {
        Bubble {
            region,
            spec,
            content: None,
            tails: Vec::new(),
            stale_tails: Vec::new(),
            tails_dirty: true,
            outline: None,
            body: BodyItems::default(),
            handles_visible: false,
            discovery,
            awaiting_default: false,
        }
    }

    /// The natural-looking midpoint for a tail from `start` to `target`: the
    /// middle of the segment, pushed sideways by a tenth of its length.
    ///
    /// With `size`, the point slides toward `target` until it is clear of a
    /// content box of that size centered on `start`. With `parent_size`, it
    /// is clamped into the container.
    pub fn default_mid(
        start: DVec2,
        target: DVec2,
        size: Option<DVec2>,
        parent_size: Option<DVec2>,
    ) -> DVec2 {
        let delta = target - start;
        let bend = perpendicular(delta) / 10.0;
        let mut mid = start + delta * 0.5 + bend;
        if let Some(size) = size {
            let content = Rect::from_center_size(start, size);
            let mut t = 0.5;
            while content.contains(mid) && t < 0.95 {
                t += 0.05;
                mid = start + delta * t + bend;
            }
        }
        if let Some(parent) = parent_size {
            mid = mid.clamp(DVec2::ZERO, parent.max(DVec2::ZERO));
        }
        mid
    }

    pub fn region(&self) -> &RegionId {
        &self.region
    }

    pub fn spec(&self) -> &BubbleSpec {
        &self.spec
    }

    pub fn style(&self) -> Style {
        self.spec.style
    }

    pub fn level(&self) -> i32 {
        self.spec.level
    }

    /// Position in discovery order, used to break ties inside a family.
    pub fn discovery(&self) -> usize {
        self.discovery
    }

    pub fn content_box(&self) -> Option<Rect> {
        self.content
    }

    pub fn is_laid_out(&self) -> bool {
        self.content.is_some()
    }

    /// Center of the content box: where every tail starts.
    pub fn root(&self) -> DVec2 {
        self.content.map(|c| c.center()).unwrap_or(DVec2::ZERO)
    }

    pub fn tails(&self) -> &[Tail] {
        &self.tails
    }

    pub fn tail_mut(&mut self, index: usize) -> Option<&mut Tail> {
        self.tails.get_mut(index)
    }

    pub fn outline(&self) -> Option<&Shape> {
        self.outline.as_ref()
    }

    /// Ask for the style default to be merged in once the content is laid out.
    pub fn await_style_default(&mut self) {
        self.awaiting_default = true;
    }

    pub fn awaits_style_default(&self) -> bool {
        self.awaiting_default
    }

    /// Clears the request made by [`await_style_default`](Bubble::await_style_default).
    pub fn take_style_default_request(&mut self) -> bool {
        std::mem::take(&mut self.awaiting_default)
    }

    /// Replace the whole spec. Geometry follows on the next
    /// [`make_shapes`](Bubble::make_shapes).
    pub fn set_spec(&mut self, spec: BubbleSpec) {
        if let Err(err) = spec.validate() {
            debug_assert!(false, "{err}");
            warn!(region = %self.region, %err, "drawing an invalid spec with best-effort defaults");
        }
        self.spec = spec;
        self.tails_dirty = true;
    }

    /// Append a tail to the spec.
    pub fn add_tail(&mut self, tail: TailSpec) {
        self.sync_tail_specs();
        let mut tails = self.spec.tails.clone();
        tails.push(tail);
        self.spec = self.spec.with_tails(tails);
        self.tails_dirty = true;
    }

    /// Copy the live tail positions back into the spec.
    pub fn sync_tail_specs(&mut self) {
        if !self.tails_dirty {
            self.spec = self.spec.with_tails(self.tails.iter().map(TailShape::spec).collect());
        }
    }

    /// Write the spec to the region's attribute without triggering a change
    /// notification.
    pub fn persist<H: ContentHost + ?Sized>(&mut self, host: &mut H) -> Result<()> {
        self.sync_tail_specs();
        let attribute = self.spec.to_attribute()?;
        let region = &self.region;
        quietly(host, |h| h.set_bubble_attribute(region, attribute));
        Ok(())
    }

    /// Track a new content box. Tails keep their tips; their roots move.
    pub fn adjust_size(&mut self, content: Option<Rect>) -> LayoutStatus {
        let Some(content) = content.filter(Rect::has_area) else {
            debug!(region = %self.region, "content not laid out yet");
            return LayoutStatus::Deferred;
        };
        let moved = self.content != Some(content);
        if moved {
            self.content = Some(content);
            let root = content.center();
            for tail in &mut self.tails {
                tail.adjust_for_changed_root(root);
            }
        }
        LayoutStatus::Ready { moved }
    }

    /// Point every joiner tail at `child_root`. Returns whether any moved.
    pub fn update_joiner_tips(&mut self, child_root: DVec2) -> bool {
        if self.tails_dirty {
            let stale = |t: &TailSpec| t.joiner && t.tip() != child_root;
            if !self.spec.tails.iter().any(stale) {
                return false;
            }
            let tails = self
                .spec
                .tails
                .iter()
                .map(|t| if stale(t) { t.with_tip(child_root) } else { t.clone() })
                .collect();
            self.spec = self.spec.with_tails(tails);
            return true;
        }
        let mut moved = false;
        for tail in self.tails.iter_mut().filter(|t| t.is_joiner()) {
            if tail.tip() != child_root {
                tail.adjust_for_changed_tip(child_root);
                moved = true;
            }
        }
        moved
    }

    fn paint(&self, options: &RenderOptions) -> (Paint, Option<String>, bool) {
        let fill = match &self.spec.background_colors {
            Some(colors) => Paint::from_colors(colors),
            None => Paint::Solid(options.background.clone()),
        };
        let border = self.spec.border_style.as_deref();
        let stroke = (border != Some("none")).then(|| {
            self.spec
                .outer_border_color
                .clone()
                .unwrap_or_else(|| options.border.clone())
        });
        (fill, stroke, border == Some("dashed"))
    }

    /// The context this bubble's tails draw and validate drags in. `None`
    /// until the content is laid out.
    pub fn tail_context<'a>(
        &self,
        options: &'a RenderOptions,
        obstacles: Vec<Rect>,
        parent_size: Option<DVec2>,
    ) -> Option<TailContext<'a>> {
        let content = self.content?;
        let (fill, stroke, dashed) = self.paint(options);
        Some(TailContext {
            options,
            owner_content: content,
            owner_outline: self.outline.clone(),
            obstacles,
            parent_size,
            z: self.spec.level,
            fill,
            stroke,
            dashed,
        })
    }

    /// Draw or redraw the body and every tail. New shapes go in before stale
    /// ones come out.
    pub fn make_shapes(
        &mut self,
        scene: &mut Scene,
        options: &RenderOptions,
        obstacles: Vec<Rect>,
        parent_size: Option<DVec2>,
    ) {
        let Some(content) = self.content else {
            return;
        };
        if self.tails_dirty {
            let root = content.center();
            let fresh = self
                .spec
                .tails
                .iter()
                .map(|t| Tail::for_spec(t, root, self.spec.style))
                .collect();
            let old = std::mem::replace(&mut self.tails, fresh);
            self.stale_tails.extend(old);
            self.tails_dirty = false;
        }

        self.outline = outline::body_outline(self.spec.style, content);
        let (fill, stroke, dashed) = self.paint(options);
        let level = self.spec.level;
        match &self.outline {
            Some(shape) => {
                let style = ItemStyle {
                    fill: fill.clone(),
                    stroke,
                    stroke_width: options.outline_stroke_width,
                    dashed,
                };
                self.body.outline =
                    Some(scene.replace(LayerKind::Lower, level, self.body.outline, shape.clone(), style));
                self.body.fill = Some(scene.replace(
                    LayerKind::Upper,
                    level,
                    self.body.fill,
                    shape.inset(options.fill_inset),
                    ItemStyle::filled(fill),
                ));
            }
            None => {
                for id in [self.body.outline.take(), self.body.fill.take()].into_iter().flatten() {
                    scene.remove(id);
                }
            }
        }

        if let Some(ctx) = self.tail_context(options, obstacles, parent_size) {
            for tail in &mut self.tails {
                tail.make_shapes(scene, &ctx);
                if self.handles_visible {
                    tail.show_handles(scene, options);
                }
            }
        }
        for mut tail in self.stale_tails.drain(..) {
            tail.remove(scene);
        }
        self.sync_tail_specs();
    }

    /// Redraw a single tail, after a drag.
    pub fn make_tail_shapes(&mut self, index: usize, scene: &mut Scene, ctx: &TailContext<'_>) {
        if let Some(tail) = self.tails.get_mut(index) {
            tail.make_shapes(scene, ctx);
        }
        self.sync_tail_specs();
    }

    pub fn show_handles(&mut self, scene: &mut Scene, options: &RenderOptions) {
        self.handles_visible = true;
        for tail in &mut self.tails {
            tail.show_handles(scene, options);
        }
    }

    pub fn hide_handles(&mut self, scene: &mut Scene) {
        self.handles_visible = false;
        for tail in &mut self.tails {
            tail.hide_handles(scene);
        }
    }

    /// The tail and handle that scene item `id` belongs to.
    pub fn handle_at(&self, id: ItemId) -> Option<(usize, HandleKind)> {
        self.tails
            .iter()
            .enumerate()
            .find_map(|(i, tail)| tail.handle_for(id).map(|kind| (i, kind)))
    }

    /// Whether the drawn bubble (content, body or any tail) covers `p`.
    pub fn contains_point(&self, scene: Option<&Scene>, p: DVec2, tolerance: f64) -> bool {
        self.content.is_some_and(|c| c.contains(p))
            || self.outline.as_ref().is_some_and(|o| o.contains(p))
            || scene.is_some_and(|scene| self.tails.iter().any(|t| t.hit(scene, p, tolerance)))
    }

    /// Erase everything this bubble drew.
    pub fn remove(&mut self, scene: &mut Scene) {
        self.sync_tail_specs();
        for id in [self.body.outline.take(), self.body.fill.take()].into_iter().flatten() {
            scene.remove(id);
        }
        for mut tail in self.tails.drain(..).chain(self.stale_tails.drain(..)) {
            tail.remove(scene);
        }
        self.tails_dirty = true;
        self.outline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::spec::default_tail;

    fn content() -> Rect {
        Rect::new(100.0, 100.0, 80.0, 40.0)
    }

    fn speech() -> Bubble {
        let spec = BubbleSpec::default_for(Style::Speech, 1, Some(content()), None);
        let mut bubble = Bubble::new(RegionId::from("a"), spec, 0);
        assert_eq!(bubble.adjust_size(Some(content())), LayoutStatus::Ready { moved: true });
        bubble
    }

    #[test]
    fn default_mid_literal() {
        let mid = Bubble::default_mid(DVec2::ZERO, DVec2::new(100.0, 0.0), None, None);
        assert_eq!(mid, DVec2::new(50.0, -10.0));
    }

    #[test]
    fn default_mid_slides_out_of_content() {
        let size = DVec2::new(120.0, 40.0);
        let mid = Bubble::default_mid(DVec2::ZERO, DVec2::new(100.0, 0.0), Some(size), None);
        assert!(!Rect::from_center_size(DVec2::ZERO, size).contains(mid));
        assert!(mid.x > 50.0);
    }

    #[test]
    fn default_mid_clamps_to_parent() {
        let mid = Bubble::default_mid(
            DVec2::new(10.0, 5.0),
            DVec2::new(110.0, 5.0),
            None,
            Some(DVec2::new(200.0, 200.0)),
        );
        assert_eq!(mid.y, 0.0);
    }

    #[test]
    fn zero_sized_content_is_deferred() {
        let mut bubble = Bubble::new(RegionId::from("a"), BubbleSpec::default(), 0);
        assert_eq!(bubble.adjust_size(None), LayoutStatus::Deferred);
        assert_eq!(
            bubble.adjust_size(Some(Rect::new(0.0, 0.0, 0.0, 10.0))),
            LayoutStatus::Deferred
        );
        assert!(!bubble.is_laid_out());
    }

    #[test]
    fn make_shapes_draws_body_and_tail() {
        let options = RenderOptions::default();
        let mut scene = Scene::new();
        let mut bubble = speech();
        bubble.make_shapes(&mut scene, &options, Vec::new(), None);
        // body outline + tail outline, body fill + tail fill
        assert_eq!(scene.layer(LayerKind::Lower).len(), 2);
        assert_eq!(scene.layer(LayerKind::Upper).len(), 2);
        assert!(bubble.outline().is_some());

        bubble.make_shapes(&mut scene, &options, Vec::new(), None);
        assert_eq!(scene.len(), 4);

        bubble.remove(&mut scene);
        assert!(scene.is_empty());
    }

    #[test]
    fn style_change_waits_for_make_shapes() {
        let options = RenderOptions::default();
        let mut scene = Scene::new();
        let mut bubble = speech();
        bubble.make_shapes(&mut scene, &options, Vec::new(), None);
        bubble.set_spec(bubble.spec().with_style(Style::Thought));
        assert_eq!(bubble.tails()[0].kind_name(), "arc");
        bubble.make_shapes(&mut scene, &options, Vec::new(), None);
        assert_eq!(bubble.tails()[0].kind_name(), "thought");
        assert_eq!(scene.layer(LayerKind::Lower).len(), 1);
    }

    #[test]
    fn moving_content_moves_roots_not_tips() {
        let mut bubble = speech();
        let options = RenderOptions::default();
        let mut scene = Scene::new();
        bubble.make_shapes(&mut scene, &options, Vec::new(), None);
        let tip = bubble.tails()[0].tip();
        let moved = content().translate(DVec2::new(30.0, 0.0));
        assert_eq!(bubble.adjust_size(Some(moved)), LayoutStatus::Ready { moved: true });
        assert_eq!(bubble.tails()[0].root(), moved.center());
        assert_eq!(bubble.tails()[0].tip(), tip);
        assert_eq!(bubble.adjust_size(Some(moved)), LayoutStatus::Ready { moved: false });
    }

    #[test]
    fn cosmetics_reach_the_scene() {
        let options = RenderOptions::default();
        let mut scene = Scene::new();
        let mut bubble = speech();
        bubble.set_spec(BubbleSpec {
            background_colors: Some(vec!["red".into(), "blue".into()]),
            border_style: Some("dashed".into()),
            outer_border_color: Some("green".into()),
            ..bubble.spec().clone()
        });
        bubble.make_shapes(&mut scene, &options, Vec::new(), None);
        let body = &scene.layer(LayerKind::Lower)[0];
        assert!(body.style.dashed);
        assert_eq!(body.style.stroke.as_deref(), Some("green"));
        assert!(matches!(body.style.fill, Paint::VerticalGradient(_)));

        bubble.set_spec(BubbleSpec {
            border_style: Some("none".into()),
            ..bubble.spec().clone()
        });
        bubble.make_shapes(&mut scene, &options, Vec::new(), None);
        assert!(scene.layer(LayerKind::Lower)[0].style.stroke.is_none());
    }

    #[test]
    fn persist_writes_quietly() {
        let mut host = MemoryHost::new();
        let region = host.add_region("a", Some(content()));
        let mut bubble = Bubble::new(region.clone(), BubbleSpec::default(), 0);
        bubble.add_tail(default_tail(content(), None));
        bubble.persist(&mut host).unwrap();
        assert!(host.take_changes().is_empty());
        let stored = host.bubble_attribute(&region).unwrap();
        let parsed = BubbleSpec::from_attribute(&stored).unwrap();
        assert_eq!(parsed.tails.len(), 1);
    }

    #[test]
    fn joiner_tips_follow_child() {
        let mut bubble = speech();
        bubble.add_tail(TailSpec::new(DVec2::new(300.0, 300.0), DVec2::new(250.0, 200.0)).with_joiner(true));
        let options = RenderOptions::default();
        let mut scene = Scene::new();
        bubble.make_shapes(&mut scene, &options, Vec::new(), None);
        assert!(bubble.update_joiner_tips(DVec2::new(320.0, 310.0)));
        assert!(!bubble.update_joiner_tips(DVec2::new(320.0, 310.0)));
        bubble.sync_tail_specs();
        assert_eq!(bubble.spec().tails[1].tip(), DVec2::new(320.0, 310.0));
        assert!(!bubble.spec().tails[0].joiner);
    }
}
