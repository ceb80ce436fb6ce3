//! Tails: the pointer shapes that connect a bubble to what it talks about.
//!
//! Every variant shares [`TailParts`] (root, tip, persisted record, scene
//! items, drag state). Variants that have a curve control point compose a
//! [`MidpointControl`] instead of inheriting it. Which variant a tail uses is
//! never stored; [`Tail::for_spec`] derives it from the bubble style and the
//! tail's joiner flag on every rebuild.

mod arc;
mod curve;
mod line;
mod straight;
mod thought;

pub use arc::{ArcTail, ArcTailFrame, arc_frame};
pub use curve::{CurveTail, MidpointControl, auto_mid};
pub use line::LineTail;
pub use straight::StraightTail;
pub use thought::ThoughtTail;

use enum_dispatch::enum_dispatch;
use glam::DVec2;

use crate::handle::{DragState, HandleKind, handle_shape, handle_style};
use crate::render::{ItemId, ItemStyle, LayerKind, Paint, RenderOptions, Scene, Shape};
use crate::spec::{Style, TailSpec};
use crate::types::Rect;

/// Everything a tail needs to know about its surroundings to draw itself.
#[derive(Debug, Clone)]
pub struct TailContext<'a> {
    pub options: &'a RenderOptions,
    /// Content box of the owning bubble.
    pub owner_content: Rect,
    /// Body outline of the owning bubble, if its style draws one.
    pub owner_outline: Option<Shape>,
    /// Content boxes of the other bubbles; a midpoint may not land in one.
    pub obstacles: Vec<Rect>,
    pub parent_size: Option<DVec2>,
    /// Stacking level shared with the owning bubble.
    pub z: i32,
    pub fill: Paint,
    pub stroke: Option<String>,
    pub dashed: bool,
}

impl<'a> TailContext<'a> {
    /// A context with default colors, for a bubble whose content box is `owner_content`.
    pub fn new(options: &'a RenderOptions, owner_content: Rect) -> Self {
        TailContext {
            options,
            owner_content,
            owner_outline: None,
            obstacles: Vec::new(),
            parent_size: None,
            z: 0,
            fill: Paint::Solid(options.background.clone()),
            stroke: Some(options.border.clone()),
            dashed: false,
        }
    }

    pub(crate) fn outline_style(&self, width: f64) -> ItemStyle {
        ItemStyle {
            fill: self.fill.clone(),
            stroke: self.stroke.clone(),
            stroke_width: width,
            dashed: self.dashed,
        }
    }

    pub(crate) fn line_style(&self, width: f64) -> ItemStyle {
        ItemStyle {
            fill: Paint::None,
            stroke: Some(self.stroke.clone().unwrap_or_else(|| self.options.border.clone())),
            stroke_width: width,
            dashed: self.dashed,
        }
    }

    pub(crate) fn fill_style(&self) -> ItemStyle {
        ItemStyle::filled(self.fill.clone())
    }

    pub(crate) fn in_obstacle(&self, p: DVec2) -> bool {
        self.obstacles.iter().any(|r| r.contains(p))
    }
}

/// Shapes a tail contributes to the scene.
#[derive(Debug, Clone, Default)]
pub struct TailGeometry {
    /// Outlines, drawn under every fill of the same level.
    pub lower: Vec<(Shape, ItemStyle)>,
    /// Fills drawn over outlines, hiding the seam with the bubble body.
    pub upper: Vec<(Shape, ItemStyle)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TailItems {
    lower: Vec<ItemId>,
    upper: Vec<ItemId>,
    tip_handle: Option<ItemId>,
    mid_handle: Option<ItemId>,
    handles_visible: bool,
}

/// State shared by every tail variant.
#[derive(Debug, Clone, PartialEq)]
pub struct TailParts {
    /// Center of the owning bubble's content box.
    pub root: DVec2,
    /// Persisted record. Variants with a midpoint control keep the live
    /// midpoint there instead; [`TailShape::spec`] merges it back.
    pub spec: TailSpec,
    pub state: DragState,
    items: TailItems,
}

impl TailParts {
    pub fn new(root: DVec2, spec: TailSpec) -> Self {
        TailParts {
            root,
            spec,
            state: DragState::Idle,
            items: TailItems::default(),
        }
    }
}

/// Behavior every tail variant provides.
#[enum_dispatch]
pub trait TailShape {
    fn parts(&self) -> &TailParts;

    fn parts_mut(&mut self) -> &mut TailParts;

    /// Shapes for the current root, tip and midpoint.
    fn geometry(&self, ctx: &TailContext<'_>) -> TailGeometry;

    fn midpoint(&self) -> Option<&MidpointControl> {
        None
    }

    fn midpoint_mut(&mut self) -> Option<&mut MidpointControl> {
        None
    }

    fn root(&self) -> DVec2 {
        self.parts().root
    }

    fn tip(&self) -> DVec2 {
        self.parts().spec.tip()
    }

    /// The curve control point, for variants that have one.
    fn mid(&self) -> Option<DVec2> {
        self.midpoint().map(MidpointControl::mid)
    }

    fn is_joiner(&self) -> bool {
        self.parts().spec.joiner
    }

    fn state(&self) -> DragState {
        self.parts().state
    }

    /// The record to persist for this tail.
    fn spec(&self) -> TailSpec {
        let mut spec = self.parts().spec.clone();
        if let Some(control) = self.midpoint() {
            control.write_into(&mut spec);
        }
        spec
    }

    /// Draw (or redraw in place) this tail's shapes.
    fn make_shapes(&mut self, scene: &mut Scene, ctx: &TailContext<'_>) {
        let (root, tip) = (self.root(), self.tip());
        if let Some(control) = self.midpoint_mut() {
            control.refresh(root, tip, ctx);
        }
        let geometry = self.geometry(ctx);
        let items = &mut self.parts_mut().items;
        items.lower = scene.replace_many(LayerKind::Lower, ctx.z, &items.lower, geometry.lower);
        items.upper = scene.replace_many(LayerKind::Upper, ctx.z, &items.upper, geometry.upper);
        if items.handles_visible {
            self.show_handles(scene, ctx.options);
        }
    }

    /// The owning bubble moved or resized. A manual midpoint keeps its
    /// relative place along the tail; an auto one is recomputed on the next
    /// [`make_shapes`](TailShape::make_shapes).
    fn adjust_for_changed_root(&mut self, root: DVec2) {
        let (old, tip) = (self.root(), self.tip());
        self.parts_mut().root = root;
        if let Some(control) = self.midpoint_mut() {
            control.root_moved(old, root, tip);
        }
    }

    fn adjust_for_changed_tip(&mut self, tip: DVec2) {
        let (root, old) = (self.root(), self.tip());
        let parts = self.parts_mut();
        parts.spec = parts.spec.with_tip(tip);
        if let Some(control) = self.midpoint_mut() {
            control.tip_moved(root, old, tip);
        }
    }

    /// Draw handles for the draggable points. Joiner tips follow another
    /// bubble and get no handle.
    fn show_handles(&mut self, scene: &mut Scene, options: &RenderOptions) {
        let tip = (!self.is_joiner()).then(|| self.tip());
        let mid = self.midpoint().map(|c| (c.mid(), c.is_auto()));
        let items = &mut self.parts_mut().items;
        items.handles_visible = true;
        items.tip_handle = place_handle(scene, options, items.tip_handle, tip.map(|p| (p, false)));
        items.mid_handle = place_handle(scene, options, items.mid_handle, mid);
    }

    fn hide_handles(&mut self, scene: &mut Scene) {
        let items = &mut self.parts_mut().items;
        items.handles_visible = false;
        for id in [items.tip_handle.take(), items.mid_handle.take()].into_iter().flatten() {
            scene.remove(id);
        }
    }

    /// Which handle, if any, is the scene item `id`.
    fn handle_for(&self, id: ItemId) -> Option<HandleKind> {
        let items = &self.parts().items;
        if items.tip_handle == Some(id) {
            Some(HandleKind::Tip)
        } else if items.mid_handle == Some(id) {
            Some(HandleKind::Mid)
        } else {
            None
        }
    }

    /// Whether any drawn shape of this tail covers `p`.
    fn hit(&self, scene: &Scene, p: DVec2, tolerance: f64) -> bool {
        let items = &self.parts().items;
        items
            .lower
            .iter()
            .chain(&items.upper)
            .filter_map(|id| scene.get(*id))
            .any(|item| item.shape.hit(p, tolerance))
    }

    /// Erase every shape and handle this tail drew.
    fn remove(&mut self, scene: &mut Scene) {
        self.hide_handles(scene);
        let items = &mut self.parts_mut().items;
        for id in items.lower.drain(..).chain(items.upper.drain(..)) {
            scene.remove(id);
        }
    }
}

fn place_handle(
    scene: &mut Scene,
    options: &RenderOptions,
    old: Option<ItemId>,
    at: Option<(DVec2, bool)>,
) -> Option<ItemId> {
    match at {
        Some((p, auto)) => Some(scene.replace(
            LayerKind::Handles,
            0,
            old,
            handle_shape(p, options),
            handle_style(options, auto),
        )),
        None => {
            if let Some(old) = old {
                scene.remove(old);
            }
            None
        }
    }
}

/// The closed set of tail variants.
#[enum_dispatch(TailShape)]
#[derive(Debug, Clone, PartialEq)]
pub enum Tail {
    StraightTail,
    LineTail,
    ArcTail,
    CurveTail,
    ThoughtTail,
}

impl Tail {
    /// Build the variant a bubble of `style` draws for `spec`.
    pub fn for_spec(spec: &TailSpec, root: DVec2, style: Style) -> Tail {
        let parts = TailParts::new(root, spec.clone());
        if spec.joiner {
            return StraightTail::new(parts).into();
        }
        match style {
            Style::Thought => ThoughtTail::new(parts).into(),
            Style::Caption => LineTail::new(parts).into(),
            Style::None => CurveTail::new(parts).into(),
            Style::Speech | Style::Shout | Style::Ellipse => ArcTail::new(parts).into(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Tail::StraightTail(_) => "straight",
            Tail::LineTail(_) => "line",
            Tail::ArcTail(_) => "arc",
            Tail::CurveTail(_) => "curve",
            Tail::ThoughtTail(_) => "thought",
        }
    }
}
