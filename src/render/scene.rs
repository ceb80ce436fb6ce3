//! The three-layer scene that bubbles and tails draw into.
//!
//! - `Lower` holds outlines (stroked bodies and tail outlines)
//! - `Upper` holds fills, inner seam-hiding shapes and thought-bubble chains
//! - `Handles` holds interactive controls and is stripped on export
//!
//! Within a layer, items are kept sorted by `z` (the bubble level) and then by
//! insertion order, so a later item paints over an earlier one. Export paints
//! level by level: a level's outlines, then its fills, then the next level.

use glam::DVec2;

use super::geometry::Shape;
use crate::types::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Lower,
    Upper,
    Handles,
}

impl LayerKind {
    pub const ALL: [LayerKind; 3] = [LayerKind::Lower, LayerKind::Upper, LayerKind::Handles];

    fn index(self) -> usize {
        match self {
            LayerKind::Lower => 0,
            LayerKind::Upper => 1,
            LayerKind::Handles => 2,
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            LayerKind::Lower => "comical-lower",
            LayerKind::Upper => "comical-upper",
            LayerKind::Handles => "comical-handles",
        }
    }
}

/// Fill of a scene item.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    None,
    Solid(String),
    /// Colors spread evenly from top to bottom.
    VerticalGradient(Vec<String>),
}

impl Paint {
    /// Solid for one color, gradient for several, none for an empty list.
    pub fn from_colors(colors: &[String]) -> Paint {
        match colors {
            [] => Paint::None,
            [one] => Paint::Solid(one.clone()),
            many => Paint::VerticalGradient(many.to_vec()),
        }
    }
}

/// Presentation attributes of a scene item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStyle {
    pub fill: Paint,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub dashed: bool,
}

impl ItemStyle {
    pub fn filled(fill: Paint) -> Self {
        ItemStyle {
            fill,
            stroke: None,
            stroke_width: 0.0,
            dashed: false,
        }
    }

    pub fn stroked(stroke: impl Into<String>, width: f64) -> Self {
        ItemStyle {
            fill: Paint::None,
            stroke: Some(stroke.into()),
            stroke_width: width,
            dashed: false,
        }
    }

    pub fn with_fill(mut self, fill: Paint) -> Self {
        self.fill = fill;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneItem {
    pub id: ItemId,
    pub z: i32,
    pub shape: Shape,
    pub style: ItemStyle,
}

#[derive(Debug, Default)]
pub struct Scene {
    layers: [Vec<SceneItem>; 3],
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId(self.next_id)
    }

    /// Insert on top of every item in `layer` with the same or lower `z`.
    pub fn insert(&mut self, layer: LayerKind, z: i32, shape: Shape, style: ItemStyle) -> ItemId {
        let id = self.allocate();
        let items = &mut self.layers[layer.index()];
        let at = items.iter().position(|item| item.z > z).unwrap_or(items.len());
        items.insert(at, SceneItem { id, z, shape, style });
        id
    }

    /// Swap `old` for a new item at the same position. The new item goes in
    /// first and the stale one is removed after, so nothing is ever missing.
    /// When `z` changed, the new item is placed by `z` instead.
    pub fn replace(
        &mut self,
        layer: LayerKind,
        z: i32,
        old: Option<ItemId>,
        shape: Shape,
        style: ItemStyle,
    ) -> ItemId {
        let anchor = old.and_then(|old| {
            self.layers[layer.index()]
                .iter()
                .position(|item| item.id == old && item.z == z)
        });
        let id = match anchor {
            Some(at) => {
                let id = self.allocate();
                self.layers[layer.index()].insert(at + 1, SceneItem { id, z, shape, style });
                id
            }
            None => self.insert(layer, z, shape, style),
        };
        if let Some(old) = old {
            self.remove(old);
        }
        id
    }

    /// Replace a group of items with a (possibly different sized) group, keeping
    /// the group's place in the stacking order.
    pub fn replace_many(
        &mut self,
        layer: LayerKind,
        z: i32,
        old: &[ItemId],
        shapes: Vec<(Shape, ItemStyle)>,
    ) -> Vec<ItemId> {
        let anchor = self.layers[layer.index()]
            .iter()
            .rposition(|item| old.contains(&item.id) && item.z == z);

        let ids: Vec<ItemId> = match anchor {
            Some(last) => {
                let mut at = last + 1;
                let mut ids = Vec::with_capacity(shapes.len());
                for (shape, style) in shapes {
                    let id = self.allocate();
                    self.layers[layer.index()].insert(at, SceneItem { id, z, shape, style });
                    ids.push(id);
                    at += 1;
                }
                ids
            }
            None => shapes
                .into_iter()
                .map(|(shape, style)| self.insert(layer, z, shape, style))
                .collect(),
        };

        for id in old {
            self.remove(*id);
        }
        ids
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        for items in &mut self.layers {
            if let Some(at) = items.iter().position(|item| item.id == id) {
                items.remove(at);
                return true;
            }
        }
        false
    }

    pub fn get(&self, id: ItemId) -> Option<&SceneItem> {
        self.layers.iter().flatten().find(|item| item.id == id)
    }

    pub fn layer(&self, kind: LayerKind) -> &[SceneItem] {
        &self.layers[kind.index()]
    }

    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs of same-level items in paint order. Handles always come last.
    pub fn paint_runs(&self, include_handles: bool) -> Vec<(LayerKind, i32, &[SceneItem])> {
        let mut runs: Vec<(LayerKind, i32, &[SceneItem])> = Vec::new();
        for kind in [LayerKind::Lower, LayerKind::Upper] {
            runs.extend(
                self.layer(kind)
                    .chunk_by(|a, b| a.z == b.z)
                    .map(|run| (kind, run[0].z, run)),
            );
        }
        runs.sort_by_key(|(kind, z, _)| (*z, kind.index()));
        let handles = self.layer(LayerKind::Handles);
        if include_handles && !handles.is_empty() {
            runs.push((LayerKind::Handles, 0, handles));
        }
        runs
    }

    /// Topmost item in `kind` under `p`, counting `tolerance` around outlines.
    pub fn hit_test(&self, kind: LayerKind, p: DVec2, tolerance: f64) -> Option<ItemId> {
        self.layer(kind)
            .iter()
            .rev()
            .find(|item| item.shape.hit(p, tolerance))
            .map(|item| item.id)
    }

    /// Bounds of everything drawn, widened by stroke widths.
    pub fn bounds(&self, include_handles: bool) -> Rect {
        let mut r = Rect::empty();
        for kind in LayerKind::ALL {
            if kind == LayerKind::Handles && !include_handles {
                continue;
            }
            for item in self.layer(kind) {
                r.expand_rect(&item.shape.bounds().inflate(item.style.stroke_width / 2.0));
            }
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(x: f64) -> Shape {
        Shape::circle(DVec2::new(x, 0.0), 1.0)
    }

    fn plain() -> ItemStyle {
        ItemStyle::filled(Paint::Solid("white".into()))
    }

    #[test]
    fn insert_orders_by_z_then_insertion() {
        let mut scene = Scene::new();
        let a = scene.insert(LayerKind::Lower, 2, dot(0.0), plain());
        let b = scene.insert(LayerKind::Lower, 1, dot(1.0), plain());
        let c = scene.insert(LayerKind::Lower, 2, dot(2.0), plain());
        let order: Vec<ItemId> = scene.layer(LayerKind::Lower).iter().map(|i| i.id).collect();
        assert_eq!(order, vec![b, a, c]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut scene = Scene::new();
        let a = scene.insert(LayerKind::Upper, 0, dot(0.0), plain());
        let b = scene.insert(LayerKind::Upper, 0, dot(1.0), plain());
        let a2 = scene.replace(LayerKind::Upper, 0, Some(a), dot(5.0), plain());
        assert_ne!(a, a2);
        let order: Vec<ItemId> = scene.layer(LayerKind::Upper).iter().map(|i| i.id).collect();
        assert_eq!(order, vec![a2, b]);
        assert!(scene.get(a).is_none());
    }

    #[test]
    fn replace_many_resizes_group() {
        let mut scene = Scene::new();
        let first = scene.insert(LayerKind::Upper, 0, dot(0.0), plain());
        let olds = vec![
            scene.insert(LayerKind::Upper, 0, dot(1.0), plain()),
            scene.insert(LayerKind::Upper, 0, dot(2.0), plain()),
        ];
        let last = scene.insert(LayerKind::Upper, 0, dot(3.0), plain());
        let news = scene.replace_many(
            LayerKind::Upper,
            0,
            &olds,
            vec![(dot(7.0), plain()), (dot(8.0), plain()), (dot(9.0), plain())],
        );
        let order: Vec<ItemId> = scene.layer(LayerKind::Upper).iter().map(|i| i.id).collect();
        assert_eq!(order, vec![first, news[0], news[1], news[2], last]);
    }

    #[test]
    fn replace_with_new_level_keeps_layer_sorted() {
        let mut scene = Scene::new();
        let low = scene.insert(LayerKind::Lower, 1, dot(0.0), plain());
        let mid = scene.insert(LayerKind::Lower, 2, dot(1.0), plain());
        let high = scene.insert(LayerKind::Lower, 3, dot(2.0), plain());
        let moved = scene.replace(LayerKind::Lower, 4, Some(low), dot(3.0), plain());
        let order: Vec<ItemId> = scene.layer(LayerKind::Lower).iter().map(|i| i.id).collect();
        assert_eq!(order, vec![mid, high, moved]);

        let regrouped = scene.replace_many(LayerKind::Lower, 0, &[high], vec![(dot(4.0), plain())]);
        let zs: Vec<i32> = scene.layer(LayerKind::Lower).iter().map(|i| i.z).collect();
        assert_eq!(zs, vec![0, 2, 4]);
        assert_eq!(scene.layer(LayerKind::Lower)[0].id, regrouped[0]);
    }

    #[test]
    fn replace_without_old_inserts() {
        let mut scene = Scene::new();
        let id = scene.replace(LayerKind::Lower, 0, None, dot(0.0), plain());
        assert!(scene.get(id).is_some());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn hit_test_prefers_topmost() {
        let mut scene = Scene::new();
        let _under = scene.insert(LayerKind::Handles, 0, Shape::circle(DVec2::ZERO, 5.0), plain());
        let over = scene.insert(LayerKind::Handles, 0, Shape::circle(DVec2::ZERO, 5.0), plain());
        assert_eq!(scene.hit_test(LayerKind::Handles, DVec2::new(1.0, 1.0), 0.0), Some(over));
        assert_eq!(scene.hit_test(LayerKind::Handles, DVec2::new(20.0, 0.0), 0.0), None);
    }

    #[test]
    fn paint_runs_interleave_levels() {
        let mut scene = Scene::new();
        scene.insert(LayerKind::Upper, 1, dot(0.0), plain());
        scene.insert(LayerKind::Lower, 2, dot(1.0), plain());
        scene.insert(LayerKind::Lower, 1, dot(2.0), plain());
        scene.insert(LayerKind::Handles, 0, dot(3.0), plain());
        let order: Vec<(LayerKind, i32)> = scene
            .paint_runs(true)
            .into_iter()
            .map(|(kind, z, _)| (kind, z))
            .collect();
        assert_eq!(
            order,
            vec![
                (LayerKind::Lower, 1),
                (LayerKind::Upper, 1),
                (LayerKind::Lower, 2),
                (LayerKind::Handles, 0)
            ]
        );
        assert_eq!(scene.paint_runs(false).len(), 3);
    }

    #[test]
    fn bounds_can_skip_handles() {
        let mut scene = Scene::new();
        scene.insert(LayerKind::Lower, 0, Shape::circle(DVec2::ZERO, 2.0), plain());
        scene.insert(LayerKind::Handles, 0, Shape::circle(DVec2::new(50.0, 0.0), 2.0), plain());
        assert_eq!(scene.bounds(false).max.x, 2.0);
        assert_eq!(scene.bounds(true).max.x, 52.0);
    }
}
