//! The collection manager.
//!
//! [`Comical`] discovers bubble regions through a [`ContentHost`], owns one
//! [`Bubble`] per region, draws them into a shared [`Scene`] while editing,
//! and routes pointer input to tail handles.
//!
//! Bubbles sharing a level form a family, ordered by their explicit `order`
//! and then by discovery. A family member's parent is the member before it
//! and its child the member after; joiner tails point from a parent to its
//! child's root.

use std::collections::HashMap;

use glam::DVec2;

use crate::bubble::{Bubble, LayoutStatus};
use crate::errors::{ComicalError, Result};
use crate::handle::{DragOutcome, HandleKind};
use crate::host::{ContentHost, RegionId};
use crate::log::debug;
use crate::render::{LayerKind, RenderOptions, Scene, export_svg};
use crate::spec::{BubbleSpec, BubbleSpecPattern, Style, TailSpec};
use crate::tail::Tail;
use crate::types::Rect;

#[derive(Debug, Clone, PartialEq)]
struct ActiveDrag {
    region: RegionId,
    tail: usize,
}

#[derive(Debug, Clone, PartialEq)]
struct PendingLayout {
    region: RegionId,
    attempts: u32,
}

pub struct Comical<H: ContentHost> {
    host: H,
    options: RenderOptions,
    bubbles: Vec<Bubble>,
    index: HashMap<RegionId, usize>,
    /// Present while editing.
    scene: Option<Scene>,
    active: Option<ActiveDrag>,
    pending: Vec<PendingLayout>,
    next_discovery: usize,
}

impl<H: ContentHost> Comical<H> {
    pub fn new(host: H) -> Self {
        Self::with_options(host, RenderOptions::default())
    }

    pub fn with_options(host: H, options: RenderOptions) -> Self {
        Comical {
            host,
            options,
            bubbles: Vec::new(),
            index: HashMap::new(),
            scene: None,
            active: None,
            pending: Vec::new(),
            next_discovery: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access for layout changes. Changes reach the bubbles on the
    /// next [`handle_changes`](Comical::handle_changes).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn is_editing(&self) -> bool {
        self.scene.is_some()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn bubble(&self, region: &RegionId) -> Option<&Bubble> {
        self.index.get(region).map(|&i| &self.bubbles[i])
    }

    /// Regions still waiting for a layout.
    pub fn pending_layouts(&self) -> Vec<&RegionId> {
        self.pending.iter().map(|p| &p.region).collect()
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Scan the host, draw every bubble and show the handles.
    pub fn start_editing(&mut self) -> Result<()> {
        self.scan()?;
        self.scene.get_or_insert_with(Scene::new);
        for i in 0..self.bubbles.len() {
            self.draw(i);
        }
        if let Some(scene) = self.scene.as_mut() {
            for bubble in &mut self.bubbles {
                bubble.show_handles(scene, &self.options);
            }
        }
        Ok(())
    }

    /// Strip the handles and return the drawing as a static SVG image.
    pub fn stop_editing(&mut self) -> Option<String> {
        self.active = None;
        let mut scene = self.scene.take()?;
        for bubble in &mut self.bubbles {
            bubble.hide_handles(&mut scene);
        }
        let svg = export_svg(&scene, false);
        for bubble in &mut self.bubbles {
            bubble.remove(&mut scene);
        }
        Some(svg)
    }

    /// The current drawing without handles, while editing.
    pub fn to_static_svg(&self) -> Option<String> {
        self.scene.as_ref().map(|scene| export_svg(scene, false))
    }

    /// Rebuild every bubble from the host.
    pub fn refresh(&mut self) -> Result<()> {
        if self.is_editing() {
            self.start_editing()
        } else {
            self.scan()
        }
    }

    /// Re-read every region. All attributes parse before anything is replaced,
    /// so a malformed spec leaves the current bubbles untouched.
    fn scan(&mut self) -> Result<()> {
        let regions = self.host.regions();
        let mut found = Vec::with_capacity(regions.len());
        for region in regions {
            let spec = self.read_spec(&region)?;
            found.push((region, spec));
        }

        let awaiting: Vec<RegionId> = self
            .bubbles
            .iter()
            .filter(|b| b.awaits_style_default())
            .map(|b| b.region().clone())
            .collect();
        self.active = None;
        self.pending.clear();
        if let Some(scene) = self.scene.as_mut() {
            for bubble in &mut self.bubbles {
                bubble.remove(scene);
            }
        }
        self.bubbles.clear();
        self.index.clear();

        debug!(count = found.len(), "discovered bubbles");
        for (region, spec) in found {
            let waits = awaiting.contains(&region);
            let i = self.insert(region, spec);
            if waits {
                self.bubbles[i].await_style_default();
            }
            if self.layout(i) != LayoutStatus::Deferred && self.apply_style_default(i) {
                self.persist(i)?;
            }
        }
        Ok(())
    }

    fn read_spec(&self, region: &RegionId) -> Result<BubbleSpec> {
        match self.host.bubble_attribute(region) {
            Some(attribute) => BubbleSpec::from_attribute(&attribute),
            None => Ok(BubbleSpec::default()),
        }
    }

    fn insert(&mut self, region: RegionId, spec: BubbleSpec) -> usize {
        let bubble = Bubble::new(region.clone(), spec, self.next_discovery);
        self.next_discovery += 1;
        self.bubbles.push(bubble);
        let i = self.bubbles.len() - 1;
        self.index.insert(region, i);
        i
    }

    fn remove_at(&mut self, i: usize) {
        let mut bubble = self.bubbles.remove(i);
        if let Some(scene) = self.scene.as_mut() {
            bubble.remove(scene);
        }
        self.pending.retain(|p| &p.region != bubble.region());
        if self.active.as_ref().is_some_and(|a| &a.region == bubble.region()) {
            self.active = None;
        }
        self.index = self
            .bubbles
            .iter()
            .enumerate()
            .map(|(i, b)| (b.region().clone(), i))
            .collect();
    }

    fn lookup(&self, region: &RegionId) -> Result<usize> {
        self.index
            .get(region)
            .copied()
            .ok_or_else(|| ComicalError::UnknownRegion {
                region: region.clone(),
            })
    }

    // ------------------------------------------------------------------
    // Layout and drawing
    // ------------------------------------------------------------------

    /// Track the region's current box, queueing it for [`tick`](Comical::tick)
    /// when it is not laid out yet.
    fn layout(&mut self, i: usize) -> LayoutStatus {
        let content = self.host.content_box(self.bubbles[i].region());
        let status = self.bubbles[i].adjust_size(content);
        let region = self.bubbles[i].region().clone();
        match status {
            LayoutStatus::Deferred => {
                if !self.pending.iter().any(|p| p.region == region) {
                    self.pending.push(PendingLayout {
                        region,
                        attempts: 0,
                    });
                }
            }
            LayoutStatus::Ready { .. } => self.pending.retain(|p| p.region != region),
        }
        status
    }

    /// Content boxes of every other laid-out bubble.
    fn obstacles(&self, i: usize) -> Vec<Rect> {
        self.bubbles
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .filter_map(|(_, b)| b.content_box())
            .collect()
    }

    fn draw(&mut self, i: usize) {
        let obstacles = self.obstacles(i);
        let parent_size = self.host.parent_size();
        if let Some(scene) = self.scene.as_mut() {
            self.bubbles[i].make_shapes(scene, &self.options, obstacles, parent_size);
        }
    }

    fn persist(&mut self, i: usize) -> Result<()> {
        self.bubbles[i].persist(&mut self.host)
    }

    /// Lay out, redraw and persist one bubble, then keep the joiners on both
    /// sides of it attached.
    fn refresh_bubble(&mut self, i: usize) -> Result<LayoutStatus> {
        let status = self.layout(i);
        if status == LayoutStatus::Deferred {
            return Ok(status);
        }
        self.apply_style_default(i);
        self.draw(i);
        self.persist(i)?;
        self.sync_joiners(i)?;
        Ok(status)
    }

    /// A bubble created before layout gets its style default (and with it the
    /// default tail) merged in on its first real content box.
    fn apply_style_default(&mut self, i: usize) -> bool {
        if !self.bubbles[i].take_style_default_request() {
            return false;
        }
        self.bubbles[i].sync_tail_specs();
        let current = self.bubbles[i].spec().clone();
        let defaults = BubbleSpec::default_for(
            current.style,
            current.level,
            self.bubbles[i].content_box(),
            self.host.parent_size(),
        );
        let merged = BubbleSpec::merge(&current, &BubbleSpecPattern::default(), &defaults);
        if merged != current {
            debug!(region = %self.bubbles[i].region(), "placing the deferred default tail");
            self.bubbles[i].set_spec(merged);
        }
        true
    }

    fn sync_joiners(&mut self, i: usize) -> Result<()> {
        let child_root = self
            .child_index(i)
            .and_then(|c| self.bubbles[c].content_box())
            .map(|r| r.center());
        if let Some(child_root) = child_root {
            if self.bubbles[i].update_joiner_tips(child_root) {
                self.draw(i);
                self.persist(i)?;
            }
        }

        let root = self.bubbles[i].content_box().map(|r| r.center());
        if let (Some(p), Some(root)) = (self.parent_index(i), root) {
            if self.bubbles[p].update_joiner_tips(root) {
                self.draw(p);
                self.persist(p)?;
            }
        }
        Ok(())
    }

    /// Apply the host's pending change notifications. Every change is handled
    /// even when one fails; the first failure is returned.
    pub fn handle_changes(&mut self) -> Result<()> {
        let mut first_error = None;
        for region in self.host.take_changes() {
            if let Err(err) = self.apply_change(&region) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn apply_change(&mut self, region: &RegionId) -> Result<()> {
        let attribute = self.host.bubble_attribute(region);
        match (self.index.get(region).copied(), attribute) {
            (None, None) => {}
            (None, Some(attribute)) => {
                let spec = BubbleSpec::from_attribute(&attribute)?;
                debug!(%region, "bubble appeared");
                let i = self.insert(region.clone(), spec);
                self.refresh_bubble(i)?;
                self.show_handles(i);
            }
            (Some(i), None) => {
                debug!(%region, "bubble attribute removed");
                self.remove_at(i);
            }
            (Some(i), Some(attribute)) => {
                let spec = BubbleSpec::from_attribute(&attribute)?;
                self.bubbles[i].sync_tail_specs();
                if &spec != self.bubbles[i].spec() {
                    self.bubbles[i].set_spec(spec);
                }
                self.refresh_bubble(i)?;
            }
        }
        Ok(())
    }

    /// Retry regions whose layout was not ready. Each region gets up to the
    /// configured number of attempts. Returns how many are still waiting.
    pub fn tick(&mut self) -> Result<usize> {
        let limit = self.options.layout_retry_limit;
        let waiting = std::mem::take(&mut self.pending);
        let mut first_error = None;
        for mut entry in waiting {
            let Some(&i) = self.index.get(&entry.region) else {
                continue;
            };
            entry.attempts += 1;
            let status = match self.refresh_bubble(i) {
                Ok(status) => status,
                Err(err) => {
                    first_error.get_or_insert(err);
                    continue;
                }
            };
            match status {
                LayoutStatus::Ready { .. } => {
                    debug!(region = %entry.region, attempts = entry.attempts, "deferred layout ready");
                    self.show_handles(i);
                }
                LayoutStatus::Deferred if entry.attempts >= limit => {
                    debug!(region = %entry.region, "giving up on layout");
                    self.pending.retain(|p| p.region != entry.region);
                }
                LayoutStatus::Deferred => {
                    if let Some(p) = self.pending.iter_mut().find(|p| p.region == entry.region) {
                        p.attempts = entry.attempts;
                    }
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(self.pending.len()),
        }
    }

    fn show_handles(&mut self, i: usize) {
        if let Some(scene) = self.scene.as_mut() {
            self.bubbles[i].show_handles(scene, &self.options);
        }
    }

    // ------------------------------------------------------------------
    // Families and queries
    // ------------------------------------------------------------------

    fn family_key(bubble: &Bubble) -> (i32, usize) {
        (bubble.spec().order.unwrap_or(i32::MAX), bubble.discovery())
    }

    fn family_indices(&self, level: i32) -> Vec<usize> {
        let mut family: Vec<usize> = (0..self.bubbles.len())
            .filter(|&i| self.bubbles[i].level() == level)
            .collect();
        family.sort_by_key(|&i| Self::family_key(&self.bubbles[i]));
        family
    }

    fn parent_index(&self, i: usize) -> Option<usize> {
        let family = self.family_indices(self.bubbles[i].level());
        let at = family.iter().position(|&j| j == i)?;
        at.checked_sub(1).map(|p| family[p])
    }

    fn child_index(&self, i: usize) -> Option<usize> {
        let family = self.family_indices(self.bubbles[i].level());
        let at = family.iter().position(|&j| j == i)?;
        family.get(at + 1).copied()
    }

    /// Same-level bubbles in family order.
    pub fn family(&self, level: i32) -> Vec<&Bubble> {
        self.family_indices(level)
            .into_iter()
            .map(|i| &self.bubbles[i])
            .collect()
    }

    pub fn parent_of(&self, region: &RegionId) -> Result<Option<&Bubble>> {
        let i = self.lookup(region)?;
        Ok(self.parent_index(i).map(|p| &self.bubbles[p]))
    }

    pub fn child_of(&self, region: &RegionId) -> Result<Option<&Bubble>> {
        let i = self.lookup(region)?;
        Ok(self.child_index(i).map(|c| &self.bubbles[c]))
    }

    pub fn tails_of(&self, region: &RegionId) -> Result<&[Tail]> {
        Ok(self.bubbles[self.lookup(region)?].tails())
    }

    /// The topmost bubble whose drawing covers `p`.
    pub fn bubble_at(&self, p: DVec2) -> Option<&Bubble> {
        let tolerance = self.options.handle_hit_slop;
        self.bubbles
            .iter()
            .filter(|b| b.contains_point(self.scene.as_ref(), p, tolerance))
            .max_by_key(|b| (b.level(), Self::family_key(b)))
    }

    // ------------------------------------------------------------------
    // Spec changes
    // ------------------------------------------------------------------

    /// Merge `pattern` into the region's spec and redraw.
    pub fn set_bubble_spec(&mut self, region: &RegionId, pattern: &BubbleSpecPattern) -> Result<()> {
        let i = self.lookup(region)?;
        self.bubbles[i].sync_tail_specs();
        let previous = self.bubbles[i].spec().clone();
        let style = pattern.style.unwrap_or(previous.style);
        let defaults = BubbleSpec::default_for(
            style,
            previous.level,
            self.bubbles[i].content_box(),
            self.host.parent_size(),
        );
        let merged = BubbleSpec::merge(&previous, pattern, &defaults);
        self.bubbles[i].set_spec(merged);
        self.refresh_bubble(i)?;
        if previous.level != self.bubbles[i].level() {
            // the bubble left one family and joined another
            self.rejoin_level(previous.level)?;
        }
        Ok(())
    }

    fn rejoin_level(&mut self, level: i32) -> Result<()> {
        for i in self.family_indices(level) {
            self.sync_joiners(i)?;
        }
        Ok(())
    }

    /// Start a bubble of `style` on a region that has none, one level above
    /// every existing bubble. A region that already has a bubble just
    /// changes style.
    pub fn add_bubble(&mut self, region: &RegionId, style: Style) -> Result<()> {
        if self.index.contains_key(region) {
            return self.set_bubble_spec(region, &BubbleSpecPattern::style(style));
        }
        if !self.host.has_region(region) {
            return Err(ComicalError::UnknownRegion {
                region: region.clone(),
            });
        }
        let level = self.bubbles.iter().map(Bubble::level).max().unwrap_or(0) + 1;
        let content = self.host.content_box(region).filter(Rect::has_area);
        let spec = BubbleSpec::default_for(style, level, content, self.host.parent_size());
        let i = self.insert(region.clone(), spec);
        if content.is_none() && style.has_default_tail() {
            self.bubbles[i].await_style_default();
        }
        if self.refresh_bubble(i)? == LayoutStatus::Deferred {
            self.persist(i)?;
        }
        self.show_handles(i);
        Ok(())
    }

    /// Make `child` a continuation of `parent`: same look and level, no tail
    /// of its own, joined by a straight tail from the parent.
    pub fn initialize_child(&mut self, child: &RegionId, parent: &RegionId) -> Result<()> {
        let p = self.lookup(parent)?;
        if !self.host.has_region(child) {
            return Err(ComicalError::UnknownRegion {
                region: child.clone(),
            });
        }
        self.bubbles[p].sync_tail_specs();
        let parent_spec = self.bubbles[p].spec().clone();
        let child_spec = BubbleSpec {
            version: parent_spec.version.clone(),
            style: parent_spec.style,
            tails: Vec::new(),
            level: parent_spec.level,
            background_colors: parent_spec.background_colors.clone(),
            border_style: parent_spec.border_style.clone(),
            outer_border_color: parent_spec.outer_border_color.clone(),
            order: None,
        };

        let c = match self.index.get(child).copied() {
            Some(c) => {
                self.bubbles[c].set_spec(child_spec);
                c
            }
            None => self.insert(child.clone(), child_spec),
        };
        if self.refresh_bubble(c)? == LayoutStatus::Deferred {
            self.persist(c)?;
        }
        self.show_handles(c);

        let parent_root = self.bubbles[p].root();
        let child_root = self
            .bubbles[c]
            .content_box()
            .or_else(|| self.host.content_box(child))
            .map(|r| r.center())
            .unwrap_or(parent_root);
        if !self.bubbles[p].update_joiner_tips(child_root)
            && !self.bubbles[p].spec().tails.iter().any(|t| t.joiner)
        {
            let mid = Bubble::default_mid(parent_root, child_root, None, None);
            self.bubbles[p].add_tail(TailSpec::new(child_root, mid).with_joiner(true));
        }
        self.draw(p);
        self.persist(p)
    }

    // ------------------------------------------------------------------
    // Pointer input
    // ------------------------------------------------------------------

    fn handle_under(&self, p: DVec2) -> Option<(usize, usize, HandleKind)> {
        let scene = self.scene.as_ref()?;
        let id = scene.hit_test(LayerKind::Handles, p, self.options.handle_hit_slop)?;
        self.bubbles
            .iter()
            .enumerate()
            .find_map(|(b, bubble)| bubble.handle_at(id).map(|(t, kind)| (b, t, kind)))
    }

    /// Start dragging the handle under `p`, if there is one.
    pub fn pointer_down(&mut self, p: DVec2) -> bool {
        let Some((b, t, kind)) = self.handle_under(p) else {
            return false;
        };
        let region = self.bubbles[b].region().clone();
        let started = self.bubbles[b]
            .tail_mut(t)
            .is_some_and(|tail| tail.begin_drag(kind));
        if started {
            self.active = Some(ActiveDrag { region, tail: t });
        }
        started
    }

    /// Move the dragged control point to `p`, redraw its tail and persist.
    pub fn pointer_move(&mut self, p: DVec2) -> Result<DragOutcome> {
        let Some(active) = self.active.clone() else {
            return Ok(DragOutcome::Ignored);
        };
        let i = self.lookup(&active.region)?;
        let obstacles = self.obstacles(i);
        let parent_size = self.host.parent_size();
        let bubble = &mut self.bubbles[i];
        let Some(ctx) = bubble.tail_context(&self.options, obstacles, parent_size) else {
            return Ok(DragOutcome::Ignored);
        };
        let outcome = match bubble.tail_mut(active.tail) {
            Some(tail) => tail.drag_to(p, &ctx),
            None => DragOutcome::Ignored,
        };
        if outcome == DragOutcome::Moved {
            if let Some(scene) = self.scene.as_mut() {
                bubble.make_tail_shapes(active.tail, scene, &ctx);
            }
            bubble.persist(&mut self.host)?;
        }
        Ok(outcome)
    }

    /// Finish the current drag. Returns whether one was in progress.
    pub fn pointer_up(&mut self, _p: DVec2) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        let Some(&i) = self.index.get(&active.region) else {
            return false;
        };
        self.bubbles[i]
            .tail_mut(active.tail)
            .is_some_and(|tail| tail.end_drag())
    }

    /// Double-click on a midpoint handle turns auto-curve back on.
    pub fn double_click(&mut self, p: DVec2) -> Result<bool> {
        let Some((i, t, HandleKind::Mid)) = self.handle_under(p) else {
            return Ok(false);
        };
        let obstacles = self.obstacles(i);
        let parent_size = self.host.parent_size();
        let bubble = &mut self.bubbles[i];
        let Some(ctx) = bubble.tail_context(&self.options, obstacles, parent_size) else {
            return Ok(false);
        };
        let reset = bubble
            .tail_mut(t)
            .is_some_and(|tail| tail.reset_auto_curve(&ctx));
        if reset {
            if let Some(scene) = self.scene.as_mut() {
                bubble.make_tail_shapes(t, scene, &ctx);
            }
            bubble.persist(&mut self.host)?;
        }
        Ok(reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::tail::TailShape;

    fn host_with(regions: &[(&str, Rect)]) -> MemoryHost {
        let mut host = MemoryHost::with_parent_size(DVec2::new(800.0, 600.0));
        for (id, rect) in regions {
            host.add_region(*id, Some(*rect));
        }
        host
    }

    #[test]
    fn add_bubble_stacks_levels() {
        let host = host_with(&[
            ("a", Rect::new(100.0, 100.0, 80.0, 40.0)),
            ("b", Rect::new(300.0, 100.0, 80.0, 40.0)),
        ]);
        let mut comical = Comical::new(host);
        comical.add_bubble(&"a".into(), Style::Speech).unwrap();
        comical.add_bubble(&"b".into(), Style::Shout).unwrap();
        assert_eq!(comical.bubble(&"a".into()).unwrap().level(), 1);
        assert_eq!(comical.bubble(&"b".into()).unwrap().level(), 2);
        assert!(comical.host().bubble_attribute(&"b".into()).is_some());
    }

    #[test]
    fn unknown_region_is_an_error() {
        let mut comical = Comical::new(MemoryHost::new());
        let err = comical.add_bubble(&"ghost".into(), Style::Speech).unwrap_err();
        assert!(matches!(err, ComicalError::UnknownRegion { .. }));
        assert!(comical.tails_of(&"ghost".into()).is_err());
    }

    #[test]
    fn family_order_and_parents() {
        let host = host_with(&[
            ("a", Rect::new(0.0, 0.0, 50.0, 20.0)),
            ("b", Rect::new(100.0, 0.0, 50.0, 20.0)),
            ("c", Rect::new(200.0, 0.0, 50.0, 20.0)),
        ]);
        let mut comical = Comical::new(host);
        comical.add_bubble(&"a".into(), Style::Speech).unwrap();
        comical.initialize_child(&"b".into(), &"a".into()).unwrap();
        comical.initialize_child(&"c".into(), &"b".into()).unwrap();

        let b = comical.bubble(&"b".into()).unwrap();
        assert_eq!(b.level(), 1);
        assert!(b.spec().tails.iter().any(|t| t.joiner));
        assert_eq!(comical.parent_of(&"b".into()).unwrap().unwrap().region().as_str(), "a");
        assert_eq!(comical.child_of(&"b".into()).unwrap().unwrap().region().as_str(), "c");
        assert!(comical.parent_of(&"a".into()).unwrap().is_none());
        assert!(comical.child_of(&"c".into()).unwrap().is_none());
    }

    #[test]
    fn idle_until_pointer_down() {
        let host = host_with(&[("a", Rect::new(100.0, 100.0, 80.0, 40.0))]);
        let mut comical = Comical::new(host);
        comical.add_bubble(&"a".into(), Style::Speech).unwrap();
        comical.start_editing().unwrap();
        let writes = comical.host().attribute_writes();
        assert_eq!(comical.pointer_move(DVec2::new(5.0, 5.0)).unwrap(), DragOutcome::Ignored);
        assert!(!comical.pointer_up(DVec2::new(5.0, 5.0)));
        assert_eq!(comical.host().attribute_writes(), writes);
        let tail = &comical.tails_of(&"a".into()).unwrap()[0];
        assert!(tail.state().is_idle());
    }
}
