//! The seam between the bubble engine and whatever owns the content regions.
//!
//! A host knows where each wrapped region sits, stores the persisted bubble
//! attribute, and reports which regions changed. The engine writes attributes
//! through [`quietly`] so its own writes never come back as change
//! notifications.

use std::collections::HashMap;
use std::fmt;

use glam::DVec2;

use crate::types::Rect;

/// Identifies one wrapped content region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(String);

impl RegionId {
    pub fn new(id: impl Into<String>) -> Self {
        RegionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RegionId {
    fn from(id: &str) -> Self {
        RegionId::new(id)
    }
}

impl From<String> for RegionId {
    fn from(id: String) -> Self {
        RegionId(id)
    }
}

/// What the engine needs from the document that holds the content regions.
pub trait ContentHost {
    /// Regions that carry a bubble attribute, in document order.
    fn regions(&self) -> Vec<RegionId>;

    fn has_region(&self, region: &RegionId) -> bool;

    /// Box of the region in container coordinates. `None` (or a box without
    /// area) means the region has not been laid out yet.
    fn content_box(&self, region: &RegionId) -> Option<Rect>;

    /// Size of the container every region lives in, when known.
    fn parent_size(&self) -> Option<DVec2>;

    fn bubble_attribute(&self, region: &RegionId) -> Option<String>;

    fn set_bubble_attribute(&mut self, region: &RegionId, value: String);

    /// Stop recording changes until the matching [`resume_notifications`].
    ///
    /// [`resume_notifications`]: ContentHost::resume_notifications
    fn suspend_notifications(&mut self);

    fn resume_notifications(&mut self);

    /// Regions changed since the last call, each reported once.
    fn take_changes(&mut self) -> Vec<RegionId>;
}

/// Run `f` with change notifications suspended.
pub fn quietly<H, R>(host: &mut H, f: impl FnOnce(&mut H) -> R) -> R
where
    H: ContentHost + ?Sized,
{
    host.suspend_notifications();
    let result = f(host);
    host.resume_notifications();
    result
}

#[derive(Debug, Clone, Default)]
struct MemoryRegion {
    content: Option<Rect>,
    attribute: Option<String>,
}

/// A [`ContentHost`] kept entirely in memory, for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    order: Vec<RegionId>,
    regions: HashMap<RegionId, MemoryRegion>,
    parent_size: Option<DVec2>,
    suspended: u32,
    changes: Vec<RegionId>,
    writes: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent_size(size: DVec2) -> Self {
        MemoryHost {
            parent_size: Some(size),
            ..Default::default()
        }
    }

    /// Add a region with no bubble attribute. `None` models a region that
    /// exists but has not been laid out.
    pub fn add_region(&mut self, region: impl Into<RegionId>, content: Option<Rect>) -> RegionId {
        let region = region.into();
        if !self.regions.contains_key(&region) {
            self.order.push(region.clone());
        }
        self.regions.insert(
            region.clone(),
            MemoryRegion {
                content,
                attribute: None,
            },
        );
        region
    }

    /// Add a region that already carries a persisted bubble attribute.
    pub fn add_bubble_region(
        &mut self,
        region: impl Into<RegionId>,
        content: Option<Rect>,
        attribute: impl Into<String>,
    ) -> RegionId {
        let region = self.add_region(region, content);
        if let Some(state) = self.regions.get_mut(&region) {
            state.attribute = Some(attribute.into());
        }
        region
    }

    /// Move or resize a region, as a layout pass would.
    pub fn set_content_box(&mut self, region: &RegionId, content: Option<Rect>) {
        if let Some(state) = self.regions.get_mut(region) {
            state.content = content;
            self.record(region);
        }
    }

    pub fn remove_bubble_attribute(&mut self, region: &RegionId) {
        if let Some(state) = self.regions.get_mut(region) {
            state.attribute = None;
            self.record(region);
        }
    }

    /// Number of attribute writes, quiet or not.
    pub fn attribute_writes(&self) -> usize {
        self.writes
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended > 0
    }

    fn record(&mut self, region: &RegionId) {
        if self.suspended == 0 && !self.changes.contains(region) {
            self.changes.push(region.clone());
        }
    }
}

impl ContentHost for MemoryHost {
    fn regions(&self) -> Vec<RegionId> {
        self.order
            .iter()
            .filter(|r| self.regions.get(*r).is_some_and(|s| s.attribute.is_some()))
            .cloned()
            .collect()
    }

    fn has_region(&self, region: &RegionId) -> bool {
        self.regions.contains_key(region)
    }

    fn content_box(&self, region: &RegionId) -> Option<Rect> {
        self.regions.get(region).and_then(|s| s.content)
    }

    fn parent_size(&self) -> Option<DVec2> {
        self.parent_size
    }

    fn bubble_attribute(&self, region: &RegionId) -> Option<String> {
        self.regions.get(region).and_then(|s| s.attribute.clone())
    }

    fn set_bubble_attribute(&mut self, region: &RegionId, value: String) {
        if let Some(state) = self.regions.get_mut(region) {
            state.attribute = Some(value);
            self.writes += 1;
            self.record(region);
        }
    }

    fn suspend_notifications(&mut self) {
        self.suspended += 1;
    }

    fn resume_notifications(&mut self) {
        self.suspended = self.suspended.saturating_sub(1);
    }

    fn take_changes(&mut self) -> Vec<RegionId> {
        std::mem::take(&mut self.changes)
    }
}
