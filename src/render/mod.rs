//! Rendering for bubbles and tails
//!
//! This module is organized into submodules:
//! - `defaults`: Default sizes and settings
//! - `options`: `RenderOptions`, the host-tunable configuration
//! - `geometry`: Three-point arcs, intersections and path shapes
//! - `scene`: The lower/upper/handle layer scene graph
//! - `svg`: Static SVG export

pub mod defaults;
pub mod geometry;
pub mod options;
pub mod scene;
pub mod svg;

pub use geometry::{CircularArc, PathShape, Segment, Shape, make_arc};
pub use options::RenderOptions;
pub use scene::{ItemId, ItemStyle, LayerKind, Paint, Scene, SceneItem};
pub use svg::export_svg;
