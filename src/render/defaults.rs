//! Default sizes and settings (all in container pixels)

/// Base width of arc and straight tails at the root.
pub const TAIL_WIDTH: f64 = 12.0;
/// Stroke width of single-line tails.
pub const LINE_TAIL_WIDTH: f64 = 1.0;
pub const OUTLINE_STROKE_WIDTH: f64 = 1.5;
/// How far the seam-hiding fill sits inside the outline.
pub const FILL_INSET: f64 = 1.5;

pub const THOUGHT_TIP_RADIUS: f64 = 7.0;
pub const THOUGHT_ROOT_RADIUS: f64 = 20.0;
pub const THOUGHT_START_SEPARATION: f64 = 2.0;
pub const THOUGHT_SEPARATION_GROWTH: f64 = 2.0;
/// Vertical radius of a mini-bubble relative to its horizontal radius.
pub const THOUGHT_ASPECT: f64 = 0.8;
/// Hard cap on mini-bubbles, independent of arc length.
pub const THOUGHT_MAX_BUBBLES: usize = 64;

pub const HANDLE_RADIUS: f64 = 5.0;
pub const HANDLE_HIT_SLOP: f64 = 3.0;

pub const BACKGROUND: &str = "white";
pub const BORDER: &str = "black";
pub const AUTO_HANDLE_FILL: &str = "rgba(0,0,255,0.25)";
pub const MANUAL_HANDLE_FILL: &str = "rgb(0,0,255)";
pub const HANDLE_STROKE: &str = "rgb(0,0,160)";

pub const LAYOUT_RETRY_LIMIT: u32 = 20;

/// Collinearity tolerance for three-point arcs, in degrees.
pub const ARC_EPSILON_DEGREES: f64 = 1e-4;
/// Maximum chord error when flattening arcs for hit-testing.
pub const FLATTEN_TOLERANCE: f64 = 0.25;
