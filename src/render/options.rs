//! Rendering options
//!
//! Every field has a default from [`defaults`](super::defaults), so hosts can
//! override only what they care about:
//!
//! ```
//! let options = comical::RenderOptions::from_json(r#"{"tailWidth": 18}"#).unwrap();
//! assert_eq!(options.tail_width, 18.0);
//! assert_eq!(options.thought_tip_radius, 7.0);
//! ```

use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    pub tail_width: f64,
    pub line_tail_width: f64,
    pub outline_stroke_width: f64,
    pub fill_inset: f64,
    pub thought_tip_radius: f64,
    pub thought_root_radius: f64,
    pub thought_start_separation: f64,
    pub thought_separation_growth: f64,
    pub thought_aspect: f64,
    pub handle_radius: f64,
    pub handle_hit_slop: f64,
    pub background: String,
    pub border: String,
    pub auto_handle_fill: String,
    pub manual_handle_fill: String,
    pub handle_stroke: String,
    pub layout_retry_limit: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            tail_width: defaults::TAIL_WIDTH,
            line_tail_width: defaults::LINE_TAIL_WIDTH,
            outline_stroke_width: defaults::OUTLINE_STROKE_WIDTH,
            fill_inset: defaults::FILL_INSET,
            thought_tip_radius: defaults::THOUGHT_TIP_RADIUS,
            thought_root_radius: defaults::THOUGHT_ROOT_RADIUS,
            thought_start_separation: defaults::THOUGHT_START_SEPARATION,
            thought_separation_growth: defaults::THOUGHT_SEPARATION_GROWTH,
            thought_aspect: defaults::THOUGHT_ASPECT,
            handle_radius: defaults::HANDLE_RADIUS,
            handle_hit_slop: defaults::HANDLE_HIT_SLOP,
            background: defaults::BACKGROUND.to_string(),
            border: defaults::BORDER.to_string(),
            auto_handle_fill: defaults::AUTO_HANDLE_FILL.to_string(),
            manual_handle_fill: defaults::MANUAL_HANDLE_FILL.to_string(),
            handle_stroke: defaults::HANDLE_STROKE.to_string(),
            layout_retry_limit: defaults::LAYOUT_RETRY_LIMIT,
        }
    }
}

impl RenderOptions {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_override_is_default() {
        assert_eq!(RenderOptions::from_json("{}").unwrap(), RenderOptions::default());
    }

    #[test]
    fn partial_override() {
        let opts = RenderOptions::from_json(r#"{"thoughtRootRadius": 30, "border": "red"}"#).unwrap();
        assert_eq!(opts.thought_root_radius, 30.0);
        assert_eq!(opts.border, "red");
        assert_eq!(opts.tail_width, defaults::TAIL_WIDTH);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(RenderOptions::from_json(r#"{"tailWidth": "wide"}"#).is_err());
    }
}
