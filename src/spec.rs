//! Persisted bubble descriptions.
//!
//! A [`BubbleSpec`] is stored as JSON in a single attribute on the wrapped
//! content element, with every `"` written as a backtick so it can sit inside
//! an HTML attribute. Specs are values: every change builds a new spec and
//! replaces the old one whole.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bubble::Bubble;
use crate::errors::{ComicalError, Result};
use crate::log::warn;
use crate::types::Rect;

/// Format tag written into every spec.
pub const SPEC_VERSION: &str = "1.0";

/// Selects the outline generator for a bubble body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// No body; tails are still drawn.
    #[default]
    None,
    Speech,
    Shout,
    Ellipse,
    Caption,
    Thought,
}

impl Style {
    pub const ALL: [Style; 6] = [
        Style::None,
        Style::Speech,
        Style::Shout,
        Style::Ellipse,
        Style::Caption,
        Style::Thought,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Style::None => "none",
            Style::Speech => "speech",
            Style::Shout => "shout",
            Style::Ellipse => "ellipse",
            Style::Caption => "caption",
            Style::Thought => "thought",
        }
    }

    /// Whether a freshly created bubble of this style starts with a tail.
    pub fn has_default_tail(self) -> bool {
        !matches!(self, Style::None | Style::Caption)
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = ComicalError;

    fn from_str(s: &str) -> Result<Self> {
        Style::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| ComicalError::UnknownStyle {
                style: s.to_string(),
            })
    }
}

impl Serialize for Style {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Persisted tags written by newer versions must still load, so an unknown
/// style in stored data reads as a speech bubble.
impl<'de> Deserialize<'de> for Style {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(tag.parse().unwrap_or_else(|_| {
            warn!(style = %tag, "unknown bubble style, drawing as speech");
            Style::Speech
        }))
    }
}

/// One tail of a bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailSpec {
    pub tip_x: f64,
    pub tip_y: f64,
    pub midpoint_x: f64,
    pub midpoint_y: f64,
    /// The midpoint follows `Bubble::default_mid` instead of a user drag.
    #[serde(default, skip_serializing_if = "is_false")]
    pub auto_curve: bool,
    /// The tip tracks the root of this bubble's child.
    #[serde(default, skip_serializing_if = "is_false")]
    pub joiner: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl TailSpec {
    pub fn new(tip: DVec2, mid: DVec2) -> Self {
        TailSpec {
            tip_x: tip.x,
            tip_y: tip.y,
            midpoint_x: mid.x,
            midpoint_y: mid.y,
            auto_curve: false,
            joiner: false,
        }
    }

    pub fn tip(&self) -> DVec2 {
        DVec2::new(self.tip_x, self.tip_y)
    }

    pub fn mid(&self) -> DVec2 {
        DVec2::new(self.midpoint_x, self.midpoint_y)
    }

    pub fn with_tip(&self, tip: DVec2) -> Self {
        TailSpec {
            tip_x: tip.x,
            tip_y: tip.y,
            ..self.clone()
        }
    }

    pub fn with_mid(&self, mid: DVec2) -> Self {
        TailSpec {
            midpoint_x: mid.x,
            midpoint_y: mid.y,
            ..self.clone()
        }
    }

    pub fn with_auto_curve(&self, auto_curve: bool) -> Self {
        TailSpec {
            auto_curve,
            ..self.clone()
        }
    }

    pub fn with_joiner(&self, joiner: bool) -> Self {
        TailSpec {
            joiner,
            ..self.clone()
        }
    }

    fn is_finite(&self) -> bool {
        self.tip().is_finite() && self.mid().is_finite()
    }
}

/// The full persisted description of one bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleSpec {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub style: Style,
    /// Render order, not priority.
    #[serde(default)]
    pub tails: Vec<TailSpec>,
    /// Bubbles sharing a level are drawn as one merged outline.
    #[serde(default = "default_level")]
    pub level: i32,
    /// One color fills solid, several make a top-to-bottom gradient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_border_color: Option<String>,
    /// Explicit stacking within a level; never inherited by children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

fn default_version() -> String {
    SPEC_VERSION.to_string()
}

fn default_level() -> i32 {
    1
}

impl Default for BubbleSpec {
    fn default() -> Self {
        BubbleSpec {
            version: default_version(),
            style: Style::None,
            tails: Vec::new(),
            level: default_level(),
            background_colors: None,
            border_style: None,
            outer_border_color: None,
            order: None,
        }
    }
}

/// A partial update; every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BubbleSpecPattern {
    pub version: Option<String>,
    pub style: Option<Style>,
    pub tails: Option<Vec<TailSpec>>,
    pub level: Option<i32>,
    pub background_colors: Option<Vec<String>>,
    pub border_style: Option<String>,
    pub outer_border_color: Option<String>,
    pub order: Option<i32>,
}

impl BubbleSpecPattern {
    pub fn style(style: Style) -> Self {
        BubbleSpecPattern {
            style: Some(style),
            ..Default::default()
        }
    }
}

impl BubbleSpec {
    /// The default spec for `style`. Styles that carry a tail get one placed
    /// below-left of `content`, when the content box is known.
    pub fn default_for(
        style: Style,
        level: i32,
        content: Option<Rect>,
        parent_size: Option<DVec2>,
    ) -> Self {
        let tails = match content {
            Some(content) if style.has_default_tail() => vec![default_tail(content, parent_size)],
            _ => Vec::new(),
        };
        BubbleSpec {
            style,
            tails,
            level,
            ..Default::default()
        }
    }

    /// Three-way merge: `pattern` wins over `previous`, which wins over
    /// `defaults`. An empty previous tail list does not count, so a bubble
    /// gaining its first tail gets the default placement.
    pub fn merge(previous: &BubbleSpec, pattern: &BubbleSpecPattern, defaults: &BubbleSpec) -> Self {
        let tails = match &pattern.tails {
            Some(tails) => tails.clone(),
            None if !previous.tails.is_empty() => previous.tails.clone(),
            None => defaults.tails.clone(),
        };
        BubbleSpec {
            version: pattern
                .version
                .clone()
                .or_else(|| Some(previous.version.clone()))
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| defaults.version.clone()),
            style: pattern.style.unwrap_or(previous.style),
            tails,
            level: pattern.level.unwrap_or(previous.level),
            background_colors: pattern
                .background_colors
                .clone()
                .or_else(|| previous.background_colors.clone())
                .or_else(|| defaults.background_colors.clone()),
            border_style: pattern
                .border_style
                .clone()
                .or_else(|| previous.border_style.clone())
                .or_else(|| defaults.border_style.clone()),
            outer_border_color: pattern
                .outer_border_color
                .clone()
                .or_else(|| previous.outer_border_color.clone())
                .or_else(|| defaults.outer_border_color.clone()),
            order: pattern.order.or(previous.order).or(defaults.order),
        }
    }

    pub fn with_tails(&self, tails: Vec<TailSpec>) -> Self {
        BubbleSpec {
            tails,
            ..self.clone()
        }
    }

    pub fn with_style(&self, style: Style) -> Self {
        BubbleSpec {
            style,
            ..self.clone()
        }
    }

    /// Check the invariants a persisted spec must hold.
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(ComicalError::InvalidSpec {
                reason: "version is empty".to_string(),
            });
        }
        if let Some(i) = self.tails.iter().position(|t| !t.is_finite()) {
            return Err(ComicalError::InvalidSpec {
                reason: format!("tail {i} has a non-finite coordinate"),
            });
        }
        if self.background_colors.as_ref().is_some_and(Vec::is_empty) {
            return Err(ComicalError::InvalidSpec {
                reason: "backgroundColors is present but empty".to_string(),
            });
        }
        Ok(())
    }

    /// Bring a spec read from stored data back inside the invariants that
    /// [`validate`](BubbleSpec::validate) checks, dropping what cannot be
    /// drawn.
    pub fn repaired(mut self) -> Self {
        if self.version.is_empty() {
            warn!("stored bubble spec has no version");
            self.version = default_version();
        }
        let before = self.tails.len();
        self.tails.retain(TailSpec::is_finite);
        if self.tails.len() != before {
            warn!(dropped = before - self.tails.len(), "dropping tails with non-finite coordinates");
        }
        if self.background_colors.as_ref().is_some_and(Vec::is_empty) {
            warn!("empty backgroundColors, using the default fill");
            self.background_colors = None;
        }
        self
    }

    /// Serialize for the content element's attribute.
    pub fn to_attribute(&self) -> Result<String> {
        let json = serde_json::to_string(self).map_err(|e| ComicalError::InvalidSpec {
            reason: e.to_string(),
        })?;
        Ok(json.replace('"', "`"))
    }

    /// Parse an attribute written by [`BubbleSpec::to_attribute`]. Only
    /// unparseable text is an error; values that break an invariant are
    /// [`repaired`](BubbleSpec::repaired).
    pub fn from_attribute(attribute: &str) -> Result<Self> {
        let json = attribute.replace('`', "\"");
        serde_json::from_str::<BubbleSpec>(&json)
            .map(BubbleSpec::repaired)
            .map_err(|e| ComicalError::malformed(&json, &e))
    }
}

/// A tail pointing below-left of the content, clear of any body outline.
pub fn default_tail(content: Rect, parent_size: Option<DVec2>) -> TailSpec {
    let root = content.center();
    let mut tip = DVec2::new(
        content.min.x - content.width() * 0.1,
        content.max.y + content.height() * 0.75 + 20.0,
    );
    if let Some(parent) = parent_size {
        tip = tip.clamp(DVec2::ZERO, parent.max(DVec2::ZERO));
    }
    let mid = Bubble::default_mid(root, tip, Some(content.size()), parent_size);
    TailSpec::new(tip, mid).with_auto_curve(true)
}
