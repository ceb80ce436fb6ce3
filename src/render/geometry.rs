//! Geometry functions: three-point arcs, intersections and path shapes
//!
//! Everything here works in container pixels with y growing downward, so an
//! arc with a positive sweep turns clockwise on screen and maps directly onto
//! the SVG sweep flag.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec2;

use super::defaults;
use crate::types::{Rect, perpendicular};

/// A circular arc defined by its center, radius, start angle and signed sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularArc {
    pub center: DVec2,
    pub radius: f64,
    pub start_angle: f64,
    /// Signed sweep in radians, never more than a full turn.
    pub sweep: f64,
}

impl CircularArc {
    /// The unique arc that starts at `start`, passes through `mid` and ends at
    /// `end`. Returns None when the three points do not determine a usable circle.
    pub fn through(start: DVec2, mid: DVec2, end: DVec2) -> Option<Self> {
        let b = mid - start;
        let c = end - start;
        let d = 2.0 * b.perp_dot(c);
        if d.abs() < 1e-12 {
            return None;
        }
        let (b2, c2) = (b.length_squared(), c.length_squared());
        let center = start + DVec2::new(c.y * b2 - b.y * c2, b.x * c2 - c.x * b2) / d;
        let radius = (start - center).length();
        if !radius.is_finite() || !center.is_finite() {
            return None;
        }

        let angle = |p: DVec2| (p - center).y.atan2((p - center).x);
        let a0 = angle(start);
        let forward = (angle(end) - a0).rem_euclid(TAU);
        let to_mid = (angle(mid) - a0).rem_euclid(TAU);
        let sweep = if to_mid <= forward { forward } else { forward - TAU };

        Some(CircularArc {
            center,
            radius,
            start_angle: a0,
            sweep,
        })
    }

    /// Point at parameter `t` in `[0, 1]` along the sweep.
    pub fn point_at(&self, t: f64) -> DVec2 {
        let a = self.start_angle + self.sweep * t;
        self.center + DVec2::new(a.cos(), a.sin()) * self.radius
    }

    pub fn start(&self) -> DVec2 {
        self.point_at(0.0)
    }

    pub fn end(&self) -> DVec2 {
        self.point_at(1.0)
    }

    pub fn length(&self) -> f64 {
        self.radius * self.sweep.abs()
    }

    pub fn is_large(&self) -> bool {
        self.sweep.abs() > PI
    }

    /// Where `angle` falls along the sweep, if it lies on the arc at all.
    fn fraction_of_angle(&self, angle: f64) -> Option<f64> {
        if self.sweep == 0.0 {
            return None;
        }
        let f = if self.sweep > 0.0 {
            (angle - self.start_angle).rem_euclid(TAU) / self.sweep
        } else {
            (self.start_angle - angle).rem_euclid(TAU) / -self.sweep
        };
        if f <= 1.0 + 1e-9 {
            Some(f.min(1.0))
        } else {
            // Just below a full turn counts as the start point.
            let wrapped = TAU / self.sweep.abs() - f;
            (wrapped.abs() < 1e-9).then_some(0.0)
        }
    }

    /// Intersections with the segment `a..b`, as (arc fraction, point) pairs
    /// ordered along the arc.
    pub fn intersect_segment(&self, a: DVec2, b: DVec2) -> Vec<(f64, DVec2)> {
        let d = b - a;
        let f = a - self.center;
        let qa = d.dot(d);
        if qa == 0.0 {
            return Vec::new();
        }
        let qb = 2.0 * f.dot(d);
        let qc = f.dot(f) - self.radius * self.radius;
        let disc = qb * qb - 4.0 * qa * qc;
        if disc < 0.0 {
            return Vec::new();
        }
        let root = disc.sqrt();
        let mut ts = vec![(-qb - root) / (2.0 * qa)];
        if root > 0.0 {
            ts.push((-qb + root) / (2.0 * qa));
        }

        let mut hits: Vec<(f64, DVec2)> = ts
            .into_iter()
            .filter(|t| (-1e-9..=1.0 + 1e-9).contains(t))
            .filter_map(|t| {
                let p = a + d * t;
                let v = p - self.center;
                self.fraction_of_angle(v.y.atan2(v.x)).map(|frac| (frac, p))
            })
            .collect();
        hits.sort_by(|x, y| x.0.total_cmp(&y.0));
        hits
    }

    /// Number of chords needed to stay within `tolerance` of the true arc.
    fn chord_count(&self, tolerance: f64) -> usize {
        let step = if tolerance < self.radius {
            2.0 * (1.0 - tolerance / self.radius).acos()
        } else {
            FRAC_PI_2
        };
        if step <= 0.0 || !step.is_finite() {
            return 1;
        }
        ((self.sweep.abs() / step).ceil() as usize).clamp(1, 512)
    }

    fn scaled_about(&self, origin: DVec2, s: f64) -> Self {
        CircularArc {
            center: origin + (self.center - origin) * s,
            radius: self.radius * s,
            ..*self
        }
    }
}

/// One piece of a path outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Line { from: DVec2, to: DVec2 },
    Arc(CircularArc),
}

impl Segment {
    pub fn start(&self) -> DVec2 {
        match self {
            Segment::Line { from, .. } => *from,
            Segment::Arc(arc) => arc.start(),
        }
    }

    pub fn end(&self) -> DVec2 {
        match self {
            Segment::Line { to, .. } => *to,
            Segment::Arc(arc) => arc.end(),
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            Segment::Line { from, to } => from.distance(*to),
            Segment::Arc(arc) => arc.length(),
        }
    }

    /// Point at parameter `t` in `[0, 1]`; arcs are parameterized by angle,
    /// which is proportional to arc length.
    pub fn point_at(&self, t: f64) -> DVec2 {
        match self {
            Segment::Line { from, to } => from.lerp(*to, t),
            Segment::Arc(arc) => arc.point_at(t),
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Segment::Line { .. })
    }

    /// Intersections with the segment `a..b`, ordered along this segment.
    pub fn intersect_segment(&self, a: DVec2, b: DVec2) -> Vec<(f64, DVec2)> {
        match self {
            Segment::Line { from, to } => {
                let r = *to - *from;
                let s = b - a;
                let denom = r.perp_dot(s);
                if denom.abs() < 1e-12 {
                    return Vec::new();
                }
                let t = (a - *from).perp_dot(s) / denom;
                let u = (a - *from).perp_dot(r) / denom;
                let range = -1e-9..=1.0 + 1e-9;
                if range.contains(&t) && range.contains(&u) {
                    vec![(t.clamp(0.0, 1.0), *from + r * t)]
                } else {
                    Vec::new()
                }
            }
            Segment::Arc(arc) => arc.intersect_segment(a, b),
        }
    }

    /// Append the points of this segment (excluding its start) to `out`.
    fn flatten_into(&self, tolerance: f64, out: &mut Vec<DVec2>) {
        match self {
            Segment::Line { to, .. } => out.push(*to),
            Segment::Arc(arc) => {
                let n = arc.chord_count(tolerance);
                out.extend((1..=n).map(|i| arc.point_at(i as f64 / n as f64)));
            }
        }
    }

    fn scaled_about(&self, origin: DVec2, s: f64) -> Self {
        match self {
            Segment::Line { from, to } => Segment::Line {
                from: origin + (*from - origin) * s,
                to: origin + (*to - origin) * s,
            },
            Segment::Arc(arc) => Segment::Arc(arc.scaled_about(origin, s)),
        }
    }

    fn reversed(&self) -> Self {
        match self {
            Segment::Line { from, to } => Segment::Line { from: *to, to: *from },
            Segment::Arc(arc) => Segment::Arc(CircularArc {
                start_angle: arc.start_angle + arc.sweep,
                sweep: -arc.sweep,
                ..*arc
            }),
        }
    }
}

/// True when `mid` lies on the line through `start` and `end` (on either side
/// of `start`), or when any of the defining vectors has zero length.
pub fn is_collinear(start: DVec2, mid: DVec2, end: DVec2) -> bool {
    let to_mid = mid - start;
    let to_end = end - start;
    if to_mid.length_squared() == 0.0 || to_end.length_squared() == 0.0 {
        return true;
    }
    let angle = to_mid.perp_dot(to_end).atan2(to_mid.dot(to_end)).abs().to_degrees();
    angle < defaults::ARC_EPSILON_DEGREES || 180.0 - angle < defaults::ARC_EPSILON_DEGREES
}

/// A curve from `start` through `mid` to `end`.
///
/// Three collinear points make the circle undefined or numerically unstable, so
/// they produce a straight line from `start` to `end` instead.
pub fn make_arc(start: DVec2, mid: DVec2, end: DVec2) -> Segment {
    if is_collinear(start, mid, end) {
        return Segment::Line { from: start, to: end };
    }
    match CircularArc::through(start, mid, end) {
        Some(arc) => Segment::Arc(arc),
        None => Segment::Line { from: start, to: end },
    }
}

/// The perpendicular bisector of `a..b`, extended `reach` to either side of the
/// midpoint.
pub fn perpendicular_bisector(a: DVec2, b: DVec2, reach: f64) -> (DVec2, DVec2) {
    let mid = (a + b) * 0.5;
    let dir = perpendicular(b - a).normalize_or_zero();
    (mid - dir * reach, mid + dir * reach)
}

/// A sequence of segments, optionally closed back to its start.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathShape {
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl PathShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segment(segment: Segment) -> Self {
        PathShape {
            segments: vec![segment],
            closed: false,
        }
    }

    /// Closed polygon through `points`.
    pub fn polygon(points: &[DVec2]) -> Self {
        let segments = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(from, to)| Segment::Line { from: *from, to: *to })
            .collect();
        PathShape {
            segments,
            closed: true,
        }
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Append another path's segments, reversing them when `reverse` is set.
    pub fn extend_from(&mut self, other: &PathShape, reverse: bool) {
        if reverse {
            self.segments
                .extend(other.segments.iter().rev().map(Segment::reversed));
        } else {
            self.segments.extend(other.segments.iter().copied());
        }
    }

    pub fn close(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn start(&self) -> Option<DVec2> {
        self.segments.first().map(Segment::start)
    }

    pub fn end(&self) -> Option<DVec2> {
        self.segments.last().map(Segment::end)
    }

    pub fn length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    /// Point `distance` along the path, clamped to its ends.
    pub fn point_at_length(&self, distance: f64) -> Option<DVec2> {
        let mut remaining = distance.max(0.0);
        for seg in &self.segments {
            let len = seg.length();
            if remaining <= len {
                let t = if len > 0.0 { remaining / len } else { 0.0 };
                return Some(seg.point_at(t));
            }
            remaining -= len;
        }
        self.end()
    }

    /// Intersections with the segment `a..b`, ordered along the path.
    pub fn intersections(&self, a: DVec2, b: DVec2) -> Vec<DVec2> {
        self.segments
            .iter()
            .flat_map(|seg| seg.intersect_segment(a, b).into_iter().map(|(_, p)| p))
            .collect()
    }

    pub fn flatten(&self, tolerance: f64) -> Vec<DVec2> {
        let mut out = Vec::new();
        let mut cursor: Option<DVec2> = None;
        for seg in &self.segments {
            let start = seg.start();
            if cursor.is_none_or(|c| c.distance_squared(start) > 1e-18) {
                out.push(start);
            }
            seg.flatten_into(tolerance, &mut out);
            cursor = Some(seg.end());
        }
        out
    }

    pub fn bounds(&self) -> Rect {
        let mut r = Rect::empty();
        for p in self.flatten(defaults::FLATTEN_TOLERANCE) {
            r.expand_point(p);
        }
        r
    }

    /// Even-odd fill test; open paths have no interior.
    pub fn contains(&self, p: DVec2) -> bool {
        self.closed && polygon_contains(&self.flatten(defaults::FLATTEN_TOLERANCE), p)
    }

    pub fn distance_to(&self, p: DVec2) -> f64 {
        let mut points = self.flatten(defaults::FLATTEN_TOLERANCE);
        if self.closed {
            if let Some(first) = points.first().copied() {
                points.push(first);
            }
        }
        polyline_distance(&points, p)
    }

    pub fn scaled_about(&self, origin: DVec2, s: f64) -> Self {
        PathShape {
            segments: self
                .segments
                .iter()
                .map(|seg| seg.scaled_about(origin, s))
                .collect(),
            closed: self.closed,
        }
    }
}

fn polygon_contains(points: &[DVec2], p: DVec2) -> bool {
    let mut inside = false;
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn polyline_distance(points: &[DVec2], p: DVec2) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => only.distance(p),
        _ => points
            .windows(2)
            .map(|w| point_segment_distance(p, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

pub fn point_segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Anything the scene can draw and hit-test.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Path(PathShape),
    Ellipse { center: DVec2, radii: DVec2 },
}

impl Shape {
    pub fn circle(center: DVec2, radius: f64) -> Self {
        Shape::Ellipse {
            center,
            radii: DVec2::splat(radius),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Path(path) => path.bounds(),
            Shape::Ellipse { center, radii } => Rect {
                min: *center - *radii,
                max: *center + *radii,
            },
        }
    }

    /// Whether `p` is inside the filled area.
    pub fn contains(&self, p: DVec2) -> bool {
        match self {
            Shape::Path(path) => path.contains(p),
            Shape::Ellipse { center, radii } => {
                if radii.x <= 0.0 || radii.y <= 0.0 {
                    return false;
                }
                ((p - *center) / *radii).length_squared() <= 1.0
            }
        }
    }

    /// Filled-area test widened by `tolerance` around the outline, so thin
    /// stroke-only shapes can still be picked.
    pub fn hit(&self, p: DVec2, tolerance: f64) -> bool {
        self.contains(p) || self.outline_distance(p) <= tolerance
    }

    pub fn outline_distance(&self, p: DVec2) -> f64 {
        match self {
            Shape::Path(path) => path.distance_to(p),
            Shape::Ellipse { .. } => {
                let mut points = self.outline_points(64);
                points.push(points[0]);
                polyline_distance(&points, p)
            }
        }
    }

    fn outline_points(&self, n: usize) -> Vec<DVec2> {
        match self {
            Shape::Path(path) => path.flatten(defaults::FLATTEN_TOLERANCE),
            Shape::Ellipse { center, radii } => (0..n)
                .map(|i| {
                    let a = TAU * i as f64 / n as f64;
                    *center + DVec2::new(a.cos(), a.sin()) * *radii
                })
                .collect(),
        }
    }

    /// A copy shrunk by `amount` toward its center. Paths shrink uniformly so
    /// their arcs stay circular.
    pub fn inset(&self, amount: f64) -> Shape {
        match self {
            Shape::Ellipse { center, radii } => Shape::Ellipse {
                center: *center,
                radii: (*radii - DVec2::splat(amount)).max(DVec2::ZERO),
            },
            Shape::Path(path) => {
                let b = path.bounds();
                let extent = b.width().min(b.height());
                if b.is_empty() || extent <= 0.0 {
                    return self.clone();
                }
                let s = ((extent - 2.0 * amount) / extent).max(0.0);
                Shape::Path(path.scaled_about(b.center(), s))
            }
        }
    }
}
