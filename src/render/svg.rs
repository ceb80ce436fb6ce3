//! SVG generation
//!
//! Turns the lower and upper scene layers into a standalone static image.
//! Handles are interactive only and never exported unless asked for.

use std::fmt::Write;

use super::geometry::{PathShape, Segment, Shape};
use super::scene::{ItemStyle, LayerKind, Paint, Scene, SceneItem};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Render the scene as an SVG document.
pub fn export_svg(scene: &Scene, include_handles: bool) -> String {
    let bounds = scene.bounds(include_handles);
    let (x, y, w, h) = if bounds.is_empty() {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (bounds.min.x, bounds.min.y, bounds.width(), bounds.height())
    };

    let mut defs = String::new();
    let mut body = String::new();
    let mut gradients = 0usize;

    for (kind, z, items) in scene.paint_runs(include_handles) {
        if kind == LayerKind::Handles {
            let _ = writeln!(body, "<g class=\"{}\">", kind.class_name());
        } else {
            let _ = writeln!(body, "<g class=\"{}\" data-level=\"{z}\">", kind.class_name());
        }
        for item in items {
            let fill = match &item.style.fill {
                Paint::VerticalGradient(colors) => {
                    gradients += 1;
                    let id = format!("comical-gradient-{gradients}");
                    write_gradient(&mut defs, &id, colors);
                    format!("url(#{id})")
                }
                Paint::Solid(color) => escape_attr(color),
                Paint::None => "none".to_string(),
            };
            write_item(&mut body, item, &fill);
        }
        body.push_str("</g>\n");
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "<svg xmlns=\"{SVG_NS}\" width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\">",
        fmt_num(w),
        fmt_num(h),
        fmt_num(x),
        fmt_num(y),
        fmt_num(w),
        fmt_num(h)
    );
    if !defs.is_empty() {
        let _ = write!(out, "<defs>\n{defs}</defs>\n");
    }
    out.push_str(&body);
    out.push_str("</svg>\n");
    out
}

fn write_gradient(defs: &mut String, id: &str, colors: &[String]) {
    let _ = writeln!(defs, "<linearGradient id=\"{id}\" x1=\"0\" y1=\"0\" x2=\"0\" y2=\"1\">");
    let last = (colors.len().max(2) - 1) as f64;
    for (i, color) in colors.iter().enumerate() {
        let _ = writeln!(
            defs,
            "<stop offset=\"{}\" stop-color=\"{}\"/>",
            fmt_num(i as f64 / last),
            escape_attr(color)
        );
    }
    defs.push_str("</linearGradient>\n");
}

fn write_item(out: &mut String, item: &SceneItem, fill: &str) {
    let style = style_attr(&item.style, fill);
    match &item.shape {
        Shape::Ellipse { center, radii } => {
            let _ = writeln!(
                out,
                "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" style=\"{style}\"/>",
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(radii.x),
                fmt_num(radii.y)
            );
        }
        Shape::Path(path) => {
            let _ = writeln!(out, "<path d=\"{}\" style=\"{style}\"/>", path_data(path));
        }
    }
}

fn style_attr(style: &ItemStyle, fill: &str) -> String {
    let mut s = format!("fill:{fill};");
    match &style.stroke {
        Some(stroke) => {
            let _ = write!(
                s,
                "stroke:{};stroke-width:{};",
                escape_attr(stroke),
                fmt_num(style.stroke_width)
            );
            if style.dashed {
                let _ = write!(s, "stroke-dasharray:{};", fmt_num(style.stroke_width * 4.0));
            }
        }
        None => s.push_str("stroke:none;"),
    }
    s
}

/// SVG path data for a path shape.
pub fn path_data(path: &PathShape) -> String {
    let mut d = String::new();
    let mut cursor = None;
    for seg in &path.segments {
        let start = seg.start();
        match cursor {
            None => {
                let _ = write!(d, "M{},{}", fmt_num(start.x), fmt_num(start.y));
            }
            Some(c) if start.distance(c) > 1e-6 => {
                let _ = write!(d, "L{},{}", fmt_num(start.x), fmt_num(start.y));
            }
            Some(_) => {}
        }
        match seg {
            Segment::Line { to, .. } => {
                let _ = write!(d, "L{},{}", fmt_num(to.x), fmt_num(to.y));
            }
            Segment::Arc(arc) => {
                let end = arc.end();
                let _ = write!(
                    d,
                    "A{},{} 0 {} {} {},{}",
                    fmt_num(arc.radius),
                    fmt_num(arc.radius),
                    u8::from(arc.is_large()),
                    u8::from(arc.sweep > 0.0),
                    fmt_num(end.x),
                    fmt_num(end.y)
                );
            }
        }
        cursor = Some(seg.end());
    }
    if path.closed && !d.is_empty() {
        d.push('Z');
    }
    d
}

/// Escape text for use inside a double-quoted attribute.
fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            ';' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Format a number with 6 significant figures, trailing zeros trimmed.
pub(crate) fn fmt_num(value: f64) -> String {
    fmt_num_precision(value, 6)
}

/// Format a number with specified significant figures, trailing zeros trimmed.
fn fmt_num_precision(value: f64, sig_figs: i32) -> String {
    // trig round-off like sin(2π) must not print as a tiny exponent
    if value.abs() < 1e-9 || !value.is_finite() {
        return "0".to_string();
    }

    // Round to specified significant figures
    let abs_val = value.abs();
    let magnitude = abs_val.log10().floor() as i32;
    let scale = 10_f64.powi(sig_figs - 1 - magnitude);
    let rounded = (value * scale).round() / scale;

    // Format with enough decimal places, then trim
    let decimals = (sig_figs - 1 - magnitude).max(0) as usize;
    let s = format!("{:.prec$}", rounded, prec = decimals);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        &s
    };
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::geometry::make_arc;
    use glam::DVec2;

    #[test]
    fn fmt_num_trims() {
        assert_eq!(fmt_num(0.0), "0");
        assert_eq!(fmt_num(1.5), "1.5");
        assert_eq!(fmt_num(120.0), "120");
        assert_eq!(fmt_num(-0.0000001), "-0.0000001");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333333");
    }

    #[test]
    fn fmt_num_keeps_integer_zeros() {
        // trimming must not eat the zeros of an integer
        assert_eq!(fmt_num(100.0), "100");
        assert_eq!(fmt_num(2000.0), "2000");
    }

    #[test]
    fn line_path_data() {
        let path = PathShape::polygon(&[DVec2::new(0.0, 0.0), DVec2::new(10.0, 0.0), DVec2::new(0.0, 5.0)]);
        assert_eq!(path_data(&path), "M0,0L10,0L0,5L0,0Z");
    }

    #[test]
    fn arc_path_data_uses_sweep_flag() {
        let path = PathShape::from_segment(make_arc(
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, -1.0),
            DVec2::new(2.0, 0.0),
        ));
        assert_eq!(path_data(&path), "M0,0A1,1 0 0 1 2,0");
    }

    #[test]
    fn export_skips_handles() {
        let mut scene = Scene::new();
        scene.insert(
            LayerKind::Lower,
            0,
            Shape::circle(DVec2::new(10.0, 10.0), 5.0),
            ItemStyle::stroked("black", 1.0).with_fill(Paint::Solid("white".into())),
        );
        scene.insert(
            LayerKind::Handles,
            0,
            Shape::circle(DVec2::new(100.0, 10.0), 5.0),
            ItemStyle::filled(Paint::Solid("blue".into())),
        );
        let svg = export_svg(&scene, false);
        assert!(svg.contains("comical-lower"));
        assert!(!svg.contains("comical-handles"));
        assert!(svg.contains("fill:white;stroke:black;stroke-width:1;"));
        assert!(export_svg(&scene, true).contains("comical-handles"));
    }

    #[test]
    fn gradient_fill_goes_to_defs() {
        let mut scene = Scene::new();
        scene.insert(
            LayerKind::Upper,
            0,
            Shape::circle(DVec2::ZERO, 5.0),
            ItemStyle::filled(Paint::VerticalGradient(vec!["red".into(), "blue".into()])),
        );
        let svg = export_svg(&scene, false);
        assert!(svg.contains("<linearGradient id=\"comical-gradient-1\""));
        assert!(svg.contains("<stop offset=\"1\" stop-color=\"blue\"/>"));
        assert!(svg.contains("fill:url(#comical-gradient-1);"));
    }

    #[test]
    fn attr_escaping() {
        assert_eq!(escape_attr("a\"<b>&;"), "a&quot;&lt;b&gt;&amp;");
    }
}
