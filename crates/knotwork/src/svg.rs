//! SVG export and import.
//!
//! Export draws every thread as a filled ribbon band, under-runs first and
//! over-runs on top, so crossings read correctly without any depth buffer.
//! Optional extras are the exact centreline of each thread and an overlay of
//! the stroke graph.
//!
//! Import goes the other way for stroke graphs: `<line>`, `<polyline>` and
//! `<path>` elements become strokes. The stroke type comes from a
//! `data-stroke` attribute on the element or an enclosing `<g>`.

use std::fmt::Write;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use svgtypes::{PointsParser, SimplePathSegment, SimplifyingPathParser};

use crate::art::{Art, Thread};
use crate::error::KnotError;
use crate::geometry::{Stroke, StrokeType, Vec2};
use crate::ribbon::{ribbons, RibbonConfig};
use crate::spline::Spline;

/// Default ribbon colours, cycled per thread.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#c0392b", "#2e86c1", "#239b56", "#d68910", "#7d3c98", "#17a589", "#ba4a00", "#5d6d7e",
];

/// How an [`Art`] is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgStyle {
    /// Output pixels per knot unit
    pub scale: f64,
    /// Margin around the knot, in knot units
    pub padding: f64,
    pub background: Option<String>,
    /// Ribbon fill colours, one per thread, cycled
    pub palette: Vec<String>,
    /// Ribbon edge colour; `None` draws no edge
    pub outline: Option<String>,
    /// Ribbon edge width in knot units
    pub outline_width: f64,
    pub ribbon: RibbonConfig,
    /// Draw each thread's centreline as a cubic Bézier path
    pub centreline: bool,
    /// Draw the input stroke graph on top
    pub show_strokes: bool,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            scale: 600.0,
            padding: 0.05,
            background: Some("#f5f0e6".to_string()),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            outline: Some("#1a1a1a".to_string()),
            outline_width: 0.002,
            ribbon: RibbonConfig::default(),
            centreline: false,
            show_strokes: false,
        }
    }
}

impl SvgStyle {
    fn color(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            "#000000"
        } else {
            &self.palette[index % self.palette.len()]
        }
    }
}

fn stroke_color(kind: StrokeType) -> &'static str {
    match kind {
        StrokeType::Cross => "#808080",
        StrokeType::Bounce => "#d62728",
        StrokeType::Glance => "#1f77b4",
    }
}

/// Render an art (and optionally its stroke graph) as a standalone SVG document.
pub fn art_to_svg(art: &Art, strokes: &[Stroke], style: &SvgStyle) -> String {
    let (lo, hi) = view_bounds(art, strokes);
    let pad = style.padding;
    let (x, y) = (lo.x - pad, lo.y - pad);
    let (w, h) = (hi.x - lo.x + 2.0 * pad, hi.y - lo.y + 2.0 * pad);

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="{:.4} {:.4} {:.4} {:.4}">"#,
        w * style.scale,
        h * style.scale,
        x,
        y,
        w,
        h
    );
    let _ = writeln!(svg, "  <title>knotwork - {} threads</title>", art.thread_count());

    if let Some(background) = &style.background {
        let _ = writeln!(
            svg,
            r#"  <rect x="{:.4}" y="{:.4}" width="{:.4}" height="{:.4}" fill="{}"/>"#,
            x, y, w, h, background
        );
    }

    let bands = ribbons(art, &style.ribbon);
    let edge = match &style.outline {
        Some(color) => format!(r#" stroke="{}" stroke-width="{:.4}" stroke-linejoin="round""#, color, style.outline_width),
        None => String::new(),
    };

    for (layer, over) in [("under", false), ("over", true)] {
        let _ = writeln!(svg, r#"  <g id="{}"{}>"#, layer, edge);
        for (index, band) in bands.iter().enumerate() {
            for run in band.runs().iter().filter(|r| r.over == over) {
                let _ = writeln!(
                    svg,
                    r#"    <path d="{}" fill="{}" data-thread="{}"/>"#,
                    polygon_data(&run.outline()),
                    style.color(index),
                    index
                );
            }
        }
        let _ = writeln!(svg, "  </g>");
    }

    if style.centreline {
        let _ = writeln!(
            svg,
            r##"  <g id="centreline" fill="none" stroke="#000000" stroke-width="{:.4}" stroke-dasharray="{:.4}">"##,
            style.outline_width,
            style.outline_width * 4.0
        );
        for (index, (thread, _)) in art.iter().enumerate() {
            let _ = writeln!(svg, r#"    <path d="{}" data-thread="{}"/>"#, thread_path_data(thread), index);
        }
        let _ = writeln!(svg, "  </g>");
    }

    if style.show_strokes {
        let _ = writeln!(svg, r#"  <g id="strokes" stroke-width="{:.4}">"#, style.outline_width);
        for stroke in strokes {
            let _ = writeln!(
                svg,
                r#"    <line x1="{:.6}" y1="{:.6}" x2="{:.6}" y2="{:.6}" stroke="{}" data-stroke="{}"/>"#,
                stroke.a.x,
                stroke.a.y,
                stroke.b.x,
                stroke.b.y,
                stroke_color(stroke.kind),
                stroke.kind.name()
            );
        }
        let _ = writeln!(svg, "  </g>");
    }

    svg.push_str("</svg>\n");
    svg
}

/// Render a bare stroke graph, one `<line>` per stroke with its type in `data-stroke`.
pub fn strokes_to_svg(strokes: &[Stroke], style: &SvgStyle) -> String {
    let style = SvgStyle {
        show_strokes: true,
        ..style.clone()
    };
    art_to_svg(&Art::empty(), strokes, &style)
}

/// Exact cubic Bézier path of a thread: each Hermite interval with
/// per-interval tangents `m0`, `m1` has control points `y0 + m0/3` and
/// `y1 - m1/3`.
pub fn thread_path_data(thread: &Thread) -> String {
    let ys = thread.knots().ys();
    let ms = thread.tangents();

    let mut d = format!("M{:.4},{:.4}", ys[0].x, ys[0].y);
    for i in 0..ys.len() - 1 {
        let c1 = ys[i] + ms[i] * (1.0 / 3.0);
        let c2 = ys[i + 1] - ms[i + 1] * (1.0 / 3.0);
        let end = ys[i + 1];
        let _ = write!(
            d,
            " C{:.4},{:.4} {:.4},{:.4} {:.4},{:.4}",
            c1.x, c1.y, c2.x, c2.y, end.x, end.y
        );
    }
    d.push_str(" Z");
    d
}

fn polygon_data(points: &[Vec2]) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let _ = write!(d, "{}{:.4},{:.4}", if i == 0 { "M" } else { " L" }, p.x, p.y);
    }
    d.push_str(" Z");
    d
}

fn view_bounds(art: &Art, strokes: &[Stroke]) -> (Vec2, Vec2) {
    let points = art
        .bounds()
        .into_iter()
        .flat_map(|(lo, hi)| [lo, hi])
        .chain(strokes.iter().flat_map(|s| [s.a, s.b]))
        .filter(|p| p.is_finite());

    points
        .fold(None, |acc: Option<(Vec2, Vec2)>, p| {
            Some(match acc {
                None => (p, p),
                Some((lo, hi)) => (
                    Vec2::new(lo.x.min(p.x), lo.y.min(p.y)),
                    Vec2::new(hi.x.max(p.x), hi.y.max(p.y)),
                ),
            })
        })
        .unwrap_or((Vec2::ZERO, Vec2::new(1.0, 1.0)))
}

// ============================================================================
// IMPORT
// ============================================================================

/// Extract a stroke graph from SVG markup.
///
/// Each `<line>` is one stroke. Each segment of a `<polyline>`, `<polygon>` or
/// `<path>` is one stroke; curved path segments contribute their chord.
/// Elements inside `<defs>` are ignored, as are transforms.
pub fn extract_strokes_from_svg(content: &str) -> Result<Vec<Stroke>, KnotError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut strokes = Vec::new();
    let mut kinds = vec![StrokeType::Cross];
    let mut defs_depth = 0usize;
    let mut warned_transform = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = element_name(e);
                let inherited = *kinds.last().unwrap_or(&StrokeType::Cross);
                kinds.push(stroke_kind(e, &name)?.unwrap_or(inherited));

                if name == "defs" || defs_depth > 0 {
                    defs_depth += 1;
                } else {
                    warned_transform |= warn_transform(e, &name, warned_transform);
                    let kind = *kinds.last().unwrap_or(&StrokeType::Cross);
                    collect(e, &name, kind, &mut strokes)?;
                }
            }
            Ok(Event::Empty(ref e)) => {
                if defs_depth == 0 {
                    let name = element_name(e);
                    warned_transform |= warn_transform(e, &name, warned_transform);
                    let inherited = *kinds.last().unwrap_or(&StrokeType::Cross);
                    let kind = stroke_kind(e, &name)?.unwrap_or(inherited);
                    collect(e, &name, kind, &mut strokes)?;
                }
            }
            Ok(Event::End(_)) => {
                if kinds.len() > 1 {
                    kinds.pop();
                }
                defs_depth = defs_depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(KnotError::Xml {
                    position: reader.error_position(),
                    message: e.to_string(),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    if strokes.is_empty() {
        return Err(KnotError::NoStrokes);
    }

    log::debug!("extracted {} strokes from SVG", strokes.len());
    Ok(strokes)
}

/// Round every coordinate to a multiple of `precision`, so endpoints that
/// differ only by float noise share a junction. Strokes that collapse to a
/// point are dropped.
pub fn snap_strokes(strokes: &[Stroke], precision: f64) -> Vec<Stroke> {
    if precision <= 0.0 || !precision.is_finite() {
        return strokes.to_vec();
    }

    let snap = |p: Vec2| {
        Vec2::new(
            (p.x / precision).round() * precision,
            (p.y / precision).round() * precision,
        )
    };

    strokes
        .iter()
        .map(|s| Stroke::with_kind(snap(s.a), snap(s.b), s.kind))
        .filter(|s| s.a != s.b)
        .collect()
}

fn element_name(e: &BytesStart) -> String {
    let name = e.name();
    String::from_utf8_lossy(name.as_ref()).into_owned()
}

fn attribute(e: &BytesStart, key: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key.as_bytes())
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// The element's own `data-stroke`, if any.
fn stroke_kind(e: &BytesStart, name: &str) -> Result<Option<StrokeType>, KnotError> {
    match attribute(e, "data-stroke") {
        None => Ok(None),
        Some(value) => StrokeType::from_name(&value)
            .map(Some)
            .ok_or_else(|| {
                log::warn!("<{}> has unknown data-stroke `{}`", name, value);
                KnotError::UnknownStrokeType(value)
            }),
    }
}

fn warn_transform(e: &BytesStart, name: &str, already: bool) -> bool {
    if already || attribute(e, "transform").is_none() {
        return false;
    }
    log::warn!("ignoring transform on <{}>; stroke coordinates are used as written", name);
    true
}

fn number(e: &BytesStart, element: &str, key: &str) -> Result<f64, KnotError> {
    let value = attribute(e, key).unwrap_or_else(|| "0".to_string());
    svgtypes::Number::from_str(&value)
        .map(|n| n.0)
        .map_err(|err| KnotError::Attribute {
            element: element.to_string(),
            attribute: key.to_string(),
            message: err.to_string(),
        })
}

fn collect(e: &BytesStart, name: &str, kind: StrokeType, strokes: &mut Vec<Stroke>) -> Result<(), KnotError> {
    match name {
        "line" => {
            let a = Vec2::new(number(e, name, "x1")?, number(e, name, "y1")?);
            let b = Vec2::new(number(e, name, "x2")?, number(e, name, "y2")?);
            push_chord(strokes, a, b, kind);
        }
        "polyline" | "polygon" => {
            let points: Vec<Vec2> = attribute(e, "points")
                .map(|p| PointsParser::from(p.as_str()).map(|(x, y)| Vec2::new(x, y)).collect())
                .unwrap_or_default();
            for pair in points.windows(2) {
                push_chord(strokes, pair[0], pair[1], kind);
            }
            if name == "polygon" && points.len() > 2 {
                push_chord(strokes, points[points.len() - 1], points[0], kind);
            }
        }
        "path" => {
            if let Some(d) = attribute(e, "d") {
                path_strokes(&d, kind, strokes)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn path_strokes(d: &str, kind: StrokeType, strokes: &mut Vec<Stroke>) -> Result<(), KnotError> {
    let mut start = Vec2::ZERO;
    let mut current = Vec2::ZERO;

    for segment in SimplifyingPathParser::from(d) {
        let segment = segment.map_err(|err| KnotError::Attribute {
            element: "path".to_string(),
            attribute: "d".to_string(),
            message: err.to_string(),
        })?;

        match segment {
            SimplePathSegment::MoveTo { x, y } => {
                start = Vec2::new(x, y);
                current = start;
            }
            SimplePathSegment::LineTo { x, y }
            | SimplePathSegment::Quadratic { x, y, .. }
            | SimplePathSegment::CurveTo { x, y, .. } => {
                let next = Vec2::new(x, y);
                push_chord(strokes, current, next, kind);
                current = next;
            }
            SimplePathSegment::ClosePath => {
                push_chord(strokes, current, start, kind);
                current = start;
            }
        }
    }
    Ok(())
}

fn push_chord(strokes: &mut Vec<Stroke>, a: Vec2, b: Vec2, kind: StrokeType) {
    if a != b {
        strokes.push(Stroke::with_kind(a, b, kind));
    }
}
