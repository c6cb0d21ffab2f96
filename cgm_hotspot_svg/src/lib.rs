// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG document sink for the CGM Hotspot interpreter.
//!
//! [`SvgSink`] implements [`PaintSink`] by recording the calls it receives and
//! exporting them as an SVG document. [`convert`] runs a whole conversion and
//! only produces a document when the command stream was well formed.
//!
//! Output notes:
//! - The virtual device coordinate extent is mapped onto the canvas with the
//!   y axis pointing up, as in the metafile.
//! - Hot spots are transparent (unless colored) `<rect>`s with class `hotspot`;
//!   the document carries the style sheet and the `clickHS` script they need.
//! - Text is placed at its anchor without font metrics.

use std::fmt::Write as _;

use cgm_hotspot::{
    Command, CurveShape, FigureId, HotSpot, Options, PaintSink, Result, ShapePaint, interpret,
    sanitize,
};
use kurbo::{Affine, BezPath, PathEl, Point, Rect};
use peniko::Color;

/// Fill of a hot spot with no color option.
pub const HOT_SPOT_COLOR: &str = "transparent";

const STYLE_SHEET: &str = "svg { fill-rule: evenodd;pointer-events: none;}\
.hotspot { cursor: pointer;pointer-events: all;}\
@keyframes blink {100%,0% {fill: transparent;}60% {fill: #f00;}}.hotspotBlink {animation: blink 0.25s 3;}";

const HOT_SPOT_SCRIPT: &str = "function clickHS(apsid){var apselement = document.getElementById(apsid);\
apselement.classList.add('hotspotBlink');\
setTimeout(function(){apselement.classList.remove('hotspotBlink');},750);}";

/// Fractional digits for pictures with a very small metric scale.
const FINE_PRECISION: usize = 8;
/// Fractional digits otherwise.
const DEFAULT_PRECISION: usize = 4;

/// A call recorded by [`SvgSink`].
#[derive(Clone, Debug, PartialEq)]
pub enum SvgOp {
    /// A forwarded command.
    Command(Command),
    /// A curve shape with its overrides.
    Shape {
        /// Path of the shape.
        path: BezPath,
        /// Figure it was merged in, if any.
        figure: Option<FigureId>,
        /// Overrides from the innermost group.
        paint: ShapePaint,
    },
    /// A hot-spot overlay.
    Overlay(HotSpot),
}

#[derive(Clone, Debug, Default)]
struct SvgState {
    transform: Affine,
    fill: Option<Color>,
    edge: Option<Color>,
    edge_width: Option<f64>,
    line_color: Option<Color>,
    line_width: Option<f64>,
}

/// A recording SVG sink.
#[derive(Debug)]
pub struct SvgSink {
    width: u32,
    height: u32,
    ops: Vec<SvgOp>,
    /// One entry per open group: whether its body has begun.
    group_bodies: Vec<bool>,
    transform: Affine,
}

impl SvgSink {
    /// Create a sink for a canvas of `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            group_bodies: Vec::new(),
            transform: Affine::IDENTITY,
        }
    }

    /// Returns the recorded ops.
    pub fn ops(&self) -> &[SvgOp] {
        &self.ops
    }

    /// Export the recorded ops as an SVG document.
    pub fn to_svg(&self) -> String {
        render_svg_document(self.width, self.height, &self.ops)
    }
}

impl PaintSink for SvgSink {
    fn paint_default(&mut self, command: &Command) {
        match command {
            Command::BeginGroup(_) => self.group_bodies.push(false),
            Command::BeginGroupBody => {
                if let Some(body) = self.group_bodies.last_mut() {
                    *body = true;
                }
            }
            Command::EndGroup => {
                self.group_bodies.pop();
            }
            Command::VdcExtent(extent) => {
                self.transform = vdc_transform(*extent, self.width, self.height);
            }
            _ => {}
        }
        self.ops.push(SvgOp::Command(command.clone()));
    }

    fn paint_merged_shape(&mut self, shape: &CurveShape, figure: Option<FigureId>, paint: ShapePaint) {
        self.ops.push(SvgOp::Shape {
            path: shape.path().clone(),
            figure,
            paint,
        });
    }

    fn is_inside_group_body(&self) -> bool {
        self.group_bodies.last().copied().unwrap_or(false)
    }

    fn emit_overlay(&mut self, hot_spot: &HotSpot) {
        self.ops.push(SvgOp::Overlay(hot_spot.clone()));
    }

    fn current_transform(&self) -> Affine {
        self.transform
    }
}

/// Convert a command list into an SVG document of `width` x `height`.
///
/// Either the whole document is returned or the interpretation error; a
/// failed conversion produces no output.
pub fn convert(commands: &[Command], options: &Options, width: u32, height: u32) -> Result<String> {
    tracing::debug!(?options, width, height, "converting command stream to SVG");
    let mut sink = SvgSink::new(width, height);
    interpret(commands, options, &mut sink)?;
    let svg = sink.to_svg();
    tracing::debug!(bytes = svg.len(), "SVG conversion done");
    Ok(svg)
}

/// Map a VDC extent onto the canvas, flipping the y axis.
fn vdc_transform(extent: Rect, width: u32, height: u32) -> Affine {
    if extent.width() == 0.0 || extent.height() == 0.0 {
        tracing::warn!(?extent, "degenerate VDC extent; keeping identity transform");
        return Affine::IDENTITY;
    }
    let sx = f64::from(width) / extent.width();
    let sy = f64::from(height) / extent.height();
    Affine::new([sx, 0.0, 0.0, -sy, -extent.x0 * sx, extent.y1 * sy])
}

/// Coordinate precision from the first scaling mode of the stream.
fn precision_for(ops: &[SvgOp]) -> usize {
    let metric_scale = ops.iter().find_map(|op| match op {
        SvgOp::Command(Command::ScalingMode { metric_scale }) => Some(*metric_scale),
        _ => None,
    });
    match metric_scale {
        Some(scale) if scale > 0.0 && scale <= 0.0001 => FINE_PRECISION,
        _ => DEFAULT_PRECISION,
    }
}

fn render_svg_document(width: u32, height: u32, ops: &[SvgOp]) -> String {
    let fmt = NumberFormat {
        precision: precision_for(ops),
    };
    let mut body = String::new();
    let mut open_groups: usize = 0;
    let mut state = SvgState::default();

    for op in ops {
        match op {
            SvgOp::Command(command) => match command {
                Command::BeginGroup(identifier) => {
                    open_groups += 1;
                    let _ = write!(body, "<g apsid=\"{}\">", sanitize(Some(identifier.as_str())));
                }
                Command::EndGroup => {
                    if open_groups > 0 {
                        open_groups -= 1;
                        body.push_str("</g>");
                    }
                }
                Command::FillColor(color) => state.fill = Some(*color),
                Command::EdgeColor(color) => state.edge = Some(*color),
                Command::EdgeWidth(width) => state.edge_width = Some(*width),
                Command::LineColor(color) => state.line_color = Some(*color),
                Command::LineWidth(width) => state.line_width = Some(*width),
                Command::VdcExtent(extent) => {
                    state.transform = vdc_transform(*extent, width, height);
                }
                Command::Rectangle(rect) => {
                    let style = shape_style(&state, ShapePaint::NONE, &fmt);
                    let attrs = svg_transform_attr(state.transform, &fmt);
                    let _ = write!(
                        body,
                        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{attrs}{style}/>",
                        fmt.num(rect.x0),
                        fmt.num(rect.y0),
                        fmt.num(rect.width()),
                        fmt.num(rect.height()),
                    );
                }
                Command::Polyline(points) => {
                    let attrs = svg_transform_attr(state.transform, &fmt);
                    let mut coords = String::new();
                    for (i, p) in points.iter().enumerate() {
                        if i > 0 {
                            coords.push(' ');
                        }
                        let _ = write!(coords, "{},{}", fmt.num(p.x), fmt.num(p.y));
                    }
                    let (stroke, stroke_alpha) = color_to_svg(state.line_color.unwrap_or(Color::BLACK));
                    let _ = write!(
                        body,
                        "<polyline points=\"{coords}\"{attrs} fill=\"none\" stroke=\"{stroke}\"{} stroke-width=\"{}\"/>",
                        opacity_attr("stroke-opacity", stroke_alpha, &fmt),
                        fmt.num(state.line_width.unwrap_or(1.0)),
                    );
                }
                Command::RestrictedText(text) => {
                    let anchor = state.transform * text.position;
                    let size = text.extent.height * state.transform.as_coeffs()[3].abs();
                    let _ = write!(
                        body,
                        "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"#000000\">{}</text>",
                        fmt.num(anchor.x),
                        fmt.num(anchor.y),
                        fmt.num(size),
                        escape_text(&text.text),
                    );
                }
                Command::Other(opaque) => {
                    tracing::trace!(class = opaque.class, id = opaque.id, "element not rendered");
                }
                Command::BeginGroupBody
                | Command::BeginFigure
                | Command::EndFigure
                | Command::CurveSegment(_)
                | Command::ScalingMode { .. } => {}
            },
            SvgOp::Shape {
                path,
                figure,
                paint,
            } => {
                let d = bez_path_to_svg_d(path, &fmt);
                let attrs = svg_transform_attr(state.transform, &fmt);
                let style = shape_style(&state, *paint, &fmt);
                let figure_attr = figure
                    .map(|f| format!(" data-figure=\"{}\"", f.0))
                    .unwrap_or_default();
                let _ = write!(body, "<path d=\"{d}\"{attrs}{figure_attr}{style}/>");
            }
            SvgOp::Overlay(hot_spot) => write_hot_spot(&mut body, hot_spot, state.transform, &fmt),
        }
    }

    for _ in 0..open_groups {
        body.push_str("</g>");
    }

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
    );
    svg.push_str("<defs>");
    let _ = write!(
        svg,
        "<style type=\"text/css\"><![CDATA[{STYLE_SHEET}]]></style>"
    );
    let _ = write!(
        svg,
        "<script id=\"nativeJSHS\" type=\"text/ecmascript\"><![CDATA[{HOT_SPOT_SCRIPT}]]></script>"
    );
    svg.push_str("</defs>");
    svg.push_str(&body);
    svg.push_str("</svg>");
    svg
}

fn write_hot_spot(out: &mut String, hot_spot: &HotSpot, transform: Affine, fmt: &NumberFormat) {
    let x = fmt.num(hot_spot.bounds.x0);
    let y = fmt.num(hot_spot.bounds.y0);
    let w = fmt.num(hot_spot.bounds.width());
    let h = fmt.num(hot_spot.bounds.height());
    let rectangle = sanitize(Some(format!("{x},{y},{w},{h}").as_str()));

    let id = sanitize(Some(hot_spot.id.as_str()));
    let group_id = sanitize(Some(hot_spot.group_id.as_str()));
    let label = sanitize(Some(hot_spot.label.as_str()));
    let color = hot_spot
        .color
        .as_deref()
        .map_or_else(|| HOT_SPOT_COLOR.to_owned(), |c| sanitize(Some(c)));
    let navigation = hot_spot
        .link
        .as_deref()
        .map(|link| {
            format!(
                "window.location.href='{}?id={group_id}&amp;name={label}&amp;rect=[{rectangle}]'",
                sanitize(Some(link))
            )
        })
        .unwrap_or_default();

    let attrs = svg_transform_attr(transform, fmt);
    let _ = write!(
        out,
        "<rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\"{attrs} id=\"{id}\" apsid=\"{group_id}\" apsname=\"{label}\" fill-rule=\"evenodd\" fill=\"{color}\" class=\"hotspot\" onclick=\"clickHS('{id}');{navigation}\" stroke=\"none\"/>"
    );
}

/// Fill and stroke attributes for a filled, edged shape.
fn shape_style(state: &SvgState, paint: ShapePaint, fmt: &NumberFormat) -> String {
    let mut out = String::new();
    match paint.fill.or(state.fill) {
        Some(fill) => {
            let (rgb, a) = color_to_svg(fill);
            let _ = write!(out, " fill=\"{rgb}\"{}", opacity_attr("fill-opacity", a, fmt));
        }
        None => out.push_str(" fill=\"none\""),
    }
    let stroke = paint
        .edge
        .or(state.edge)
        .or(state.line_color)
        .unwrap_or(Color::BLACK);
    let (rgb, a) = color_to_svg(stroke);
    let _ = write!(out, " stroke=\"{rgb}\"{}", opacity_attr("stroke-opacity", a, fmt));
    let width = paint
        .edge_width
        .or(state.edge_width)
        .or(state.line_width)
        .unwrap_or(1.0);
    let _ = write!(out, " stroke-width=\"{}\"", fmt.num(width));
    out
}

fn opacity_attr(name: &str, alpha: f64, fmt: &NumberFormat) -> String {
    if alpha < 1.0 {
        format!(" {name}=\"{}\"", fmt.num(alpha))
    } else {
        String::new()
    }
}

fn svg_transform_attr(transform: Affine, fmt: &NumberFormat) -> String {
    let mut attrs = String::new();
    if transform != Affine::IDENTITY {
        let _ = write!(attrs, " transform=\"{}\"", affine_to_svg_matrix(transform, fmt));
    }
    attrs
}

fn bez_path_to_svg_d(path: &BezPath, fmt: &NumberFormat) -> String {
    let mut d = String::new();
    for el in path.iter() {
        match el {
            PathEl::MoveTo(p) => {
                let _ = write!(d, "M{}", fmt.point(p));
            }
            PathEl::LineTo(p) => {
                let _ = write!(d, "L{}", fmt.point(p));
            }
            PathEl::QuadTo(p1, p2) => {
                let _ = write!(d, "Q{} {}", fmt.point(p1), fmt.point(p2));
            }
            PathEl::CurveTo(p1, p2, p3) => {
                let _ = write!(
                    d,
                    "C{} {} {}",
                    fmt.point(p1),
                    fmt.point(p2),
                    fmt.point(p3)
                );
            }
            PathEl::ClosePath => d.push('Z'),
        }
    }
    d
}

fn color_to_svg(color: Color) -> (String, f64) {
    let rgba = color.to_rgba8();
    let a = f64::from(rgba.a) / 255.0;
    (format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b), a)
}

fn affine_to_svg_matrix(xf: Affine, fmt: &NumberFormat) -> String {
    // kurbo::Affine stores [a, b, c, d, e, f] corresponding to:
    // [ a c e ]
    // [ b d f ]
    // [ 0 0 1 ]
    let c = xf.as_coeffs();
    format!(
        "matrix({} {} {} {} {} {})",
        fmt.num(c[0]),
        fmt.num(c[1]),
        fmt.num(c[2]),
        fmt.num(c[3]),
        fmt.num(c[4]),
        fmt.num(c[5]),
    )
}

/// Escape markup characters and drop characters XML 1.0 does not allow.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' | '\n' | '\r' => out.push(c),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {}
            _ => out.push(c),
        }
    }
    out
}

#[derive(Copy, Clone, Debug)]
struct NumberFormat {
    precision: usize,
}

impl NumberFormat {
    fn point(&self, p: Point) -> String {
        format!("{} {}", self.num(p.x), self.num(p.y))
    }

    fn num(&self, v: f64) -> String {
        if !v.is_finite() {
            return format!("{v}");
        }
        if let Some(i) = integral(v) {
            return format!("{i}");
        }

        let mut s = format!("{v:.prec$}", prec = self.precision);
        while s.contains('.') && s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
        if s == "-0" {
            s.remove(0);
        }
        s
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "only integral values well inside the i64 range are converted"
)]
fn integral(v: f64) -> Option<i64> {
    (v.fract() == 0.0 && v.abs() < 1e15).then(|| v as i64)
}
