// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoded metafile commands, as seen by the interpreter.

use kurbo::{BezPath, Point, Rect, Size, Vec2};
use peniko::Color;

/// How the control points of a [`PolyBezier`] are laid out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Continuity {
    /// Every curve is an independent group of four points (start, two controls, end).
    Discontinuous,
    /// One start point followed by `(control, control, end)` triples, each curve
    /// starting where the previous one ended.
    Continuous,
}

/// A poly-Bezier primitive: one or more cubic curve pieces.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyBezier {
    /// Point layout.
    pub continuity: Continuity,
    /// Control and end points, interpreted according to `continuity`.
    pub points: Vec<Point>,
}

impl PolyBezier {
    /// Create a poly-Bezier from its point layout and points.
    pub fn new(continuity: Continuity, points: impl Into<Vec<Point>>) -> Self {
        Self {
            continuity,
            points: points.into(),
        }
    }

    /// Build the path for this primitive.
    ///
    /// Trailing points that do not complete a curve are ignored.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        match self.continuity {
            Continuity::Continuous => {
                let Some((start, rest)) = self.points.split_first() else {
                    return path;
                };
                if rest.len() < 3 {
                    return path;
                }
                path.move_to(*start);
                for curve in rest.chunks_exact(3) {
                    path.curve_to(curve[0], curve[1], curve[2]);
                }
            }
            Continuity::Discontinuous => {
                for curve in self.points.chunks_exact(4) {
                    path.move_to(curve[0]);
                    path.curve_to(curve[1], curve[2], curve[3]);
                }
            }
        }
        path
    }
}

/// A restricted text element: a string constrained to a box.
#[derive(Clone, Debug, PartialEq)]
pub struct RestrictedText {
    /// Text anchor position.
    pub position: Point,
    /// Width and height of the box the text is restricted to.
    pub extent: Size,
    /// Literal text content.
    pub text: String,
    /// Rendering offset resolved by the producer from the text alignment.
    pub offset: Vec2,
}

impl RestrictedText {
    /// The box the text is restricted to, before any rendering offset.
    pub fn text_box(&self) -> Rect {
        Rect::from_origin_size(self.position, self.extent)
    }
}

/// Identity of an element the interpreter does not know about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OpaqueCommand {
    /// Element class.
    pub class: u8,
    /// Element id within its class.
    pub id: u16,
}

/// One decoded command of the input stream.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Begin an application structure (group) with the given identifier.
    BeginGroup(String),
    /// Begin the body of the innermost group.
    BeginGroupBody,
    /// End the innermost group.
    EndGroup,
    /// Begin a figure; curve segments are buffered until [`Command::EndFigure`].
    BeginFigure,
    /// End the open figure.
    EndFigure,
    /// A poly-Bezier curve segment.
    CurveSegment(PolyBezier),
    /// Set the fill color.
    FillColor(Color),
    /// Set the edge color.
    EdgeColor(Color),
    /// Set the edge width.
    EdgeWidth(f64),
    /// Set the line color.
    LineColor(Color),
    /// Set the line width.
    LineWidth(f64),
    /// Draw a restricted text.
    RestrictedText(RestrictedText),
    /// Draw an axis-aligned rectangle.
    Rectangle(Rect),
    /// Draw an open polyline with the line attributes.
    Polyline(Vec<Point>),
    /// Virtual device coordinate extent of the picture.
    VdcExtent(Rect),
    /// Scaling mode; `metric_scale` is the size in millimetres of one VDC unit.
    ScalingMode {
        /// Metric scaling factor.
        metric_scale: f64,
    },
    /// Any other element, forwarded as-is.
    Other(OpaqueCommand),
}

impl Command {
    /// Short name of the command kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::BeginGroup(_) => "BeginGroup",
            Self::BeginGroupBody => "BeginGroupBody",
            Self::EndGroup => "EndGroup",
            Self::BeginFigure => "BeginFigure",
            Self::EndFigure => "EndFigure",
            Self::CurveSegment(_) => "CurveSegment",
            Self::FillColor(_) => "FillColor",
            Self::EdgeColor(_) => "EdgeColor",
            Self::EdgeWidth(_) => "EdgeWidth",
            Self::LineColor(_) => "LineColor",
            Self::LineWidth(_) => "LineWidth",
            Self::RestrictedText(_) => "RestrictedText",
            Self::Rectangle(_) => "Rectangle",
            Self::Polyline(_) => "Polyline",
            Self::VdcExtent(_) => "VdcExtent",
            Self::ScalingMode { .. } => "ScalingMode",
            Self::Other(_) => "Other",
        }
    }
}
