// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Curve shapes and their merging.

use kurbo::{BezPath, PathEl};

use crate::command::PolyBezier;
use crate::sink::{FigureId, PaintSink, ShapePaint};

/// A drawable compound curve path built from one or more poly-Bezier commands.
///
/// A shape stays unchanged until it is used as the accumulator of [`merge`].
#[derive(Clone, Debug, PartialEq)]
pub struct CurveShape {
    path: BezPath,
}

impl CurveShape {
    /// Wrap an existing path.
    pub fn new(path: BezPath) -> Self {
        Self { path }
    }

    /// The underlying path.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Number of sub-paths, counted by their `MoveTo` elements.
    pub fn subpath_count(&self) -> usize {
        self.path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathEl::MoveTo(_)))
            .count()
    }

    /// Append the sub-paths of `other` after the sub-paths of `self`.
    ///
    /// No coordinates are transformed and no overlapping geometry is removed.
    pub fn merge_shape(&mut self, other: &Self) {
        self.path.extend(other.path.iter());
    }

    /// Paint this shape on `sink`.
    ///
    /// Attributes left unset in `paint` fall back to the sink's own defaults.
    pub fn paint<S: PaintSink + ?Sized>(
        &self,
        sink: &mut S,
        figure: Option<FigureId>,
        paint: ShapePaint,
    ) {
        sink.paint_merged_shape(self, figure, paint);
    }
}

impl From<&PolyBezier> for CurveShape {
    fn from(pb: &PolyBezier) -> Self {
        Self::new(pb.to_path())
    }
}

/// Fold a list of shapes into one, left to right, keeping draw order.
///
/// A single shape is returned as-is. Returns `None` for an empty list.
pub fn merge(shapes: Vec<CurveShape>) -> Option<CurveShape> {
    let mut iter = shapes.into_iter();
    let mut merged = iter.next()?;
    for shape in iter {
        merged.merge_shape(&shape);
    }
    Some(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn curve(x: f64) -> CurveShape {
        let mut path = BezPath::new();
        path.move_to(Point::new(x, 0.0));
        path.curve_to(
            Point::new(x + 1.0, 1.0),
            Point::new(x + 2.0, 1.0),
            Point::new(x + 3.0, 0.0),
        );
        CurveShape::new(path)
    }

    #[test]
    fn merging_one_shape_is_identity() {
        let shape = curve(0.0);
        let merged = merge(vec![shape.clone()]).unwrap();
        assert_eq!(merged, shape);
    }

    #[test]
    fn merging_keeps_subpaths_in_draw_order() {
        let shapes = vec![curve(0.0), curve(10.0), curve(20.0)];
        let total: usize = shapes.iter().map(CurveShape::subpath_count).sum();
        let merged = merge(shapes).unwrap();
        assert_eq!(merged.subpath_count(), total);

        let starts: Vec<_> = merged
            .path()
            .elements()
            .iter()
            .filter_map(|el| match el {
                PathEl::MoveTo(p) => Some(p.x),
                _ => None,
            })
            .collect();
        assert_eq!(starts, [0.0, 10.0, 20.0]);
    }

    #[test]
    fn merging_nothing_yields_none() {
        assert!(merge(Vec::new()).is_none());
    }
}
