// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rendering target the interpreter drives.

use kurbo::Affine;
use peniko::Color;

use crate::command::Command;
use crate::hotspot::HotSpot;
use crate::shape::CurveShape;

/// Identifier of a figure, assigned in increasing order as figures begin.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FigureId(pub u32);

/// Paint overrides for a curve shape, taken from the innermost group.
///
/// `None` fields leave the sink's own current attribute in effect.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ShapePaint {
    /// Fill color override.
    pub fill: Option<Color>,
    /// Edge color override.
    pub edge: Option<Color>,
    /// Edge width override.
    pub edge_width: Option<f64>,
}

impl ShapePaint {
    /// No overrides.
    pub const NONE: Self = Self {
        fill: None,
        edge: None,
        edge_width: None,
    };
}

/// A rendering target for the command stream interpreter.
///
/// Implementations decide how the calls are realized (a vector document,
/// a recording for tests, a canvas). Calls arrive strictly in input order.
pub trait PaintSink {
    /// Render a command the interpreter forwards unchanged.
    fn paint_default(&mut self, command: &Command);

    /// Render a curve shape, possibly merged from several curve segments.
    fn paint_merged_shape(&mut self, shape: &CurveShape, figure: Option<FigureId>, paint: ShapePaint);

    /// Whether drawing currently happens inside the body of a group.
    fn is_inside_group_body(&self) -> bool;

    /// Emit an interactive overlay.
    fn emit_overlay(&mut self, hot_spot: &HotSpot);

    /// The current user-to-device transform.
    ///
    /// Hot-spot padding is divided by the magnitude of its horizontal scale.
    fn current_transform(&self) -> Affine {
        Affine::IDENTITY
    }
}
