// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A sink that records every call, for tests and debugging.
//!
//! It does not render anything; it keeps the calls in the order they arrived
//! so callers can assert on what the interpreter emitted.

use kurbo::Affine;

use crate::command::Command;
use crate::hotspot::HotSpot;
use crate::shape::CurveShape;
use crate::sink::{FigureId, PaintSink, ShapePaint};

/// One recorded sink call.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A command forwarded unchanged.
    Default(Command),
    /// A curve shape painted with overrides.
    Shape {
        /// The painted shape.
        shape: CurveShape,
        /// Figure the shape was merged in, if any.
        figure: Option<FigureId>,
        /// Overrides from the innermost group.
        paint: ShapePaint,
    },
    /// An overlay.
    Overlay(HotSpot),
}

/// Recording implementation of [`PaintSink`].
///
/// The group-body predicate and the transform are fixed values chosen by the caller.
#[derive(Default, Debug)]
pub struct RecordingSink {
    events: Vec<RecordedEvent>,
    inside_group_body: bool,
    transform: Option<Affine>,
}

impl RecordingSink {
    /// Answer `inside` to every group-body query.
    #[must_use]
    pub fn with_inside_group_body(mut self, inside: bool) -> Self {
        self.inside_group_body = inside;
        self
    }

    /// Report `transform` as the current transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Recorded events in arrival order.
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Commands forwarded unchanged.
    pub fn forwarded(&self) -> impl Iterator<Item = &Command> {
        self.events.iter().filter_map(|event| match event {
            RecordedEvent::Default(command) => Some(command),
            _ => None,
        })
    }

    /// Emitted overlays.
    pub fn overlays(&self) -> impl Iterator<Item = &HotSpot> {
        self.events.iter().filter_map(|event| match event {
            RecordedEvent::Overlay(hot_spot) => Some(hot_spot),
            _ => None,
        })
    }
}

impl PaintSink for RecordingSink {
    fn paint_default(&mut self, command: &Command) {
        self.events.push(RecordedEvent::Default(command.clone()));
    }

    fn paint_merged_shape(&mut self, shape: &CurveShape, figure: Option<FigureId>, paint: ShapePaint) {
        self.events.push(RecordedEvent::Shape {
            shape: shape.clone(),
            figure,
            paint,
        });
    }

    fn is_inside_group_body(&self) -> bool {
        self.inside_group_body
    }

    fn emit_overlay(&mut self, hot_spot: &HotSpot) {
        self.events.push(RecordedEvent::Overlay(hot_spot.clone()));
    }

    fn current_transform(&self) -> Affine {
        self.transform.unwrap_or(Affine::IDENTITY)
    }
}
