// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CGM Hotspot: a command stream interpreter for decoded CGM drawings.
//!
//! A metafile decoder produces an ordered list of [`Command`]s. This crate
//! walks that list once and drives a [`PaintSink`], which turns the calls into
//! an output document (see `cgm_hotspot_svg` for an SVG sink).
//!
//! While walking, the interpreter:
//!
//! - keeps a stack of application structures ([`Group`]s) and records the fill,
//!   edge, and line attributes set while each group is innermost;
//! - buffers curve segments between `BeginFigure` and `EndFigure` and paints
//!   them as one merged [`CurveShape`], with the innermost group's fill, edge
//!   color, and edge width;
//! - optionally synthesizes clickable [`HotSpot`] overlays from restricted
//!   text, filtered and styled by [`Options`];
//! - passes every string that ends up in generated attributes through
//!   [`sanitize`].
//!
//! Structural problems in the stream (an end of group with no open group, an
//! end of figure with no open figure) abort the conversion with an [`Error`].
//!
//! # Example
//!
//! ```
//! use cgm_hotspot::{Command, Options, RecordingSink, interpret};
//! use peniko::color::palette::css;
//!
//! let commands = [
//!     Command::BeginGroup("valve-12".into()),
//!     Command::FillColor(css::RED),
//!     Command::EndGroup,
//! ];
//! let mut sink = RecordingSink::default();
//! let state = interpret(&commands, &Options::default(), &mut sink).unwrap();
//! assert!(state.groups().is_empty());
//! assert_eq!(sink.forwarded().count(), 3);
//! ```

mod command;
mod error;
mod group;
mod hotspot;
mod interpret;
mod options;
mod record;
mod sanitize;
mod shape;
mod sink;

pub use command::{Command, Continuity, OpaqueCommand, PolyBezier, RestrictedText};
pub use error::{Error, Result};
pub use group::{Group, GroupAttributes, GroupIndex};
pub use hotspot::{HOT_SPOT_ID_PREFIX, HotSpot, offset_box, pad_box, synthesize};
pub use interpret::{Interpreter, InterpreterState, interpret};
pub use options::{HotSpotSettings, Options};
pub use record::{RecordedEvent, RecordingSink};
pub use sanitize::{is_attribute_safe, sanitize};
pub use shape::{CurveShape, merge};
pub use sink::{FigureId, PaintSink, ShapePaint};
