// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The command stream interpreter.

use hashbrown::HashMap;

use crate::command::Command;
use crate::error::{Error, Result};
use crate::group::{Group, GroupIndex};
use crate::hotspot::synthesize;
use crate::options::{HotSpotSettings, Options};
use crate::shape::{CurveShape, merge};
use crate::sink::{FigureId, PaintSink, ShapePaint};

/// Mutable state of one interpretation.
#[derive(Debug, Default)]
pub struct InterpreterState {
    groups: Vec<Group>,
    next_group: u32,
    current_figure: Option<FigureId>,
    next_figure: u32,
    figure_buffers: HashMap<FigureId, Vec<CurveShape>>,
    text_counter: u32,
    overlay_count: u32,
}

impl InterpreterState {
    /// Open groups, innermost last.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// The innermost open group.
    pub fn top_group(&self) -> Option<&Group> {
        self.groups.last()
    }

    /// The open figure, if any.
    pub fn current_figure(&self) -> Option<FigureId> {
        self.current_figure
    }

    /// Number of curve shapes waiting in the open figure.
    pub fn pending_shapes(&self) -> usize {
        self.current_figure
            .and_then(|figure| self.figure_buffers.get(&figure))
            .map_or(0, Vec::len)
    }

    /// Number of restricted texts seen while hot spots were enabled.
    pub fn text_counter(&self) -> u32 {
        self.text_counter
    }

    /// Number of hot-spot overlays handed to the sink.
    pub fn overlay_count(&self) -> u32 {
        self.overlay_count
    }

    fn top_shape_paint(&self) -> ShapePaint {
        self.top_group().map_or(ShapePaint::NONE, Group::shape_paint)
    }
}

/// Walks a command list once, driving a [`PaintSink`].
///
/// Each conversion needs its own interpreter; nothing is shared between them.
#[derive(Debug)]
pub struct Interpreter {
    settings: HotSpotSettings,
    state: InterpreterState,
    position: usize,
}

impl Interpreter {
    /// Create an interpreter, resolving `options` once.
    pub fn new(options: &Options) -> Result<Self> {
        Ok(Self::with_settings(options.resolve()?))
    }

    /// Create an interpreter from already resolved settings.
    pub fn with_settings(settings: HotSpotSettings) -> Self {
        Self {
            settings,
            state: InterpreterState::default(),
            position: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    /// Process the next command.
    ///
    /// After an error the interpreter must not be fed further commands.
    pub fn step<S: PaintSink + ?Sized>(&mut self, command: &Command, sink: &mut S) -> Result<()> {
        let index = self.position;
        self.position += 1;
        let state = &mut self.state;

        match command {
            Command::BeginGroup(identifier) => {
                sink.paint_default(command);
                let group_index = GroupIndex(state.next_group);
                state.next_group += 1;
                tracing::trace!(index, group = group_index.0, %identifier, "group begun");
                state.groups.push(Group::new(group_index, identifier.as_str()));
            }
            Command::EndGroup => {
                let Some(group) = state.groups.pop() else {
                    return Err(Error::MalformedStream { index });
                };
                tracing::trace!(index, group = group.index().0, "group ended");
                sink.paint_default(command);
            }
            Command::BeginFigure => {
                sink.paint_default(command);
                if let Some(previous) = state.current_figure {
                    let dropped = state.figure_buffers.remove(&previous).map_or(0, |b| b.len());
                    tracing::warn!(
                        index,
                        figure = previous.0,
                        dropped,
                        "figure begun while another is open; pending shapes discarded"
                    );
                }
                let figure = FigureId(state.next_figure);
                state.next_figure += 1;
                state.current_figure = Some(figure);
                state.figure_buffers.insert(figure, Vec::new());
            }
            Command::EndFigure => {
                let figure = state
                    .current_figure
                    .take()
                    .ok_or(Error::MissingFigureBuffer { index })?;
                let shapes = state
                    .figure_buffers
                    .remove(&figure)
                    .ok_or(Error::MissingFigureBuffer { index })?;
                if let Some(merged) = merge(shapes) {
                    merged.paint(sink, Some(figure), state.top_shape_paint());
                }
            }
            Command::CurveSegment(curve) => {
                let shape = CurveShape::from(curve);
                match state.current_figure {
                    Some(figure) => state
                        .figure_buffers
                        .get_mut(&figure)
                        .ok_or(Error::MissingFigureBuffer { index })?
                        .push(shape),
                    None => shape.paint(sink, None, state.top_shape_paint()),
                }
            }
            Command::FillColor(color) => {
                if let Some(top) = state.groups.last_mut() {
                    top.attributes_mut().fill_color = Some(*color);
                }
                sink.paint_default(command);
            }
            Command::EdgeColor(color) => {
                if let Some(top) = state.groups.last_mut() {
                    top.attributes_mut().edge_color = Some(*color);
                }
                sink.paint_default(command);
            }
            Command::EdgeWidth(width) => {
                if let Some(top) = state.groups.last_mut() {
                    top.attributes_mut().edge_width = Some(*width);
                }
                sink.paint_default(command);
            }
            Command::LineColor(color) => {
                if let Some(top) = state.groups.last_mut() {
                    top.attributes_mut().line_color = Some(*color);
                }
                sink.paint_default(command);
            }
            Command::LineWidth(width) => {
                if let Some(top) = state.groups.last_mut() {
                    top.attributes_mut().line_width = Some(*width);
                }
                sink.paint_default(command);
            }
            Command::RestrictedText(text) => {
                if self.settings.enabled {
                    let seed = state.text_counter;
                    state.text_counter += 1;
                    match synthesize(
                        text,
                        &self.settings,
                        &state.groups,
                        seed,
                        sink.current_transform(),
                    ) {
                        Some(hot_spot) => {
                            state.overlay_count += 1;
                            sink.emit_overlay(&hot_spot);
                        }
                        None => tracing::trace!(index, seed, "restricted text without hot spot"),
                    }
                }
                sink.paint_default(command);
            }
            Command::Rectangle(_) => {
                // Some producers draw a canvas-sized rectangle inside group bodies.
                if sink.is_inside_group_body() {
                    tracing::trace!(index, "rectangle inside group body skipped");
                } else {
                    sink.paint_default(command);
                }
            }
            Command::BeginGroupBody
            | Command::Polyline(_)
            | Command::VdcExtent(_)
            | Command::ScalingMode { .. }
            | Command::Other(_) => sink.paint_default(command),
        }
        Ok(())
    }

    /// Finish the pass, reporting scopes left open.
    pub fn finish(self) -> InterpreterState {
        if !self.state.groups.is_empty() {
            tracing::warn!(
                open = self.state.groups.len(),
                "command stream ended with open groups"
            );
        }
        if let Some(figure) = self.state.current_figure {
            tracing::warn!(
                figure = figure.0,
                pending = self.state.pending_shapes(),
                "command stream ended with an open figure; pending shapes not painted"
            );
        }
        self.state
    }
}

/// Interpret `commands` in order, driving `sink`.
///
/// Stops at the first structural error; nothing after the offending command
/// reaches the sink.
pub fn interpret<S: PaintSink + ?Sized>(
    commands: &[Command],
    options: &Options,
    sink: &mut S,
) -> Result<InterpreterState> {
    tracing::debug!(
        commands = commands.len(),
        hot_spots = options.hot_spot_enabled,
        "interpreting command stream"
    );
    let mut interpreter = Interpreter::new(options)?;
    for command in commands {
        if let Err(err) = interpreter.step(command, sink) {
            tracing::debug!(%err, kind = command.kind_name(), "command stream rejected");
            return Err(err);
        }
    }
    let state = interpreter.finish();
    tracing::debug!(
        texts = state.text_counter(),
        overlays = state.overlay_count(),
        "command stream interpreted"
    );
    Ok(state)
}
