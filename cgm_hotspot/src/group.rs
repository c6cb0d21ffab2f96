// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Application structure groups and the paint attributes they accumulate.

use peniko::Color;

use crate::sink::ShapePaint;

/// Index of a group, assigned in increasing order as groups begin.
///
/// Identifiers coming from the stream need not be unique, so groups are
/// told apart by this index instead.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupIndex(pub u32);

/// Attributes set while a group was innermost.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GroupAttributes {
    /// Last fill color.
    pub fill_color: Option<Color>,
    /// Last edge color.
    pub edge_color: Option<Color>,
    /// Last edge width.
    pub edge_width: Option<f64>,
    /// Last line color.
    pub line_color: Option<Color>,
    /// Last line width.
    pub line_width: Option<f64>,
}

/// An open group on the interpreter's stack.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    index: GroupIndex,
    identifier: String,
    attributes: GroupAttributes,
}

impl Group {
    /// Create a group with no attributes set.
    pub fn new(index: GroupIndex, identifier: impl Into<String>) -> Self {
        Self {
            index,
            identifier: identifier.into(),
            attributes: GroupAttributes::default(),
        }
    }

    /// Creation index of this group.
    pub fn index(&self) -> GroupIndex {
        self.index
    }

    /// Identifier from the stream.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Current attributes.
    pub fn attributes(&self) -> &GroupAttributes {
        &self.attributes
    }

    /// Mutable access to the attributes; each setter overwrites the previous value.
    pub fn attributes_mut(&mut self) -> &mut GroupAttributes {
        &mut self.attributes
    }

    /// Overrides applied to curve shapes drawn inside this group.
    ///
    /// Only fill, edge color, and edge width take part; line attributes do not.
    pub fn shape_paint(&self) -> ShapePaint {
        ShapePaint {
            fill: self.attributes.fill_color,
            edge: self.attributes.edge_color,
            edge_width: self.attributes.edge_width,
        }
    }
}
