// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conversion options.

use regex::Regex;
use serde::Deserialize;

use crate::error::Result;

/// Caller-supplied conversion options.
///
/// Field names deserialize in camel case (`hotSpotEnabled`, `hotSpotPadding`, ...),
/// and every field may be omitted.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Synthesize hot spots for restricted text.
    pub hot_spot_enabled: bool,
    /// Only synthesize hot spots for text inside a group.
    pub hot_spot_in_application_structure_only: bool,
    /// Padding added on every side of a hot spot, in device units.
    pub hot_spot_padding: Option<f64>,
    /// Pattern the whole label must match for a hot spot to be emitted.
    pub hot_spot_regex: Option<String>,
    /// Navigation target opened when a hot spot is clicked.
    pub hot_spot_link: Option<String>,
    /// Hot-spot fill color, e.g. `rgba(255, 0, 0, 0.3)`.
    pub hot_spot_color: Option<String>,
}

impl Options {
    /// Options with hot spots enabled and everything else at its default.
    pub fn with_hot_spots() -> Self {
        Self {
            hot_spot_enabled: true,
            ..Self::default()
        }
    }

    /// Resolve into the settings used for one conversion.
    pub fn resolve(&self) -> Result<HotSpotSettings> {
        let label_filter = self
            .hot_spot_regex
            .as_deref()
            .map(|pattern| Regex::new(&format!("^(?:{pattern})$")))
            .transpose()?;
        Ok(HotSpotSettings {
            enabled: self.hot_spot_enabled,
            group_only: self.hot_spot_in_application_structure_only,
            padding: self.hot_spot_padding,
            label_filter,
            link: self.hot_spot_link.clone(),
            color: self.hot_spot_color.clone(),
        })
    }
}

/// [`Options`] resolved once per conversion.
#[derive(Clone, Debug)]
pub struct HotSpotSettings {
    /// Hot spots are synthesized at all.
    pub enabled: bool,
    /// Text outside any group gets no hot spot.
    pub group_only: bool,
    /// Padding on every side, in device units.
    pub padding: Option<f64>,
    /// Anchored label pattern.
    pub label_filter: Option<Regex>,
    /// Navigation target.
    pub link: Option<String>,
    /// Fill color.
    pub color: Option<String>,
}

impl HotSpotSettings {
    /// Whether `label` passes the label filter; no filter accepts everything.
    pub fn accepts_label(&self, label: &str) -> bool {
        self.label_filter
            .as_ref()
            .is_none_or(|filter| filter.is_match(label))
    }
}
