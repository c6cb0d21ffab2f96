// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hot spots: clickable overlays synthesized from restricted text.

use kurbo::{Affine, Rect, Vec2};

use crate::command::RestrictedText;
use crate::group::Group;
use crate::options::HotSpotSettings;
use crate::sanitize::sanitize;

/// Prefix of the overlay ids generated for restricted text.
pub const HOT_SPOT_ID_PREFIX: &str = "rt_";

/// A finished overlay, ready for a sink.
///
/// All string fields are already sanitized.
#[derive(Clone, Debug, PartialEq)]
pub struct HotSpot {
    /// Area covered by the overlay, in user space.
    pub bounds: Rect,
    /// Unique overlay id within one conversion.
    pub id: String,
    /// Identifier of the owning group, or the text itself outside groups.
    pub group_id: String,
    /// Label text.
    pub label: String,
    /// Navigation target, if any.
    pub link: Option<String>,
    /// Fill color, if any.
    pub color: Option<String>,
}

/// Build the hot spot for `text`, or `None` when it is filtered out.
///
/// `seed` numbers the overlay; `groups` is the interpreter's group stack with
/// the innermost group last.
pub fn synthesize(
    text: &RestrictedText,
    settings: &HotSpotSettings,
    groups: &[Group],
    seed: u32,
    transform: Affine,
) -> Option<HotSpot> {
    let group_id = match groups.last() {
        Some(group) => group.identifier(),
        None if settings.group_only => return None,
        None => text.text.as_str(),
    };

    let label = text.text.as_str();
    if !settings.accepts_label(label) {
        return None;
    }

    let bounds = offset_box(text.text_box(), text.offset);
    let bounds = pad_box(bounds, settings.padding, transform);

    Some(HotSpot {
        bounds,
        id: sanitize(Some(format!("{HOT_SPOT_ID_PREFIX}{seed}").as_str())),
        group_id: sanitize(Some(group_id)),
        label: sanitize(Some(label)),
        link: settings.link.as_deref().map(|link| sanitize(Some(link))),
        color: settings.color.as_deref().map(|color| sanitize(Some(color))),
    })
}

/// Shift a text box by its rendering offset.
///
/// The horizontal offset adds and the vertical offset subtracts, following the
/// baseline convention of the text coordinate system.
pub fn offset_box(bounds: Rect, offset: Vec2) -> Rect {
    bounds + Vec2::new(offset.x, -offset.y)
}

/// Grow `bounds` on every side by `padding` divided by the horizontal scale of `transform`.
///
/// Both axes use the horizontal scale. A missing padding, or a transform with no
/// horizontal scale, leaves the box unchanged.
pub fn pad_box(bounds: Rect, padding: Option<f64>, transform: Affine) -> Rect {
    let Some(padding) = padding else {
        return bounds;
    };
    let scale_x = transform.as_coeffs()[0].abs();
    if scale_x == 0.0 || !scale_x.is_finite() {
        tracing::warn!(scale_x, "transform has no usable horizontal scale; hot spot padding skipped");
        return bounds;
    }
    let pad = padding / scale_x;
    bounds.inflate(pad, pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupIndex;
    use crate::options::Options;
    use kurbo::{Point, Size};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::from_origin_size((x, y), (w, h))
    }

    fn text(label: &str) -> RestrictedText {
        RestrictedText {
            position: Point::new(10.0, 20.0),
            extent: Size::new(30.0, 40.0),
            text: label.into(),
            offset: Vec2::new(5.0, 10.0),
        }
    }

    #[test]
    fn offset_adds_horizontally_and_subtracts_vertically() {
        let moved = offset_box(rect(10.0, 20.0, 30.0, 40.0), Vec2::new(5.0, 10.0));
        assert_eq!(moved, rect(15.0, 10.0, 30.0, 40.0));
    }

    #[test]
    fn padding_uses_horizontal_scale_for_both_axes() {
        let padded = pad_box(
            rect(10.0, 20.0, 30.0, 40.0),
            Some(10.0),
            Affine::scale(2.0),
        );
        assert_eq!(padded, rect(5.0, 15.0, 40.0, 50.0));

        // A different vertical scale does not change the vertical padding.
        let padded = pad_box(
            rect(10.0, 20.0, 30.0, 40.0),
            Some(10.0),
            Affine::scale_non_uniform(-2.0, 8.0),
        );
        assert_eq!(padded, rect(5.0, 15.0, 40.0, 50.0));
    }

    #[test]
    fn no_padding_leaves_box_unchanged() {
        let bounds = rect(10.0, 20.0, 30.0, 40.0);
        assert_eq!(pad_box(bounds, None, Affine::scale(2.0)), bounds);
    }

    #[test]
    fn zero_scale_skips_padding() {
        let bounds = rect(10.0, 20.0, 30.0, 40.0);
        assert_eq!(pad_box(bounds, Some(3.0), Affine::scale(0.0)), bounds);
    }

    #[test]
    fn innermost_group_owns_the_hot_spot() {
        let settings = Options::with_hot_spots().resolve().unwrap();
        let groups = [Group::new(GroupIndex(0), "outer"), Group::new(GroupIndex(1), "inner")];
        let hs = synthesize(&text("PN-1"), &settings, &groups, 7, Affine::IDENTITY).unwrap();
        assert_eq!(hs.id, "rt_7");
        assert_eq!(hs.group_id, "inner");
        assert_eq!(hs.label, "PN-1");
        assert_eq!(hs.bounds, rect(15.0, 10.0, 30.0, 40.0));
        assert_eq!(hs.link, None);
        assert_eq!(hs.color, None);
    }

    #[test]
    fn text_outside_groups_owns_itself() {
        let settings = Options::with_hot_spots().resolve().unwrap();
        let hs = synthesize(&text("PN-1"), &settings, &[], 0, Affine::IDENTITY).unwrap();
        assert_eq!(hs.group_id, "PN-1");
    }

    #[test]
    fn group_only_rejects_text_outside_groups() {
        let settings = Options {
            hot_spot_in_application_structure_only: true,
            ..Options::with_hot_spots()
        }
        .resolve()
        .unwrap();
        assert!(synthesize(&text("PN-1"), &settings, &[], 0, Affine::IDENTITY).is_none());
    }

    #[test]
    fn label_filter_rejects_non_matching_text() {
        let settings = Options {
            hot_spot_regex: Some("[0-9]+".into()),
            ..Options::with_hot_spots()
        }
        .resolve()
        .unwrap();
        assert!(synthesize(&text("PN-1"), &settings, &[], 0, Affine::IDENTITY).is_none());
        assert!(synthesize(&text("42"), &settings, &[], 0, Affine::IDENTITY).is_some());
    }

    #[test]
    fn strings_are_sanitized() {
        let settings = Options {
            hot_spot_link: Some("http://host/a?b='c'".into()),
            hot_spot_color: Some("red\" onload=\"x".into()),
            ..Options::with_hot_spots()
        }
        .resolve()
        .unwrap();
        let groups = [Group::new(GroupIndex(0), "g<1>")];
        let hs = synthesize(&text("a'b"), &settings, &groups, 1, Affine::IDENTITY).unwrap();
        assert_eq!(hs.group_id, "g1");
        assert_eq!(hs.label, "ab");
        assert_eq!(hs.link.as_deref(), Some("http://host/abc"));
        assert_eq!(hs.color.as_deref(), Some("red onloadx"));
    }
}
