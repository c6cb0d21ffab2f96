// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filtering of strings placed into generated markup attributes.

/// Whether `c` may appear in a generated attribute value.
///
/// Letters and digits in any script, `-`, `_`, `.`, `:`, `,`, `/`, `(`, `)` and space.
pub fn is_attribute_safe(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | ',' | '/' | '(' | ')' | ' ')
}

/// Strip every character that is not [attribute safe](is_attribute_safe).
///
/// `None` becomes the empty string.
pub fn sanitize(value: Option<&str>) -> String {
    value
        .map(|v| v.chars().filter(|c| is_attribute_safe(*c)).collect())
        .unwrap_or_default()
}
