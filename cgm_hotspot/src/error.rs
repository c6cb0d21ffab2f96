// Copyright 2025 the CGM Hotspot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Result alias for conversions.
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons a conversion fails.
///
/// Structural errors carry the position of the offending command in the input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An end of group arrived while no group was open.
    #[error("malformed command stream: end of group at command {index} has no open group")]
    MalformedStream {
        /// Position of the command in the input.
        index: usize,
    },

    /// An end of figure arrived while no figure buffer was live.
    #[error("malformed command stream: end of figure at command {index} has no open figure")]
    MissingFigureBuffer {
        /// Position of the command in the input.
        index: usize,
    },

    /// The hot-spot label pattern does not compile.
    #[error("invalid hot spot regex: {0}")]
    InvalidHotSpotRegex(#[from] regex::Error),
}

impl Error {
    /// Whether the error comes from the structure of the command stream.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::MalformedStream { .. } | Self::MissingFigureBuffer { .. }
        )
    }
}
