// SPDX-License-Identifier: MIT
//
// Error types for the screen and its parsing boundaries.
//
// Drawing itself never fails on content: colors fall back, unknown styles
// are omitted, out-of-bounds cells are clipped by the buffer. What can fail
// is the device (I/O), using a screen in the wrong lifecycle state, and
// parsing external input (sheets from JSON, configuration from TOML).

use std::io;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("terminal device error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("sheet row {row} is neither a string nor a list of items: {found}")]
    UnrecognizedRow { row: usize, found: String },

    #[error("sheet row {row}, item {index} is not a character, string, or [content, options] pair: {found}")]
    UnrecognizedItem {
        row: usize,
        index: usize,
        found: String,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Operations attempted in the wrong screen state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("screen is already started")]
    AlreadyStarted,

    #[error("screen is not started")]
    NotStarted,
}
