//! Error types for cellgrid-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellgrid-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Text that is not a `letter + digits` cell address
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Coordinates outside the grid
    #[error("Cell ({col}, {row}) out of bounds for a {width}x{height} grid")]
    OutOfBounds {
        col: u32,
        row: u32,
        width: u16,
        height: u32,
    },

    /// Grid dimensions outside the addressable range
    #[error("Invalid grid dimensions {width}x{height} (max: {max_width}x{max_height})")]
    InvalidDimensions {
        width: u16,
        height: u32,
        max_width: u16,
        max_height: u32,
    },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
