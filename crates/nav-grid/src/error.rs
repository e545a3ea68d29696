//! Grid-subsystem error type.

use thiserror::Error;

use nav_core::NavError;

/// Errors produced by `nav-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error(transparent)]
    Nav(#[from] NavError),

    #[error("tile ({x}, {y}) is outside the tile map")]
    TileOutOfBounds { x: u32, y: u32 },

    #[error("tile parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GridResult<T> = Result<T, GridError>;
