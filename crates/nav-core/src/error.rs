//! Engine error type.
//!
//! "No path exists" is never an error: it is a regular query outcome.  The
//! variants here cover host mistakes the engine can recover from (bad
//! configuration, unknown layers or entities).  Corrupted grid state panics.

use thiserror::Error;

use crate::{EntityId, LayerId};

/// The top-level error type for `nav-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("layer {0} not found")]
    LayerNotFound(LayerId),

    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("entity {0} is already registered")]
    DuplicateEntity(EntityId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `nav-*` crates.
pub type NavResult<T> = Result<T, NavError>;
