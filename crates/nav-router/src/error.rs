//! Router and world error type.

use thiserror::Error;

use nav_core::{EntityId, LayerId, NavError, WorldPos};
use nav_grid::GridError;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Nav(#[from] NavError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("entity {entity} is on layer {actual}, not {expected}")]
    WrongLayer {
        entity:   EntityId,
        expected: LayerId,
        actual:   LayerId,
    },

    #[error("portal at {pos} has no node on layer {layer}")]
    PortalOutsideLayer {
        pos:   WorldPos,
        layer: LayerId,
    },
}

pub type RouterResult<T> = Result<T, RouterError>;
