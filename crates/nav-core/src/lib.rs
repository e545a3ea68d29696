//! `nav-core`: foundational types for the `tribe_nav` pathfinding engine.
//!
//! This crate is a dependency of every other `nav-*` crate.  It intentionally
//! has no `nav-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `Node`, `EntityId`, `LayerId`, `GroupId`              |
//! | [`geo`]         | `WorldPos`, distances in world units                  |
//! | [`config`]      | `NavConfig`, `GridConfig`, `SearchConfig`             |
//! | [`error`]       | `NavError`, `NavResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{GridConfig, NavConfig, SearchConfig};
pub use error::{NavError, NavResult};
pub use geo::WorldPos;
pub use ids::{EntityId, GroupId, LayerId, Node};
