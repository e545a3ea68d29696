//! `nav-router`: the engine's outer surface.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`world`]     | `NavWorld`: layers, entity registry, `end_tick` maintenance  |
//! | [`router`]    | `Router` trait, `PortalRouter`, `RouteRequest`               |
//! | [`api`]       | The five query functions behaviour code calls                |
//! | [`follower`]  | `PathFollower`, `FollowEvent`                                |
//! | [`exclusion`] | `WorldExclusionGuard`: pass-through across every layer       |
//! | [`error`]     | `RouterError`, `RouterResult<T>`                             |
//!
//! # Quick start
//!
//! ```rust,ignore
//! let tiles = load_tiles_csv(Path::new("map.csv"), 2, 32, 32)?;
//! let mut world = NavWorld::from_tiles(NavConfig::default(), tiles)?;
//! world.insert_entity(LayerId(0), EntityId(0), GroupId(1), Geometry::circle(pos, 8.0, true))?;
//! world.end_tick();
//!
//! let layer = world.layer(LayerId(0))?;
//! let path = find_single_layer_path(layer, 40.0, 40.0, 400.0, 300.0, GroupId(1), 1.0, &QueryOptions::default());
//! ```

pub mod api;
pub mod error;
pub mod exclusion;
pub mod follower;
pub mod router;
pub mod world;

#[cfg(test)]
mod tests;

pub use api::{
    find_multi_layer_path, find_single_layer_path, path_is_clear, position_is_accessible, smooth_path,
};
pub use error::{RouterError, RouterResult};
pub use exclusion::WorldExclusionGuard;
pub use follower::{FollowEvent, PathFollower};
pub use router::{PortalRouter, RouteRequest, Router};
pub use world::NavWorld;
