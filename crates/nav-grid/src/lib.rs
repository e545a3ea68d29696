//! `nav-grid`: the mutable spatial index every query reads.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`index`]     | `NodeIndex`: node ↔ `(x, y)` ↔ world position                |
//! | [`occupancy`] | `OccupancyGrid`: per-node group-id multisets                 |
//! | [`footprint`] | `FootprintChecker`: sub-sampled accessibility test           |
//! | [`hitbox`]    | `Hitbox`, `Geometry`: entity shapes → occupied nodes         |
//! | [`tiles`]     | `TileKind`, `TileMap`, `Portal`                              |
//! | [`loader`]    | `load_tiles_csv`, `load_tiles_reader`                        |
//! | [`layer`]     | `Layer` aggregate, `Occupant`, maintenance pass              |
//! | [`exclusion`] | `ExclusionGuard`, `Exclusion`: scoped group reassignment     |
//! | [`error`]     | `GridError`, `GridResult<T>`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod exclusion;
pub mod footprint;
pub mod hitbox;
pub mod index;
pub mod layer;
pub mod loader;
pub mod occupancy;
pub mod tiles;


pub use error::{GridError, GridResult};
pub use exclusion::{Exclusion, ExclusionGuard};
pub use footprint::FootprintChecker;
pub use hitbox::{Geometry, Hitbox};
pub use index::NodeIndex;
pub use layer::{Layer, Occupant};
pub use loader::{load_tiles_csv, load_tiles_reader};
pub use occupancy::OccupancyGrid;
pub use tiles::{Portal, TileKind, TileMap};
