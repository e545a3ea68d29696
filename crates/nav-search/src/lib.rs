//! `nav-search`: single-layer path queries.
//!
//! All functions take the [`Layer`](nav_grid::Layer) they read explicitly
//! and never mutate it; a query sees one consistent occupancy snapshot.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`heap`]      | `HeapEntry`, `OpenSet`: binary heap with back-references  |
//! | [`astar`]     | `find_path`: bounded A* with failure policies             |
//! | [`smoothing`] | `GridRay`, `line_of_sight`, `smooth_path`                 |
//! | [`path`]      | `Path`, `QueryOptions`, `FailurePolicy`                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Path` and options.  |

pub mod astar;
pub mod heap;
pub mod path;
pub mod smoothing;


pub use astar::find_path;
pub use heap::{HeapEntry, OpenSet};
pub use path::{FailurePolicy, Path, QueryOptions};
pub use smoothing::{line_of_sight, smooth_path, GridRay};
