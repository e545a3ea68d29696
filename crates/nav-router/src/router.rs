//! Multi-layer routing trait and the default portal router.
//!
//! # Pluggability
//!
//! The public API routes through the [`Router`] trait, so hosts with richer
//! layer graphs (several hops, ladders going up) can supply their own
//! implementation.  The default [`PortalRouter`] handles a single drop:
//!
//! ```text
//!   start layer:  start ──A*──▶ nearest dropdown
//!   goal layer:             dropdown ──A*──▶ goal
//! ```
//!
//! The result is an ordered list of one or two [`Path`] segments.  A
//! follower switches layer after finishing every non-final segment.

use nav_core::{GroupId, LayerId, WorldPos};
use nav_search::{find_path, Path, QueryOptions};

use crate::{NavWorld, RouterError, RouterResult};

// ── RouteRequest ──────────────────────────────────────────────────────────────

/// Everything a multi-layer query needs besides the world itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RouteRequest {
    pub start_layer: LayerId,
    pub goal_layer:  LayerId,
    pub start:       WorldPos,
    pub goal:        WorldPos,
    /// Group treated as passable (the querying agent's own).
    pub ignored:     GroupId,
    /// Agent radius in node units.
    pub footprint:   f32,
    pub options:     QueryOptions,
}

// ── Router trait ──────────────────────────────────────────────────────────────

pub trait Router {
    /// Route from `req.start` on `req.start_layer` to `req.goal` on
    /// `req.goal_layer`.
    ///
    /// "No path" is reported through the returned segments, never as an
    /// error.  Errors are reserved for malformed requests (unknown layers).
    fn route(&self, world: &NavWorld, req: &RouteRequest) -> RouterResult<Vec<Path>>;
}

// ── PortalRouter ──────────────────────────────────────────────────────────────

/// Drops through the dropdown tile nearest the start position.
///
/// | Situation                               | Segments returned            |
/// |-----------------------------------------|------------------------------|
/// | same layer                              | one query with caller opts   |
/// | no dropdown on the start layer          | one failed segment           |
/// | first leg fails or stops short of portal| the first leg only           |
/// | first leg reaches the portal            | first leg, then second leg   |
///
/// The first leg always targets the exact portal node (`goal_radius = 0`);
/// the caller's failure policy and node budget still apply, and with no
/// budget the first leg derives one from its own distance.  The second leg
/// uses the caller's options unchanged.
#[derive(Copy, Clone, Debug, Default)]
pub struct PortalRouter;

impl Router for PortalRouter {
    fn route(&self, world: &NavWorld, req: &RouteRequest) -> RouterResult<Vec<Path>> {
        let start_layer = world.layer(req.start_layer)?;

        if req.start_layer == req.goal_layer {
            let path = find_path(start_layer, req.start, req.goal, req.ignored, req.footprint, &req.options);
            return Ok(vec![path]);
        }

        let goal_layer = world.layer(req.goal_layer)?;

        let Some(portal) = start_layer.nearest_portal(req.start) else {
            log::debug!(
                "layer {}: no dropdown to reach layer {}",
                req.start_layer,
                req.goal_layer
            );
            return Ok(vec![Path::failed(req.start_layer, req.goal, Vec::new())]);
        };

        let (px, py) = goal_layer.index().closest_coords(portal.center);
        if !goal_layer.index().in_padded_bounds(px, py) {
            return Err(RouterError::PortalOutsideLayer { pos: portal.center, layer: req.goal_layer });
        }

        let first_opts = QueryOptions { goal_radius: 0.0, ..req.options };
        let first = find_path(start_layer, req.start, portal.center, req.ignored, req.footprint, &first_opts);

        let portal_node = start_layer.index().closest_node(portal.center);
        if first.is_failed || first.end_node() != Some(portal_node) {
            log::debug!(
                "layer {}: could not reach dropdown ({}, {})",
                req.start_layer,
                portal.tile_x,
                portal.tile_y
            );
            return Ok(vec![first]);
        }

        let second = find_path(goal_layer, portal.center, req.goal, req.ignored, req.footprint, &req.options);
        Ok(vec![first, second])
    }
}
