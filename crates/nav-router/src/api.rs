//! Function-level query API for behaviour code.
//!
//! Coordinates are world units.  Footprints and goal radii are node units.
//! `ignored` is the querying agent's own group: its occupancy never blocks.

use nav_core::{GroupId, LayerId, Node, WorldPos};
use nav_grid::Layer;
use nav_search::{find_path, line_of_sight, Path, QueryOptions};

use crate::router::{PortalRouter, RouteRequest, Router};
use crate::{NavWorld, RouterResult};

/// Path on one layer.  See [`nav_search::find_path`].
///
/// # Panics
/// Panics if either position lies outside the layer's padded grid.
#[allow(clippy::too_many_arguments)]
pub fn find_single_layer_path(
    layer:     &Layer,
    start_x:   f32,
    start_y:   f32,
    goal_x:    f32,
    goal_y:    f32,
    ignored:   GroupId,
    footprint: f32,
    options:   &QueryOptions,
) -> Path {
    find_path(
        layer,
        WorldPos::new(start_x, start_y),
        WorldPos::new(goal_x, goal_y),
        ignored,
        footprint,
        options,
    )
}

/// Path from one layer to another through [`PortalRouter`].
///
/// Returns one or two segments; fails only for unknown layer ids.
#[allow(clippy::too_many_arguments)]
pub fn find_multi_layer_path(
    world:       &NavWorld,
    start_layer: LayerId,
    goal_layer:  LayerId,
    start_x:     f32,
    start_y:     f32,
    goal_x:      f32,
    goal_y:      f32,
    ignored:     GroupId,
    footprint:   f32,
    options:     &QueryOptions,
) -> RouterResult<Vec<Path>> {
    let req = RouteRequest {
        start_layer,
        goal_layer,
        start: WorldPos::new(start_x, start_y),
        goal: WorldPos::new(goal_x, goal_y),
        ignored,
        footprint,
        options: *options,
    };
    PortalRouter.route(world, &req)
}

/// Could an agent of radius `footprint` stand at `(x, y)`?
///
/// Tests the node nearest the position.  Positions with no node (beyond the
/// padding ring) are inaccessible.
pub fn position_is_accessible(layer: &Layer, x: f32, y: f32, ignored: GroupId, footprint: f32) -> bool {
    let index = layer.index();
    let (nx, ny) = index.closest_coords(WorldPos::new(x, y));
    index
        .try_node_of(nx, ny)
        .is_some_and(|node| layer.is_accessible(node, ignored, footprint))
}

/// Straight-line walkability between two positions, with the same clearance
/// the smoother uses.
pub fn path_is_clear(
    layer:     &Layer,
    start_x:   f32,
    start_y:   f32,
    end_x:     f32,
    end_y:     f32,
    ignored:   GroupId,
    footprint: f32,
) -> bool {
    let index = layer.index();
    let node_at = |x: f32, y: f32| {
        let (nx, ny) = index.closest_coords(WorldPos::new(x, y));
        index.try_node_of(nx, ny)
    };
    match (node_at(start_x, start_y), node_at(end_x, end_y)) {
        (Some(from), Some(to)) => line_of_sight(layer, from, to, ignored, footprint),
        _ => false,
    }
}

/// Smooth an externally supplied raw path.  See [`nav_search::smooth_path`].
pub fn smooth_path(layer: &Layer, raw_path: &[Node], ignored: GroupId, footprint: f32) -> Vec<Node> {
    nav_search::smooth_path(layer, raw_path, ignored, footprint)
}
