//! Unit tests for nav-router.
//!
//! Worlds use a unit configuration (1 node per tile, separation 1), so world
//! positions, tile coordinates, and node coordinates coincide.

#[cfg(test)]
mod helpers {
    use nav_core::{LayerId, NavConfig};
    use nav_grid::{TileKind, TileMap};

    use crate::NavWorld;

    pub fn unit_config() -> NavConfig {
        let mut cfg = NavConfig::default();
        cfg.grid.node_separation = 1.0;
        cfg.grid.nodes_per_tile = 1;
        cfg
    }

    /// Two 10×10 layers; layer 0 has a dropdown at `(8, 2)`.
    pub fn two_layer_world() -> NavWorld {
        let mut surface = TileMap::new(10, 10);
        surface.set(8, 2, TileKind::Dropdown).unwrap();
        let cave = TileMap::new(10, 10);
        NavWorld::from_tiles(unit_config(), vec![surface, cave]).unwrap()
    }

    pub const SURFACE: LayerId = LayerId(0);
    pub const CAVE: LayerId = LayerId(1);
}

// ── NavWorld ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod world {
    use nav_core::{EntityId, GroupId, LayerId, NavConfig, NavError, WorldPos};
    use nav_grid::{Geometry, TileMap};

    use super::helpers::{two_layer_world, unit_config, CAVE, SURFACE};
    use crate::{NavWorld, RouterError};

    fn post(x: f32, y: f32) -> Geometry {
        Geometry::circle(WorldPos::new(x, y), 0.0, true)
    }

    #[test]
    fn invalid_config_rejected() {
        let mut cfg = NavConfig::default();
        cfg.grid.sample_resolution = 0;
        assert!(matches!(NavWorld::new(cfg), Err(RouterError::Nav(NavError::Config(_)))));
    }

    #[test]
    fn layers_are_numbered_in_order() {
        let mut world = NavWorld::new(unit_config()).unwrap();
        assert_eq!(world.add_layer(TileMap::new(4, 4)), LayerId(0));
        assert_eq!(world.add_layer(TileMap::new(4, 4)), LayerId(1));
        assert_eq!(world.layer_count(), 2);
        assert_eq!(world.layer(LayerId(1)).unwrap().id(), LayerId(1));
        assert!(matches!(
            world.layer(LayerId(5)),
            Err(RouterError::Nav(NavError::LayerNotFound(LayerId(5))))
        ));
    }

    #[test]
    fn entity_ids_unique_across_layers() {
        let mut world = two_layer_world();
        world.insert_entity(SURFACE, EntityId(1), GroupId(2), post(3.0, 3.0)).unwrap();
        let err = world.insert_entity(CAVE, EntityId(1), GroupId(2), post(3.0, 3.0)).unwrap_err();
        assert!(matches!(err, RouterError::Nav(NavError::DuplicateEntity(_))));
        assert_eq!(world.layer(CAVE).unwrap().entity_count(), 0);
    }

    #[test]
    fn move_entity_transfers_occupancy() {
        let mut world = two_layer_world();
        let id = EntityId(4);
        world.insert_entity(SURFACE, id, GroupId(2), post(3.0, 3.0)).unwrap();

        world.move_entity(id, SURFACE, CAVE).unwrap();
        assert_eq!(world.entity_layer(id), Some(CAVE));

        let surface = world.layer(SURFACE).unwrap();
        assert!(surface.occupancy().is_free(surface.index().node_of(3, 3)));
        let cave = world.layer(CAVE).unwrap();
        assert_eq!(cave.occupancy().groups(cave.index().node_of(3, 3)), &[GroupId(2)]);
    }

    #[test]
    fn move_from_wrong_layer_rejected() {
        let mut world = two_layer_world();
        world.insert_entity(SURFACE, EntityId(4), GroupId(2), post(3.0, 3.0)).unwrap();
        assert!(matches!(
            world.move_entity(EntityId(4), CAVE, SURFACE),
            Err(RouterError::WrongLayer { .. })
        ));
        assert!(world.move_entity(EntityId(4), SURFACE, LayerId(9)).is_err());
        assert_eq!(world.entity_layer(EntityId(4)), Some(SURFACE));
        assert_eq!(world.layer(SURFACE).unwrap().entity_count(), 1);
    }

    #[test]
    fn end_tick_refreshes_every_layer() {
        let mut world = two_layer_world();
        world.insert_entity(SURFACE, EntityId(1), GroupId(2), post(1.0, 1.0)).unwrap();
        world.insert_entity(CAVE, EntityId(2), GroupId(2), post(1.0, 1.0)).unwrap();
        world.update_entity(EntityId(1), post(2.0, 1.0)).unwrap();
        world.update_entity(EntityId(2), post(2.0, 1.0)).unwrap();

        assert_eq!(world.end_tick(), 2);
        assert_eq!(world.end_tick(), 0);
        for layer in world.layers() {
            assert!(layer.occupancy().is_free(layer.index().node_of(1, 1)));
            assert!(!layer.occupancy().is_free(layer.index().node_of(2, 1)));
        }
    }

    #[test]
    fn remove_entity_forgets_layer() {
        let mut world = two_layer_world();
        world.insert_entity(CAVE, EntityId(8), GroupId(2), post(5.0, 5.0)).unwrap();
        world.remove_entity(EntityId(8)).unwrap();
        assert_eq!(world.entity_layer(EntityId(8)), None);
        assert!(world.remove_entity(EntityId(8)).is_err());
    }
}

// ── Multi-layer routing ───────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use std::num::NonZeroUsize;

    use nav_core::{GroupId, LayerId, WorldPos};
    use nav_grid::TileMap;
    use nav_search::{FailurePolicy, QueryOptions};

    use super::helpers::{two_layer_world, unit_config, CAVE, SURFACE};
    use crate::{find_multi_layer_path, NavWorld};

    const ME: GroupId = GroupId(1);
    const ROCK: GroupId = GroupId(9);

    #[test]
    fn same_layer_is_one_segment() {
        let world = two_layer_world();
        let segments =
            find_multi_layer_path(&world, CAVE, CAVE, 1.0, 1.0, 6.0, 6.0, ME, 0.0, &QueryOptions::default())
                .unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].layer, CAVE);
        assert!(!segments[0].is_failed);
    }

    #[test]
    fn drop_through_portal_stitches_two_segments() {
        let world = two_layer_world();
        let segments =
            find_multi_layer_path(&world, SURFACE, CAVE, 1.0, 1.0, 3.0, 8.0, ME, 0.0, &QueryOptions::default())
                .unwrap();
        assert_eq!(segments.len(), 2);

        let (first, second) = (&segments[0], &segments[1]);
        let surface = world.layer(SURFACE).unwrap();
        let cave = world.layer(CAVE).unwrap();

        assert_eq!(first.layer, SURFACE);
        assert!(!first.is_failed);
        assert_eq!(first.end_node(), Some(surface.index().node_of(8, 2)));
        assert_eq!(first.goal, WorldPos::new(8.0, 2.0));

        assert_eq!(second.layer, CAVE);
        assert!(!second.is_failed);
        assert_eq!(second.raw_path()[0], cave.index().node_of(8, 2));
        assert_eq!(second.end_node(), Some(cave.index().node_of(3, 8)));
        assert_eq!(second.goal, WorldPos::new(3.0, 8.0));
    }

    #[test]
    fn no_portal_gives_single_failed_segment() {
        let world = NavWorld::from_tiles(unit_config(), vec![TileMap::new(6, 6), TileMap::new(6, 6)]).unwrap();
        let segments = find_multi_layer_path(
            &world,
            LayerId(0),
            LayerId(1),
            1.0,
            1.0,
            4.0,
            4.0,
            ME,
            0.0,
            &QueryOptions::default(),
        )
        .unwrap();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_failed);
        assert!(segments[0].raw_path().is_empty());
    }

    fn wall_off_portal(world: &mut NavWorld) {
        let layer = world.layer_mut(SURFACE).unwrap();
        for (x, y) in [(7, 1), (8, 1), (9, 1), (7, 2), (9, 2), (7, 3), (8, 3), (9, 3)] {
            let n = layer.index().node_of(x, y);
            layer.occupancy_mut().mark_occupied(n, ROCK);
        }
    }

    #[test]
    fn unreachable_portal_returns_first_leg_only() {
        let mut world = two_layer_world();
        wall_off_portal(&mut world);

        let segments =
            find_multi_layer_path(&world, SURFACE, CAVE, 1.0, 1.0, 3.0, 8.0, ME, 0.0, &QueryOptions::default())
                .unwrap();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_failed);
    }

    #[test]
    fn closest_first_leg_stops_short() {
        let mut world = two_layer_world();
        wall_off_portal(&mut world);
        let opts = QueryOptions::default().with_failure(FailurePolicy::ReturnClosest);

        let segments = find_multi_layer_path(&world, SURFACE, CAVE, 1.0, 1.0, 3.0, 8.0, ME, 0.0, &opts).unwrap();
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].is_failed);
        let portal = world.layer(SURFACE).unwrap().index().node_of(8, 2);
        assert_ne!(segments[0].end_node(), Some(portal));
    }

    #[test]
    fn caller_budget_caps_first_leg() {
        let world = two_layer_world();
        let opts = QueryOptions::default().with_budget(NonZeroUsize::new(5).unwrap());

        let segments = find_multi_layer_path(&world, SURFACE, CAVE, 1.0, 1.0, 3.0, 8.0, ME, 0.0, &opts).unwrap();
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_failed);
        assert_eq!(segments[0].visited_nodes.len(), 5);
    }

    #[test]
    fn unknown_layer_is_an_error() {
        let world = two_layer_world();
        let res =
            find_multi_layer_path(&world, SURFACE, LayerId(3), 1.0, 1.0, 3.0, 8.0, ME, 0.0, &QueryOptions::default());
        assert!(res.is_err());
    }
}

// ── Query API ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod api {
    use nav_core::{EntityId, GroupId, WorldPos};
    use nav_grid::Geometry;
    use nav_search::QueryOptions;

    use super::helpers::{two_layer_world, CAVE};
    use crate::{find_single_layer_path, path_is_clear, position_is_accessible, smooth_path};

    const ME: GroupId = GroupId(1);

    #[test]
    fn accessibility_of_positions() {
        let mut world = two_layer_world();
        world
            .insert_entity(CAVE, EntityId(1), GroupId(5), Geometry::circle(WorldPos::new(5.0, 5.0), 0.0, true))
            .unwrap();
        let layer = world.layer(CAVE).unwrap();

        assert!(position_is_accessible(layer, 2.2, 2.9, ME, 0.0));
        assert!(!position_is_accessible(layer, 5.1, 4.8, ME, 0.0));
        assert!(position_is_accessible(layer, 5.1, 4.8, GroupId(5), 0.0));
        // Padding ring, then beyond it.
        assert!(!position_is_accessible(layer, -1.0, 3.0, ME, 0.0));
        assert!(!position_is_accessible(layer, -50.0, 3.0, ME, 0.0));
    }

    #[test]
    fn clear_lines() {
        let mut world = two_layer_world();
        world
            .insert_entity(CAVE, EntityId(1), GroupId(5), Geometry::circle(WorldPos::new(5.0, 5.0), 0.0, true))
            .unwrap();
        let layer = world.layer(CAVE).unwrap();

        assert!(path_is_clear(layer, 1.0, 1.0, 8.0, 1.0, ME, 0.0));
        assert!(!path_is_clear(layer, 1.0, 5.0, 8.0, 5.0, ME, 0.0));
        assert!(!path_is_clear(layer, 1.0, 1.0, 99.0, 1.0, ME, 0.0));
    }

    #[test]
    fn single_layer_and_smoothing() {
        let world = two_layer_world();
        let layer = world.layer(CAVE).unwrap();
        let path = find_single_layer_path(layer, 0.0, 0.0, 0.0, 7.0, ME, 0.0, &QueryOptions::default());
        assert!(!path.is_failed);
        assert_eq!(path.raw_path().len(), 8);

        let smooth = smooth_path(layer, path.raw_path(), ME, 0.0);
        assert_eq!(smooth, path.smooth_path.iter().copied().collect::<Vec<_>>());
        assert_eq!(smooth.len(), 2);
    }

    #[test]
    fn excluded_ally_can_be_walked_through() {
        let mut world = two_layer_world();
        // A soft ally spanning the whole row y = 4.
        world
            .insert_entity(
                CAVE,
                EntityId(1),
                GroupId(5),
                Geometry::rect(WorldPos::new(4.5, 4.0), 5.0, 0.0, false),
            )
            .unwrap();
        let opts = QueryOptions::default();

        let layer = world.layer(CAVE).unwrap();
        let blocked = find_single_layer_path(layer, 1.0, 1.0, 1.0, 8.0, ME, 0.0, &opts);
        assert!(blocked.is_failed);

        let layer = world.layer_mut(CAVE).unwrap();
        let guard = layer.exclude(&[EntityId(1)], ME).unwrap();
        let through = find_single_layer_path(&guard, 1.0, 1.0, 1.0, 8.0, ME, 0.0, &opts);
        assert!(!through.is_failed);
        drop(guard);

        let layer = world.layer(CAVE).unwrap();
        let again = find_single_layer_path(layer, 1.0, 1.0, 1.0, 8.0, ME, 0.0, &opts);
        assert!(again.is_failed);
    }
}

// ── World exclusion ───────────────────────────────────────────────────────────

#[cfg(test)]
mod exclusion {
    use nav_core::{EntityId, GroupId, WorldPos};
    use nav_grid::Geometry;
    use nav_search::QueryOptions;

    use super::helpers::{two_layer_world, CAVE, SURFACE};
    use crate::{find_multi_layer_path, NavWorld, RouterError};

    const ME: GroupId = GroupId(1);
    const ALLY: GroupId = GroupId(5);
    const WALL_ALLY: EntityId = EntityId(1);
    const LEDGE_ALLY: EntityId = EntityId(2);

    /// Soft allies cut each layer in two: column x = 5 on the surface
    /// (between the start and the dropdown), row y = 5 in the cave (between
    /// the dropdown and the goal).
    fn walled_world() -> NavWorld {
        let mut world = two_layer_world();
        world
            .insert_entity(SURFACE, WALL_ALLY, ALLY, Geometry::rect(WorldPos::new(5.0, 4.5), 0.0, 5.0, false))
            .unwrap();
        world
            .insert_entity(CAVE, LEDGE_ALLY, ALLY, Geometry::rect(WorldPos::new(4.5, 5.0), 5.0, 0.0, false))
            .unwrap();
        world
    }

    fn route(world: &NavWorld) -> Vec<nav_search::Path> {
        find_multi_layer_path(world, SURFACE, CAVE, 1.0, 1.0, 3.0, 8.0, ME, 0.0, &QueryOptions::default()).unwrap()
    }

    #[test]
    fn allies_block_both_legs_without_exclusion() {
        let world = walled_world();
        let segments = route(&world);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].is_failed);
    }

    #[test]
    fn multi_layer_route_walks_through_excluded_allies() {
        let mut world = walled_world();
        {
            let guard = world.exclude(&[WALL_ALLY, LEDGE_ALLY], ME).unwrap();
            assert_eq!(guard.excluded_count(), 2);
            assert_eq!(guard.pass_group(), ME);

            let segments = route(&guard);
            assert_eq!(segments.len(), 2);
            assert!(segments.iter().all(|p| !p.is_failed));

            let surface = guard.layer(SURFACE).unwrap();
            let portal = surface.index().node_of(8, 2);
            assert_eq!(segments[0].end_node(), Some(portal));
            assert!(segments[0].raw_path().iter().any(|&n| surface.index().x_of(n) == 5));

            let cave = guard.layer(CAVE).unwrap();
            assert_eq!(segments[1].end_node(), Some(cave.index().node_of(3, 8)));
            assert!(segments[1].raw_path().iter().any(|&n| cave.index().y_of(n) == 5));
        }

        let surface = world.layer(SURFACE).unwrap();
        assert_eq!(surface.occupancy().groups(surface.index().node_of(5, 3)), &[ALLY]);
        let cave = world.layer(CAVE).unwrap();
        assert_eq!(cave.occupancy().groups(cave.index().node_of(4, 5)), &[ALLY]);
        assert!(route(&world)[0].is_failed);
    }

    #[test]
    fn only_the_first_leg_needs_exclusion() {
        let mut world = walled_world();
        world.remove_entity(LEDGE_ALLY).unwrap();

        let guard = world.exclude(&[WALL_ALLY], ME).unwrap();
        let segments = route(&guard);
        assert_eq!(segments.len(), 2);
        assert!(!segments[0].is_failed);
        assert!(!segments[1].is_failed);
    }

    #[test]
    fn unknown_entity_touches_no_layer() {
        let mut world = walled_world();
        let err = world.exclude(&[WALL_ALLY, EntityId(99)], ME).err();
        assert!(matches!(err, Some(RouterError::Nav(_))));

        let surface = world.layer(SURFACE).unwrap();
        assert_eq!(surface.occupancy().groups(surface.index().node_of(5, 3)), &[ALLY]);
    }
}

// ── PathFollower ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod follower {
    use nav_core::{GroupId, WorldPos};
    use nav_search::QueryOptions;

    use super::helpers::{two_layer_world, CAVE, SURFACE};
    use crate::{find_multi_layer_path, FollowEvent, PathFollower};

    const ME: GroupId = GroupId(1);

    #[test]
    fn walks_both_segments_and_switches_layer() {
        let world = two_layer_world();
        let segments =
            find_multi_layer_path(&world, SURFACE, CAVE, 1.0, 1.0, 3.0, 8.0, ME, 0.0, &QueryOptions::default())
                .unwrap();
        let total: usize = segments.iter().map(|p| p.smooth_path.len()).sum();
        let mut follower = PathFollower::new(segments, SURFACE);
        assert_eq!(follower.remaining_segments(), 2);
        assert_eq!(follower.next_position(&world), Some(WorldPos::new(1.0, 1.0)));

        let mut events = Vec::new();
        for _ in 0..total {
            assert!(follower.next_waypoint().is_some());
            events.push(follower.reached_waypoint());
        }

        assert_eq!(events.last(), Some(&FollowEvent::Arrived));
        let switches: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, FollowEvent::LayerChanged { .. }))
            .collect();
        assert_eq!(switches, vec![&FollowEvent::LayerChanged { from: SURFACE, to: CAVE }]);
        assert_eq!(follower.current_layer(), CAVE);
        assert_eq!(follower.next_waypoint(), None);
        assert_eq!(follower.reached_waypoint(), FollowEvent::Arrived);
    }

    #[test]
    fn staleness() {
        let world = two_layer_world();
        let segments =
            find_multi_layer_path(&world, CAVE, CAVE, 1.0, 1.0, 6.0, 6.0, ME, 0.0, &QueryOptions::default())
                .unwrap();
        let follower = PathFollower::new(segments, CAVE).with_goal_tolerance(1.0);

        assert!(!follower.is_stale(WorldPos::new(6.0, 6.0), CAVE));
        assert!(!follower.is_stale(WorldPos::new(6.5, 6.0), CAVE));
        assert!(follower.is_stale(WorldPos::new(8.0, 6.0), CAVE));
        assert!(follower.is_stale(WorldPos::new(6.0, 6.0), SURFACE));
    }

    #[test]
    fn failed_route_has_nothing_to_follow() {
        let world = two_layer_world();
        // Layer 1 has no dropdown.
        let segments =
            find_multi_layer_path(&world, CAVE, SURFACE, 1.0, 1.0, 3.0, 3.0, ME, 0.0, &QueryOptions::default())
                .unwrap();
        let follower = PathFollower::new(segments, CAVE);
        assert!(follower.is_failed());
        assert_eq!(follower.next_waypoint(), None);
        assert!(follower.is_stale(WorldPos::new(3.0, 3.0), CAVE));
    }
}
