//! patrol: two-layer navigation demo for the tribe_nav engine.
//!
//! Builds a surface and a cave layer from an embedded tile CSV, drops four
//! agents from two tribes onto it, and walks them between patrol points for
//! a fixed number of ticks.  Agent 1 starts on the surface and has to find
//! the dropdown to reach its cave patrol.
//!
//! ```text
//! cargo run -p patrol -- [ticks] [--verbose]
//! RUST_LOG=nav_search=debug cargo run -p patrol
//! ```

mod logging;

use std::io::Cursor;

use anyhow::{Context, Result};

use nav_core::{EntityId, GroupId, LayerId, NavConfig, WorldPos};
use nav_grid::{load_tiles_reader, Geometry};
use nav_router::{find_multi_layer_path, FollowEvent, NavWorld, PathFollower};
use nav_search::{FailurePolicy, Path, QueryOptions};

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_TICKS: u64 = 400;
const MAP_WIDTH:     u32 = 12;
const MAP_HEIGHT:    u32 = 8;
const LAYER_COUNT:   usize = 2;

/// World units an agent covers per tick.
const SPEED:         f32 = 20.0;
/// Hitbox radius in world units.
const AGENT_RADIUS:  f32 = 6.0;
/// Footprint in node units.
const FOOTPRINT:     f32 = 0.5;
/// A path end this close to the patrol point counts as arrival.
const ARRIVAL_RADIUS: f32 = 16.0;

const SURFACE: LayerId = LayerId::SURFACE;
const CAVE:    LayerId = SURFACE.below();

// ── Terrain ───────────────────────────────────────────────────────────────────

// Surface: a ridge down column 5 with a pass at the bottom, one dropdown.
// Cave: a ledge along row 4 with a gap on the left.
const TILES_CSV: &str = "\
layer,x,y,kind\n\
0,5,0,wall\n\
0,5,1,wall\n\
0,5,2,wall\n\
0,5,3,wall\n\
0,5,4,wall\n\
0,5,5,wall\n\
0,10,1,dropdown\n\
1,2,4,wall\n\
1,3,4,wall\n\
1,4,4,wall\n\
1,5,4,wall\n\
1,6,4,wall\n\
1,7,4,wall\n\
1,8,4,wall\n\
1,9,4,wall\n\
1,10,4,wall\n\
1,11,4,wall\n\
";

/// World position of the centre node of tile `(tx, ty)` under `config`.
fn tile_center(config: &NavConfig, tx: u32, ty: u32) -> WorldPos {
    let g = &config.grid;
    let half = g.nodes_per_tile / 2;
    WorldPos::new(
        (tx * g.nodes_per_tile + half) as f32 * g.node_separation,
        (ty * g.nodes_per_tile + half) as f32 * g.node_separation,
    )
}

// ── Agents ────────────────────────────────────────────────────────────────────

struct Agent {
    id:       EntityId,
    tribe:    GroupId,
    layer:    LayerId,
    pos:      WorldPos,
    /// Patrol points, visited in order and cycled.
    patrol:   Vec<(LayerId, WorldPos)>,
    target:   usize,
    /// Entity this agent may walk through, on any layer.
    escort:   Option<EntityId>,
    follower: Option<PathFollower>,
}

impl Agent {
    fn goal(&self) -> (LayerId, WorldPos) {
        self.patrol[self.target]
    }

    fn geometry(&self) -> Geometry {
        Geometry::circle(self.pos, AGENT_RADIUS, true)
    }
}

#[derive(Default)]
struct Stats {
    queries:       usize,
    failed:        usize,
    arrivals:      usize,
    layer_changes: usize,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// Route `agent` to its current patrol point, passing through its escort.
fn plan(world: &mut NavWorld, agent: &Agent) -> Result<Vec<Path>> {
    let (goal_layer, goal) = agent.goal();
    let options = QueryOptions::default().with_failure(FailurePolicy::ReturnClosest);

    let escort: Vec<EntityId> = agent
        .escort
        .filter(|e| world.entity_layer(*e).is_some())
        .into_iter()
        .collect();
    let guard = world.exclude(&escort, agent.tribe)?;

    Ok(find_multi_layer_path(
        &guard,
        agent.layer,
        goal_layer,
        agent.pos.x,
        agent.pos.y,
        goal.x,
        goal.y,
        agent.tribe,
        FOOTPRINT,
        &options,
    )?)
}

/// Advance `agent` by one tick.
fn step(world: &mut NavWorld, agent: &mut Agent, tick: u64, stats: &mut Stats) -> Result<()> {
    let (goal_layer, goal) = agent.goal();
    let stale = agent
        .follower
        .as_ref()
        .is_none_or(|f| f.is_stale(goal, agent.layer));

    if stale {
        let segments = plan(world, agent)?;
        stats.queries += 1;
        let follower = PathFollower::new(segments, agent.layer);
        if follower.is_failed() {
            stats.failed += 1;
            log::warn!(
                "tick {tick}: entity {} cannot reach {goal} on layer {goal_layer}, skipping patrol point",
                agent.id
            );
            agent.target = (agent.target + 1) % agent.patrol.len();
            agent.follower = None;
            return Ok(());
        }
        agent.follower = Some(follower);
    }

    let Some(follower) = agent.follower.as_mut() else {
        return Ok(());
    };

    let mut budget = SPEED;
    while let Some(waypoint) = follower.next_position(world) {
        let dist = agent.pos.distance(waypoint);
        if dist > budget {
            let t = budget / dist;
            agent.pos = WorldPos::new(
                agent.pos.x + (waypoint.x - agent.pos.x) * t,
                agent.pos.y + (waypoint.y - agent.pos.y) * t,
            );
            break;
        }
        budget -= dist;
        agent.pos = waypoint;

        match follower.reached_waypoint() {
            FollowEvent::Advanced => {}
            FollowEvent::LayerChanged { from, to } => {
                world.move_entity(agent.id, from, to)?;
                agent.layer = to;
                stats.layer_changes += 1;
                log::info!("tick {tick}: entity {} dropped from layer {from} to layer {to}", agent.id);
            }
            FollowEvent::Arrived => {
                agent.follower = None;
                if agent.layer == goal_layer && agent.pos.distance(goal) <= ARRIVAL_RADIUS {
                    stats.arrivals += 1;
                    log::info!("tick {tick}: entity {} reached {goal} on layer {}", agent.id, agent.layer);
                    agent.target = (agent.target + 1) % agent.patrol.len();
                } else {
                    log::debug!("tick {tick}: entity {} ended a partial path, re-planning", agent.id);
                }
                break;
            }
        }
    }

    world.update_entity(agent.id, agent.geometry())?;
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let mut ticks = DEFAULT_TICKS;
    let mut verbose = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => verbose = true,
            n => ticks = n.parse().with_context(|| format!("invalid tick count {n:?}"))?,
        }
    }
    logging::init(verbose);

    let config = NavConfig::default();
    let tiles = load_tiles_reader(Cursor::new(TILES_CSV), LAYER_COUNT, MAP_WIDTH, MAP_HEIGHT)
        .context("loading embedded tile map")?;
    let mut world = NavWorld::from_tiles(config.clone(), tiles)?;
    log::info!(
        "world: {} layers of {MAP_WIDTH}x{MAP_HEIGHT} tiles, {} dropdowns on the surface",
        world.layer_count(),
        world.layer(SURFACE)?.portal_count()
    );

    let at = |tx, ty| tile_center(&config, tx, ty);
    let mut agents = vec![
        Agent {
            id:       EntityId(0),
            tribe:    GroupId(1),
            layer:    SURFACE,
            pos:      at(1, 1),
            patrol:   vec![(SURFACE, at(10, 6)), (SURFACE, at(1, 1))],
            target:   0,
            escort:   None,
            follower: None,
        },
        Agent {
            id:       EntityId(1),
            tribe:    GroupId(1),
            layer:    SURFACE,
            pos:      at(2, 6),
            patrol:   vec![(CAVE, at(3, 6)), (CAVE, at(10, 6))],
            target:   0,
            escort:   None,
            follower: None,
        },
        Agent {
            id:       EntityId(2),
            tribe:    GroupId(2),
            layer:    CAVE,
            pos:      at(1, 1),
            patrol:   vec![(CAVE, at(10, 7)), (CAVE, at(1, 1))],
            target:   0,
            escort:   None,
            follower: None,
        },
        Agent {
            id:       EntityId(3),
            tribe:    GroupId(2),
            layer:    SURFACE,
            pos:      at(8, 6),
            patrol:   vec![(SURFACE, at(2, 7)), (SURFACE, at(8, 6))],
            target:   0,
            // Truce with agent 0: they may brush past each other.
            escort:   Some(EntityId(0)),
            follower: None,
        },
    ];

    for agent in &agents {
        world.insert_entity(agent.layer, agent.id, agent.tribe, agent.geometry())?;
    }

    let mut stats = Stats::default();
    for tick in 0..ticks {
        for agent in &mut agents {
            step(&mut world, agent, tick, &mut stats)?;
        }
        let refreshed = world.end_tick();
        log::trace!("tick {tick}: {refreshed} entities refreshed");
    }

    println!("=== patrol (tribe_nav demo) ===");
    println!("Ticks:         {ticks}");
    println!("Queries:       {}", stats.queries);
    println!("Failed:        {}", stats.failed);
    println!("Arrivals:      {}", stats.arrivals);
    println!("Layer changes: {}", stats.layer_changes);
    for agent in &agents {
        println!("  entity {} on layer {} at {}", agent.id, agent.layer, agent.pos);
    }
    Ok(())
}
