//! Consuming multi-segment routes waypoint by waypoint.
//!
//! ```rust,ignore
//! let segments = find_multi_layer_path(&world, here, there, sx, sy, gx, gy, me, 1.0, &opts)?;
//! let mut follower = PathFollower::new(segments, here);
//! while let Some(pos) = follower.next_position(&world) {
//!     steer_towards(pos);
//!     if arrived_at(pos) {
//!         if let FollowEvent::LayerChanged { from, to } = follower.reached_waypoint() {
//!             world.move_entity(agent, from, to)?;
//!         }
//!     }
//! }
//! ```

use std::collections::VecDeque;

use nav_core::{LayerId, Node, WorldPos};
use nav_search::Path;

use crate::NavWorld;

/// What happened when the agent reached its current waypoint.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FollowEvent {
    /// More waypoints remain on the same layer.
    Advanced,
    /// A non-final segment ended; the agent now belongs to layer `to`.
    LayerChanged { from: LayerId, to: LayerId },
    /// The last waypoint of the last segment was consumed.
    Arrived,
}

/// Walks an agent through the segments of a routed query.
#[derive(Clone, Debug)]
pub struct PathFollower {
    segments:       VecDeque<Path>,
    layer:          LayerId,
    goal:           Option<WorldPos>,
    goal_tolerance: f32,
}

impl PathFollower {
    /// Follow `segments` starting on `layer`.
    pub fn new(segments: Vec<Path>, layer: LayerId) -> Self {
        let goal = segments.last().map(|p| p.goal);
        Self {
            segments: segments.into(),
            layer,
            goal,
            goal_tolerance: 0.0,
        }
    }

    /// World-unit distance the goal may drift before the route is stale.
    pub fn with_goal_tolerance(mut self, tolerance: f32) -> Self {
        self.goal_tolerance = tolerance.max(0.0);
        self
    }

    pub fn current_layer(&self) -> LayerId {
        self.layer
    }

    pub fn remaining_segments(&self) -> usize {
        self.segments.len()
    }

    /// `true` if the route contains a failed segment (nothing to follow).
    pub fn is_failed(&self) -> bool {
        self.segments.iter().any(|p| p.is_failed)
    }

    /// The waypoint the agent should steer towards, if any.
    pub fn next_waypoint(&self) -> Option<Node> {
        let segment = self.segments.front()?;
        if segment.is_failed {
            return None;
        }
        segment.smooth_path.front().copied()
    }

    /// World position of [`next_waypoint`](Self::next_waypoint) on the
    /// current layer.
    pub fn next_position(&self, world: &NavWorld) -> Option<WorldPos> {
        let node = self.next_waypoint()?;
        let layer = world.layer(self.layer).ok()?;
        Some(layer.index().node_center(node))
    }

    /// Consume the current waypoint.
    pub fn reached_waypoint(&mut self) -> FollowEvent {
        let Some(segment) = self.segments.front_mut() else {
            return FollowEvent::Arrived;
        };
        segment.smooth_path.pop_front();
        if !segment.is_finished() {
            return FollowEvent::Advanced;
        }

        self.segments.pop_front();
        match self.segments.front() {
            None => FollowEvent::Arrived,
            Some(next) if next.layer != self.layer => {
                let from = self.layer;
                self.layer = next.layer;
                FollowEvent::LayerChanged { from, to: next.layer }
            }
            Some(_) => FollowEvent::Advanced,
        }
    }

    /// `true` if the caller should re-query: the goal moved beyond the
    /// tolerance, the agent is on a different layer than the follower
    /// expects, or the route cannot be followed.
    pub fn is_stale(&self, goal: WorldPos, layer: LayerId) -> bool {
        if layer != self.layer || self.is_failed() {
            return true;
        }
        match self.goal {
            Some(g) => g.distance(goal) > self.goal_tolerance,
            None => true,
        }
    }
}
