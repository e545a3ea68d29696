//! Query options and the `Path` result type.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use nav_core::{LayerId, Node, WorldPos};

// ── QueryOptions ──────────────────────────────────────────────────────────────

/// What a query returns when the goal cannot be reached within budget.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailurePolicy {
    /// A failed `Path` with empty node sequences.
    #[default]
    None,
    /// The best partial path: to the evaluated node nearest the goal.
    ReturnClosest,
}

/// Per-query tuning supplied by the caller.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryOptions {
    /// Success tolerance in node units.  `0` requires the exact goal node.
    pub goal_radius: f32,
    pub failure:     FailurePolicy,
    /// Maximum nodes to expand.  `None` derives it from the query distance
    /// via `SearchConfig::default_budget`.
    pub node_budget: Option<NonZeroUsize>,
}

impl QueryOptions {
    pub fn with_goal_radius(mut self, radius: f32) -> Self {
        self.goal_radius = radius.max(0.0);
        self
    }

    pub fn with_failure(mut self, failure: FailurePolicy) -> Self {
        self.failure = failure;
        self
    }

    pub fn with_budget(mut self, budget: NonZeroUsize) -> Self {
        self.node_budget = Some(budget);
        self
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Result of one single-layer query.
///
/// `raw_path` is fixed once produced; `smooth_path` is the waypoint queue a
/// follower drains as the agent moves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub layer:         LayerId,
    /// Goal position as requested (world units).
    pub goal:          WorldPos,
    raw_path:          Vec<Node>,
    pub smooth_path:   VecDeque<Node>,
    /// Closed set in expansion order, for diagnostics.
    pub visited_nodes: Vec<Node>,
    pub is_failed:     bool,
}

impl Path {
    pub fn new(layer: LayerId, goal: WorldPos, raw_path: Vec<Node>, smooth: Vec<Node>, visited_nodes: Vec<Node>) -> Self {
        Self {
            layer,
            goal,
            raw_path,
            smooth_path: smooth.into(),
            visited_nodes,
            is_failed: false,
        }
    }

    /// A failed result: no nodes to follow, visited nodes kept.
    pub fn failed(layer: LayerId, goal: WorldPos, visited_nodes: Vec<Node>) -> Self {
        Self {
            layer,
            goal,
            raw_path: Vec::new(),
            smooth_path: VecDeque::new(),
            visited_nodes,
            is_failed: true,
        }
    }

    /// Node-by-node path from the start, as found by the search.
    pub fn raw_path(&self) -> &[Node] {
        &self.raw_path
    }

    /// Last node of the raw path: where following this path ends.
    pub fn end_node(&self) -> Option<Node> {
        self.raw_path.last().copied()
    }

    /// `true` once every waypoint has been consumed.
    pub fn is_finished(&self) -> bool {
        self.smooth_path.is_empty()
    }
}
