//! Engine configuration.
//!
//! # Units
//!
//! Two distance units appear throughout the engine:
//!
//! - **world units**: the host's continuous coordinate space (`WorldPos`).
//! - **node units**: multiples of `node_separation`; footprints, goal radii
//!   and heuristics are all expressed in node units.
//!
//! The defaults below match a 64-unit tile split into a 4×4 block of nodes.

use crate::{NavError, NavResult};

// ── GridConfig ────────────────────────────────────────────────────────────────

/// Discretisation and occupancy parameters shared by every layer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridConfig {
    /// World units between two orthogonally adjacent nodes.  Default: 16.
    pub node_separation: f32,

    /// Nodes along one edge of a terrain tile.  Default: 4 (64-unit tiles).
    pub nodes_per_tile: u32,

    /// Border nodes added on every side of the playable area so footprint
    /// checks near the edge stay addressable.  Default: 4.
    pub padding: u32,

    /// Sub-samples per axis used by the footprint checker.  Default: 3.
    pub sample_resolution: u32,

    /// Extra node-unit radius added around solid hitboxes.  Default: 0.5.
    pub hard_margin: f32,

    /// Node-unit radius removed from non-solid circular hitboxes so paths
    /// can graze past them.  Default: 0.5.
    pub soft_shrink: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            node_separation:   16.0,
            nodes_per_tile:    4,
            padding:           4,
            sample_resolution: 3,
            hard_margin:       0.5,
            soft_shrink:       0.5,
        }
    }
}

impl GridConfig {
    /// World units along one edge of a tile.
    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.node_separation * self.nodes_per_tile as f32
    }
}

// ── SearchConfig ──────────────────────────────────────────────────────────────

/// Tuning knobs for the A* core and the smoother.
///
/// The budget formula `⌊distance × budget_per_distance⌋ + budget_base` is an
/// empirically tuned cap on expanded nodes per query; it bounds the
/// worst-case CPU cost of one query inside a simulation tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Budget nodes granted per node unit of straight-line distance.  Default: 4.
    pub budget_per_distance: f32,

    /// Budget nodes granted regardless of distance.  Default: 40.
    pub budget_base: usize,

    /// Footprint inflation (node units) used by line-of-sight checks while
    /// smoothing.  Default: 0.5.
    pub los_margin: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget_per_distance: 4.0,
            budget_base:         40,
            los_margin:          0.5,
        }
    }
}

impl SearchConfig {
    /// Default node budget for a query spanning `distance` node units.
    #[inline]
    pub fn default_budget(&self, distance: f32) -> usize {
        (distance * self.budget_per_distance).floor() as usize + self.budget_base
    }
}

// ── NavConfig ─────────────────────────────────────────────────────────────────

/// Top-level engine configuration.
///
/// Typically loaded from a RON/JSON file by the host and handed to
/// `NavWorld::new`.  Every layer keeps a copy.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavConfig {
    pub grid:   GridConfig,
    pub search: SearchConfig,
}

impl NavConfig {
    /// Reject configurations the engine cannot operate with.
    pub fn validate(&self) -> NavResult<()> {
        let g = &self.grid;
        if !(g.node_separation > 0.0) {
            return Err(NavError::Config(format!(
                "node_separation must be positive, got {}",
                g.node_separation
            )));
        }
        if g.nodes_per_tile == 0 {
            return Err(NavError::Config("nodes_per_tile must be at least 1".into()));
        }
        if g.sample_resolution == 0 {
            return Err(NavError::Config("sample_resolution must be at least 1".into()));
        }
        if g.hard_margin < 0.0 || g.soft_shrink < 0.0 {
            return Err(NavError::Config("collision margins must be non-negative".into()));
        }
        let s = &self.search;
        if s.budget_per_distance < 0.0 || s.los_margin < 0.0 {
            return Err(NavError::Config("search tuning values must be non-negative".into()));
        }
        if s.budget_base == 0 && s.budget_per_distance == 0.0 {
            return Err(NavError::Config("default node budget would always be zero".into()));
        }
        Ok(())
    }
}
