//! Bounded A* over one layer's 8-connected node grid.
//!
//! # Search state
//!
//! Scores live in an arena of [`Record`]s, one per evaluated node, looked up
//! through an `FxHashMap<Node, u32>`.  A node is *evaluated* once it has a
//! record (the start has `g = 0`); it is *closed* once extracted from the
//! open set.  Every evaluated, non-closed record is in the open set.
//!
//! # Termination
//!
//! | Outcome    | Condition                                                |
//! |------------|----------------------------------------------------------|
//! | succeeded  | extracted node is the goal (or within `goal_radius`)     |
//! | exhausted  | open set empty, or `node_budget` nodes expanded          |
//!
//! An exhausted search resolves through the query's [`FailurePolicy`].
//!
//! # Costs
//!
//! Straight steps cost 1 and diagonal steps √2; the heuristic is the
//! Euclidean distance to the goal node in node units, which never
//! overestimates on this grid.

use std::f32::consts::SQRT_2;

use rustc_hash::FxHashMap;

use nav_core::{GroupId, Node, WorldPos};
use nav_grid::{FootprintChecker, Layer, NodeIndex};

use crate::heap::{HeapEntry, OpenSet};
use crate::path::{FailurePolicy, Path, QueryOptions};
use crate::smoothing::smooth_path;

/// `(dx, dy, cost)` for the 8 neighbours.
const NEIGHBOURS: [(i32, i32, f32); 8] = [
    (1, 0, 1.0),
    (-1, 0, 1.0),
    (0, 1, 1.0),
    (0, -1, 1.0),
    (1, 1, SQRT_2),
    (1, -1, SQRT_2),
    (-1, 1, SQRT_2),
    (-1, -1, SQRT_2),
];

const NO_PARENT: u32 = u32::MAX;

// ── Arena record ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Record {
    node:       Node,
    g:          f32,
    f:          f32,
    parent:     u32,
    closed:     bool,
    heap_index: Option<usize>,
}

impl HeapEntry for Record {
    #[inline]
    fn f_score(&self) -> f32 { self.f }
    #[inline]
    fn g_score(&self) -> f32 { self.g }
    #[inline]
    fn heap_index(&self) -> Option<usize> { self.heap_index }
    #[inline]
    fn set_heap_index(&mut self, index: Option<usize>) { self.heap_index = index; }
}

// ── Search ────────────────────────────────────────────────────────────────────

/// One query's working state.
struct Search<'a> {
    index:      &'a NodeIndex,
    checker:    FootprintChecker<'a>,
    ignored:    GroupId,
    footprint:  f32,
    goal:       Node,
    records:    Vec<Record>,
    lookup:     FxHashMap<Node, u32>,
    /// Memoised accessibility of neighbour candidates.
    accessible: FxHashMap<Node, bool>,
    open:       OpenSet,
    visited:    Vec<Node>,
}

impl<'a> Search<'a> {
    fn new(layer: &'a Layer, goal: Node, ignored: GroupId, footprint: f32) -> Self {
        Self {
            index: layer.index(),
            checker: layer.checker(),
            ignored,
            footprint,
            goal,
            records: Vec::new(),
            lookup: FxHashMap::default(),
            accessible: FxHashMap::default(),
            open: OpenSet::new(),
            visited: Vec::new(),
        }
    }

    #[inline]
    fn heuristic(&self, node: Node) -> f32 {
        self.index.node_distance(node, self.goal)
    }

    fn is_accessible(&mut self, node: Node) -> bool {
        let (checker, ignored, footprint) = (self.checker, self.ignored, self.footprint);
        *self
            .accessible
            .entry(node)
            .or_insert_with(|| checker.is_accessible(node, ignored, footprint))
    }

    /// Give `node` a record reached from `parent` at cost `g`, or improve
    /// its existing one.
    fn relax(&mut self, node: Node, parent: u32, g: f32) {
        let h = self.heuristic(node);
        match self.lookup.get(&node) {
            Some(&i) => {
                let rec = &mut self.records[i as usize];
                if rec.closed || g >= rec.g {
                    return;
                }
                rec.g = g;
                rec.f = g + h;
                rec.parent = parent;
                self.open.decrease_key(&mut self.records, i);
            }
            None => {
                let i = self.records.len() as u32;
                self.records.push(Record {
                    node,
                    g,
                    f: g + h,
                    parent,
                    closed: false,
                    heap_index: None,
                });
                self.lookup.insert(node, i);
                self.open.insert(&mut self.records, i);
            }
        }
    }

    fn expand(&mut self, current: u32) {
        let rec = &self.records[current as usize];
        let (node, g) = (rec.node, rec.g);
        let (x, y) = self.index.coords_of(node);

        for (dx, dy, cost) in NEIGHBOURS {
            let Some(next) = self.index.try_node_of(x + dx, y + dy) else {
                continue;
            };
            if self.lookup.get(&next).is_some_and(|&i| self.records[i as usize].closed) {
                continue;
            }
            if !self.is_accessible(next) {
                continue;
            }
            self.relax(next, current, g + cost);
        }
    }

    /// Walk parent links from `end` back to the start.
    fn reconstruct(&self, end: u32) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut cur = end;
        while cur != NO_PARENT {
            let rec = &self.records[cur as usize];
            nodes.push(rec.node);
            cur = rec.parent;
        }
        nodes.reverse();
        nodes
    }

    /// Evaluated record nearest the goal; ties go to the smaller node id.
    ///
    /// # Panics
    /// Panics if nothing was evaluated.
    fn closest_record(&self) -> u32 {
        let mut best: Option<(f32, Node, u32)> = None;
        for (i, rec) in self.records.iter().enumerate() {
            let h = self.heuristic(rec.node);
            let better = match best {
                None => true,
                Some((bh, bn, _)) => h < bh || (h == bh && rec.node < bn),
            };
            if better {
                best = Some((h, rec.node, i as u32));
            }
        }
        match best {
            Some((_, _, i)) => i,
            None => panic!("closest-node fallback requested but no node was evaluated"),
        }
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Find a path on `layer` from the node nearest `start` to the node nearest
/// `goal`, treating occupancy by `ignored` as passable.
///
/// Never errors: an unreachable goal yields either a failed [`Path`] or the
/// closest partial path, per `options.failure`.  Successful and closest
/// paths are smoothed before return.
///
/// # Panics
/// Panics if `start` or `goal` lies outside the layer's padded grid.
pub fn find_path(
    layer:     &Layer,
    start:     WorldPos,
    goal:      WorldPos,
    ignored:   GroupId,
    footprint: f32,
    options:   &QueryOptions,
) -> Path {
    let index = layer.index();
    let start_node = index.closest_node(start);
    let goal_node = index.closest_node(goal);
    let footprint = footprint.max(0.0);

    let budget = match options.node_budget {
        Some(b) => b.get(),
        None => layer
            .config()
            .search
            .default_budget(index.node_distance(start_node, goal_node)),
    };

    let mut search = Search::new(layer, goal_node, ignored, footprint);
    search.relax(start_node, NO_PARENT, 0.0);

    let is_goal = |node: Node| {
        if options.goal_radius <= 0.0 {
            node == goal_node
        } else {
            index.node_distance(node, goal_node) <= options.goal_radius
        }
    };

    let mut expanded = 0usize;
    while let Some(current) = search.open.extract_min(&mut search.records) {
        let rec = &mut search.records[current as usize];
        rec.closed = true;
        let node = rec.node;
        search.visited.push(node);
        expanded += 1;

        if is_goal(node) {
            let raw = search.reconstruct(current);
            let smooth = smooth_path(layer, &raw, ignored, footprint);
            log::debug!(
                "layer {}: path node {start_node} -> {goal_node} found ({} raw, {} waypoints, {expanded} expanded)",
                layer.id(),
                raw.len(),
                smooth.len(),
            );
            return Path::new(layer.id(), goal, raw, smooth, search.visited);
        }

        if expanded >= budget {
            log::trace!("layer {}: node budget {budget} spent before reaching node {goal_node}", layer.id());
            break;
        }
        search.expand(current);
    }

    match options.failure {
        FailurePolicy::None => {
            log::debug!(
                "layer {}: no path node {start_node} -> {goal_node} ({expanded} expanded)",
                layer.id(),
            );
            Path::failed(layer.id(), goal, search.visited)
        }
        FailurePolicy::ReturnClosest => {
            let best = search.closest_record();
            let raw = search.reconstruct(best);
            let smooth = smooth_path(layer, &raw, ignored, footprint);
            log::debug!(
                "layer {}: goal node {goal_node} unreachable, returning closest node {} ({expanded} expanded)",
                layer.id(),
                search.records[best as usize].node,
            );
            Path::new(layer.id(), goal, raw, smooth, search.visited)
        }
    }
}
