//! Line of sight and greedy string-pulling over raw node paths.
//!
//! # Ray traversal
//!
//! [`GridRay`] visits every node cell the segment between two node centres
//! passes through, stepping one axis at a time so consecutive cells are
//! always 4-adjacent.  When the segment passes exactly through a cell
//! corner the vertical (y) step is taken first:
//!
//! ```text
//!   (0,0) → (2,2)   visits  (0,0) (0,1) (1,1) (1,2) (2,2)
//! ```
//!
//! The decision uses integer arithmetic only, so the traversal is exact and
//! reproducible across platforms.

use nav_core::{GroupId, Node};
use nav_grid::Layer;

// ── GridRay ───────────────────────────────────────────────────────────────────

/// Iterator over the node coordinates crossed by a straight segment.
#[derive(Clone, Debug)]
pub struct GridRay {
    x:       i32,
    y:       i32,
    step_x:  i32,
    step_y:  i32,
    /// Total steps along each axis.
    nx:      i64,
    ny:      i64,
    /// Steps taken so far along each axis.
    ix:      i64,
    iy:      i64,
    started: bool,
}

impl GridRay {
    pub fn new(from: (i32, i32), to: (i32, i32)) -> Self {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        Self {
            x:       from.0,
            y:       from.1,
            step_x:  dx.signum(),
            step_y:  dy.signum(),
            nx:      i64::from(dx.unsigned_abs()),
            ny:      i64::from(dy.unsigned_abs()),
            ix:      0,
            iy:      0,
            started: false,
        }
    }

    /// Number of cells the ray visits, endpoints included.
    pub fn cell_count(&self) -> usize {
        (self.nx + self.ny + 1) as usize
    }
}

impl Iterator for GridRay {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if !self.started {
            self.started = true;
            return Some((self.x, self.y));
        }
        if self.ix >= self.nx && self.iy >= self.ny {
            return None;
        }
        // Sign of (crossing of next vertical edge) - (crossing of next
        // horizontal edge), scaled to integers.  Zero is a corner.
        let decision = (1 + 2 * self.ix) * self.ny - (1 + 2 * self.iy) * self.nx;
        if decision < 0 {
            self.x += self.step_x;
            self.ix += 1;
        } else {
            self.y += self.step_y;
            self.iy += 1;
        }
        Some((self.x, self.y))
    }
}

// ── Line of sight ─────────────────────────────────────────────────────────────

/// `true` if an agent of radius `footprint` could walk straight from `from`
/// to `to`.
///
/// Every crossed cell is checked with the footprint inflated by the layer's
/// `los_margin`, so smoothed segments keep a little clearance.
pub fn line_of_sight(layer: &Layer, from: Node, to: Node, ignored: GroupId, footprint: f32) -> bool {
    let index = layer.index();
    let checker = layer.checker();
    let inflated = footprint.max(0.0) + layer.config().search.los_margin;

    GridRay::new(index.coords_of(from), index.coords_of(to)).all(|(x, y)| {
        index
            .try_node_of(x, y)
            .is_some_and(|node| checker.is_accessible(node, ignored, inflated))
    })
}

// ── Smoothing ─────────────────────────────────────────────────────────────────

/// Reduce `raw` to the waypoints an agent actually needs to steer by.
///
/// One greedy pass: keep a checkpoint, walk forward, and when sight from the
/// checkpoint to the current node breaks, emit the previous node and make it
/// the new checkpoint.  The last node is always emitted.  The first node is
/// emitted only if nothing else was, so an unobstructed path becomes
/// `[first, last]` and an obstructed one `[waypoints.., last]`.  Paths of
/// one node or fewer are returned unchanged.
pub fn smooth_path(layer: &Layer, raw: &[Node], ignored: GroupId, footprint: f32) -> Vec<Node> {
    let (Some(&first), Some(&last)) = (raw.first(), raw.last()) else {
        return Vec::new();
    };
    if raw.len() == 1 {
        return vec![first];
    }

    let mut out: Vec<Node> = Vec::new();
    let mut checkpoint = 0;
    for i in 1..raw.len() {
        if line_of_sight(layer, raw[checkpoint], raw[i], ignored, footprint) {
            continue;
        }
        let waypoint = raw[i - 1];
        if out.last() != Some(&waypoint) {
            out.push(waypoint);
        }
        checkpoint = i - 1;
    }

    if out.is_empty() {
        out.push(first);
    }
    if out.last() != Some(&last) {
        out.push(last);
    }
    out
}
