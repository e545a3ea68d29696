//! Footprint-aware accessibility.
//!
//! Agents have continuous positions but occupancy is discretised, so a
//! single-point test around a node misjudges wide agents that straddle
//! several nodes.  The checker instead samples a `res × res` grid of
//! fractional centres around the node and accepts the node if **any**
//! sample has every node within `footprint` of it clear.
//!
//! ```text
//!   res = 3, offsets = -1/3, 0, +1/3
//!
//!     ·   ·   ·
//!     ·   N   ·      each · is a sample centre; N is the node
//!     ·   ·   ·
//! ```
//!
//! Cost is O(res² × footprint²) per test.

use nav_core::{GroupId, Node};

use crate::{NodeIndex, OccupancyGrid};

/// Borrowed view used to answer accessibility questions on one layer.
#[derive(Clone, Copy)]
pub struct FootprintChecker<'a> {
    index:      &'a NodeIndex,
    occupancy:  &'a OccupancyGrid,
    resolution: u32,
}

impl<'a> FootprintChecker<'a> {
    pub fn new(index: &'a NodeIndex, occupancy: &'a OccupancyGrid, resolution: u32) -> Self {
        Self { index, occupancy, resolution: resolution.max(1) }
    }

    /// Could an agent of radius `footprint` (node units) stand on `node`,
    /// treating `ignored` as passable?
    pub fn is_accessible(&self, node: Node, ignored: GroupId, footprint: f32) -> bool {
        let (nx, ny) = self.index.coords_of(node);

        // A point agent only ever reads its own node.
        if footprint <= 0.0 {
            return !self.occupancy.is_blocked(node, ignored);
        }

        let res = self.resolution;
        for sy in 0..res {
            for sx in 0..res {
                let cx = nx as f32 + sample_offset(sx, res);
                let cy = ny as f32 + sample_offset(sy, res);
                if self.sample_is_clear(cx, cy, ignored, footprint) {
                    return true;
                }
            }
        }
        false
    }

    /// Accessibility of the node nearest to `(x, y)` in node units, using a
    /// single sample at the exact position.
    pub fn is_clear_at(&self, x: f32, y: f32, ignored: GroupId, footprint: f32) -> bool {
        self.sample_is_clear(x, y, ignored, footprint.max(0.0))
    }

    /// `true` if every node within `radius` of `(cx, cy)` is free of
    /// groups other than `ignored`.  The node nearest the centre is always
    /// checked; nodes beyond the padded grid count as blocked.
    fn sample_is_clear(&self, cx: f32, cy: f32, ignored: GroupId, radius: f32) -> bool {
        let r2 = radius * radius;
        let near_x = cx.round() as i32;
        let near_y = cy.round() as i32;

        let x0 = (cx - radius).floor() as i32;
        let x1 = (cx + radius).ceil() as i32;
        let y0 = (cy - radius).floor() as i32;
        let y1 = (cy + radius).ceil() as i32;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let nearest = x == near_x && y == near_y;
                if !nearest && dx * dx + dy * dy > r2 {
                    continue;
                }
                match self.index.try_node_of(x, y) {
                    Some(n) if !self.occupancy.is_blocked(n, ignored) => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

/// Fractional offset of sample `i` out of `res`, centred on 0.
#[inline]
fn sample_offset(i: u32, res: u32) -> f32 {
    (i as f32 + 0.5) / res as f32 - 0.5
}
