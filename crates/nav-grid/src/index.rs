//! Bidirectional mapping between world coordinates and grid nodes.
//!
//! # Layout
//!
//! Nodes are stored row-major over the *padded* grid: the playable
//! `width × height` area plus `padding` extra nodes on every side.  Border
//! coordinates such as `(-1, 0)` are therefore representable, which lets
//! footprint checks near the map edge read occupancy without bounds
//! special-casing.
//!
//! ```text
//! node = (y + padding) * stride + (x + padding)      stride = width + 2·padding
//! ```
//!
//! Node `(x, y)` sits at world position `(x · sep, y · sep)`.

use nav_core::{Node, WorldPos};

/// Converts between `(x, y)` node coordinates, `Node` ids, and world space.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeIndex {
    width:      u32,
    height:     u32,
    padding:    u32,
    separation: f32,
}

impl NodeIndex {
    pub fn new(width: u32, height: u32, padding: u32, separation: f32) -> Self {
        Self { width, height, padding, separation }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    /// Playable nodes along x.
    pub fn width(&self) -> u32 { self.width }
    /// Playable nodes along y.
    pub fn height(&self) -> u32 { self.height }
    pub fn padding(&self) -> u32 { self.padding }
    pub fn separation(&self) -> f32 { self.separation }

    #[inline]
    fn stride(&self) -> u32 {
        self.width + 2 * self.padding
    }

    /// Total nodes including the padding ring.
    pub fn node_count(&self) -> usize {
        self.stride() as usize * (self.height + 2 * self.padding) as usize
    }

    // ── Bounds ────────────────────────────────────────────────────────────

    /// `true` for coordinates inside the playable area.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// `true` for coordinates that have a node id (playable area or padding).
    #[inline]
    pub fn in_padded_bounds(&self, x: i32, y: i32) -> bool {
        let p = self.padding as i32;
        x >= -p && y >= -p && x < self.width as i32 + p && y < self.height as i32 + p
    }

    // ── Node ↔ coordinates ────────────────────────────────────────────────

    /// Node id for `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the padded grid; that indicates a
    /// malformed query or corrupted geometry.
    #[inline]
    pub fn node_of(&self, x: i32, y: i32) -> Node {
        match self.try_node_of(x, y) {
            Some(node) => node,
            None => panic!(
                "node coordinate ({x}, {y}) outside padded {}x{} grid (padding {})",
                self.width, self.height, self.padding
            ),
        }
    }

    /// Like [`node_of`](Self::node_of) but returns `None` out of range.
    #[inline]
    pub fn try_node_of(&self, x: i32, y: i32) -> Option<Node> {
        if !self.in_padded_bounds(x, y) {
            return None;
        }
        let p = self.padding as i32;
        let id = (y + p) as u32 * self.stride() + (x + p) as u32;
        Some(Node(id))
    }

    #[inline]
    pub fn x_of(&self, node: Node) -> i32 {
        (node.0 % self.stride()) as i32 - self.padding as i32
    }

    #[inline]
    pub fn y_of(&self, node: Node) -> i32 {
        (node.0 / self.stride()) as i32 - self.padding as i32
    }

    #[inline]
    pub fn coords_of(&self, node: Node) -> (i32, i32) {
        (self.x_of(node), self.y_of(node))
    }

    // ── World ↔ node ──────────────────────────────────────────────────────

    /// Node coordinates nearest to `pos` (round to nearest).
    #[inline]
    pub fn closest_coords(&self, pos: WorldPos) -> (i32, i32) {
        (
            (pos.x / self.separation).round() as i32,
            (pos.y / self.separation).round() as i32,
        )
    }

    /// Node nearest to `pos`.  Panics outside the padded grid.
    pub fn closest_node(&self, pos: WorldPos) -> Node {
        let (x, y) = self.closest_coords(pos);
        self.node_of(x, y)
    }

    /// Node whose cell (spanning one separation up and right of it)
    /// contains `pos` (floor).  Panics outside the padded grid.
    pub fn containing_node(&self, pos: WorldPos) -> Node {
        let x = (pos.x / self.separation).floor() as i32;
        let y = (pos.y / self.separation).floor() as i32;
        self.node_of(x, y)
    }

    /// World position of `node`.
    pub fn node_center(&self, node: Node) -> WorldPos {
        let (x, y) = self.coords_of(node);
        WorldPos::new(x as f32 * self.separation, y as f32 * self.separation)
    }

    /// Euclidean distance between two nodes in node units.
    #[inline]
    pub fn node_distance(&self, a: Node, b: Node) -> f32 {
        let (ax, ay) = self.coords_of(a);
        let (bx, by) = self.coords_of(b);
        let dx = (ax - bx) as f32;
        let dy = (ay - by) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}
