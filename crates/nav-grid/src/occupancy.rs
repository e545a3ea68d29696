//! Per-node occupancy lists.
//!
//! Each node holds an unordered multiset of [`GroupId`]s.  A node is
//! accessible to a querying agent of group `G` when nothing but `G` occupies
//! it.  Entries are written by entity geometry (see [`crate::hitbox`]) and by
//! the tile map (`GroupId::WALL`), and must always be removed by the same
//! owner that wrote them.

use nav_core::{GroupId, Node};

/// Occupancy storage for one layer, indexed by `Node`.
#[derive(Clone, Debug, Default)]
pub struct OccupancyGrid {
    cells: Vec<Vec<GroupId>>,
}

impl OccupancyGrid {
    /// An empty grid with `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        Self { cells: vec![Vec::new(); node_count] }
    }

    pub fn node_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn cell(&self, node: Node) -> &Vec<GroupId> {
        assert!(
            node.index() < self.cells.len(),
            "{node} outside occupancy grid of {} nodes",
            self.cells.len()
        );
        &self.cells[node.index()]
    }

    #[inline]
    fn cell_mut(&mut self, node: Node) -> &mut Vec<GroupId> {
        let len = self.cells.len();
        assert!(node.index() < len, "{node} outside occupancy grid of {len} nodes");
        &mut self.cells[node.index()]
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Record that `group` occupies `node`.
    pub fn mark_occupied(&mut self, node: Node, group: GroupId) {
        self.cell_mut(node).push(group);
    }

    /// Remove the first `group` entry from `node`.
    ///
    /// # Panics
    /// Panics if `node` holds no `group` entry: clearing occupancy that was
    /// never written means the caller's bookkeeping is out of sync.
    pub fn mark_cleared(&mut self, node: Node, group: GroupId) {
        let cell = self.cell_mut(node);
        match cell.iter().position(|&g| g == group) {
            Some(i) => {
                cell.swap_remove(i);
            }
            None => panic!("cannot clear group {group} from node {node}: not present"),
        }
    }

    /// Swap the first `old` entry on `node` for `new`, in place.
    ///
    /// # Panics
    /// Panics if `node` holds no `old` entry.
    pub fn replace_group_id(&mut self, node: Node, old: GroupId, new: GroupId) {
        let cell = self.cell_mut(node);
        match cell.iter_mut().find(|g| **g == old) {
            Some(slot) => *slot = new,
            None => panic!("cannot replace group {old} with {new} on node {node}: not present"),
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// All group entries on `node`, in no particular order.
    #[inline]
    pub fn groups(&self, node: Node) -> &[GroupId] {
        self.cell(node)
    }

    /// `true` if anything other than `ignored` occupies `node`.
    #[inline]
    pub fn is_blocked(&self, node: Node, ignored: GroupId) -> bool {
        self.cell(node).iter().any(|&g| g != ignored)
    }

    #[inline]
    pub fn is_free(&self, node: Node) -> bool {
        self.cell(node).is_empty()
    }

    /// Number of nodes holding at least one entry (diagnostics).
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}
