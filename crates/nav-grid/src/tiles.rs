//! Terrain tiles and the portal (dropdown) index.
//!
//! Terrain generation is external: it hands the engine a [`TileMap`] per
//! layer.  A tile covers a `nodes_per_tile × nodes_per_tile` block of nodes.
//! Wall tiles are written into occupancy as `GroupId::WALL`; dropdown tiles
//! connect a layer to the one below and are indexed in an R-tree so the
//! router can find the nearest one in O(log P).

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use nav_core::WorldPos;

use crate::{GridError, GridResult};

// ── TileKind ──────────────────────────────────────────────────────────────────

/// What a terrain tile is, as far as navigation is concerned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileKind {
    #[default]
    Floor,
    /// Impassable terrain (cliff face, rock, water).
    Wall,
    /// A transition to the layer below.
    Dropdown,
}

impl TileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TileKind::Floor    => "floor",
            TileKind::Wall     => "wall",
            TileKind::Dropdown => "dropdown",
        }
    }
}

impl std::fmt::Display for TileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TileMap ───────────────────────────────────────────────────────────────────

/// Row-major tile grid for one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    width:  u32,
    height: u32,
    tiles:  Vec<TileKind>,
}

impl TileMap {
    /// An all-floor map of `width × height` tiles.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![TileKind::Floor; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }

    #[inline]
    fn slot(&self, tx: u32, ty: u32) -> Option<usize> {
        (tx < self.width && ty < self.height).then(|| (ty * self.width + tx) as usize)
    }

    pub fn get(&self, tx: u32, ty: u32) -> Option<TileKind> {
        self.slot(tx, ty).map(|i| self.tiles[i])
    }

    /// Overwrite one tile, returning the previous kind.
    pub fn set(&mut self, tx: u32, ty: u32, kind: TileKind) -> GridResult<TileKind> {
        let i = self.slot(tx, ty).ok_or(GridError::TileOutOfBounds { x: tx, y: ty })?;
        Ok(std::mem::replace(&mut self.tiles[i], kind))
    }

    /// Coordinates of every tile of `kind`, row-major.
    pub fn positions_of(&self, kind: TileKind) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width;
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, t)| **t == kind)
            .map(move |(i, _)| (i as u32 % w, i as u32 / w))
    }
}

// ── Portal index ──────────────────────────────────────────────────────────────

/// A dropdown tile and the world position agents must reach to use it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Portal {
    pub tile_x: u32,
    pub tile_y: u32,
    pub center: WorldPos,
}

/// Entry stored in the portal R-tree: the tile centre in world units.
#[derive(Clone, PartialEq)]
pub(crate) struct PortalEntry {
    point: [f32; 2],
    tile:  (u32, u32),
}

impl RTreeObject for PortalEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PortalEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

impl PortalEntry {
    /// The portal point is the node nearest the tile centre, so reaching it
    /// is an exact-node goal for the search.
    pub(crate) fn new(tx: u32, ty: u32, nodes_per_tile: u32, separation: f32) -> Self {
        let half = nodes_per_tile / 2;
        let x = (tx * nodes_per_tile + half) as f32 * separation;
        let y = (ty * nodes_per_tile + half) as f32 * separation;
        Self { point: [x, y], tile: (tx, ty) }
    }

    pub(crate) fn portal(&self) -> Portal {
        Portal {
            tile_x: self.tile.0,
            tile_y: self.tile.1,
            center: WorldPos::new(self.point[0], self.point[1]),
        }
    }
}

/// Bulk-load the portal index for every dropdown tile in `tiles`.
pub(crate) fn build_portal_index(
    tiles:          &TileMap,
    nodes_per_tile: u32,
    separation:     f32,
) -> RTree<PortalEntry> {
    let entries = tiles
        .positions_of(TileKind::Dropdown)
        .map(|(tx, ty)| PortalEntry::new(tx, ty, nodes_per_tile, separation))
        .collect();
    RTree::bulk_load(entries)
}
