//! The `Layer` aggregate: one vertically stacked slice of the world.
//!
//! A layer owns everything a query needs to read (node index, occupancy,
//! tiles, portal index) plus the entity registry that writes occupancy.
//! Queries receive `&Layer` explicitly; there is no process-wide grid.
//!
//! # Occupancy lifecycle
//!
//! | Event                      | Occupancy effect                              |
//! |----------------------------|-----------------------------------------------|
//! | `insert_entity`            | nodes marked immediately                      |
//! | `update_entity`            | geometry stored, entity marked dirty          |
//! | `refresh_dirty` (per tick) | old nodes cleared, new nodes marked           |
//! | `remove_entity`            | nodes cleared immediately                     |
//! | `exclude` (scoped)         | entries reassigned, restored on guard drop    |

use rstar::{RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use nav_core::{EntityId, GroupId, LayerId, NavConfig, NavError, Node, WorldPos};

use crate::footprint::FootprintChecker;
use crate::hitbox::Geometry;
use crate::tiles::{build_portal_index, Portal, PortalEntry, TileKind, TileMap};
use crate::{GridResult, NodeIndex, OccupancyGrid};

// ── Occupant ──────────────────────────────────────────────────────────────────

/// An entity registered on a layer and the nodes it currently blocks.
#[derive(Clone, Debug)]
pub struct Occupant {
    pub(crate) group:    GroupId,
    pub(crate) geometry: Geometry,
    /// Nodes written to occupancy for this entity, each at most once.
    pub(crate) nodes:    Vec<Node>,
    pub(crate) dirty:    bool,
    /// Bounds currently stored in the spatial index.
    indexed:             ([f32; 2], [f32; 2]),
}

impl Occupant {
    pub fn group(&self) -> GroupId { self.group }
    pub fn geometry(&self) -> &Geometry { &self.geometry }
    pub fn nodes(&self) -> &[Node] { &self.nodes }
    /// `true` between a geometry change and the next maintenance pass.
    pub fn is_dirty(&self) -> bool { self.dirty }
}

/// Entity bounding box stored in the spatial index.
#[derive(Clone, PartialEq)]
struct EntityEntry {
    id:  EntityId,
    min: [f32; 2],
    max: [f32; 2],
}

impl EntityEntry {
    fn new(id: EntityId, (min, max): ([f32; 2], [f32; 2])) -> Self {
        Self { id, min, max }
    }
}

impl RTreeObject for EntityEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

// ── Layer ─────────────────────────────────────────────────────────────────────

pub struct Layer {
    id:                   LayerId,
    config:               NavConfig,
    index:                NodeIndex,
    pub(crate) occupancy: OccupancyGrid,
    tiles:                TileMap,
    portals:              RTree<PortalEntry>,
    pub(crate) entities:  FxHashMap<EntityId, Occupant>,
    entity_index:         RTree<EntityEntry>,
    /// Entities awaiting the maintenance pass, in the order they changed.
    dirty:                Vec<EntityId>,
}

impl Layer {
    /// Build a layer over `tiles`, writing walls and the padding ring into
    /// occupancy as `GroupId::WALL`.
    pub fn new(id: LayerId, tiles: TileMap, config: NavConfig) -> Self {
        let g = &config.grid;
        let index = NodeIndex::new(
            tiles.width() * g.nodes_per_tile,
            tiles.height() * g.nodes_per_tile,
            g.padding,
            g.node_separation,
        );
        let mut occupancy = OccupancyGrid::new(index.node_count());

        // Padding ring is permanently impassable.
        let p = index.padding() as i32;
        for y in -p..index.height() as i32 + p {
            for x in -p..index.width() as i32 + p {
                if !index.in_bounds(x, y) {
                    occupancy.mark_occupied(index.node_of(x, y), GroupId::WALL);
                }
            }
        }

        let portals = build_portal_index(&tiles, g.nodes_per_tile, g.node_separation);

        let mut layer = Self {
            id,
            config,
            index,
            occupancy,
            tiles,
            portals,
            entities: FxHashMap::default(),
            entity_index: RTree::new(),
            dirty: Vec::new(),
        };
        let walls: Vec<(u32, u32)> = layer.tiles.positions_of(TileKind::Wall).collect();
        for (tx, ty) in walls {
            layer.write_tile_walls(tx, ty, true);
        }
        layer
    }

    /// An all-floor layer of `width × height` tiles.
    pub fn open(id: LayerId, width: u32, height: u32, config: NavConfig) -> Self {
        Self::new(id, TileMap::new(width, height), config)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> LayerId { self.id }
    pub fn config(&self) -> &NavConfig { &self.config }
    pub fn index(&self) -> &NodeIndex { &self.index }
    pub fn occupancy(&self) -> &OccupancyGrid { &self.occupancy }
    pub fn tiles(&self) -> &TileMap { &self.tiles }

    /// Direct occupancy access for terrain collaborators that manage their
    /// own entries.  Every write must be paired with a matching clear.
    pub fn occupancy_mut(&mut self) -> &mut OccupancyGrid {
        &mut self.occupancy
    }

    // ── Accessibility ─────────────────────────────────────────────────────

    pub fn checker(&self) -> FootprintChecker<'_> {
        FootprintChecker::new(&self.index, &self.occupancy, self.config.grid.sample_resolution)
    }

    /// See [`FootprintChecker::is_accessible`].
    pub fn is_accessible(&self, node: Node, ignored: GroupId, footprint: f32) -> bool {
        self.checker().is_accessible(node, ignored, footprint)
    }

    // ── Tiles & portals ───────────────────────────────────────────────────

    /// Change one tile, keeping wall occupancy and the portal index in sync.
    pub fn set_tile(&mut self, tx: u32, ty: u32, kind: TileKind) -> GridResult<()> {
        let old = self.tiles.set(tx, ty, kind)?;
        if old == kind {
            return Ok(());
        }
        if old == TileKind::Wall {
            self.write_tile_walls(tx, ty, false);
        }
        if kind == TileKind::Wall {
            self.write_tile_walls(tx, ty, true);
        }
        let g = &self.config.grid;
        let entry = PortalEntry::new(tx, ty, g.nodes_per_tile, g.node_separation);
        if old == TileKind::Dropdown {
            self.portals.remove(&entry);
        }
        if kind == TileKind::Dropdown {
            self.portals.insert(entry);
        }
        Ok(())
    }

    fn write_tile_walls(&mut self, tx: u32, ty: u32, occupied: bool) {
        let npt = self.config.grid.nodes_per_tile;
        for y in ty * npt..(ty + 1) * npt {
            for x in tx * npt..(tx + 1) * npt {
                let node = self.index.node_of(x as i32, y as i32);
                if occupied {
                    self.occupancy.mark_occupied(node, GroupId::WALL);
                } else {
                    self.occupancy.mark_cleared(node, GroupId::WALL);
                }
            }
        }
    }

    /// The dropdown tile nearest to `pos`, if the layer has any.
    pub fn nearest_portal(&self, pos: WorldPos) -> Option<Portal> {
        self.portals.nearest_neighbor(&[pos.x, pos.y]).map(PortalEntry::portal)
    }

    pub fn portal_count(&self) -> usize {
        self.portals.size()
    }

    // ── Entities ──────────────────────────────────────────────────────────

    /// Register an entity and write its occupancy.
    pub fn insert_entity(&mut self, id: EntityId, group: GroupId, geometry: Geometry) -> GridResult<()> {
        if self.entities.contains_key(&id) {
            return Err(NavError::DuplicateEntity(id).into());
        }
        let nodes = geometry.occupied_nodes(&self.index, &self.config.grid);
        for &node in &nodes {
            self.occupancy.mark_occupied(node, group);
        }
        let indexed = geometry.bounds();
        self.entity_index.insert(EntityEntry::new(id, indexed));
        self.entities.insert(id, Occupant { group, geometry, nodes, dirty: false, indexed });
        Ok(())
    }

    /// Store new geometry for `id`.  Occupancy follows at the next
    /// [`refresh_dirty`](Self::refresh_dirty).
    pub fn update_entity(&mut self, id: EntityId, geometry: Geometry) -> GridResult<()> {
        let occupant = self.entities.get_mut(&id).ok_or(NavError::EntityNotFound(id))?;
        occupant.geometry = geometry;
        if !occupant.dirty {
            occupant.dirty = true;
            self.dirty.push(id);
        }
        Ok(())
    }

    /// Flag `id` for recomputation without changing its geometry.
    pub fn mark_dirty(&mut self, id: EntityId) -> GridResult<()> {
        let occupant = self.entities.get_mut(&id).ok_or(NavError::EntityNotFound(id))?;
        if !occupant.dirty {
            occupant.dirty = true;
            self.dirty.push(id);
        }
        Ok(())
    }

    /// Unregister an entity, clearing all of its occupancy.
    pub fn remove_entity(&mut self, id: EntityId) -> GridResult<Occupant> {
        let occupant = self.entities.remove(&id).ok_or(NavError::EntityNotFound(id))?;
        for &node in &occupant.nodes {
            self.occupancy.mark_cleared(node, occupant.group);
        }
        // The spatial index holds the geometry from the last refresh.
        self.entity_index.remove(&EntityEntry::new(id, occupant.indexed));
        Ok(occupant)
    }

    /// Maintenance pass: recompute occupancy for every dirty entity.
    ///
    /// Returns the number of entities refreshed.  Run between ticks so
    /// steady-state occupancy is consistent when queries start.
    pub fn refresh_dirty(&mut self) -> usize {
        let dirty = std::mem::take(&mut self.dirty);
        let mut refreshed = 0;

        for id in dirty {
            let Some(occupant) = self.entities.get(&id) else {
                continue; // removed since it was flagged
            };
            let old_nodes = occupant.nodes.clone();
            let group = occupant.group;
            let geometry = occupant.geometry;
            let old_bounds = occupant.indexed;

            for &node in &old_nodes {
                self.occupancy.mark_cleared(node, group);
            }
            let nodes = geometry.occupied_nodes(&self.index, &self.config.grid);
            for &node in &nodes {
                self.occupancy.mark_occupied(node, group);
            }

            let bounds = geometry.bounds();
            self.entity_index.remove(&EntityEntry::new(id, old_bounds));
            self.entity_index.insert(EntityEntry::new(id, bounds));

            if let Some(occupant) = self.entities.get_mut(&id) {
                occupant.nodes = nodes;
                occupant.dirty = false;
                occupant.indexed = bounds;
            }
            refreshed += 1;
        }

        if refreshed > 0 {
            log::trace!("layer {}: refreshed occupancy of {refreshed} entities", self.id);
        }
        refreshed
    }

    pub fn entity(&self, id: EntityId) -> Option<&Occupant> {
        self.entities.get(&id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// Entities whose (last refreshed) bounding box intersects the square of
    /// half-size `radius` around `pos`, sorted by id.
    pub fn entities_near(&self, pos: WorldPos, radius: f32) -> Vec<EntityId> {
        let envelope = AABB::from_corners(
            [pos.x - radius, pos.y - radius],
            [pos.x + radius, pos.y + radius],
        );
        let mut ids: Vec<EntityId> = self
            .entity_index
            .locate_in_envelope_intersecting(&envelope)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
