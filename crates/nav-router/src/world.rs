//! `NavWorld`: the stack of layers a host simulation navigates.
//!
//! The world owns every [`Layer`] and remembers which layer each entity is
//! registered on, so hosts can address entities by id alone.  Entity ids
//! are unique across the whole world.
//!
//! # Tick contract
//!
//! Within a tick, entity moves only mark occupancy dirty (see
//! [`Layer::update_entity`]).  The host calls [`NavWorld::end_tick`] once
//! between ticks so every layer's occupancy matches entity geometry before
//! the next round of queries.

use rustc_hash::FxHashMap;

use nav_core::{EntityId, GroupId, LayerId, NavConfig, NavError};
use nav_grid::{Geometry, Layer, TileMap};

use crate::{RouterError, RouterResult};

pub struct NavWorld {
    config:        NavConfig,
    layers:        Vec<Layer>,
    entity_layers: FxHashMap<EntityId, LayerId>,
}

impl NavWorld {
    /// An empty world.  Fails if `config` does not validate.
    pub fn new(config: NavConfig) -> RouterResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            layers: Vec::new(),
            entity_layers: FxHashMap::default(),
        })
    }

    /// A world with one layer per tile map; `tiles[0]` becomes layer 0.
    pub fn from_tiles(config: NavConfig, tiles: Vec<TileMap>) -> RouterResult<Self> {
        let mut world = Self::new(config)?;
        for map in tiles {
            world.add_layer(map);
        }
        Ok(world)
    }

    /// Append a layer below the existing ones and return its id.
    pub fn add_layer(&mut self, tiles: TileMap) -> LayerId {
        let id = LayerId(self.layers.len() as u16);
        log::debug!("adding layer {id} ({}x{} tiles)", tiles.width(), tiles.height());
        self.layers.push(Layer::new(id, tiles, self.config.clone()));
        id
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    // ── Layers ────────────────────────────────────────────────────────────

    pub fn layer(&self, id: LayerId) -> RouterResult<&Layer> {
        self.layers.get(id.index()).ok_or_else(|| NavError::LayerNotFound(id).into())
    }

    pub fn layer_mut(&mut self, id: LayerId) -> RouterResult<&mut Layer> {
        self.layers.get_mut(id.index()).ok_or_else(|| NavError::LayerNotFound(id).into())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    // ── Entities ──────────────────────────────────────────────────────────

    /// Layer `id` is currently registered on.
    pub fn entity_layer(&self, id: EntityId) -> Option<LayerId> {
        self.entity_layers.get(&id).copied()
    }

    fn layer_of(&self, id: EntityId) -> RouterResult<LayerId> {
        self.entity_layer(id).ok_or_else(|| NavError::EntityNotFound(id).into())
    }

    pub fn insert_entity(
        &mut self,
        layer:    LayerId,
        id:       EntityId,
        group:    GroupId,
        geometry: Geometry,
    ) -> RouterResult<()> {
        if self.entity_layers.contains_key(&id) {
            return Err(NavError::DuplicateEntity(id).into());
        }
        self.layer_mut(layer)?.insert_entity(id, group, geometry)?;
        self.entity_layers.insert(id, layer);
        Ok(())
    }

    /// New geometry for `id`; occupancy follows at [`end_tick`](Self::end_tick).
    pub fn update_entity(&mut self, id: EntityId, geometry: Geometry) -> RouterResult<()> {
        let layer = self.layer_of(id)?;
        self.layer_mut(layer)?.update_entity(id, geometry)?;
        Ok(())
    }

    pub fn remove_entity(&mut self, id: EntityId) -> RouterResult<()> {
        let layer = self.layer_of(id)?;
        self.layer_mut(layer)?.remove_entity(id)?;
        self.entity_layers.remove(&id);
        Ok(())
    }

    /// Re-register `id` from layer `from` onto layer `to`, keeping its group
    /// and geometry.  Occupancy moves immediately.
    pub fn move_entity(&mut self, id: EntityId, from: LayerId, to: LayerId) -> RouterResult<()> {
        let actual = self.layer_of(id)?;
        if actual != from {
            return Err(RouterError::WrongLayer { entity: id, expected: from, actual });
        }
        if from == to {
            return Ok(());
        }
        // Validate the target before touching the source.
        self.layer(to)?;

        let occupant = self.layer_mut(from)?.remove_entity(id)?;
        self.layer_mut(to)?.insert_entity(id, occupant.group(), *occupant.geometry())?;
        self.entity_layers.insert(id, to);
        log::trace!("entity {id} moved from layer {from} to layer {to}");
        Ok(())
    }

    // ── Maintenance ───────────────────────────────────────────────────────

    /// Reconcile occupancy of every dirty entity on every layer.
    ///
    /// Returns the total number of entities refreshed.
    pub fn end_tick(&mut self) -> usize {
        let refreshed: usize = self.layers.iter_mut().map(Layer::refresh_dirty).sum();
        if refreshed > 0 {
            log::debug!("maintenance pass refreshed {refreshed} entities");
        }
        refreshed
    }
}
