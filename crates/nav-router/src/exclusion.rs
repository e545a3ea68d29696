//! World-wide scoped exclusion.
//!
//! [`Layer::exclude`](nav_grid::Layer::exclude) holds one layer mutably,
//! which leaves the rest of the world out of reach while the guard lives.
//! [`WorldExclusionGuard`] instead transfers occupancy on whichever layer
//! each entity is registered on and derefs to the whole [`NavWorld`], so a
//! multi-layer query can run through it:
//!
//! ```rust,ignore
//! let guard = world.exclude(&[escort], me)?;
//! let segments = find_multi_layer_path(&guard, here, there, sx, sy, gx, gy, me, 1.0, &opts)?;
//! drop(guard); // every layer restored
//! ```

use std::ops::Deref;

use nav_core::{EntityId, GroupId, LayerId, NavError};
use nav_grid::Exclusion;

use crate::{NavWorld, RouterResult};

/// RAII handle returned by [`NavWorld::exclude`].
pub struct WorldExclusionGuard<'a> {
    world:      &'a mut NavWorld,
    pass_group: GroupId,
    exclusions: Vec<(LayerId, Exclusion)>,
}

impl NavWorld {
    /// Reassign the occupancy of `entities` to `pass_group`, each on its own
    /// layer, until the returned guard is dropped.
    ///
    /// Unknown entities are rejected before any entry is touched.
    pub fn exclude(&mut self, entities: &[EntityId], pass_group: GroupId) -> RouterResult<WorldExclusionGuard<'_>> {
        let mut by_layer: Vec<(LayerId, Vec<EntityId>)> = Vec::new();
        for &id in entities {
            let layer = self.entity_layer(id).ok_or(NavError::EntityNotFound(id))?;
            match by_layer.iter_mut().find(|(l, _)| *l == layer) {
                Some((_, ids)) => ids.push(id),
                None => by_layer.push((layer, vec![id])),
            }
        }

        let mut guard = WorldExclusionGuard {
            world: self,
            pass_group,
            exclusions: Vec::with_capacity(by_layer.len()),
        };
        for (layer, ids) in by_layer {
            let exclusion = guard.world.layer_mut(layer)?.begin_exclusion(&ids, pass_group)?;
            guard.exclusions.push((layer, exclusion));
        }
        Ok(guard)
    }
}

impl WorldExclusionGuard<'_> {
    /// Number of entities whose occupancy is currently transferred.
    pub fn excluded_count(&self) -> usize {
        self.exclusions.iter().map(|(_, e)| e.len()).sum()
    }

    pub fn pass_group(&self) -> GroupId {
        self.pass_group
    }
}

impl Deref for WorldExclusionGuard<'_> {
    type Target = NavWorld;

    fn deref(&self) -> &NavWorld {
        self.world
    }
}

impl Drop for WorldExclusionGuard<'_> {
    fn drop(&mut self) {
        for (layer, exclusion) in self.exclusions.drain(..).rev() {
            // Layers are never removed.
            if let Ok(layer) = self.world.layer_mut(layer) {
                layer.end_exclusion(exclusion);
            }
        }
    }
}
