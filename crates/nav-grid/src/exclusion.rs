//! Scoped "pass through" of specific entities for the duration of a query.
//!
//! Letting agent A path through agent B (e.g. B is A's escort, or B will
//! move out of the way) is done by transferring B's occupancy entries to
//! A's group, running the query with A's group ignored, and transferring the
//! entries back.  The transfer is exact: no geometry is recomputed.
//!
//! [`ExclusionGuard`] makes the pairing unbreakable: it owns the `&mut Layer`
//! for its lifetime, exposes the layer read-only through `Deref`, and
//! restores every entry in `Drop`, including on early return or unwind.
//!
//! Guards spanning several layers are built from the lower-level pair
//! [`Layer::begin_exclusion`] / [`Layer::end_exclusion`] and the
//! [`Exclusion`] record passed between them.

use std::ops::Deref;

use nav_core::{EntityId, GroupId, NavError};

use crate::{GridResult, Layer};

// ── Exclusion record ──────────────────────────────────────────────────────────

/// Entries transferred by [`Layer::begin_exclusion`], needed to undo it.
#[must_use = "an exclusion must be handed back to `Layer::end_exclusion`"]
#[derive(Debug)]
pub struct Exclusion {
    pass_group:  GroupId,
    /// Entities whose entries were reassigned, with their original group.
    transferred: Vec<(EntityId, GroupId)>,
}

impl Default for Exclusion {
    fn default() -> Self {
        Self { pass_group: GroupId::NONE, transferred: Vec::new() }
    }
}

impl Exclusion {
    pub fn pass_group(&self) -> GroupId {
        self.pass_group
    }

    /// Number of entities whose occupancy is transferred.
    pub fn len(&self) -> usize {
        self.transferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transferred.is_empty()
    }
}

impl Layer {
    /// Reassign the occupancy of `entities` to `pass_group` and return the
    /// record that undoes it.  Prefer [`exclude`](Self::exclude) unless the
    /// caller owns its own guard.
    ///
    /// Unknown entities are rejected before any entry is touched.  Entities
    /// already in `pass_group` and duplicates in `entities` are skipped.
    pub fn begin_exclusion(&mut self, entities: &[EntityId], pass_group: GroupId) -> GridResult<Exclusion> {
        let mut transferred: Vec<(EntityId, GroupId)> = Vec::with_capacity(entities.len());
        for &id in entities {
            let occupant = self.entities.get(&id).ok_or(NavError::EntityNotFound(id))?;
            if occupant.group != pass_group && !transferred.iter().any(|(e, _)| *e == id) {
                transferred.push((id, occupant.group));
            }
        }

        let Layer { entities: registry, occupancy, .. } = &mut *self;
        for &(id, group) in &transferred {
            for &node in &registry[&id].nodes {
                occupancy.replace_group_id(node, group, pass_group);
            }
        }
        Ok(Exclusion { pass_group, transferred })
    }

    /// Hand every entry in `exclusion` back to its original group.
    ///
    /// # Panics
    /// Panics if `exclusion` was not produced by this layer, or the listed
    /// entities changed since.
    pub fn end_exclusion(&mut self, exclusion: Exclusion) {
        let Layer { entities, occupancy, .. } = &mut *self;
        for &(id, group) in &exclusion.transferred {
            for &node in &entities[&id].nodes {
                occupancy.replace_group_id(node, exclusion.pass_group, group);
            }
        }
    }

    /// Reassign the occupancy of `entities` to `pass_group` until the
    /// returned guard is dropped.  See [`begin_exclusion`](Self::begin_exclusion).
    pub fn exclude(&mut self, entities: &[EntityId], pass_group: GroupId) -> GridResult<ExclusionGuard<'_>> {
        let exclusion = self.begin_exclusion(entities, pass_group)?;
        Ok(ExclusionGuard { layer: self, exclusion })
    }
}

// ── ExclusionGuard ────────────────────────────────────────────────────────────

/// RAII handle returned by [`Layer::exclude`].
pub struct ExclusionGuard<'a> {
    layer:     &'a mut Layer,
    exclusion: Exclusion,
}

impl ExclusionGuard<'_> {
    /// Number of entities whose occupancy is currently transferred.
    pub fn excluded_count(&self) -> usize {
        self.exclusion.len()
    }

    pub fn pass_group(&self) -> GroupId {
        self.exclusion.pass_group()
    }
}

impl Deref for ExclusionGuard<'_> {
    type Target = Layer;

    fn deref(&self) -> &Layer {
        self.layer
    }
}

impl Drop for ExclusionGuard<'_> {
    fn drop(&mut self) {
        let exclusion = std::mem::take(&mut self.exclusion);
        self.layer.end_exclusion(exclusion);
    }
}
