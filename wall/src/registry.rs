//! Scene registry: the typed store of placed tiles and their story affordances.
//!
//! Filled by the layout generator at build time and read by hit-testing, the
//! camera controller, the pulse animation, and the renderer. Tiles keep their
//! build order so index lookups and iteration are deterministic.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashMap;

use glam::DVec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::tile::{Affordance, TileEntity, TileId};

/// Owns every live tile entity and affordance.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    tiles: HashMap<TileId, TileEntity>,
    order: Vec<TileId>,
    affordances: HashMap<TileId, Affordance>,
    hovered: Option<TileId>,
}

impl SceneRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tile. Returns `false` (and leaves the registry unchanged) if the id is taken.
    pub fn insert_tile(&mut self, tile: TileEntity) -> bool {
        if self.tiles.contains_key(&tile.id) {
            return false;
        }
        self.order.push(tile.id);
        self.tiles.insert(tile.id, tile);
        true
    }

    /// Bind an affordance to its tile. Returns `false` if the tile is unknown,
    /// has no story, or already has one.
    pub fn attach_affordance(&mut self, affordance: Affordance) -> bool {
        let Some(tile) = self.tiles.get(&affordance.tile_id) else {
            return false;
        };
        if !tile.has_story() || self.affordances.contains_key(&affordance.tile_id) {
            return false;
        }
        self.affordances.insert(affordance.tile_id, affordance);
        true
    }

    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&TileEntity> {
        self.tiles.get(&id)
    }

    /// Tile at `index` in build order.
    #[must_use]
    pub fn by_index(&self, index: usize) -> Option<&TileEntity> {
        self.order.get(index).and_then(|id| self.tiles.get(id))
    }

    /// The tile with `id`, only if it carries a story.
    #[must_use]
    pub fn story_tile(&self, id: TileId) -> Option<&TileEntity> {
        self.tiles.get(&id).filter(|t| t.has_story())
    }

    /// Tiles in build order.
    pub fn tiles(&self) -> impl Iterator<Item = &TileEntity> {
        self.order.iter().filter_map(|id| self.tiles.get(id))
    }

    /// Affordances in their tiles' build order.
    pub fn affordances(&self) -> impl Iterator<Item = &Affordance> {
        self.order.iter().filter_map(|id| self.affordances.get(id))
    }

    pub fn affordances_mut(&mut self) -> impl Iterator<Item = &mut Affordance> {
        self.affordances.values_mut()
    }

    #[must_use]
    pub fn affordance(&self, tile_id: TileId) -> Option<&Affordance> {
        self.affordances.get(&tile_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[must_use]
    pub fn affordance_count(&self) -> usize {
        self.affordances.len()
    }

    /// Ids of story tiles in build order.
    #[must_use]
    pub fn story_tile_ids(&self) -> Vec<TileId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.tiles.get(id).is_some_and(TileEntity::has_story))
            .collect()
    }

    /// A uniformly random tile.
    pub fn random_tile<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&TileEntity> {
        self.order.choose(rng).and_then(|id| self.tiles.get(id))
    }

    /// A uniformly random story tile other than `exclude`.
    pub fn random_story_tile<R: Rng + ?Sized>(&self, rng: &mut R, exclude: Option<TileId>) -> Option<&TileEntity> {
        let candidates = self
            .story_tile_ids()
            .into_iter()
            .filter(|id| Some(*id) != exclude)
            .collect::<Vec<_>>();
        candidates.choose(rng).and_then(|id| self.tiles.get(id))
    }

    #[must_use]
    pub fn hovered(&self) -> Option<TileId> {
        self.hovered
    }

    /// Mark the affordance of `tile_id` as hovered and clear every other one.
    ///
    /// Ids without an affordance clear the hover. Returns whether the hovered
    /// affordance changed.
    pub fn set_hovered(&mut self, tile_id: Option<TileId>) -> bool {
        let next = tile_id.filter(|id| self.affordances.contains_key(id));
        if next == self.hovered {
            return false;
        }
        for aff in self.affordances.values_mut() {
            aff.hovered = Some(aff.tile_id) == next;
        }
        self.hovered = next;
        true
    }

    /// Axis-aligned extent of all tile centers, as `(min, max)`.
    #[must_use]
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        let mut iter = self.tiles.values().map(|t| t.position);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Remove everything, returning the tiles (in build order) and affordances.
    pub fn drain(&mut self) -> (Vec<TileEntity>, Vec<Affordance>) {
        let mut tiles = Vec::with_capacity(self.order.len());
        let mut affordances = Vec::with_capacity(self.affordances.len());
        for id in self.order.drain(..) {
            if let Some(aff) = self.affordances.remove(&id) {
                affordances.push(aff);
            }
            if let Some(tile) = self.tiles.remove(&id) {
                tiles.push(tile);
            }
        }
        self.tiles.clear();
        self.affordances.clear();
        self.hovered = None;
        (tiles, affordances)
    }
}
