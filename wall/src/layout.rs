//! Grid layout generator: places tiles on a jittered brick lattice.
//!
//! Placement is split in two. [`place_tiles`] is pure and only needs an RNG,
//! so tests can replay it from a seed. [`GridLayoutGenerator::build`] runs the
//! placement, then asks the collaborators for models and textures and commits
//! the finished entities into a [`SceneRegistry`]. A build either commits the
//! whole grid or leaves the registry empty.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use std::collections::HashSet;

use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collab::{AssetLoader, CollabError, LabelTextureFactory, ModelHandle, TileDataProvider};
use crate::registry::SceneRegistry;
use crate::tile::{Affordance, TileEntity, TileId, TileLabel, TileRecord};

/// Failure of a build or regeneration.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("base model failed to load: {0}")]
    AssetLoad(CollabError),
    #[error("base models have not been loaded")]
    ModelsNotLoaded,
    #[error("texture creation failed: {0}")]
    Texture(CollabError),
    #[error("tile data fetch failed: {0}")]
    TileData(CollabError),
    #[error("duplicate tile id {0} in tile records")]
    DuplicateTile(TileId),
}

/// Tuning for the lattice and its jitter.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Distance between neighbouring lattice cells.
    pub spacing: f64,
    /// Smallest allowed distance between two accepted tile centers.
    pub min_distance: f64,
    /// Jitter attempts per tile before falling back to the lattice point.
    pub max_attempts: usize,
    /// Jitter amplitude as a fraction of `spacing`.
    pub jitter_ratio: f64,
    /// Yaw jitter amplitude in radians.
    pub rotation_jitter: f64,
    /// Base models each tile picks a variant from.
    pub model_paths: Vec<String>,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: 9.0,
            min_distance: 6.0,
            max_attempts: 20,
            jitter_ratio: 0.125,
            rotation_jitter: 0.15,
            model_paths: vec!["/models/lockOne-no-text.glb".into(), "/models/lockTwo-no-text.glb".into()],
            seed: None,
        }
    }
}

/// Where one tile landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub row: usize,
    pub col: usize,
    pub position: DVec2,
    /// Every jitter attempt collided, so the unjittered cell origin was used.
    pub fallback: bool,
}

/// Counts reported by a successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildSummary {
    pub tiles: usize,
    pub affordances: usize,
    pub fallbacks: usize,
}

/// Side length of the smallest square grid holding `count` tiles.
#[must_use]
pub fn grid_size(count: usize) -> usize {
    let mut size = 0;
    while size * size < count {
        size += 1;
    }
    size
}

/// Unjittered center of lattice cell `(row, col)` in a `size × size` grid.
///
/// The grid is centered on the origin and odd rows shift right by half a cell.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cell_origin(row: usize, col: usize, size: usize, spacing: f64) -> DVec2 {
    let half_extent = (size.saturating_sub(1)) as f64 * spacing / 2.0;
    let row_offset = if row % 2 == 1 { spacing / 2.0 } else { 0.0 };
    DVec2::new(col as f64 * spacing - half_extent + row_offset, row as f64 * spacing - half_extent)
}

/// Place `count` tiles row-major, keeping accepted centers at least
/// `config.min_distance` apart.
pub fn place_tiles<R: Rng + ?Sized>(count: usize, config: &LayoutConfig, rng: &mut R) -> Vec<Placement> {
    let size = grid_size(count);
    let mut placed: Vec<Placement> = Vec::with_capacity(count);
    for row in 0..size {
        for col in 0..size {
            if placed.len() == count {
                return placed;
            }
            let origin = cell_origin(row, col, size, config.spacing);
            let next = place_one(origin, row, col, &placed, config, rng);
            placed.push(next);
        }
    }
    placed
}

fn place_one<R: Rng + ?Sized>(
    origin: DVec2,
    row: usize,
    col: usize,
    placed: &[Placement],
    config: &LayoutConfig,
    rng: &mut R,
) -> Placement {
    let amplitude = config.spacing * config.jitter_ratio;
    for _ in 0..config.max_attempts {
        let candidate = origin
            + DVec2::new((rng.random::<f64>() - 0.5) * amplitude, (rng.random::<f64>() - 0.5) * amplitude);
        let clear = placed
            .iter()
            .all(|p| p.position.distance(candidate) >= config.min_distance);
        if clear {
            return Placement { row, col, position: candidate, fallback: false };
        }
    }
    tracing::debug!(row, col, "placement retries exhausted; using cell origin");
    Placement { row, col, position: origin, fallback: true }
}

/// Builds, destroys, and regenerates the tile grid.
pub struct GridLayoutGenerator {
    config: LayoutConfig,
    rng: StdRng,
    models: Vec<ModelHandle>,
}

impl GridLayoutGenerator {
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        let rng = config.seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self { config, rng, models: Vec::new() }
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[must_use]
    pub fn models(&self) -> &[ModelHandle] {
        &self.models
    }

    #[must_use]
    pub fn models_loaded(&self) -> bool {
        !self.models.is_empty()
    }

    /// Resolve every configured base model. Nothing is cached unless all load.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::AssetLoad`] for the first model that fails, or
    /// [`LayoutError::ModelsNotLoaded`] when no model paths are configured.
    pub async fn load_models(&mut self, loader: &dyn AssetLoader) -> Result<(), LayoutError> {
        if self.config.model_paths.is_empty() {
            return Err(LayoutError::ModelsNotLoaded);
        }
        let mut models = Vec::with_capacity(self.config.model_paths.len());
        for path in &self.config.model_paths {
            match loader.load(path).await {
                Ok(model) => models.push(model),
                Err(e) => {
                    tracing::error!(error = %e, %path, "base model load failed");
                    return Err(LayoutError::AssetLoad(e));
                }
            }
        }
        tracing::info!(count = models.len(), "base models loaded");
        self.models = models;
        Ok(())
    }

    /// Place one tile per record and commit them, with their affordances, to `registry`.
    ///
    /// Anything already in `registry` is destroyed first.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ModelsNotLoaded`] before [`Self::load_models`]
    /// succeeded, [`LayoutError::DuplicateTile`] when two records share an id,
    /// and [`LayoutError::Texture`] when the factory fails. In every error case
    /// the registry is left empty and no texture stays allocated.
    pub async fn build(
        &mut self,
        records: &[TileRecord],
        registry: &mut SceneRegistry,
        factory: &dyn LabelTextureFactory,
    ) -> Result<BuildSummary, LayoutError> {
        destroy(registry, factory);
        if !self.models_loaded() {
            tracing::error!("build aborted: base models not loaded");
            return Err(LayoutError::ModelsNotLoaded);
        }
        let mut seen = HashSet::with_capacity(records.len());
        if let Some(dup) = records.iter().find(|r| !seen.insert(r.id)) {
            tracing::error!(tile_id = dup.id, "build aborted: duplicate tile id");
            return Err(LayoutError::DuplicateTile(dup.id));
        }

        let placements = place_tiles(records.len(), &self.config, &mut self.rng);
        let mut tiles = Vec::with_capacity(records.len());
        let mut affordances = Vec::new();

        for (index, (record, placement)) in records.iter().zip(&placements).enumerate() {
            let model_variant = self.rng.random_range(0..self.models.len());
            let rotation_y = (self.rng.random::<f64>() - 0.5) * self.config.rotation_jitter;
            let label = TileLabel::from_record(record);

            let label_texture = match factory.create_label_texture(&label).await {
                Ok(texture) => texture,
                Err(e) => return Err(abort_build(e, tiles, affordances, factory)),
            };
            let tile = TileEntity {
                id: record.id,
                index,
                row: placement.row,
                col: placement.col,
                position: placement.position,
                rotation_y,
                model_variant,
                label,
                label_texture,
                fallback: placement.fallback,
            };

            if tile.has_story() {
                let texture = match factory.create_button_texture(&tile.label.button_text()).await {
                    Ok(texture) => texture,
                    Err(e) => {
                        tiles.push(tile);
                        return Err(abort_build(e, tiles, affordances, factory));
                    }
                };
                affordances.push(Affordance::attach(&tile, texture));
            }
            tiles.push(tile);
        }

        let summary = BuildSummary {
            tiles: tiles.len(),
            affordances: affordances.len(),
            fallbacks: tiles.iter().filter(|t| t.fallback).count(),
        };
        for tile in tiles {
            registry.insert_tile(tile);
        }
        for affordance in affordances {
            registry.attach_affordance(affordance);
        }
        tracing::info!(
            tiles = summary.tiles,
            affordances = summary.affordances,
            fallbacks = summary.fallbacks,
            "grid built"
        );
        Ok(summary)
    }

    /// Refetch the records from `provider` and rebuild the grid from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ModelsNotLoaded`] without touching the scene when
    /// models were never loaded, [`LayoutError::TileData`] when the fetch fails
    /// (the old grid is already gone by then), or any error of [`Self::build`].
    pub async fn regenerate(
        &mut self,
        provider: &dyn TileDataProvider,
        registry: &mut SceneRegistry,
        factory: &dyn LabelTextureFactory,
    ) -> Result<BuildSummary, LayoutError> {
        if !self.models_loaded() {
            return Err(LayoutError::ModelsNotLoaded);
        }
        provider.clear_cache();
        let destroyed = destroy(registry, factory);
        tracing::debug!(destroyed, "grid destroyed for regeneration");
        let records = provider.fetch_all().await.map_err(|e| {
            tracing::error!(error = %e, "regeneration aborted: tile data fetch failed");
            LayoutError::TileData(e)
        })?;
        self.build(&records, registry, factory).await
    }
}

/// Remove every tile and affordance from `registry` and release their textures.
///
/// Returns the number of tiles removed.
pub fn destroy(registry: &mut SceneRegistry, factory: &dyn LabelTextureFactory) -> usize {
    let (tiles, affordances) = registry.drain();
    let count = tiles.len();
    release_all(tiles, affordances, factory);
    count
}

fn release_all(tiles: Vec<TileEntity>, affordances: Vec<Affordance>, factory: &dyn LabelTextureFactory) {
    for affordance in affordances {
        factory.release(affordance.texture);
    }
    for tile in tiles {
        factory.release(tile.label_texture);
    }
}

fn abort_build(
    error: CollabError,
    tiles: Vec<TileEntity>,
    affordances: Vec<Affordance>,
    factory: &dyn LabelTextureFactory,
) -> LayoutError {
    tracing::error!(error = %error, built = tiles.len(), "build aborted; releasing textures");
    release_all(tiles, affordances, factory);
    LayoutError::Texture(error)
}
