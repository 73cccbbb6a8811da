//! External collaborators consumed by the engine.
//!
//! Each trait is the whole contract the core relies on. The host binary ships
//! concrete implementations (filesystem assets, HTTP tile data, etc.) and the
//! tests use in-memory mocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::tile::{TileId, TileLabel, TileRecord};

/// Failure reported by a collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CollabError {
    #[error("asset `{path}` failed to load: {reason}")]
    Asset { path: String, reason: String },
    #[error("texture creation failed: {0}")]
    Texture(String),
    #[error("tile data unavailable: {0}")]
    TileData(String),
    #[error("story lookup failed: {0}")]
    Story(String),
}

/// A resolved base model that tiles are instanced from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelHandle {
    pub id: u64,
    pub path: String,
}

/// Opaque identifier of a GPU-side texture owned by a [`LabelTextureFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Handle to a rasterised label or button texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Width over height; `1.0` for a degenerate texture.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        if self.height == 0 { 1.0 } else { f64::from(self.width) / f64::from(self.height) }
    }
}

/// Story content served for a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPayload {
    #[serde(alias = "lock_id")]
    pub tile_id: TileId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// Resolves base 3D models.
#[async_trait]
pub trait AssetLoader: Send + Sync {
    /// Load the model at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CollabError::Asset`] when the model cannot be resolved.
    async fn load(&self, path: &str) -> Result<ModelHandle, CollabError>;
}

/// Rasterises label and button text into textures and frees them again.
#[async_trait]
pub trait LabelTextureFactory: Send + Sync {
    /// Render a tile's name/date label.
    ///
    /// # Errors
    ///
    /// Returns [`CollabError::Texture`] when no texture could be produced even
    /// with the fallback font.
    async fn create_label_texture(&self, label: &TileLabel) -> Result<Texture, CollabError>;

    /// Render the text of a story button.
    ///
    /// # Errors
    ///
    /// Returns [`CollabError::Texture`] when no texture could be produced.
    async fn create_button_texture(&self, text: &str) -> Result<Texture, CollabError>;

    /// Release a texture created by this factory.
    fn release(&self, texture: Texture);
}

/// Source of the tile records the grid is built from.
#[async_trait]
pub trait TileDataProvider: Send + Sync {
    /// All tile records. Implementations cache the result of the first fetch.
    ///
    /// # Errors
    ///
    /// Returns [`CollabError::TileData`] when the records cannot be fetched.
    async fn fetch_all(&self) -> Result<Vec<TileRecord>, CollabError>;

    /// Drop the cached records so the next fetch goes to the source.
    fn clear_cache(&self);
}

/// Looks up the story behind a tile.
#[async_trait]
pub trait StoryFetchService: Send + Sync {
    /// The story for `tile_id`, or `None` when the tile has none.
    ///
    /// # Errors
    ///
    /// Returns [`CollabError::Story`] when the lookup itself fails.
    async fn fetch_story(&self, tile_id: TileId) -> Result<Option<StoryPayload>, CollabError>;
}
