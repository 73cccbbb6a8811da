//! In-memory collaborators shared by the unit tests.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::collab::{AssetLoader, CollabError, LabelTextureFactory, ModelHandle, Texture, TextureId, TileDataProvider};
use crate::tile::{TileLabel, TileRecord};

/// `count` records with ids `1..=count`; every `story_every`-th one has a story.
pub fn records(count: u64, story_every: u64) -> Vec<TileRecord> {
    (1..=count)
        .map(|id| TileRecord::new(id, format!("Person {id}"), "2021-06-01", story_every > 0 && id % story_every == 0))
        .collect()
}

#[derive(Default)]
pub struct MockAssets {
    pub fail_path: Option<String>,
    loads: AtomicUsize,
}

impl MockAssets {
    pub fn failing(path: &str) -> Self {
        Self { fail_path: Some(path.to_owned()), ..Self::default() }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetLoader for MockAssets {
    async fn load(&self, path: &str) -> Result<ModelHandle, CollabError> {
        let n = self.loads.fetch_add(1, Ordering::SeqCst) as u64;
        if self.fail_path.as_deref() == Some(path) {
            return Err(CollabError::Asset { path: path.to_owned(), reason: "not found".into() });
        }
        Ok(ModelHandle { id: n, path: path.to_owned() })
    }
}

/// Texture factory that tracks every live texture.
#[derive(Default)]
pub struct MockTextures {
    /// Creation attempts at or beyond this count fail.
    pub fail_after: Option<usize>,
    next: AtomicU64,
    created: AtomicUsize,
    live: Mutex<HashSet<TextureId>>,
    bad_releases: AtomicUsize,
}

impl MockTextures {
    pub fn failing_after(n: usize) -> Self {
        Self { fail_after: Some(n), ..Self::default() }
    }

    pub fn live(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn bad_releases(&self) -> usize {
        self.bad_releases.load(Ordering::SeqCst)
    }

    fn make(&self, width: u32, height: u32) -> Result<Texture, CollabError> {
        let attempt = self.created.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| attempt >= limit) {
            return Err(CollabError::Texture("canvas unavailable".into()));
        }
        let id = TextureId(self.next.fetch_add(1, Ordering::SeqCst));
        self.live.lock().unwrap().insert(id);
        Ok(Texture { id, width, height })
    }
}

#[async_trait]
impl LabelTextureFactory for MockTextures {
    async fn create_label_texture(&self, _label: &TileLabel) -> Result<Texture, CollabError> {
        self.make(512, 256)
    }

    async fn create_button_texture(&self, _text: &str) -> Result<Texture, CollabError> {
        self.make(360, 120)
    }

    fn release(&self, texture: Texture) {
        if !self.live.lock().unwrap().remove(&texture.id) {
            self.bad_releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Tile source serving a fixed record list.
#[derive(Default)]
pub struct MockTiles {
    pub records: Vec<TileRecord>,
    pub fail: AtomicBool,
    fetches: AtomicUsize,
    clears: AtomicUsize,
}

impl MockTiles {
    pub fn new(records: Vec<TileRecord>) -> Self {
        Self { records, ..Self::default() }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TileDataProvider for MockTiles {
    async fn fetch_all(&self) -> Result<Vec<TileRecord>, CollabError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(CollabError::TileData("503".into()));
        }
        Ok(self.records.clone())
    }

    fn clear_cache(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}
