//! Model files resolved under an asset root directory.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use wall::collab::{AssetLoader, CollabError, ModelHandle};

pub struct FsAssetLoader {
    root: PathBuf,
    next_id: AtomicU64,
}

impl FsAssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), next_id: AtomicU64::new(1) }
    }

    /// `path` relative to the root; a leading `/` means the root itself.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(Path::new(path.trim_start_matches('/')))
    }
}

#[async_trait]
impl AssetLoader for FsAssetLoader {
    async fn load(&self, path: &str) -> Result<ModelHandle, CollabError> {
        let full = self.resolve(path);
        let fail = |reason: String| CollabError::Asset { path: path.to_owned(), reason };
        let meta = tokio::fs::metadata(&full)
            .await
            .map_err(|e| fail(format!("{}: {e}", full.display())))?;
        if !meta.is_file() {
            return Err(fail(format!("{} is not a file", full.display())));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(path, id, bytes = meta.len(), "model resolved");
        Ok(ModelHandle { id, path: path.to_owned() })
    }
}

#[cfg(test)]
#[path = "assets_test.rs"]
mod tests;
