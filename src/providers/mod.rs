//! Concrete collaborators for the headless host.
//!
//! | Module | Implements |
//! |--------|------------|
//! | [`assets`] | `AssetLoader` over a directory of model files |
//! | [`labels`] | `LabelTextureFactory` that sizes textures from text metrics |
//! | [`tiles`] | `TileDataProvider` from a JSON file or a paginated CMS |
//! | [`stories`] | `StoryFetchService` over the story API |

pub mod assets;
pub mod labels;
pub mod stories;
pub mod tiles;

use std::time::Duration;

use wall::collab::CollabError;

const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Shared HTTP client for the tile and story endpoints.
pub fn http_client() -> Result<reqwest::Client, CollabError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(|e| CollabError::TileData(format!("http client build failed: {e}")))
}
