//! Story lookups against `GET {base}/stories/{tile_id}`.

use async_trait::async_trait;
use serde::Deserialize;
use wall::collab::{CollabError, StoryFetchService, StoryPayload};
use wall::tile::TileId;

pub struct HttpStoryService {
    http: reqwest::Client,
    base: String,
}

impl HttpStoryService {
    pub fn new(http: reqwest::Client, base: impl Into<String>) -> Self {
        Self { http, base: base.into() }
    }

    #[must_use]
    pub fn story_url(&self, tile_id: TileId) -> String {
        format!("{}/stories/{tile_id}", self.base)
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    data: Option<StoryPayload>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl StoryFetchService for HttpStoryService {
    async fn fetch_story(&self, tile_id: TileId) -> Result<Option<StoryPayload>, CollabError> {
        let response = self
            .http
            .get(self.story_url(tile_id))
            .send()
            .await
            .map_err(|e| CollabError::Story(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| CollabError::Story(e.to_string()))?;
        parse_story_response(status, &body)
    }
}

/// Interpret a story endpoint reply. `404` means the tile has no story.
pub fn parse_story_response(status: u16, body: &str) -> Result<Option<StoryPayload>, CollabError> {
    if status == 404 {
        return Ok(None);
    }
    if !(200..300).contains(&status) {
        return Err(CollabError::Story(format!("HTTP {status}")));
    }
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| CollabError::Story(format!("invalid story JSON: {e}")))?;
    if !envelope.success {
        return Err(CollabError::Story(envelope.error.unwrap_or_else(|| "request failed".into())));
    }
    Ok(envelope.data)
}

#[cfg(test)]
#[path = "stories_test.rs"]
mod tests;
