//! Tile records from a JSON file or a paginated CMS endpoint.
//!
//! Both providers cache the first successful fetch until `clear_cache`.
//! Names are HTML-entity decoded, since the CMS serves rendered titles.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use wall::collab::{CollabError, TileDataProvider};
use wall::tile::TileRecord;

/// Records requested per CMS page.
pub const PER_PAGE: u32 = 2000;

/// Upper bound on pages followed, whatever the header claims.
const MAX_PAGES: u32 = 100;

#[derive(Default)]
struct RecordCache(Mutex<Option<Vec<TileRecord>>>);

impl RecordCache {
    fn get(&self) -> Option<Vec<TileRecord>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn put(&self, records: &[TileRecord]) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(records.to_vec());
    }

    fn clear(&self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

// =============================================================================
// FILE
// =============================================================================

/// A JSON array of `{id, name, date, story}` objects.
pub struct FileTileData {
    path: PathBuf,
    cache: RecordCache,
}

impl FileTileData {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), cache: RecordCache::default() }
    }
}

#[async_trait]
impl TileDataProvider for FileTileData {
    async fn fetch_all(&self) -> Result<Vec<TileRecord>, CollabError> {
        if let Some(records) = self.cache.get() {
            return Ok(records);
        }
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CollabError::TileData(format!("{}: {e}", self.path.display())))?;
        let records = parse_records(&raw)?;
        tracing::info!(path = %self.path.display(), count = records.len(), "tile records loaded");
        self.cache.put(&records);
        Ok(records)
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }
}

pub fn parse_records(json: &str) -> Result<Vec<TileRecord>, CollabError> {
    let mut records: Vec<TileRecord> =
        serde_json::from_str(json).map_err(|e| CollabError::TileData(format!("invalid tile JSON: {e}")))?;
    for record in &mut records {
        record.name = decode_entities(&record.name);
    }
    Ok(records)
}

// =============================================================================
// HTTP
// =============================================================================

/// WordPress-style `lock` collection, paged via the `X-WP-TotalPages` header.
pub struct HttpTileData {
    http: reqwest::Client,
    base: String,
    cache: RecordCache,
}

impl HttpTileData {
    pub fn new(http: reqwest::Client, base: impl Into<String>) -> Self {
        Self { http, base: base.into(), cache: RecordCache::default() }
    }

    #[must_use]
    pub fn page_url(&self, page: u32) -> String {
        format!(
            "{}/lock?per_page={PER_PAGE}&page={page}&_fields[]=title&_fields[]=acf&_fields[]=id",
            self.base
        )
    }

    async fn fetch_page(&self, page: u32) -> Result<(Vec<TileRecord>, u32), CollabError> {
        let response = self
            .http
            .get(self.page_url(page))
            .send()
            .await
            .map_err(|e| CollabError::TileData(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CollabError::TileData(format!("page {page}: HTTP {status}")));
        }
        let total = total_pages(
            response.headers().get("X-WP-TotalPages").and_then(|v| v.to_str().ok()),
            page,
        );
        let body = response.text().await.map_err(|e| CollabError::TileData(e.to_string()))?;
        Ok((parse_page(&body)?, total))
    }
}

#[async_trait]
impl TileDataProvider for HttpTileData {
    async fn fetch_all(&self) -> Result<Vec<TileRecord>, CollabError> {
        if let Some(records) = self.cache.get() {
            return Ok(records);
        }
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            let (mut batch, total) = self.fetch_page(page).await?;
            tracing::debug!(page, total, count = batch.len(), "tile page fetched");
            records.append(&mut batch);
            if page >= total.min(MAX_PAGES) {
                break;
            }
            page += 1;
        }
        tracing::info!(base = %self.base, count = records.len(), "tile records fetched");
        self.cache.put(&records);
        Ok(records)
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Page count from the header; a missing or malformed one ends at `page`.
#[must_use]
pub fn total_pages(header: Option<&str>, page: u32) -> u32 {
    header.and_then(|h| h.trim().parse().ok()).unwrap_or(page)
}

/// One page of CMS lock objects.
///
/// Each looks like `{"id": 7, "title": {"rendered": "..."}, "acf": {...}}`.
/// `acf` may be an object, an empty array, or absent.
pub fn parse_page(json: &str) -> Result<Vec<TileRecord>, CollabError> {
    let items: Vec<Value> =
        serde_json::from_str(json).map_err(|e| CollabError::TileData(format!("invalid page JSON: {e}")))?;
    items
        .iter()
        .map(|item| {
            let id = item
                .get("id")
                .and_then(Value::as_u64)
                .ok_or_else(|| CollabError::TileData("lock without numeric id".into()))?;
            let name = item
                .pointer("/title/rendered")
                .and_then(Value::as_str)
                .map(decode_entities)
                .unwrap_or_default();
            let date = item.pointer("/acf/lock_date").and_then(Value::as_str).map(str::to_owned);
            let has_story = item.pointer("/acf/show_lock_story").is_some_and(truthy);
            Ok(TileRecord { id, name, date, has_story })
        })
        .collect()
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(s.trim(), "" | "0" | "false"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
        Value::Null => false,
    }
}

/// Decode the HTML entities a CMS leaves in rendered titles.
#[must_use]
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let entity = tail
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|ch| (ch, end)));
        match entity {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "hellip" => '\u{2026}',
        _ => return None,
    })
}

#[cfg(test)]
#[path = "tiles_test.rs"]
mod tests;
