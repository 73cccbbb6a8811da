//! Label and button textures sized from estimated text metrics.
//!
//! Nothing is rasterised; each texture is an id plus the dimensions a canvas
//! would have been given. The preferred font is probed once, with a timeout,
//! and every texture after a failed probe is laid out with the system font.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use wall::collab::{CollabError, LabelTextureFactory, Texture, TextureId};
use wall::tile::TileLabel;

pub const LABEL_WIDTH: u32 = 512;
pub const LABEL_HEIGHT: u32 = 256;
pub const BUTTON_FONT_PX: f64 = 32.0;
pub const BUTTON_PADDING_PX: f64 = 24.0;
pub const FONT_PROBE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Average advance of a bold glyph as a fraction of the font size.
const GLYPH_ADVANCE: f64 = 0.56;
/// The hand-drawn label font runs narrower than the system fallback.
const CUSTOM_GLYPH_ADVANCE: f64 = 0.48;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontFace {
    Custom(PathBuf),
    System,
}

impl FontFace {
    fn advance(&self) -> f64 {
        match self {
            Self::Custom(_) => CUSTOM_GLYPH_ADVANCE,
            Self::System => GLYPH_ADVANCE,
        }
    }
}

/// Width in pixels of `text` set at `font_px`.
#[must_use]
pub fn estimate_text_width(text: &str, font_px: f64, face: &FontFace) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let chars = text.chars().count() as f64;
    chars * font_px * face.advance()
}

/// Canvas size of a story button: the text plus padding on every side.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn button_size(text: &str, face: &FontFace) -> (u32, u32) {
    let width = estimate_text_width(text, BUTTON_FONT_PX, face) + BUTTON_PADDING_PX * 2.0;
    let height = BUTTON_FONT_PX + BUTTON_PADDING_PX * 2.0;
    (width.ceil() as u32, height.ceil() as u32)
}

pub struct MetricLabelFactory {
    font_path: Option<PathBuf>,
    probe_timeout: Duration,
    face: OnceCell<FontFace>,
    next_id: AtomicU64,
    live: Mutex<HashSet<TextureId>>,
}

impl MetricLabelFactory {
    pub fn new(font_path: Option<PathBuf>) -> Self {
        Self {
            font_path,
            probe_timeout: FONT_PROBE_TIMEOUT,
            face: OnceCell::new(),
            next_id: AtomicU64::new(1),
            live: Mutex::new(HashSet::new()),
        }
    }

    /// Number of textures created and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// The face in use, probing for it on first call.
    pub async fn face(&self) -> &FontFace {
        self.face.get_or_init(|| probe_font(self.font_path.clone(), self.probe_timeout)).await
    }

    fn issue(&self, width: u32, height: u32) -> Texture {
        let id = TextureId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.live.lock().unwrap_or_else(PoisonError::into_inner).insert(id);
        Texture { id, width, height }
    }
}

async fn probe_font(path: Option<PathBuf>, timeout: Duration) -> FontFace {
    let Some(path) = path else {
        return FontFace::System;
    };
    match tokio::time::timeout(timeout, tokio::fs::metadata(&path)).await {
        Ok(Ok(meta)) if meta.is_file() => {
            tracing::info!(font = %path.display(), "label font loaded");
            FontFace::Custom(path)
        }
        Ok(Ok(_)) => {
            tracing::warn!(font = %path.display(), "label font is not a file; using system font");
            FontFace::System
        }
        Ok(Err(e)) => {
            tracing::warn!(font = %path.display(), error = %e, "label font failed to load; using system font");
            FontFace::System
        }
        Err(_) => {
            tracing::warn!(font = %path.display(), ?timeout, "label font timed out; using system font");
            FontFace::System
        }
    }
}

#[async_trait]
impl LabelTextureFactory for MetricLabelFactory {
    async fn create_label_texture(&self, label: &TileLabel) -> Result<Texture, CollabError> {
        let face = self.face().await;
        let layout = label.layout();
        tracing::trace!(headline = %layout.headline, subline = %layout.subline, ?face, "label texture");
        Ok(self.issue(LABEL_WIDTH, LABEL_HEIGHT))
    }

    async fn create_button_texture(&self, text: &str) -> Result<Texture, CollabError> {
        if text.trim().is_empty() {
            return Err(CollabError::Texture("empty button text".into()));
        }
        let (width, height) = button_size(text, self.face().await);
        Ok(self.issue(width, height))
    }

    fn release(&self, texture: Texture) {
        let removed = self.live.lock().unwrap_or_else(PoisonError::into_inner).remove(&texture.id);
        if !removed {
            tracing::warn!(texture = texture.id.0, "released unknown texture");
        }
    }
}

#[cfg(test)]
#[path = "labels_test.rs"]
mod tests;
