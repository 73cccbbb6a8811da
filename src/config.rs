//! Host configuration from the environment and command line.
//!
//! Every flag can also be set through its `LOCKWALL_*` environment variable;
//! `main` loads a `.env` file first, so both sources feed the same parser.

use std::path::PathBuf;

use clap::Parser;
use wall::engine::EngineConfig;
use wall::layout::LayoutConfig;
use wall::tile::TileId;
use wall::zoom::{ZoomMode, ZoomSettings};

pub const DEFAULT_ASSET_ROOT: &str = "public";
pub const DEFAULT_VIEWPORT: &str = "1280x720";
pub const DEFAULT_FPS_CAP: f64 = 60.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no tile source; set LOCKWALL_TILES or LOCKWALL_API_BASE")]
    NoTileSource,
    #[error("LOCKWALL_TILES and LOCKWALL_API_BASE are mutually exclusive")]
    ConflictingTileSource,
    #[error("invalid viewport `{0}` (expected WIDTHxHEIGHT)")]
    InvalidViewport(String),
    #[error("invalid zoom mode `{0}` (expected `smoothed` or `instant`)")]
    InvalidZoomMode(String),
    #[error("invalid fps cap {0}")]
    InvalidFpsCap(f64),
}

#[derive(Parser, Debug)]
#[command(name = "lockwall", about = "Headless lock wall engine driven from stdin")]
pub struct Cli {
    /// JSON file holding the tile records.
    #[arg(long, env = "LOCKWALL_TILES")]
    pub tiles: Option<PathBuf>,

    /// Base URL of the CMS serving tile records.
    #[arg(long, env = "LOCKWALL_API_BASE")]
    pub api_base: Option<String>,

    /// Base URL of the story API; story lookups are skipped when unset.
    #[arg(long, env = "LOCKWALL_STORY_BASE")]
    pub story_base: Option<String>,

    #[arg(long, env = "LOCKWALL_ASSET_ROOT", default_value = DEFAULT_ASSET_ROOT)]
    pub asset_root: PathBuf,

    /// Preferred label font; a system font is used when it is missing.
    #[arg(long, env = "LOCKWALL_FONT_PATH")]
    pub font_path: Option<PathBuf>,

    #[arg(long, env = "LOCKWALL_SEED")]
    pub seed: Option<u64>,

    /// Frames per second; 0 renders on every tick.
    #[arg(long, env = "LOCKWALL_FPS_CAP", default_value_t = DEFAULT_FPS_CAP)]
    pub fps_cap: f64,

    #[arg(long, env = "LOCKWALL_ZOOM_MODE", default_value = "smoothed")]
    pub zoom_mode: String,

    #[arg(long, env = "LOCKWALL_VIEWPORT", default_value = DEFAULT_VIEWPORT)]
    pub viewport: String,

    /// Exit after this many rendered frames.
    #[arg(long, env = "LOCKWALL_FRAMES")]
    pub frames: Option<u64>,

    /// Tile to open on instead of the intro flight.
    #[arg(long, env = "LOCKWALL_FOCUS")]
    pub focus: Option<TileId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileSource {
    File(PathBuf),
    Http(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub tiles: TileSource,
    pub story_base: Option<String>,
    pub asset_root: PathBuf,
    pub font_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub fps_cap: f64,
    pub zoom_mode: ZoomMode,
    pub viewport: Viewport,
    pub frames: Option<u64>,
    pub focus: Option<TileId>,
}

impl AppConfig {
    /// Validate parsed command-line arguments.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let tiles = match (cli.tiles, cli.api_base) {
            (Some(path), None) => TileSource::File(path),
            (None, Some(base)) => TileSource::Http(base.trim_end_matches('/').to_owned()),
            (None, None) => return Err(ConfigError::NoTileSource),
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingTileSource),
        };
        if !cli.fps_cap.is_finite() || cli.fps_cap < 0.0 {
            return Err(ConfigError::InvalidFpsCap(cli.fps_cap));
        }
        let zoom_mode = ZoomMode::parse(&cli.zoom_mode).ok_or(ConfigError::InvalidZoomMode(cli.zoom_mode))?;

        Ok(Self {
            tiles,
            story_base: cli.story_base.map(|b| b.trim_end_matches('/').to_owned()),
            asset_root: cli.asset_root,
            font_path: cli.font_path,
            seed: cli.seed,
            fps_cap: cli.fps_cap,
            zoom_mode,
            viewport: parse_viewport(&cli.viewport)?,
            frames: cli.frames,
            focus: cli.focus,
        })
    }

    /// Engine tuning derived from this config; everything else keeps its default.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            layout: LayoutConfig { seed: self.seed, ..LayoutConfig::default() },
            zoom: match self.zoom_mode {
                ZoomMode::Smoothed => ZoomSettings::default(),
                ZoomMode::Instant => ZoomSettings::instant(),
            },
            ..EngineConfig::default()
        }
        .with_fps_cap(self.fps_cap)
    }

    /// Interval between frame ticks in milliseconds.
    #[must_use]
    pub fn tick_ms(&self) -> u64 {
        let fps = if self.fps_cap > 0.0 { self.fps_cap } else { DEFAULT_FPS_CAP };
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ms = (1000.0 / fps).round() as u64;
        ms.max(1)
    }
}

pub fn parse_viewport(raw: &str) -> Result<Viewport, ConfigError> {
    let invalid = || ConfigError::InvalidViewport(raw.to_owned());
    let (w, h) = raw.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
    let width: f64 = w.trim().parse().map_err(|_| invalid())?;
    let height: f64 = h.trim().parse().map_err(|_| invalid())?;
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(invalid());
    }
    Ok(Viewport { width, height })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
