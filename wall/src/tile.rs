//! Tile data model: records, labels, placed entities, and story affordances.

#[cfg(test)]
#[path = "tile_test.rs"]
mod tile_test;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::collab::Texture;
use crate::consts::{AFFORDANCE_HEIGHT, AFFORDANCE_OFFSET_Y, AFFORDANCE_OFFSET_Z};

/// Identifier of a tile, as assigned by the tile data source.
pub type TileId = u64;

/// A tile as delivered by the [`crate::collab::TileDataProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRecord {
    pub id: TileId,
    pub name: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, alias = "story")]
    pub has_story: bool,
}

impl TileRecord {
    #[must_use]
    pub fn new(id: TileId, name: impl Into<String>, date: impl Into<String>, has_story: bool) -> Self {
        Self { id, name: name.into(), date: Some(date.into()), has_story }
    }
}

/// Text shown on a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLabel {
    pub name: String,
    pub date: String,
    pub has_story: bool,
}

/// Two-line label text plus a font scale for long names.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub headline: String,
    pub subline: String,
    pub font_scale: f64,
}

impl TileLabel {
    #[must_use]
    pub fn from_record(record: &TileRecord) -> Self {
        Self {
            name: record.name.clone(),
            date: record.date.clone().unwrap_or_default(),
            has_story: record.has_story,
        }
    }

    /// Lay out the label: upper-cased name on top, date (or `STORY`) below.
    #[must_use]
    pub fn layout(&self) -> LabelLayout {
        let upper = self.name.to_uppercase();
        let (headline, subline) = if self.has_story {
            (format!("{upper}'S"), "STORY".to_owned())
        } else {
            (upper, self.date.clone())
        };
        let len = self.name.chars().count();
        let font_scale = if len > 8 {
            0.8
        } else if len > 6 {
            0.9
        } else {
            1.0
        };
        LabelLayout { headline, subline, font_scale }
    }

    /// Text of the story button for this tile.
    #[must_use]
    pub fn button_text(&self) -> String {
        format!("See {}'s Story", title_case(&self.name))
    }
}

/// Lower-case everything, then capitalise the first letter of each word.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        let word_char = ch.is_alphanumeric() || ch == '_';
        if word_char && at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        at_word_start = !word_char;
    }
    out
}

/// One placed lock on the wall.
#[derive(Debug, Clone, PartialEq)]
pub struct TileEntity {
    pub id: TileId,
    /// Position in build order.
    pub index: usize,
    pub row: usize,
    pub col: usize,
    /// Center on the wall plane.
    pub position: DVec2,
    /// Yaw jitter in radians.
    pub rotation_y: f64,
    /// Index into the loaded base models.
    pub model_variant: usize,
    pub label: TileLabel,
    pub label_texture: Texture,
    /// Placement ran out of retries and took the unjittered lattice position.
    pub fallback: bool,
}

impl TileEntity {
    #[must_use]
    pub fn world_position(&self) -> DVec3 {
        self.position.extend(0.0)
    }

    #[must_use]
    pub fn has_story(&self) -> bool {
        self.label.has_story
    }
}

/// The clickable "see story" button bound to a story tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Affordance {
    pub tile_id: TileId,
    pub texture: Texture,
    pub center: DVec3,
    /// Rotation about the wall normal, matching the tile's yaw jitter.
    pub roll: f64,
    pub width: f64,
    pub height: f64,
    pub current_scale: f64,
    pub hovered: bool,
}

impl Affordance {
    /// Place a button below `tile`, sized from the texture's aspect ratio.
    #[must_use]
    pub fn attach(tile: &TileEntity, texture: Texture) -> Self {
        let width = texture.aspect() * AFFORDANCE_HEIGHT;
        Self {
            tile_id: tile.id,
            center: DVec3::new(tile.position.x, tile.position.y + AFFORDANCE_OFFSET_Y, AFFORDANCE_OFFSET_Z),
            roll: tile.rotation_y,
            width,
            height: AFFORDANCE_HEIGHT,
            texture,
            current_scale: 1.0,
            hovered: false,
        }
    }
}
