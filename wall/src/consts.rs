//! Shared numeric constants for the wall crate.

// ── Camera ──────────────────────────────────────────────────────

/// Vertical field of view of the wall camera, in degrees.
pub const CAMERA_FOV_DEG: f64 = 75.0;

/// Distance from the wall of the camera before any animation runs.
pub const CAMERA_START_DISTANCE: f64 = 40.0;

/// Distance from the wall when framing a story tile.
pub const STORY_VIEW_DISTANCE: f64 = 20.0;

// ── Tiles ───────────────────────────────────────────────────────

/// Width of a tile's clickable body in world units.
pub const TILE_HIT_WIDTH: f64 = 4.0;

/// Height of a tile's clickable body in world units.
pub const TILE_HIT_HEIGHT: f64 = 5.0;

/// Depth (z) of the front face of a tile body.
pub const TILE_HIT_DEPTH: f64 = 0.5;

// ── Story affordance ────────────────────────────────────────────

/// Vertical offset of the story button below its tile's center.
pub const AFFORDANCE_OFFSET_Y: f64 = -1.3;

/// Distance of the story button in front of the wall.
pub const AFFORDANCE_OFFSET_Z: f64 = 1.1;

/// Height of the story button quad; width follows the texture aspect ratio.
pub const AFFORDANCE_HEIGHT: f64 = 1.2;

// ── Gestures ────────────────────────────────────────────────────

/// Pointer displacement in CSS pixels beyond which a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// Touches released sooner than this, in milliseconds, count as taps.
pub const TAP_MAX_DURATION_MS: f64 = 300.0;

/// Multiplier from pinch distance change (px) to synthetic wheel delta.
pub const PINCH_WHEEL_SCALE: f64 = 2.0;

/// Largest wheel delta magnitude honoured per event.
pub const WHEEL_DELTA_CAP: f64 = 100.0;

// ── Frame timing ────────────────────────────────────────────────

/// Frame delta used when the host reports a non-positive one.
pub const FALLBACK_FRAME_SECS: f64 = 1.0 / 60.0;
