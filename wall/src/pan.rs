//! Drag panning parallel to the wall.

#[cfg(test)]
#[path = "pan_test.rs"]
mod pan_test;

use glam::{DVec2, DVec3};

use crate::camera::{CameraPose, Point};

/// Rectangle the camera's `(x, y)` is kept inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanBounds {
    pub min: DVec2,
    pub max: DVec2,
}

impl Default for PanBounds {
    fn default() -> Self {
        Self { min: DVec2::new(-110.0, -125.0), max: DVec2::new(115.0, 130.0) }
    }
}

impl PanBounds {
    /// Bounds covering a grid extent plus `margin` on every side.
    #[must_use]
    pub fn around(min: DVec2, max: DVec2, margin: f64) -> Self {
        Self { min: min - DVec2::splat(margin), max: max + DVec2::splat(margin) }
    }

    #[must_use]
    pub fn clamp(&self, position: DVec3) -> DVec3 {
        DVec3::new(
            position.x.clamp(self.min.x, self.max.x),
            position.y.clamp(self.min.y, self.max.y),
            position.z,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSettings {
    /// World units moved per pixel of mouse drag.
    pub sensitivity: f64,
    /// Extra factor applied to touch drags.
    pub touch_multiplier: f64,
}

impl Default for PanSettings {
    fn default() -> Self {
        Self { sensitivity: 0.025, touch_multiplier: 2.0 }
    }
}

/// Which device is dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanSource {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Default)]
pub struct PanController {
    settings: PanSettings,
    bounds: PanBounds,
    last: Option<Point>,
}

impl PanController {
    #[must_use]
    pub fn new(settings: PanSettings) -> Self {
        Self { settings, ..Self::default() }
    }

    #[must_use]
    pub fn bounds(&self) -> PanBounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: PanBounds) {
        self.bounds = bounds;
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.last.is_some()
    }

    /// Start a drag at `at`. Refused while a tween is running.
    pub fn begin(&mut self, at: Point, animating: bool) -> bool {
        if animating {
            return false;
        }
        self.last = Some(at);
        true
    }

    /// Continue the drag to `to`, moving the camera opposite to the pointer.
    ///
    /// Returns whether the pose moved.
    pub fn drag(&mut self, to: Point, source: PanSource, pose: &mut CameraPose, animating: bool) -> bool {
        let Some(last) = self.last else {
            return false;
        };
        if animating {
            return false;
        }
        let scale = match source {
            PanSource::Mouse => self.settings.sensitivity,
            PanSource::Touch => self.settings.sensitivity * self.settings.touch_multiplier,
        };
        let dx = to.x - last.x;
        let dy = to.y - last.y;
        let (right, up) = wall_axes(pose);
        let moved = pose.position + right * (-dx * scale) + up * (dy * scale);
        pose.position = self.bounds.clamp(moved);
        self.last = Some(to);
        true
    }

    pub fn end(&mut self) {
        self.last = None;
    }
}

/// Camera right and up, flattened onto the wall plane so panning never
/// changes the distance to the wall.
fn wall_axes(pose: &CameraPose) -> (DVec3, DVec3) {
    let flatten = |v: DVec3, fallback: DVec3| DVec3::new(v.x, v.y, 0.0).try_normalize().unwrap_or(fallback);
    (flatten(pose.right(), DVec3::X), flatten(pose.up(), DVec3::Y))
}
