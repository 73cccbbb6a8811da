//! Wheel zoom: moves the camera toward or away from the wall within limits.
//!
//! Distance is `|position.z|`. In [`ZoomMode::Smoothed`] the wheel only moves a
//! target distance and [`ZoomController::step`] eases the camera toward it
//! each frame. In [`ZoomMode::Instant`] the wheel moves the camera directly.
//! Both paths do nothing while a camera tween is running.

#[cfg(test)]
#[path = "zoom_test.rs"]
mod zoom_test;

use crate::camera::CameraPose;
use crate::consts::WHEEL_DELTA_CAP;

/// How wheel input reaches the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomMode {
    #[default]
    Smoothed,
    Instant,
}

impl ZoomMode {
    /// Parse `smoothed` or `instant`, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smoothed" | "smooth" => Some(Self::Smoothed),
            "instant" => Some(Self::Instant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSettings {
    pub min_distance: f64,
    pub max_distance: f64,
    /// Distance change for one full-strength wheel notch.
    pub zoom_speed: f64,
    /// Fraction of the remaining gap closed per step.
    pub smooth_factor: f64,
    /// Gap below which the camera snaps onto the target.
    pub snap_epsilon: f64,
    pub mode: ZoomMode,
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            min_distance: 20.0,
            max_distance: 50.0,
            zoom_speed: 3.0,
            smooth_factor: 0.1,
            snap_epsilon: 0.01,
            mode: ZoomMode::Smoothed,
        }
    }
}

impl ZoomSettings {
    /// Tuning for [`ZoomMode::Instant`]: larger notches, half the gap per event.
    #[must_use]
    pub fn instant() -> Self {
        Self { zoom_speed: 5.0, smooth_factor: 0.5, mode: ZoomMode::Instant, ..Self::default() }
    }

    #[must_use]
    pub fn clamp(&self, distance: f64) -> f64 {
        distance.clamp(self.min_distance, self.max_distance)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZoomController {
    settings: ZoomSettings,
    target: Option<f64>,
}

impl ZoomController {
    #[must_use]
    pub fn new(settings: ZoomSettings) -> Self {
        Self { settings, target: None }
    }

    #[must_use]
    pub fn settings(&self) -> &ZoomSettings {
        &self.settings
    }

    /// Target distance, once wheel input has set one.
    #[must_use]
    pub fn target(&self) -> Option<f64> {
        self.target
    }

    /// Apply a wheel delta. Negative `delta_y` zooms in.
    ///
    /// Returns whether the event was consumed.
    pub fn on_wheel(&mut self, delta_y: f64, pose: &mut CameraPose, animating: bool) -> bool {
        if animating || !delta_y.is_finite() || delta_y == 0.0 {
            return false;
        }
        let change = delta_y.signum() * delta_y.abs().min(WHEEL_DELTA_CAP) / WHEEL_DELTA_CAP * self.settings.zoom_speed;
        let actual = self.settings.clamp(pose.distance_to_wall());
        let current = match self.settings.mode {
            ZoomMode::Smoothed => self.target.unwrap_or(actual),
            ZoomMode::Instant => actual,
        };
        let next = self.settings.clamp(current + change);
        self.target = Some(next);

        if self.settings.mode == ZoomMode::Instant {
            let z = pose.position.z;
            let goal = wall_side(z) * next;
            let moved = z + (goal - z) * self.settings.smooth_factor;
            pose.position.z = if (goal - moved).abs() < self.settings.snap_epsilon { goal } else { moved };
        }
        true
    }

    /// Ease the camera toward the target distance. Smoothed mode only.
    ///
    /// Returns whether the pose moved.
    pub fn step(&mut self, pose: &mut CameraPose, animating: bool) -> bool {
        if animating || self.settings.mode != ZoomMode::Smoothed {
            return false;
        }
        let Some(target) = self.target else {
            return false;
        };
        let z = pose.position.z;
        let current = z.abs();
        let gap = target - current;
        if gap == 0.0 {
            return false;
        }
        let next = if gap.abs() < self.settings.snap_epsilon {
            target
        } else {
            current + gap * self.settings.smooth_factor
        };
        pose.position.z = wall_side(z) * next;
        true
    }

    /// Forget the target so the next wheel event starts from the camera's
    /// actual distance. Called after a tween moves the camera.
    pub fn resync(&mut self) {
        self.target = None;
    }
}

fn wall_side(z: f64) -> f64 {
    if z < 0.0 { -1.0 } else { 1.0 }
}
