//! Camera pose, perspective projection, and screen-space rays.
//!
//! The wall lies in the `z = 0` plane and the camera looks at it from positive
//! `z`. A pose with zero rotation looks straight down `-Z`, so the camera's
//! distance from the wall is simply `|position.z|`.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use glam::{DQuat, DVec2, DVec3};

use crate::consts::{CAMERA_FOV_DEG, CAMERA_START_DISTANCE};

/// A point in screen space, in CSS pixels relative to the canvas' top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other` in pixels.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Rotation in radians, applied yaw (`y`) first, then pitch (`x`), then roll (`z`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Euler {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Euler {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn to_quat(self) -> DQuat {
        DQuat::from_rotation_y(self.y) * DQuat::from_rotation_x(self.x) * DQuat::from_rotation_z(self.z)
    }

    /// Interpolate each axis independently.
    ///
    /// Not a spherical interpolation; only suitable for the small deltas the
    /// wall camera moves through.
    #[must_use]
    pub fn lerp(self, target: Self, t: f64) -> Self {
        Self {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
            z: self.z + (target.z - self.z) * t,
        }
    }

    /// Orientation that points the camera from `eye` toward `target` with no roll.
    #[must_use]
    pub fn looking_at(eye: DVec3, target: DVec3) -> Self {
        let dir = target - eye;
        if dir.length_squared() <= f64::EPSILON {
            return Self::ZERO;
        }
        let horizontal = dir.x.hypot(dir.z);
        Self { x: dir.y.atan2(horizontal), y: (-dir.x).atan2(-dir.z), z: 0.0 }
    }
}

/// The single camera pose shared by animation, zoom, and pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: DVec3,
    pub rotation: Euler,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self { position: DVec3::new(0.0, 0.0, CAMERA_START_DISTANCE), rotation: Euler::ZERO }
    }
}

impl CameraPose {
    #[must_use]
    pub fn new(position: DVec3, rotation: Euler) -> Self {
        Self { position, rotation }
    }

    /// Unit vector the camera is looking along.
    #[must_use]
    pub fn forward(&self) -> DVec3 {
        self.rotation.to_quat() * DVec3::NEG_Z
    }

    /// Unit vector pointing to the camera's right.
    #[must_use]
    pub fn right(&self) -> DVec3 {
        self.rotation.to_quat() * DVec3::X
    }

    /// Unit vector pointing to the camera's top.
    #[must_use]
    pub fn up(&self) -> DVec3 {
        self.rotation.to_quat() * DVec3::Y
    }

    /// Distance from the wall plane.
    #[must_use]
    pub fn distance_to_wall(&self) -> f64 {
        self.position.z.abs()
    }
}

/// A half-line in world space. `direction` is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    #[must_use]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Perspective projection for the host viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y_deg: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self { fov_y_deg: CAMERA_FOV_DEG, viewport_width: 0.0, viewport_height: 0.0 }
    }
}

impl Projection {
    #[must_use]
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self { viewport_width, viewport_height, ..Self::default() }
    }

    /// Whether the viewport has a usable, non-degenerate size.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.viewport_width > 0.0 && self.viewport_height > 0.0
    }

    #[must_use]
    pub fn aspect(&self) -> f64 {
        if self.is_valid() { self.viewport_width / self.viewport_height } else { 1.0 }
    }

    /// Convert a screen point to normalized device coordinates (`-1..=1`, y up).
    #[must_use]
    pub fn screen_to_ndc(&self, screen: Point) -> DVec2 {
        DVec2::new(
            (screen.x / self.viewport_width) * 2.0 - 1.0,
            -(screen.y / self.viewport_height) * 2.0 + 1.0,
        )
    }

    /// Ray from the camera through `screen`. `None` until the viewport has a size.
    #[must_use]
    pub fn ray_through(&self, pose: &CameraPose, screen: Point) -> Option<Ray> {
        if !self.is_valid() {
            return None;
        }
        let ndc = self.screen_to_ndc(screen);
        let half_height = (self.fov_y_deg.to_radians() * 0.5).tan();
        let local = DVec3::new(ndc.x * half_height * self.aspect(), ndc.y * half_height, -1.0).normalize();
        Some(Ray { origin: pose.position, direction: pose.rotation.to_quat() * local })
    }
}
