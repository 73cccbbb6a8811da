//! Ray casting against tile bodies and story buttons.
//!
//! Every pickable thing on the wall is a flat, oriented rectangle: tile bodies
//! stand slightly proud of the wall and buttons float in front of their tiles.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use glam::{DQuat, DVec3};

use crate::camera::Ray;
use crate::consts::{TILE_HIT_DEPTH, TILE_HIT_HEIGHT, TILE_HIT_WIDTH};
use crate::registry::SceneRegistry;
use crate::tile::{Affordance, TileEntity, TileId};

/// What a ray struck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Tile,
    Affordance,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub tile_id: TileId,
    pub kind: HitKind,
    /// Distance along the ray.
    pub distance: f64,
    pub point: DVec3,
}

/// An oriented rectangle in world space. `right` and `up` are unit vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub center: DVec3,
    pub right: DVec3,
    pub up: DVec3,
    pub half_width: f64,
    pub half_height: f64,
}

impl Quad {
    /// The clickable face of a tile, turned by its yaw jitter.
    #[must_use]
    pub fn tile_body(tile: &TileEntity) -> Self {
        Self {
            center: tile.position.extend(TILE_HIT_DEPTH),
            right: DQuat::from_rotation_y(tile.rotation_y) * DVec3::X,
            up: DVec3::Y,
            half_width: TILE_HIT_WIDTH / 2.0,
            half_height: TILE_HIT_HEIGHT / 2.0,
        }
    }

    /// A story button at its current pulse scale.
    #[must_use]
    pub fn affordance(affordance: &Affordance) -> Self {
        let roll = DQuat::from_rotation_z(affordance.roll);
        Self {
            center: affordance.center,
            right: roll * DVec3::X,
            up: roll * DVec3::Y,
            half_width: affordance.width * affordance.current_scale / 2.0,
            half_height: affordance.height * affordance.current_scale / 2.0,
        }
    }

    /// Distance along `ray` to the quad, if it is hit in front of the origin.
    #[must_use]
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let normal = self.right.cross(self.up);
        let denom = ray.direction.dot(normal);
        if denom.abs() < 1e-12 {
            return None;
        }
        let t = (self.center - ray.origin).dot(normal) / denom;
        if t <= 0.0 {
            return None;
        }
        let local = ray.at(t) - self.center;
        let inside = local.dot(self.right).abs() <= self.half_width && local.dot(self.up).abs() <= self.half_height;
        inside.then_some(t)
    }
}

/// Every tile body and button `ray` passes through, nearest first.
#[must_use]
pub fn raycast(registry: &SceneRegistry, ray: &Ray) -> Vec<Hit> {
    let tiles = registry.tiles().map(|t| (t.id, HitKind::Tile, Quad::tile_body(t)));
    let buttons = registry
        .affordances()
        .map(|a| (a.tile_id, HitKind::Affordance, Quad::affordance(a)));
    let mut hits = tiles
        .chain(buttons)
        .filter_map(|(tile_id, kind, quad)| {
            quad.intersect(ray)
                .map(|distance| Hit { tile_id, kind, distance, point: ray.at(distance) })
        })
        .collect::<Vec<_>>();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// The nearest button among `hits`.
#[must_use]
pub fn first_affordance(hits: &[Hit]) -> Option<&Hit> {
    hits.iter().find(|h| h.kind == HitKind::Affordance)
}
