#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::collab::{Texture, TextureId};
use crate::tile::TileLabel;

fn tile(id: TileId, x: f64, y: f64, has_story: bool) -> TileEntity {
    TileEntity {
        id,
        index: 0,
        row: 0,
        col: 0,
        position: DVec2::new(x, y),
        rotation_y: 0.0,
        model_variant: 0,
        label: TileLabel { name: format!("tile-{id}"), date: String::new(), has_story },
        label_texture: Texture { id: TextureId(id), width: 512, height: 256 },
        fallback: false,
    }
}

fn affordance_for(t: &TileEntity) -> Affordance {
    Affordance::attach(t, Texture { id: TextureId(1000 + t.id), width: 240, height: 80 })
}

fn populated() -> SceneRegistry {
    let mut reg = SceneRegistry::new();
    for (id, story) in [(1, false), (2, true), (3, true), (4, false), (5, true)] {
        let t = tile(id, id as f64 * 9.0, 0.0, story);
        let aff = story.then(|| affordance_for(&t));
        assert!(reg.insert_tile(t));
        if let Some(aff) = aff {
            assert!(reg.attach_affordance(aff));
        }
    }
    reg
}

// =============================================================
// Insertion
// =============================================================

#[test]
fn new_registry_is_empty() {
    let reg = SceneRegistry::new();
    assert!(reg.is_empty());
    assert_eq!(reg.affordance_count(), 0);
    assert!(reg.bounds().is_none());
    assert!(reg.hovered().is_none());
}

#[test]
fn duplicate_tile_id_is_rejected() {
    let mut reg = SceneRegistry::new();
    assert!(reg.insert_tile(tile(1, 0.0, 0.0, false)));
    assert!(!reg.insert_tile(tile(1, 5.0, 5.0, true)));
    assert_eq!(reg.len(), 1);
    assert_eq!(reg.get(1).unwrap().position, DVec2::ZERO);
}

#[test]
fn affordance_requires_story_tile() {
    let mut reg = SceneRegistry::new();
    let plain = tile(1, 0.0, 0.0, false);
    let aff = affordance_for(&plain);
    reg.insert_tile(plain);
    assert!(!reg.attach_affordance(aff));
    assert_eq!(reg.affordance_count(), 0);
}

#[test]
fn affordance_for_unknown_tile_is_rejected() {
    let mut reg = SceneRegistry::new();
    let orphan = tile(9, 0.0, 0.0, true);
    assert!(!reg.attach_affordance(affordance_for(&orphan)));
}

#[test]
fn second_affordance_for_tile_is_rejected() {
    let mut reg = populated();
    let t = reg.get(2).unwrap().clone();
    assert!(!reg.attach_affordance(affordance_for(&t)));
    assert_eq!(reg.affordance_count(), 3);
}

// =============================================================
// Queries
// =============================================================

#[test]
fn by_index_follows_build_order() {
    let reg = populated();
    assert_eq!(reg.by_index(0).unwrap().id, 1);
    assert_eq!(reg.by_index(4).unwrap().id, 5);
    assert!(reg.by_index(5).is_none());
}

#[test]
fn story_tile_ignores_plain_tiles() {
    let reg = populated();
    assert!(reg.story_tile(2).is_some());
    assert!(reg.story_tile(1).is_none());
    assert!(reg.story_tile(99).is_none());
}

#[test]
fn story_tile_ids_in_order() {
    assert_eq!(populated().story_tile_ids(), vec![2, 3, 5]);
}

#[test]
fn affordances_iterate_in_build_order() {
    let ids = populated().affordances().map(|a| a.tile_id).collect::<Vec<_>>();
    assert_eq!(ids, vec![2, 3, 5]);
}

#[test]
fn random_story_tile_respects_exclusion() {
    let reg = populated();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..100 {
        let picked = reg.random_story_tile(&mut rng, Some(3)).unwrap();
        assert!(picked.has_story());
        assert_ne!(picked.id, 3);
    }
}

#[test]
fn random_story_tile_with_only_excluded_candidate_is_none() {
    let mut reg = SceneRegistry::new();
    let t = tile(1, 0.0, 0.0, true);
    let aff = affordance_for(&t);
    reg.insert_tile(t);
    reg.attach_affordance(aff);
    let mut rng = StdRng::seed_from_u64(1);
    assert!(reg.random_story_tile(&mut rng, Some(1)).is_none());
    assert_eq!(reg.random_story_tile(&mut rng, None).unwrap().id, 1);
}

#[test]
fn random_tile_on_empty_registry_is_none() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(SceneRegistry::new().random_tile(&mut rng).is_none());
}

#[test]
fn bounds_cover_all_centers() {
    let mut reg = populated();
    reg.insert_tile(tile(6, -3.0, 12.0, false));
    let (min, max) = reg.bounds().unwrap();
    assert_eq!(min, DVec2::new(-3.0, 0.0));
    assert_eq!(max, DVec2::new(45.0, 12.0));
}

// =============================================================
// Hover
// =============================================================

#[test]
fn hover_marks_single_affordance() {
    let mut reg = populated();
    assert!(reg.set_hovered(Some(2)));
    assert!(reg.affordance(2).unwrap().hovered);
    assert!(reg.set_hovered(Some(3)));
    assert!(!reg.affordance(2).unwrap().hovered);
    assert!(reg.affordance(3).unwrap().hovered);
    assert_eq!(reg.affordances().filter(|a| a.hovered).count(), 1);
}

#[test]
fn hover_same_affordance_reports_no_change() {
    let mut reg = populated();
    assert!(reg.set_hovered(Some(5)));
    assert!(!reg.set_hovered(Some(5)));
}

#[test]
fn hover_on_plain_tile_clears() {
    let mut reg = populated();
    reg.set_hovered(Some(2));
    assert!(reg.set_hovered(Some(1)));
    assert!(reg.hovered().is_none());
    assert!(reg.affordances().all(|a| !a.hovered));
}

// =============================================================
// Drain
// =============================================================

#[test]
fn drain_empties_everything() {
    let mut reg = populated();
    reg.set_hovered(Some(2));
    let (tiles, affs) = reg.drain();
    assert_eq!(tiles.len(), 5);
    assert_eq!(affs.len(), 3);
    assert!(reg.is_empty());
    assert_eq!(reg.affordance_count(), 0);
    assert!(reg.hovered().is_none());
    assert!(reg.by_index(0).is_none());
}

#[test]
fn drain_on_empty_registry_is_noop() {
    let mut reg = SceneRegistry::new();
    let (tiles, affs) = reg.drain();
    assert!(tiles.is_empty());
    assert!(affs.is_empty());
}
