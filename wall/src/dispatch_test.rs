#![allow(clippy::float_cmp)]

use glam::{DVec2, DVec3};

use super::*;
use crate::camera::Euler;
use crate::collab::{Texture, TextureId};
use crate::tile::{Affordance, TileEntity, TileLabel};
use crate::zoom::ZoomSettings;

const CENTER: Point = Point { x: 400.0, y: 300.0 };

struct Fixture {
    registry: SceneRegistry,
    pose: CameraPose,
    projection: Projection,
    zoom: ZoomController,
    dispatcher: InteractionDispatcher,
}

impl Fixture {
    /// Story tile 1 ("Ana") at the origin, plain tile 2 ("Bo") at x = 9.
    fn new() -> Self {
        let mut registry = SceneRegistry::new();
        let story = tile(1, "Ana", 0.0, true);
        let aff = Affordance::attach(&story, Texture { id: TextureId(10), width: 300, height: 100 });
        registry.insert_tile(story);
        registry.insert_tile(tile(2, "Bo", 9.0, false));
        registry.attach_affordance(aff);
        Self {
            registry,
            pose: CameraPose::default(),
            projection: Projection::new(800.0, 600.0),
            zoom: ZoomController::new(ZoomSettings::default()),
            dispatcher: InteractionDispatcher::default(),
        }
    }

    /// Put the camera straight in front of `(x, y)` so the screen center looks at it.
    fn look_at(&mut self, x: f64, y: f64) {
        self.pose = CameraPose::new(DVec3::new(x, y, 40.0), Euler::ZERO);
    }

    fn look_at_button(&mut self) {
        self.look_at(0.0, -1.3);
    }

    fn ctx(&mut self, animating: bool) -> (InteractionContext<'_>, &mut InteractionDispatcher) {
        (
            InteractionContext {
                registry: &mut self.registry,
                pose: &mut self.pose,
                projection: &self.projection,
                zoom: &mut self.zoom,
                animating,
            },
            &mut self.dispatcher,
        )
    }

    fn click(&mut self, at: Point) -> Vec<Action> {
        let (mut ctx, d) = self.ctx(false);
        d.on_pointer_down(&mut ctx, at);
        d.on_pointer_up();
        d.on_click(&mut ctx, at)
    }

    fn hover(&mut self, at: Point) -> Vec<Action> {
        let (mut ctx, d) = self.ctx(false);
        d.on_pointer_move(&mut ctx, at)
    }

    fn tap(&mut self, at: Point, held_ms: f64) -> Vec<Action> {
        let (mut ctx, d) = self.ctx(false);
        d.on_touch_start(&mut ctx, &[at], 1000.0);
        d.on_touch_end(&mut ctx, &[], 1000.0 + held_ms)
    }
}

fn tile(id: TileId, name: &str, x: f64, has_story: bool) -> TileEntity {
    TileEntity {
        id,
        index: 0,
        row: 0,
        col: 0,
        position: DVec2::new(x, 0.0),
        rotation_y: 0.0,
        model_variant: 0,
        label: TileLabel { name: name.into(), date: String::new(), has_story },
        label_texture: Texture { id: TextureId(id), width: 512, height: 256 },
        fallback: false,
    }
}

fn story(id: TileId, name: &str) -> Action {
    Action::StorySelected { tile_id: id, tile_name: name.into() }
}

// =============================================================
// Click
// =============================================================

#[test]
fn click_on_plain_tile_emits_nothing() {
    let mut f = Fixture::new();
    f.look_at(9.0, 0.0);
    assert!(f.click(CENTER).is_empty());
}

#[test]
fn click_on_story_tile_body_emits_nothing() {
    let mut f = Fixture::new();
    f.look_at(0.0, 1.5);
    assert!(f.click(CENTER).is_empty());
}

#[test]
fn click_on_button_selects_story_once() {
    let mut f = Fixture::new();
    f.look_at_button();
    assert_eq!(f.click(CENTER), vec![story(1, "Ana")]);
}

#[test]
fn click_on_empty_wall_emits_nothing() {
    let mut f = Fixture::new();
    f.look_at(60.0, 60.0);
    assert!(f.click(CENTER).is_empty());
}

#[test]
fn click_after_drag_is_suppressed() {
    let mut f = Fixture::new();
    f.look_at_button();
    let (mut ctx, d) = f.ctx(false);
    d.on_pointer_down(&mut ctx, Point::new(390.0, 300.0));
    d.on_pointer_move(&mut ctx, Point::new(400.0, 300.0));
    d.on_pointer_up();
    assert!(d.on_click(&mut ctx, CENTER).is_empty());
}

#[test]
fn small_jitter_still_clicks() {
    let mut f = Fixture::new();
    f.look_at_button();
    let (mut ctx, d) = f.ctx(false);
    d.on_pointer_down(&mut ctx, Point::new(398.0, 300.0));
    d.on_pointer_move(&mut ctx, Point::new(400.0, 301.0));
    d.on_pointer_up();
    assert_eq!(d.on_click(&mut ctx, CENTER).len(), 1);
}

#[test]
fn click_without_viewport_emits_nothing() {
    let mut f = Fixture::new();
    f.look_at_button();
    f.projection = Projection::default();
    assert!(f.click(CENTER).is_empty());
}

// =============================================================
// Hover
// =============================================================

#[test]
fn hover_enter_and_leave_emit_on_change_only() {
    let mut f = Fixture::new();
    f.look_at_button();

    let entered = f.hover(CENTER);
    assert_eq!(entered, vec![Action::HoverChanged(Some(1)), Action::SetCursor(Cursor::Pointer)]);
    assert_eq!(f.registry.hovered(), Some(1));
    assert!(f.registry.affordance(1).unwrap().hovered);

    assert!(f.hover(Point::new(401.0, 300.0)).is_empty());

    let left = f.hover(Point::new(0.0, 0.0));
    assert_eq!(left, vec![Action::HoverChanged(None), Action::SetCursor(Cursor::Default)]);
    assert_eq!(f.dispatcher.cursor(), Cursor::Default);
    assert!(f.registry.affordances().all(|a| !a.hovered));
}

#[test]
fn hover_over_tile_body_keeps_default_cursor() {
    let mut f = Fixture::new();
    f.look_at(9.0, 0.0);
    assert!(f.hover(CENTER).is_empty());
    assert_eq!(f.registry.hovered(), None);
}

// =============================================================
// Mouse pan / wheel
// =============================================================

#[test]
fn mouse_drag_pans_camera() {
    let mut f = Fixture::new();
    let (mut ctx, d) = f.ctx(false);
    d.on_pointer_down(&mut ctx, Point::new(100.0, 100.0));
    d.on_pointer_move(&mut ctx, Point::new(140.0, 100.0));
    d.on_pointer_up();
    assert!((f.pose.position.x - -1.0).abs() < 1e-12);
    assert_eq!(f.pose.position.z, 40.0);
}

#[test]
fn mouse_drag_ignored_while_animating() {
    let mut f = Fixture::new();
    let (mut ctx, d) = f.ctx(true);
    d.on_pointer_down(&mut ctx, Point::new(100.0, 100.0));
    d.on_pointer_move(&mut ctx, Point::new(140.0, 100.0));
    assert_eq!(f.pose, CameraPose::default());
}

#[test]
fn hover_without_press_does_not_pan() {
    let mut f = Fixture::new();
    f.hover(Point::new(10.0, 10.0));
    f.hover(Point::new(300.0, 200.0));
    assert_eq!(f.pose, CameraPose::default());
}

#[test]
fn wheel_reaches_zoom_unless_animating() {
    let mut f = Fixture::new();
    {
        let (mut ctx, d) = f.ctx(true);
        assert!(!d.on_wheel(&mut ctx, WheelDelta::vertical(-100.0)));
    }
    let (mut ctx, d) = f.ctx(false);
    assert!(d.on_wheel(&mut ctx, WheelDelta::vertical(-100.0)));
    assert_eq!(f.zoom.target(), Some(37.0));
}

// =============================================================
// Touch
// =============================================================

#[test]
fn quick_tap_on_button_selects_story() {
    let mut f = Fixture::new();
    f.look_at_button();
    assert_eq!(f.tap(CENTER, 120.0), vec![story(1, "Ana")]);
}

#[test]
fn slow_tap_selects_nothing() {
    let mut f = Fixture::new();
    f.look_at_button();
    assert!(f.tap(CENTER, 450.0).is_empty());
}

#[test]
fn tap_resolves_at_start_position() {
    let mut f = Fixture::new();
    f.look_at_button();
    let (mut ctx, d) = f.ctx(false);
    d.on_touch_start(&mut ctx, &[CENTER], 0.0);
    d.on_touch_move(&mut ctx, &[Point::new(403.0, 302.0)]);
    assert_eq!(d.on_touch_end(&mut ctx, &[], 100.0), vec![story(1, "Ana")]);
}

#[test]
fn touch_drag_pans_and_cancels_tap() {
    let mut f = Fixture::new();
    f.look_at_button();
    let (mut ctx, d) = f.ctx(false);
    d.on_touch_start(&mut ctx, &[CENTER], 0.0);
    d.on_touch_move(&mut ctx, &[Point::new(404.0, 300.0)]);
    assert_eq!(ctx.pose.position.x, 0.0);
    d.on_touch_move(&mut ctx, &[Point::new(420.0, 300.0)]);
    assert!(d.on_touch_end(&mut ctx, &[], 100.0).is_empty());
    // Full displacement since touch start, at touch sensitivity.
    assert!((f.pose.position.x - -1.0).abs() < 1e-12);
}

#[test]
fn pinch_spread_zooms_in() {
    let mut f = Fixture::new();
    let (mut ctx, d) = f.ctx(false);
    d.on_touch_start(&mut ctx, &[Point::new(300.0, 300.0), Point::new(400.0, 300.0)], 0.0);
    d.on_touch_move(&mut ctx, &[Point::new(300.0, 300.0), Point::new(430.0, 300.0)]);
    assert!((f.zoom.target().unwrap() - 38.2).abs() < 1e-12);
}

#[test]
fn pinch_ignored_while_animating() {
    let mut f = Fixture::new();
    let (mut ctx, d) = f.ctx(true);
    d.on_touch_start(&mut ctx, &[Point::new(300.0, 300.0), Point::new(400.0, 300.0)], 0.0);
    d.on_touch_move(&mut ctx, &[Point::new(300.0, 300.0), Point::new(430.0, 300.0)]);
    assert_eq!(f.zoom.target(), None);
}

#[test]
fn lifting_one_of_two_fingers_is_not_a_tap() {
    let mut f = Fixture::new();
    f.look_at_button();
    let (mut ctx, d) = f.ctx(false);
    d.on_touch_start(&mut ctx, &[CENTER], 0.0);
    d.on_touch_start(&mut ctx, &[CENTER, Point::new(500.0, 300.0)], 10.0);
    assert!(d.on_touch_end(&mut ctx, &[CENTER], 50.0).is_empty());
    assert!(d.on_touch_end(&mut ctx, &[], 60.0).is_empty());
}

#[test]
fn remaining_finger_after_pinch_does_not_pan() {
    let mut f = Fixture::new();
    let (mut ctx, d) = f.ctx(false);
    d.on_touch_start(&mut ctx, &[Point::new(0.0, 0.0), Point::new(100.0, 0.0)], 0.0);
    d.on_touch_end(&mut ctx, &[Point::new(0.0, 0.0)], 50.0);
    d.on_touch_move(&mut ctx, &[Point::new(200.0, 0.0)]);
    assert_eq!(f.pose, CameraPose::default());
}

#[test]
fn touch_cancel_resets_state() {
    let mut f = Fixture::new();
    f.look_at_button();
    let (mut ctx, d) = f.ctx(false);
    d.on_touch_start(&mut ctx, &[CENTER], 0.0);
    d.on_touch_cancel();
    assert_eq!(*d.touch(), TouchState::Idle);
    assert!(!d.pan().is_active());
    assert!(d.on_touch_end(&mut ctx, &[], 50.0).is_empty());
}

#[test]
fn reset_clears_cursor() {
    let mut f = Fixture::new();
    f.look_at_button();
    f.hover(CENTER);
    f.dispatcher.reset();
    assert_eq!(f.dispatcher.cursor(), Cursor::Default);
}
