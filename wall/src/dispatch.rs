//! Pointer and touch dispatch.
//!
//! Turns raw host events into camera movement and [`Action`]s. Hover and
//! click resolve against story buttons only. Tile bodies are hit-tested too
//! but never block a button and never produce an action.
//!
//! Mouse: a press starts a pan; moving more than the drag threshold marks the
//! press as a drag, and the click that follows a drag is swallowed.
//!
//! Touch: one finger is a tap candidate until it strays past the threshold,
//! then it pans. Two fingers pinch, which is fed to the zoom controller as a
//! synthetic wheel delta. Lifting the last finger quickly while still a tap
//! candidate selects whatever button was under the starting point.

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;

use crate::camera::{CameraPose, Point, Projection};
use crate::consts::PINCH_WHEEL_SCALE;
use crate::hit::{first_affordance, raycast};
use crate::input::{Cursor, PointerGesture, TouchState, WheelDelta};
use crate::pan::{PanController, PanSource};
use crate::registry::SceneRegistry;
use crate::tile::TileId;
use crate::zoom::ZoomController;

/// Outcome of an input event for the host to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A story button was clicked or tapped.
    StorySelected { tile_id: TileId, tile_name: String },
    SetCursor(Cursor),
    /// The hovered story button changed.
    HoverChanged(Option<TileId>),
}

/// Everything an input event may read or move, borrowed from the engine.
pub struct InteractionContext<'a> {
    pub registry: &'a mut SceneRegistry,
    pub pose: &'a mut CameraPose,
    pub projection: &'a Projection,
    pub zoom: &'a mut ZoomController,
    /// A camera tween is running.
    pub animating: bool,
}

#[derive(Debug, Default)]
pub struct InteractionDispatcher {
    pan: PanController,
    pointer: PointerGesture,
    touch: TouchState,
    cursor: Cursor,
}

impl InteractionDispatcher {
    #[must_use]
    pub fn new(pan: PanController) -> Self {
        Self { pan, ..Self::default() }
    }

    #[must_use]
    pub fn pan(&self) -> &PanController {
        &self.pan
    }

    pub fn pan_mut(&mut self) -> &mut PanController {
        &mut self.pan
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub fn touch(&self) -> &TouchState {
        &self.touch
    }

    // --- Mouse ---

    pub fn on_pointer_down(&mut self, ctx: &mut InteractionContext<'_>, at: Point) {
        self.pointer.press(at);
        self.pan.begin(at, ctx.animating);
    }

    pub fn on_pointer_move(&mut self, ctx: &mut InteractionContext<'_>, at: Point) -> Vec<Action> {
        if self.pointer.is_pressed() {
            self.pointer.track(at);
            self.pan.drag(at, PanSource::Mouse, ctx.pose, ctx.animating);
        }
        self.update_hover(ctx, at)
    }

    /// Button released, or the pointer left the canvas.
    pub fn on_pointer_up(&mut self) {
        self.pointer.release();
        self.pan.end();
    }

    /// The host's click event, delivered after pointer-up.
    pub fn on_click(&mut self, ctx: &mut InteractionContext<'_>, at: Point) -> Vec<Action> {
        if self.pointer.dragged {
            tracing::debug!("click suppressed after drag");
            return Vec::new();
        }
        select_story_at(ctx, at).into_iter().collect()
    }

    pub fn on_wheel(&mut self, ctx: &mut InteractionContext<'_>, delta: WheelDelta) -> bool {
        ctx.zoom.on_wheel(delta.dy, ctx.pose, ctx.animating)
    }

    // --- Touch ---

    /// `touches` holds every finger currently down.
    pub fn on_touch_start(&mut self, ctx: &mut InteractionContext<'_>, touches: &[Point], now: f64) {
        match touches {
            [] => {}
            [only] => {
                self.touch = TouchState::single(*only, now);
                self.pan.begin(*only, ctx.animating);
            }
            [a, b, ..] => {
                self.touch = TouchState::pinch(*a, *b);
                self.pan.end();
            }
        }
    }

    pub fn on_touch_move(&mut self, ctx: &mut InteractionContext<'_>, touches: &[Point]) {
        match touches {
            [] => {}
            [only] => {
                if self.touch.track_single(*only) {
                    self.pan.drag(*only, PanSource::Touch, ctx.pose, ctx.animating);
                }
            }
            [a, b, ..] => {
                let delta = self.touch.track_pinch(*a, *b);
                self.pan.end();
                if delta != 0.0 {
                    ctx.zoom.on_wheel(-delta * PINCH_WHEEL_SCALE, ctx.pose, ctx.animating);
                }
            }
        }
    }

    /// `remaining` holds the fingers still down after the release.
    pub fn on_touch_end(&mut self, ctx: &mut InteractionContext<'_>, remaining: &[Point], now: f64) -> Vec<Action> {
        let tap = if remaining.is_empty() { self.touch.tap_at(now) } else { None };
        self.touch = TouchState::Idle;
        self.pan.end();
        match tap {
            Some(at) => select_story_at(ctx, at).into_iter().collect(),
            None => Vec::new(),
        }
    }

    pub fn on_touch_cancel(&mut self) {
        self.touch = TouchState::Idle;
        self.pan.end();
    }

    /// Forget hover and gesture state, e.g. after the grid was rebuilt.
    pub fn reset(&mut self) {
        self.pointer = PointerGesture::default();
        self.touch = TouchState::Idle;
        self.pan.end();
        self.cursor = Cursor::Default;
    }

    fn update_hover(&mut self, ctx: &mut InteractionContext<'_>, at: Point) -> Vec<Action> {
        let hovered = ctx
            .projection
            .ray_through(ctx.pose, at)
            .and_then(|ray| first_affordance(&raycast(ctx.registry, &ray)).map(|h| h.tile_id));

        let mut actions = Vec::new();
        if ctx.registry.set_hovered(hovered) {
            actions.push(Action::HoverChanged(hovered));
        }
        let cursor = if hovered.is_some() { Cursor::Pointer } else { Cursor::Default };
        if cursor != self.cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor(cursor));
        }
        actions
    }
}

fn select_story_at(ctx: &InteractionContext<'_>, at: Point) -> Option<Action> {
    let ray = ctx.projection.ray_through(ctx.pose, at)?;
    let hits = raycast(ctx.registry, &ray);
    let hit = first_affordance(&hits)?;
    let tile = ctx.registry.get(hit.tile_id)?;
    tracing::info!(tile_id = tile.id, name = %tile.label.name, "story selected");
    Some(Action::StorySelected { tile_id: tile.id, tile_name: tile.label.name.clone() })
}
