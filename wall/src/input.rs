//! Input model: wheel deltas, cursors, and the gesture trackers.
//!
//! `PointerGesture` follows one mouse press from pointer-down to the click the
//! host reports after pointer-up, remembering whether it turned into a drag.
//! `TouchState` is the single-finger / pinch state machine for touch screens.
//! Neither touches the camera; the dispatcher reads them to decide what a
//! gesture means.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::{DRAG_THRESHOLD_PX, TAP_MAX_DURATION_MS};

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

impl WheelDelta {
    #[must_use]
    pub fn vertical(dy: f64) -> Self {
        Self { dx: 0.0, dy }
    }
}

/// Cursor the host should show over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    /// Over a story button.
    Pointer,
}

impl Cursor {
    /// CSS cursor keyword.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Pointer => "pointer",
        }
    }
}

/// One mouse press, from pointer-down until the next press.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerGesture {
    /// Where the button went down; `None` while released.
    pub down_at: Option<Point>,
    /// The press moved past the drag threshold. Kept after release so the
    /// trailing click can be suppressed.
    pub dragged: bool,
}

impl PointerGesture {
    pub fn press(&mut self, at: Point) {
        self.down_at = Some(at);
        self.dragged = false;
    }

    /// Record pointer movement. Returns `true` once the press is a drag.
    pub fn track(&mut self, to: Point) -> bool {
        if let Some(start) = self.down_at {
            if start.distance_to(to) > DRAG_THRESHOLD_PX {
                self.dragged = true;
            }
        }
        self.dragged
    }

    pub fn release(&mut self) {
        self.down_at = None;
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.down_at.is_some()
    }
}

/// Touch gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TouchState {
    /// No finger down.
    #[default]
    Idle,
    /// One finger down: a tap candidate until it moves too far, a pan after.
    Single {
        /// Where the finger landed.
        start: Point,
        /// Host timestamp of touch start, in milliseconds.
        started_at: f64,
        /// Still eligible to become a tap.
        tap_candidate: bool,
    },
    /// Two or more fingers down.
    Pinch {
        /// Distance between the first two fingers at the previous event.
        last_distance: f64,
    },
}

impl TouchState {
    /// A single touch starting at `start`.
    #[must_use]
    pub fn single(start: Point, now: f64) -> Self {
        Self::Single { start, started_at: now, tap_candidate: true }
    }

    /// A pinch between `a` and `b`.
    #[must_use]
    pub fn pinch(a: Point, b: Point) -> Self {
        Self::Pinch { last_distance: a.distance_to(b) }
    }

    /// Track a single finger at `to`. Drops tap candidacy past the drag threshold.
    ///
    /// Returns `true` when the finger should pan the camera.
    pub fn track_single(&mut self, to: Point) -> bool {
        match self {
            Self::Single { start, tap_candidate, .. } => {
                if *tap_candidate && start.distance_to(to) > DRAG_THRESHOLD_PX {
                    *tap_candidate = false;
                }
                !*tap_candidate
            }
            Self::Idle | Self::Pinch { .. } => false,
        }
    }

    /// Track a pinch now spanning `a`..`b`. Returns the change in finger
    /// distance since the previous event.
    pub fn track_pinch(&mut self, a: Point, b: Point) -> f64 {
        let distance = a.distance_to(b);
        let delta = match *self {
            Self::Pinch { last_distance } if last_distance > 0.0 => distance - last_distance,
            _ => 0.0,
        };
        *self = Self::Pinch { last_distance: distance };
        delta
    }

    /// Where a tap landed, if a release at `now` completes one.
    #[must_use]
    pub fn tap_at(&self, now: f64) -> Option<Point> {
        match *self {
            Self::Single { start, started_at, tap_candidate: true } if now - started_at < TAP_MAX_DURATION_MS => {
                Some(start)
            }
            _ => None,
        }
    }
}
