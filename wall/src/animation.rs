//! Camera tween state machine.
//!
//! The controller is either idle or running exactly one [`AnimationJob`]. New
//! requests while a job runs are rejected. Each [`CameraAnimationController::step`]
//! writes the eased pose into the caller's [`CameraPose`] and, on the frame the
//! job reaches full progress, hands back its [`Completion`] for the engine to
//! act on.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

use std::fmt;

use glam::{DVec2, DVec3};

use crate::camera::{CameraPose, Euler};
use crate::tile::{TileEntity, TileId};

/// Default tween length when a caller does not pick one.
pub const DEFAULT_DURATION_MS: f64 = 2000.0;

/// Camera request failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("camera animation already in progress")]
    AnimationInProgress,
    #[error("tile {0} not found")]
    UnknownTile(TileId),
    #[error("no story tiles available")]
    NoStoryTiles,
}

/// Easing curves available to camera tweens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseOutQuart,
    EaseInOutCubic,
    EaseOutExpo,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseOutExpo => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
        }
    }
}

/// What to do once a tween arrives.
pub enum Completion {
    None,
    /// Run an arbitrary hook.
    Callback(Box<dyn FnOnce() + Send>),
    /// The camera reached a story tile; it becomes the current story.
    ArrivedAtStory(TileId),
    /// First phase of a story search finished; fly to a fresh story tile.
    ZoomedOut { distance: f64, duration_ms: f64 },
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Callback(_) => f.write_str("Callback(..)"),
            Self::ArrivedAtStory(id) => f.debug_tuple("ArrivedAtStory").field(id).finish(),
            Self::ZoomedOut { distance, duration_ms } => f
                .debug_struct("ZoomedOut")
                .field("distance", distance)
                .field("duration_ms", duration_ms)
                .finish(),
        }
    }
}

/// A requested tween, before it has a start pose and time.
#[derive(Debug)]
pub struct AnimationRequest {
    pub target: CameraPose,
    pub duration_ms: f64,
    pub easing: Easing,
    pub completion: Completion,
}

impl AnimationRequest {
    #[must_use]
    pub fn new(target: CameraPose, duration_ms: f64) -> Self {
        Self { target, duration_ms, easing: Easing::default(), completion: Completion::None }
    }

    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    #[must_use]
    pub fn on_complete(mut self, completion: Completion) -> Self {
        self.completion = completion;
        self
    }
}

/// The tween in flight.
#[derive(Debug)]
pub struct AnimationJob {
    pub start: CameraPose,
    pub target: CameraPose,
    pub duration_ms: f64,
    pub started_at: f64,
    pub easing: Easing,
    pub progress: f64,
    completion: Completion,
}

impl AnimationJob {
    fn advance(&mut self, now: f64) -> f64 {
        let raw = if self.duration_ms <= 0.0 || !self.duration_ms.is_finite() {
            1.0
        } else {
            ((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0)
        };
        // f64::max ignores a NaN operand, so a bad clock reading holds progress.
        self.progress = self.progress.max(raw);
        self.progress
    }

    fn pose_at(&self, eased: f64) -> CameraPose {
        CameraPose {
            position: self.start.position.lerp(self.target.position, eased),
            rotation: self.start.rotation.lerp(self.target.rotation, eased),
        }
    }
}

/// Idle or animating; owns at most one [`AnimationJob`].
#[derive(Debug, Default)]
pub struct CameraAnimationController {
    job: Option<AnimationJob>,
}

impl CameraAnimationController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.job.is_some()
    }

    #[must_use]
    pub fn job(&self) -> Option<&AnimationJob> {
        self.job.as_ref()
    }

    /// Start tweening from `from` toward `request.target`.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::AnimationInProgress`] while another job runs. The
    /// running job is untouched and the rejected request's completion is dropped.
    pub fn animate_to(&mut self, from: &CameraPose, request: AnimationRequest, now: f64) -> Result<(), CameraError> {
        if self.job.is_some() {
            tracing::warn!("camera animation already in progress; request rejected");
            return Err(CameraError::AnimationInProgress);
        }
        tracing::debug!(
            target_x = request.target.position.x,
            target_y = request.target.position.y,
            target_z = request.target.position.z,
            duration_ms = request.duration_ms,
            easing = ?request.easing,
            "camera animation started"
        );
        self.job = Some(AnimationJob {
            start: *from,
            target: request.target,
            duration_ms: request.duration_ms,
            started_at: now,
            easing: request.easing,
            progress: 0.0,
            completion: request.completion,
        });
        Ok(())
    }

    /// Frame `tile` from `distance` in front of the wall.
    ///
    /// Story tiles complete with [`Completion::ArrivedAtStory`].
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::AnimationInProgress`] while another job runs.
    pub fn animate_to_tile(
        &mut self,
        from: &CameraPose,
        tile: &TileEntity,
        distance: f64,
        duration_ms: f64,
        now: f64,
    ) -> Result<(), CameraError> {
        let completion = if tile.has_story() { Completion::ArrivedAtStory(tile.id) } else { Completion::None };
        let request = AnimationRequest::new(tile_view_pose(tile.position, distance), duration_ms)
            .easing(Easing::EaseOutQuart)
            .on_complete(completion);
        self.animate_to(from, request, now)
    }

    /// Advance the running job to `now` and write the eased pose into `pose`.
    ///
    /// Returns the job's completion on the step that reaches full progress, and
    /// `None` on every other step.
    pub fn step(&mut self, now: f64, pose: &mut CameraPose) -> Option<Completion> {
        let job = self.job.as_mut()?;
        let progress = job.advance(now);
        if progress < 1.0 {
            *pose = job.pose_at(job.easing.apply(progress));
            return None;
        }
        let job = self.job.take()?;
        *pose = job.target;
        tracing::debug!("camera animation finished");
        Some(job.completion)
    }

    /// Stop the running job where it is. Its completion is dropped unrun.
    ///
    /// Returns whether a job was cancelled.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.job.take().is_some();
        if cancelled {
            tracing::debug!("camera animation cancelled");
        }
        cancelled
    }
}

/// Pose `distance` in front of the wall, straight in front of `center`.
#[must_use]
pub fn tile_view_pose(center: DVec2, distance: f64) -> CameraPose {
    let eye = DVec3::new(center.x, center.y, distance);
    CameraPose::new(eye, Euler::looking_at(eye, center.extend(0.0)))
}

/// `pose` moved back along its viewing axis by `distance`, orientation kept.
#[must_use]
pub fn backed_off_pose(pose: &CameraPose, distance: f64) -> CameraPose {
    CameraPose::new(pose.position - pose.forward() * distance, pose.rotation)
}
