//! Idle pulse and hover growth of the story buttons.

#[cfg(test)]
#[path = "pulse_test.rs"]
mod pulse_test;

use crate::consts::FALLBACK_FRAME_SECS;
use crate::registry::SceneRegistry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseSettings {
    pub base_scale: f64,
    pub hover_scale: f64,
    /// Angular speed of the idle pulse, in radians per second.
    pub pulse_speed: f64,
    pub pulse_intensity: f64,
    /// How quickly the current scale chases its target, per second.
    pub transition_speed: f64,
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self { base_scale: 1.0, hover_scale: 1.15, pulse_speed: 2.5, pulse_intensity: 0.08, transition_speed: 8.0 }
    }
}

impl PulseSettings {
    /// Scale a button is heading toward at `time_s`.
    #[must_use]
    pub fn target_scale(&self, hovered: bool, time_s: f64) -> f64 {
        if hovered {
            self.hover_scale
        } else {
            self.base_scale + (time_s * self.pulse_speed).sin() * self.pulse_intensity
        }
    }
}

/// Move every affordance's scale one frame closer to its target.
///
/// `dt_s` is the frame delta in seconds; non-positive values fall back to a
/// 60 Hz frame.
pub fn update(settings: &PulseSettings, registry: &mut SceneRegistry, time_s: f64, dt_s: f64) {
    let dt = if dt_s > 0.0 { dt_s } else { FALLBACK_FRAME_SECS };
    let blend = (dt * settings.transition_speed).min(1.0);
    for affordance in registry.affordances_mut() {
        let target = settings.target_scale(affordance.hovered, time_s);
        affordance.current_scale += (target - affordance.current_scale) * blend;
    }
}
