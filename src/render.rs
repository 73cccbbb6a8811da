use wall::camera::CameraPose;
use wall::engine::Renderer;
use wall::registry::SceneRegistry;

/// Headless renderer: counts frames and traces a summary every `every` frames.
pub struct LogRenderer {
    every: u64,
    frames: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self { every: every.max(1), frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, pose: &CameraPose, registry: &SceneRegistry) {
        self.frames += 1;
        if !self.frames.is_multiple_of(self.every) {
            return;
        }
        let p = pose.position;
        tracing::debug!(
            frame = self.frames,
            x = p.x,
            y = p.y,
            z = p.z,
            tiles = registry.len(),
            hovered = ?registry.hovered(),
            "frame"
        );
    }
}
