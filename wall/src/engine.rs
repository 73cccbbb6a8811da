use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::animation::{
    AnimationRequest, CameraAnimationController, CameraError, Completion, Easing, backed_off_pose,
};
use crate::camera::{CameraPose, Point, Projection};
use crate::collab::{AssetLoader, LabelTextureFactory, TileDataProvider};
use crate::consts::STORY_VIEW_DISTANCE;
use crate::dispatch::{Action, InteractionContext, InteractionDispatcher};
use crate::input::{Cursor, WheelDelta};
use crate::layout::{self, BuildSummary, GridLayoutGenerator, LayoutConfig, LayoutError};
use crate::pan::{PanBounds, PanController, PanSettings};
use crate::pulse::{self, PulseSettings};
use crate::registry::SceneRegistry;
use crate::tile::{TileId, TileRecord};
use crate::zoom::{ZoomController, ZoomSettings};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Draws one frame. Called once per rendered frame, after all state updates.
pub trait Renderer {
    fn render(&mut self, pose: &CameraPose, registry: &SceneRegistry);
}

/// Tuning for the whole engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub layout: LayoutConfig,
    pub zoom: ZoomSettings,
    pub pan: PanSettings,
    pub pulse: PulseSettings,
    /// Distance from the wall when a story tile is framed.
    pub story_distance: f64,
    /// How far "find new story" backs away before choosing a tile.
    pub find_zoom_out_distance: f64,
    /// Length of each "find new story" phase.
    pub find_duration_ms: f64,
    pub intro_duration_ms: f64,
    pub focus_duration_ms: f64,
    /// Frames arriving sooner than this after the last rendered one are skipped.
    pub min_frame_interval_ms: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            zoom: ZoomSettings::default(),
            pan: PanSettings::default(),
            pulse: PulseSettings::default(),
            story_distance: STORY_VIEW_DISTANCE,
            find_zoom_out_distance: 50.0,
            find_duration_ms: 1500.0,
            intro_duration_ms: 1000.0,
            focus_duration_ms: 2500.0,
            min_frame_interval_ms: None,
        }
    }
}

impl EngineConfig {
    /// Cap rendering at `fps` frames per second. Zero or less removes the cap.
    #[must_use]
    pub fn with_fps_cap(mut self, fps: f64) -> Self {
        self.min_frame_interval_ms = (fps > 0.0).then(|| 1000.0 / fps);
        self
    }
}

/// Core engine state: the wall, the camera, and everything that moves it.
///
/// Host-agnostic; the host feeds it events and timestamps and supplies the
/// collaborators and a [`Renderer`].
pub struct EngineCore {
    config: EngineConfig,
    pose: CameraPose,
    projection: Projection,
    registry: SceneRegistry,
    layout: GridLayoutGenerator,
    camera: CameraAnimationController,
    zoom: ZoomController,
    dispatcher: InteractionDispatcher,
    rng: StdRng,
    story_lock: Option<TileId>,
    last_frame: Option<f64>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let rng = config
            .layout
            .seed
            .map_or_else(StdRng::from_os_rng, |seed| StdRng::seed_from_u64(seed.wrapping_add(1)));
        Self {
            pose: CameraPose::default(),
            projection: Projection::default(),
            registry: SceneRegistry::new(),
            layout: GridLayoutGenerator::new(config.layout.clone()),
            camera: CameraAnimationController::new(),
            zoom: ZoomController::new(config.zoom),
            dispatcher: InteractionDispatcher::new(PanController::new(config.pan)),
            rng,
            story_lock: None,
            last_frame: None,
            config,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    #[must_use]
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    #[must_use]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// The story tile most recently arrived at.
    #[must_use]
    pub fn story_lock(&self) -> Option<TileId> {
        self.story_lock
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.camera.is_animating()
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.dispatcher.cursor()
    }

    #[must_use]
    pub fn pan_bounds(&self) -> PanBounds {
        self.dispatcher.pan().bounds()
    }

    #[must_use]
    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    // --- Viewport ---

    /// Update the viewport size in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.projection.viewport_width = width;
        self.projection.viewport_height = height;
    }

    // --- Grid lifecycle ---

    /// Load the base models every build draws from.
    ///
    /// # Errors
    ///
    /// See [`GridLayoutGenerator::load_models`].
    pub async fn load_models(&mut self, loader: &dyn AssetLoader) -> Result<(), LayoutError> {
        self.layout.load_models(loader).await
    }

    /// Build the grid from `records`, replacing any existing one.
    ///
    /// # Errors
    ///
    /// See [`GridLayoutGenerator::build`]. The scene is empty after an error.
    pub async fn build(
        &mut self,
        records: &[TileRecord],
        factory: &dyn LabelTextureFactory,
    ) -> Result<BuildSummary, LayoutError> {
        let result = self.layout.build(records, &mut self.registry, factory).await;
        self.after_rebuild();
        result
    }

    /// Drop the cached records, refetch, and rebuild.
    ///
    /// # Errors
    ///
    /// See [`GridLayoutGenerator::regenerate`].
    pub async fn regenerate(
        &mut self,
        provider: &dyn TileDataProvider,
        factory: &dyn LabelTextureFactory,
    ) -> Result<BuildSummary, LayoutError> {
        let result = self.layout.regenerate(provider, &mut self.registry, factory).await;
        self.after_rebuild();
        result
    }

    /// Remove the grid and release its textures. Returns the number of tiles removed.
    pub fn destroy(&mut self, factory: &dyn LabelTextureFactory) -> usize {
        let removed = layout::destroy(&mut self.registry, factory);
        self.after_rebuild();
        removed
    }

    fn after_rebuild(&mut self) {
        self.dispatcher.reset();
        self.story_lock = self.story_lock.filter(|id| self.registry.story_tile(*id).is_some());
        let bounds = self
            .registry
            .bounds()
            .map_or_else(PanBounds::default, |(min, max)| {
                PanBounds::around(min, max, self.config.layout.spacing)
            });
        self.dispatcher.pan_mut().set_bounds(bounds);
    }

    // --- Camera ---

    /// Start an arbitrary camera tween.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::AnimationInProgress`] while another tween runs.
    pub fn animate_to(&mut self, request: AnimationRequest, now: f64) -> Result<(), CameraError> {
        self.camera.animate_to(&self.pose, request, now)
    }

    /// Fly to tile `id`, framed from `distance`.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::UnknownTile`] for an id not on the wall, or
    /// [`CameraError::AnimationInProgress`] while another tween runs.
    pub fn animate_to_tile(&mut self, id: TileId, distance: f64, duration_ms: f64, now: f64) -> Result<(), CameraError> {
        let tile = self.registry.get(id).ok_or(CameraError::UnknownTile(id))?;
        self.camera.animate_to_tile(&self.pose, tile, distance, duration_ms, now)
    }

    /// Back away from the wall, then fly to a random story other than the current one.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::AnimationInProgress`] while another tween runs.
    pub fn find_new_story(&mut self, now: f64) -> Result<(), CameraError> {
        if self.camera.is_animating() {
            tracing::warn!("find new story ignored: camera animation in progress");
            return Err(CameraError::AnimationInProgress);
        }
        let request = AnimationRequest::new(
            backed_off_pose(&self.pose, self.config.find_zoom_out_distance),
            self.config.find_duration_ms,
        )
        .easing(Easing::EaseInOutCubic)
        .on_complete(Completion::ZoomedOut {
            distance: self.config.story_distance,
            duration_ms: self.config.find_duration_ms,
        });
        tracing::debug!(from = ?self.story_lock, "find new story: zooming out");
        self.camera.animate_to(&self.pose, request, now)
    }

    /// Opening flight to a random story tile. Returns the chosen tile.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::NoStoryTiles`] when the wall has no stories, or
    /// [`CameraError::AnimationInProgress`] while another tween runs.
    pub fn intro(&mut self, now: f64) -> Result<TileId, CameraError> {
        let duration = self.config.intro_duration_ms;
        self.fly_to_random_story(duration, now)
    }

    /// Fly to the story tile `id`, or to a random story when `id` has none.
    /// Returns the tile actually chosen.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::NoStoryTiles`] when no fallback exists, or
    /// [`CameraError::AnimationInProgress`] while another tween runs.
    pub fn focus_tile(&mut self, id: TileId, now: f64) -> Result<TileId, CameraError> {
        let duration = self.config.focus_duration_ms;
        let Some(tile) = self.registry.story_tile(id) else {
            tracing::warn!(tile_id = id, "tile not found or has no story; using a random story");
            return self.fly_to_random_story(duration, now);
        };
        self.camera
            .animate_to_tile(&self.pose, tile, self.config.story_distance, duration, now)?;
        Ok(id)
    }

    fn fly_to_random_story(&mut self, duration_ms: f64, now: f64) -> Result<TileId, CameraError> {
        if self.camera.is_animating() {
            tracing::warn!("story flight ignored: camera animation in progress");
            return Err(CameraError::AnimationInProgress);
        }
        let Some(tile) = self.registry.random_story_tile(&mut self.rng, None) else {
            tracing::warn!("no story tiles on the wall");
            return Err(CameraError::NoStoryTiles);
        };
        self.camera
            .animate_to_tile(&self.pose, tile, self.config.story_distance, duration_ms, now)?;
        Ok(tile.id)
    }

    /// Stop the running tween where it is, without running its completion.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.camera.cancel();
        if cancelled {
            self.zoom.resync();
        }
        cancelled
    }

    fn dispatch_completion(&mut self, completion: Completion, now: f64) {
        match completion {
            Completion::None => {}
            Completion::Callback(hook) => hook(),
            Completion::ArrivedAtStory(id) => {
                if self.registry.story_tile(id).is_some() {
                    tracing::info!(tile_id = id, "arrived at story");
                    self.story_lock = Some(id);
                }
            }
            Completion::ZoomedOut { distance, duration_ms } => {
                let Some(tile) = self.registry.random_story_tile(&mut self.rng, self.story_lock) else {
                    tracing::warn!(exclude = ?self.story_lock, "no other story tile to show");
                    return;
                };
                tracing::debug!(tile_id = tile.id, "find new story: zooming in");
                if let Err(e) = self.camera.animate_to_tile(&self.pose, tile, distance, duration_ms, now) {
                    tracing::warn!(error = %e, "find new story: second phase rejected");
                }
            }
        }
    }

    // --- Render loop ---

    /// Advance one frame at host time `now` (ms) and render it.
    ///
    /// Order: camera tween (and its completion), zoom smoothing, button pulse,
    /// render. Returns `false` when the frame cap skipped the frame.
    pub fn frame(&mut self, now: f64, renderer: &mut dyn Renderer) -> bool {
        if let (Some(min_interval), Some(last)) = (self.config.min_frame_interval_ms, self.last_frame) {
            if now - last < min_interval {
                return false;
            }
        }
        let dt_s = self.last_frame.map_or(0.0, |last| (now - last) / 1000.0);
        self.last_frame = Some(now);

        if let Some(completion) = self.camera.step(now, &mut self.pose) {
            self.zoom.resync();
            self.dispatch_completion(completion, now);
        }
        self.zoom.step(&mut self.pose, self.camera.is_animating());
        pulse::update(&self.config.pulse, &mut self.registry, now / 1000.0, dt_s);
        renderer.render(&self.pose, &self.registry);
        true
    }

    // --- Input events ---

    fn interaction(&mut self) -> (InteractionContext<'_>, &mut InteractionDispatcher) {
        (
            InteractionContext {
                registry: &mut self.registry,
                pose: &mut self.pose,
                projection: &self.projection,
                zoom: &mut self.zoom,
                animating: self.camera.is_animating(),
            },
            &mut self.dispatcher,
        )
    }

    pub fn on_pointer_down(&mut self, at: Point) {
        let (mut ctx, dispatcher) = self.interaction();
        dispatcher.on_pointer_down(&mut ctx, at);
    }

    pub fn on_pointer_move(&mut self, at: Point) -> Vec<Action> {
        let (mut ctx, dispatcher) = self.interaction();
        dispatcher.on_pointer_move(&mut ctx, at)
    }

    pub fn on_pointer_up(&mut self) {
        self.dispatcher.on_pointer_up();
    }

    pub fn on_click(&mut self, at: Point) -> Vec<Action> {
        let (mut ctx, dispatcher) = self.interaction();
        dispatcher.on_click(&mut ctx, at)
    }

    pub fn on_wheel(&mut self, delta: WheelDelta) -> bool {
        let (mut ctx, dispatcher) = self.interaction();
        dispatcher.on_wheel(&mut ctx, delta)
    }

    pub fn on_touch_start(&mut self, touches: &[Point], now: f64) {
        let (mut ctx, dispatcher) = self.interaction();
        dispatcher.on_touch_start(&mut ctx, touches, now);
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) {
        let (mut ctx, dispatcher) = self.interaction();
        dispatcher.on_touch_move(&mut ctx, touches);
    }

    pub fn on_touch_end(&mut self, remaining: &[Point], now: f64) -> Vec<Action> {
        let (mut ctx, dispatcher) = self.interaction();
        dispatcher.on_touch_end(&mut ctx, remaining, now)
    }

    pub fn on_touch_cancel(&mut self) {
        self.dispatcher.on_touch_cancel();
    }
}
