//! Game Lifecycle
//!
//! The `Game` trait is what a sample implements; `Engine` is the context it is
//! handed (scene, physics, animations, resources, renderer); `GameRunner`
//! drives frames in a fixed order:
//!
//! 1. queued input is dispatched to the game
//! 2. `Engine::step` advances animations, then physics
//! 3. resulting engine events are dispatched to the game
//! 4. `Game::update`, then `Game::render` into a fresh draw list
//! 5. the draw list is submitted to the renderer
//!
//! # Example
//!
//! ```ignore
//! let engine = Engine::new(EngineConfig::default());
//! let mut runner = GameRunner::new(engine, MyGame::default());
//! runner.initialize()?;
//! runner.run(600, 1.0 / 60.0, |_frame| Vec::new());
//! runner.finalize();
//! ```

use std::collections::VecDeque;

use crate::animation::{AnimationController, AnimationEvent, AnimationEventKind};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::input::{AccelerometerReading, InputEvent, KeyEvent, TouchEvent};
use crate::physics::{CollisionEvent, PhysicsWorld};
use crate::render::{DrawList, HeadlessRenderer, Renderer};
use crate::resources::Resources;
use crate::scene::Scene;

// =============================================================================
// Game trait
// =============================================================================

/// Lifecycle hooks of a sample. Only `initialize`, `update` and `render` are required.
pub trait Game {
    /// Loads resources and builds the scene. Called once before the first frame.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), EngineError>;

    /// Releases what `initialize` acquired.
    fn finalize(&mut self, _engine: &mut Engine) {}

    /// Per-frame simulation; `dt` in seconds.
    fn update(&mut self, engine: &mut Engine, dt: f32);

    /// Records the frame into `frame`.
    fn render(&mut self, engine: &Engine, dt: f32, frame: &mut DrawList);

    fn key_event(&mut self, _engine: &mut Engine, _event: KeyEvent) {}

    fn touch_event(&mut self, _engine: &mut Engine, _event: TouchEvent) {}

    fn collision_event(&mut self, _engine: &mut Engine, _event: &CollisionEvent) {}

    fn animation_event(&mut self, _engine: &mut Engine, _event: &AnimationEvent) {}
}

/// Something the engine produced during `Engine::step`.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Collision(CollisionEvent),
    Animation(AnimationEvent),
}

// =============================================================================
// Engine
// =============================================================================

pub struct Engine {
    config: EngineConfig,
    pub resources: Resources,
    pub scene: Scene,
    pub physics: PhysicsWorld,
    pub animations: AnimationController,
    accelerometer: AccelerometerReading,
    renderer: Box<dyn Renderer>,
    /// Blend used when a character resumes its previous animation
    resume_blend_ms: f32,
    clock_ms: f64,
    window_start_ms: f64,
    frames_in_window: u32,
    frame_rate: u32,
    exit_requested: bool,
}

impl Engine {
    /// Engine with a headless renderer.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_renderer(config, Box::new(HeadlessRenderer::new()))
    }

    pub fn with_renderer(config: EngineConfig, renderer: Box<dyn Renderer>) -> Self {
        let resources = Resources::new(config.asset_root.clone(), config.verify_assets);
        log::info!(
            "[Engine] {}x{} viewport, assets at {}",
            config.width,
            config.height,
            resources.root().display()
        );
        Self {
            config,
            resources,
            scene: Scene::default(),
            physics: PhysicsWorld::new(),
            animations: AnimationController::new(),
            accelerometer: AccelerometerReading::default(),
            renderer,
            resume_blend_ms: 0.0,
            clock_ms: 0.0,
            window_start_ms: 0.0,
            frames_in_window: 0,
            frame_rate: 0,
            exit_requested: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.config.width
    }

    pub fn height(&self) -> u32 {
        self.config.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.config.aspect_ratio()
    }

    /// Latest tilt reading (degrees).
    pub fn accelerometer(&self) -> AccelerometerReading {
        self.accelerometer
    }

    pub fn set_accelerometer(&mut self, reading: AccelerometerReading) {
        self.accelerometer = reading;
    }

    pub fn set_resume_blend(&mut self, blend_ms: f32) {
        self.resume_blend_ms = blend_ms.max(0.0);
    }

    pub fn exit(&mut self) {
        log::info!("[Engine] exit requested");
        self.exit_requested = true;
    }

    pub fn is_exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Frames submitted during the last full second.
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Simulated time since start in milliseconds.
    pub fn time_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// Draws a single screen (splash, loading) and holds it for at least `min_ms`.
    pub fn display_screen<F>(&mut self, draw: F, min_ms: u64)
    where
        F: FnOnce(&mut DrawList),
    {
        let mut frame = DrawList::new();
        draw(&mut frame);
        self.renderer.submit(&frame);
        self.clock_ms += min_ms as f64;
        self.window_start_ms = self.clock_ms;
        self.frames_in_window = 0;
    }

    pub fn submit(&mut self, frame: &DrawList) {
        self.renderer.submit(frame);
        self.frames_in_window += 1;
        let elapsed = self.clock_ms - self.window_start_ms;
        if elapsed >= 1000.0 {
            self.frame_rate = self.frames_in_window;
            self.frames_in_window = 0;
            self.window_start_ms = self.clock_ms;
        }
    }

    /// Advances animations, then physics, by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> Vec<EngineEvent> {
        self.clock_ms += f64::from(dt) * 1000.0;

        let animation_events = self.animations.update(dt * 1000.0);
        for event in &animation_events {
            if event.kind != AnimationEventKind::End {
                continue;
            }
            if let Err(err) =
                self.physics
                    .handle_animation_event(&mut self.animations, event, self.resume_blend_ms)
            {
                log::warn!("[Engine] failed to resume after {}: {err}", event.clip);
            }
        }

        let collision_events = self.physics.step(&mut self.scene, dt);

        animation_events
            .into_iter()
            .map(EngineEvent::Animation)
            .chain(collision_events.into_iter().map(EngineEvent::Collision))
            .collect()
    }

    /// Drops scene, physics and animation state.
    pub fn clear(&mut self) {
        self.scene = Scene::default();
        self.physics.clear();
        self.animations.clear();
    }
}

// =============================================================================
// Runner
// =============================================================================

/// Drives a `Game` frame by frame against an `Engine`.
pub struct GameRunner<G: Game> {
    engine: Engine,
    game: G,
    input: VecDeque<InputEvent>,
    last_frame: DrawList,
    frames_run: u64,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(engine: Engine, game: G) -> Self {
        Self {
            engine,
            game,
            input: VecDeque::new(),
            last_frame: DrawList::new(),
            frames_run: 0,
            initialized: false,
        }
    }

    pub fn initialize(&mut self) -> Result<(), EngineError> {
        self.game.initialize(&mut self.engine)?;
        self.initialized = true;
        log::info!("[Runner] game initialized");
        Ok(())
    }

    /// Queues an input event for the next frame.
    pub fn queue_input(&mut self, event: InputEvent) {
        self.input.push_back(event);
    }

    /// Runs one frame. Returns `false` once the game has requested exit.
    pub fn frame(&mut self, dt: f32) -> bool {
        if !self.initialized || self.engine.is_exit_requested() {
            return false;
        }

        while let Some(event) = self.input.pop_front() {
            match event {
                InputEvent::Key(key) => self.game.key_event(&mut self.engine, key),
                InputEvent::Touch(touch) => self.game.touch_event(&mut self.engine, touch),
                InputEvent::Accelerometer(reading) => self.engine.set_accelerometer(reading),
            }
        }

        for event in self.engine.step(dt) {
            match &event {
                EngineEvent::Collision(collision) => {
                    self.game.collision_event(&mut self.engine, collision)
                }
                EngineEvent::Animation(animation) => {
                    self.game.animation_event(&mut self.engine, animation)
                }
            }
        }

        self.game.update(&mut self.engine, dt);

        self.last_frame.clear();
        self.game.render(&self.engine, dt, &mut self.last_frame);
        self.engine.submit(&self.last_frame);
        self.frames_run += 1;

        !self.engine.is_exit_requested()
    }

    /// Runs up to `frames` frames, feeding the events `script` returns for each
    /// frame index. Stops early on exit. Returns the number of frames run.
    pub fn run<S>(&mut self, frames: u64, dt: f32, mut script: S) -> u64
    where
        S: FnMut(u64) -> Vec<InputEvent>,
    {
        let start = self.frames_run;
        for index in 0..frames {
            for event in script(index) {
                self.queue_input(event);
            }
            if !self.frame(dt) {
                break;
            }
        }
        self.frames_run - start
    }

    pub fn finalize(&mut self) {
        if self.initialized {
            self.game.finalize(&mut self.engine);
            self.initialized = false;
            log::info!("[Runner] game finalized after {} frames", self.frames_run);
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Draw list recorded by the most recent frame.
    pub fn last_frame(&self) -> &DrawList {
        &self.last_frame
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent};
    use crate::render::DrawCommand;
    use glam::Vec4;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        finalized: bool,
    }

    impl Game for Recorder {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
            engine.display_screen(
                |frame| {
                    frame.push(DrawCommand::Clear {
                        color: Vec4::ZERO,
                        depth: 1.0,
                    })
                },
                1000,
            );
            self.calls.push("initialize".into());
            Ok(())
        }

        fn finalize(&mut self, _engine: &mut Engine) {
            self.finalized = true;
        }

        fn update(&mut self, _engine: &mut Engine, _dt: f32) {
            self.calls.push("update".into());
        }

        fn render(&mut self, _engine: &Engine, _dt: f32, frame: &mut DrawList) {
            self.calls.push("render".into());
            frame.push(DrawCommand::Clear {
                color: Vec4::ONE,
                depth: 1.0,
            });
        }

        fn key_event(&mut self, engine: &mut Engine, event: KeyEvent) {
            self.calls.push(format!("key {:?}", event.key));
            if event.key == KeyCode::Escape {
                engine.exit();
            }
        }
    }

    fn runner() -> GameRunner<Recorder> {
        let mut runner = GameRunner::new(Engine::new(EngineConfig::default()), Recorder::default());
        runner.initialize().unwrap();
        runner
    }

    #[test]
    fn test_frame_order_input_then_update_then_render() {
        let mut runner = runner();
        runner.queue_input(InputEvent::Key(KeyEvent::press(KeyCode::W)));
        assert!(runner.frame(1.0 / 60.0));
        assert_eq!(
            runner.game().calls,
            vec!["initialize", "key W", "update", "render"]
        );
        assert_eq!(runner.last_frame().len(), 1);
        // splash plus one frame
        assert_eq!(runner.engine().renderer().frames_submitted(), 2);
    }

    #[test]
    fn test_splash_advances_clock() {
        let runner = runner();
        assert_eq!(runner.engine().time_ms(), 1000.0);
    }

    #[test]
    fn test_exit_stops_run() {
        let mut runner = runner();
        let ran = runner.run(100, 1.0 / 60.0, |frame| {
            if frame == 3 {
                vec![InputEvent::Key(KeyEvent::press(KeyCode::Escape))]
            } else {
                Vec::new()
            }
        });
        assert_eq!(ran, 4);
        assert!(!runner.frame(1.0 / 60.0));
        runner.finalize();
        assert!(runner.game().finalized);
    }

    #[test]
    fn test_accelerometer_events_update_engine() {
        let mut runner = runner();
        runner.queue_input(InputEvent::Accelerometer(AccelerometerReading::new(30.0, -5.0)));
        runner.frame(0.016);
        assert_eq!(runner.engine().accelerometer(), AccelerometerReading::new(30.0, -5.0));
    }

    #[test]
    fn test_frame_rate_measured_per_second() {
        let mut runner = runner();
        runner.run(130, 1.0 / 60.0, |_| Vec::new());
        let fps = runner.engine().frame_rate();
        assert!((59..=61).contains(&fps), "fps {fps}");
    }

    #[test]
    fn test_uninitialized_runner_does_not_run() {
        let mut runner = GameRunner::new(Engine::new(EngineConfig::default()), Recorder::default());
        assert!(!runner.frame(0.016));
        assert_eq!(runner.frames_run(), 0);
    }
}
