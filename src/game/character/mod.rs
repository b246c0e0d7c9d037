//! Character Sample
//!
//! A third-person character walking around a small scene. Movement comes from
//! the keyboard or an on-screen joystick, the camera pulls in when geometry
//! blocks the view, and a blob shadow follows the character over the ground.
//!
//! Controls:
//! - WASD: Walk (Shift to run)
//! - Space / on-screen button: Jump
//! - Joystick: Walk and turn (run at full deflection)
//! - Drag outside the joystick: Turn
//! - B: Cycle debug drawing (off, physics, boxes, spheres)
//! - ESC: Exit

pub mod camera_rig;
pub mod gamepad_layout;
pub mod intent;

pub use camera_rig::{CameraAdjustment, CameraRig, RigTargets};
pub use gamepad_layout::{JOYSTICK, JUMP_BUTTON, character_gamepad_layout};
pub use intent::{ClipChoice, IntentMapper, MovementIntent, select_clip};

use std::f32::consts::PI;

use glam::{Vec3, Vec4};

use crate::animation::{AnimationEvent, AnimationEventKind};
use crate::error::EngineError;
use crate::game::{Engine, Game};
use crate::input::{ButtonState, Gamepad, KeyCode, KeyEvent, TouchEvent, TouchKind};
use crate::physics::{
    AnimationFlags, CollisionEvent, CollisionObjectId, CollisionObjectType, CollisionShape,
};
use crate::render::{DebugDrawMode, DrawCommand, DrawList, Rect, SpriteBatch};
use crate::samples::config::CharacterConfig;
use crate::scene::{
    Binding, DrawSceneVisitor, Material, Node, NodeId, NodeVisitorMut, RenderPass, Scene,
};

pub const SCENE_PATH: &str = "res/scene.json";
pub const CLIPS_PATH: &str = "res/boy.animation.json";
pub const FONT_PATH: &str = "res/arial40.gpb";
pub const SPLASH_PATH: &str = "res/logo_powered_white.png";

const CLEAR_COLOR: Vec4 = Vec4::new(0.41, 0.48, 0.54, 1.0);
const TEXT_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);
const SPLASH_MS: u64 = 1000;

/// Scene nodes and collision objects the sample drives.
#[derive(Debug, Clone, Copy)]
pub struct CharacterHandles {
    pub character_node: NodeId,
    pub character: CollisionObjectId,
    pub mesh: NodeId,
    pub camera: NodeId,
    pub camera_object: CollisionObjectId,
    pub shadow: NodeId,
    pub sun: NodeId,
}

/// Binds the sun and ambient lighting on every model material it visits.
struct BindLighting {
    sun: NodeId,
    bound: usize,
}

impl NodeVisitorMut for BindLighting {
    fn visit(&mut self, _id: NodeId, node: &mut Node) -> bool {
        let Some(model) = node.model.as_mut() else {
            return true;
        };
        let sun = self.sun;
        let bind = |material: &mut Material| {
            material.bind("u_lightDirection", Binding::NodeForwardView(sun));
            material.bind("u_lightColor", Binding::LightColor(sun));
            material.bind("u_ambientColor", Binding::SceneAmbientColor);
        };
        if let Some(material) = model.material_mut() {
            bind(material);
            self.bound += 1;
        }
        for part in 0..model.mesh_part_count() {
            if let Some(material) = model.part_material_mut(part) {
                bind(material);
                self.bound += 1;
            }
        }
        true
    }
}

pub struct CharacterGame {
    config: CharacterConfig,
    intent: IntentMapper,
    camera_rig: CameraRig,
    gamepad: Option<Gamepad>,
    handles: Option<CharacterHandles>,
    debug_mode: DebugDrawMode,
    /// Last x of a drag outside the joystick
    rotate_x: i32,
    last_adjustment: Option<CameraAdjustment>,
    jumps: u32,
}

impl CharacterGame {
    pub fn new(config: CharacterConfig) -> Self {
        Self {
            config,
            intent: IntentMapper::new(),
            camera_rig: CameraRig::new(),
            gamepad: None,
            handles: None,
            debug_mode: DebugDrawMode::Off,
            rotate_x: 0,
            last_adjustment: None,
            jumps: 0,
        }
    }

    pub fn handles(&self) -> Option<CharacterHandles> {
        self.handles
    }

    pub fn intent(&self) -> &IntentMapper {
        &self.intent
    }

    pub fn camera_rig(&self) -> &CameraRig {
        &self.camera_rig
    }

    pub fn last_adjustment(&self) -> Option<CameraAdjustment> {
        self.last_adjustment
    }

    pub fn debug_mode(&self) -> DebugDrawMode {
        self.debug_mode
    }

    /// Jump impulses applied so far.
    pub fn jumps(&self) -> u32 {
        self.jumps
    }

    pub fn gamepad(&self) -> Option<&Gamepad> {
        self.gamepad.as_ref()
    }

    fn draw_splash(frame: &mut DrawList, width: f32, height: f32) {
        frame.push(DrawCommand::Clear {
            color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            depth: 1.0,
        });
        let mut batch = SpriteBatch::new(SPLASH_PATH);
        batch.draw(
            Rect::centered(width * 0.5, height * 0.5, 512.0, 512.0),
            Rect::new(0.0, 0.0, 512.0, 512.0),
            Vec4::ONE,
        );
        frame.push(batch.finish());
    }

    fn load_scene(&mut self, engine: &mut Engine) -> Result<CharacterHandles, EngineError> {
        engine.physics.clear();
        engine.scene = Scene::load(&engine.resources, SCENE_PATH, &mut engine.physics)?;
        let aspect = engine.aspect_ratio();
        if let Some(camera) = engine.scene.active_camera_mut() {
            camera.set_aspect_ratio(aspect);
        }

        let scene = &mut engine.scene;
        let character_node = scene.require_node("BoyCharacter")?;
        let character = engine.physics.attach(
            scene,
            character_node,
            CollisionObjectType::Character,
            CollisionShape::Capsule {
                radius: 1.2,
                height: 5.0,
            },
            Vec3::new(0.0, 2.5, 0.0),
            20.0,
        );
        engine.physics.character_mut(character)?.set_max_step_height(0.0);
        engine.physics.add_collision_listener(character);

        let mesh = scene
            .find_descendant(character_node, "BoyMesh")
            .ok_or_else(|| EngineError::NodeNotFound("BoyMesh".to_string()))?;
        if scene.node(mesh).model.is_none() {
            return Err(EngineError::MissingComponent {
                node: "BoyMesh".to_string(),
                component: "model",
            });
        }

        let camera = scene.require_node("Camera")?;
        let camera_object = engine.physics.attach(
            scene,
            camera,
            CollisionObjectType::GhostObject,
            CollisionShape::Sphere { radius: 0.5 },
            Vec3::ZERO,
            0.0,
        );

        let sun = scene.require_node("SunLight")?;
        if scene.node(sun).light.is_none() {
            return Err(EngineError::MissingComponent {
                node: "SunLight".to_string(),
                component: "light",
            });
        }
        let mut lighting = BindLighting { sun, bound: 0 };
        scene.visit_mut(&mut lighting);
        log::debug!("[Character] bound lighting on {} materials", lighting.bound);

        let shadow = scene.require_node("BoyShadow")?;

        Ok(CharacterHandles {
            character_node,
            character,
            mesh,
            camera,
            camera_object,
            shadow,
            sun,
        })
    }

    fn load_animation_clips(
        &mut self,
        engine: &mut Engine,
        handles: &CharacterHandles,
    ) -> Result<(), EngineError> {
        let animation = engine.animations.create_clips(&engine.resources, CLIPS_PATH)?;

        let jump = engine.animations.clip_mut(&animation, "jump")?;
        let trigger = (jump.duration() as f32 * self.config.jump_trigger) as u64;
        jump.add_listener(trigger);

        let character = engine.physics.character_mut(handles.character)?;
        let animations = &engine.animations;
        character.add_animation(animations, "idle", &animation, "idle", 0.0)?;
        character.add_animation(animations, "walk", &animation, "walk", self.config.walk_speed)?;
        character.add_animation(animations, "run", &animation, "run", self.config.run_speed)?;
        character.add_animation(animations, "jump", &animation, "jump", 0.0)?;

        engine.set_resume_blend(self.config.blend_duration_ms);
        Self::play(engine, handles, "idle", AnimationFlags::Repeat, 1.0, 0.0)
    }

    /// Starts a character animation unless the jump is still playing.
    fn play(
        engine: &mut Engine,
        handles: &CharacterHandles,
        name: &str,
        flags: AnimationFlags,
        speed: f32,
        blend_ms: f32,
    ) -> Result<(), EngineError> {
        let character = engine.physics.character_mut(handles.character)?;
        if character.is_animation_playing(&engine.animations, "jump") {
            return Ok(());
        }
        character.play(&mut engine.animations, name, flags, speed, blend_ms)
    }

    fn apply_intent(
        &mut self,
        engine: &mut Engine,
        handles: &CharacterHandles,
    ) -> Result<(), EngineError> {
        if let Some(gamepad) = &self.gamepad {
            let joystick = gamepad.joystick_state(JOYSTICK);
            if self.intent.apply_joystick(joystick, self.config.run_threshold) {
                let angle = joystick.x * PI * -self.config.joystick_turn;
                engine.scene.rotate_y(handles.character_node, angle);
            }
            if gamepad.button_state(JUMP_BUTTON) == ButtonState::Pressed {
                self.intent.set_jump();
            }
        }

        let choice = select_clip(self.intent.flags(), self.config.anim_speed);
        let blend = self.config.blend_duration_ms;
        Self::play(engine, handles, choice.name(), choice.flags(), choice.speed(), blend)?;
        match choice {
            ClipChoice::Jump => self.intent.clear_jump(),
            ClipChoice::Idle => {}
            ClipChoice::Walk { .. } | ClipChoice::Run { .. } => {
                let character = engine.physics.character_mut(handles.character)?;
                character.set_forward_velocity(self.intent.velocity_ns());
                character.set_right_velocity(self.intent.velocity_ew());
            }
        }
        Ok(())
    }

    fn place_shadow(&self, engine: &mut Engine, handles: &CharacterHandles) {
        let origin = engine.scene.translation_world(handles.character_node) + Vec3::Y;
        let hit = engine.physics.ray_test(
            &engine.scene,
            origin,
            Vec3::NEG_Y,
            100.0,
            Some(handles.character),
        );
        if let Some(hit) = hit {
            engine.scene.set_translation(
                handles.shadow,
                hit.point + Vec3::Y * self.config.shadow_offset,
            );
        }
    }
}

impl Game for CharacterGame {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        engine.resources.require(SPLASH_PATH)?;
        let (width, height) = (engine.width() as f32, engine.height() as f32);
        engine.display_screen(|frame| Self::draw_splash(frame, width, height), SPLASH_MS);

        engine.resources.require(FONT_PATH)?;

        let handles = self.load_scene(engine)?;
        self.load_animation_clips(engine, &handles)?;

        let layout = character_gamepad_layout(engine.width(), engine.height());
        engine.resources.require(&layout.texture)?;
        self.gamepad = Some(Gamepad::new(layout));

        self.handles = Some(handles);
        log::info!(
            "[Character] initialized: {} nodes, {} collision objects",
            engine.scene.len(),
            engine.physics.objects().len()
        );
        Ok(())
    }

    fn finalize(&mut self, engine: &mut Engine) {
        engine.clear();
        self.handles = None;
        self.gamepad = None;
        self.intent.reset();
        self.camera_rig = CameraRig::new();
    }

    fn update(&mut self, engine: &mut Engine, _dt: f32) {
        let Some(handles) = self.handles else {
            return;
        };

        if let Err(err) = self.apply_intent(engine, &handles) {
            log::warn!("[Character] animation update failed: {err}");
        }

        let targets = RigTargets {
            camera: handles.camera,
            camera_object: handles.camera_object,
            character: handles.character,
            mesh: handles.mesh,
        };
        match self
            .camera_rig
            .adjust(&mut engine.scene, &engine.physics, targets, &self.config)
        {
            Ok(adjustment) => self.last_adjustment = Some(adjustment),
            Err(err) => log::warn!("[Character] camera adjustment failed: {err}"),
        }

        self.place_shadow(engine, &handles);
    }

    fn render(&mut self, engine: &Engine, _dt: f32, frame: &mut DrawList) {
        frame.push(DrawCommand::Clear {
            color: CLEAR_COLOR,
            depth: 1.0,
        });

        for pass in [RenderPass::Opaque, RenderPass::Transparent] {
            let mut visitor = DrawSceneVisitor::new(pass, frame);
            engine.scene.visit(&mut visitor);
        }

        match self.debug_mode {
            DebugDrawMode::Off => {}
            DebugDrawMode::Physics => {
                frame.push(DrawCommand::DebugShapes(engine.physics.debug_shapes(&engine.scene)))
            }
            DebugDrawMode::Boxes => {
                frame.push(DrawCommand::DebugBoxes(engine.scene.model_bounding_boxes()))
            }
            DebugDrawMode::Spheres => {
                frame.push(DrawCommand::DebugSpheres(engine.scene.model_bounding_spheres()))
            }
        }

        if let Some(gamepad) = &self.gamepad {
            gamepad.draw(frame);
        }

        frame.push(DrawCommand::Text {
            font: FONT_PATH.to_string(),
            text: engine.frame_rate().to_string(),
            x: 5.0,
            y: 5.0,
            color: TEXT_COLOR,
            size: 20,
        });
    }

    fn key_event(&mut self, engine: &mut Engine, event: KeyEvent) {
        if event.is_press() {
            match event.key {
                KeyCode::Escape => {
                    engine.exit();
                    return;
                }
                KeyCode::B => {
                    self.debug_mode = self.debug_mode.next();
                    log::info!("[Character] debug drawing {:?}", self.debug_mode);
                    return;
                }
                KeyCode::Space => {
                    if let Some(handles) = self.handles {
                        let blend = self.config.blend_duration_ms;
                        if let Err(err) =
                            Self::play(engine, &handles, "jump", AnimationFlags::Resume, 1.0, blend)
                        {
                            log::warn!("[Character] jump failed: {err}");
                        }
                    }
                    return;
                }
                _ => {}
            }
        }
        self.intent.key_event(event);
    }

    fn touch_event(&mut self, engine: &mut Engine, event: TouchEvent) {
        let Some(gamepad) = self.gamepad.as_mut() else {
            return;
        };
        let was_active = gamepad.is_joystick_active(JOYSTICK);
        let consumed = gamepad.touch_event(&event);
        if gamepad.is_joystick_active(JOYSTICK) {
            return;
        }
        if was_active {
            self.intent.reset();
        }
        if consumed {
            return;
        }

        match event.kind {
            TouchKind::Press => self.rotate_x = event.x,
            TouchKind::Release => self.rotate_x = 0,
            TouchKind::Move => {
                let delta = event.x - self.rotate_x;
                self.rotate_x = event.x;
                if let Some(handles) = self.handles {
                    let degrees = delta as f32 * self.config.touch_rotate_scale;
                    engine.scene.rotate_y(handles.character_node, -degrees.to_radians());
                }
            }
        }
    }

    fn collision_event(&mut self, _engine: &mut Engine, event: &CollisionEvent) {
        log::trace!(
            "[Character] {:?} #{} with #{}",
            event.kind,
            event.object_a.raw(),
            event.object_b.raw()
        );
    }

    fn animation_event(&mut self, engine: &mut Engine, event: &AnimationEvent) {
        if event.clip != "jump" || event.kind != AnimationEventKind::Listener {
            return;
        }
        let Some(handles) = self.handles else {
            return;
        };
        match engine.physics.character_mut(handles.character) {
            Ok(character) => {
                character.jump(self.config.jump_height);
                self.jumps += 1;
            }
            Err(err) => log::warn!("[Character] jump impulse failed: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::game::GameRunner;
    use crate::input::InputEvent;

    const DT: f32 = 1.0 / 60.0;

    fn runner() -> GameRunner<CharacterGame> {
        let config = EngineConfig {
            asset_root: env!("CARGO_MANIFEST_DIR").into(),
            ..EngineConfig::default()
        };
        let mut runner = GameRunner::new(
            Engine::new(config),
            CharacterGame::new(CharacterConfig::default()),
        );
        runner.initialize().unwrap();
        runner
    }

    fn handles(runner: &GameRunner<CharacterGame>) -> CharacterHandles {
        runner.game().handles().unwrap()
    }

    fn current_animation(runner: &GameRunner<CharacterGame>) -> Option<String> {
        let engine = runner.engine();
        engine
            .physics
            .character(handles(runner).character)
            .and_then(|c| c.current_animation())
            .map(str::to_string)
    }

    fn key(runner: &mut GameRunner<CharacterGame>, event: KeyEvent) {
        runner.queue_input(InputEvent::Key(event));
    }

    #[test]
    fn test_initialize_sets_up_scene_and_idle() {
        let r = runner();
        let h = handles(&r);
        let engine = r.engine();
        assert_eq!(engine.scene.active_camera(), Some(h.camera));
        assert!(r.game().gamepad().is_some());
        assert_eq!(current_animation(&r).as_deref(), Some("idle"));
        assert!(engine.animations.is_playing("movements", "idle"));

        let jump = engine.animations.clip("movements", "jump").unwrap();
        assert_eq!(jump.duration(), 1200);

        let material = engine.scene.node(h.mesh).model.as_ref().unwrap().material().unwrap();
        assert_eq!(
            material.parameter("u_lightColor"),
            Some(&crate::scene::MaterialParameter::Bound(Binding::LightColor(h.sun)))
        );
        assert_eq!(
            material.parameter("u_ambientColor"),
            Some(&crate::scene::MaterialParameter::Bound(Binding::SceneAmbientColor))
        );
    }

    #[test]
    fn test_missing_scene_fails_initialize() {
        let config = EngineConfig {
            asset_root: "/nonexistent/samples".into(),
            ..EngineConfig::default()
        };
        let mut runner = GameRunner::new(
            Engine::new(config),
            CharacterGame::new(CharacterConfig::default()),
        );
        assert!(matches!(runner.initialize(), Err(EngineError::MissingAsset(_))));
    }

    #[test]
    fn test_walk_moves_character_and_shadow_follows() {
        let mut r = runner();
        let h = handles(&r);
        let start = r.engine().scene.translation_world(h.character_node);

        key(&mut r, KeyEvent::press(KeyCode::W));
        r.run(30, DT, |_| Vec::new());

        assert_eq!(current_animation(&r).as_deref(), Some("walk"));
        let character = r.engine().physics.character(h.character).unwrap();
        assert!(character.forward_velocity() > 0.0);
        let now = r.engine().scene.translation_world(h.character_node);
        assert!(now.distance(start) > 1.0, "character did not move: {now}");

        let shadow = r.engine().scene.translation_world(h.shadow);
        assert!((shadow.x - now.x).abs() < 1e-4);
        assert!((shadow.z - now.z).abs() < 1e-4);
        assert!((shadow.y - 0.1).abs() < 1e-3);

        key(&mut r, KeyEvent::release(KeyCode::W));
        r.run(2, DT, |_| Vec::new());
        assert_eq!(current_animation(&r).as_deref(), Some("idle"));
    }

    #[test]
    fn test_shift_selects_run() {
        let mut r = runner();
        key(&mut r, KeyEvent::press(KeyCode::ShiftLeft));
        key(&mut r, KeyEvent::press(KeyCode::W));
        r.run(5, DT, |_| Vec::new());
        assert_eq!(current_animation(&r).as_deref(), Some("run"));
    }

    #[test]
    fn test_space_jumps_once_and_resumes() {
        let mut r = runner();
        let h = handles(&r);
        key(&mut r, KeyEvent::press(KeyCode::Space));
        r.run(1, DT, |_| Vec::new());
        assert_eq!(current_animation(&r).as_deref(), Some("jump"));

        // listener at 30% of the 1200 ms clip
        r.run(30, DT, |_| Vec::new());
        assert_eq!(r.game().jumps(), 1);
        let y = r.engine().scene.translation_world(h.character_node).y;
        assert!(y > 0.0);

        r.run(150, DT, |_| Vec::new());
        assert_eq!(r.game().jumps(), 1);
        assert!(!r.engine().animations.is_playing("movements", "jump"));
        assert_eq!(current_animation(&r).as_deref(), Some("idle"));
        let character = r.engine().physics.character(h.character).unwrap();
        assert!(character.is_grounded());
    }

    #[test]
    fn test_render_order() {
        let mut r = runner();
        r.run(1, DT, |_| Vec::new());
        let commands = r.last_frame().commands();
        assert!(matches!(
            commands.first(),
            Some(DrawCommand::Clear { color, .. }) if *color == CLEAR_COLOR
        ));
        assert!(matches!(
            commands.last(),
            Some(DrawCommand::Text { x, y, size: 20, .. }) if *x == 5.0 && *y == 5.0
        ));

        // transparent shadow comes after the opaque models
        let labels = r.last_frame().model_labels();
        let shadow = labels.iter().position(|l| *l == "BoyShadow").unwrap();
        let ground = labels.iter().position(|l| *l == "Ground").unwrap();
        assert!(ground < shadow);
        assert!(commands.iter().any(|c| matches!(c, DrawCommand::Sprites { .. })));
    }

    #[test]
    fn test_debug_mode_cycles() {
        let mut r = runner();
        key(&mut r, KeyEvent::press(KeyCode::B));
        r.run(1, DT, |_| Vec::new());
        assert_eq!(r.game().debug_mode(), DebugDrawMode::Physics);
        assert!(r.last_frame().commands().iter().any(|c| matches!(c, DrawCommand::DebugShapes(_))));

        key(&mut r, KeyEvent::press(KeyCode::B));
        r.run(1, DT, |_| Vec::new());
        assert!(r.last_frame().commands().iter().any(|c| matches!(c, DrawCommand::DebugBoxes(_))));
    }

    #[test]
    fn test_escape_exits() {
        let mut r = runner();
        key(&mut r, KeyEvent::press(KeyCode::Escape));
        assert!(!r.frame(DT));
        assert!(r.engine().is_exit_requested());
    }

    #[test]
    fn test_drag_outside_joystick_turns_character() {
        let mut r = runner();
        let h = handles(&r);
        let before = r.engine().scene.forward_vector_world(h.character_node);
        r.queue_input(InputEvent::Touch(TouchEvent::press(600, 100, 1)));
        r.queue_input(InputEvent::Touch(TouchEvent::moved(700, 100, 1)));
        r.queue_input(InputEvent::Touch(TouchEvent::release(700, 100, 1)));
        r.run(1, DT, |_| Vec::new());
        let after = r.engine().scene.forward_vector_world(h.character_node);
        assert!(before.distance(after) > 0.1);
    }

    #[test]
    fn test_joystick_overrides_held_key_and_turns() {
        let mut r = runner();
        let h = handles(&r);
        let before = r.engine().scene.forward_vector_world(h.character_node);

        // up and to the right, past the run threshold
        key(&mut r, KeyEvent::press(KeyCode::S));
        r.queue_input(InputEvent::Touch(TouchEvent::press(173, 583, 1)));
        r.run(10, DT, |_| Vec::new());

        let intent = r.game().intent();
        assert!(intent.flags().contains(MovementIntent::FORWARD));
        assert!(!intent.flags().contains(MovementIntent::BACKWARD));
        assert!(intent.flags().contains(MovementIntent::RUN));
        assert!(intent.velocity_ns() > 0.6);
        assert_eq!(intent.velocity_ew(), 0.0);
        assert_eq!(current_animation(&r).as_deref(), Some("run"));

        let after = r.engine().scene.forward_vector_world(h.character_node);
        assert!(before.distance(after) > 0.1);
    }

    #[test]
    fn test_button_jump_plays_clip_and_clears_intent() {
        let mut r = runner();
        r.queue_input(InputEvent::Touch(TouchEvent::press(1136, 613, 2)));
        r.run(1, DT, |_| Vec::new());
        assert_eq!(current_animation(&r).as_deref(), Some("jump"));
        assert!(r.game().intent().flags().is_empty());

        r.queue_input(InputEvent::Touch(TouchEvent::release(1136, 613, 2)));
        r.run(180, DT, |_| Vec::new());
        assert_eq!(r.game().jumps(), 1);
        assert_eq!(current_animation(&r).as_deref(), Some("idle"));
        assert!(r.game().intent().flags().is_empty());
    }

    #[test]
    fn test_joystick_release_resets_intent() {
        let mut r = runner();
        r.queue_input(InputEvent::Touch(TouchEvent::press(143, 583, 1)));
        r.run(3, DT, |_| Vec::new());
        assert_eq!(current_animation(&r).as_deref(), Some("walk"));
        assert!(r.game().intent().flags().contains(MovementIntent::FORWARD));

        r.queue_input(InputEvent::Touch(TouchEvent::release(143, 583, 1)));
        r.run(1, DT, |_| Vec::new());
        assert!(r.game().intent().flags().is_empty());
        assert_eq!(r.game().intent().velocity_ns(), 0.0);
        assert_eq!(current_animation(&r).as_deref(), Some("idle"));
    }

    #[test]
    fn test_view_is_clear_in_sample_scene() {
        let mut r = runner();
        r.run(1, DT, |_| Vec::new());
        let adjustment = r.game().last_adjustment().unwrap();
        assert_eq!(adjustment.occluder, None);
        assert_eq!(adjustment.alpha, 1.0);
        assert_eq!(r.game().camera_rig().offset(), 0.0);
    }

    #[test]
    fn test_finalize_clears_engine() {
        let mut r = runner();
        r.run(2, DT, |_| Vec::new());
        r.finalize();
        assert!(r.engine().scene.is_empty());
        assert!(r.engine().physics.objects().is_empty());
        assert!(r.game().handles().is_none());
    }
}
