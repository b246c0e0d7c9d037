//! Longboard Sample
//!
//! Tilt the device to ride: pitch controls throttle, roll steers. The board
//! and wheels stay in front of a fixed camera while the ground quad turns and
//! scrolls beneath them. A looping wheel sound follows the throttle.
//!
//! Controls (tilt):
//! - Pitch toward `pitch_min`: faster
//! - Pitch toward `pitch_max`: slower, sound stops at zero throttle
//! - Roll left/right: turn, scaled by throttle

pub mod kinematics;

pub use kinematics::{BoardKinematics, BoardStep, UvWrap, board_world, throttle, wheels_world};

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::audio::AudioSource;
use crate::error::EngineError;
use crate::game::{Engine, Game};
use crate::render::{DrawCommand, DrawList, Mesh, Model};
use crate::resources::Resources;
use crate::samples::config::LongboardConfig;
use crate::scene::{Material, MaterialParameter, ParameterValue, Texture};

const TEXTURED_VSH: &str = "res/shaders/textured.vsh";
const TEXTURED_FSH: &str = "res/shaders/textured.fsh";
const SOUND_PATH: &str = "res/sounds/longboard2.wav";

/// Models of the longboard scene, in draw order after the ground.
#[derive(Debug, Clone)]
struct BoardModels {
    ground: Model,
    wheels: Model,
    board: Model,
    gradient: Model,
}

pub struct LongboardGame {
    config: LongboardConfig,
    kinematics: BoardKinematics,
    view_projection: Mat4,
    models: Option<BoardModels>,
    sound: Option<AudioSource>,
    last_step: Option<BoardStep>,
}

impl LongboardGame {
    pub fn new(config: LongboardConfig) -> Self {
        let kinematics = BoardKinematics::new(&config);
        Self {
            config,
            kinematics,
            view_projection: Mat4::IDENTITY,
            models: None,
            sound: None,
            last_step: None,
        }
    }

    pub fn kinematics(&self) -> &BoardKinematics {
        &self.kinematics
    }

    pub fn sound(&self) -> Option<&AudioSource> {
        self.sound.as_ref()
    }

    /// Throttle and roll of the most recent update.
    pub fn last_step(&self) -> Option<BoardStep> {
        self.last_step
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    fn textured_material(
        resources: &Resources,
        texture_path: &str,
        wrap: bool,
        repeat: Vec2,
    ) -> Result<Material, EngineError> {
        let mut material = Material::create(resources, TEXTURED_VSH, TEXTURED_FSH)?;
        let mut texture = Texture::create(resources, texture_path, true)?;
        texture.set_wrap_mode(wrap, wrap);
        material.set_value("texture", ParameterValue::Texture(texture));
        material.set_value("textureRepeat", ParameterValue::Vec2(repeat));
        material.set_value("textureTransform", ParameterValue::Vec2(Vec2::ZERO));
        material.set_value("worldViewProjection", ParameterValue::Mat4(Mat4::IDENTITY));
        Ok(material)
    }

    fn textured_quad(half_x: f32, y: f32, half_z: f32, material: Material) -> Model {
        let mesh = Mesh::create_quad(
            Vec3::new(-half_x, y, -half_z),
            Vec3::new(-half_x, y, half_z),
            Vec3::new(half_x, y, -half_z),
            Vec3::new(half_x, y, half_z),
        );
        let mut model = Model::new(mesh);
        model.set_material(material);
        model
    }

    fn build_models(&self, resources: &Resources) -> Result<BoardModels, EngineError> {
        let size = self.config.world_size;
        let ground = Self::textured_quad(
            size,
            0.0,
            size,
            Self::textured_material(
                resources,
                "res/textures/tileable_asphalt.png",
                true,
                Vec2::splat(size / 2.0),
            )?,
        );
        let board = Self::textured_quad(
            0.5,
            0.1,
            1.0,
            Self::textured_material(resources, "res/textures/longboard.png", false, Vec2::ONE)?,
        );
        let wheels = Self::textured_quad(
            0.5,
            0.025,
            0.25,
            Self::textured_material(resources, "res/textures/wheels.png", false, Vec2::ONE)?,
        );

        let mut gradient_material =
            Material::create(resources, "res/shaders/quad.vsh", "res/shaders/quad.fsh")?;
        let gradient_texture = Texture::create(resources, "res/textures/nice_gradient.png", false)?;
        gradient_material.set_value("texture", ParameterValue::Texture(gradient_texture));
        let mut gradient = Model::new(Mesh::create_quad_fullscreen());
        gradient.set_material(gradient_material);

        Ok(BoardModels {
            ground,
            wheels,
            board,
            gradient,
        })
    }

    fn set_wvp(model: &mut Model, wvp: Mat4) {
        if let Some(material) = model.material_mut() {
            material.set_value("worldViewProjection", ParameterValue::Mat4(wvp));
        }
    }

    fn update_sound(&mut self, throttle: f32) {
        let Some(sound) = self.sound.as_mut() else {
            return;
        };
        if throttle > 0.0 {
            if !sound.is_playing() {
                sound.play();
            }
            sound.set_pitch(throttle);
        } else {
            sound.stop();
        }
    }
}

fn values_only(parameter: &MaterialParameter) -> Option<ParameterValue> {
    match parameter {
        MaterialParameter::Value(value) => Some(value.clone()),
        MaterialParameter::Bound(_) => None,
    }
}

impl Game for LongboardGame {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        let projection =
            Mat4::perspective_rh_gl(45f32.to_radians(), engine.aspect_ratio(), 0.25, 100.0);
        let view = Mat4::look_at_rh(
            Vec3::new(0.0, 1.75, 1.35),
            Vec3::new(0.0, 0.0, -0.15),
            Vec3::new(0.0, 0.2, -0.8),
        );
        self.view_projection = projection * view;

        self.models = Some(self.build_models(&engine.resources)?);

        self.sound = match AudioSource::create(&engine.resources, SOUND_PATH) {
            Ok(mut sound) => {
                sound.set_looped(true);
                Some(sound)
            }
            Err(err) => {
                log::warn!("[Longboard] continuing without wheel sound: {err}");
                None
            }
        };

        self.kinematics = BoardKinematics::new(&self.config);
        log::info!("[Longboard] initialized, world size {}", self.config.world_size);
        Ok(())
    }

    fn finalize(&mut self, _engine: &mut Engine) {
        if let Some(sound) = self.sound.as_mut() {
            sound.stop();
        }
        self.sound = None;
        self.models = None;
    }

    fn update(&mut self, engine: &mut Engine, dt: f32) {
        let step = self.kinematics.step(&self.config, engine.accelerometer(), dt);
        self.update_sound(step.throttle);
        self.last_step = Some(step);

        let view_projection = self.view_projection;
        let ground_wvp = view_projection * self.kinematics.ground_world();
        let wheels_wvp = view_projection * wheels_world(&self.config, step.roll);
        let board_wvp = view_projection * board_world(step.roll);
        let uv = self.kinematics.uv_offset();

        if let Some(models) = self.models.as_mut() {
            Self::set_wvp(&mut models.ground, ground_wvp);
            if let Some(material) = models.ground.material_mut() {
                material.set_value("textureTransform", ParameterValue::Vec2(uv));
            }
            Self::set_wvp(&mut models.wheels, wheels_wvp);
            Self::set_wvp(&mut models.board, board_wvp);
        }

        log::debug!(
            "[Longboard] throttle {:.2} speed {:.2} heading {:?}",
            step.throttle,
            self.kinematics.speed(),
            self.kinematics.direction()
        );
    }

    fn render(&mut self, _engine: &Engine, _dt: f32, frame: &mut DrawList) {
        frame.push(DrawCommand::Clear {
            color: Vec4::ONE,
            depth: 1.0,
        });
        let Some(models) = &self.models else {
            return;
        };
        frame.push(models.ground.draw_command("ground", values_only));
        frame.push(models.wheels.draw_command("wheels", values_only));
        frame.push(models.board.draw_command("board", values_only));
        frame.push(models.gradient.draw_command("gradient", values_only));
    }
}
