//! Camera De-occlusion
//!
//! Keeps the character visible: when something solid sits between the camera
//! and its focal point, the camera is pulled forward along its view direction
//! until the obstruction is cleared. The pull is undone at the start of the
//! next adjustment, so the camera never drifts. A character that ends up close
//! to the camera fades out.

use crate::error::EngineError;
use crate::physics::{CollisionObjectId, PhysicsWorld};
use crate::samples::config::CharacterConfig;
use crate::scene::{NodeId, ParameterValue, Scene};

/// Material parameter carrying the character's opacity.
pub const ALPHA_PARAMETER: &str = "u_globalAlpha";

/// Handles the rig works with.
#[derive(Debug, Clone, Copy)]
pub struct RigTargets {
    pub camera: NodeId,
    /// Ghost object attached to the camera node
    pub camera_object: CollisionObjectId,
    /// The character's collision object; hitting it means the view is clear
    pub character: CollisionObjectId,
    /// Node whose model fades when the camera is close
    pub mesh: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraAdjustment {
    /// Last object that blocked the view this frame
    pub occluder: Option<CollisionObjectId>,
    /// Stopped because the camera reached the focal point
    pub aborted: bool,
    /// Total pull applied this frame
    pub offset: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Default)]
pub struct CameraRig {
    offset: f32,
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pull currently applied to the camera.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn adjust(
        &mut self,
        scene: &mut Scene,
        physics: &PhysicsWorld,
        targets: RigTargets,
        config: &CharacterConfig,
    ) -> Result<CameraAdjustment, EngineError> {
        let camera = targets.camera;
        if self.offset != 0.0 {
            scene.translate_forward(camera, -self.offset);
            self.offset = 0.0;
        }

        let focal_point = scene.translation_world(camera)
            + scene.forward_vector_world(camera) * config.focus_distance;

        let mut occluder = None;
        let mut aborted = false;
        'occlusion: loop {
            let blocker = match physics.sweep_test(scene, targets.camera_object, focal_point)? {
                Some(hit) if hit.object != targets.character => hit.object,
                _ => break,
            };
            occluder = Some(blocker);

            loop {
                let distance_sq = scene.translation_world(camera).distance_squared(focal_point);
                if distance_sq <= config.min_focus_distance_sq {
                    aborted = true;
                    break 'occlusion;
                }
                // only a positive step ever reaches the focal point
                if !(config.camera_step.is_finite() && config.camera_step > 0.0) {
                    log::warn!("[Camera] invalid camera step {}", config.camera_step);
                    aborted = true;
                    break 'occlusion;
                }
                scene.translate_forward(camera, config.camera_step);
                self.offset += config.camera_step;

                match physics.sweep_test(scene, targets.camera_object, focal_point)? {
                    Some(hit) if hit.object == blocker => continue,
                    _ => break,
                }
            }
        }

        let alpha = match occluder {
            Some(_) => {
                let d = scene
                    .translation_world(camera)
                    .distance(scene.translation_world(targets.mesh));
                if d < config.alpha_fade_distance {
                    d / config.alpha_fade_distance
                } else {
                    1.0
                }
            }
            None => 1.0,
        };
        set_alpha(scene, targets.mesh, alpha);

        if aborted {
            log::debug!("[Camera] reached focal point, pull {:.2}", self.offset);
        }
        Ok(CameraAdjustment {
            occluder,
            aborted,
            offset: self.offset,
            alpha,
        })
    }
}

fn set_alpha(scene: &mut Scene, mesh: NodeId, alpha: f32) {
    scene.set_transparent(mesh, alpha < 1.0);
    if let Some(material) = scene
        .node_mut(mesh)
        .model
        .as_mut()
        .and_then(|model| model.material_mut())
    {
        material.set_value(ALPHA_PARAMETER, ParameterValue::Float(alpha));
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::physics::{CollisionObjectType, CollisionShape};
    use crate::render::{Mesh, Model};
    use crate::scene::{Material, Node};

    struct Rig {
        scene: Scene,
        physics: PhysicsWorld,
        targets: RigTargets,
        rig: CameraRig,
    }

    /// Camera at z = 10 looking down -Z at a character at `character_at`.
    fn rig(character_at: Vec3) -> Rig {
        let mut scene = Scene::new("rig");
        let mut physics = PhysicsWorld::new();

        let boy = scene.add_node(Node::new("Boy").with_translation(character_at), None);
        let character = physics.attach(
            &mut scene,
            boy,
            CollisionObjectType::Character,
            CollisionShape::Capsule {
                radius: 1.2,
                height: 5.0,
            },
            Vec3::new(0.0, 2.5, 0.0),
            20.0,
        );
        let mut model = Model::new(Mesh::create_box(Vec3::ONE));
        model.set_material(Material::new("a.vsh", "a.fsh"));
        let mesh = scene.add_node(Node::new("BoyMesh").with_model(model), Some(boy));

        let camera = scene.add_node(
            Node::new("Camera").with_translation(Vec3::new(0.0, 2.0, 10.0)),
            None,
        );
        let camera_object = physics.attach(
            &mut scene,
            camera,
            CollisionObjectType::GhostObject,
            CollisionShape::Sphere { radius: 0.5 },
            Vec3::ZERO,
            0.0,
        );

        Rig {
            scene,
            physics,
            targets: RigTargets {
                camera,
                camera_object,
                character,
                mesh,
            },
            rig: CameraRig::new(),
        }
    }

    fn add_wall(r: &mut Rig, z: f32) -> NodeId {
        let wall = r
            .scene
            .add_node(Node::new("Wall").with_translation(Vec3::new(0.0, 2.0, z)), None);
        r.physics.attach(
            &mut r.scene,
            wall,
            CollisionObjectType::RigidBody,
            CollisionShape::Box {
                half_extents: Vec3::new(3.0, 3.0, 0.2),
            },
            Vec3::ZERO,
            0.0,
        );
        wall
    }

    fn adjust(r: &mut Rig) -> CameraAdjustment {
        r.rig
            .adjust(&mut r.scene, &r.physics, r.targets, &CharacterConfig::default())
            .unwrap()
    }

    fn alpha_value(r: &Rig) -> Option<ParameterValue> {
        r.scene
            .node(r.targets.mesh)
            .model
            .as_ref()
            .and_then(|m| m.material())
            .and_then(|m| m.value(ALPHA_PARAMETER))
            .cloned()
    }

    #[test]
    fn test_clear_view_leaves_camera_alone() {
        let mut r = rig(Vec3::ZERO);
        let result = adjust(&mut r);
        assert_eq!(result.occluder, None);
        assert_eq!(result.offset, 0.0);
        assert_eq!(result.alpha, 1.0);
        assert!(!r.scene.node(r.targets.mesh).transparent);
        assert_eq!(alpha_value(&r), Some(ParameterValue::Float(1.0)));
        assert_eq!(r.scene.translation_world(r.targets.camera), Vec3::new(0.0, 2.0, 10.0));
    }

    #[test]
    fn test_pulls_past_occluder_and_fades_character() {
        let mut r = rig(Vec3::ZERO);
        let wall = add_wall(&mut r, 5.0);
        let result = adjust(&mut r);

        assert_eq!(result.occluder, r.scene.node(wall).collision);
        assert!(!result.aborted);
        // inflated wall face at z = 5.7
        let z = r.scene.translation_world(r.targets.camera).z;
        assert!(z <= 5.7 + 1e-4 && z > 5.5, "camera at {z}");
        assert!((result.offset - (10.0 - z)).abs() < 1e-3);
        assert!(result.alpha < 1.0);
        assert!(r.scene.node(r.targets.mesh).transparent);
    }

    #[test]
    fn test_offset_returns_to_zero_once_clear() {
        let mut r = rig(Vec3::ZERO);
        let wall = add_wall(&mut r, 5.0);
        adjust(&mut r);
        assert!(r.rig.offset() > 0.0);

        r.scene.set_translation(wall, Vec3::new(100.0, 2.0, 5.0));
        let result = adjust(&mut r);
        assert_eq!(result.occluder, None);
        assert_eq!(r.rig.offset(), 0.0);
        let z = r.scene.translation_world(r.targets.camera).z;
        assert!((z - 10.0).abs() < 1e-4);
        assert!(!r.scene.node(r.targets.mesh).transparent);
    }

    #[test]
    fn test_non_advancing_step_aborts_instead_of_looping() {
        for step in [0.0, -0.1, f32::NAN] {
            let mut r = rig(Vec3::ZERO);
            add_wall(&mut r, 5.0);
            let config = CharacterConfig {
                camera_step: step,
                ..CharacterConfig::default()
            };
            let result = r
                .rig
                .adjust(&mut r.scene, &r.physics, r.targets, &config)
                .unwrap();
            assert!(result.aborted, "step {step}");
            assert!(result.occluder.is_some());
            assert_eq!(result.offset, 0.0);
            let z = r.scene.translation_world(r.targets.camera).z;
            assert_eq!(z, 10.0);
        }
    }

    #[test]
    fn test_abort_near_focal_point_keeps_offset_and_sets_alpha() {
        // Character off to the side so nothing but the wall is in view
        let mut r = rig(Vec3::new(50.0, 0.0, 0.0));
        add_wall(&mut r, -5.5);
        let result = adjust(&mut r);
        assert!(result.aborted);
        assert!(result.occluder.is_some());
        assert!(result.offset > 14.0);
        assert_eq!(r.rig.offset(), result.offset);
        // far from the character: fully opaque
        assert_eq!(alpha_value(&r), Some(ParameterValue::Float(1.0)));

        // the next adjustment starts by undoing exactly this pull
        let camera = r.targets.camera;
        let rest = r.scene.translation_world(camera)
            - r.scene.forward_vector_world(camera) * r.rig.offset();
        assert!((rest.z - 10.0).abs() < 1e-3);
    }
}
