//! Scene nodes and their attachments (model, light, camera, collision object).

use glam::{Mat4, Quat, Vec3};

use crate::physics::CollisionObjectId;
use crate::render::Model;

/// Index of a node inside its scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Local transform relative to the parent node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Local forward axis (-Z) in parent space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Directional { color: Vec3 },
    Point { color: Vec3, range: f32 },
}

impl Light {
    pub fn color(&self) -> Vec3 {
        match *self {
            Light::Directional { color } | Light::Point { color, .. } => color,
        }
    }
}

/// Perspective camera. The view comes from the owning node's world transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn perspective(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            near,
            far,
        }
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y.to_radians(), self.aspect_ratio, self.near, self.far)
    }
}

/// A scene node. Hierarchy links are managed by the scene.
#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    pub transform: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub model: Option<Model>,
    pub light: Option<Light>,
    pub camera: Option<Camera>,
    pub collision: Option<CollisionObjectId>,
    /// Drawn in the transparent pass instead of the opaque one
    pub transparent: bool,
    /// Name of the animation targeting this node, if any
    pub animation: Option<String>,
}

impl Node {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            transform: Transform::default(),
            parent: None,
            children: Vec::new(),
            model: None,
            light: None,
            camera: None,
            collision: None,
            transparent: false,
            animation: None,
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.light = Some(light);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
