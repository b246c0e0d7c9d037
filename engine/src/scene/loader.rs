//! Scene Loader
//!
//! Builds a `Scene` (and its collision objects) from a JSON description.
//!
//! ```json
//! {
//!   "id": "boy",
//!   "ambient_color": [0.2, 0.2, 0.25],
//!   "active_camera": "Camera",
//!   "nodes": [
//!     {
//!       "id": "Ground",
//!       "translation": [0, -0.5, 0],
//!       "model": {
//!         "mesh": { "box": { "half_extents": [40, 0.5, 40] } },
//!         "material": {
//!           "vertex_shader": "res/shaders/colored.vsh",
//!           "fragment_shader": "res/shaders/colored.fsh",
//!           "parameters": {
//!             "u_diffuseColor": { "vec4": [0.4, 0.5, 0.3, 1] },
//!             "u_worldViewProjectionMatrix": { "bind": "world_view_projection" }
//!           }
//!         }
//!       },
//!       "collision": { "type": "rigid_body", "shape": { "box": { "half_extents": [40, 0.5, 40] } } },
//!       "children": []
//!     }
//!   ]
//! }
//! ```

use std::collections::{BTreeMap, HashSet};

use glam::{EulerRot, Quat, Vec2, Vec3, Vec4};
use serde::Deserialize;

use super::material::{Binding, Material, ParameterValue, Texture};
use super::node::{Camera, Light, Node, NodeId};
use super::Scene;
use crate::error::EngineError;
use crate::physics::{CollisionObjectType, CollisionShape, PhysicsWorld};
use crate::render::{Mesh, Model};
use crate::resources::Resources;

// =============================================================================
// Description types
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SceneDesc {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub ambient_color: Vec3,
    #[serde(default)]
    pub active_camera: Option<String>,
    pub nodes: Vec<NodeDesc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeDesc {
    pub id: String,
    #[serde(default)]
    pub translation: Vec3,
    /// Euler angles in degrees, applied yaw (Y), pitch (X), roll (Z)
    #[serde(default)]
    pub rotation_degrees: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub model: Option<ModelDesc>,
    #[serde(default)]
    pub light: Option<LightDesc>,
    #[serde(default)]
    pub camera: Option<CameraDesc>,
    #[serde(default)]
    pub collision: Option<CollisionDesc>,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub animation: Option<String>,
    #[serde(default)]
    pub children: Vec<NodeDesc>,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelDesc {
    pub mesh: MeshDesc,
    #[serde(default)]
    pub material: Option<MaterialDesc>,
    /// Materials for individual mesh parts, keyed by part index
    #[serde(default)]
    pub parts: BTreeMap<usize, MaterialDesc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshDesc {
    Box { half_extents: Vec3 },
    /// Horizontal quad centered on the node
    Quad { half_size: Vec2 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct MaterialDesc {
    pub vertex_shader: String,
    pub fragment_shader: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterDesc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterDesc {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Texture {
        path: String,
        #[serde(default)]
        mipmap: bool,
        #[serde(default)]
        wrap: bool,
    },
    Bind(BindingDesc),
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingDesc {
    WorldViewProjection,
    AmbientColor,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightDesc {
    Directional { color: Vec3 },
    Point { color: Vec3, range: f32 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraDesc {
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    #[serde(default = "square_aspect")]
    pub aspect_ratio: f32,
}

fn square_aspect() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollisionDesc {
    #[serde(rename = "type")]
    pub kind: CollisionKindDesc,
    pub shape: ShapeDesc,
    #[serde(default)]
    pub mass: f32,
    #[serde(default)]
    pub offset: Vec3,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionKindDesc {
    RigidBody,
    Character,
    GhostObject,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeDesc {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
    Capsule { radius: f32, height: f32 },
}

impl From<CollisionKindDesc> for CollisionObjectType {
    fn from(kind: CollisionKindDesc) -> Self {
        match kind {
            CollisionKindDesc::RigidBody => CollisionObjectType::RigidBody,
            CollisionKindDesc::Character => CollisionObjectType::Character,
            CollisionKindDesc::GhostObject => CollisionObjectType::GhostObject,
        }
    }
}

impl From<ShapeDesc> for CollisionShape {
    fn from(shape: ShapeDesc) -> Self {
        match shape {
            ShapeDesc::Box { half_extents } => CollisionShape::Box { half_extents },
            ShapeDesc::Sphere { radius } => CollisionShape::Sphere { radius },
            ShapeDesc::Capsule { radius, height } => CollisionShape::Capsule { radius, height },
        }
    }
}

// =============================================================================
// Building
// =============================================================================

impl Scene {
    /// Loads a scene file and attaches the collision objects it declares.
    pub fn load(
        resources: &Resources,
        path: &str,
        physics: &mut PhysicsWorld,
    ) -> Result<Scene, EngineError> {
        let desc: SceneDesc = resources.load_json(path)?;
        let scene = Scene::from_desc(&desc, resources, physics)?;
        log::info!(
            "[Scene] loaded '{}' from {path}: {} nodes, {} collision objects",
            scene.id(),
            scene.len(),
            physics.objects().len()
        );
        Ok(scene)
    }

    pub fn from_desc(
        desc: &SceneDesc,
        resources: &Resources,
        physics: &mut PhysicsWorld,
    ) -> Result<Scene, EngineError> {
        let mut seen = HashSet::new();
        for node in &desc.nodes {
            check_unique_ids(node, &mut seen)?;
        }

        let mut scene = Scene::new(&desc.id);
        scene.set_ambient_color(desc.ambient_color);
        for node in &desc.nodes {
            add_node(&mut scene, node, None, resources, physics)?;
        }

        if let Some(camera) = &desc.active_camera {
            let id = scene.require_node(camera)?;
            scene.set_active_camera(id)?;
        }
        Ok(scene)
    }
}

fn check_unique_ids<'a>(
    node: &'a NodeDesc,
    seen: &mut HashSet<&'a str>,
) -> Result<(), EngineError> {
    if !seen.insert(node.id.as_str()) {
        return Err(EngineError::InvalidScene(format!("duplicate node id '{}'", node.id)));
    }
    for child in &node.children {
        check_unique_ids(child, seen)?;
    }
    Ok(())
}

fn add_node(
    scene: &mut Scene,
    desc: &NodeDesc,
    parent: Option<NodeId>,
    resources: &Resources,
    physics: &mut PhysicsWorld,
) -> Result<NodeId, EngineError> {
    let mut node = Node::new(&desc.id);
    let r = desc.rotation_degrees;
    node.transform.translation = desc.translation;
    node.transform.rotation = Quat::from_euler(
        EulerRot::YXZ,
        r.y.to_radians(),
        r.x.to_radians(),
        r.z.to_radians(),
    );
    node.transform.scale = desc.scale;
    node.transparent = desc.transparent;
    node.animation = desc.animation.clone();
    node.light = desc.light.as_ref().map(|light| match *light {
        LightDesc::Directional { color } => Light::Directional { color },
        LightDesc::Point { color, range } => Light::Point { color, range },
    });
    node.camera = desc
        .camera
        .as_ref()
        .map(|c| Camera::perspective(c.fov_y, c.aspect_ratio, c.near, c.far));

    let id = scene.add_node(node, parent);

    if let Some(model) = &desc.model {
        let built = build_model(model, id, resources)?;
        scene.node_mut(id).model = Some(built);
    }
    if let Some(collision) = &desc.collision {
        physics.attach(
            scene,
            id,
            collision.kind.into(),
            collision.shape.into(),
            collision.offset,
            collision.mass,
        );
    }
    for child in &desc.children {
        add_node(scene, child, Some(id), resources, physics)?;
    }
    Ok(id)
}

fn build_model(
    desc: &ModelDesc,
    owner: NodeId,
    resources: &Resources,
) -> Result<Model, EngineError> {
    let mesh = match desc.mesh {
        MeshDesc::Box { half_extents } => Mesh::create_box(half_extents),
        MeshDesc::Quad { half_size } => Mesh::create_quad(
            Vec3::new(-half_size.x, 0.0, -half_size.y),
            Vec3::new(-half_size.x, 0.0, half_size.y),
            Vec3::new(half_size.x, 0.0, -half_size.y),
            Vec3::new(half_size.x, 0.0, half_size.y),
        ),
    };
    let mut model = Model::new(mesh);
    if let Some(material) = &desc.material {
        model.set_material(build_material(material, owner, resources)?);
    }
    for (&index, material) in &desc.parts {
        if index >= model.mesh_part_count() {
            return Err(EngineError::InvalidScene(format!(
                "material for mesh part {index}, mesh has {}",
                model.mesh_part_count()
            )));
        }
        model.set_part_material(index, build_material(material, owner, resources)?);
    }
    Ok(model)
}

fn build_material(
    desc: &MaterialDesc,
    owner: NodeId,
    resources: &Resources,
) -> Result<Material, EngineError> {
    let mut material = Material::create(resources, &desc.vertex_shader, &desc.fragment_shader)?;
    for (name, parameter) in &desc.parameters {
        match parameter {
            ParameterDesc::Float(v) => material.set_value(name, ParameterValue::Float(*v)),
            ParameterDesc::Vec2(v) => material.set_value(name, ParameterValue::Vec2(*v)),
            ParameterDesc::Vec3(v) => material.set_value(name, ParameterValue::Vec3(*v)),
            ParameterDesc::Vec4(v) => material.set_value(name, ParameterValue::Vec4(*v)),
            ParameterDesc::Texture { path, mipmap, wrap } => {
                let mut texture = Texture::create(resources, path, *mipmap)?;
                texture.set_wrap_mode(*wrap, *wrap);
                material.set_value(name, ParameterValue::Texture(texture));
            }
            ParameterDesc::Bind(BindingDesc::WorldViewProjection) => {
                material.bind(name, Binding::NodeWorldViewProjection(owner))
            }
            ParameterDesc::Bind(BindingDesc::AmbientColor) => {
                material.bind(name, Binding::SceneAmbientColor)
            }
        }
    }
    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MaterialParameter;

    const SMALL: &str = r#"{
        "id": "small",
        "ambient_color": [0.1, 0.2, 0.3],
        "active_camera": "Eye",
        "nodes": [
            {
                "id": "Floor",
                "translation": [0, -0.5, 0],
                "model": {
                    "mesh": { "box": { "half_extents": [10, 0.5, 10] } },
                    "material": {
                        "vertex_shader": "res/shaders/colored.vsh",
                        "fragment_shader": "res/shaders/colored.fsh",
                        "parameters": {
                            "u_diffuseColor": { "vec4": [1, 0, 0, 1] },
                            "u_worldViewProjectionMatrix": { "bind": "world_view_projection" }
                        }
                    },
                    "parts": {
                        "0": { "vertex_shader": "a.vsh", "fragment_shader": "a.fsh" }
                    }
                },
                "collision": { "type": "rigid_body", "shape": { "box": { "half_extents": [10, 0.5, 10] } } }
            },
            {
                "id": "Eye",
                "translation": [0, 2, 5],
                "rotation_degrees": [0, 90, 0],
                "camera": { "fov_y": 45, "near": 0.5, "far": 100 },
                "children": [ { "id": "Lamp", "light": { "directional": { "color": [1, 1, 1] } } } ]
            }
        ]
    }"#;

    fn load(text: &str) -> Result<(Scene, PhysicsWorld), EngineError> {
        let desc: SceneDesc = serde_json::from_str(text).unwrap();
        let mut physics = PhysicsWorld::new();
        let scene = Scene::from_desc(&desc, &Resources::new(".", false), &mut physics)?;
        Ok((scene, physics))
    }

    #[test]
    fn test_builds_hierarchy_and_components() {
        let (scene, physics) = load(SMALL).unwrap();
        assert_eq!(scene.id(), "small");
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.ambient_color(), Vec3::new(0.1, 0.2, 0.3));

        let eye = scene.require_node("Eye").unwrap();
        assert_eq!(scene.active_camera(), Some(eye));
        let lamp = scene.find_descendant(eye, "Lamp").unwrap();
        assert!(scene.node(lamp).light.is_some());
        // yaw of 90 degrees turns forward from -Z to -X
        assert!((scene.forward_vector_world(eye) - Vec3::NEG_X).length() < 1e-5);

        let floor = scene.require_node("Floor").unwrap();
        let model = scene.node(floor).model.as_ref().unwrap();
        assert!(model.has_part_material(0));
        assert_eq!(
            model.material().unwrap().parameter("u_worldViewProjectionMatrix"),
            Some(&MaterialParameter::Bound(Binding::NodeWorldViewProjection(floor)))
        );
        assert_eq!(physics.objects().len(), 1);
        assert!(scene.node(floor).collision.is_some());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let text =
            r#"{ "nodes": [ { "id": "A" }, { "id": "B", "children": [ { "id": "A" } ] } ] }"#;
        assert!(matches!(load(text), Err(EngineError::InvalidScene(_))));
    }

    #[test]
    fn test_active_camera_must_exist_and_have_camera() {
        let missing = r#"{ "active_camera": "Nope", "nodes": [ { "id": "A" } ] }"#;
        assert!(matches!(load(missing), Err(EngineError::NodeNotFound(_))));

        let no_camera = r#"{ "active_camera": "A", "nodes": [ { "id": "A" } ] }"#;
        assert!(matches!(
            load(no_camera),
            Err(EngineError::MissingComponent { component: "camera", .. })
        ));
    }

    #[test]
    fn test_part_index_out_of_range() {
        let text = r#"{ "nodes": [ { "id": "A", "model": {
            "mesh": { "quad": { "half_size": [1, 1] } },
            "parts": { "3": { "vertex_shader": "a.vsh", "fragment_shader": "a.fsh" } }
        } } ] }"#;
        assert!(matches!(load(text), Err(EngineError::InvalidScene(_))));
    }

    #[test]
    fn test_loads_sample_scene_file() {
        let resources = Resources::new(env!("CARGO_MANIFEST_DIR"), false);
        let mut physics = PhysicsWorld::new();
        let scene = Scene::load(&resources, "res/scene.json", &mut physics).unwrap();
        for id in ["BoyCharacter", "BoyMesh", "BoyShadow", "Camera", "SunLight"] {
            assert!(scene.find_node(id).is_some(), "missing {id}");
        }
        let camera = scene.require_node("Camera").unwrap();
        assert_eq!(scene.active_camera(), Some(camera));
    }
}
