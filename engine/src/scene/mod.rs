//! Scene Module
//!
//! Node arena with parent/child links, world-space queries, and depth-first
//! traversal through visitor traits. Scenes are usually loaded from a JSON
//! description (see [`loader`]).
//!
//! # Example
//!
//! ```ignore
//! use gameplay_samples_engine::scene::{Node, RenderPass, Scene, DrawSceneVisitor};
//! use glam::Vec3;
//!
//! let mut scene = Scene::new("demo");
//! let root = scene.add_node(Node::new("Root"), None);
//! let child = scene.add_node(Node::new("Child").with_translation(Vec3::X), Some(root));
//! assert_eq!(scene.translation_world(child), Vec3::X);
//!
//! let mut opaque = DrawSceneVisitor::new(RenderPass::Opaque, &mut frame);
//! scene.visit(&mut opaque);
//! ```

pub mod loader;
pub mod material;
pub mod node;

pub use material::{Binding, Material, MaterialParameter, ParameterValue, Texture};
pub use node::{Camera, Light, Node, NodeId, Transform};

use glam::{Mat4, Quat, Vec3};

use crate::error::EngineError;
use crate::render::DrawList;

// =============================================================================
// Visitors
// =============================================================================

/// Read-only depth-first traversal. Returning `false` skips the node's children.
pub trait NodeVisitor {
    fn visit(&mut self, scene: &Scene, node: NodeId) -> bool;
}

/// Mutable depth-first traversal. Returning `false` skips the node's children.
pub trait NodeVisitorMut {
    fn visit(&mut self, id: NodeId, node: &mut Node) -> bool;
}

/// Which models a draw traversal emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    Opaque,
    Transparent,
}

impl RenderPass {
    pub fn accepts(self, node: &Node) -> bool {
        match self {
            RenderPass::Opaque => !node.transparent,
            RenderPass::Transparent => node.transparent,
        }
    }
}

/// Emits a model draw command for every node that belongs to `pass`.
pub struct DrawSceneVisitor<'a> {
    pass: RenderPass,
    frame: &'a mut DrawList,
    drawn: usize,
}

impl<'a> DrawSceneVisitor<'a> {
    pub fn new(pass: RenderPass, frame: &'a mut DrawList) -> Self {
        Self {
            pass,
            frame,
            drawn: 0,
        }
    }

    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl NodeVisitor for DrawSceneVisitor<'_> {
    fn visit(&mut self, scene: &Scene, id: NodeId) -> bool {
        let node = scene.node(id);
        if let Some(model) = &node.model {
            if self.pass.accepts(node) {
                self.frame
                    .push(model.draw_command(node.id(), |p| scene.resolve(p)));
                self.drawn += 1;
            }
        }
        true
    }
}

// =============================================================================
// Scene
// =============================================================================

#[derive(Debug, Clone)]
pub struct Scene {
    id: String,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    active_camera: Option<NodeId>,
    ambient_color: Vec3,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("")
    }
}

impl Scene {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            nodes: Vec::new(),
            roots: Vec::new(),
            active_camera: None,
            ambient_color: Vec3::ZERO,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node under `parent`, or as a root when `parent` is `None`.
    pub fn add_node(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn find_node(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.id() == id)
            .map(NodeId)
    }

    pub fn require_node(&self, id: &str) -> Result<NodeId, EngineError> {
        self.find_node(id)
            .ok_or_else(|| EngineError::NodeNotFound(id.to_string()))
    }

    /// Searches the subtree below `root` (excluding `root` itself).
    pub fn find_descendant(&self, root: NodeId, id: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.nodes[current.0].id() == id {
                return Some(current);
            }
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        None
    }

    // ----- world-space queries -----

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let node = &self.nodes[id.0];
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    pub fn translation_world(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).w_axis.truncate()
    }

    pub fn forward_vector_world(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id)
            .transform_vector3(Vec3::NEG_Z)
            .normalize_or_zero()
    }

    /// Node forward direction expressed in the active camera's view space.
    pub fn forward_vector_view(&self, id: NodeId) -> Vec3 {
        let forward = self.forward_vector_world(id);
        match self.view_matrix() {
            Some(view) => view.transform_vector3(forward).normalize_or_zero(),
            None => forward,
        }
    }

    // ----- local transform edits -----

    pub fn set_translation(&mut self, id: NodeId, translation: Vec3) {
        self.nodes[id.0].transform.translation = translation;
    }

    pub fn translate(&mut self, id: NodeId, delta: Vec3) {
        self.nodes[id.0].transform.translation += delta;
    }

    /// Moves the node along its own forward axis.
    pub fn translate_forward(&mut self, id: NodeId, amount: f32) {
        let transform = &mut self.nodes[id.0].transform;
        transform.translation += transform.forward() * amount;
    }

    /// Rotates the node about a local axis.
    pub fn rotate(&mut self, id: NodeId, axis: Vec3, angle: f32) {
        let transform = &mut self.nodes[id.0].transform;
        transform.rotation = (transform.rotation * Quat::from_axis_angle(axis, angle)).normalize();
    }

    pub fn rotate_y(&mut self, id: NodeId, angle: f32) {
        self.rotate(id, Vec3::Y, angle);
    }

    pub fn set_transparent(&mut self, id: NodeId, transparent: bool) {
        self.nodes[id.0].transparent = transparent;
    }

    // ----- camera and lighting -----

    pub fn active_camera(&self) -> Option<NodeId> {
        self.active_camera
    }

    pub fn set_active_camera(&mut self, id: NodeId) -> Result<(), EngineError> {
        if self.nodes[id.0].camera.is_none() {
            return Err(EngineError::MissingComponent {
                node: self.nodes[id.0].id().to_string(),
                component: "camera",
            });
        }
        self.active_camera = Some(id);
        Ok(())
    }

    pub fn active_camera_mut(&mut self) -> Option<&mut Camera> {
        let id = self.active_camera?;
        self.nodes[id.0].camera.as_mut()
    }

    pub fn view_matrix(&self) -> Option<Mat4> {
        self.active_camera.map(|id| self.world_matrix(id).inverse())
    }

    pub fn view_projection_matrix(&self) -> Option<Mat4> {
        let id = self.active_camera?;
        let camera = self.nodes[id.0].camera.as_ref()?;
        Some(camera.projection() * self.world_matrix(id).inverse())
    }

    pub fn ambient_color(&self) -> Vec3 {
        self.ambient_color
    }

    pub fn set_ambient_color(&mut self, color: Vec3) {
        self.ambient_color = color;
    }

    /// Resolves a material parameter to a concrete value.
    pub fn resolve(&self, parameter: &MaterialParameter) -> Option<ParameterValue> {
        match parameter {
            MaterialParameter::Value(value) => Some(value.clone()),
            MaterialParameter::Bound(binding) => match *binding {
                Binding::NodeForwardView(id) => {
                    Some(ParameterValue::Vec3(self.forward_vector_view(id)))
                }
                Binding::LightColor(id) => self.nodes[id.0]
                    .light
                    .map(|light| ParameterValue::Vec3(light.color())),
                Binding::SceneAmbientColor => Some(ParameterValue::Vec3(self.ambient_color)),
                Binding::NodeWorldViewProjection(id) => self
                    .view_projection_matrix()
                    .map(|vp| ParameterValue::Mat4(vp * self.world_matrix(id))),
            },
        }
    }

    // ----- traversal -----

    /// Pre-order depth-first visit of every root subtree, in insertion order.
    pub fn visit(&self, visitor: &mut dyn NodeVisitor) {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if visitor.visit(self, id) {
                stack.extend(self.nodes[id.0].children.iter().rev().copied());
            }
        }
    }

    pub fn visit_mut(&mut self, visitor: &mut dyn NodeVisitorMut) {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if visitor.visit(id, &mut self.nodes[id.0]) {
                stack.extend(self.nodes[id.0].children.iter().rev().copied());
            }
        }
    }

    // ----- debug geometry -----

    /// World-space bounding boxes of every model.
    pub fn model_bounding_boxes(&self) -> Vec<(Vec3, Vec3)> {
        self.model_nodes()
            .map(|(id, model)| {
                let (min, max) = model.mesh.bounding_box();
                let world = self.world_matrix(id);
                let mut lo = Vec3::splat(f32::MAX);
                let mut hi = Vec3::splat(f32::MIN);
                for corner in 0..8 {
                    let p = Vec3::new(
                        if corner & 1 == 0 { min.x } else { max.x },
                        if corner & 2 == 0 { min.y } else { max.y },
                        if corner & 4 == 0 { min.z } else { max.z },
                    );
                    let w = world.transform_point3(p);
                    lo = lo.min(w);
                    hi = hi.max(w);
                }
                (lo, hi)
            })
            .collect()
    }

    /// World-space bounding spheres of every model.
    pub fn model_bounding_spheres(&self) -> Vec<(Vec3, f32)> {
        self.model_nodes()
            .map(|(id, model)| {
                let (center, radius) = model.mesh.bounding_sphere();
                let world = self.world_matrix(id);
                let (scale, _, _) = world.to_scale_rotation_translation();
                (world.transform_point3(center), radius * scale.max_element())
            })
            .collect()
    }

    fn model_nodes(&self) -> impl Iterator<Item = (NodeId, &crate::render::Model)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.model.as_ref().map(|m| (NodeId(i), m)))
    }
}
