//! Meshes and Models
//!
//! CPU-side geometry (quads, boxes) and the model that pairs a mesh with its
//! materials. Vertex data uses a fixed 32-byte layout so a backend could upload
//! it as-is.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::DrawCommand;
use crate::scene::material::{Material, MaterialParameter, ParameterValue};

/// Interleaved vertex: position, normal, texture coordinate.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(Vertex, [u8; 32]);

impl Vertex {
    fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Triangles,
    TriangleStrip,
}

/// Index range drawn with its own (optional) material.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPart {
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    pub primitive: PrimitiveType,
    parts: Vec<MeshPart>,
}

impl Mesh {
    /// Quad from four corners given in strip order.
    pub fn create_quad(p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3) -> Self {
        let normal = (p2 - p1).cross(p3 - p1).normalize_or_zero();
        let vertices = vec![
            Vertex::new(p1, normal, [0.0, 1.0]),
            Vertex::new(p2, normal, [0.0, 0.0]),
            Vertex::new(p3, normal, [1.0, 1.0]),
            Vertex::new(p4, normal, [1.0, 0.0]),
        ];
        Self {
            vertices,
            primitive: PrimitiveType::TriangleStrip,
            parts: Vec::new(),
        }
    }

    /// Quad covering the whole viewport in clip space.
    pub fn create_quad_fullscreen() -> Self {
        Self::create_quad(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        )
    }

    /// Axis-aligned box centered on the origin, one part with 36 indices.
    pub fn create_box(half_extents: Vec3) -> Self {
        let h = half_extents;
        // (normal, tangent u, tangent v) per face
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u32;
            for (su, sv, uv) in [
                (-1.0, -1.0, [0.0, 1.0]),
                (1.0, -1.0, [1.0, 1.0]),
                (1.0, 1.0, [1.0, 0.0]),
                (-1.0, 1.0, [0.0, 0.0]),
            ] {
                let p = (normal + u * su + v * sv) * h;
                vertices.push(Vertex::new(p, normal, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self {
            vertices,
            primitive: PrimitiveType::Triangles,
            parts: vec![MeshPart { indices }],
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Raw vertex buffer contents.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Local-space bounding box as (min, max).
    pub fn bounding_box(&self) -> (Vec3, Vec3) {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for v in &self.vertices {
            let p = Vec3::from(v.position);
            min = min.min(p);
            max = max.max(p);
        }
        if self.vertices.is_empty() {
            (Vec3::ZERO, Vec3::ZERO)
        } else {
            (min, max)
        }
    }

    /// Local-space bounding sphere enclosing the bounding box.
    pub fn bounding_sphere(&self) -> (Vec3, f32) {
        let (min, max) = self.bounding_box();
        let center = (min + max) * 0.5;
        (center, (max - center).length())
    }
}

/// A mesh plus its material and optional per-part materials.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub mesh: Mesh,
    material: Option<Material>,
    part_materials: Vec<Option<Material>>,
}

impl Model {
    pub fn new(mesh: Mesh) -> Self {
        let parts = mesh.part_count();
        Self {
            mesh,
            material: None,
            part_materials: vec![None; parts],
        }
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = Some(material);
    }

    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        self.material.as_mut()
    }

    pub fn mesh_part_count(&self) -> usize {
        self.part_materials.len()
    }

    pub fn has_part_material(&self, index: usize) -> bool {
        matches!(self.part_materials.get(index), Some(Some(_)))
    }

    pub fn set_part_material(&mut self, index: usize, material: Material) {
        if let Some(slot) = self.part_materials.get_mut(index) {
            *slot = Some(material);
        }
    }

    pub fn part_material_mut(&mut self, index: usize) -> Option<&mut Material> {
        self.part_materials.get_mut(index).and_then(Option::as_mut)
    }

    /// Builds the draw command for this model, resolving every parameter.
    ///
    /// Parameters the resolver cannot satisfy are left out of the command.
    pub fn draw_command<F>(&self, label: &str, resolve: F) -> DrawCommand
    where
        F: Fn(&MaterialParameter) -> Option<ParameterValue>,
    {
        let (vertex_shader, fragment_shader, parameters) = match &self.material {
            Some(material) => (
                material.vertex_shader.clone(),
                material.fragment_shader.clone(),
                material
                    .parameters()
                    .filter_map(|(name, p)| resolve(p).map(|v| (name.clone(), v)))
                    .collect(),
            ),
            None => (String::new(), String::new(), Vec::new()),
        };
        DrawCommand::Model {
            label: label.to_string(),
            vertex_shader,
            fragment_shader,
            vertex_bytes: self.mesh.vertex_bytes().len(),
            parameters,
        }
    }
}
