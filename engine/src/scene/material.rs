//! Materials and Material Parameters
//!
//! A material names its shader pair and holds named uniform parameters. A
//! parameter either carries a value or is bound to live scene state, in which
//! case it is resolved against the scene every time the model is drawn.

use std::collections::BTreeMap;

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::NodeId;
use crate::error::EngineError;
use crate::resources::Resources;

/// A texture reference. Pixel data is never decoded by the headless core.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub path: String,
    pub mipmap: bool,
    /// Repeat (true) or clamp (false) on the U and V axes
    pub wrap: (bool, bool),
}

impl Texture {
    pub fn create(resources: &Resources, path: &str, mipmap: bool) -> Result<Self, EngineError> {
        resources.require(path)?;
        Ok(Self {
            path: path.to_string(),
            mipmap,
            wrap: (false, false),
        })
    }

    pub fn set_wrap_mode(&mut self, wrap_u: bool, wrap_v: bool) {
        self.wrap = (wrap_u, wrap_v);
    }
}

/// Concrete uniform value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    Texture(Texture),
}

/// Live scene state a parameter can follow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding {
    /// Forward vector of a node, in the active camera's view space
    NodeForwardView(NodeId),
    /// Color of the light attached to a node
    LightColor(NodeId),
    /// The scene's ambient color
    SceneAmbientColor,
    /// World-view-projection of a node under the active camera
    NodeWorldViewProjection(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaterialParameter {
    Value(ParameterValue),
    Bound(Binding),
}

/// Shader pair plus its named parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub vertex_shader: String,
    pub fragment_shader: String,
    parameters: BTreeMap<String, MaterialParameter>,
}

impl Material {
    pub fn new(vertex_shader: &str, fragment_shader: &str) -> Self {
        Self {
            vertex_shader: vertex_shader.to_string(),
            fragment_shader: fragment_shader.to_string(),
            parameters: BTreeMap::new(),
        }
    }

    /// Creates a material after resolving both shader files.
    pub fn create(
        resources: &Resources,
        vertex_shader: &str,
        fragment_shader: &str,
    ) -> Result<Self, EngineError> {
        resources.require(vertex_shader)?;
        resources.require(fragment_shader)?;
        Ok(Self::new(vertex_shader, fragment_shader))
    }

    pub fn set_value(&mut self, name: &str, value: ParameterValue) {
        self.parameters
            .insert(name.to_string(), MaterialParameter::Value(value));
    }

    pub fn bind(&mut self, name: &str, binding: Binding) {
        self.parameters
            .insert(name.to_string(), MaterialParameter::Bound(binding));
    }

    pub fn parameter(&self, name: &str) -> Option<&MaterialParameter> {
        self.parameters.get(name)
    }

    /// Current value of a value-carrying parameter.
    pub fn value(&self, name: &str) -> Option<&ParameterValue> {
        match self.parameters.get(name) {
            Some(MaterialParameter::Value(v)) => Some(v),
            _ => None,
        }
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&String, &MaterialParameter)> {
        self.parameters.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_replaces_binding() {
        let mut material = Material::new("a.vsh", "a.fsh");
        material.bind("u_ambientColor", Binding::SceneAmbientColor);
        assert!(material.value("u_ambientColor").is_none());

        material.set_value("u_ambientColor", ParameterValue::Vec3(Vec3::ONE));
        assert_eq!(
            material.value("u_ambientColor"),
            Some(&ParameterValue::Vec3(Vec3::ONE))
        );
    }

    #[test]
    fn test_parameters_iterate_in_name_order() {
        let mut material = Material::new("a.vsh", "a.fsh");
        material.set_value("u_b", ParameterValue::Float(2.0));
        material.set_value("u_a", ParameterValue::Float(1.0));
        let names: Vec<&str> = material.parameters().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["u_a", "u_b"]);
    }
}
