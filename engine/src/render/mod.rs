//! Render Module
//!
//! Frames are described as a `DrawList` of commands and handed to a
//! `Renderer`. The headless renderer keeps counters and logs each frame; a GPU
//! backend would implement the same trait.
//!
//! # Example
//!
//! ```ignore
//! use gameplay_samples_engine::render::{DrawCommand, DrawList, HeadlessRenderer, Renderer};
//! use glam::Vec4;
//!
//! let mut frame = DrawList::new();
//! frame.push(DrawCommand::Clear { color: Vec4::ONE, depth: 1.0 });
//!
//! let mut renderer = HeadlessRenderer::new();
//! renderer.submit(&frame);
//! assert_eq!(renderer.frames_submitted(), 1);
//! ```

pub mod mesh;
pub mod sprite;

pub use mesh::{Mesh, MeshPart, Model, PrimitiveType, Vertex};
pub use sprite::{Rect, Sprite, SpriteBatch};

use glam::{Vec3, Vec4};

use crate::physics::WorldShape;
use crate::scene::material::ParameterValue;

// =============================================================================
// Debug drawing
// =============================================================================

/// Debug overlay selected with the debug key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugDrawMode {
    #[default]
    Off,
    /// Collision shapes from the physics world
    Physics,
    /// Model bounding boxes
    Boxes,
    /// Model bounding spheres
    Spheres,
}

impl DebugDrawMode {
    /// Next mode in the cycle Off -> Physics -> Boxes -> Spheres -> Off.
    pub fn next(self) -> Self {
        match self {
            DebugDrawMode::Off => DebugDrawMode::Physics,
            DebugDrawMode::Physics => DebugDrawMode::Boxes,
            DebugDrawMode::Boxes => DebugDrawMode::Spheres,
            DebugDrawMode::Spheres => DebugDrawMode::Off,
        }
    }
}

// =============================================================================
// Draw commands
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear color and depth
    Clear { color: Vec4, depth: f32 },
    /// One model with its fully resolved material parameters
    Model {
        label: String,
        vertex_shader: String,
        fragment_shader: String,
        vertex_bytes: usize,
        parameters: Vec<(String, ParameterValue)>,
    },
    /// Textured screen-space quads from one atlas
    Sprites {
        texture: String,
        sprites: Vec<Sprite>,
    },
    Text {
        font: String,
        text: String,
        x: f32,
        y: f32,
        color: Vec4,
        size: u32,
    },
    DebugShapes(Vec<WorldShape>),
    /// World-space (min, max) boxes
    DebugBoxes(Vec<(Vec3, Vec3)>),
    /// World-space (center, radius) spheres
    DebugSpheres(Vec<(Vec3, f32)>),
}

/// Ordered commands for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Labels of the model commands, in draw order.
    pub fn model_labels(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Model { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Resolved value of a parameter on the first model with this label.
    pub fn model_parameter(&self, label: &str, name: &str) -> Option<&ParameterValue> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::Model {
                label: l,
                parameters,
                ..
            } if l == label => parameters.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        })
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Consumes finished frames.
pub trait Renderer {
    fn submit(&mut self, frame: &DrawList);

    fn frames_submitted(&self) -> u64;
}

/// Renderer for runs without a GPU: counts frames and logs their shape.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    frames: u64,
    commands: u64,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total commands seen across all frames.
    pub fn commands_submitted(&self) -> u64 {
        self.commands
    }
}

impl Renderer for HeadlessRenderer {
    fn submit(&mut self, frame: &DrawList) {
        self.frames += 1;
        self.commands += frame.len() as u64;
        log::trace!(
            "[Render] frame {}: {} commands, models {:?}",
            self.frames,
            frame.len(),
            frame.model_labels()
        );
    }

    fn frames_submitted(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_mode_cycles_through_all_modes() {
        let mut mode = DebugDrawMode::default();
        let mut seen = vec![mode];
        for _ in 0..4 {
            mode = mode.next();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                DebugDrawMode::Off,
                DebugDrawMode::Physics,
                DebugDrawMode::Boxes,
                DebugDrawMode::Spheres,
                DebugDrawMode::Off,
            ]
        );
    }

    #[test]
    fn test_headless_renderer_counts() {
        let mut frame = DrawList::new();
        frame.push(DrawCommand::Clear {
            color: Vec4::ONE,
            depth: 1.0,
        });
        frame.push(DrawCommand::DebugBoxes(Vec::new()));

        let mut renderer = HeadlessRenderer::new();
        renderer.submit(&frame);
        renderer.submit(&frame);
        assert_eq!(renderer.frames_submitted(), 2);
        assert_eq!(renderer.commands_submitted(), 4);
    }
}
