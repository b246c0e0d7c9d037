//! Screen-space sprites
//!
//! Rectangles in pixels plus a batch that collects textured quads drawn from
//! one texture atlas (gamepad skin, splash logo).

use glam::Vec4;

use super::DrawCommand;

/// Axis-aligned rectangle in pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centered on a point.
    pub fn centered(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(cx - width * 0.5, cy - height * 0.5, width, height)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

/// One textured quad: where it lands on screen and which atlas region it samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub dst: Rect,
    pub src: Rect,
    pub color: Vec4,
}

/// Collects sprites sharing a texture, then emits them as one draw command.
#[derive(Debug, Clone)]
pub struct SpriteBatch {
    texture: String,
    sprites: Vec<Sprite>,
}

impl SpriteBatch {
    pub fn new(texture: &str) -> Self {
        Self {
            texture: texture.to_string(),
            sprites: Vec::new(),
        }
    }

    pub fn draw(&mut self, dst: Rect, src: Rect, color: Vec4) {
        self.sprites.push(Sprite { dst, src, color });
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn finish(self) -> DrawCommand {
        DrawCommand::Sprites {
            texture: self.texture,
            sprites: self.sprites,
        }
    }
}
