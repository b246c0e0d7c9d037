//! Physics Character
//!
//! Kinematic character controller state: forward/right velocities relative to
//! the character's own facing, a vertical velocity for jumps and falls, and a
//! registry of named movement animations. Each animation carries a move speed
//! that scales the requested velocities while it is the current animation, so
//! `idle` (speed 0) holds the character in place and `walk` moves it.
//!
//! The per-step integration lives in `PhysicsWorld::step`, which owns the
//! collision queries.

use std::collections::HashMap;

use crate::animation::{AnimationController, AnimationEvent, AnimationEventKind, RepeatCount};
use crate::error::EngineError;
use crate::scene::NodeId;

/// How a character animation plays when started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationFlags {
    /// Play once and stop
    Stop,
    /// Play once, then resume the animation that was current before
    Resume,
    /// Loop until another animation replaces it
    Repeat,
}

#[derive(Debug, Clone, PartialEq)]
struct CharacterAnimation {
    animation: String,
    clip: String,
    move_speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct Playing {
    name: String,
    flags: AnimationFlags,
    speed: f32,
}

#[derive(Debug, Clone)]
pub struct PhysicsCharacter {
    node: NodeId,
    forward_velocity: f32,
    right_velocity: f32,
    pub(crate) vertical_velocity: f32,
    pub(crate) grounded: bool,
    max_step_height: f32,
    /// Gravity magnitude used for jump impulses (m/s^2)
    gravity: f32,
    animations: HashMap<String, CharacterAnimation>,
    current: Option<Playing>,
    resume: Option<Playing>,
}

impl PhysicsCharacter {
    pub fn new(node: NodeId, gravity: f32) -> Self {
        Self {
            node,
            forward_velocity: 0.0,
            right_velocity: 0.0,
            vertical_velocity: 0.0,
            grounded: true,
            max_step_height: 0.1,
            gravity,
            animations: HashMap::new(),
            current: None,
            resume: None,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn forward_velocity(&self) -> f32 {
        self.forward_velocity
    }

    pub fn set_forward_velocity(&mut self, velocity: f32) {
        self.forward_velocity = velocity;
    }

    pub fn right_velocity(&self) -> f32 {
        self.right_velocity
    }

    pub fn set_right_velocity(&mut self, velocity: f32) {
        self.right_velocity = velocity;
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn max_step_height(&self) -> f32 {
        self.max_step_height
    }

    pub fn set_max_step_height(&mut self, height: f32) {
        self.max_step_height = height.max(0.0);
    }

    /// Launches the character so its apex is `height` above the take-off point.
    /// Ignored while airborne.
    pub fn jump(&mut self, height: f32) {
        if !self.grounded {
            return;
        }
        self.vertical_velocity = (2.0 * self.gravity * height.max(0.0)).sqrt();
        self.grounded = false;
    }

    /// Move speed of the current animation, 0 when nothing is playing.
    pub fn move_speed(&self) -> f32 {
        self.current
            .as_ref()
            .and_then(|p| self.animations.get(&p.name))
            .map_or(0.0, |a| a.move_speed)
    }

    /// Name of the current character animation.
    pub fn current_animation(&self) -> Option<&str> {
        self.current.as_ref().map(|p| p.name.as_str())
    }

    /// Registers `clip` of `animation` under `name` with the given move speed.
    pub fn add_animation(
        &mut self,
        controller: &AnimationController,
        name: &str,
        animation: &str,
        clip: &str,
        move_speed: f32,
    ) -> Result<(), EngineError> {
        controller.clip(animation, clip)?;
        self.animations.insert(
            name.to_string(),
            CharacterAnimation {
                animation: animation.to_string(),
                clip: clip.to_string(),
                move_speed,
            },
        );
        Ok(())
    }

    pub fn is_animation_playing(&self, controller: &AnimationController, name: &str) -> bool {
        self.animations
            .get(name)
            .is_some_and(|a| controller.is_playing(&a.animation, &a.clip))
    }

    /// Makes `name` the current animation, blending from the previous one.
    ///
    /// Replaying the current animation while it still plays only updates its speed.
    pub fn play(
        &mut self,
        controller: &mut AnimationController,
        name: &str,
        flags: AnimationFlags,
        speed: f32,
        blend_ms: f32,
    ) -> Result<(), EngineError> {
        let next = self
            .animations
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::ClipNotFound(name.to_string()))?;

        if let Some(current) = &mut self.current {
            if current.name == name && controller.is_playing(&next.animation, &next.clip) {
                current.speed = speed;
                current.flags = flags;
                controller.clip_mut(&next.animation, &next.clip)?.set_speed(speed);
                return Ok(());
            }
        }

        let clip = controller.clip_mut(&next.animation, &next.clip)?;
        clip.set_speed(speed);
        clip.set_repeat(match flags {
            AnimationFlags::Repeat => RepeatCount::Indefinite,
            AnimationFlags::Stop | AnimationFlags::Resume => RepeatCount::Count(1.0),
        });

        let previous = self.current.take();
        let previous_anim = previous
            .as_ref()
            .and_then(|p| self.animations.get(&p.name))
            .cloned();

        match previous_anim {
            Some(prev)
                if prev.animation == next.animation
                    && controller.is_playing(&prev.animation, &prev.clip)
                    && blend_ms > 0.0 =>
            {
                controller.crossfade(&next.animation, &prev.clip, &next.clip, blend_ms)?;
            }
            Some(prev) => {
                if prev.clip != next.clip || prev.animation != next.animation {
                    controller.stop(&prev.animation, &prev.clip)?;
                }
                controller.play(&next.animation, &next.clip)?;
            }
            None => controller.play(&next.animation, &next.clip)?,
        }

        self.resume = match flags {
            AnimationFlags::Resume => previous.filter(|p| p.name != name),
            _ => None,
        };
        self.current = Some(Playing {
            name: name.to_string(),
            flags,
            speed,
        });
        log::debug!("[Character] play '{name}' ({flags:?}, speed {speed})");
        Ok(())
    }

    /// Reacts to a clip finishing: `Resume` animations hand back to the
    /// animation they interrupted, `Stop` animations leave nothing current.
    pub fn handle_animation_event(
        &mut self,
        controller: &mut AnimationController,
        event: &AnimationEvent,
        blend_ms: f32,
    ) -> Result<(), EngineError> {
        if event.kind != AnimationEventKind::End {
            return Ok(());
        }
        let Some(current) = &self.current else {
            return Ok(());
        };
        let finished = self
            .animations
            .get(&current.name)
            .is_some_and(|a| a.animation == event.animation && a.clip == event.clip);
        if !finished {
            return Ok(());
        }

        match (current.flags, self.resume.take()) {
            (AnimationFlags::Resume, Some(previous)) => {
                self.current = None;
                self.play(controller, &previous.name, previous.flags, previous.speed, blend_ms)
            }
            _ => {
                self.current = None;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animation, AnimationClip};

    fn setup() -> (PhysicsCharacter, AnimationController) {
        let mut anim = Animation::new("movements");
        anim.add_clip(AnimationClip::new("idle", 0, 1000));
        anim.add_clip(AnimationClip::new("walk", 1000, 2000));
        anim.add_clip(AnimationClip::new("jump", 2000, 3000));
        let mut controller = AnimationController::new();
        controller.add_animation(anim);

        let mut character = PhysicsCharacter::new(NodeId(0), 9.81);
        character.add_animation(&controller, "idle", "movements", "idle", 0.0).unwrap();
        character.add_animation(&controller, "walk", "movements", "walk", 7.5).unwrap();
        character.add_animation(&controller, "jump", "movements", "jump", 0.0).unwrap();
        (character, controller)
    }

    #[test]
    fn test_add_animation_rejects_unknown_clip() {
        let (mut character, controller) = setup();
        let err = character.add_animation(&controller, "swim", "movements", "swim", 1.0);
        assert!(matches!(err, Err(EngineError::ClipNotFound(_))));
    }

    #[test]
    fn test_play_sets_move_speed() {
        let (mut character, mut controller) = setup();
        assert_eq!(character.move_speed(), 0.0);
        character
            .play(&mut controller, "walk", AnimationFlags::Repeat, 1.0, 0.0)
            .unwrap();
        assert_eq!(character.move_speed(), 7.5);
        assert!(character.is_animation_playing(&controller, "walk"));
        assert_eq!(
            controller.clip("movements", "walk").unwrap().repeat(),
            RepeatCount::Indefinite
        );
    }

    #[test]
    fn test_replay_current_only_changes_speed() {
        let (mut character, mut controller) = setup();
        character
            .play(&mut controller, "walk", AnimationFlags::Repeat, 1.0, 300.0)
            .unwrap();
        controller.update(400.0);
        character
            .play(&mut controller, "walk", AnimationFlags::Repeat, -1.0, 300.0)
            .unwrap();
        let walk = controller.clip("movements", "walk").unwrap();
        assert_eq!(walk.speed(), -1.0);
        assert!(walk.local_time() < 1000.0);
    }

    #[test]
    fn test_resume_returns_to_previous_animation() {
        let (mut character, mut controller) = setup();
        character
            .play(&mut controller, "idle", AnimationFlags::Repeat, 1.0, 0.0)
            .unwrap();
        character
            .play(&mut controller, "jump", AnimationFlags::Resume, 1.0, 0.0)
            .unwrap();
        assert!(!character.is_animation_playing(&controller, "idle"));

        let events = controller.update(1000.0);
        for event in &events {
            character
                .handle_animation_event(&mut controller, event, 0.0)
                .unwrap();
        }
        assert_eq!(character.current_animation(), Some("idle"));
        assert!(character.is_animation_playing(&controller, "idle"));
        assert!(!character.is_animation_playing(&controller, "jump"));
    }

    #[test]
    fn test_jump_only_from_ground() {
        let (mut character, _) = setup();
        character.jump(2.0);
        assert!((character.vertical_velocity() - (2.0_f32 * 9.81 * 2.0).sqrt()).abs() < 1e-5);
        assert!(!character.is_grounded());

        character.vertical_velocity = 1.0;
        character.jump(2.0);
        assert_eq!(character.vertical_velocity(), 1.0);
    }
}
