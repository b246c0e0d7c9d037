//! Animation Module
//!
//! Named clips over a shared animation timeline, loaded from a clip
//! description file. Clips advance in milliseconds, can repeat, play in
//! reverse with a negative speed, cross-fade into each other and fire
//! listener events at fixed offsets into the clip.
//!
//! Clip file layout:
//!
//! ```json
//! {
//!   "animation": "movements",
//!   "clips": [
//!     { "id": "idle", "begin": 0, "end": 2000, "repeat": "indefinite" },
//!     { "id": "jump", "begin": 3700, "end": 4900, "repeat": 1 }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::EngineError;
use crate::resources::Resources;

// =============================================================================
// Clip description file
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RepeatCount {
    #[default]
    Indefinite,
    Count(f32),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RepeatDesc {
    Count(f32),
    Keyword(String),
}

impl<'de> Deserialize<'de> for RepeatCount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RepeatDesc::deserialize(deserializer)? {
            RepeatDesc::Count(n) if n > 0.0 => Ok(RepeatCount::Count(n)),
            RepeatDesc::Count(n) => Err(serde::de::Error::custom(format!(
                "repeat count must be positive, got {n}"
            ))),
            RepeatDesc::Keyword(k) if k == "indefinite" => Ok(RepeatCount::Indefinite),
            RepeatDesc::Keyword(k) => Err(serde::de::Error::custom(format!(
                "unknown repeat keyword '{k}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClipDesc {
    pub id: String,
    /// Start of the clip on the animation timeline (ms)
    pub begin: u64,
    /// End of the clip on the animation timeline (ms)
    pub end: u64,
    #[serde(default)]
    pub repeat: RepeatCount,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_speed() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClipFile {
    pub animation: String,
    pub clips: Vec<ClipDesc>,
}

// =============================================================================
// Events
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationEventKind {
    /// A listener offset was reached
    Listener,
    /// The clip finished its last repetition
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationEvent {
    pub animation: String,
    pub clip: String,
    pub kind: AnimationEventKind,
}

// =============================================================================
// AnimationClip
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    duration_ms: f32,
    elapsed_ms: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    id: String,
    begin_ms: u64,
    end_ms: u64,
    repeat: RepeatCount,
    speed: f32,
    playing: bool,
    /// Distance travelled through the clip since play, in clip milliseconds
    travelled_ms: f32,
    blend_weight: f32,
    fade: Option<Fade>,
    /// Listener offsets from the clip start (ms)
    listeners: Vec<u64>,
}

impl AnimationClip {
    pub fn new(id: &str, begin_ms: u64, end_ms: u64) -> Self {
        Self {
            id: id.to_string(),
            begin_ms,
            end_ms: end_ms.max(begin_ms),
            repeat: RepeatCount::Count(1.0),
            speed: 1.0,
            playing: false,
            travelled_ms: 0.0,
            blend_weight: 1.0,
            fade: None,
            listeners: Vec::new(),
        }
    }

    fn from_desc(desc: &ClipDesc) -> Self {
        let mut clip = Self::new(&desc.id, desc.begin, desc.end);
        clip.repeat = desc.repeat;
        clip.speed = desc.speed;
        clip
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Length of one repetition in milliseconds.
    pub fn duration(&self) -> u64 {
        self.end_ms - self.begin_ms
    }

    /// Total playing time across all repetitions (ms).
    pub fn active_duration(&self) -> f32 {
        match self.repeat {
            RepeatCount::Indefinite => f32::INFINITY,
            RepeatCount::Count(n) => self.duration() as f32 * n,
        }
    }

    pub fn repeat(&self) -> RepeatCount {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: RepeatCount) {
        self.repeat = repeat;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn blend_weight(&self) -> f32 {
        self.blend_weight
    }

    /// Fires a `Listener` event each time playback reaches `offset_ms` into the clip.
    pub fn add_listener(&mut self, offset_ms: u64) {
        self.listeners.push(offset_ms.min(self.duration()));
    }

    /// Current position within the clip (ms from clip start), honoring direction.
    pub fn local_time(&self) -> f32 {
        let duration = self.duration() as f32;
        if duration <= 0.0 {
            return 0.0;
        }
        let mut local = self.travelled_ms % duration;
        if self.travelled_ms > 0.0 && local == 0.0 {
            local = duration;
        }
        if self.speed < 0.0 { duration - local } else { local }
    }

    pub fn play(&mut self) {
        self.playing = true;
        self.travelled_ms = 0.0;
        self.blend_weight = 1.0;
        self.fade = None;
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.fade = None;
    }

    fn fade_to(&mut self, from: f32, to: f32, duration_ms: f32) {
        self.blend_weight = from;
        self.fade = Some(Fade {
            from,
            to,
            duration_ms,
            elapsed_ms: 0.0,
        });
    }

    /// Advances playback, appending listener and end events.
    fn update(&mut self, dt_ms: f32, events: &mut Vec<AnimationEventKind>) {
        if !self.playing {
            return;
        }

        if let Some(fade) = &mut self.fade {
            fade.elapsed_ms += dt_ms;
            let t = (fade.elapsed_ms / fade.duration_ms).min(1.0);
            self.blend_weight = fade.from + (fade.to - fade.from) * t;
            if t >= 1.0 {
                let faded_out = fade.to <= 0.0;
                self.fade = None;
                if faded_out {
                    self.playing = false;
                    return;
                }
            }
        }

        let duration = self.duration() as f32;
        let old = self.travelled_ms;
        let new = (old + dt_ms * self.speed.abs()).min(self.active_duration());
        self.travelled_ms = new;

        if duration > 0.0 {
            for &offset in &self.listeners {
                let at = if self.speed < 0.0 {
                    duration - offset as f32
                } else {
                    offset as f32
                };
                let before = ((old - at) / duration).floor();
                let after = ((new - at) / duration).floor();
                for _ in 0..(after - before).max(0.0) as u32 {
                    events.push(AnimationEventKind::Listener);
                }
            }
        }

        if new >= self.active_duration() {
            self.playing = false;
            events.push(AnimationEventKind::End);
        }
    }
}

// =============================================================================
// Animation / AnimationController
// =============================================================================

/// A set of clips cut from one animation timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    id: String,
    clips: BTreeMap<String, AnimationClip>,
}

impl Animation {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            clips: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn add_clip(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.id.clone(), clip);
    }

    pub fn clip(&self, id: &str) -> Option<&AnimationClip> {
        self.clips.get(id)
    }

    pub fn clip_mut(&mut self, id: &str) -> Option<&mut AnimationClip> {
        self.clips.get_mut(id)
    }

    pub fn clip_ids(&self) -> impl Iterator<Item = &str> {
        self.clips.keys().map(String::as_str)
    }
}

/// Owns every animation and advances the playing clips each frame.
#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    animations: BTreeMap<String, Animation>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_animation(&mut self, animation: Animation) {
        self.animations.insert(animation.id.clone(), animation);
    }

    /// Loads a clip file and registers (or extends) the animation it names.
    /// Returns the animation id.
    pub fn create_clips(
        &mut self,
        resources: &Resources,
        path: &str,
    ) -> Result<String, EngineError> {
        let file: ClipFile = resources.load_json(path)?;
        let animation = self
            .animations
            .entry(file.animation.clone())
            .or_insert_with(|| Animation::new(&file.animation));
        for desc in &file.clips {
            if desc.end < desc.begin {
                return Err(EngineError::InvalidScene(format!(
                    "clip '{}' ends before it begins",
                    desc.id
                )));
            }
            animation.add_clip(AnimationClip::from_desc(desc));
        }
        log::info!(
            "[Animation] loaded {} clips into '{}' from {path}",
            file.clips.len(),
            file.animation
        );
        Ok(file.animation)
    }

    pub fn animation(&self, id: &str) -> Option<&Animation> {
        self.animations.get(id)
    }

    pub fn clip(&self, animation: &str, clip: &str) -> Result<&AnimationClip, EngineError> {
        self.animations
            .get(animation)
            .and_then(|a| a.clip(clip))
            .ok_or_else(|| EngineError::ClipNotFound(format!("{animation}/{clip}")))
    }

    pub fn clip_mut(
        &mut self,
        animation: &str,
        clip: &str,
    ) -> Result<&mut AnimationClip, EngineError> {
        self.animations
            .get_mut(animation)
            .and_then(|a| a.clip_mut(clip))
            .ok_or_else(|| EngineError::ClipNotFound(format!("{animation}/{clip}")))
    }

    pub fn is_playing(&self, animation: &str, clip: &str) -> bool {
        self.clip(animation, clip).is_ok_and(AnimationClip::is_playing)
    }

    pub fn play(&mut self, animation: &str, clip: &str) -> Result<(), EngineError> {
        self.clip_mut(animation, clip)?.play();
        Ok(())
    }

    pub fn stop(&mut self, animation: &str, clip: &str) -> Result<(), EngineError> {
        self.clip_mut(animation, clip)?.stop();
        Ok(())
    }

    /// Starts `to` and blends it in while `from` blends out and then stops.
    pub fn crossfade(
        &mut self,
        animation: &str,
        from: &str,
        to: &str,
        duration_ms: f32,
    ) -> Result<(), EngineError> {
        // Validate both before touching either
        self.clip(animation, from)?;
        self.clip(animation, to)?;

        if duration_ms <= 0.0 || from == to {
            self.clip_mut(animation, from)?.stop();
            self.clip_mut(animation, to)?.play();
            return Ok(());
        }

        let outgoing = self.clip_mut(animation, from)?;
        if outgoing.is_playing() {
            let weight = outgoing.blend_weight();
            outgoing.fade_to(weight, 0.0, duration_ms);
        }
        let incoming = self.clip_mut(animation, to)?;
        incoming.play();
        incoming.fade_to(0.0, 1.0, duration_ms);
        Ok(())
    }

    /// Advances every playing clip by `dt_ms` milliseconds.
    pub fn update(&mut self, dt_ms: f32) -> Vec<AnimationEvent> {
        let mut events = Vec::new();
        let mut kinds = Vec::new();
        for animation in self.animations.values_mut() {
            for clip in animation.clips.values_mut() {
                kinds.clear();
                clip.update(dt_ms, &mut kinds);
                events.extend(kinds.iter().map(|&kind| AnimationEvent {
                    animation: animation.id.clone(),
                    clip: clip.id.clone(),
                    kind,
                }));
            }
        }
        events
    }

    pub fn clear(&mut self) {
        self.animations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> AnimationController {
        let mut anim = Animation::new("movements");
        let mut idle = AnimationClip::new("idle", 0, 1000);
        idle.set_repeat(RepeatCount::Indefinite);
        anim.add_clip(idle);
        let mut jump = AnimationClip::new("jump", 1000, 2000);
        jump.add_listener(300);
        anim.add_clip(jump);
        let mut controller = AnimationController::new();
        controller.add_animation(anim);
        controller
    }

    #[test]
    fn test_single_repeat_clip_ends() {
        let mut c = controller();
        c.play("movements", "jump").unwrap();
        let events = c.update(600.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, AnimationEventKind::Listener);
        assert!(c.is_playing("movements", "jump"));

        let events = c.update(500.0);
        assert_eq!(events.last().unwrap().kind, AnimationEventKind::End);
        assert!(!c.is_playing("movements", "jump"));
    }

    #[test]
    fn test_listener_fires_once_per_loop() {
        let mut c = controller();
        c.clip_mut("movements", "idle").unwrap().add_listener(500);
        c.play("movements", "idle").unwrap();
        let events = c.update(2600.0);
        let listeners = events
            .iter()
            .filter(|e| e.kind == AnimationEventKind::Listener)
            .count();
        assert_eq!(listeners, 3);
        assert!(c.is_playing("movements", "idle"));
    }

    #[test]
    fn test_reverse_playback_local_time() {
        let mut c = controller();
        let clip = c.clip_mut("movements", "idle").unwrap();
        clip.set_speed(-1.0);
        clip.play();
        c.update(250.0);
        let local = c.clip("movements", "idle").unwrap().local_time();
        assert!((local - 750.0).abs() < 1e-3);
    }

    #[test]
    fn test_crossfade_blends_and_stops_outgoing() {
        let mut c = controller();
        c.play("movements", "idle").unwrap();
        c.crossfade("movements", "idle", "jump", 300.0).unwrap();
        c.update(150.0);
        let idle = c.clip("movements", "idle").unwrap();
        let jump = c.clip("movements", "jump").unwrap();
        assert!((idle.blend_weight() - 0.5).abs() < 1e-4);
        assert!((jump.blend_weight() - 0.5).abs() < 1e-4);

        c.update(200.0);
        assert!(!c.is_playing("movements", "idle"));
        assert!(c.is_playing("movements", "jump"));
        assert_eq!(c.clip("movements", "jump").unwrap().blend_weight(), 1.0);
    }

    #[test]
    fn test_unknown_clip_is_an_error() {
        let mut c = controller();
        assert!(matches!(c.play("movements", "swim"), Err(EngineError::ClipNotFound(_))));
        assert!(c.crossfade("movements", "idle", "swim", 100.0).is_err());
        // Failed crossfade leaves nothing playing
        assert!(!c.is_playing("movements", "idle"));
    }

    #[test]
    fn test_repeat_count_parsing() {
        let file: ClipFile = serde_json::from_str(
            r#"{ "animation": "a", "clips": [
                { "id": "x", "begin": 0, "end": 10, "repeat": "indefinite" },
                { "id": "y", "begin": 0, "end": 10, "repeat": 2 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(file.clips[0].repeat, RepeatCount::Indefinite);
        assert_eq!(file.clips[1].repeat, RepeatCount::Count(2.0));
        assert_eq!(file.clips[1].speed, 1.0);

        let bad = serde_json::from_str::<ClipFile>(
            r#"{ "animation": "a", "clips": [ { "id": "x", "begin": 0, "end": 10, "repeat": "forever" } ] }"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_create_clips_from_resource_file() {
        let resources = Resources::new(env!("CARGO_MANIFEST_DIR"), false);
        let mut c = AnimationController::new();
        let name = c.create_clips(&resources, "res/boy.animation.json").unwrap();
        assert_eq!(name, "movements");
        let ids: Vec<&str> = c.animation("movements").unwrap().clip_ids().collect();
        for id in ["idle", "walk", "run", "jump"] {
            assert!(ids.contains(&id), "missing clip {id}");
        }
    }
}
