//! Physics World
//!
//! Collision objects bound to scene nodes, ray and sphere-sweep queries, and a
//! kinematic step that moves characters, applies gravity and reports contact
//! changes to listening objects. Object positions are always read from the
//! scene, so moving a node moves its collision shape.
//!
//! Shapes are axis-aligned: node rotation and scale do not affect them.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;

use super::character::PhysicsCharacter;
use super::collision::WorldShape;
use crate::animation::{AnimationController, AnimationEvent};
use crate::error::EngineError;
use crate::scene::{NodeId, Scene};

/// Clearance kept between a character's capsule and the floor when testing
/// horizontal moves, so standing on the ground is not a blocking contact.
const GROUND_SKIN: f32 = 0.05;
/// How far below the feet a grounded character still snaps to the floor.
const GROUND_SNAP: f32 = 0.2;
/// Distance within which two shapes count as touching for contact events.
const CONTACT_MARGIN: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionObjectId(pub(crate) u32);

impl CollisionObjectId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionObjectType {
    /// Static or kinematic body that blocks movement and queries
    RigidBody,
    /// Controlled character with a capsule
    Character,
    /// Query-only volume; ignored by ray tests, sweeps and contacts
    GhostObject,
}

/// Shape in the owning node's space (before the center offset).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
    /// Capsule standing on the Y axis; `height` includes both caps
    Capsule { radius: f32, height: f32 },
}

impl CollisionShape {
    fn placed(&self, center: Vec3) -> WorldShape {
        match *self {
            CollisionShape::Box { half_extents } => WorldShape::Aabb {
                min: center - half_extents,
                max: center + half_extents,
            },
            CollisionShape::Sphere { radius } => WorldShape::Sphere { center, radius },
            CollisionShape::Capsule { radius, height } => {
                let half = (height * 0.5 - radius).max(0.0);
                WorldShape::Capsule {
                    a: center - Vec3::Y * half,
                    b: center + Vec3::Y * half,
                    radius,
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollisionObject {
    pub id: CollisionObjectId,
    pub kind: CollisionObjectType,
    pub shape: CollisionShape,
    /// Shape center relative to the node's world translation
    pub offset: Vec3,
    pub node: NodeId,
    pub mass: f32,
}

/// Result of a ray or sweep query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub object: CollisionObjectId,
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    /// Distance as a fraction of the query length
    pub fraction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEventKind {
    Colliding,
    NotColliding,
}

/// Contact change between a listening object (`object_a`) and another object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub kind: CollisionEventKind,
    pub object_a: CollisionObjectId,
    pub object_b: CollisionObjectId,
    pub contact_point_a: Vec3,
    pub contact_point_b: Vec3,
}

#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    objects: Vec<CollisionObject>,
    characters: BTreeMap<CollisionObjectId, PhysicsCharacter>,
    listeners: BTreeSet<CollisionObjectId>,
    contacts: BTreeSet<(CollisionObjectId, CollisionObjectId)>,
    /// Gravity magnitude along -Y (m/s^2)
    pub gravity: f32,
    next_id: u32,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            characters: BTreeMap::new(),
            listeners: BTreeSet::new(),
            contacts: BTreeSet::new(),
            gravity: 9.81,
            next_id: 0,
        }
    }

    /// Creates a collision object for `node` and records it on the node.
    pub fn attach(
        &mut self,
        scene: &mut Scene,
        node: NodeId,
        kind: CollisionObjectType,
        shape: CollisionShape,
        offset: Vec3,
        mass: f32,
    ) -> CollisionObjectId {
        let id = CollisionObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(CollisionObject {
            id,
            kind,
            shape,
            offset,
            node,
            mass,
        });
        if kind == CollisionObjectType::Character {
            self.characters
                .insert(id, PhysicsCharacter::new(node, self.gravity));
        }
        scene.node_mut(node).collision = Some(id);
        log::debug!(
            "[Physics] attached {kind:?} #{} to '{}'",
            id.0,
            scene.node(node).id()
        );
        id
    }

    pub fn object(&self, id: CollisionObjectId) -> Option<&CollisionObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn objects(&self) -> &[CollisionObject] {
        &self.objects
    }

    pub fn object_type(&self, id: CollisionObjectId) -> Option<CollisionObjectType> {
        self.object(id).map(|o| o.kind)
    }

    pub fn character(&self, id: CollisionObjectId) -> Option<&PhysicsCharacter> {
        self.characters.get(&id)
    }

    pub fn character_mut(
        &mut self,
        id: CollisionObjectId,
    ) -> Result<&mut PhysicsCharacter, EngineError> {
        self.characters
            .get_mut(&id)
            .ok_or(EngineError::UnknownCollisionObject(id.0))
    }

    /// Subscribes `id` to collision events.
    pub fn add_collision_listener(&mut self, id: CollisionObjectId) {
        self.listeners.insert(id);
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.characters.clear();
        self.listeners.clear();
        self.contacts.clear();
    }

    fn shape_of(scene: &Scene, object: &CollisionObject) -> WorldShape {
        object
            .shape
            .placed(scene.translation_world(object.node) + object.offset)
    }

    /// Shapes of every object, for debug drawing.
    pub fn debug_shapes(&self, scene: &Scene) -> Vec<WorldShape> {
        self.objects.iter().map(|o| Self::shape_of(scene, o)).collect()
    }

    fn solid_objects(&self) -> impl Iterator<Item = &CollisionObject> {
        self.objects
            .iter()
            .filter(|o| o.kind != CollisionObjectType::GhostObject)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Closest solid object hit by the ray within `max_distance`.
    ///
    /// Shapes containing the ray origin are not reported.
    pub fn ray_test(
        &self,
        scene: &Scene,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<CollisionObjectId>,
    ) -> Option<HitResult> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }
        self.closest_hit(scene, origin, dir, max_distance, 0.0, |o| Some(o.id) != exclude)
    }

    /// Sweeps `object` (using its bounding sphere) from its current position to
    /// `end` and returns the first solid object it would touch.
    pub fn sweep_test(
        &self,
        scene: &Scene,
        object: CollisionObjectId,
        end: Vec3,
    ) -> Result<Option<HitResult>, EngineError> {
        let moving = self
            .object(object)
            .ok_or(EngineError::UnknownCollisionObject(object.0))?;
        let shape = Self::shape_of(scene, moving);
        let start = shape.center();
        let radius = shape.bounding_radius();
        let delta = end - start;
        let length = delta.length();
        if length <= f32::EPSILON {
            return Ok(None);
        }
        Ok(self.closest_hit(scene, start, delta / length, length, radius, |o| o.id != object))
    }

    fn closest_hit<F>(
        &self,
        scene: &Scene,
        origin: Vec3,
        dir: Vec3,
        max_distance: f32,
        inflate: f32,
        include: F,
    ) -> Option<HitResult>
    where
        F: Fn(&CollisionObject) -> bool,
    {
        let mut best: Option<HitResult> = None;
        for object in self.solid_objects().filter(|o| include(*o)) {
            let shape = Self::shape_of(scene, object);
            let target = if inflate > 0.0 { shape.inflated(inflate) } else { shape };
            if target.contains(origin) {
                continue;
            }
            let Some(t) = target.ray_intersect(origin, dir) else {
                continue;
            };
            if t > max_distance || best.is_some_and(|b| t >= b.distance) {
                continue;
            }
            let center_at_hit = origin + dir * t;
            let surface = shape.closest_point(center_at_hit);
            best = Some(HitResult {
                object: object.id,
                point: if inflate > 0.0 { surface } else { center_at_hit },
                normal: target.normal_at(center_at_hit),
                distance: t,
                fraction: t / max_distance,
            });
        }
        best
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Forwards clip events to every character (resume/stop handling).
    pub fn handle_animation_event(
        &mut self,
        controller: &mut AnimationController,
        event: &AnimationEvent,
        blend_ms: f32,
    ) -> Result<(), EngineError> {
        for character in self.characters.values_mut() {
            character.handle_animation_event(controller, event, blend_ms)?;
        }
        Ok(())
    }

    /// Advances every character by `dt` seconds and returns contact changes
    /// for listening objects.
    pub fn step(&mut self, scene: &mut Scene, dt: f32) -> Vec<CollisionEvent> {
        let ids: Vec<CollisionObjectId> = self.characters.keys().copied().collect();
        for id in ids {
            let Some(mut character) = self.characters.remove(&id) else {
                continue;
            };
            self.move_character(scene, id, &mut character, dt);
            self.characters.insert(id, character);
        }
        self.update_contacts(scene)
    }

    fn move_character(
        &self,
        scene: &mut Scene,
        id: CollisionObjectId,
        character: &mut PhysicsCharacter,
        dt: f32,
    ) {
        let Some(object) = self.object(id) else {
            return;
        };
        let node = object.node;
        let position = scene.translation_world(node);
        let shape = Self::shape_of(scene, object);
        let foot_offset = shape.min_y() - position.y;

        // Horizontal motion in the character's own frame
        let forward = scene.forward_vector_world(node) * Vec3::new(1.0, 0.0, 1.0);
        let forward = forward.normalize_or_zero();
        let right = forward.cross(Vec3::Y);
        let speed = character.move_speed();
        let horizontal = (forward * character.forward_velocity()
            + right * character.right_velocity())
            * speed
            * dt;

        let mut moved = Vec3::ZERO;
        if horizontal.length_squared() > 0.0 {
            let lifted = shape.translated(Vec3::Y * GROUND_SKIN);
            if !self.overlaps_any(scene, id, &lifted.translated(horizontal)) {
                moved = horizontal;
            } else if character.max_step_height() > 0.0 {
                let step = Vec3::Y * character.max_step_height();
                if !self.overlaps_any(scene, id, &lifted.translated(horizontal + step)) {
                    moved = horizontal + step;
                }
            }
        }

        // Vertical motion against the ground below the feet
        let ground_ray_origin = position + moved + Vec3::Y * (foot_offset + 0.5);
        let mut new_y = position.y + moved.y;
        if character.grounded && character.vertical_velocity <= 0.0 {
            let reach = 0.5 + moved.y + GROUND_SNAP;
            match self.ray_test(scene, ground_ray_origin, Vec3::NEG_Y, reach, Some(id)) {
                Some(hit) => {
                    new_y = hit.point.y - foot_offset;
                    character.vertical_velocity = 0.0;
                }
                None => character.grounded = false,
            }
        } else {
            character.vertical_velocity -= self.gravity * dt;
            let fall = character.vertical_velocity * dt;
            new_y += fall;
            let reach = 0.5 + moved.y + (-fall).max(0.0);
            if character.vertical_velocity <= 0.0 {
                let hit = self.ray_test(scene, ground_ray_origin, Vec3::NEG_Y, reach, Some(id));
                if let Some(hit) = hit {
                    let floor = hit.point.y - foot_offset;
                    if new_y <= floor {
                        new_y = floor;
                        character.vertical_velocity = 0.0;
                        character.grounded = true;
                    }
                }
            }
        }

        let target = Vec3::new(position.x + moved.x, new_y, position.z + moved.z);
        let delta = target - position;
        if delta != Vec3::ZERO {
            scene.translate(node, delta);
        }
    }

    fn overlaps_any(&self, scene: &Scene, id: CollisionObjectId, shape: &WorldShape) -> bool {
        self.solid_objects()
            .filter(|o| o.id != id)
            .any(|o| Self::separation(shape, &Self::shape_of(scene, o)).0 <= 0.0)
    }

    /// Signed gap between two shapes and the closest points (a, b).
    fn separation(a: &WorldShape, b: &WorldShape) -> (f32, Vec3, Vec3) {
        let (core_a, radius_a) = match *a {
            WorldShape::Capsule { a, b, radius } => ((a, b), radius),
            WorldShape::Sphere { center, radius } => ((center, center), radius),
            WorldShape::Aabb { .. } => {
                let c = a.center();
                let p = b.closest_point(c);
                let q = a.closest_point(p);
                return ((p - q).length() - if a.contains(p) { 1.0 } else { 0.0 }, q, p);
            }
        };
        let (on_core, on_b) = b.closest_to_segment(core_a.0, core_a.1);
        let gap = (on_b - on_core).length() - radius_a;
        let dir = (on_b - on_core).normalize_or(Vec3::Y);
        (gap, on_core + dir * radius_a, on_b)
    }

    fn update_contacts(&mut self, scene: &Scene) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        let mut current = BTreeSet::new();

        for &listener in &self.listeners {
            let Some(a) = self.object(listener) else {
                continue;
            };
            if a.kind == CollisionObjectType::GhostObject {
                continue;
            }
            let shape_a = Self::shape_of(scene, a);
            for b in self.solid_objects().filter(|o| o.id != listener) {
                let shape_b = Self::shape_of(scene, b);
                let (gap, point_a, point_b) = Self::separation(&shape_a, &shape_b);
                let pair = (listener, b.id);
                let touching = gap <= CONTACT_MARGIN;
                if touching {
                    current.insert(pair);
                }
                let was_touching = self.contacts.contains(&pair);
                if touching != was_touching {
                    events.push(CollisionEvent {
                        kind: if touching {
                            CollisionEventKind::Colliding
                        } else {
                            CollisionEventKind::NotColliding
                        },
                        object_a: listener,
                        object_b: b.id,
                        contact_point_a: point_a,
                        contact_point_b: point_b,
                    });
                }
            }
        }

        self.contacts = current;
        events
    }
}
