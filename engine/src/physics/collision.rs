//! Collision detection module
//!
//! Ray intersection and proximity queries against the world-space shapes the
//! physics world works with: axis-aligned boxes, spheres and capsules.
//!
//! # Ray-AABB Intersection
//!
//! The slab method is used for ray-AABB intersection, which finds the
//! intersection points by computing entry and exit times for each axis.
//!
//! # Sweeps
//!
//! Sweeping a sphere of radius `r` is answered as a ray test against each
//! shape inflated by `r` (Minkowski sum). Boxes inflate to a larger box, which
//! is slightly conservative around edges and corners.
//!
//! # Example
//!
//! ```ignore
//! use gameplay_samples_engine::physics::collision::{ray_aabb_intersect, WorldShape};
//! use glam::Vec3;
//!
//! let origin = Vec3::new(0.0, 0.0, -5.0);
//! let direction = Vec3::new(0.0, 0.0, 1.0);
//! if let Some(t) = ray_aabb_intersect(origin, direction, Vec3::splat(-1.0), Vec3::ONE) {
//!     let hit_point = origin + direction * t;
//! }
//!
//! let capsule = WorldShape::Capsule { a: Vec3::ZERO, b: Vec3::Y * 2.0, radius: 0.5 };
//! let swept = capsule.inflated(0.25).ray_intersect(origin, direction);
//! ```

use glam::Vec3;

/// Performs ray-AABB (Axis-Aligned Bounding Box) intersection test using the slab method.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance to the entry point, or to the exit point when the ray starts inside
/// * `None` - No intersection, or the box is entirely behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray_origin[axis];
        let dir = ray_dir[axis];
        let (lo, hi) = (aabb_min[axis], aabb_max[axis]);

        if dir.abs() < 1e-10 {
            // Parallel to this slab: must already lie between its planes
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let t1 = (lo - origin) * inv;
        let t2 = (hi - origin) * inv;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 { Some(t_min) } else { Some(t_max) }
    } else {
        None
    }
}

/// Computes the outward normal of the AABB face closest to `point`.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = ((aabb_max - aabb_min) * 0.5).max(Vec3::splat(1e-6));
    let normalized = (point - center) / half_extents;
    let abs = normalized.abs();

    if abs.x >= abs.y && abs.x >= abs.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs.y >= abs.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}

/// Ray-sphere intersection. Returns the entry distance, or the exit distance
/// when the origin is inside the sphere.
pub fn ray_sphere_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.length_squared() - radius * radius;
    if c > 0.0 && b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let t = -b - root;
    if t >= 0.0 { Some(t) } else { Some(-b + root) }
}

/// Ray-capsule intersection for the capsule swept between `a` and `b`.
///
/// Only entry points are reported; callers skip shapes that contain the ray origin.
pub fn ray_capsule_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    a: Vec3,
    b: Vec3,
    radius: f32,
) -> Option<f32> {
    let ba = b - a;
    let oa = ray_origin - a;
    let baba = ba.dot(ba);
    let bard = ba.dot(ray_dir);
    let baoa = ba.dot(oa);
    let rdoa = ray_dir.dot(oa);
    let oaoa = oa.dot(oa);

    let mut best: Option<f32> = None;
    let mut consider = |t: f32| {
        if t >= 0.0 && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };

    // Cylindrical body
    let k2 = baba - bard * bard;
    if k2.abs() > 1e-8 {
        let k1 = baba * rdoa - baoa * bard;
        let k0 = baba * oaoa - baoa * baoa - radius * radius * baba;
        let h = k1 * k1 - k2 * k0;
        if h >= 0.0 {
            let t = (-k1 - h.sqrt()) / k2;
            let y = baoa + t * bard;
            if y > 0.0 && y < baba {
                consider(t);
            }
        }
    }

    // End caps
    for center in [a, b] {
        let oc = ray_origin - center;
        let bq = oc.dot(ray_dir);
        let c = oc.length_squared() - radius * radius;
        let disc = bq * bq - c;
        if disc >= 0.0 {
            consider(-bq - disc.sqrt());
        }
    }

    best
}

/// Closest point to `p` on the segment `a`-`b`.
pub fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

// =============================================================================
// WorldShape - collision shape placed in world space
// =============================================================================

/// A collision shape resolved to world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldShape {
    Aabb { min: Vec3, max: Vec3 },
    Sphere { center: Vec3, radius: f32 },
    /// Segment `a`-`b` swept by `radius`
    Capsule { a: Vec3, b: Vec3, radius: f32 },
}

impl WorldShape {
    pub fn center(&self) -> Vec3 {
        match *self {
            WorldShape::Aabb { min, max } => (min + max) * 0.5,
            WorldShape::Sphere { center, .. } => center,
            WorldShape::Capsule { a, b, .. } => (a + b) * 0.5,
        }
    }

    /// Lowest world-space y the shape reaches.
    pub fn min_y(&self) -> f32 {
        match *self {
            WorldShape::Aabb { min, .. } => min.y,
            WorldShape::Sphere { center, radius } => center.y - radius,
            WorldShape::Capsule { a, b, radius } => a.y.min(b.y) - radius,
        }
    }

    /// Radius of a sphere around `center()` that encloses the shape.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            WorldShape::Aabb { min, max } => ((max - min) * 0.5).length(),
            WorldShape::Sphere { radius, .. } => radius,
            WorldShape::Capsule { a, b, radius } => (b - a).length() * 0.5 + radius,
        }
    }

    /// Minkowski sum with a sphere of radius `r`.
    pub fn inflated(&self, r: f32) -> WorldShape {
        match *self {
            WorldShape::Aabb { min, max } => WorldShape::Aabb {
                min: min - Vec3::splat(r),
                max: max + Vec3::splat(r),
            },
            WorldShape::Sphere { center, radius } => WorldShape::Sphere {
                center,
                radius: radius + r,
            },
            WorldShape::Capsule { a, b, radius } => WorldShape::Capsule {
                a,
                b,
                radius: radius + r,
            },
        }
    }

    /// Same shape moved by `delta`.
    pub fn translated(&self, delta: Vec3) -> WorldShape {
        match *self {
            WorldShape::Aabb { min, max } => WorldShape::Aabb {
                min: min + delta,
                max: max + delta,
            },
            WorldShape::Sphere { center, radius } => WorldShape::Sphere {
                center: center + delta,
                radius,
            },
            WorldShape::Capsule { a, b, radius } => WorldShape::Capsule {
                a: a + delta,
                b: b + delta,
                radius,
            },
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        match *self {
            WorldShape::Aabb { min, max } => p.cmpge(min).all() && p.cmple(max).all(),
            WorldShape::Sphere { center, radius } => p.distance_squared(center) <= radius * radius,
            WorldShape::Capsule { a, b, radius } => {
                p.distance_squared(closest_point_on_segment(a, b, p)) <= radius * radius
            }
        }
    }

    /// Closest point on or inside the shape to `p`.
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        match *self {
            WorldShape::Aabb { min, max } => p.clamp(min, max),
            WorldShape::Sphere { center, radius } => {
                let d = p - center;
                if d.length_squared() <= radius * radius {
                    p
                } else {
                    center + d.normalize() * radius
                }
            }
            WorldShape::Capsule { a, b, radius } => {
                let axis = closest_point_on_segment(a, b, p);
                let d = p - axis;
                if d.length_squared() <= radius * radius {
                    p
                } else {
                    axis + d.normalize() * radius
                }
            }
        }
    }

    /// Outward surface normal at a point on the surface.
    pub fn normal_at(&self, p: Vec3) -> Vec3 {
        match *self {
            WorldShape::Aabb { min, max } => aabb_surface_normal(p, min, max),
            WorldShape::Sphere { center, .. } => (p - center).normalize_or(Vec3::Y),
            WorldShape::Capsule { a, b, .. } => {
                (p - closest_point_on_segment(a, b, p)).normalize_or(Vec3::Y)
            }
        }
    }

    /// Distance along a normalized ray to the shape surface.
    pub fn ray_intersect(&self, origin: Vec3, dir: Vec3) -> Option<f32> {
        match *self {
            WorldShape::Aabb { min, max } => ray_aabb_intersect(origin, dir, min, max),
            WorldShape::Sphere { center, radius } => {
                ray_sphere_intersect(origin, dir, center, radius)
            }
            WorldShape::Capsule { a, b, radius } => {
                ray_capsule_intersect(origin, dir, a, b, radius)
            }
        }
    }

    /// Closest points between the segment `a`-`b` and this shape, as
    /// (point on segment, point on shape). Alternating projection between the
    /// two convex sets; a few rounds are enough for the shapes used here.
    pub fn closest_to_segment(&self, a: Vec3, b: Vec3) -> (Vec3, Vec3) {
        let mut on_segment = (a + b) * 0.5;
        let mut on_shape = self.closest_point(on_segment);
        for _ in 0..8 {
            on_segment = closest_point_on_segment(a, b, on_shape);
            on_shape = self.closest_point(on_segment);
        }
        (on_segment, on_shape)
    }
}
