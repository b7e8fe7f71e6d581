use crate::{
    bvh::{Axis, GetAxis},
    Ray,
};
use glam::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// A box covering all of space, the best we can do for primitives without bounds
    pub fn everything() -> Self {
        Self::new(Vec3::splat(f32::NEG_INFINITY), Vec3::splat(f32::INFINITY))
    }

    // Create a union AABB of two AABBs that surrounds both of them
    pub fn union(self, other: AABB) -> Self {
        AABB::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn point_union(self, other: Vec3) -> Self {
        AABB::new(self.min.min(other), self.max.max(other))
    }

    pub fn contains(&self, other: &AABB) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// Slab test against the ray restricted to (t_min, t_max).
    /// Axis-parallel rays divide by zero into infinities, which resolve every slab correctly
    /// unless the origin lies exactly on a slab plane.
    pub fn has_intersection(&self, ray: Ray, mut t_min: f32, mut t_max: f32) -> bool {
        for &axis in &Axis::ALL {
            let inv_d = ray.inv_direction.axis(axis);
            let mut t0 = (self.min.axis(axis) - ray.origin.axis(axis)) * inv_d;
            let mut t1 = (self.max.axis(axis) - ray.origin.axis(axis)) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_min = if t0 > t_min { t0 } else { t_min };
            t_max = if t1 < t_max { t1 } else { t_max };
            if t_max <= t_min {
                return false;
            }
        }

        true
    }
}
