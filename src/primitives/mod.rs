//! This module is full of primitives that all impl Intersect

mod aabb;
mod cuboid;
mod instance;
mod list;
mod medium;
mod rect;
mod sphere;

pub use aabb::*;
pub use cuboid::*;
pub use instance::*;
pub use list::*;
pub use medium::*;
pub use rect::*;
pub use sphere::*;

use crate::{
    ray::{Hit, Ray},
    DefaultRng,
};

/// Computes whether a ray intersects a primitive
pub trait Intersect: Send + Sync {
    /// Computes the closest intersection between the ray and the primitive with t in (t_min, t_max).
    /// Participating media sample their scattering distance from `rng`.
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32, rng: &mut DefaultRng) -> Option<Hit>;

    /// Generate a bounds for the primitive covering the whole shutter interval.
    /// Only primitives with unbounded extent return None.
    fn bounds(&self, time0: f32, time1: f32) -> Option<AABB>;
}
