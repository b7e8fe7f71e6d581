//! A Monte Carlo path tracer.
//!
//! Scenes are built from primitives that all implement [`Intersect`], shaded by
//! [`Material`]s, and rendered through a [`Camera`] by the recursive estimator in
//! [`integrator`].

pub mod bvh;
pub mod camera;
pub mod config;
pub mod integrator;
pub mod material;
pub mod perlin;
pub mod primitives;
pub mod ray;
pub mod scene;
pub mod scenes;
pub mod textures;

pub use crate::{
    bvh::BVH,
    camera::{Camera, Lens},
    integrator::{Background, RenderSettings},
    material::Material,
    primitives::{Intersect, AABB},
    ray::{Hit, Ray},
    scene::Scene,
    textures::Texture,
};

/// The random number generator every worker owns a copy of
pub type DefaultRng = rand_xoshiro::Xoshiro256Plus;
