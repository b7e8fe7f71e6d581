use crate::material::Material;
use glam::{vec3, Vec3};
use std::{fmt, sync::Arc};

/// The ray data type
#[derive(Clone, Copy, Debug, Default)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub inv_direction: Vec3,
    /// The instant inside the shutter interval this ray samples
    pub time: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_time(origin, direction, 0.0)
    }

    pub fn with_time(origin: Vec3, direction: Vec3, time: f32) -> Self {
        // Zero components deliberately become infinities, the slab test relies on it
        let inv_direction = vec3(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);

        Self {
            origin,
            direction,
            inv_direction,
            time,
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

/// Contains data to be used in the generation of a new ray as a result of an intersection.
#[derive(Clone)]
pub struct Hit {
    pub t: f32,
    pub point: Vec3,
    /// Always points against the incoming ray
    pub normal: Vec3,
    pub u: f32,
    pub v: f32,
    pub front_face: bool,
    pub material: Arc<dyn Material>,
}

impl Hit {
    /// Builds a hit and orients `outward_normal` against the ray.
    pub fn new(
        ray: Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: Arc<dyn Material>,
    ) -> Self {
        let mut hit = Self {
            t,
            point: ray.at(t),
            normal: outward_normal,
            u,
            v,
            front_face: true,
            material,
        };
        hit.set_face_normal(ray, outward_normal);

        hit
    }

    pub fn set_face_normal(&mut self, ray: Ray, outward_normal: Vec3) {
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

impl fmt::Debug for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hit")
            .field("t", &self.t)
            .field("point", &self.point)
            .field("normal", &self.normal)
            .field("u", &self.u)
            .field("v", &self.v)
            .field("front_face", &self.front_face)
            .finish()
    }
}
