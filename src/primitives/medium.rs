use crate::{
    material::{Isotropic, Material},
    primitives::AABB,
    textures::Texture,
    DefaultRng, Hit, Intersect, Ray,
};
use glam::{vec3, Vec3};
use rand::Rng;
use std::sync::Arc;

/// A volume of constant density filling a closed boundary primitive
#[derive(Clone)]
pub struct ConstantMedium {
    boundary: Arc<dyn Intersect>,
    neg_inv_density: f32,
    phase_function: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Intersect>, density: f32, texture: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::new(texture)),
        }
    }

    pub fn from_color(boundary: Arc<dyn Intersect>, density: f32, color: Vec3) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Arc::new(Isotropic::from_color(color)),
        }
    }
}

impl Intersect for ConstantMedium {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32, rng: &mut DefaultRng) -> Option<Hit> {
        // The ray has to pass through the boundary, entering and leaving it
        let entry = self
            .boundary
            .intersection(ray, f32::NEG_INFINITY, f32::INFINITY, rng)?;
        let exit = self
            .boundary
            .intersection(ray, entry.t + 0.0001, f32::INFINITY, rng)?;

        let t_enter = entry.t.max(t_min).max(0.0);
        let t_exit = exit.t.min(t_max);
        if t_enter >= t_exit {
            return None;
        }

        let ray_length = ray.direction.length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        // 1 - [0, 1) keeps the logarithm finite
        let hit_distance = self.neg_inv_density * f32::ln(1.0 - rng.gen::<f32>());
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;

        // Normal and facing are meaningless inside a medium
        Some(Hit {
            t,
            point: ray.at(t),
            normal: vec3(1.0, 0.0, 0.0),
            u: 0.0,
            v: 0.0,
            front_face: true,
            material: self.phase_function.clone(),
        })
    }

    fn bounds(&self, time0: f32, time1: f32) -> Option<AABB> {
        self.boundary.bounds(time0, time1)
    }
}
