use crate::{material::Material, primitives::AABB, DefaultRng, Hit, Intersect, Ray};
use glam::Vec3;
use std::{
    f32::consts::PI,
    fmt,
    sync::Arc,
};

/// Maps a point on the unit sphere to (u, v), with u around the Y axis starting at -X
/// and v from the bottom pole to the top pole.
pub fn sphere_uv(p: Vec3) -> (f32, f32) {
    let theta = f32::acos(-p.y);
    let phi = f32::atan2(-p.z, p.x) + PI;

    (phi / (2.0 * PI), theta / PI)
}

// Solves |O + tD - C|² = r² and returns the nearest root within (t_min, t_max)
fn solve(center: Vec3, radius: f32, ray: Ray, t_min: f32, t_max: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    let half_b = oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = half_b * half_b - a * c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();
    let t_1 = (-half_b - sqrtd) / a;
    let t_2 = (-half_b + sqrtd) / a;

    [t_1, t_2].iter().copied().find(|&t| t_min < t && t < t_max)
}

fn sphere_hit(
    center: Vec3,
    radius: f32,
    material: &Arc<dyn Material>,
    ray: Ray,
    t_min: f32,
    t_max: f32,
) -> Option<Hit> {
    solve(center, radius, ray, t_min, t_max).map(|t| {
        let outward_normal = (ray.at(t) - center) / radius;
        Hit::new(ray, t, outward_normal, sphere_uv(outward_normal), material.clone())
    })
}

fn sphere_bounds(center: Vec3, radius: f32) -> AABB {
    let r = Vec3::splat(radius.abs());
    AABB::new(center - r, center + r)
}

#[derive(Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

impl fmt::Debug for Sphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sphere")
            .field("center", &self.center)
            .field("radius", &self.radius)
            .finish()
    }
}

impl Intersect for Sphere {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32, _rng: &mut DefaultRng) -> Option<Hit> {
        sphere_hit(self.center, self.radius, &self.material, ray, t_min, t_max)
    }

    fn bounds(&self, _time0: f32, _time1: f32) -> Option<AABB> {
        Some(sphere_bounds(self.center, self.radius))
    }
}

/// A sphere whose center moves linearly from `center0` at `time0` to `center1` at `time1`
#[derive(Clone)]
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<dyn Material>,
}

impl MovingSphere {
    pub fn new(
        (center0, center1): (Vec3, Vec3),
        (time0, time1): (f32, f32),
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        }
    }

    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }

        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }
}

impl Intersect for MovingSphere {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32, _rng: &mut DefaultRng) -> Option<Hit> {
        sphere_hit(self.center(ray.time), self.radius, &self.material, ray, t_min, t_max)
    }

    fn bounds(&self, time0: f32, time1: f32) -> Option<AABB> {
        let start = sphere_bounds(self.center(time0), self.radius);
        let end = sphere_bounds(self.center(time1), self.radius);

        Some(start.union(end))
    }
}
