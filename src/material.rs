use crate::{
    textures::{SolidColor, Texture},
    DefaultRng, Hit, Ray,
};
use glam::{vec3, Vec3};
use rand::prelude::*;
use rand_distr::{Distribution, UnitBall, UnitDisc, UnitSphere};
use std::sync::Arc;

// Samples a random point inside the unit ball
pub fn sample_unit_ball(rng: &mut DefaultRng) -> Vec3 {
    let p: [f32; 3] = UnitBall.sample(rng);
    Vec3::from(p)
}

// Samples a random direction, uniform over the unit sphere
pub fn sample_unit_sphere(rng: &mut DefaultRng) -> Vec3 {
    let p: [f32; 3] = UnitSphere.sample(rng);
    Vec3::from(p)
}

// Samples a random point inside the unit disk in the XY plane
pub fn sample_unit_disk(rng: &mut DefaultRng) -> Vec3 {
    let [x, y]: [f32; 2] = UnitDisc.sample(rng);
    vec3(x, y, 0.0)
}

// Samples a point in the unit ball, flipped into the hemisphere around normal
pub fn sample_hemisphere(normal: Vec3, rng: &mut DefaultRng) -> Vec3 {
    let p = sample_unit_ball(rng);
    if p.dot(normal) > 0.0 {
        p
    } else {
        -p
    }
}

// Reflect vector v around normal n
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

// Refract unit vector uv through normal n, the caller has already ruled out total internal reflection
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = f32::min((-uv).dot(n), 1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -f32::sqrt(f32::abs(1.0 - r_out_perp.length_squared())) * n;

    r_out_perp + r_out_parallel
}

// An approximation for reflectivity
pub fn schlick(cosine: f32, reflection_index: f32) -> f32 {
    let r_0 = (1.0 - reflection_index) / (1.0 + reflection_index);
    let r_0 = r_0 * r_0;

    r_0 + (1.0 - r_0) * f32::powf(1.0 - cosine, 5.0)
}

/// The outgoing ray of a scatter event
pub struct ScatterResult {
    pub scattered: Ray,
    /// Multiplies the light arriving along `scattered`
    pub attenuation: Vec3,
}

/// Decides how light continues after hitting a surface
pub trait Material: Send + Sync {
    /// Returns the attenuation and the outgoing ray, or None if the ray is absorbed
    fn scatter(&self, ray: Ray, hit: &Hit, rng: &mut DefaultRng) -> Option<ScatterResult>;

    /// Light given off by the surface itself
    fn emitted(&self, _u: f32, _v: f32, _point: Vec3) -> Vec3 {
        Vec3::ZERO
    }
}

/// Diffuse surface
pub struct Lambertian {
    pub albedo: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    pub fn from_color(albedo: Vec3) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray: Ray, hit: &Hit, rng: &mut DefaultRng) -> Option<ScatterResult> {
        let direction = sample_hemisphere(hit.normal, rng);

        Some(ScatterResult {
            scattered: Ray::with_time(hit.point, direction, ray.time),
            attenuation: self.albedo.value(hit.u, hit.v, hit.point),
        })
    }
}

/// A mirror, blurred by `fuzz` when it is above zero
#[derive(Debug)]
pub struct Metal {
    pub albedo: Vec3,
    pub fuzz: f32,
}

impl Metal {
    pub fn new(albedo: Vec3) -> Self {
        Self::fuzzy(albedo, 0.0)
    }

    pub fn fuzzy(albedo: Vec3, fuzz: f32) -> Self {
        Self { albedo, fuzz }
    }
}

impl Material for Metal {
    fn scatter(&self, ray: Ray, hit: &Hit, rng: &mut DefaultRng) -> Option<ScatterResult> {
        let reflected = reflect(ray.direction.normalize(), hit.normal);

        // Fuzzed reflections may end up below the surface, the depth limit absorbs them
        let direction = if self.fuzz > 0.0 {
            reflected + self.fuzz * sample_hemisphere(reflected, rng)
        } else {
            reflected
        };

        Some(ScatterResult {
            scattered: Ray::with_time(hit.point, direction, ray.time),
            attenuation: self.albedo,
        })
    }
}

/// Glass-like surface with index of refraction `reflection_index`
#[derive(Debug)]
pub struct Dielectric {
    reflection_index: f32,
    fresnel: bool,
}

impl Dielectric {
    /// Always refracts, except under total internal reflection
    pub fn new(reflection_index: f32) -> Self {
        Self {
            reflection_index,
            fresnel: false,
        }
    }

    /// Also reflects with the probability given by Schlick's approximation
    pub fn with_schlick(reflection_index: f32) -> Self {
        Self {
            reflection_index,
            fresnel: true,
        }
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray: Ray, hit: &Hit, rng: &mut DefaultRng) -> Option<ScatterResult> {
        let ratio = if hit.front_face {
            1.0 / self.reflection_index
        } else {
            self.reflection_index
        };

        let unit_direction = ray.direction.normalize();
        let cos_theta = f32::min((-unit_direction).dot(hit.normal), 1.0);
        let sin_theta = f32::sqrt(1.0 - cos_theta * cos_theta);

        let cannot_refract = ratio * sin_theta > 1.0;
        let reflects = cannot_refract
            || (self.fresnel && rng.gen::<f32>() < schlick(cos_theta, ratio));

        let direction = if reflects {
            reflect(unit_direction, hit.normal)
        } else {
            refract(unit_direction, hit.normal, ratio)
        };

        Some(ScatterResult {
            scattered: Ray::with_time(hit.point, direction, ray.time),
            attenuation: Vec3::ONE,
        })
    }
}

/// An emitter, light sources are just surfaces with this material
pub struct DiffuseLight {
    pub emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Arc<dyn Texture>) -> Self {
        Self { emit }
    }

    pub fn from_color(color: Vec3) -> Self {
        Self::new(Arc::new(SolidColor::new(color)))
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray: Ray, _hit: &Hit, _rng: &mut DefaultRng) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f32, v: f32, point: Vec3) -> Vec3 {
        self.emit.value(u, v, point)
    }
}

/// Phase function of a participating medium, scatters uniformly in every direction
pub struct Isotropic {
    pub albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Arc<dyn Texture>) -> Self {
        Self { albedo }
    }

    pub fn from_color(albedo: Vec3) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Isotropic {
    fn scatter(&self, ray: Ray, hit: &Hit, rng: &mut DefaultRng) -> Option<ScatterResult> {
        Some(ScatterResult {
            scattered: Ray::with_time(hit.point, sample_unit_sphere(rng), ray.time),
            attenuation: self.albedo.value(hit.u, hit.v, hit.point),
        })
    }
}
