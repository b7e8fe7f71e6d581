use crate::{primitives::AABB, DefaultRng, Hit, Intersect, Ray};
use glam::{vec3, Vec3};
use itertools::iproduct;
use std::sync::Arc;

/// Moves a primitive by a fixed offset
#[derive(Clone)]
pub struct Translate {
    primitive: Arc<dyn Intersect>,
    offset: Vec3,
}

impl Translate {
    pub fn new(primitive: Arc<dyn Intersect>, offset: Vec3) -> Self {
        Self { primitive, offset }
    }
}

impl Intersect for Translate {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32, rng: &mut DefaultRng) -> Option<Hit> {
        let moved = Ray::with_time(ray.origin - self.offset, ray.direction, ray.time);

        self.primitive
            .intersection(moved, t_min, t_max, rng)
            .map(|mut hit| {
                hit.point += self.offset;
                hit
            })
    }

    fn bounds(&self, time0: f32, time1: f32) -> Option<AABB> {
        self.primitive.bounds(time0, time1).map(|mut b| {
            b.min += self.offset;
            b.max += self.offset;

            b
        })
    }
}

/// Rotates a primitive around the Y axis
#[derive(Clone)]
pub struct RotateY {
    primitive: Arc<dyn Intersect>,
    sin_theta: f32,
    cos_theta: f32,
    bounds: Option<AABB>,
}

impl RotateY {
    /// Rotates counter-clockwise (seen from +Y) by `angle` degrees. The world space bounds
    /// are computed once from the primitive's bounds over the [0, 1] shutter interval.
    pub fn new(primitive: Arc<dyn Intersect>, angle: f32) -> Self {
        let radians = angle.to_radians();
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        let bounds = primitive.bounds(0.0, 1.0).map(|b| {
            iproduct!(0..2, 0..2, 0..2)
                .map(|(i, j, k)| {
                    let pick = |n, lo: f32, hi: f32| if n == 0 { lo } else { hi };
                    let x = pick(i, b.min.x, b.max.x);
                    let y = pick(j, b.min.y, b.max.y);
                    let z = pick(k, b.min.z, b.max.z);

                    vec3(cos_theta * x + sin_theta * z, y, -sin_theta * x + cos_theta * z)
                })
                .fold(
                    AABB::new(Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
                    AABB::point_union,
                )
        });

        Self {
            primitive,
            sin_theta,
            cos_theta,
            bounds,
        }
    }

    // World to object space
    fn to_local(&self, v: Vec3) -> Vec3 {
        vec3(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    // Object to world space
    fn to_world(&self, v: Vec3) -> Vec3 {
        vec3(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Intersect for RotateY {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32, rng: &mut DefaultRng) -> Option<Hit> {
        let rotated = Ray::with_time(
            self.to_local(ray.origin),
            self.to_local(ray.direction),
            ray.time,
        );

        self.primitive
            .intersection(rotated, t_min, t_max, rng)
            .map(|mut hit| {
                // Rotation preserves angles, so the normal still opposes the ray
                hit.point = self.to_world(hit.point);
                hit.normal = self.to_world(hit.normal);
                hit
            })
    }

    fn bounds(&self, _time0: f32, _time1: f32) -> Option<AABB> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        material::{Lambertian, Material},
        primitives::{Cuboid, Sphere},
    };
    use rand::SeedableRng;

    fn white() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Vec3::ONE))
    }

    fn rng() -> DefaultRng {
        DefaultRng::seed_from_u64(3)
    }

    #[test]
    fn translated_sphere_is_hit_at_its_new_place() {
        let sphere = Arc::new(Sphere::new(Vec3::ZERO, 1.0, white()));
        let moved = Translate::new(sphere, vec3(0.0, 0.0, -5.0));
        let ray = Ray::new(Vec3::ZERO, vec3(0.0, 0.0, -1.0));

        let hit = moved.intersection(ray, 0.001, f32::INFINITY, &mut rng()).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-5);
        assert!(hit.point.abs_diff_eq(vec3(0.0, 0.0, -4.0), 1e-5));
        assert!(hit.normal.abs_diff_eq(vec3(0.0, 0.0, 1.0), 1e-5));

        let bounds = moved.bounds(0.0, 1.0).unwrap();
        assert_eq!(bounds.min, vec3(-1.0, -1.0, -6.0));
        assert_eq!(bounds.max, vec3(1.0, 1.0, -4.0));
    }

    #[test]
    fn quarter_turn_swaps_x_and_z() {
        let cuboid = Arc::new(Cuboid::new(Vec3::ZERO, vec3(1.0, 1.0, 2.0), white()));
        let rotated = RotateY::new(cuboid, 90.0);

        let bounds = rotated.bounds(0.0, 1.0).unwrap();
        assert!(bounds.min.abs_diff_eq(vec3(0.0, 0.0, -1.0), 1e-5));
        assert!(bounds.max.abs_diff_eq(vec3(2.0, 1.0, 0.0), 1e-5));

        // The face at local x = 1 now faces -Z
        let ray = Ray::new(vec3(1.0, 0.5, -10.0), vec3(0.0, 0.0, 1.0));
        let hit = rotated.intersection(ray, 0.001, f32::INFINITY, &mut rng()).unwrap();
        assert!((hit.t - 9.0).abs() < 1e-4);
        assert!(hit.normal.abs_diff_eq(vec3(0.0, 0.0, -1.0), 1e-5));
        assert!(hit.front_face);
    }

    #[test]
    fn rotation_keeps_spheres_in_place_around_the_axis() {
        let sphere = Arc::new(Sphere::new(vec3(0.0, 3.0, 0.0), 1.0, white()));
        let rotated = RotateY::new(sphere, 37.0);
        let ray = Ray::new(vec3(0.0, 10.0, 0.0), vec3(0.0, -1.0, 0.0));

        let hit = rotated.intersection(ray, 0.001, f32::INFINITY, &mut rng()).unwrap();
        assert!((hit.t - 6.0).abs() < 1e-4);
    }
}
