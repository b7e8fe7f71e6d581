use crate::{primitives::AABB, DefaultRng, Hit, Intersect, Ray};
use std::sync::Arc;

/// A flat aggregate that tests every primitive in turn
#[derive(Clone, Default)]
pub struct PrimitiveList {
    primitives: Vec<Arc<dyn Intersect>>,
}

impl PrimitiveList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, primitive: Arc<dyn Intersect>) {
        self.primitives.push(primitive);
    }

    pub fn primitives(&self) -> &[Arc<dyn Intersect>] {
        &self.primitives
    }

    pub fn into_primitives(self) -> Vec<Arc<dyn Intersect>> {
        self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl From<Vec<Arc<dyn Intersect>>> for PrimitiveList {
    fn from(primitives: Vec<Arc<dyn Intersect>>) -> Self {
        Self { primitives }
    }
}

impl Intersect for PrimitiveList {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32, rng: &mut DefaultRng) -> Option<Hit> {
        let mut hit = None;
        let mut closest = t_max;

        // Find the closest intersection
        for primitive in &self.primitives {
            if let Some(h) = primitive.intersection(ray, t_min, closest, rng) {
                closest = h.t;
                hit = Some(h);
            }
        }

        hit
    }

    fn bounds(&self, time0: f32, time1: f32) -> Option<AABB> {
        let mut primitives = self.primitives.iter();
        let first = primitives.next()?.bounds(time0, time1)?;

        primitives.try_fold(first, |b, p| p.bounds(time0, time1).map(|pb| b.union(pb)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        material::{Lambertian, Material},
        primitives::Sphere,
    };
    use glam::{vec3, Vec3};
    use rand::SeedableRng;

    fn sphere(center: Vec3, radius: f32) -> Arc<dyn Intersect> {
        let material: Arc<dyn Material> = Arc::new(Lambertian::from_color(Vec3::ONE));
        Arc::new(Sphere::new(center, radius, material))
    }

    #[test]
    fn reports_the_closest_hit_regardless_of_order() {
        let mut list = PrimitiveList::new();
        list.push(sphere(vec3(0.0, 0.0, -10.0), 1.0));
        list.push(sphere(vec3(0.0, 0.0, -4.0), 1.0));
        list.push(sphere(vec3(0.0, 0.0, -7.0), 1.0));

        let ray = Ray::new(Vec3::ZERO, vec3(0.0, 0.0, -1.0));
        let hit = list
            .intersection(ray, 0.001, f32::INFINITY, &mut DefaultRng::seed_from_u64(0))
            .unwrap();
        assert!((hit.t - 3.0).abs() < 1e-5);
    }

    #[test]
    fn bounds_union_all_members() {
        let list = PrimitiveList::from(vec![
            sphere(vec3(-2.0, 0.0, 0.0), 1.0),
            sphere(vec3(3.0, 1.0, 0.0), 0.5),
        ]);
        let bounds = list.bounds(0.0, 1.0).unwrap();
        assert_eq!(bounds.min, vec3(-3.0, -1.0, -1.0));
        assert_eq!(bounds.max, vec3(3.5, 1.5, 1.0));
    }

    #[test]
    fn empty_list_has_no_bounds() {
        assert!(PrimitiveList::new().bounds(0.0, 1.0).is_none());
    }
}
