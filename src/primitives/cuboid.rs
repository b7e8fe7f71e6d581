use crate::{
    material::Material,
    primitives::{AxisRect, PrimitiveList, AABB},
    DefaultRng, Hit, Intersect, Ray,
};
use glam::Vec3;
use std::sync::Arc;

/// An axis aligned box made of six rectangles
#[derive(Clone)]
pub struct Cuboid {
    min: Vec3,
    max: Vec3,
    sides: PrimitiveList,
}

impl Cuboid {
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<dyn Material>) -> Self {
        let min = p0.min(p1);
        let max = p0.max(p1);

        let sides: Vec<Arc<dyn Intersect>> = vec![
            Arc::new(AxisRect::xy((min.x, max.x), (min.y, max.y), max.z, material.clone())),
            Arc::new(AxisRect::xy((min.x, max.x), (min.y, max.y), min.z, material.clone())),
            Arc::new(AxisRect::xz((min.x, max.x), (min.z, max.z), max.y, material.clone())),
            Arc::new(AxisRect::xz((min.x, max.x), (min.z, max.z), min.y, material.clone())),
            Arc::new(AxisRect::yz((min.y, max.y), (min.z, max.z), max.x, material.clone())),
            Arc::new(AxisRect::yz((min.y, max.y), (min.z, max.z), min.x, material)),
        ];

        Self {
            min,
            max,
            sides: sides.into(),
        }
    }
}

impl Intersect for Cuboid {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32, rng: &mut DefaultRng) -> Option<Hit> {
        self.sides.intersection(ray, t_min, t_max, rng)
    }

    // The exact corners, not the padded union of the sides
    fn bounds(&self, _time0: f32, _time1: f32) -> Option<AABB> {
        Some(AABB::new(self.min, self.max))
    }
}
