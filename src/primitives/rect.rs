use crate::{
    bvh::{Axis, GetAxis},
    material::Material,
    primitives::AABB,
    DefaultRng, Hit, Intersect, Ray,
};
use glam::Vec3;
use std::sync::Arc;

/// Half thickness given to the flat axis of a rectangle's bounds
const THICKNESS: f32 = 0.001;

/// Which plane a rectangle lies in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    /// The two in-plane axes (mapped to u and v) and the constant axis
    fn axes(self) -> (Axis, Axis, Axis) {
        match self {
            Plane::XY => (Axis::X, Axis::Y, Axis::Z),
            Plane::XZ => (Axis::X, Axis::Z, Axis::Y),
            Plane::YZ => (Axis::Y, Axis::Z, Axis::X),
        }
    }
}

/// An axis aligned rectangle spanning [a0, a1] x [b0, b1] on the plane's in-plane axes,
/// at `k` on the remaining one.
#[derive(Clone)]
pub struct AxisRect {
    plane: Plane,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    material: Arc<dyn Material>,
}

impl AxisRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            material,
        }
    }

    pub fn xy(x: (f32, f32), y: (f32, f32), z: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XY, x, y, z, material)
    }

    pub fn xz(x: (f32, f32), z: (f32, f32), y: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XZ, x, z, y, material)
    }

    pub fn yz(y: (f32, f32), z: (f32, f32), x: f32, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::YZ, y, z, x, material)
    }
}

impl Intersect for AxisRect {
    fn intersection(&self, ray: Ray, t_min: f32, t_max: f32, _rng: &mut DefaultRng) -> Option<Hit> {
        // Zero area, nothing to hit
        if self.a1 <= self.a0 || self.b1 <= self.b0 {
            return None;
        }

        let (a, b, k) = self.plane.axes();

        // NaN from a ray lying in the plane fails this comparison too
        let t = (self.k - ray.origin.axis(k)) / ray.direction.axis(k);
        if !(t_min < t && t < t_max) {
            return None;
        }

        let p = ray.at(t);
        let (pa, pb) = (p.axis(a), p.axis(b));
        if pa < self.a0 || pa > self.a1 || pb < self.b0 || pb > self.b1 {
            return None;
        }

        let u = (pa - self.a0) / (self.a1 - self.a0);
        let v = (pb - self.b0) / (self.b1 - self.b0);

        Some(Hit::new(ray, t, k.unit(), (u, v), self.material.clone()))
    }

    fn bounds(&self, _time0: f32, _time1: f32) -> Option<AABB> {
        let (a, b, k) = self.plane.axes();

        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        *min.axis_mut(a) = self.a0;
        *max.axis_mut(a) = self.a1;
        *min.axis_mut(b) = self.b0;
        *max.axis_mut(b) = self.b1;
        *min.axis_mut(k) = self.k - THICKNESS;
        *max.axis_mut(k) = self.k + THICKNESS;

        Some(AABB::new(min, max))
    }
}
