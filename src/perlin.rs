//! Gradient noise over a lattice of random unit vectors.

use crate::{material::sample_unit_sphere, DefaultRng};
use glam::{vec3, Vec3};
use itertools::iproduct;
use rand::seq::SliceRandom;

const POINT_COUNT: usize = 256;

pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Generates the gradient table and the three axis permutations once
    pub fn new(rng: &mut DefaultRng) -> Self {
        let gradients = (0..POINT_COUNT).map(|_| sample_unit_sphere(rng)).collect();

        Self {
            gradients,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    fn generate_perm(rng: &mut DefaultRng) -> Vec<usize> {
        let mut p = (0..POINT_COUNT).collect::<Vec<_>>();
        p.shuffle(rng);
        p
    }

    fn gradient(&self, i: i64, j: i64, k: i64) -> Vec3 {
        let mask = (POINT_COUNT - 1) as i64;
        let index = self.perm_x[(i & mask) as usize]
            ^ self.perm_y[(j & mask) as usize]
            ^ self.perm_z[(k & mask) as usize];

        self.gradients[index]
    }

    /// Smooth noise in roughly [-1, 1]
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let (u, v, w) = (p.x - floor.x, p.y - floor.y, p.z - floor.z);
        let (i, j, k) = (floor.x as i64, floor.y as i64, floor.z as i64);

        // Hermite smoothing of the interpolation weights
        let uu = u * u * (3.0 - 2.0 * u);
        let vv = v * v * (3.0 - 2.0 * v);
        let ww = w * w * (3.0 - 2.0 * w);

        iproduct!(0..2i64, 0..2i64, 0..2i64)
            .map(|(di, dj, dk)| {
                let (fi, fj, fk) = (di as f32, dj as f32, dk as f32);
                let weight = vec3(u - fi, v - fj, w - fk);

                (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * self.gradient(i + di, j + dj, k + dk).dot(weight)
            })
            .sum()
    }

    /// Sums `depth` octaves at halving weight and doubling frequency
    pub fn turbulence(&self, p: Vec3, depth: usize) -> f32 {
        (0..depth)
            .fold((0.0, p, 1.0), |(sum, point, weight), _| {
                (sum + weight * self.noise(point), point * 2.0, weight * 0.5)
            })
            .0
            .abs()
    }
}
