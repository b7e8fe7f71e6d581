use crate::{material::sample_unit_disk, DefaultRng, Ray};
use glam::{vec3, Mat4, Vec3};
use rand::Rng;

/// How ray origins are spread over the aperture
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lens {
    /// Every ray starts at the eye, everything is in focus
    Pinhole,
    /// Rays start anywhere on a disk around the eye, only the view plane is in focus
    Thin { radius: f32 },
}

impl Lens {
    /// A thin lens with the given diameter
    pub fn aperture(aperture: f32) -> Self {
        Lens::Thin {
            radius: aperture / 2.0,
        }
    }
}

/// Maps screen coordinates in [0, 1]², (0, 0) at the bottom left, to world space rays.
///
/// The view plane sits `focal_length` in front of the eye and spans `width` x `height`.
#[derive(Clone, Debug)]
pub struct Camera {
    eye: Vec3,
    center: Vec3,
    up: Vec3,
    view_to_world: Mat4,
    focal_length: f32,
    width: f32,
    height: f32,
    lower_left_corner: Vec3,
    lens: Lens,
    time0: f32,
    time1: f32,
}

impl Camera {
    pub fn new(eye: Vec3, center: Vec3, up: Vec3, focal_length: f32, width: f32, height: f32) -> Self {
        let mut camera = Self {
            eye,
            center,
            up,
            view_to_world: Mat4::IDENTITY,
            focal_length,
            width,
            height,
            lower_left_corner: Vec3::ZERO,
            lens: Lens::Pinhole,
            time0: 0.0,
            time1: 0.0,
        };
        camera.update();

        camera
    }

    /// Sizes the view plane from a vertical field of view in degrees, placing it at `focus_dist`
    pub fn from_fov(eye: Vec3, center: Vec3, up: Vec3, vfov: f32, aspect: f32, focus_dist: f32) -> Self {
        let height = 2.0 * f32::tan(vfov.to_radians() / 2.0) * focus_dist;
        let width = aspect * height;

        Self::new(eye, center, up, focus_dist, width, height)
    }

    pub fn with_lens(mut self, lens: Lens) -> Self {
        self.lens = lens;
        self
    }

    /// Rays get a time uniformly drawn from [time0, time1]
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    pub fn shutter(&self) -> (f32, f32) {
        (self.time0, self.time1)
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn set_eye(&mut self, eye: Vec3) {
        self.eye = eye;
        self.update();
    }

    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
        self.update();
    }

    fn update(&mut self) {
        self.view_to_world = Mat4::look_at_rh(self.eye, self.center, self.up).inverse();
        self.lower_left_corner = vec3(-self.width / 2.0, -self.height / 2.0, -self.focal_length);
    }

    pub fn ray(&self, s: f32, t: f32, rng: &mut DefaultRng) -> Ray {
        let local = self.lower_left_corner + vec3(s * self.width, t * self.height, 0.0);
        let target = self.view_to_world.transform_point3(local);

        let time = if self.time1 > self.time0 {
            rng.gen_range(self.time0, self.time1)
        } else {
            self.time0
        };

        let origin = match self.lens {
            Lens::Pinhole => self.eye,
            Lens::Thin { radius } => {
                let offset = radius * sample_unit_disk(rng);
                self.view_to_world.transform_point3(offset)
            }
        };

        Ray::with_time(origin, target - origin, time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn camera() -> Camera {
        Camera::new(vec3(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y, 1.0, 2.0, 2.0)
    }

    #[test]
    fn center_of_screen_looks_at_the_target() {
        let ray = camera().ray(0.5, 0.5, &mut DefaultRng::seed_from_u64(0));
        assert!(ray.origin.abs_diff_eq(vec3(0.0, 0.0, 5.0), 1e-5));
        assert!(ray.direction.abs_diff_eq(vec3(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn screen_corners_map_to_the_view_plane_corners() {
        let camera = camera();
        let mut rng = DefaultRng::seed_from_u64(0);

        let bottom_left = camera.ray(0.0, 0.0, &mut rng);
        assert!(bottom_left.direction.abs_diff_eq(vec3(-1.0, -1.0, -1.0), 1e-5));

        let top_right = camera.ray(1.0, 1.0, &mut rng);
        assert!(top_right.direction.abs_diff_eq(vec3(1.0, 1.0, -1.0), 1e-5));
    }

    #[test]
    fn fov_sizes_the_view_plane() {
        let camera = Camera::from_fov(Vec3::ZERO, vec3(0.0, 0.0, -1.0), Vec3::Y, 90.0, 2.0, 3.0);
        let ray = camera.ray(1.0, 1.0, &mut DefaultRng::seed_from_u64(0));
        assert!(ray.direction.abs_diff_eq(vec3(6.0, 3.0, -3.0), 1e-4));
    }

    #[test]
    fn moving_the_eye_recomputes_the_basis() {
        let mut camera = camera();
        camera.set_eye(vec3(5.0, 0.0, 0.0));
        let ray = camera.ray(0.5, 0.5, &mut DefaultRng::seed_from_u64(0));
        assert!(ray.direction.abs_diff_eq(vec3(-1.0, 0.0, 0.0), 1e-5));

        camera.set_center(vec3(5.0, 0.0, -3.0));
        let ray = camera.ray(0.5, 0.5, &mut DefaultRng::seed_from_u64(0));
        assert!(ray.direction.abs_diff_eq(vec3(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn shutter_times_stay_in_the_interval() {
        let open = camera().with_shutter(0.25, 0.75);
        let mut rng = DefaultRng::seed_from_u64(21);
        for _ in 0..100 {
            let time = open.ray(0.3, 0.6, &mut rng).time;
            assert!(time >= 0.25 && time < 0.75);
        }

        assert_eq!(camera().ray(0.5, 0.5, &mut rng).time, 0.0);
    }

    #[test]
    fn thin_lens_rays_converge_on_the_view_plane() {
        let camera = camera().with_lens(Lens::aperture(0.5));
        let mut rng = DefaultRng::seed_from_u64(13);

        let focus = vec3(0.4, -0.2, 4.0);
        let mut spread = 0.0f32;
        for _ in 0..100 {
            let ray = camera.ray(0.7, 0.4, &mut rng);
            assert!(ray.at(1.0).abs_diff_eq(focus, 1e-4));
            assert!((ray.origin.z - 5.0).abs() < 1e-5);
            assert!((ray.origin - camera.eye()).length() <= 0.25 + 1e-5);
            spread = spread.max((ray.origin - camera.eye()).length());
        }

        assert!(spread > 0.05);
    }
}
