//! The recursive radiance estimate and the per-pixel sampling loop around it.

use crate::{camera::Camera, DefaultRng, Intersect, Ray};
use glam::{vec3, Vec3};
use rand::prelude::*;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

/// Bytes per pixel in the output buffer
pub const COLOR_CHANNELS: usize = 3;

/// Offsets ray origins off the surface they left
const T_MIN: f32 = 0.001;

/// What a ray that escapes the scene sees
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Background {
    /// A constant color, black for scenes lit only by emitters
    Solid(Vec3),
    /// White at the bottom blending into blue at the top
    Sky,
}

impl Background {
    pub fn color(&self, ray: Ray) -> Vec3 {
        match *self {
            Background::Solid(color) => color,
            Background::Sky => {
                let dir = ray.direction.normalize();
                let t = 0.5 * (dir.y + 1.0);
                (1.0 - t) * vec3(1.0, 1.0, 1.0) + t * vec3(0.5, 0.7, 1.0)
            }
        }
    }
}

/// Image size, sampling and output transform of a render
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    pub samples: usize,
    pub max_depth: u32,
    pub background: Background,
    pub gamma: f32,
    /// Enables `1 - exp(-color * exposure)` tone mapping
    pub exposure: Option<f32>,
    /// Seeds every row's generator, entropy is used when absent
    pub seed: Option<u64>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 400,
            height: 225,
            samples: 100,
            max_depth: 50,
            background: Background::Sky,
            gamma: 2.0,
            exposure: None,
            seed: None,
        }
    }
}

// Computes the color of a sample based on a ray, counting every ray cast
pub fn color(
    ray: Ray,
    world: &dyn Intersect,
    background: Background,
    depth: u32,
    rays: &mut u64,
    rng: &mut DefaultRng,
) -> Vec3 {
    // Out of bounces
    if depth == 0 {
        return Vec3::ZERO;
    }

    *rays += 1;
    match world.intersection(ray, T_MIN, f32::INFINITY, rng) {
        // The material of the object we hit decides how the ray scatters
        Some(hit) => {
            let emitted = hit.material.emitted(hit.u, hit.v, hit.point);
            match hit.material.scatter(ray, &hit, rng) {
                Some(scatter) => {
                    emitted
                        + scatter.attenuation
                            * color(scatter.scattered, world, background, depth - 1, rays, rng)
                }
                None => emitted,
            }
        }
        // Else draw the background
        None => background.color(ray),
    }
}

/// Turns an averaged linear color into 8 bit channels
pub fn quantize(color: Vec3, gamma: f32, exposure: Option<f32>) -> [u8; 3] {
    let color = match exposure {
        Some(exposure) => Vec3::ONE - (-color * exposure).exp(),
        None => color,
    };

    let channel = |c: f32| {
        let c = c.max(0.0).powf(1.0 / gamma).min(1.0);
        // NaN saturates to zero
        (255.99 * c) as u8
    };

    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Renders the world into a row major RGB buffer, top row first
pub fn render(camera: &Camera, world: &dyn Intersect, settings: &RenderSettings) -> Vec<u8> {
    let RenderSettings {
        width,
        height,
        samples,
        max_depth,
        background,
        gamma,
        exposure,
        seed,
    } = *settings;

    if width == 0 || height == 0 {
        log::warn!("Nothing to render for a {}x{} image", width, height);
        return Vec::new();
    }
    if samples == 0 {
        log::warn!("Zero samples per pixel requested, taking one");
    }
    let samples = samples.max(1);

    let mut buffer = vec![0u8; width * height * COLOR_CHANNELS];
    let global_ray_count = AtomicU64::new(0);
    let start = std::time::Instant::now();

    // Rows are enumerated bottom up to match the camera's v axis
    buffer
        .par_chunks_mut(width * COLOR_CHANNELS)
        .rev()
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = match seed {
                Some(seed) => DefaultRng::seed_from_u64(seed.wrapping_add(y as u64)),
                None => DefaultRng::from_entropy(),
            };
            let mut ray_count = 0;

            row.chunks_mut(COLOR_CHANNELS)
                .enumerate()
                .for_each(|(x, pixel)| {
                    let mut out = Vec3::ZERO;

                    // Antialiasing via multisampling
                    for _ in 0..samples {
                        let u = (rng.gen::<f32>() + x as f32) / width as f32;
                        let v = (rng.gen::<f32>() + y as f32) / height as f32;

                        let ray = camera.ray(u, v, &mut rng);
                        out += color(ray, world, background, max_depth, &mut ray_count, &mut rng);
                    }

                    out /= samples as f32;
                    pixel.copy_from_slice(&quantize(out, gamma, exposure));
                });

            global_ray_count.fetch_add(ray_count, Ordering::Relaxed);
        });

    let duration = start.elapsed();
    let total_rays = global_ray_count.load(Ordering::Relaxed) as f64 / 1_000_000.0;
    log::info!(
        "Time elapsed: {:.2?}, total rays: {:.2}M, rays per second: {:.2}M",
        duration,
        total_rays,
        total_rays / duration.as_secs_f64().max(f64::EPSILON)
    );

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        material::{DiffuseLight, Lambertian, Material},
        primitives::{PrimitiveList, Sphere},
    };
    use std::sync::Arc;

    fn white_sphere() -> PrimitiveList {
        let material: Arc<dyn Material> = Arc::new(Lambertian::from_color(Vec3::ONE));
        let sphere: Arc<dyn Intersect> = Arc::new(Sphere::new(Vec3::ZERO, 1.0, material));
        PrimitiveList::from(vec![sphere])
    }

    #[test]
    fn exhausted_depth_is_black() {
        let world = white_sphere();
        let ray = Ray::new(vec3(0.0, 0.0, 5.0), vec3(0.0, 0.0, -1.0));
        let mut rng = DefaultRng::seed_from_u64(0);
        let mut rays = 0;

        let c = color(ray, &world, Background::Sky, 0, &mut rays, &mut rng);
        assert_eq!(c, Vec3::ZERO);
        assert_eq!(rays, 0);
    }

    #[test]
    fn escaping_rays_see_the_background() {
        let world = white_sphere();
        let ray = Ray::new(vec3(0.0, 0.0, 5.0), vec3(0.0, 1.0, 0.0));
        let mut rng = DefaultRng::seed_from_u64(0);
        let mut rays = 0;

        let sky = color(ray, &world, Background::Sky, 10, &mut rays, &mut rng);
        assert!(sky.abs_diff_eq(vec3(0.5, 0.7, 1.0), 1e-6));

        let solid = Background::Solid(vec3(0.1, 0.2, 0.3));
        assert_eq!(color(ray, &world, solid, 10, &mut rays, &mut rng), vec3(0.1, 0.2, 0.3));
        assert_eq!(rays, 2);
    }

    #[test]
    fn emitters_end_the_path_with_their_emission() {
        let material: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(vec3(4.0, 2.0, 1.0)));
        let light: Arc<dyn Intersect> = Arc::new(Sphere::new(Vec3::ZERO, 1.0, material));
        let world = PrimitiveList::from(vec![light]);
        let ray = Ray::new(vec3(0.0, 0.0, 5.0), vec3(0.0, 0.0, -1.0));
        let mut rng = DefaultRng::seed_from_u64(0);
        let mut rays = 0;

        let black = Background::Solid(Vec3::ZERO);
        let c = color(ray, &world, black, 1, &mut rays, &mut rng);
        assert_eq!(c, vec3(4.0, 2.0, 1.0));
        assert_eq!(rays, 1);
    }

    #[test]
    fn quantize_applies_gamma_and_tone_mapping() {
        assert_eq!(quantize(Vec3::ONE, 1.0, None), [255, 255, 255]);
        assert_eq!(quantize(vec3(0.25, 0.0, 2.0), 2.0, None), [127, 0, 255]);
        assert_eq!(quantize(vec3(-1.0, f32::NAN, 0.5), 1.0, None), [0, 0, 127]);

        // exposure maps 0 to 0 and large values below 1
        let [r, g, _] = quantize(vec3(0.0, 100.0, 0.0), 1.0, Some(1.0));
        assert_eq!(r, 0);
        assert_eq!(g, 255);
        let [r, _, _] = quantize(vec3(1.0, 0.0, 0.0), 1.0, Some(1.0));
        assert_eq!(r, (255.99 * (1.0 - (-1.0f32).exp())) as u8);
    }

    #[test]
    fn seeded_renders_are_reproducible() {
        let world = white_sphere();
        let camera = Camera::new(vec3(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y, 1.0, 1.0, 1.0);
        let settings = RenderSettings {
            width: 12,
            height: 8,
            samples: 4,
            max_depth: 5,
            seed: Some(1234),
            ..RenderSettings::default()
        };

        let a = render(&camera, &world, &settings);
        let b = render(&camera, &world, &settings);
        assert_eq!(a.len(), 12 * 8 * COLOR_CHANNELS);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_images_render_to_an_empty_buffer() {
        let world = white_sphere();
        let camera = Camera::new(vec3(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y, 1.0, 1.0, 1.0);

        for &(width, height) in &[(0, 4), (4, 0), (0, 0)] {
            let settings = RenderSettings {
                width,
                height,
                samples: 2,
                seed: Some(1),
                ..RenderSettings::default()
            };
            assert!(render(&camera, &world, &settings).is_empty());
        }
    }

    #[test]
    fn zero_samples_render_like_one() {
        let world = white_sphere();
        let camera = Camera::new(vec3(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y, 1.0, 1.0, 1.0);
        let one = RenderSettings {
            width: 6,
            height: 4,
            samples: 1,
            max_depth: 3,
            seed: Some(77),
            ..RenderSettings::default()
        };
        let zero = RenderSettings { samples: 0, ..one.clone() };

        let expected = render(&camera, &world, &one);
        let actual = render(&camera, &world, &zero);
        assert_eq!(actual.len(), 6 * 4 * COLOR_CHANNELS);
        assert_eq!(actual, expected);
        // The sky is never black
        assert!(actual.iter().any(|&c| c > 0));
    }

    // A white diffuse unit sphere seen from (0, 0, 5) with one bounce: pixels looking at the
    // sphere are black, every other pixel is the sky gradient for its direction.
    #[test]
    fn single_sphere_silhouette() {
        let world = white_sphere();
        let camera = Camera::new(vec3(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y, 1.0, 1.0, 1.0);
        let (width, height) = (32, 32);
        let settings = RenderSettings {
            width,
            height,
            samples: 1,
            max_depth: 1,
            background: Background::Sky,
            gamma: 1.0,
            exposure: None,
            seed: Some(5),
        };

        let buffer = render(&camera, &world, &settings);
        let mut rng = DefaultRng::seed_from_u64(0);
        let (mut inside, mut outside) = (0, 0);

        for row in 0..height {
            for x in 0..width {
                let y = height - 1 - row;
                let offset = (row * width + x) * COLOR_CHANNELS;
                let pixel = &buffer[offset..offset + COLOR_CHANNELS];

                // Check the pixel's footprint is clearly on one side of the silhouette
                let corners = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
                let hits = corners
                    .iter()
                    .filter(|(dx, dy)| {
                        let u = (x as f32 + dx) / width as f32;
                        let v = (y as f32 + dy) / height as f32;
                        let ray = camera.ray(u, v, &mut rng);
                        world.intersection(ray, T_MIN, f32::INFINITY, &mut rng).is_some()
                    })
                    .count();

                if hits == corners.len() {
                    inside += 1;
                    assert_eq!(pixel, &[0, 0, 0], "pixel ({}, {})", x, row);
                } else if hits == 0 {
                    outside += 1;
                    let u = (x as f32 + 0.5) / width as f32;
                    let v = (y as f32 + 0.5) / height as f32;
                    let expected = quantize(Background::Sky.color(camera.ray(u, v, &mut rng)), 1.0, None);
                    for (&actual, &expected) in pixel.iter().zip(expected.iter()) {
                        assert!(
                            (actual as i32 - expected as i32).abs() <= 2,
                            "pixel ({}, {}): {:?} vs {:?}",
                            x,
                            row,
                            pixel,
                            expected
                        );
                    }
                }
            }
        }

        assert!(inside > 20);
        assert!(outside > 200);
    }
}
