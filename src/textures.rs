use crate::{perlin::Perlin, DefaultRng};
use glam::{vec3, Vec3};
use std::sync::Arc;

/// Sampled when an image texture has no usable texel data
pub const MISSING_TEXTURE: Vec3 = Vec3::new(0.0, 1.0, 1.0);

/// A color field over surface coordinates and world position
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, point: Vec3) -> Vec3;
}

/// A texture with a constant uniform color
pub struct SolidColor {
    color: Vec3,
}

impl SolidColor {
    pub fn new(color: Vec3) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _point: Vec3) -> Vec3 {
        self.color
    }
}

/// A 3D checker pattern alternating between two textures
pub struct CheckerTexture {
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self { even, odd }
    }

    pub fn from_colors(even: Vec3, odd: Vec3) -> Self {
        Self::new(
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, point: Vec3) -> Vec3 {
        let sines = f32::sin(10.0 * point.x) * f32::sin(10.0 * point.y) * f32::sin(10.0 * point.z);

        if sines < 0.0 {
            self.odd.value(u, v, point)
        } else {
            self.even.value(u, v, point)
        }
    }
}

/// How a noise texture turns Perlin noise into a gray level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoisePattern {
    /// Plain noise remapped to [0, 1]
    Smooth,
    /// Summed octaves of noise
    Turbulence,
    /// Sine stripes along Z, phase shifted by turbulence
    Marble,
}

pub struct NoiseTexture {
    noise: Perlin,
    scale: f32,
    pattern: NoisePattern,
}

impl NoiseTexture {
    const TURBULENCE_DEPTH: usize = 7;

    pub fn new(scale: f32, pattern: NoisePattern, rng: &mut DefaultRng) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
            pattern,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, point: Vec3) -> Vec3 {
        let gray = match self.pattern {
            NoisePattern::Smooth => 0.5 * (1.0 + self.noise.noise(self.scale * point)),
            NoisePattern::Turbulence => self
                .noise
                .turbulence(self.scale * point, Self::TURBULENCE_DEPTH),
            NoisePattern::Marble => {
                let turbulence = self.noise.turbulence(point, Self::TURBULENCE_DEPTH);
                0.5 * (1.0 + f32::sin(self.scale * point.z + 10.0 * turbulence))
            }
        };

        Vec3::splat(gray)
    }
}

/// Decoded image data as handed over by an image loader
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TexelImage {
    pub width: usize,
    pub height: usize,
    /// Bytes per texel, the first three are read as RGB
    pub channels: usize,
    /// Row major, top row first
    pub data: Vec<u8>,
}

impl TexelImage {
    fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.channels >= 3
            && self
                .width
                .checked_mul(self.height)
                .and_then(|n| n.checked_mul(self.channels))
                .map_or(false, |len| self.data.len() >= len)
    }
}

/// Nearest texel lookup into an image, `MISSING_TEXTURE` when there is none
pub struct ImageTexture {
    image: Option<TexelImage>,
}

impl ImageTexture {
    pub fn new(image: TexelImage) -> Self {
        if image.is_valid() {
            Self { image: Some(image) }
        } else {
            log::warn!(
                "Unusable texel data ({}x{}, {} channels, {} bytes), falling back to a placeholder",
                image.width,
                image.height,
                image.channels,
                image.data.len()
            );
            Self::missing()
        }
    }

    /// A texture for an image that failed to load
    pub fn missing() -> Self {
        Self { image: None }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _point: Vec3) -> Vec3 {
        let image = match &self.image {
            Some(image) => image,
            None => return MISSING_TEXTURE,
        };

        // Image rows run top to bottom while v runs bottom to top
        let u = u.max(0.0).min(1.0);
        let v = 1.0 - v.max(0.0).min(1.0);

        let i = ((u * image.width as f32) as usize).min(image.width - 1);
        let j = ((v * image.height as f32) as usize).min(image.height - 1);
        let offset = (j * image.width + i) * image.channels;

        let scale = 1.0 / 255.0;
        vec3(
            image.data[offset] as f32 * scale,
            image.data[offset + 1] as f32 * scale,
            image.data[offset + 2] as f32 * scale,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn checker_switches_where_the_sine_product_flips() {
        let even = vec3(1.0, 1.0, 1.0);
        let odd = vec3(0.0, 0.0, 1.0);
        let checker = CheckerTexture::from_colors(even, odd);

        assert_eq!(checker.value(0.0, 0.0, Vec3::ZERO), even);
        assert_eq!(checker.value(0.0, 0.0, vec3(0.05, 0.05, 0.05)), even);
        // sin(10x) turns negative past x = pi / 10
        assert_eq!(checker.value(0.0, 0.0, vec3(0.4, 0.05, 0.05)), odd);
        assert_eq!(checker.value(0.0, 0.0, vec3(0.4, 0.4, 0.05)), even);
    }

    #[test]
    fn checker_ignores_surface_coordinates() {
        let checker = CheckerTexture::from_colors(Vec3::ONE, Vec3::ZERO);
        let p = vec3(0.4, 0.05, 0.05);
        assert_eq!(checker.value(0.0, 0.0, p), checker.value(0.9, 0.3, p));
    }

    #[test]
    fn noise_patterns_stay_in_gray_range() {
        let mut rng = DefaultRng::seed_from_u64(8);
        for &pattern in &[
            NoisePattern::Smooth,
            NoisePattern::Turbulence,
            NoisePattern::Marble,
        ] {
            let texture = NoiseTexture::new(4.0, pattern, &mut rng);
            for i in 0..50 {
                let p = vec3(i as f32 * 0.13, 1.7, i as f32 * -0.29);
                let c = texture.value(0.0, 0.0, p);
                assert_eq!(c.x, c.y);
                assert_eq!(c.y, c.z);
                assert!(c.x >= 0.0);
            }
        }
    }

    fn two_by_two() -> TexelImage {
        // Top row red, green. Bottom row blue, white
        TexelImage {
            width: 2,
            height: 2,
            channels: 3,
            data: vec![
                255, 0, 0, 0, 255, 0, //
                0, 0, 255, 255, 255, 255,
            ],
        }
    }

    #[test]
    fn image_lookup_flips_v() {
        let texture = ImageTexture::new(two_by_two());
        assert_eq!(texture.value(0.1, 0.9, Vec3::ZERO), vec3(1.0, 0.0, 0.0));
        assert_eq!(texture.value(0.9, 0.9, Vec3::ZERO), vec3(0.0, 1.0, 0.0));
        assert_eq!(texture.value(0.1, 0.1, Vec3::ZERO), vec3(0.0, 0.0, 1.0));
        assert_eq!(texture.value(0.9, 0.1, Vec3::ZERO), vec3(1.0, 1.0, 1.0));
    }

    #[test]
    fn image_lookup_clamps_coordinates() {
        let texture = ImageTexture::new(two_by_two());
        assert_eq!(texture.value(-3.0, 7.0, Vec3::ZERO), vec3(1.0, 0.0, 0.0));
        assert_eq!(texture.value(1.0, 0.0, Vec3::ZERO), vec3(1.0, 1.0, 1.0));
    }

    #[test]
    fn image_lookup_skips_extra_channels() {
        let texture = ImageTexture::new(TexelImage {
            width: 1,
            height: 1,
            channels: 4,
            data: vec![0, 255, 0, 128],
        });
        assert_eq!(texture.value(0.5, 0.5, Vec3::ZERO), vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn bad_texel_data_falls_back_to_cyan() {
        let short = TexelImage {
            width: 4,
            height: 4,
            channels: 3,
            data: vec![0; 10],
        };
        assert_eq!(ImageTexture::new(short).value(0.5, 0.5, Vec3::ZERO), MISSING_TEXTURE);
        assert_eq!(ImageTexture::missing().value(0.5, 0.5, Vec3::ZERO), MISSING_TEXTURE);
    }
}
