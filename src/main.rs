use anyhow::{Context, Result};
use rand::SeedableRng;
use std::{convert::TryFrom, path::Path};
use tracer::{
    config::Config,
    integrator::{self, RenderSettings},
    scenes::{self, Textures},
    textures::TexelImage,
    DefaultRng,
};

fn load_texture(path: &Path) -> Result<TexelImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to open image: {:?}", path))?
        .to_rgb8();
    let (width, height) = image.dimensions();

    Ok(TexelImage {
        width: width as usize,
        height: height as usize,
        channels: 3,
        data: image.into_raw(),
    })
}

// Textures that fail to load are left out, scenes render them as a placeholder
fn load_textures(config: &Config) -> Textures {
    config
        .textures
        .iter()
        .filter_map(|(name, path)| match load_texture(path) {
            Ok(texture) => Some((name.clone(), texture)),
            Err(err) => {
                log::warn!("Texture {:?} not loaded: {:#}", name, err);
                None
            }
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load(&path).with_context(|| format!("Failed to load config: {:?}", path))?,
        None => Config::default(),
    };
    log::debug!("Rendering scene {:?}", config.scene);

    let mut rng = match config.seed {
        Some(seed) => DefaultRng::seed_from_u64(seed),
        None => DefaultRng::from_entropy(),
    };
    let textures = load_textures(&config);
    let setup = scenes::build(config.scene, config.aspect(), &textures, &mut rng);

    let settings = RenderSettings {
        background: setup.background,
        ..config.settings()
    };
    let buffer = integrator::render(&setup.camera, setup.world.as_ref(), &settings);

    let width = u32::try_from(settings.width).context("Image width does not fit in 32 bits")?;
    let height = u32::try_from(settings.height).context("Image height does not fit in 32 bits")?;
    image::save_buffer(&config.output, &buffer, width, height, image::ColorType::Rgb8)
        .with_context(|| format!("Failed to save image: {:?}", config.output))?;
    log::info!("Saved render to {:?}", config.output);

    Ok(())
}
