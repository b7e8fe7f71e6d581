//! Render configuration read from a TOML file.

use crate::{integrator::RenderSettings, scenes::SceneKind};
use serde::Deserialize;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scene: SceneKind,
    pub width: usize,
    pub height: usize,
    pub samples: usize,
    pub max_depth: u32,
    pub gamma: f32,
    pub exposure: Option<f32>,
    pub seed: Option<u64>,
    pub output: PathBuf,
    /// Image files by the name scenes refer to them with
    pub textures: HashMap<String, PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let settings = RenderSettings::default();

        Self {
            scene: SceneKind::default(),
            width: settings.width,
            height: settings.height,
            samples: settings.samples,
            max_depth: settings.max_depth,
            gamma: settings.gamma,
            exposure: settings.exposure,
            seed: settings.seed,
            output: PathBuf::from("output.png"),
            textures: HashMap::new(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples == 0 {
            return Err(ConfigError::Invalid("samples must be at least 1".into()));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        if !(self.gamma > 0.0) {
            return Err(ConfigError::Invalid(format!("gamma must be positive, got {}", self.gamma)));
        }
        if let Some(exposure) = self.exposure {
            if !(exposure > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "exposure must be positive, got {}",
                    exposure
                )));
            }
        }

        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Render settings for this config, the background comes from the scene
    pub fn settings(&self) -> RenderSettings {
        RenderSettings {
            width: self.width,
            height: self.height,
            samples: self.samples,
            max_depth: self.max_depth,
            gamma: self.gamma,
            exposure: self.exposure,
            seed: self.seed,
            ..RenderSettings::default()
        }
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(text: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        log::debug!("Loaded config: {:?}", config);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output, PathBuf::from("output.png"));
        assert_eq!(config.gamma, 2.0);
        assert_eq!(config.settings(), RenderSettings::default());
    }

    #[test]
    fn full_config_is_read() {
        let config: Config = r#"
            scene = "final_scene"
            width = 800
            height = 800
            samples = 10000
            max_depth = 50
            gamma = 2.2
            exposure = 1.5
            seed = 42
            output = "final.png"

            [textures]
            earth = "assets/earthmap.jpg"
        "#
        .parse()
        .unwrap();

        assert_eq!(config.scene, SceneKind::FinalScene);
        assert_eq!(config.aspect(), 1.0);
        assert_eq!(config.exposure, Some(1.5));
        assert_eq!(config.textures["earth"], PathBuf::from("assets/earthmap.jpg"));

        let settings = config.settings();
        assert_eq!(settings.samples, 10000);
        assert_eq!(settings.seed, Some(42));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for text in &[
            "width = 0",
            "samples = 0",
            "max_depth = 0",
            "gamma = 0.0",
            "gamma = -1.0",
            "exposure = 0.0",
        ] {
            match text.parse::<Config>() {
                Err(ConfigError::Invalid(_)) => {}
                other => panic!("{:?} gave {:?}", text, other),
            }
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!("scene = \"nowhere\"".parse::<Config>(), Err(ConfigError::Parse(_))));
        assert!(matches!("widht = 3".parse::<Config>(), Err(ConfigError::Parse(_))));
        assert!(matches!("width = ".parse::<Config>(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Config::load("does/not/exist.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
