//! Viewer configuration loaded from TOML
//!
//! Every section and field has a default, so an empty file (or no file at
//! all) yields a working configuration.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;
use thiserror::Error;

use scene::{Camera, Capacity, CAMERA_DISTANCE, CAMERA_FOV};

use crate::camera::OrbitConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Configuration loaded from a viewer TOML file
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub camera: CameraConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub gl_major: u8,
    pub gl_minor: u8,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Path Tracer".to_string(),
            gl_major: 3,
            gl_minor: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Side length of the square render target in pixels
    pub resolution: u32,
    pub max_planes: usize,
    pub max_spheres: usize,
    pub max_lights: usize,
    /// Bitmap seeding the random-noise texture; generated noise when unset
    pub noise_texture: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let capacity = Capacity::default();
        Self {
            resolution: 720,
            max_planes: capacity.max_planes,
            max_spheres: capacity.max_spheres,
            max_lights: capacity.max_lights,
            noise_texture: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Horizontal drag pixels per radian (K_theta)
    pub yaw_divisor: f32,
    /// Vertical drag pixels per radian (K_phi)
    pub pitch_divisor: f32,
    /// Starting distance from the origin along +Z
    pub distance: f32,
    /// Field of view in radians
    pub fov: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let orbit = OrbitConfig::default();
        Self {
            yaw_divisor: orbit.yaw_divisor,
            pitch_divisor: orbit.pitch_divisor,
            distance: CAMERA_DISTANCE,
            fov: CAMERA_FOV,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from `path`, or defaults when `None`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.resolution == 0 {
            return Err(ConfigError::Invalid("render.resolution must be positive".into()));
        }
        if self.camera.yaw_divisor == 0.0 || self.camera.pitch_divisor == 0.0 {
            return Err(ConfigError::Invalid("camera divisors must be non-zero".into()));
        }
        Ok(())
    }

    pub fn capacity(&self) -> Capacity {
        Capacity::new(self.render.max_planes, self.render.max_spheres, self.render.max_lights)
    }

    pub fn orbit(&self) -> OrbitConfig {
        OrbitConfig {
            yaw_divisor: self.camera.yaw_divisor,
            pitch_divisor: self.camera.pitch_divisor,
            pivot: Vec3::ZERO,
        }
    }

    /// Starting camera, also the target of a camera reset
    pub fn home_camera(&self) -> Camera {
        Camera::new(
            Vec3::new(0.0, 0.0, self.camera.distance),
            Vec3::NEG_Z,
            self.camera.fov,
            Vec3::Y,
        )
    }
}
