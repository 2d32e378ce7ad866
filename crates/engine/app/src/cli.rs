//! Command line arguments for the viewer
//!
//! # Usage
//!
//! ```ignore
//! use app::cli::ViewerArgs;
//! use clap::Parser;
//!
//! let args = ViewerArgs::parse();
//! let config = ViewerConfig::load(args.config_path())?;
//! let runtime = args.apply_to(RuntimeConfig::from_config(&config));
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use scene::Preset;

/// Initial primitive preset
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresetArg {
    /// Cornell box lit by a ceiling area light
    #[default]
    AreaLight,
    /// Cornell box lit by three point lights
    ThreePointLights,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::AreaLight => Preset::CornellBoxAreaLight,
            PresetArg::ThreePointLights => Preset::CornellBoxThreePointLights,
        }
    }
}

/// Progressive path tracer viewer
#[derive(Parser, Debug, Clone)]
#[command(name = "pathtracer", version, about)]
pub struct ViewerArgs {
    /// Load viewer configuration from a TOML file
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Primitive preset shown at startup
    #[arg(long, short = 'p', value_enum, default_value_t = PresetArg::AreaLight)]
    pub preset: PresetArg,

    /// Render N frames, save the accumulated image and exit
    #[arg(long, value_name = "FRAMES")]
    pub debug: Option<u64>,

    /// Where debug mode writes the final frame
    #[arg(long, value_name = "PATH", default_value = "output/frame_last.png")]
    pub output: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ViewerArgs {
    /// Get the config path if specified
    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Apply debug-mode arguments to a runtime configuration
    #[cfg(feature = "runtime")]
    pub fn apply_to(&self, mut config: crate::RuntimeConfig) -> crate::RuntimeConfig {
        if let Some(frames) = self.debug {
            config = config.with_debug_mode(frames, self.output.clone());
        }
        config
    }
}
