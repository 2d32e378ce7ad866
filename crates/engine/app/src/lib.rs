//! Host application layer for the path tracer
//!
//! - [`SceneHost`]: holds the current scene and the last render error
//! - [`OrbitController`]: turns pointer drags into camera orbits
//! - [`ViewerConfig`] and [`ViewerArgs`]: TOML and command line configuration
//!
//! With the `runtime` feature enabled, [`run`] opens a window, creates the GL
//! context and drives the render loop from winit redraw requests.

pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod host;
pub mod logging;

// Runtime module (requires runtime feature)
#[cfg(feature = "runtime")]
mod runner;

pub use camera::{OrbitConfig, OrbitController};
pub use cli::{PresetArg, ViewerArgs};
pub use config::{ConfigError, ViewerConfig};
pub use controls::SceneCommand;
pub use host::{PointerButtons, SceneHost};
pub use logging::init_logging;

#[cfg(feature = "runtime")]
pub use runner::{
    create_event_loop, run, DebugMode, RedrawScheduler, RunError, RuntimeConfig, ViewerRuntime,
};
