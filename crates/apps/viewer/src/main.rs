//! Progressive path tracer viewer
//!
//! Opens a square window on a Cornell box and refines the image every frame
//! until the scene changes. Drag with the left button to orbit, press `1`/`2`
//! to switch presets, `D`/`G` to toggle direct and global illumination and
//! `R` to reset the camera.
//!
//! Use `--config <path>` to load a TOML configuration and `--debug <N>` to
//! render N frames, save the result and exit.

use anyhow::Context;
use app::{init_logging, run, RuntimeConfig, ViewerArgs, ViewerConfig};
use clap::Parser;
use scene::{Preset, Scene};

fn main() -> anyhow::Result<()> {
    let args = ViewerArgs::parse();
    init_logging(&args.log_level);

    let config = ViewerConfig::load(args.config_path()).context("loading viewer configuration")?;
    let runtime = args.apply_to(RuntimeConfig::from_config(&config));

    if let Some(debug_mode) = &runtime.debug_mode {
        tracing::info!(frames = debug_mode.frames, output = %debug_mode.output_path.display(), "debug mode");
    }

    let preset = Preset::from(args.preset);
    let scene = Scene::from_preset(preset).with_camera(runtime.home_camera);
    tracing::info!(?preset, resolution = runtime.resolution, "starting viewer");

    run(runtime, scene).context("viewer stopped with an error")?;
    Ok(())
}
