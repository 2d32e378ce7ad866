//! GPU side of the progressive path tracer
//!
//! # Modules
//!
//! - **program**: Program Lifecycle Manager. Compiles the shader module,
//!   resolves locations, allocates the quad and working textures
//! - **uniforms** / **locations**: Fixed-capacity uniform layout and name lookup
//! - **synchronizer**: Writes a [`scene::Scene`] into the uniform slots each frame
//! - **accumulation**: Readback and re-upload of the previous frame
//! - **render_loop**: Self-rescheduling tick with cancellable tokens
//! - **noise**: Background loading of the random-noise bitmap
//! - **target**: Traits the frame pipeline draws through
//!
//! Only [`program`] touches GL directly. The rest of the pipeline works against
//! the [`UniformSink`] and [`FrameTarget`] traits and runs without a context in
//! tests.

pub mod accumulation;
pub mod error;
pub mod locations;
pub mod noise;
pub mod program;
pub mod render_loop;
pub mod shader_utils;
pub mod synchronizer;
pub mod target;
pub mod uniforms;

pub use accumulation::AccumulationBuffer;
pub use error::{AssetError, RenderError, Result, ShaderStage};
pub use locations::LocationMap;
pub use noise::PendingNoise;
pub use program::{GlFrameTarget, GpuResources, GpuSettings};
pub use render_loop::{FrameScheduler, FrameToken, RenderLoop, RenderState, TickOutcome};
pub use synchronizer::FrameSynchronizer;
pub use target::{FrameTarget, UniformSink};
pub use uniforms::SceneUniforms;
