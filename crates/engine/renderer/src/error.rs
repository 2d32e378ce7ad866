//! Error types for the renderer

use std::fmt;
use std::path::PathBuf;

use scene::PrimitiveKind;
use thiserror::Error;

/// Result type for renderer operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Shader pipeline stage, reported with compile failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// GL shader type constant for this stage
    pub fn gl_type(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Errors raised while setting up or driving the GPU program
#[derive(Error, Debug)]
pub enum RenderError {
    /// No usable GL context; rendering never begins
    #[error("GL context unavailable: {0}")]
    ContextUnavailable(String),

    /// A shader stage failed to compile
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    /// The compiled stages failed to link
    #[error("shader program failed to link: {log}")]
    Link { log: String },

    /// The scene holds more primitives of one kind than there are uniform slots
    #[error("too many {kind}s: slot {attempted_index} exceeds capacity of {capacity}")]
    CapacityExceeded {
        kind: PrimitiveKind,
        attempted_index: usize,
        capacity: usize,
    },

    /// A GL object could not be created
    #[error("GPU allocation failed: {0}")]
    Allocation(String),
}

impl RenderError {
    /// Whether the render loop may report this error and keep running
    ///
    /// Capacity, compile and link failures raised inside a tick only skip that
    /// tick's draw. Anything else terminates the loop.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RenderError::CapacityExceeded { .. }
                | RenderError::ShaderCompile { .. }
                | RenderError::Link { .. }
        )
    }
}

/// Errors loading the random-noise bitmap
///
/// Never fatal: the renderer falls back to generated noise.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("noise loader thread exited without a result")]
    LoaderGone,
}
