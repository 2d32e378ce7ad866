//! Scene model for the progressive path tracer
//!
//! A [`Scene`] is an immutable value: camera, an ordered list of primitives and
//! the render options. Every interaction (camera drag, preset swap, toggle)
//! builds a new `Scene` instead of editing one in place, so the renderer can
//! tell whether accumulated frames are still valid by comparing values.
//!
//! # Modules
//!
//! - **camera**: Pinhole camera with normalized direction/up vectors
//! - **primitive**: Tagged primitive union (plane, sphere, point light) and materials
//! - **options**: Illumination toggles and their shader render-mode encoding
//! - **capacity**: Per-kind slot limits shared with the shader module
//! - **presets**: Colours and the Cornell box primitive sets

pub mod camera;
pub mod capacity;
pub mod options;
pub mod presets;
pub mod primitive;

mod scene;

pub use camera::{CAMERA_DISTANCE, CAMERA_FOV, Camera};
pub use capacity::{Capacity, PrimitiveCounts};
pub use options::RenderOptions;
pub use presets::Preset;
pub use primitive::{Material, Plane, PointLight, Primitive, PrimitiveKind, Sphere};
pub use scene::Scene;
