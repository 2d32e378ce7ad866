//! Seams between the frame pipeline and the GPU
//!
//! The synchronizer and render loop only ever talk to these traits. The glow
//! implementation lives in [`crate::program::GlFrameTarget`]; tests drive the
//! same code through recording fakes.

use glam::Vec3;

/// Destination for uniform writes
///
/// `None` locations are uniforms the compiler optimized away. Writes to them
/// are silently dropped, the same as GL does for a `-1` location.
pub trait UniformSink {
    /// Backend handle for one resolved uniform
    type Location;

    /// Bind the program the following writes apply to
    fn use_program(&mut self);

    fn set_f32(&mut self, location: Option<&Self::Location>, value: f32);

    fn set_i32(&mut self, location: Option<&Self::Location>, value: i32);

    fn set_vec3(&mut self, location: Option<&Self::Location>, value: Vec3);
}

/// A surface the render loop can draw into and read back from
pub trait FrameTarget: UniformSink {
    /// Issue the single full-screen draw call
    fn draw(&mut self);

    /// Read the `resolution²` RGBA8 pixels of the last draw into `pixels`
    fn read_pixels(&mut self, resolution: u32, pixels: &mut [u8]);

    /// Replace the contents of the previous-frame texture
    fn upload_previous_frame(&mut self, resolution: u32, pixels: &[u8]);
}
