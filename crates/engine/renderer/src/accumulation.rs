//! Previous-frame ping-pong buffer
//!
//! After each draw the rendered pixels are read back into a scratch buffer
//! and re-uploaded into the texture the shader samples as `prevFrame` on the
//! next tick. The scratch buffer is sized once and owned here.

use image::RgbaImage;

use crate::target::FrameTarget;

const BYTES_PER_PIXEL: usize = 4;

/// Scratch pixels for the readback/upload handoff
#[derive(Debug, Clone)]
pub struct AccumulationBuffer {
    resolution: u32,
    pixels: Vec<u8>,
}

impl AccumulationBuffer {
    /// Blank buffer for a `resolution × resolution` RGBA8 surface
    pub fn new(resolution: u32) -> Self {
        let side = resolution as usize;
        Self {
            resolution,
            pixels: vec![0; side * side * BYTES_PER_PIXEL],
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Pixels of the most recent draw, bottom row first
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Read the last draw back and hand it to the next frame
    pub fn refresh<T: FrameTarget + ?Sized>(&mut self, target: &mut T) {
        target.read_pixels(self.resolution, &mut self.pixels);
        target.upload_previous_frame(self.resolution, &self.pixels);
    }

    /// Current contents as an image with the top row first
    pub fn to_image(&self) -> Option<RgbaImage> {
        let image = RgbaImage::from_raw(self.resolution, self.resolution, self.pixels.clone())?;
        Some(image::imageops::flip_vertical(&image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_sized_for_resolution() {
        let buffer = AccumulationBuffer::new(16);
        assert_eq!(buffer.resolution(), 16);
        assert_eq!(buffer.pixels().len(), 16 * 16 * 4);
        assert!(buffer.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_to_image_flips_rows() {
        let mut buffer = AccumulationBuffer::new(2);
        // Bottom row red, top row blue as GL stores it
        buffer.pixels = vec![
            255, 0, 0, 255, 255, 0, 0, 255, //
            0, 0, 255, 255, 0, 0, 255, 255,
        ];

        let image = buffer.to_image().unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [255, 0, 0, 255]);
    }
}
