//! Scene to uniform marshalling
//!
//! [`FrameSynchronizer::sync`] writes a complete uniform state for one frame.
//! Uniform storage outlives the frame, so every slot not used by the current
//! scene is overwritten with a neutral primitive. Otherwise a scene with fewer
//! primitives than the previous one would still render the old ones.

use rand::Rng;
use scene::{Capacity, Plane, PointLight, Primitive, PrimitiveKind, Scene, Sphere};

use crate::error::{RenderError, Result};
use crate::target::UniformSink;
use crate::uniforms::{NOISE_TEXTURE_UNIT, PREVIOUS_FRAME_TEXTURE_UNIT, SceneUniforms};

/// Writes scenes into a resolved uniform layout
#[derive(Debug, Clone)]
pub struct FrameSynchronizer<U> {
    uniforms: SceneUniforms<U>,
}

impl<U> FrameSynchronizer<U> {
    pub fn new(uniforms: SceneUniforms<U>) -> Self {
        Self { uniforms }
    }

    pub fn capacity(&self) -> Capacity {
        self.uniforms.capacity()
    }

    /// Write `scene` and the per-frame values into `sink`
    ///
    /// Fails with [`RenderError::CapacityExceeded`] at the first primitive
    /// that has no free slot of its kind. Nothing is drawn by this call, so a
    /// failure leaves the caller free to skip the frame.
    pub fn sync<S, R>(
        &self,
        sink: &mut S,
        scene: &Scene,
        frame_index: u32,
        rng: &mut R,
    ) -> Result<()>
    where
        S: UniformSink<Location = U>,
        R: Rng + ?Sized,
    {
        let u = &self.uniforms;
        sink.use_program();

        u.camera.write(sink, scene.camera());

        // Two independent draws decorrelate the shader's sampling axes
        sink.set_f32(u.seed.as_ref(), rng.random::<f32>());
        sink.set_f32(u.seed2.as_ref(), rng.random::<f32>());

        sink.set_i32(u.render_mode.as_ref(), scene.options().render_mode());
        let frame_index = i32::try_from(frame_index).unwrap_or(i32::MAX);
        sink.set_i32(u.frame_index.as_ref(), frame_index);
        sink.set_i32(u.random_noise.as_ref(), NOISE_TEXTURE_UNIT as i32);
        sink.set_i32(u.prev_frame.as_ref(), PREVIOUS_FRAME_TEXTURE_UNIT as i32);

        let (mut planes, mut spheres, mut lights) = (0, 0, 0);
        for primitive in scene.primitives() {
            match primitive {
                Primitive::Plane(plane) => {
                    let slot = next_slot(&u.planes, &mut planes, PrimitiveKind::Plane)?;
                    slot.write(sink, plane);
                }
                Primitive::Sphere(sphere) => {
                    let slot = next_slot(&u.spheres, &mut spheres, PrimitiveKind::Sphere)?;
                    slot.write(sink, sphere);
                }
                Primitive::PointLight(light) => {
                    let slot = next_slot(&u.lights, &mut lights, PrimitiveKind::PointLight)?;
                    slot.write(sink, light);
                }
            }
        }

        for slot in &u.planes[planes..] {
            slot.write(sink, &Plane::EMPTY);
        }
        for slot in &u.spheres[spheres..] {
            slot.write(sink, &Sphere::EMPTY);
        }
        for slot in &u.lights[lights..] {
            slot.write(sink, &PointLight::EMPTY);
        }

        Ok(())
    }
}

/// Claim the next slot of one kind, advancing its running index
fn next_slot<'a, T>(slots: &'a [T], index: &mut usize, kind: PrimitiveKind) -> Result<&'a T> {
    let slot = slots.get(*index).ok_or(RenderError::CapacityExceeded {
        kind,
        attempted_index: *index,
        capacity: slots.len(),
    })?;
    *index += 1;
    Ok(slot)
}
