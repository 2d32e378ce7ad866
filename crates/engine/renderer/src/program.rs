//! GPU program lifecycle
//!
//! [`GpuResources`] owns every GL object the path tracer needs: the linked
//! program, the static full-screen quad and the two working textures. They are
//! created once against a live context and released with
//! [`GpuResources::destroy`]. Everything else borrows them through a
//! [`GlFrameTarget`].

use std::path::Path;

use glam::Vec3;
use glow::{
    Buffer, Context, HasContext, PixelPackData, PixelUnpackData, Program, Texture, UniformLocation,
    VertexArray,
};
use image::RgbaImage;
use scene::Capacity;

use crate::error::{RenderError, Result};
use crate::locations::{LocationMap, resolve_locations};
use crate::noise::{FALLBACK_NOISE_SEED, FALLBACK_NOISE_SIZE, PendingNoise, generate_noise};
use crate::shader_utils::{
    FRAGMENT_SHADER_SOURCE, VERTEX_SHADER_SOURCE, compile_and_link, inject_capacity,
};
use crate::synchronizer::FrameSynchronizer;
use crate::target::{FrameTarget, UniformSink};
use crate::uniforms::{
    ATTRIBUTE_NAMES, NOISE_TEXTURE_UNIT, POSITION_ATTRIBUTE, PREVIOUS_FRAME_TEXTURE_UNIT,
    SceneUniforms, uniform_names,
};

/// Clip-space corners of the full-screen quad
pub const QUAD_VERTICES: [f32; 8] = [-1.0, 1.0, 1.0, 1.0, -1.0, -1.0, 1.0, -1.0];

/// Two triangles over [`QUAD_VERTICES`]
pub const QUAD_INDICES: [u16; 6] = [1, 0, 2, 1, 2, 3];

/// Opaque black texel the noise texture holds until the bitmap arrives
const NOISE_PLACEHOLDER: [u8; 4] = [0, 0, 0, 255];

/// Settings for [`GpuResources::create`]
#[derive(Debug, Clone)]
pub struct GpuSettings<'a> {
    pub capacity: Capacity,
    pub resolution: u32,
    pub noise_path: Option<&'a Path>,
}

/// Vertex array with its quad buffers
#[derive(Debug)]
pub struct StaticGeometry {
    pub vao: VertexArray,
    pub vbo: Buffer,
    pub ibo: Buffer,
}

/// Noise and previous-frame textures
#[derive(Debug)]
pub struct WorkingTextures {
    pub noise: Texture,
    pub previous_frame: Texture,
}

/// All GL objects backing the path tracer
pub struct GpuResources {
    program: Program,
    geometry: StaticGeometry,
    textures: WorkingTextures,
    locations: LocationMap<u32, UniformLocation>,
    capacity: Capacity,
    resolution: u32,
    pending_noise: Option<PendingNoise>,
}

impl GpuResources {
    /// Compile, link, resolve and allocate everything
    ///
    /// # Safety
    /// Requires an active OpenGL 3.3+ context
    pub unsafe fn create(gl: &Context, settings: &GpuSettings<'_>) -> Result<Self> {
        unsafe {
            let fragment = inject_capacity(FRAGMENT_SHADER_SOURCE, &settings.capacity);
            let program = compile_and_link(gl, VERTEX_SHADER_SOURCE, &fragment)?;
            tracing::info!(
                planes = settings.capacity.max_planes,
                spheres = settings.capacity.max_spheres,
                lights = settings.capacity.max_lights,
                "path tracing program linked"
            );

            let names = uniform_names(&settings.capacity);
            let locations = resolve_locations(gl, program, ATTRIBUTE_NAMES, &names);

            let position = locations.attribute(POSITION_ATTRIBUTE).copied();
            let geometry = match allocate_static_geometry(gl, position) {
                Ok(geometry) => geometry,
                Err(e) => {
                    gl.delete_program(program);
                    return Err(e);
                }
            };

            let textures = match allocate_working_textures(gl, settings.resolution) {
                Ok(textures) => textures,
                Err(e) => {
                    geometry.destroy(gl);
                    gl.delete_program(program);
                    return Err(e);
                }
            };

            let pending_noise = settings.noise_path.map(|path| {
                tracing::debug!(path = %path.display(), "loading noise texture");
                PendingNoise::spawn(path)
            });

            let resources = Self {
                program,
                geometry,
                textures,
                locations,
                capacity: settings.capacity,
                resolution: settings.resolution,
                pending_noise,
            };
            if resources.pending_noise.is_none() {
                let fallback = generate_noise(FALLBACK_NOISE_SIZE, FALLBACK_NOISE_SEED);
                resources.upload_noise(gl, &fallback);
            }
            Ok(resources)
        }
    }

    /// Synchronizer bound to this program's uniform layout
    pub fn synchronizer(&self) -> FrameSynchronizer<UniformLocation> {
        FrameSynchronizer::new(SceneUniforms::from_map(&self.locations, &self.capacity))
    }

    /// Upload the noise bitmap if the loader has finished
    ///
    /// # Safety
    /// Requires the context these resources were created with to be current
    pub unsafe fn poll_noise(&mut self, gl: &Context) {
        let Some(pending) = &self.pending_noise else {
            return;
        };
        let Some(result) = pending.poll() else {
            return;
        };
        let path = pending.path().to_path_buf();
        self.pending_noise = None;

        let image = match result {
            Ok(image) => {
                tracing::info!(
                    path = %path.display(),
                    width = image.width(),
                    height = image.height(),
                    "noise texture loaded"
                );
                image
            }
            Err(e) => {
                tracing::warn!(error = %e, "noise texture unavailable, using generated noise");
                generate_noise(FALLBACK_NOISE_SIZE, FALLBACK_NOISE_SEED)
            }
        };
        unsafe { self.upload_noise(gl, &image) };
    }

    unsafe fn upload_noise(&self, gl: &Context, image: &RgbaImage) {
        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(self.textures.noise));
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                image.width() as i32,
                image.height() as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(image.as_raw().as_slice())),
            );
            gl.bind_texture(glow::TEXTURE_2D, None);
        }
    }

    /// Release every GL object
    ///
    /// # Safety
    /// Requires the context these resources were created with to be current
    pub unsafe fn destroy(self, gl: &Context) {
        unsafe {
            gl.delete_texture(self.textures.noise);
            gl.delete_texture(self.textures.previous_frame);
            self.geometry.destroy(gl);
            gl.delete_program(self.program);
        }
        tracing::debug!("GPU resources released");
    }
}

impl StaticGeometry {
    unsafe fn destroy(&self, gl: &Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vbo);
            gl.delete_buffer(self.ibo);
        }
    }
}

/// Upload the full-screen quad and bind it to the position attribute
///
/// # Safety
/// Requires an active OpenGL context
pub unsafe fn allocate_static_geometry(
    gl: &Context,
    position: Option<u32>,
) -> Result<StaticGeometry> {
    unsafe {
        let vao = gl
            .create_vertex_array()
            .map_err(|e| RenderError::Allocation(format!("vertex array: {e}")))?;
        let vbo = gl
            .create_buffer()
            .map_err(|e| RenderError::Allocation(format!("vertex buffer: {e}")))?;
        let ibo = gl
            .create_buffer()
            .map_err(|e| RenderError::Allocation(format!("index buffer: {e}")))?;

        gl.bind_vertex_array(Some(vao));

        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&QUAD_VERTICES),
            glow::STATIC_DRAW,
        );

        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(&QUAD_INDICES),
            glow::STATIC_DRAW,
        );

        match position {
            Some(index) => {
                gl.enable_vertex_attrib_array(index);
                gl.vertex_attrib_pointer_f32(index, 2, glow::FLOAT, false, 0, 0);
            }
            None => tracing::warn!("{POSITION_ATTRIBUTE} attribute is inactive"),
        }

        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        Ok(StaticGeometry { vao, vbo, ibo })
    }
}

unsafe fn create_texture(gl: &Context, wrap: u32, label: &str) -> Result<Texture> {
    unsafe {
        let texture = gl
            .create_texture()
            .map_err(|e| RenderError::Allocation(format!("{label} texture: {e}")))?;
        gl.bind_texture(glow::TEXTURE_2D, Some(texture));
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::NEAREST as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::NEAREST as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap as i32);
        gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap as i32);
        Ok(texture)
    }
}

/// Create the noise texture (1×1 placeholder) and the blank previous-frame texture
///
/// # Safety
/// Requires an active OpenGL context
pub unsafe fn allocate_working_textures(gl: &Context, resolution: u32) -> Result<WorkingTextures> {
    unsafe {
        let noise = create_texture(gl, glow::REPEAT, "noise")?;
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            1,
            1,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            PixelUnpackData::Slice(Some(&NOISE_PLACEHOLDER[..])),
        );

        let previous_frame = match create_texture(gl, glow::CLAMP_TO_EDGE, "previous frame") {
            Ok(texture) => texture,
            Err(e) => {
                gl.delete_texture(noise);
                return Err(e);
            }
        };
        let side = resolution as usize;
        let blank = vec![0u8; side * side * 4];
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            resolution as i32,
            resolution as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            PixelUnpackData::Slice(Some(blank.as_slice())),
        );
        gl.bind_texture(glow::TEXTURE_2D, None);

        tracing::debug!(resolution, "working textures allocated");
        Ok(WorkingTextures { noise, previous_frame })
    }
}

/// [`FrameTarget`] backed by a live GL context
pub struct GlFrameTarget<'a> {
    gl: &'a Context,
    resources: &'a GpuResources,
}

impl<'a> GlFrameTarget<'a> {
    /// # Safety
    /// `gl` must be current on this thread for the lifetime of the target and
    /// must be the context `resources` were created with
    pub unsafe fn new(gl: &'a Context, resources: &'a GpuResources) -> Self {
        Self { gl, resources }
    }
}

impl UniformSink for GlFrameTarget<'_> {
    type Location = UniformLocation;

    fn use_program(&mut self) {
        unsafe { self.gl.use_program(Some(self.resources.program)) };
    }

    fn set_f32(&mut self, location: Option<&UniformLocation>, value: f32) {
        unsafe { self.gl.uniform_1_f32(location, value) };
    }

    fn set_i32(&mut self, location: Option<&UniformLocation>, value: i32) {
        unsafe { self.gl.uniform_1_i32(location, value) };
    }

    fn set_vec3(&mut self, location: Option<&UniformLocation>, value: Vec3) {
        unsafe { self.gl.uniform_3_f32(location, value.x, value.y, value.z) };
    }
}

impl FrameTarget for GlFrameTarget<'_> {
    fn draw(&mut self) {
        let gl = self.gl;
        let resources = self.resources;
        let side = resources.resolution as i32;
        unsafe {
            gl.viewport(0, 0, side, side);

            gl.active_texture(glow::TEXTURE0 + NOISE_TEXTURE_UNIT);
            gl.bind_texture(glow::TEXTURE_2D, Some(resources.textures.noise));
            gl.active_texture(glow::TEXTURE0 + PREVIOUS_FRAME_TEXTURE_UNIT);
            gl.bind_texture(glow::TEXTURE_2D, Some(resources.textures.previous_frame));

            gl.bind_vertex_array(Some(resources.geometry.vao));
            gl.draw_elements(glow::TRIANGLES, QUAD_INDICES.len() as i32, glow::UNSIGNED_SHORT, 0);
            gl.bind_vertex_array(None);
        }
    }

    fn read_pixels(&mut self, resolution: u32, pixels: &mut [u8]) {
        let side = resolution as i32;
        unsafe {
            self.gl.read_pixels(
                0,
                0,
                side,
                side,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelPackData::Slice(Some(pixels)),
            );
        }
    }

    fn upload_previous_frame(&mut self, resolution: u32, pixels: &[u8]) {
        let side = resolution as i32;
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + PREVIOUS_FRAME_TEXTURE_UNIT);
            self.gl
                .bind_texture(glow::TEXTURE_2D, Some(self.resources.textures.previous_frame));
            self.gl.tex_sub_image_2d(
                glow::TEXTURE_2D,
                0,
                0,
                0,
                side,
                side,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(pixels)),
            );
        }
    }
}
