use crate::camera::Camera;
use crate::capacity::PrimitiveCounts;
use crate::options::RenderOptions;
use crate::presets::Preset;
use crate::primitive::Primitive;

/// Complete description of what to render
///
/// Treated as an immutable value. The `with_*` methods return a new scene and
/// leave the receiver untouched; equality is structural, which is what the
/// render loop uses to decide whether accumulated frames are still valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    camera: Camera,
    primitives: Vec<Primitive>,
    options: RenderOptions,
}

impl Default for Scene {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl Scene {
    pub fn new(camera: Camera, primitives: Vec<Primitive>, options: RenderOptions) -> Self {
        Self {
            camera,
            primitives,
            options,
        }
    }

    /// Default camera and options with the primitives of `preset`
    pub fn from_preset(preset: Preset) -> Self {
        Self::new(Camera::default(), preset.primitives(), RenderOptions::default())
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn with_camera(&self, camera: Camera) -> Self {
        Self {
            camera,
            ..self.clone()
        }
    }

    pub fn with_primitives(&self, primitives: Vec<Primitive>) -> Self {
        Self {
            primitives,
            camera: self.camera,
            options: self.options,
        }
    }

    pub fn with_options(&self, options: RenderOptions) -> Self {
        Self {
            options,
            ..self.clone()
        }
    }

    /// Number of primitives of each kind
    pub fn counts(&self) -> PrimitiveCounts {
        let mut counts = PrimitiveCounts::default();
        for primitive in &self.primitives {
            counts.record(primitive.kind());
        }
        counts
    }
}
