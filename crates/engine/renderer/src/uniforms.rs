//! Fixed-capacity uniform layout of the path tracing program
//!
//! Every primitive field is an individually named, indexed uniform
//! (`planes[3].sideLength`). The layout is resolved once after linking into
//! typed slot structs so per-frame writes never touch strings.

use scene::{Camera, Capacity, Plane, PointLight, Sphere};

use crate::locations::LocationMap;
use crate::target::UniformSink;

/// Clip-space quad position attribute
pub const POSITION_ATTRIBUTE: &str = "vertexPosition";

pub const ATTRIBUTE_NAMES: &[&str] = &[POSITION_ATTRIBUTE];

/// Texture unit sampled as `randomNoise`
pub const NOISE_TEXTURE_UNIT: u32 = 0;

/// Texture unit sampled as `prevFrame`
pub const PREVIOUS_FRAME_TEXTURE_UNIT: u32 = 1;

const CAMERA_FIELDS: &[&str] = &["center", "direction", "fov", "up"];
const LIGHT_FIELDS: &[&str] = &["origin", "color", "brightness"];
const PLANE_FIELDS: &[&str] = &[
    "normal",
    "d",
    "up",
    "sideLength",
    "color",
    "materialType",
    "emittance",
];
const SPHERE_FIELDS: &[&str] = &["center", "radius", "color", "materialType", "emittance"];
const SCALARS: &[&str] = &["seed", "seed2", "frameIndex", "renderMode", "randomNoise", "prevFrame"];

fn field(array: &str, index: usize, name: &str) -> String {
    format!("{array}[{index}].{name}")
}

/// Every uniform name the program declares for `capacity`
pub fn uniform_names(capacity: &Capacity) -> Vec<String> {
    let mut names: Vec<String> = CAMERA_FIELDS.iter().map(|f| format!("camera.{f}")).collect();
    for (array, count, fields) in [
        ("pointLights", capacity.max_lights, LIGHT_FIELDS),
        ("planes", capacity.max_planes, PLANE_FIELDS),
        ("spheres", capacity.max_spheres, SPHERE_FIELDS),
    ] {
        for index in 0..count {
            names.extend(fields.iter().map(|f| field(array, index, f)));
        }
    }
    names.extend(SCALARS.iter().map(|s| s.to_string()));
    names
}

#[derive(Debug, Clone)]
pub struct CameraUniforms<U> {
    center: Option<U>,
    direction: Option<U>,
    fov: Option<U>,
    up: Option<U>,
}

impl<U> CameraUniforms<U> {
    pub fn write<S: UniformSink<Location = U>>(&self, sink: &mut S, camera: &Camera) {
        sink.set_vec3(self.center.as_ref(), camera.center());
        sink.set_vec3(self.direction.as_ref(), camera.direction());
        sink.set_f32(self.fov.as_ref(), camera.fov());
        sink.set_vec3(self.up.as_ref(), camera.up());
    }
}

#[derive(Debug, Clone)]
pub struct PlaneSlot<U> {
    normal: Option<U>,
    d: Option<U>,
    up: Option<U>,
    side_length: Option<U>,
    color: Option<U>,
    material_type: Option<U>,
    emittance: Option<U>,
}

impl<U> PlaneSlot<U> {
    pub fn write<S: UniformSink<Location = U>>(&self, sink: &mut S, plane: &Plane) {
        sink.set_vec3(self.normal.as_ref(), plane.normal);
        sink.set_f32(self.d.as_ref(), plane.d);
        sink.set_vec3(self.up.as_ref(), plane.up);
        sink.set_f32(self.side_length.as_ref(), plane.side_length);
        sink.set_vec3(self.color.as_ref(), plane.color);
        sink.set_i32(self.material_type.as_ref(), plane.material.code());
        sink.set_f32(self.emittance.as_ref(), plane.emittance);
    }
}

#[derive(Debug, Clone)]
pub struct SphereSlot<U> {
    center: Option<U>,
    radius: Option<U>,
    color: Option<U>,
    material_type: Option<U>,
    emittance: Option<U>,
}

impl<U> SphereSlot<U> {
    pub fn write<S: UniformSink<Location = U>>(&self, sink: &mut S, sphere: &Sphere) {
        sink.set_vec3(self.center.as_ref(), sphere.center);
        sink.set_f32(self.radius.as_ref(), sphere.radius);
        sink.set_vec3(self.color.as_ref(), sphere.color);
        sink.set_i32(self.material_type.as_ref(), sphere.material.code());
        sink.set_f32(self.emittance.as_ref(), sphere.emittance);
    }
}

#[derive(Debug, Clone)]
pub struct LightSlot<U> {
    origin: Option<U>,
    color: Option<U>,
    brightness: Option<U>,
}

impl<U> LightSlot<U> {
    pub fn write<S: UniformSink<Location = U>>(&self, sink: &mut S, light: &PointLight) {
        sink.set_vec3(self.origin.as_ref(), light.origin);
        sink.set_vec3(self.color.as_ref(), light.color);
        sink.set_f32(self.brightness.as_ref(), light.brightness);
    }
}

/// All uniform locations of the program, grouped by what they describe
#[derive(Debug, Clone)]
pub struct SceneUniforms<U> {
    pub camera: CameraUniforms<U>,
    pub planes: Vec<PlaneSlot<U>>,
    pub spheres: Vec<SphereSlot<U>>,
    pub lights: Vec<LightSlot<U>>,
    pub seed: Option<U>,
    pub seed2: Option<U>,
    pub frame_index: Option<U>,
    pub render_mode: Option<U>,
    pub random_noise: Option<U>,
    pub prev_frame: Option<U>,
}

impl<U: Clone> SceneUniforms<U> {
    /// Group the resolved locations, with one slot per unit of `capacity`
    pub fn from_map<A>(map: &LocationMap<A, U>, capacity: &Capacity) -> Self {
        let get = |name: &str| map.uniform(name).cloned();

        Self {
            camera: CameraUniforms {
                center: get("camera.center"),
                direction: get("camera.direction"),
                fov: get("camera.fov"),
                up: get("camera.up"),
            },
            planes: (0..capacity.max_planes)
                .map(|i| PlaneSlot {
                    normal: get(&field("planes", i, "normal")),
                    d: get(&field("planes", i, "d")),
                    up: get(&field("planes", i, "up")),
                    side_length: get(&field("planes", i, "sideLength")),
                    color: get(&field("planes", i, "color")),
                    material_type: get(&field("planes", i, "materialType")),
                    emittance: get(&field("planes", i, "emittance")),
                })
                .collect(),
            spheres: (0..capacity.max_spheres)
                .map(|i| SphereSlot {
                    center: get(&field("spheres", i, "center")),
                    radius: get(&field("spheres", i, "radius")),
                    color: get(&field("spheres", i, "color")),
                    material_type: get(&field("spheres", i, "materialType")),
                    emittance: get(&field("spheres", i, "emittance")),
                })
                .collect(),
            lights: (0..capacity.max_lights)
                .map(|i| LightSlot {
                    origin: get(&field("pointLights", i, "origin")),
                    color: get(&field("pointLights", i, "color")),
                    brightness: get(&field("pointLights", i, "brightness")),
                })
                .collect(),
            seed: get("seed"),
            seed2: get("seed2"),
            frame_index: get("frameIndex"),
            render_mode: get("renderMode"),
            random_noise: get("randomNoise"),
            prev_frame: get("prevFrame"),
        }
    }
}

impl<U> SceneUniforms<U> {
    /// Slot counts this layout was built for
    pub fn capacity(&self) -> Capacity {
        Capacity::new(self.planes.len(), self.spheres.len(), self.lights.len())
    }
}
