//! Scene primitives
//!
//! Three primitive kinds are understood by the shader module: finite planes,
//! spheres and point lights. [`Primitive`] is the tagged union over them;
//! consumers dispatch with an exhaustive `match`.

use std::fmt;

use glam::Vec3;

/// Surface material, written to the shader as an integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Material {
    /// Lambertian surface
    #[default]
    Diffuse,
    /// Perfect mirror
    Reflective,
    /// Refractive dielectric
    Glass,
}

impl Material {
    /// Integer code used by the `materialType` uniform
    pub fn code(self) -> i32 {
        match self {
            Material::Diffuse => 0,
            Material::Reflective => 1,
            Material::Glass => 2,
        }
    }
}

/// Finite square plane
///
/// Every point `v` on the infinite plane satisfies `dot(v, normal) = d`. The
/// square is centred on `normal * d`, oriented by `up`, and extends
/// `side_length` in each in-plane direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
    pub up: Vec3,
    pub side_length: f32,
    pub color: Vec3,
    pub material: Material,
    /// Emitted light strength; 0 is non-emissive
    pub emittance: f32,
}

impl Plane {
    /// Neutral slot value: zero side length, never intersected
    pub const EMPTY: Plane = Plane {
        normal: Vec3::ZERO,
        d: 0.0,
        up: Vec3::ZERO,
        side_length: 0.0,
        color: Vec3::ZERO,
        material: Material::Diffuse,
        emittance: 0.0,
    };

    /// Create a diffuse, non-emissive plane
    pub fn new(normal: Vec3, d: f32, up: Vec3, side_length: f32, color: Vec3) -> Self {
        Self {
            normal: normal.normalize(),
            d,
            up: up.normalize(),
            side_length,
            color,
            material: Material::Diffuse,
            emittance: 0.0,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Set emittance, clamped to be non-negative
    pub fn with_emittance(mut self, emittance: f32) -> Self {
        self.emittance = emittance.max(0.0);
        self
    }
}

/// Sphere primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub color: Vec3,
    pub material: Material,
    pub emittance: f32,
}

impl Sphere {
    /// Neutral slot value: zero radius, never intersected
    pub const EMPTY: Sphere = Sphere {
        center: Vec3::ZERO,
        radius: 0.0,
        color: Vec3::ZERO,
        material: Material::Diffuse,
        emittance: 0.0,
    };

    /// Create a diffuse, non-emissive sphere
    pub fn new(center: Vec3, radius: f32, color: Vec3) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive");
        Self {
            center,
            radius,
            color,
            material: Material::Diffuse,
            emittance: 0.0,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Set emittance, clamped to be non-negative
    pub fn with_emittance(mut self, emittance: f32) -> Self {
        self.emittance = emittance.max(0.0);
        self
    }
}

/// Point light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub origin: Vec3,
    pub color: Vec3,
    /// Brightness in `0.0..=1.0`
    pub brightness: f32,
}

impl PointLight {
    /// Neutral slot value: zero brightness, contributes nothing
    pub const EMPTY: PointLight = PointLight {
        origin: Vec3::ZERO,
        color: Vec3::ZERO,
        brightness: 0.0,
    };

    /// Create a point light; brightness is clamped to `0.0..=1.0`
    pub fn new(origin: Vec3, color: Vec3, brightness: f32) -> Self {
        Self {
            origin,
            color,
            brightness: brightness.clamp(0.0, 1.0),
        }
    }
}

/// Discriminant of [`Primitive`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Plane,
    Sphere,
    PointLight,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::Plane => "plane",
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::PointLight => "point light",
        };
        f.write_str(name)
    }
}

/// Any primitive the shader module can render
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Plane(Plane),
    Sphere(Sphere),
    PointLight(PointLight),
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Plane(_) => PrimitiveKind::Plane,
            Primitive::Sphere(_) => PrimitiveKind::Sphere,
            Primitive::PointLight(_) => PrimitiveKind::PointLight,
        }
    }
}

impl From<Plane> for Primitive {
    fn from(plane: Plane) -> Self {
        Primitive::Plane(plane)
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<PointLight> for Primitive {
    fn from(light: PointLight) -> Self {
        Primitive::PointLight(light)
    }
}
