//! Per-kind slot limits
//!
//! The shader module declares fixed-size uniform arrays for each primitive
//! kind. [`Capacity`] is the single configured source of those sizes; the
//! renderer injects it into the shader source and checks scenes against it.

use crate::primitive::PrimitiveKind;

/// Maximum number of active primitives per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capacity {
    pub max_planes: usize,
    pub max_spheres: usize,
    pub max_lights: usize,
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            max_planes: 10,
            max_spheres: 5,
            max_lights: 5,
        }
    }
}

impl Capacity {
    pub fn new(max_planes: usize, max_spheres: usize, max_lights: usize) -> Self {
        Self {
            max_planes,
            max_spheres,
            max_lights,
        }
    }

    /// Slot count for one primitive kind
    pub fn max_for(&self, kind: PrimitiveKind) -> usize {
        match kind {
            PrimitiveKind::Plane => self.max_planes,
            PrimitiveKind::Sphere => self.max_spheres,
            PrimitiveKind::PointLight => self.max_lights,
        }
    }

    /// Whether every count fits in its slot array
    pub fn fits(&self, counts: &PrimitiveCounts) -> bool {
        counts.planes <= self.max_planes
            && counts.spheres <= self.max_spheres
            && counts.lights <= self.max_lights
    }
}

/// Number of primitives of each kind in a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimitiveCounts {
    pub planes: usize,
    pub spheres: usize,
    pub lights: usize,
}

impl PrimitiveCounts {
    pub fn get(&self, kind: PrimitiveKind) -> usize {
        match kind {
            PrimitiveKind::Plane => self.planes,
            PrimitiveKind::Sphere => self.spheres,
            PrimitiveKind::PointLight => self.lights,
        }
    }

    /// Count one more primitive of `kind`
    pub fn record(&mut self, kind: PrimitiveKind) {
        match kind {
            PrimitiveKind::Plane => self.planes += 1,
            PrimitiveKind::Sphere => self.spheres += 1,
            PrimitiveKind::PointLight => self.lights += 1,
        }
    }
}
