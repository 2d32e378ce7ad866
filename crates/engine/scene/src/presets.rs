//! Colours and preset primitive sets
//!
//! All presets live inside the `[-1, 1]³` Cornell box. Walls face inward and
//! are one-sided in the shader, so the default camera sees through the front
//! wall.

use glam::Vec3;

use crate::primitive::{Material, Plane, PointLight, Primitive, Sphere};

pub const RED: Vec3 = Vec3::new(1.0, 0.5, 0.5);
pub const GREEN: Vec3 = Vec3::new(0.5, 1.0, 0.5);
pub const BLUE: Vec3 = Vec3::new(0.5, 0.5, 1.0);
pub const WHITE: Vec3 = Vec3::new(0.95, 0.95, 0.95);
pub const YELLOW: Vec3 = Vec3::new(1.0, 1.0, 0.5);

/// Named primitive sets selectable from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preset {
    /// Standard walls, glass and mirror balls, one ceiling area light
    #[default]
    CornellBoxAreaLight,
    /// Colourful walls and balls lit by three point lights
    CornellBoxThreePointLights,
}

impl Preset {
    pub fn primitives(self) -> Vec<Primitive> {
        match self {
            Preset::CornellBoxAreaLight => cornell_box_area_light(),
            Preset::CornellBoxThreePointLights => cornell_box_three_point_lights(),
        }
    }
}

/// Six walls with per-wall colour and material
fn walls(colors: [Vec3; 6], materials: [Material; 6]) -> Vec<Primitive> {
    let layout = [
        (Vec3::X, Vec3::Y),     // left wall
        (Vec3::NEG_X, Vec3::Y), // right wall
        (Vec3::Y, Vec3::Z),     // floor
        (Vec3::NEG_Y, Vec3::Z), // ceiling
        (Vec3::Z, Vec3::Y),     // back wall
        (Vec3::NEG_Z, Vec3::Y), // front wall
    ];
    layout
        .iter()
        .zip(colors)
        .zip(materials)
        .map(|((&(normal, up), color), material)| {
            Plane::new(normal, -1.0, up, 1.0, color)
                .with_material(material)
                .into()
        })
        .collect()
}

pub fn walls_standard() -> Vec<Primitive> {
    walls([RED, BLUE, WHITE, WHITE, WHITE, WHITE], [Material::Diffuse; 6])
}

pub fn walls_colorful() -> Vec<Primitive> {
    walls([RED, BLUE, WHITE, WHITE, GREEN, YELLOW], [Material::Diffuse; 6])
}

pub fn walls_reflective() -> Vec<Primitive> {
    use Material::{Diffuse, Reflective};
    walls(
        [RED, BLUE, WHITE, WHITE, WHITE, WHITE],
        [Reflective, Reflective, Diffuse, Diffuse, Reflective, Reflective],
    )
}

/// Two balls resting on the floor
fn balls(right: (Vec3, Material), left: (Vec3, Material)) -> Vec<Primitive> {
    vec![
        Sphere::new(Vec3::new(0.55, -0.7, 0.1), 0.3, right.0)
            .with_material(right.1)
            .into(),
        Sphere::new(Vec3::new(-0.55, -0.7, -0.2), 0.3, left.0)
            .with_material(left.1)
            .into(),
    ]
}

pub fn balls_standard() -> Vec<Primitive> {
    balls((WHITE, Material::Diffuse), (WHITE, Material::Diffuse))
}

pub fn balls_colorful() -> Vec<Primitive> {
    balls((RED, Material::Diffuse), (BLUE, Material::Reflective))
}

pub fn balls_reflective() -> Vec<Primitive> {
    balls((WHITE, Material::Glass), (WHITE, Material::Reflective))
}

/// Square emitter just below the ceiling
pub fn lights_area() -> Vec<Primitive> {
    vec![
        Plane::new(Vec3::NEG_Y, -0.9999, Vec3::Z, 0.35, WHITE)
            .with_emittance(1.5)
            .into(),
    ]
}

pub fn lights_three_point() -> Vec<Primitive> {
    vec![
        PointLight::new(Vec3::new(0.5, 0.5, 0.5), WHITE, 0.6).into(), // light in corner
        PointLight::new(Vec3::new(0.0, 0.0, -0.3), WHITE, 0.3).into(), // halo light from behind
        PointLight::new(Vec3::new(-0.5, 0.0, 0.5), WHITE, 0.1).into(), // secondary light
    ]
}

pub fn cornell_box_area_light() -> Vec<Primitive> {
    let mut primitives = walls_standard();
    primitives.extend(balls_reflective());
    primitives.extend(lights_area());
    primitives
}

pub fn cornell_box_three_point_lights() -> Vec<Primitive> {
    let mut primitives = walls_colorful();
    primitives.extend(balls_colorful());
    primitives.extend(lights_three_point());
    primitives
}
