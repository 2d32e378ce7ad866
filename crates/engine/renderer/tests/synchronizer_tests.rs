//! Uniform marshalling against a recording target

mod common;

use common::{Call, RecordingTarget, named_synchronizer};
use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use renderer::RenderError;
use scene::presets::{WHITE, lights_area, walls_standard};
use scene::{
    Camera, Capacity, Material, Plane, PointLight, Primitive, PrimitiveKind, RenderOptions, Scene,
    Sphere,
};

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn planes(count: usize) -> Vec<Primitive> {
    (0..count)
        .map(|i| Plane::new(Vec3::Y, -(i as f32), Vec3::Z, 1.0, WHITE).into())
        .collect()
}

#[test]
fn test_sync_writes_camera_and_frame_values() {
    let sync = named_synchronizer(&Capacity::default());
    let mut target = RecordingTarget::new();
    let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), Vec3::NEG_Z, 0.7, Vec3::Y);
    let scene = Scene::default()
        .with_camera(camera)
        .with_options(RenderOptions::new(false, true));

    sync.sync(&mut target, &scene, 4, &mut rng()).unwrap();

    assert_eq!(target.calls.first(), Some(&Call::UseProgram));
    assert_eq!(target.vec3("camera.center"), Some(Vec3::new(1.0, 2.0, 3.0)));
    assert_eq!(target.vec3("camera.direction"), Some(Vec3::NEG_Z));
    assert_eq!(target.f32("camera.fov"), Some(0.7));
    assert_eq!(target.vec3("camera.up"), Some(Vec3::Y));
    assert_eq!(target.i32("renderMode"), Some(RenderOptions::GLOBAL_BIT));
    assert_eq!(target.i32("frameIndex"), Some(4));
    assert_eq!(target.i32("randomNoise"), Some(0));
    assert_eq!(target.i32("prevFrame"), Some(1));
}

#[test]
fn test_seeds_are_independent_draws() {
    let sync = named_synchronizer(&Capacity::default());
    let mut target = RecordingTarget::new();
    let mut rng = rng();

    sync.sync(&mut target, &Scene::default(), 1, &mut rng).unwrap();
    let (a, b) = (target.f32("seed").unwrap(), target.f32("seed2").unwrap());
    assert_ne!(a, b);
    assert!((0.0..1.0).contains(&a) && (0.0..1.0).contains(&b));

    sync.sync(&mut target, &Scene::default(), 2, &mut rng).unwrap();
    assert_ne!(target.f32("seed"), Some(a));
}

#[test]
fn test_primitives_fill_slots_in_order() {
    let sync = named_synchronizer(&Capacity::new(4, 2, 2));
    let mut target = RecordingTarget::new();
    let scene = Scene::default().with_primitives(vec![
        Sphere::new(Vec3::new(0.5, 0.0, 0.0), 0.25, WHITE)
            .with_material(Material::Glass)
            .into(),
        Plane::new(Vec3::X, -1.0, Vec3::Y, 1.0, WHITE).into(),
        PointLight::new(Vec3::Y, WHITE, 0.4).into(),
        Plane::new(Vec3::NEG_Y, -0.5, Vec3::Z, 0.3, WHITE)
            .with_emittance(2.0)
            .into(),
    ]);

    sync.sync(&mut target, &scene, 1, &mut rng()).unwrap();

    assert_eq!(target.vec3("planes[0].normal"), Some(Vec3::X));
    assert_eq!(target.vec3("planes[1].normal"), Some(Vec3::NEG_Y));
    assert_eq!(target.f32("planes[1].sideLength"), Some(0.3));
    assert_eq!(target.f32("planes[1].emittance"), Some(2.0));
    assert_eq!(target.i32("planes[0].materialType"), Some(0));
    assert_eq!(target.f32("spheres[0].radius"), Some(0.25));
    assert_eq!(target.i32("spheres[0].materialType"), Some(2));
    assert_eq!(target.f32("pointLights[0].brightness"), Some(0.4));
}

#[test]
fn test_unused_slots_are_neutral() {
    let capacity = Capacity::default();
    let sync = named_synchronizer(&capacity);
    let mut target = RecordingTarget::new();
    let scene = Scene::default().with_primitives(planes(3));

    sync.sync(&mut target, &scene, 1, &mut rng()).unwrap();

    for i in 3..capacity.max_planes {
        assert_eq!(target.f32(&format!("planes[{i}].sideLength")), Some(0.0));
        assert_eq!(target.f32(&format!("planes[{i}].emittance")), Some(0.0));
    }
    for i in 0..capacity.max_spheres {
        assert_eq!(target.f32(&format!("spheres[{i}].radius")), Some(0.0));
    }
    for i in 0..capacity.max_lights {
        assert_eq!(target.f32(&format!("pointLights[{i}].brightness")), Some(0.0));
    }
}

#[test]
fn test_smaller_scene_clears_stale_slots() {
    let sync = named_synchronizer(&Capacity::default());
    let mut target = RecordingTarget::new();

    let full = Scene::default();
    sync.sync(&mut target, &full, 1, &mut rng()).unwrap();
    assert!(target.f32("spheres[1].radius").unwrap() > 0.0);
    assert!(target.f32("planes[6].sideLength").unwrap() > 0.0);

    let sparse = full.with_primitives(planes(2));
    sync.sync(&mut target, &sparse, 1, &mut rng()).unwrap();
    assert_eq!(target.f32("spheres[1].radius"), Some(0.0));
    assert_eq!(target.f32("planes[6].sideLength"), Some(0.0));
    assert_eq!(target.f32("planes[1].sideLength"), Some(1.0));
}

#[test]
fn test_capacity_exceeded_reports_kind_and_slot() {
    let sync = named_synchronizer(&Capacity::new(5, 5, 5));
    let mut target = RecordingTarget::new();
    let scene = Scene::default().with_primitives(planes(6));

    let err = sync.sync(&mut target, &scene, 1, &mut rng()).unwrap_err();

    match err {
        RenderError::CapacityExceeded {
            kind,
            attempted_index,
            capacity,
        } => {
            assert_eq!(kind, PrimitiveKind::Plane);
            assert_eq!(attempted_index, 5);
            assert_eq!(capacity, 5);
        }
        other => panic!("expected capacity error, got {other:?}"),
    }
    assert!(!target.calls.contains(&Call::Draw));
}

#[test]
fn test_capacity_checked_per_kind() {
    let sync = named_synchronizer(&Capacity::new(10, 1, 5));
    let mut target = RecordingTarget::new();
    let mut primitives = walls_standard();
    primitives.push(Sphere::new(Vec3::ZERO, 0.2, WHITE).into());
    primitives.push(Sphere::new(Vec3::X, 0.2, WHITE).into());

    let err = sync
        .sync(&mut target, &Scene::default().with_primitives(primitives), 1, &mut rng())
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::CapacityExceeded {
            kind: PrimitiveKind::Sphere,
            attempted_index: 1,
            ..
        }
    ));
}

#[test]
fn test_exactly_full_capacity_is_accepted() {
    let sync = named_synchronizer(&Capacity::new(7, 0, 0));
    let mut target = RecordingTarget::new();
    let mut primitives = walls_standard();
    primitives.extend(lights_area());

    sync.sync(&mut target, &Scene::default().with_primitives(primitives), 1, &mut rng())
        .unwrap();
    assert_eq!(target.f32("planes[6].emittance"), Some(1.5));
}
