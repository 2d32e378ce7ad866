//! Pinhole camera value
//!
//! The camera is described the way the shader module consumes it: a center,
//! a viewing direction, an up vector and a field of view. Direction and up are
//! normalized on construction. Orthogonality between them is left to the caller;
//! the shader re-derives an orthonormal basis from the two vectors.

use glam::{Quat, Vec3};

/// Distance of the default camera from the scene origin
pub const CAMERA_DISTANCE: f32 = 5.0;

/// Default field of view in radians
pub const CAMERA_FOV: f32 = 0.5;

/// Camera for the fragment-shader path tracer
///
/// # Coordinate System
///
/// Right-handed, +Y up. The default camera sits on +Z looking toward -Z, so
/// the open face of the Cornell box points at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    center: Vec3,
    direction: Vec3,
    fov: f32,
    up: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
            Vec3::NEG_Z,
            CAMERA_FOV,
            Vec3::Y,
        )
    }
}

impl Camera {
    /// Create a camera, normalizing `direction` and `up`
    pub fn new(center: Vec3, direction: Vec3, fov: f32, up: Vec3) -> Self {
        Self {
            center,
            direction: direction.normalize(),
            fov,
            up: up.normalize(),
        }
    }

    /// Create a camera at `center` looking at `target`
    pub fn look_at(center: Vec3, target: Vec3, fov: f32, up: Vec3) -> Self {
        Self::new(center, target - center, fov, up)
    }

    /// Camera location in world space
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Unit viewing direction
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Field of view in radians
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Unit up vector
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Right vector of the camera basis
    ///
    /// Returns zero when direction and up are parallel.
    pub fn right(&self) -> Vec3 {
        self.direction.cross(self.up).normalize_or_zero()
    }

    /// Return a copy with a different field of view
    pub fn with_fov(&self, fov: f32) -> Self {
        Self { fov, ..*self }
    }

    /// Rotate the whole camera (center, direction and up) about `pivot`
    ///
    /// Produces a new camera; `self` is left untouched.
    pub fn rotated_about(&self, pivot: Vec3, rotation: Quat) -> Self {
        Self::new(
            pivot + rotation * (self.center - pivot),
            rotation * self.direction,
            self.fov,
            rotation * self.up,
        )
    }

    /// Component-wise comparison with an absolute tolerance
    pub fn abs_diff_eq(&self, other: &Camera, max_abs_diff: f32) -> bool {
        self.center.abs_diff_eq(other.center, max_abs_diff)
            && self.direction.abs_diff_eq(other.direction, max_abs_diff)
            && self.up.abs_diff_eq(other.up, max_abs_diff)
            && (self.fov - other.fov).abs() <= max_abs_diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_normalizes_on_construction() {
        let camera =
            Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0), 1.0, Vec3::new(0.0, 2.0, 0.0));
        assert!((camera.direction().length() - 1.0).abs() < 1e-6);
        assert!((camera.up().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_camera_default_looks_down_negative_z() {
        let camera = Camera::default();
        assert_eq!(camera.center(), Vec3::new(0.0, 0.0, CAMERA_DISTANCE));
        assert_eq!(camera.direction(), Vec3::NEG_Z);
        assert_eq!(camera.up(), Vec3::Y);
        assert!((camera.fov() - CAMERA_FOV).abs() < 1e-6);
    }

    #[test]
    fn test_camera_right_vector() {
        let camera = Camera::default();
        assert!(camera.right().abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn test_camera_rotated_about_origin_keeps_distance() {
        let camera = Camera::default();
        let rotated = camera.rotated_about(Vec3::ZERO, Quat::from_rotation_y(0.7));

        assert!((rotated.center().length() - CAMERA_DISTANCE).abs() < 1e-5);
        // Still looking at the origin
        let to_origin = (-rotated.center()).normalize();
        assert!(rotated.direction().abs_diff_eq(to_origin, 1e-5));
        // Original untouched
        assert_eq!(camera, Camera::default());
    }

    #[test]
    fn test_camera_look_at() {
        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0, Vec3::Y);
        assert!(camera.direction().z < 0.0);
    }
}
