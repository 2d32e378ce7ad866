//! Orbit camera controller
//!
//! Turns pointer drags into camera values. Every move is measured from the
//! pointer position and camera captured when the drag started, never from the
//! previous move, so only the net offset matters and repeated moves cannot
//! accumulate drift.
//!
//! # Components
//!
//! - [`OrbitConfig`]: Pixel-to-radian divisors and the orbit pivot
//! - [`DragState`]: Idle or dragging from a [`DragAnchor`]
//! - [`OrbitController`]: The state machine itself

use glam::{Quat, Vec3};
use scene::Camera;

/// Configuration for the orbit controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitConfig {
    /// Horizontal pixels per radian of yaw
    pub yaw_divisor: f32,
    /// Vertical pixels per radian of pitch
    pub pitch_divisor: f32,
    /// Point the camera orbits around
    pub pivot: Vec3,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            yaw_divisor: 20.0,
            pitch_divisor: 100.0,
            pivot: Vec3::ZERO,
        }
    }
}

/// Pointer position and camera at the start of a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    pub x: f32,
    pub y: f32,
    pub camera: Camera,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragAnchor),
}

/// Pointer-drag orbit controller
#[derive(Debug, Clone, Default)]
pub struct OrbitController {
    config: OrbitConfig,
    state: DragState,
}

impl OrbitController {
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Anchor a new drag at the pointer position and the current camera
    pub fn begin_drag(&mut self, x: f32, y: f32, camera: Camera) {
        self.state = DragState::Dragging(DragAnchor { x, y, camera });
    }

    pub fn end_drag(&mut self) {
        self.state = DragState::Idle;
    }

    /// Handle a pointer move
    ///
    /// Returns the camera to publish while a drag is active and a button is
    /// still held. A move without buttons ends the drag; moves while idle are
    /// ignored.
    pub fn drag_to(&mut self, x: f32, y: f32, buttons_held: bool) -> Option<Camera> {
        let DragState::Dragging(anchor) = self.state else {
            return None;
        };
        if !buttons_held {
            self.end_drag();
            return None;
        }
        Some(self.orbit(&anchor.camera, x - anchor.x, y - anchor.y))
    }

    /// Rotation for a pointer offset of `(dx, dy)` from `camera`
    ///
    /// Pitch turns about the camera's own right axis, then yaw turns about
    /// world up.
    pub fn rotation(&self, camera: &Camera, dx: f32, dy: f32) -> Quat {
        let theta = -dx / self.config.yaw_divisor;
        let phi = -dy / self.config.pitch_divisor;

        let yaw = Quat::from_rotation_y(theta);
        let right = camera.right();
        if right == Vec3::ZERO {
            return yaw;
        }
        yaw * Quat::from_axis_angle(right, phi)
    }

    /// Camera after orbiting `camera` by a pointer offset of `(dx, dy)`
    pub fn orbit(&self, camera: &Camera, dx: f32, dy: f32) -> Camera {
        camera.rotated_about(self.config.pivot, self.rotation(camera, dx, dy))
    }
}
