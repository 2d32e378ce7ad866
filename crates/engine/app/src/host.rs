//! Host UI boundary
//!
//! [`SceneHost`] holds the most recently published scene and the last error
//! reported by the render loop. Pointer and keyboard input arrive here and
//! come out as whole new scenes; nothing edits a published scene in place.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use renderer::RenderError;
use scene::{Camera, Scene};

use crate::camera::{OrbitConfig, OrbitController};
use crate::controls::SceneCommand;

/// Bitmask of held pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1 << 0);
    pub const SECONDARY: Self = Self(1 << 1);
    pub const AUXILIARY: Self = Self(1 << 2);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

/// Current scene, last error and the input that replaces them
pub struct SceneHost {
    scene: Option<Arc<Scene>>,
    last_error: Option<RenderError>,
    home_camera: Camera,
    orbit: OrbitController,
    errors: Receiver<RenderError>,
}

impl SceneHost {
    /// Create an empty host and the sender the render loop reports through
    pub fn new(orbit: OrbitConfig, home_camera: Camera) -> (Self, Sender<RenderError>) {
        let (sender, errors) = mpsc::channel();
        let host = Self {
            scene: None,
            last_error: None,
            home_camera,
            orbit: OrbitController::new(orbit),
            errors,
        };
        (host, sender)
    }

    pub fn current_scene(&self) -> Option<&Arc<Scene>> {
        self.scene.as_ref()
    }

    pub fn last_error(&self) -> Option<&RenderError> {
        self.last_error.as_ref()
    }

    pub fn orbit(&self) -> &OrbitController {
        &self.orbit
    }

    /// Publish a new scene and clear the last reported error
    pub fn replace_scene(&mut self, scene: Scene) {
        self.scene = Some(Arc::new(scene));
        self.last_error = None;
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        if let Some(scene) = &self.scene {
            self.orbit.begin_drag(x, y, *scene.camera());
        }
    }

    /// Publish the orbited camera while a drag is active
    ///
    /// An empty `buttons` mask ends the drag.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, buttons: PointerButtons) {
        let Some(camera) = self.orbit.drag_to(x, y, !buttons.is_empty()) else {
            return;
        };
        if let Some(scene) = &self.scene {
            let moved = scene.with_camera(camera);
            self.replace_scene(moved);
        }
    }

    /// Apply a keyboard command to the current scene
    pub fn apply(&mut self, command: SceneCommand) {
        if let Some(scene) = &self.scene {
            let next = command.apply(scene, self.home_camera);
            tracing::debug!(?command, "scene command");
            self.replace_scene(next);
        }
    }

    /// Collect errors reported since the last call
    ///
    /// Returns how many arrived; the newest becomes [`Self::last_error`].
    pub fn drain_errors(&mut self) -> usize {
        let mut count = 0;
        while let Ok(err) = self.errors.try_recv() {
            // Recurring errors are logged once per published scene
            if self.last_error.is_none() {
                tracing::error!(error = %err, "render error");
            }
            self.last_error = Some(err);
            count += 1;
        }
        count
    }
}
