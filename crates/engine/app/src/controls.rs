//! Keyboard scene commands
//!
//! Each command maps the current scene to a new one. The host publishes the
//! result as a wholesale replacement, which resets accumulation.

use scene::{Camera, Preset, Scene};
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    /// Swap the primitive list for a preset's
    LoadPreset(Preset),
    ToggleDirectIllumination,
    ToggleGlobalIllumination,
    /// Return to the configured starting camera
    ResetCamera,
}

impl SceneCommand {
    /// Key binding, if any
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Digit1 => Some(Self::LoadPreset(Preset::CornellBoxAreaLight)),
            KeyCode::Digit2 => Some(Self::LoadPreset(Preset::CornellBoxThreePointLights)),
            KeyCode::KeyD => Some(Self::ToggleDirectIllumination),
            KeyCode::KeyG => Some(Self::ToggleGlobalIllumination),
            KeyCode::KeyR => Some(Self::ResetCamera),
            _ => None,
        }
    }

    pub fn apply(self, scene: &Scene, home_camera: Camera) -> Scene {
        match self {
            Self::LoadPreset(preset) => scene.with_primitives(preset.primitives()),
            Self::ToggleDirectIllumination => scene.with_options(scene.options().toggled_direct()),
            Self::ToggleGlobalIllumination => scene.with_options(scene.options().toggled_global()),
            Self::ResetCamera => scene.with_camera(home_camera),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            SceneCommand::from_key(KeyCode::Digit2),
            Some(SceneCommand::LoadPreset(Preset::CornellBoxThreePointLights))
        );
        assert_eq!(
            SceneCommand::from_key(KeyCode::KeyG),
            Some(SceneCommand::ToggleGlobalIllumination)
        );
        assert_eq!(SceneCommand::from_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_toggles_produce_new_scene() {
        let scene = Scene::default();
        let toggled = SceneCommand::ToggleDirectIllumination.apply(&scene, Camera::default());

        assert!(!toggled.options().direct_illumination);
        assert!(toggled.options().global_illumination);
        assert!(scene.options().direct_illumination);
    }

    #[test]
    fn test_preset_keeps_camera() {
        let camera = Camera::look_at(Vec3::new(3.0, 1.0, 3.0), Vec3::ZERO, 0.5, Vec3::Y);
        let scene = Scene::default().with_camera(camera);

        let swapped = SceneCommand::LoadPreset(Preset::CornellBoxThreePointLights)
            .apply(&scene, Camera::default());
        assert_eq!(*swapped.camera(), camera);
        assert_eq!(swapped.counts().lights, 3);
    }

    #[test]
    fn test_reset_camera() {
        let moved = Camera::look_at(Vec3::ONE, Vec3::ZERO, 0.5, Vec3::Y);
        let scene = Scene::default().with_camera(moved);
        let home = Camera::default().with_fov(0.6);
        assert_eq!(*SceneCommand::ResetCamera.apply(&scene, home).camera(), home);
    }
}
