//! Progressive render loop
//!
//! One tick per display refresh: synchronize uniforms, draw, read back into
//! the accumulation buffer, advance the frame index. Each tick schedules the
//! next one through a [`FrameScheduler`] and the loop holds exactly one
//! pending [`FrameToken`], cancelled on stop, restart and drop.

use std::sync::Arc;
use std::sync::mpsc::Sender;

use rand::SeedableRng;
use rand::rngs::StdRng;
use scene::Scene;

use crate::accumulation::AccumulationBuffer;
use crate::error::{RenderError, Result};
use crate::synchronizer::FrameSynchronizer;
use crate::target::FrameTarget;

/// Handle for one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// Source of display-refresh callbacks
pub trait FrameScheduler {
    /// Request one tick at the next refresh
    fn schedule(&mut self) -> FrameToken;

    /// Withdraw a previously scheduled tick
    fn cancel(&mut self, token: FrameToken);
}

/// Frame counter keyed on scene identity
///
/// The counter resets to 1 whenever the observed scene differs by value from
/// the previous one, or when the viewport is invalidated.
#[derive(Debug, Clone)]
pub struct RenderState {
    frame_index: u32,
    last_scene: Option<Arc<Scene>>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    pub fn new() -> Self {
        Self {
            frame_index: 1,
            last_scene: None,
        }
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Record the scene about to be drawn; returns true if accumulation reset
    pub fn observe(&mut self, scene: &Arc<Scene>) -> bool {
        let unchanged = self
            .last_scene
            .as_ref()
            .is_some_and(|last| Arc::ptr_eq(last, scene) || **last == **scene);
        if unchanged {
            return false;
        }
        self.last_scene = Some(Arc::clone(scene));
        self.frame_index = 1;
        true
    }

    /// Count one completed frame
    pub fn advance(&mut self) {
        self.frame_index = self.frame_index.saturating_add(1);
    }

    /// Discard accumulation, e.g. after a resize
    pub fn invalidate(&mut self) {
        self.frame_index = 1;
        self.last_scene = None;
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The token was cancelled or superseded; nothing ran
    Stale,
    /// No scene yet; the next tick is scheduled anyway
    Idle,
    /// A frame was drawn; `frame_index` is the index for the next frame
    Rendered { frame_index: u32 },
    /// A recoverable error was reported and the draw skipped
    Skipped,
}

/// Drives ticks against a [`FrameTarget`]
pub struct RenderLoop<S: FrameScheduler, U> {
    scheduler: S,
    pending: Option<FrameToken>,
    synchronizer: FrameSynchronizer<U>,
    accumulation: AccumulationBuffer,
    state: RenderState,
    rng: StdRng,
    errors: Sender<RenderError>,
}

impl<S: FrameScheduler, U> RenderLoop<S, U> {
    /// Create a stopped loop; recoverable errors are sent to `errors`
    pub fn new(
        scheduler: S,
        synchronizer: FrameSynchronizer<U>,
        resolution: u32,
        errors: Sender<RenderError>,
    ) -> Self {
        Self {
            scheduler,
            pending: None,
            synchronizer,
            accumulation: AccumulationBuffer::new(resolution),
            state: RenderState::new(),
            rng: StdRng::from_os_rng(),
            errors,
        }
    }

    /// Use a deterministic seed stream
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Schedule the first tick, cancelling any tick still pending
    pub fn start(&mut self) {
        self.cancel_pending();
        self.pending = Some(self.scheduler.schedule());
        tracing::debug!("render loop started");
    }

    /// Cancel the pending tick
    pub fn stop(&mut self) {
        self.cancel_pending();
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn frame_index(&self) -> u32 {
        self.state.frame_index()
    }

    pub fn accumulation(&self) -> &AccumulationBuffer {
        &self.accumulation
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Reset accumulation after a viewport change
    pub fn invalidate(&mut self) {
        self.state.invalidate();
    }

    /// Run the tick identified by `token`
    ///
    /// Recoverable errors are reported through the error channel and the
    /// loop keeps going. Any other error stops the loop and is returned.
    pub fn tick<T>(
        &mut self,
        token: FrameToken,
        target: &mut T,
        scene: Option<&Arc<Scene>>,
    ) -> Result<TickOutcome>
    where
        T: FrameTarget<Location = U>,
    {
        if self.pending != Some(token) {
            return Ok(TickOutcome::Stale);
        }
        self.pending = None;

        let Some(scene) = scene else {
            self.reschedule();
            return Ok(TickOutcome::Idle);
        };

        if self.state.observe(scene) {
            tracing::debug!("scene changed, accumulation reset");
        }

        let frame_index = self.state.frame_index();
        if let Err(err) = self.synchronizer.sync(target, scene, frame_index, &mut self.rng) {
            if !err.is_recoverable() {
                tracing::error!(error = %err, "render loop stopped");
                return Err(err);
            }
            self.report(err);
            self.reschedule();
            return Ok(TickOutcome::Skipped);
        }

        target.draw();
        self.accumulation.refresh(target);
        self.state.advance();
        self.reschedule();

        Ok(TickOutcome::Rendered {
            frame_index: self.state.frame_index(),
        })
    }

    fn report(&self, err: RenderError) {
        tracing::warn!(error = %err, "frame skipped");
        if self.errors.send(err).is_err() {
            tracing::debug!("error receiver dropped");
        }
    }

    fn reschedule(&mut self) {
        self.pending = Some(self.scheduler.schedule());
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
        }
    }
}

impl<S: FrameScheduler, U> Drop for RenderLoop<S, U> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene::{Camera, RenderOptions};

    #[test]
    fn test_state_starts_at_one() {
        assert_eq!(RenderState::new().frame_index(), 1);
    }

    #[test]
    fn test_same_scene_keeps_counting() {
        let mut state = RenderState::new();
        let scene = Arc::new(Scene::default());

        assert!(state.observe(&scene));
        state.advance();
        assert!(!state.observe(&scene));
        state.advance();

        // A distinct allocation of an equal value is the same scene
        assert!(!state.observe(&Arc::new(Scene::default())));
        assert_eq!(state.frame_index(), 3);
    }

    #[test]
    fn test_changed_scene_resets() {
        let mut state = RenderState::new();
        let scene = Arc::new(Scene::default());
        state.observe(&scene);
        state.advance();
        state.advance();

        let moved = Arc::new(scene.with_camera(Camera::look_at(
            glam::Vec3::new(1.0, 0.0, 5.0),
            glam::Vec3::ZERO,
            0.5,
            glam::Vec3::Y,
        )));
        assert!(state.observe(&moved));
        assert_eq!(state.frame_index(), 1);

        state.advance();
        let toggled = Arc::new(moved.with_options(RenderOptions::default().toggled_direct()));
        assert!(state.observe(&toggled));
        assert_eq!(state.frame_index(), 1);
    }

    #[test]
    fn test_invalidate_forces_reset() {
        let mut state = RenderState::new();
        let scene = Arc::new(Scene::default());
        state.observe(&scene);
        state.advance();

        state.invalidate();
        assert_eq!(state.frame_index(), 1);
        assert!(state.observe(&scene));
    }
}
