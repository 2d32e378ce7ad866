//! GPU-free fakes shared by the renderer integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec3;
use renderer::locations::LocationMap;
use renderer::uniforms::{ATTRIBUTE_NAMES, uniform_names};
use renderer::{
    FrameScheduler, FrameSynchronizer, FrameTarget, FrameToken, SceneUniforms, UniformSink,
};
use scene::Capacity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    F32(f32),
    I32(i32),
    Vec3(Vec3),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    UseProgram,
    Draw,
    ReadPixels,
    UploadPreviousFrame,
}

/// Records uniform writes by name and fakes the draw/readback cycle
///
/// Each draw produces a distinct pixel pattern so tests can tell which frame
/// ended up in the previous-frame texture.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    pub uniforms: HashMap<String, UniformValue>,
    pub calls: Vec<Call>,
    pub previous_frame: Vec<u8>,
    pub draws: usize,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn f32(&self, name: &str) -> Option<f32> {
        match self.uniforms.get(name) {
            Some(UniformValue::F32(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn i32(&self, name: &str) -> Option<i32> {
        match self.uniforms.get(name) {
            Some(UniformValue::I32(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn vec3(&self, name: &str) -> Option<Vec3> {
        match self.uniforms.get(name) {
            Some(UniformValue::Vec3(v)) => Some(*v),
            _ => None,
        }
    }

    /// Pixels the fake returns after `draw_count` draws
    pub fn pattern(draw_count: usize, len: usize) -> Vec<u8> {
        (0..len).map(|i| (i + draw_count * 31) as u8).collect()
    }

    fn record(&mut self, location: Option<&String>, value: UniformValue) {
        if let Some(name) = location {
            self.uniforms.insert(name.clone(), value);
        }
    }
}

impl UniformSink for RecordingTarget {
    type Location = String;

    fn use_program(&mut self) {
        self.calls.push(Call::UseProgram);
    }

    fn set_f32(&mut self, location: Option<&String>, value: f32) {
        self.record(location, UniformValue::F32(value));
    }

    fn set_i32(&mut self, location: Option<&String>, value: i32) {
        self.record(location, UniformValue::I32(value));
    }

    fn set_vec3(&mut self, location: Option<&String>, value: Vec3) {
        self.record(location, UniformValue::Vec3(value));
    }
}

impl FrameTarget for RecordingTarget {
    fn draw(&mut self) {
        self.draws += 1;
        self.calls.push(Call::Draw);
    }

    fn read_pixels(&mut self, _resolution: u32, pixels: &mut [u8]) {
        self.calls.push(Call::ReadPixels);
        pixels.copy_from_slice(&Self::pattern(self.draws, pixels.len()));
    }

    fn upload_previous_frame(&mut self, _resolution: u32, pixels: &[u8]) {
        self.calls.push(Call::UploadPreviousFrame);
        self.previous_frame = pixels.to_vec();
    }
}

/// Synchronizer whose locations are the uniform names themselves
pub fn named_synchronizer(capacity: &Capacity) -> FrameSynchronizer<String> {
    let names = uniform_names(capacity);
    let map: LocationMap<u32, String> = LocationMap::resolve(
        ATTRIBUTE_NAMES.iter().copied(),
        names.iter().map(String::as_str),
        |_| Some(0),
        |name| Some(name.to_string()),
    );
    FrameSynchronizer::new(SceneUniforms::from_map(&map, capacity))
}

#[derive(Debug, Default)]
pub struct SchedulerLog {
    next_id: u64,
    pub active: Vec<FrameToken>,
    pub cancelled: Vec<FrameToken>,
    pub scheduled: usize,
}

/// Scheduler driven by hand; clones share one log
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    log: Rc<RefCell<SchedulerLog>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the most recently scheduled live token
    pub fn take_due(&self) -> Option<FrameToken> {
        self.log.borrow_mut().active.pop()
    }

    pub fn active_count(&self) -> usize {
        self.log.borrow().active.len()
    }

    pub fn cancelled(&self) -> Vec<FrameToken> {
        self.log.borrow().cancelled.clone()
    }

    pub fn scheduled(&self) -> usize {
        self.log.borrow().scheduled
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule(&mut self) -> FrameToken {
        let mut log = self.log.borrow_mut();
        log.next_id += 1;
        log.scheduled += 1;
        let token = FrameToken::new(log.next_id);
        log.active.push(token);
        token
    }

    fn cancel(&mut self, token: FrameToken) {
        let mut log = self.log.borrow_mut();
        log.active.retain(|t| *t != token);
        log.cancelled.push(token);
    }
}
