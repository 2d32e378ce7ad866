//! Random-noise texture source
//!
//! The bitmap is decoded on a worker thread and handed back over a channel.
//! Frames rendered before it arrives sample whatever the noise texture holds
//! at that point. If loading fails a seeded generated image is used instead.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use image::{Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::AssetError;

/// Side length of the generated fallback image
pub const FALLBACK_NOISE_SIZE: u32 = 256;

/// Seed of the generated fallback image
pub const FALLBACK_NOISE_SEED: u64 = 0x5eed_0f_a11;

/// Read and decode a noise bitmap into RGBA8
pub fn decode_noise(path: &Path) -> Result<RgbaImage, AssetError> {
    let bytes = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

/// Deterministic uniform noise
pub fn generate_noise(size: u32, seed: u64) -> RgbaImage {
    let mut rng = StdRng::seed_from_u64(seed);
    RgbaImage::from_fn(size, size, |_, _| Rgba(rng.random::<[u8; 4]>()))
}

/// A noise bitmap being decoded in the background
#[derive(Debug)]
pub struct PendingNoise {
    path: PathBuf,
    receiver: Receiver<Result<RgbaImage, AssetError>>,
}

impl PendingNoise {
    /// Start decoding `path` on a worker thread
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = mpsc::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            // The receiver may be gone if the renderer shut down first
            let _ = sender.send(decode_noise(&worker_path));
        });
        Self { path, receiver }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check; `None` while the worker is still busy
    pub fn poll(&self) -> Option<Result<RgbaImage, AssetError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(AssetError::LoaderGone)),
        }
    }
}
