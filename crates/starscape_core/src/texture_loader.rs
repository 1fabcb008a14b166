//! Background texture loading
//!
//! [`TextureLoader`] decodes image files on a worker thread and hands the
//! pixels back through a channel. [`AssetSlot`] is the loading boundary that
//! dependent geometry checks before drawing.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread;

use crate::asset_error::AssetError;

/// Decoded RGBA8 pixels
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    /// Row-major, 4 bytes per pixel
    pub rgba: Vec<u8>,
}

impl TextureData {
    /// 1x1 texture of a single color
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self { width: 1, height: 1, rgba: rgba.to_vec() }
    }
}

/// Read and decode an image file into RGBA8
pub fn load_texture(path: &Path) -> Result<TextureData, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.display().to_string()));
    }
    let image = image::open(path)?.to_rgba8();
    Ok(TextureData {
        width: image.width(),
        height: image.height(),
        rgba: image.into_raw(),
    })
}

/// Loading state of an asset
#[derive(Debug)]
pub enum AssetSlot<T> {
    /// Requested, not resolved yet; dependents draw nothing
    Pending,
    Ready(T),
    /// Load failed; dependents use their fallback
    Failed(AssetError),
}

impl<T> Default for AssetSlot<T> {
    fn default() -> Self {
        AssetSlot::Pending
    }
}

impl<T> AssetSlot<T> {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, AssetSlot::Pending)
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, AssetSlot::Ready(_))
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, AssetSlot::Failed(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            AssetSlot::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Resolve a pending slot; later results are ignored
    pub fn resolve(&mut self, result: Result<T, AssetError>) {
        if self.is_pending() {
            *self = match result {
                Ok(value) => AssetSlot::Ready(value),
                Err(err) => AssetSlot::Failed(err),
            };
        }
    }
}

/// Request to load a texture in the background
struct LoadRequest {
    path: PathBuf,
}

/// Result of a background texture load
pub struct TextureLoadResult {
    pub path: PathBuf,
    pub result: Result<TextureData, AssetError>,
}

/// Background texture loader using a dedicated worker thread
///
/// The worker runs until the loader is dropped.
pub struct TextureLoader {
    sender: Sender<LoadRequest>,
    receiver: Receiver<TextureLoadResult>,
}

impl TextureLoader {
    pub fn new() -> Self {
        let (request_tx, request_rx) = channel::<LoadRequest>();
        let (result_tx, result_rx) = channel::<TextureLoadResult>();

        thread::spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let result = load_texture(&request.path);
                let load_result = TextureLoadResult {
                    path: request.path,
                    result,
                };
                if result_tx.send(load_result).is_err() {
                    break;
                }
            }
        });

        Self {
            sender: request_tx,
            receiver: result_rx,
        }
    }

    /// Queue a texture for loading
    pub fn load_async(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        log::debug!("Queued texture load: {}", path.display());
        if self.sender.send(LoadRequest { path }).is_err() {
            log::warn!("Texture loader worker has exited");
        }
    }

    /// Next finished load, if any (non-blocking)
    pub fn poll(&self) -> Option<TextureLoadResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// All finished loads (non-blocking)
    pub fn poll_all(&self) -> Vec<TextureLoadResult> {
        let mut results = Vec::new();
        while let Ok(result) = self.receiver.try_recv() {
            results.push(result);
        }
        results
    }
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}
