use crate::error::SessionError;
use crate::media::{CameraDevice, FrameRequest, ImageBuffer, VideoStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Availability {
    Ready,
    Denied,
    Missing,
}

/// Camera that hands out synthetic JPEG frames and counts open streams
pub struct SimCamera {
    availability: Availability,
    native_size: Option<(u32, u32)>,
    active: Arc<AtomicUsize>,
    frames: Arc<AtomicUsize>,
}

impl SimCamera {
    pub fn new() -> Self {
        Self {
            availability: Availability::Ready,
            native_size: Some((640, 480)),
            active: Arc::new(AtomicUsize::new(0)),
            frames: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Camera whose permission prompt is refused
    pub fn denied() -> Self {
        Self {
            availability: Availability::Denied,
            ..Self::new()
        }
    }

    /// No camera attached
    pub fn missing() -> Self {
        Self {
            availability: Availability::Missing,
            ..Self::new()
        }
    }

    pub fn with_native_size(mut self, width: u32, height: u32) -> Self {
        self.native_size = Some((width, height));
        self
    }

    /// Stream that has not reported its dimensions yet
    pub fn without_native_size(mut self) -> Self {
        self.native_size = None;
        self
    }

    /// Streams opened and not yet stopped
    pub fn active_streams(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn frames_captured(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }
}

impl Default for SimCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CameraDevice for SimCamera {
    async fn open(&self) -> Result<Box<dyn VideoStream>, SessionError> {
        match self.availability {
            Availability::Denied => Err(SessionError::PermissionDenied),
            Availability::Missing => Err(SessionError::DeviceUnavailable),
            Availability::Ready => {
                self.active.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(SimStream {
                    native_size: self.native_size,
                    active: Arc::clone(&self.active),
                    frames: Arc::clone(&self.frames),
                    stopped: false,
                }))
            }
        }
    }

    fn name(&self) -> &str {
        "simulated camera"
    }
}

struct SimStream {
    native_size: Option<(u32, u32)>,
    active: Arc<AtomicUsize>,
    frames: Arc<AtomicUsize>,
    stopped: bool,
}

impl VideoStream for SimStream {
    fn native_size(&self) -> Option<(u32, u32)> {
        self.native_size
    }

    fn capture(&mut self, request: FrameRequest) -> Result<ImageBuffer, SessionError> {
        if self.stopped {
            return Err(SessionError::DeviceUnavailable);
        }
        let index = self.frames.fetch_add(1, Ordering::SeqCst);

        // SOI marker, then a frame counter in place of real scan data
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        data.extend_from_slice(&(index as u32).to_be_bytes());
        data.extend_from_slice(&[0xFF, 0xD9]);

        Ok(ImageBuffer {
            width: request.width,
            height: request.height,
            mime: "image/jpeg".to_string(),
            data,
        })
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.active.fetch_sub(1, Ordering::SeqCst);
        }
    }
}
