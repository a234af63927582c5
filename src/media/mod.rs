//! Camera capture
//!
//! Platform-specific capture lives behind `CameraDevice`/`VideoStream`. The
//! `MediaCapture` manager owns at most one open stream; the stream is wrapped
//! in a `StreamHandle` that stops the device tracks when dropped, so every exit
//! path releases the camera.

use crate::config::EmotionConfig;
use crate::error::SessionError;
use base64::Engine;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// A captured still frame, already encoded by the device (e.g. JPEG)
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub mime: String,
    pub data: Vec<u8>,
}

impl ImageBuffer {
    /// `data:<mime>;base64,<payload>` as sent to the classifier
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.data)
        )
    }
}

/// Parameters for a single frame grab
#[derive(Debug, Clone, Copy)]
pub struct FrameRequest {
    pub width: u32,
    pub height: u32,
    /// Encoder quality in [0, 1]
    pub quality: f32,
}

/// Camera device trait
///
/// Implementations:
/// - browser/webview media devices
/// - `sim::SimCamera` for tests and the demo
#[async_trait::async_trait]
pub trait CameraDevice: Send + Sync {
    /// Request camera (and microphone) access and open a live stream
    async fn open(&self) -> Result<Box<dyn VideoStream>, SessionError>;

    /// Device name for logging
    fn name(&self) -> &str;
}

/// A live camera stream
pub trait VideoStream: Send {
    /// Native frame size, once the stream has reported it
    fn native_size(&self) -> Option<(u32, u32)>;

    /// Grab the current frame as an encoded still
    fn capture(&mut self, request: FrameRequest) -> Result<ImageBuffer, SessionError>;

    /// Stop every track of the stream. Called exactly once.
    fn stop(&mut self);
}

/// Exclusive ownership of an open stream
pub struct StreamHandle {
    stream: Box<dyn VideoStream>,
    acquired_at: DateTime<Utc>,
}

impl StreamHandle {
    fn new(stream: Box<dyn VideoStream>) -> Self {
        Self {
            stream,
            acquired_at: Utc::now(),
        }
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        info!("Releasing camera stream");
        self.stream.stop();
    }
}

pub struct MediaCapture {
    device: Arc<dyn CameraDevice>,
    handle: Option<StreamHandle>,
    default_width: u32,
    default_height: u32,
    quality: f32,
}

impl MediaCapture {
    pub fn new(device: Arc<dyn CameraDevice>, config: &EmotionConfig) -> Self {
        Self {
            device,
            handle: None,
            default_width: config.snapshot_width,
            default_height: config.snapshot_height,
            quality: config.jpeg_quality,
        }
    }

    /// Open the camera. A second call while a stream is open keeps the existing one.
    ///
    /// Returns true if a new stream was opened.
    pub async fn acquire(&mut self) -> Result<bool, SessionError> {
        if self.handle.is_some() {
            warn!("Camera already active");
            return Ok(false);
        }

        info!("Opening camera: {}", self.device.name());
        let stream = self.device.open().await?;
        self.handle = Some(StreamHandle::new(stream));
        info!("Camera started");

        Ok(true)
    }

    /// Drop the open stream, if any. Returns true if something was released.
    pub fn release(&mut self) -> bool {
        self.handle.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Capture the current frame, using the stream's native size when known
    pub fn snapshot(&mut self) -> Result<ImageBuffer, SessionError> {
        let handle = self
            .handle
            .as_mut()
            .ok_or(SessionError::DeviceUnavailable)?;

        let (width, height) = handle
            .stream
            .native_size()
            .filter(|&(w, h)| w > 0 && h > 0)
            .unwrap_or((self.default_width, self.default_height));

        handle.stream.capture(FrameRequest {
            width,
            height,
            quality: self.quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimCamera;

    #[tokio::test]
    async fn test_snapshot_falls_back_to_default_size() {
        let camera = Arc::new(SimCamera::new().without_native_size());
        let mut capture = MediaCapture::new(camera.clone(), &EmotionConfig::default());
        capture.acquire().await.unwrap();

        let frame = capture.snapshot().unwrap();
        assert_eq!((frame.width, frame.height), (640, 480));
        assert!(frame.to_data_url().starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn test_snapshot_uses_native_size() {
        let camera = Arc::new(SimCamera::new().with_native_size(1280, 720));
        let mut capture = MediaCapture::new(camera, &EmotionConfig::default());
        capture.acquire().await.unwrap();
        let frame = capture.snapshot().unwrap();
        assert_eq!((frame.width, frame.height), (1280, 720));
    }

    #[tokio::test]
    async fn test_single_active_handle() {
        let camera = Arc::new(SimCamera::new());
        let mut capture = MediaCapture::new(camera.clone(), &EmotionConfig::default());

        assert!(capture.acquire().await.unwrap());
        assert!(!capture.acquire().await.unwrap());
        assert_eq!(camera.active_streams(), 1);

        assert!(capture.release());
        assert!(!capture.release());
        assert_eq!(camera.active_streams(), 0);
    }

    #[tokio::test]
    async fn test_drop_releases_stream() {
        let camera = Arc::new(SimCamera::new());
        {
            let mut capture = MediaCapture::new(camera.clone(), &EmotionConfig::default());
            capture.acquire().await.unwrap();
            assert_eq!(camera.active_streams(), 1);
        }
        assert_eq!(camera.active_streams(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_without_stream() {
        let camera = Arc::new(SimCamera::new());
        let mut capture = MediaCapture::new(camera, &EmotionConfig::default());
        assert_eq!(capture.snapshot(), Err(SessionError::DeviceUnavailable));
    }

    #[tokio::test]
    async fn test_permission_denied() {
        let camera = Arc::new(SimCamera::denied());
        let mut capture = MediaCapture::new(camera.clone(), &EmotionConfig::default());
        assert_eq!(
            capture.acquire().await,
            Err(SessionError::PermissionDenied)
        );
        assert!(!capture.is_active());
        assert_eq!(camera.active_streams(), 0);
    }
}
