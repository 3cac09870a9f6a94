//! Camera ownership for the scanner dialog.
//!
//! The device layer is abstracted behind [`MediaDevices`] and
//! [`MediaStream`]. A [`CameraSession`] owns one stream and stops every
//! track when released or dropped.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::error::CameraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear camera, preferred for scanning printed codes.
    Environment,
    Any,
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacingMode::Environment => write!(f, "environment"),
            FacingMode::Any => write!(f, "any"),
        }
    }
}

/// One captured video frame, tightly packed RGBA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

#[async_trait]
pub trait MediaStream: Send + Sync {
    fn id(&self) -> String;

    fn active_tracks(&self) -> usize;

    fn stop_all_tracks(&self);

    /// Next frame, or `None` when no new frame is ready yet.
    async fn grab_frame(&self) -> Result<Option<VideoFrame>, CameraError>;
}

#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn get_user_media(&self, facing: FacingMode) -> Result<Arc<dyn MediaStream>, CameraError>;
}

/// Exclusive hold on a camera stream.
pub struct CameraSession {
    stream: Arc<dyn MediaStream>,
    facing: FacingMode,
    released: bool,
}

impl CameraSession {
    pub fn new(stream: Arc<dyn MediaStream>, facing: FacingMode) -> Self {
        Self {
            stream,
            facing,
            released: false,
        }
    }

    pub fn stream(&self) -> Arc<dyn MediaStream> {
        Arc::clone(&self.stream)
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Stop every track. Safe to call more than once.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.stream.stop_all_tracks();
        self.released = true;
        debug!("Released camera stream {}", self.stream.id());
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if !self.released {
            warn!("Camera session dropped without release; stopping tracks");
            self.release();
        }
    }
}

/// Open the rear camera, falling back to any camera.
pub async fn acquire_camera(devices: &dyn MediaDevices) -> Result<CameraSession, CameraError> {
    match devices.get_user_media(FacingMode::Environment).await {
        Ok(stream) => {
            info!("Opened {} camera", FacingMode::Environment);
            return Ok(CameraSession::new(stream, FacingMode::Environment));
        }
        Err(e) => warn!("Environment camera unavailable ({}); trying any camera", e),
    }

    match devices.get_user_media(FacingMode::Any).await {
        Ok(stream) => {
            info!("Opened {} camera", FacingMode::Any);
            Ok(CameraSession::new(stream, FacingMode::Any))
        }
        Err(e) => {
            error!("No camera could be opened: {}", e);
            Err(e)
        }
    }
}
