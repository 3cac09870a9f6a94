//! QR decoding strategies.
//!
//! Both strategies poll frames from the camera stream on a Tokio task and
//! push every decoded payload into the detection channel. Stopping a
//! scanner aborts its task, so no detection arrives after `stop`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::{CameraError, QrError};
use crate::services::camera::{MediaStream, VideoFrame};

pub type DetectionSender = mpsc::UnboundedSender<String>;
pub type DetectionReceiver = mpsc::UnboundedReceiver<String>;

/// Platform barcode detection.
#[async_trait]
pub trait BarcodeDetector: Send + Sync {
    /// Capability probe: whether the platform detector handles QR codes.
    async fn supports_qr(&self) -> bool;

    async fn detect(&self, frame: &VideoFrame) -> anyhow::Result<Vec<String>>;
}

/// Bundled software QR decoder working on raw frames.
pub trait FrameDecoder: Send + Sync {
    fn decode(&self, frame: &VideoFrame) -> anyhow::Result<Option<String>>;
}

#[async_trait]
pub trait QrScanner: Send {
    fn name(&self) -> &'static str;

    async fn start(&mut self, stream: Arc<dyn MediaStream>, on_detect: DetectionSender) -> Result<(), QrError>;

    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

#[derive(Clone)]
enum Backend {
    Native(Arc<dyn BarcodeDetector>),
    Decoder(Arc<dyn FrameDecoder>),
}

impl Backend {
    async fn scan(&self, frame: &VideoFrame) -> anyhow::Result<Vec<String>> {
        match self {
            Backend::Native(detector) => detector.detect(frame).await,
            Backend::Decoder(decoder) => Ok(decoder.decode(frame)?.into_iter().collect()),
        }
    }
}

/// Frame polling task shared by both strategies.
struct FramePoller {
    backend: Backend,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl FramePoller {
    fn new(backend: Backend, interval: Duration) -> Self {
        Self {
            backend,
            interval,
            handle: None,
        }
    }

    fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn start(&mut self, name: &'static str, stream: Arc<dyn MediaStream>, on_detect: DetectionSender) -> Result<(), QrError> {
        if self.is_running() {
            return Err(QrError::AlreadyRunning);
        }
        if stream.active_tracks() == 0 {
            return Err(CameraError::Unavailable("stream has no active tracks".to_string()).into());
        }

        info!("Starting {} scanner on stream {}", name, stream.id());
        let backend = self.backend.clone();
        let interval = self.interval;
        self.handle = Some(tokio::spawn(poll_frames(backend, stream, interval, on_detect)));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Scanner task aborted");
        }
    }
}

impl Drop for FramePoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_frames(backend: Backend, stream: Arc<dyn MediaStream>, interval: Duration, on_detect: DetectionSender) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        if stream.active_tracks() == 0 {
            debug!("Camera stream {} ended; scanner exiting", stream.id());
            return;
        }

        let frame = match stream.grab_frame().await {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(e) => {
                warn!("Failed to read camera frame: {}", e);
                return;
            }
        };

        match backend.scan(&frame).await {
            Ok(payloads) => {
                for payload in payloads {
                    if on_detect.send(payload).is_err() {
                        debug!("Detection receiver closed; scanner exiting");
                        return;
                    }
                }
            }
            // Frames without a readable code are the common case.
            Err(e) => debug!("Frame not decoded: {}", e),
        }
    }
}

/// Scanner backed by the platform barcode detector.
pub struct NativeBarcodeScanner {
    poller: FramePoller,
}

impl NativeBarcodeScanner {
    pub fn new(detector: Arc<dyn BarcodeDetector>, interval: Duration) -> Self {
        Self {
            poller: FramePoller::new(Backend::Native(detector), interval),
        }
    }
}

#[async_trait]
impl QrScanner for NativeBarcodeScanner {
    fn name(&self) -> &'static str {
        "native"
    }

    async fn start(&mut self, stream: Arc<dyn MediaStream>, on_detect: DetectionSender) -> Result<(), QrError> {
        let name = self.name();
        self.poller.start(name, stream, on_detect)
    }

    fn stop(&mut self) {
        self.poller.stop();
    }

    fn is_running(&self) -> bool {
        self.poller.is_running()
    }
}

/// Scanner backed by the bundled frame decoder.
pub struct FrameDecoderScanner {
    poller: FramePoller,
}

impl FrameDecoderScanner {
    pub fn new(decoder: Arc<dyn FrameDecoder>, interval: Duration) -> Self {
        Self {
            poller: FramePoller::new(Backend::Decoder(decoder), interval),
        }
    }
}

#[async_trait]
impl QrScanner for FrameDecoderScanner {
    fn name(&self) -> &'static str {
        "frame-decoder"
    }

    async fn start(&mut self, stream: Arc<dyn MediaStream>, on_detect: DetectionSender) -> Result<(), QrError> {
        let name = self.name();
        self.poller.start(name, stream, on_detect)
    }

    fn stop(&mut self) {
        self.poller.stop();
    }

    fn is_running(&self) -> bool {
        self.poller.is_running()
    }
}

/// Decoders available on this device.
#[derive(Clone, Default)]
pub struct ScannerBackends {
    pub native: Option<Arc<dyn BarcodeDetector>>,
    pub decoder: Option<Arc<dyn FrameDecoder>>,
}

impl ScannerBackends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_native(mut self, detector: Arc<dyn BarcodeDetector>) -> Self {
        self.native = Some(detector);
        self
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn FrameDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Native detector when it supports QR, else the frame decoder.
    pub async fn select(&self, interval: Duration) -> Result<Box<dyn QrScanner>, QrError> {
        if let Some(detector) = &self.native {
            if detector.supports_qr().await {
                return Ok(Box::new(NativeBarcodeScanner::new(Arc::clone(detector), interval)));
            }
            debug!("Native barcode detector lacks QR support");
        }

        match &self.decoder {
            Some(decoder) => Ok(Box::new(FrameDecoderScanner::new(Arc::clone(decoder), interval))),
            None => Err(QrError::NoDecoder),
        }
    }
}
