use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_models::Notice;
use shared_utils::{Clock, SystemClock};

use crate::error::{CameraError, QrError};
use crate::models::{normalize_payload, LookupOutcome, MedicalRecordDraft};
use crate::services::bridge::QrLookupBridge;
use crate::services::camera::{acquire_camera, CameraSession, MediaDevices};
use crate::services::debounce::ScanDebouncer;
use crate::services::scanner::{DetectionReceiver, QrScanner, ScannerBackends};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerSettings {
    pub debounce_window: Duration,
    pub auto_close_delay: Duration,
    pub scan_interval: Duration,
}

impl ScannerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            debounce_window: config.qr_debounce_window(),
            auto_close_delay: config.qr_auto_close_delay(),
            scan_interval: config.qr_scan_interval(),
        }
    }
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

struct OpenScanner {
    camera: CameraSession,
    scanner: Box<dyn QrScanner>,
    detections: DetectionReceiver,
}

/// Camera-backed QR scanner dialog.
///
/// While open the dialog exclusively owns the camera stream. Every exit
/// path (explicit [`close`](Self::close), a successful scan, or drop) stops
/// the scanner task and all stream tracks.
pub struct ScannerDialog {
    devices: Arc<dyn MediaDevices>,
    backends: ScannerBackends,
    bridge: QrLookupBridge,
    debouncer: ScanDebouncer,
    settings: ScannerSettings,
    open: Option<OpenScanner>,
}

impl ScannerDialog {
    pub fn new(
        devices: Arc<dyn MediaDevices>,
        backends: ScannerBackends,
        bridge: QrLookupBridge,
        clock: Arc<dyn Clock>,
        settings: ScannerSettings,
    ) -> Self {
        Self {
            devices,
            backends,
            bridge,
            debouncer: ScanDebouncer::new(settings.debounce_window, clock),
            settings,
            open: None,
        }
    }

    pub fn from_config(
        config: &AppConfig,
        devices: Arc<dyn MediaDevices>,
        backends: ScannerBackends,
        bridge: QrLookupBridge,
    ) -> Self {
        Self::new(
            devices,
            backends,
            bridge,
            Arc::new(SystemClock),
            ScannerSettings::from_config(config),
        )
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Acquire the camera and start the best available scanner.
    pub async fn open(&mut self) -> Result<(), QrError> {
        if self.is_open() {
            return Ok(());
        }

        match self.start_scanner().await {
            Ok(open) => {
                info!("QR scanner opened with {} strategy", open.scanner.name());
                self.debouncer.reset();
                self.open = Some(open);
                Ok(())
            }
            Err(e) => {
                warn!("Could not open QR scanner: {}", e);
                self.bridge.notifier().notify(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }

    async fn start_scanner(&self) -> Result<OpenScanner, QrError> {
        let camera = acquire_camera(self.devices.as_ref()).await?;
        // The camera session releases its tracks if anything below fails.
        let mut scanner = self.backends.select(self.settings.scan_interval).await?;
        let (tx, detections) = mpsc::unbounded_channel();
        scanner.start(camera.stream(), tx).await?;

        Ok(OpenScanner {
            camera,
            scanner,
            detections,
        })
    }

    /// Feed one decoded payload through debounce and the lookup flow.
    ///
    /// Returns `None` for a suppressed duplicate.
    pub async fn handle_detection(&mut self, raw: &str, draft: &mut MedicalRecordDraft) -> Option<LookupOutcome> {
        let payload = normalize_payload(raw);
        if !self.debouncer.accept(&payload) {
            return None;
        }

        Some(self.bridge.resolve(&payload, draft).await)
    }

    /// Scan until an appointment is loaded, then close after the
    /// confirmation delay.
    ///
    /// Rejected payloads and failed lookups keep the dialog scanning.
    pub async fn run(&mut self, draft: &mut MedicalRecordDraft) -> Result<LookupOutcome, QrError> {
        loop {
            let detection = match self.open.as_mut() {
                Some(open) => open.detections.recv().await,
                None => return Err(QrError::DialogClosed),
            };

            let Some(raw) = detection else {
                self.close();
                return Err(CameraError::Unavailable("camera stream ended".to_string()).into());
            };

            if let Some(outcome) = self.handle_detection(&raw, draft).await {
                if outcome.appointment_loaded() {
                    tokio::time::sleep(self.settings.auto_close_delay).await;
                    self.close();
                    return Ok(outcome);
                }
                debug!("Scan did not load an appointment; still scanning");
            }
        }
    }

    /// Stop scanning and release the camera. Safe to call when closed.
    pub fn close(&mut self) {
        if let Some(mut open) = self.open.take() {
            open.scanner.stop();
            open.detections.close();
            open.camera.release();
            info!("QR scanner closed");
        }
    }

    pub fn settings(&self) -> ScannerSettings {
        self.settings
    }
}

impl Drop for ScannerDialog {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::bridge::{MockAppointmentLookup, MockPatientProfileLookup};
    use crate::services::camera::{FacingMode, MediaStream};
    use appointment_cell::{Appointment, AppointmentStatus};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use shared_utils::test_utils::{ManualClock, RecordingNotifier};
    use uuid::Uuid;

    struct NoCamera;

    #[async_trait]
    impl MediaDevices for NoCamera {
        async fn get_user_media(&self, _facing: FacingMode) -> Result<Arc<dyn MediaStream>, CameraError> {
            Err(CameraError::PermissionDenied("denied".to_string()))
        }
    }

    fn appointment() -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            code: "APT12345".to_string(),
            status: AppointmentStatus::Pending,
            appointment_time: None,
            patient_profile_code: None,
            patient_name: None,
            doctor_name: None,
        }
    }

    fn dialog(appointments: MockAppointmentLookup, clock: Arc<ManualClock>) -> (ScannerDialog, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let bridge = QrLookupBridge::new(
            Arc::new(appointments),
            Arc::new(MockPatientProfileLookup::new()),
            notifier.clone(),
        );
        let dialog = ScannerDialog::new(
            Arc::new(NoCamera),
            ScannerBackends::new(),
            bridge,
            clock,
            ScannerSettings::default(),
        );
        (dialog, notifier)
    }

    #[tokio::test]
    async fn duplicate_scan_within_window_is_suppressed() {
        let clock = Arc::new(ManualClock::new(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()));
        let mut appointments = MockAppointmentLookup::new();
        appointments
            .expect_find_appointment()
            .times(2)
            .returning(|_| Ok(appointment()));
        let (mut dialog, _notifier) = dialog(appointments, clock.clone());
        let mut draft = MedicalRecordDraft::new();

        assert!(dialog.handle_detection("APT12345", &mut draft).await.is_some());
        clock.advance(Duration::from_millis(700));
        assert!(dialog.handle_detection("apt12345 ", &mut draft).await.is_none());
        clock.advance(Duration::from_millis(800));
        assert!(dialog.handle_detection("APT12345", &mut draft).await.is_some());
    }

    #[tokio::test]
    async fn camera_denial_is_reported() {
        let clock = Arc::new(ManualClock::new(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()));
        let (mut dialog, notifier) = dialog(MockAppointmentLookup::new(), clock);

        let result = dialog.open().await;

        assert!(matches!(result, Err(QrError::Camera(CameraError::PermissionDenied(_)))));
        assert!(!dialog.is_open());
        assert_eq!(notifier.count(shared_models::NoticeLevel::Error), 1);
    }

    #[test]
    fn default_settings_follow_config_defaults() {
        let settings = ScannerSettings::default();

        assert_eq!(settings.debounce_window, Duration::from_millis(1500));
        assert_eq!(settings.auto_close_delay, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn run_without_open_fails() {
        let clock = Arc::new(ManualClock::new(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()));
        let (mut dialog, _notifier) = dialog(MockAppointmentLookup::new(), clock);

        let result = dialog.run(&mut MedicalRecordDraft::new()).await;

        assert!(matches!(result, Err(QrError::DialogClosed)));
    }
}
