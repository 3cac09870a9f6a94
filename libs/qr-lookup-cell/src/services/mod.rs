pub mod bridge;
pub mod camera;
pub mod debounce;
pub mod dialog;
pub mod scanner;

pub use bridge::{AppointmentLookup, PatientProfileLookup, QrLookupBridge};
pub use camera::{acquire_camera, CameraSession, FacingMode, MediaDevices, MediaStream, VideoFrame};
pub use debounce::ScanDebouncer;
pub use dialog::{ScannerDialog, ScannerSettings};
pub use scanner::{
    BarcodeDetector, DetectionReceiver, DetectionSender, FrameDecoder, FrameDecoderScanner, NativeBarcodeScanner,
    QrScanner, ScannerBackends,
};
