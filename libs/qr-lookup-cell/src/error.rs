use thiserror::Error;

use shared_models::AppError;

/// Failures while acquiring or reading the camera.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    #[error("No matching camera found: {0}")]
    NotFound(String),

    #[error("Camera unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum QrError {
    #[error("Invalid QR code: {0}")]
    InvalidPayload(String),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error("No QR decoder is available on this device")]
    NoDecoder,

    #[error("Scanner is already running")]
    AlreadyRunning,

    #[error("Scanner dialog is not open")]
    DialogClosed,

    #[error(transparent)]
    Api(#[from] AppError),

    #[error(transparent)]
    Decoder(#[from] anyhow::Error),
}

impl QrError {
    /// Text for the dialog's error toast.
    pub fn user_message(&self) -> String {
        match self {
            QrError::Api(e) => e.user_message().to_string(),
            QrError::Camera(CameraError::PermissionDenied(_)) => {
                "Camera access was denied. Please allow camera access and try again".to_string()
            }
            QrError::Camera(_) => "Could not start the camera".to_string(),
            other => other.to_string(),
        }
    }
}
