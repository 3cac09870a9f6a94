use thiserror::Error;

use crate::notification::Notice;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Maps an HTTP status from the clinic API onto the error taxonomy.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => AppError::Auth(message),
            404 => AppError::NotFound(message),
            400 | 422 => AppError::BadRequest(message),
            409 => AppError::Conflict(message),
            _ => AppError::ExternalService(format!("({}) {}", status, message)),
        }
    }

    /// Text shown to the user, without the variant prefix.
    pub fn user_message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::ExternalService(msg)
            | AppError::Network(msg)
            | AppError::Decode(msg)
            | AppError::Internal(msg) => msg,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    pub fn notice(&self) -> Notice {
        Notice::error(self.user_message())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}
