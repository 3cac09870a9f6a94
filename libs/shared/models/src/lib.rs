pub mod api;
pub mod auth;
pub mod error;
pub mod notification;

pub use api::{ApiResponse, Page};
pub use auth::{SessionUser, UserRole};
pub use error::AppError;
pub use notification::{Notice, NoticeLevel, Notifier, TracingNotifier};
