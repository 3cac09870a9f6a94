use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use shared_api::{rest::path_segment, RestClient};
use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{DateRange, EventScope, WorkSession};

/// Remote source of work sessions for a date range.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkSessionSource: Send + Sync {
    async fn fetch(&self, scope: EventScope, range: DateRange) -> Result<Vec<WorkSession>, AppError>;
}

pub struct WorkSessionService {
    client: RestClient,
}

impl WorkSessionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RestClient::new(config),
        }
    }

    pub fn with_client(client: RestClient) -> Self {
        Self { client }
    }

    /// All sessions in the range (administrators).
    pub async fn list_by_range(&self, range: DateRange) -> Result<Vec<WorkSession>, AppError> {
        debug!("Fetching work sessions {} .. {}", range.start, range.end);

        self.client.get_data("/api/work-sessions", &range.to_query()).await
    }

    pub async fn list_by_doctor(&self, doctor_id: Uuid, range: DateRange) -> Result<Vec<WorkSession>, AppError> {
        debug!("Fetching work sessions for doctor {} {} .. {}", doctor_id, range.start, range.end);

        let path = format!("/api/work-sessions/doctor/{}", path_segment(&doctor_id.to_string()));
        self.client.get_data(&path, &range.to_query()).await
    }

    /// The signed-in staff member's own schedule.
    pub async fn my_schedule(&self, range: DateRange) -> Result<Vec<WorkSession>, AppError> {
        debug!("Fetching own schedule {} .. {}", range.start, range.end);

        self.client.get_data("/api/work-sessions/me", &range.to_query()).await
    }
}

#[async_trait]
impl WorkSessionSource for WorkSessionService {
    async fn fetch(&self, scope: EventScope, range: DateRange) -> Result<Vec<WorkSession>, AppError> {
        match scope {
            EventScope::All => self.list_by_range(range).await,
            EventScope::Doctor(Some(doctor_id)) => self.list_by_doctor(doctor_id, range).await,
            EventScope::Doctor(None) => Err(AppError::Validation("Please select a doctor".to_string())),
            EventScope::Mine => self.my_schedule(range).await,
        }
    }
}
