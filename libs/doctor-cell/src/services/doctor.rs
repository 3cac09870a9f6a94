use tracing::debug;
use uuid::Uuid;

use shared_api::{rest::path_segment, RestClient};
use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::Doctor;

pub struct DoctorService {
    client: RestClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RestClient::new(config),
        }
    }

    pub fn with_client(client: RestClient) -> Self {
        Self { client }
    }

    /// List doctors, optionally narrowed to one specialty.
    pub async fn list_doctors(&self, specialty_id: Option<Uuid>) -> Result<Vec<Doctor>, AppError> {
        debug!("Listing doctors for specialty {:?}", specialty_id);

        let query: Vec<(&str, String)> = specialty_id
            .map(|id| vec![("specialtyId", id.to_string())])
            .unwrap_or_default();

        self.client.get_data("/api/doctors", &query).await
    }

    pub async fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, AppError> {
        debug!("Fetching doctor {}", doctor_id);

        let path = format!("/api/doctors/{}", path_segment(&doctor_id.to_string()));
        self.client.get_data(&path, &[]).await
    }
}
