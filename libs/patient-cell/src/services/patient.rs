use tracing::{debug, warn};

use shared_api::{rest::path_segment, RestClient};
use shared_config::AppConfig;
use shared_models::{AppError, Page};

use crate::models::{PatientProfile, PatientSearchQuery};

const DEFAULT_SEARCH_PAGE_SIZE: u32 = 10;

pub struct PatientProfileService {
    client: RestClient,
}

impl PatientProfileService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RestClient::new(config),
        }
    }

    pub fn with_client(client: RestClient) -> Self {
        Self { client }
    }

    pub async fn get_by_code(&self, code: &str) -> Result<PatientProfile, AppError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::Validation("Patient profile code is required".to_string()));
        }

        debug!("Fetching patient profile by code: {}", code);

        let path = format!("/api/patient-profiles/code/{}", path_segment(code));
        self.client.get_data(&path, &[]).await
    }

    /// Free-text search over code, name and phone.
    pub async fn search(&self, query: PatientSearchQuery) -> Result<Vec<PatientProfile>, AppError> {
        let keyword = query.keyword.trim();
        if keyword.is_empty() {
            warn!("Rejected patient search with blank keyword");
            return Err(AppError::Validation("Search keyword is required".to_string()));
        }

        debug!("Searching patient profiles with keyword: {}", keyword);

        let page: Page<PatientProfile> = self
            .client
            .get_data(
                "/api/patient-profiles/search",
                &[
                    ("keyword", keyword.to_string()),
                    ("page", query.page.unwrap_or(0).to_string()),
                    ("size", query.size.unwrap_or(DEFAULT_SEARCH_PAGE_SIZE).to_string()),
                ],
            )
            .await?;

        Ok(page.content)
    }
}
