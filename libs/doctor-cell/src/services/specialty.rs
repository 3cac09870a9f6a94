use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use shared_api::RestClient;
use shared_config::AppConfig;
use shared_models::{AppError, Page};

use crate::models::Specialty;

/// Upper bound on page requests in flight while walking the directory.
const MAX_CONCURRENT_PAGE_REQUESTS: usize = 4;

/// Anything that can list the clinic's specialties.
#[async_trait]
pub trait SpecialtyDirectory: Send + Sync {
    async fn list_specialties(&self) -> Result<Vec<Specialty>, AppError>;
}

pub struct SpecialtyService {
    client: RestClient,
    page_size: u32,
}

impl SpecialtyService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RestClient::new(config),
            page_size: config.specialty_page_size.max(1),
        }
    }

    pub fn with_client(client: RestClient, page_size: u32) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
        }
    }

    /// Fetch one page of specialties (zero-based).
    pub async fn list_page(&self, page: u32) -> Result<Page<Specialty>, AppError> {
        debug!("Fetching specialties page {} (size {})", page, self.page_size);

        self.client
            .get_data(
                "/api/specialties",
                &[("page", page.to_string()), ("size", self.page_size.to_string())],
            )
            .await
    }

    /// Fetch every page; pages after the first are requested a few at a
    /// time and appended in page order.
    pub async fn list_all(&self) -> Result<Vec<Specialty>, AppError> {
        let first = self.list_page(0).await?;
        let total_pages = first.total_pages;
        let mut specialties = first.content;

        if total_pages > 1 {
            let rest: Vec<Page<Specialty>> = stream::iter(1..total_pages)
                .map(|page| self.list_page(page))
                .buffered(MAX_CONCURRENT_PAGE_REQUESTS)
                .try_collect()
                .await?;
            for page in rest {
                specialties.extend(page.content);
            }
        }

        debug!("Loaded {} specialties", specialties.len());
        Ok(specialties)
    }
}

#[async_trait]
impl SpecialtyDirectory for SpecialtyService {
    async fn list_specialties(&self) -> Result<Vec<Specialty>, AppError> {
        self.list_all().await
    }
}
