use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::api::{ApiErrorBody, ApiResponse};
use shared_models::AppError;

/// Query string pairs appended to a request path.
pub type Query<'a> = &'a [(&'a str, String)];

#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl RestClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
                Client::new()
            });

        let auth_token = if config.has_token() {
            Some(config.api_token.clone())
        } else {
            None
        };

        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_token,
        }
    }

    /// Replace the bearer token, e.g. after the user signs in.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.auth_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.auth_token {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Auth token contains invalid header characters, sending anonymously"),
            }
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        query: Query<'_>,
        body: Option<Value>,
    ) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url).headers(self.get_headers());

        if !query.is_empty() {
            req = req.query(query);
        }

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .ok()
                .and_then(ApiErrorBody::into_message)
                .unwrap_or_else(|| {
                    if error_text.is_empty() {
                        status.canonical_reason().unwrap_or("Request failed").to_string()
                    } else {
                        error_text
                    }
                });

            return Err(AppError::from_status(status.as_u16(), message));
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    pub async fn get<T>(&self, path: &str, query: Query<'_>) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        self.request(Method::GET, path, query, None).await
    }

    /// GET a payload wrapped in the `{ data, message }` envelope.
    pub async fn get_data<T>(&self, path: &str, query: Query<'_>) -> Result<T, AppError>
    where
        T: DeserializeOwned,
    {
        let envelope: ApiResponse<T> = self.get(path, query).await?;
        Ok(envelope.data)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.auth_token.is_some()
    }
}

/// Percent-encodes a value used as a single path segment.
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}
