use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::models::FormPayload;

pub const DEFAULT_BASE_URL: &str = "https://api.typeform.com";

#[derive(Debug, Clone)]
pub struct TypeformConfig {
    pub base_url: String,
    pub form_uid: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl TypeformConfig {
    /// Load Typeform config from environment.
    ///
    /// Returns `Ok(None)` if the form is not configured (uid or key
    /// missing), so callers can skip the sync entirely.
    pub fn from_env() -> Option<Self> {
        let form_uid = std::env::var("TYPEFORM_FORM_UID").ok()?;
        let api_key = std::env::var("TYPEFORM_API_KEY").ok()?;

        let base_url = std::env::var("TYPEFORM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = std::env::var("TYPEFORM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Some(Self {
            base_url,
            form_uid,
            api_key,
            timeout_secs,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TypeformError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),
}

/// Client for the v0 form API. One request per sync, no retry: a failed
/// fetch fails the sync and the next run starts over from the same
/// watermark.
#[derive(Clone)]
pub struct TypeformClient {
    client: Client,
    config: TypeformConfig,
}

impl TypeformClient {
    pub fn new(config: TypeformConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetch completed responses submitted after `since` (epoch seconds),
    /// along with the form's question definitions.
    pub async fn fetch_completed(&self, since: &str) -> Result<FormPayload, TypeformError> {
        let url = format!("{}/v0/form/{}", self.config.base_url, self.config.form_uid);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("completed", "true"),
                ("since", since),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TypeformError::HttpError { status, body });
        }

        response
            .json::<FormPayload>()
            .await
            .map_err(TypeformError::RequestError)
    }
}
