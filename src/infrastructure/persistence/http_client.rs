use super::{PersistenceApi, UploadReceipt, UploadRequest};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::PersistenceConfig;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

pub const UPLOAD_PATH: &str = "partner-schools/enrollments/upload";

pub struct HttpPersistenceClient {
    client: reqwest::Client,
    endpoint: Url,
    api_token: Option<String>,
}

impl HttpPersistenceClient {
    pub fn new(config: &PersistenceConfig) -> Result<Self> {
        let base_url = config.base_url.as_deref().ok_or_else(|| {
            AppError::ConfigError("persistence.base_url is not set".to_string())
        })?;

        // Url::join drops the last path segment unless the base ends with '/'
        let base = if base_url.ends_with('/') {
            Url::parse(base_url)
        } else {
            Url::parse(&format!("{}/", base_url))
        }
        .map_err(|e| AppError::ConfigError(format!("Invalid persistence.base_url: {}", e)))?;

        let endpoint = base
            .join(UPLOAD_PATH)
            .map_err(|e| AppError::ConfigError(format!("Invalid upload endpoint: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_token: config.api_token.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PersistenceApi for HttpPersistenceClient {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadReceipt> {
        info!(
            import_id = %request.import_id,
            mode = %request.update_mode,
            records = request.records.len(),
            endpoint = %self.endpoint,
            "uploading enrollment records"
        );

        let mut builder = self.client.post(self.endpoint.clone()).json(request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            error!(%status, "persistence API rejected upload");
            return Err(AppError::ApiError(format!(
                "Persistence API error ({}): {}",
                status, text
            )));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(UploadReceipt::default());
        }

        serde_json::from_str(&text)
            .map_err(|e| AppError::ApiError(format!("Failed to parse upload response: {}", e)))
    }
}
