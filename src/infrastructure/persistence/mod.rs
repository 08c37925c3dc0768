pub mod http_client;

use crate::domain::enrollment::{NormalizedRecord, UpdateMode};
use crate::domain::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use http_client::HttpPersistenceClient;

/// Body sent to the persistence API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    pub import_id: Uuid,
    pub update_mode: UpdateMode,
    pub records: Vec<NormalizedRecord>,
}

/// What the persistence API reports back; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub inserted: Option<usize>,
    #[serde(default)]
    pub updated: Option<usize>,
    #[serde(default)]
    pub deleted: Option<usize>,
}

/// Storage side of an import. Merge/replace semantics belong to the implementation.
#[async_trait]
pub trait PersistenceApi: Send + Sync {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadReceipt>;
}
