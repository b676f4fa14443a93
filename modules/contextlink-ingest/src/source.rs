use apify_client::ApifyClient;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::PipelineError;

/// Where raw dataset items come from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Ids of every dataset visible to the configured credential.
    async fn list_dataset_ids(&self) -> Result<Vec<String>, PipelineError>;

    /// Every item of one dataset, in upstream order.
    async fn fetch_all(&self, dataset_id: &str) -> Result<Vec<Value>, PipelineError>;
}

#[async_trait]
impl DatasetSource for ApifyClient {
    async fn list_dataset_ids(&self) -> Result<Vec<String>, PipelineError> {
        Ok(ApifyClient::list_dataset_ids(self).await?)
    }

    async fn fetch_all(&self, dataset_id: &str) -> Result<Vec<Value>, PipelineError> {
        Ok(self.get_all_dataset_items(dataset_id).await?)
    }
}
