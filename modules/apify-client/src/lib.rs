pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{
    DatasetList, DatasetSummary, FacebookGroupsScraperInput, RunData, RunOptions, StartUrl,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use types::ApiResponse;
use url::Url;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Page size used when the caller passes a non-positive limit, and the
/// default for full-dataset pagination.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Actor ID for apify/facebook-groups-scraper.
const FACEBOOK_GROUPS_SCRAPER: &str = "apify~facebook-groups-scraper";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
    page_size: usize,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            token,
            base_url: BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Like `new`, but refuses an empty token.
    pub fn try_new(token: String) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(ApifyError::InvalidArgument(
                "API token cannot be empty".to_string(),
            ));
        }
        Ok(Self::new(token))
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Page size for `get_all_dataset_items`. Zero falls back to the default.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = if page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Parse `url` and set the `token` query parameter, replacing any token
    /// already present.
    pub fn authorize_url(&self, url: &str) -> Result<Url> {
        let mut parsed = Url::parse(url)
            .map_err(|e| ApifyError::InvalidArgument(format!("invalid URL '{url}': {e}")))?;

        let kept: Vec<(String, String)> = parsed
            .query_pairs()
            .filter(|(k, _)| k != "token")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        parsed
            .query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("token", &self.token);

        Ok(parsed)
    }

    /// Build an authorized endpoint URL under the base URL. Each segment is
    /// percent-encoded, so ids cannot alter the path or query.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ApifyError::InvalidArgument(format!("invalid base URL '{}': {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ApifyError::InvalidArgument(format!("base URL '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        self.authorize_url(url.as_str())
    }

    fn dataset_items_url(&self, dataset_id: &str, offset: usize, limit: i64) -> Result<Url> {
        self.endpoint(
            &["datasets", dataset_id, "items"],
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let resp = self.client.get(url).send().await?;
        let body = read_success_body(resp).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post_json<I: Serialize, T: DeserializeOwned>(&self, url: Url, input: &I) -> Result<T> {
        let resp = self.client.post(url).json(input).send().await?;
        let body = read_success_body(resp).await?;
        Ok(serde_json::from_str(&body)?)
    }

    // =========================================================================
    // Datasets
    // =========================================================================

    /// List the ids of every dataset visible to the token, including unnamed
    /// datasets produced by actor runs.
    pub async fn list_dataset_ids(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["datasets"], &[("unnamed", "1".to_string())])?;
        let resp: ApiResponse<DatasetList> = self.get_json(url).await?;

        let ids: Vec<String> = resp.data.items.into_iter().map(|d| d.id).collect();
        tracing::debug!(count = ids.len(), "Listed Apify datasets");
        Ok(ids)
    }

    /// Fetch one page of raw dataset items. A non-positive `limit` requests a
    /// default-sized page.
    pub async fn get_dataset_items_page(
        &self,
        dataset_id: &str,
        offset: usize,
        limit: i64,
    ) -> Result<Vec<Value>> {
        if dataset_id.is_empty() {
            return Err(ApifyError::InvalidArgument(
                "dataset ID cannot be empty".to_string(),
            ));
        }
        let limit = if limit <= 0 {
            DEFAULT_PAGE_SIZE as i64
        } else {
            limit
        };

        let url = self.dataset_items_url(dataset_id, offset, limit)?;
        let items: Vec<Value> = self.get_json(url).await?;

        tracing::debug!(dataset_id, offset, count = items.len(), "Fetched dataset page");
        Ok(items)
    }

    /// Fetch every item of a dataset by walking offset pages until a page
    /// comes back empty or short.
    ///
    /// Offsets advance by the number of items actually returned. The dataset
    /// is assumed not to change while it is being paged.
    pub async fn get_all_dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>> {
        if dataset_id.is_empty() {
            return Err(ApifyError::InvalidArgument(
                "dataset ID cannot be empty".to_string(),
            ));
        }

        let limit = self.page_size;
        let mut all_items = Vec::new();
        let mut offset = 0;

        loop {
            let items = self
                .get_dataset_items_page(dataset_id, offset, limit as i64)
                .await?;
            let count = items.len();
            if count == 0 {
                break;
            }

            all_items.extend(items);
            offset += count;

            if count < limit {
                break;
            }
        }

        tracing::info!(dataset_id, total = all_items.len(), "Fetched all dataset items");
        Ok(all_items)
    }

    // =========================================================================
    // Actor runs
    // =========================================================================

    /// Start an actor run. Returns immediately with run metadata.
    pub async fn run_actor<I: Serialize>(
        &self,
        actor_id: &str,
        input: &I,
        options: &RunOptions,
    ) -> Result<RunData> {
        if actor_id.is_empty() {
            return Err(ApifyError::InvalidArgument(
                "actor ID cannot be empty".to_string(),
            ));
        }

        let mut url = self.endpoint(&["acts", actor_id, "runs"], &[])?;
        url.query_pairs_mut().extend_pairs(options.query_pairs());

        let resp: ApiResponse<RunData> = self.post_json(url, input).await?;
        tracing::info!(run_id = %resp.data.id, status = %resp.data.status, "Apify run started");
        Ok(resp.data)
    }

    /// Start the Facebook groups scraper for the given group URLs.
    pub async fn start_facebook_groups_scrape(
        &self,
        group_urls: &[String],
        only_posts_newer_than: Option<&str>,
        view_option: Option<&str>,
    ) -> Result<RunData> {
        let input = FacebookGroupsScraperInput {
            start_urls: group_urls
                .iter()
                .map(|url| StartUrl { url: url.clone() })
                .collect(),
            only_posts_newer_than: only_posts_newer_than.map(str::to_string),
            view_option: view_option.map(str::to_string),
        };
        let options = RunOptions {
            memory_mbytes: Some(4096),
            timeout_secs: Some(3600),
            ..Default::default()
        };

        tracing::info!(groups = group_urls.len(), "Starting Facebook groups scrape");
        self.run_actor(FACEBOOK_GROUPS_SCRAPER, &input, &options)
            .await
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = self.endpoint(
                &["actor-runs", run_id],
                &[("waitForFinish", "60".to_string())],
            )?;
            let resp: ApiResponse<RunData> = self.get_json(url).await?;

            match resp.data.status.as_str() {
                "SUCCEEDED" => return Ok(resp.data),
                _ if resp.data.is_finished() => {
                    return Err(ApifyError::RunFailed(resp.data.status));
                }
                _ => {
                    tracing::debug!(run_id, status = %resp.data.status, "Run still in progress");
                }
            }
        }
    }
}

async fn read_success_body(resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApifyError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(resp.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApifyClient {
        ApifyClient::new("secret".to_string())
    }

    #[test]
    fn authorize_url_appends_token() {
        let url = client()
            .authorize_url("https://api.apify.com/v2/datasets?unnamed=1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.apify.com/v2/datasets?unnamed=1&token=secret"
        );
    }

    #[test]
    fn authorize_url_replaces_existing_token() {
        let url = client()
            .authorize_url("https://api.apify.com/v2/datasets?token=old&unnamed=1")
            .unwrap();
        let tokens: Vec<_> = url
            .query_pairs()
            .filter(|(k, _)| k == "token")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(tokens, vec!["secret".to_string()]);
    }

    #[test]
    fn authorize_url_rejects_unparseable_url() {
        let err = client().authorize_url("://invalid-url").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn dataset_id_is_escaped_as_one_path_segment() {
        let url = client()
            .with_base_url("https://api.apify.com/v2/")
            .dataset_items_url("a/b?c#d", 0, 10)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.apify.com/v2/datasets/a%2Fb%3Fc%23d/items?offset=0&limit=10&token=secret"
        );
        assert_eq!(url.path_segments().unwrap().count(), 4);
    }

    #[test]
    fn plain_dataset_id_keeps_expected_url() {
        let url = client().dataset_items_url("ds-1", 2000, 1000).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.apify.com/v2/datasets/ds-1/items?offset=2000&limit=1000&token=secret"
        );
    }

    #[test]
    fn try_new_rejects_empty_token() {
        assert!(ApifyClient::try_new(String::new()).is_err());
        assert!(ApifyClient::try_new("t".into()).is_ok());
    }

    #[test]
    fn zero_page_size_falls_back_to_default() {
        assert_eq!(client().with_page_size(0).page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(client().with_page_size(25).page_size(), 25);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let c = client().with_base_url("http://localhost:1234/");
        assert_eq!(c.base_url(), "http://localhost:1234");
    }

    #[tokio::test]
    async fn empty_dataset_id_is_rejected_without_network() {
        // Unroutable base URL: any request attempt would surface as Network, not InvalidArgument.
        let c = client().with_base_url("http://127.0.0.1:9");
        assert!(c.get_all_dataset_items("").await.unwrap_err().is_invalid_argument());
        assert!(c
            .get_dataset_items_page("", 0, 10)
            .await
            .unwrap_err()
            .is_invalid_argument());
    }
}
