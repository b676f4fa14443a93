use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

// --- Datasets ---

/// Paginated listing returned by `GET /datasets`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetList {
    #[serde(default)]
    pub items: Vec<DatasetSummary>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
}

/// One dataset entry in a listing. Only `id` is required; everything else is
/// informational and tolerated when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSummary {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "itemCount")]
    pub item_count: Option<u64>,
    #[serde(rename = "cleanItemCount")]
    pub clean_item_count: Option<u64>,
    #[serde(rename = "actId")]
    pub act_id: Option<String>,
    #[serde(rename = "actRunId")]
    pub act_run_id: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "modifiedAt")]
    pub modified_at: Option<DateTime<Utc>>,
}

// --- Actor runs ---

/// Input for the apify/facebook-groups-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct FacebookGroupsScraperInput {
    #[serde(rename = "startUrls")]
    pub start_urls: Vec<StartUrl>,
    #[serde(rename = "onlyPostsNewerThan", skip_serializing_if = "Option::is_none")]
    pub only_posts_newer_than: Option<String>,
    #[serde(rename = "viewOption", skip_serializing_if = "Option::is_none")]
    pub view_option: Option<String>,
}

/// A start URL entry for scraper input.
#[derive(Debug, Clone, Serialize)]
pub struct StartUrl {
    pub url: String,
}

/// Run options sent as query parameters when starting an actor.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Actor build tag, e.g. "latest".
    pub build: Option<String>,
    /// Memory limit in megabytes.
    pub memory_mbytes: Option<u32>,
    /// Run timeout in seconds.
    pub timeout_secs: Option<u32>,
}

impl RunOptions {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(build) = &self.build {
            pairs.push(("build", build.clone()));
        }
        if let Some(memory) = self.memory_mbytes {
            pairs.push(("memory", memory.to_string()));
        }
        if let Some(timeout) = self.timeout_secs {
            pairs.push(("timeout", timeout.to_string()));
        }
        pairs
    }
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    #[serde(rename = "actId")]
    pub act_id: Option<String>,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunData {
    /// READY and RUNNING are the only non-terminal states.
    pub fn is_finished(&self) -> bool {
        !matches!(self.status.as_str(), "READY" | "RUNNING")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_list_tolerates_sparse_entries() {
        let list: DatasetList =
            serde_json::from_str(r#"{"items":[{"id":"a"},{"id":"b","itemCount":12}]}"#).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[1].item_count, Some(12));
        assert_eq!(list.total, 0);
    }

    #[test]
    fn run_options_only_emit_set_fields() {
        let opts = RunOptions {
            memory_mbytes: Some(4096),
            ..Default::default()
        };
        assert_eq!(opts.query_pairs(), vec![("memory", "4096".to_string())]);
    }

    #[test]
    fn facebook_input_skips_unset_filters() {
        let input = FacebookGroupsScraperInput {
            start_urls: vec![StartUrl {
                url: "https://facebook.com/groups/x".into(),
            }],
            only_posts_newer_than: None,
            view_option: Some("CHRONOLOGICAL".into()),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("onlyPostsNewerThan").is_none());
        assert_eq!(json["viewOption"], "CHRONOLOGICAL");
        assert_eq!(json["startUrls"][0]["url"], "https://facebook.com/groups/x");
    }
}
