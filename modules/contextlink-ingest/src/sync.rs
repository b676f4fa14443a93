use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::record::NewRawRecord;
use crate::source::DatasetSource;
use crate::stats::SyncStats;
use crate::store::RawRecordStore;

/// Channel label stamped on every record ingested from an Apify dataset.
pub const APIFY_DATASET_CHANNEL: &str = "apify_dataset";

/// One full pass: list datasets, page each to exhaustion, fingerprint and
/// store every item.
///
/// A listing failure aborts the pass. A dataset that fails to fetch is
/// skipped, and an item that fails to store is skipped; neither stops the
/// rest of the pass.
pub struct DatasetSync {
    source: Arc<dyn DatasetSource>,
    store: Arc<dyn RawRecordStore>,
}

impl DatasetSync {
    pub fn new(source: Arc<dyn DatasetSource>, store: Arc<dyn RawRecordStore>) -> Self {
        Self { source, store }
    }

    pub async fn run(&self) -> Result<SyncStats, PipelineError> {
        let span = info_span!("sync_pass", pass_id = %Uuid::new_v4());
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> Result<SyncStats, PipelineError> {
        let mut stats = SyncStats::default();

        info!("Fetching all dataset IDs");
        let dataset_ids = match self.source.list_dataset_ids().await {
            Ok(ids) => ids,
            Err(e) => {
                error!(error = %e, "Failed to list datasets, aborting sync pass");
                return Err(e);
            }
        };
        stats.datasets_listed = dataset_ids.len() as u64;
        info!(count = dataset_ids.len(), "Found datasets");

        let mut seen_fingerprints = HashSet::new();

        for dataset_id in &dataset_ids {
            info!(dataset_id = %dataset_id, "Processing dataset");

            let items = match self.source.fetch_all(dataset_id).await {
                Ok(items) => items,
                Err(e) => {
                    warn!(dataset_id = %dataset_id, error = %e, "Failed to fetch dataset items, skipping dataset");
                    stats.datasets_failed += 1;
                    continue;
                }
            };
            stats.items_fetched += items.len() as u64;

            for item in items {
                let record = NewRawRecord::new(APIFY_DATASET_CHANNEL, item);
                if !seen_fingerprints.insert(record.hash_content().to_string()) {
                    stats.duplicate_fingerprints += 1;
                }

                match self.store.create(&record).await {
                    Ok(_) => stats.records_created += 1,
                    Err(e) => {
                        warn!(
                            dataset_id = %dataset_id,
                            hash_content = %record.hash_content(),
                            error = %e,
                            "Failed to store raw record, skipping item"
                        );
                        stats.records_failed += 1;
                    }
                }
            }
        }

        info!("Sync pass complete. {stats}");
        Ok(stats)
    }
}
