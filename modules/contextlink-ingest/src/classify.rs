use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::decode::decode_social_post;
use crate::error::PipelineError;
use crate::stats::ClassifyStats;
use crate::store::RawRecordStore;

/// One full pass: load every raw record, decode it as a social post and
/// classify its text.
///
/// Records that fail to decode are skipped. A classifier failure stops the
/// whole pass so an outage is surfaced instead of silently degrading.
/// Results are logged, not persisted.
pub struct PostClassification {
    store: Arc<dyn RawRecordStore>,
    classifier: Arc<dyn Classifier>,
}

impl PostClassification {
    pub fn new(store: Arc<dyn RawRecordStore>, classifier: Arc<dyn Classifier>) -> Self {
        Self { store, classifier }
    }

    pub async fn run(&self) -> Result<ClassifyStats, PipelineError> {
        let span = info_span!("classify_pass", pass_id = %Uuid::new_v4());
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> Result<ClassifyStats, PipelineError> {
        let mut stats = ClassifyStats::default();

        let records = self.store.find_all().await.map_err(|e| {
            error!(error = %e, "Failed to load raw records, aborting classification pass");
            e
        })?;
        stats.records_loaded = records.len() as u64;
        info!(count = records.len(), "Found social posts");

        for record in &records {
            let post = match decode_social_post(&record.raw_content) {
                Ok(post) => post,
                Err(e) => {
                    warn!(record_id = %record.id, error = %e, "Failed to decode raw content, skipping");
                    stats.decode_failed += 1;
                    continue;
                }
            };

            if !post.has_text() {
                debug!(record_id = %record.id, "Post has no text");
                stats.empty_text += 1;
            }

            let result = match self.classifier.classify(&post.text).await {
                Ok(result) => result,
                Err(e) => {
                    error!(record_id = %record.id, error = %e, "Failed to classify social post, aborting pass");
                    return Err(PipelineError::Classifier(e.to_string()));
                }
            };

            info!(
                record_id = %record.id,
                permalink = %post.permalink,
                category = %result.category,
                is_relevant = result.is_relevant,
                confidence = result.confidence,
                "Classified social post"
            );
            stats.classified += 1;
        }

        info!("Classification pass complete. {stats}");
        Ok(stats)
    }
}
