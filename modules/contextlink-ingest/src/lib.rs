//! Ingestion and classification of scraped social media datasets.
//!
//! [`sync::DatasetSync`] pulls every Apify dataset, fingerprints each item
//! and stores it as a raw record. [`classify::PostClassification`] later
//! decodes those records as social posts and runs them through a
//! [`classifier::Classifier`].

pub mod classifier;
pub mod classify;
pub mod decode;
pub mod error;
pub mod fingerprint;
pub mod record;
pub mod scheduler;
pub mod source;
pub mod stats;
pub mod store;
pub mod sync;

#[cfg(test)]
mod testing;

pub use classifier::{Classification, Classifier, ClaudeClassifier};
pub use classify::PostClassification;
pub use decode::{decode_social_post, DecodedSocialPost};
pub use error::PipelineError;
pub use fingerprint::fingerprint;
pub use record::{NewRawRecord, RawRecord};
pub use source::DatasetSource;
pub use stats::{ClassifyStats, SyncStats};
pub use store::{InMemoryRecordStore, PgRawRecordStore, RawRecordStore};
pub use sync::{DatasetSync, APIFY_DATASET_CHANNEL};
