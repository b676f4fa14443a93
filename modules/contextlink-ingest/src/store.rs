//! Persistence of raw ingested records.
//!
//! Fingerprint uniqueness is not enforced: `create` stores whatever it is
//! given and `hash_content` carries a plain (non-unique) index.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::record::{NewRawRecord, RawRecord};

/// Storage for raw records. Implementations assign identity and timestamps.
#[async_trait]
pub trait RawRecordStore: Send + Sync {
    /// Persist a record under a fresh id. Rejects an empty channel before
    /// touching the backend.
    async fn create(&self, record: &NewRawRecord) -> Result<RawRecord, PipelineError>;

    /// Every stored record, oldest first. Empty when nothing is stored.
    async fn find_all(&self) -> Result<Vec<RawRecord>, PipelineError>;
}

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

/// `social_post_raw` table. `created_at`/`updated_at` come from column
/// defaults so every instance shares the database clock.
#[derive(Clone)]
pub struct PgRawRecordStore {
    pool: PgPool,
}

impl PgRawRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded schema migrations. Idempotent.
    pub async fn migrate(&self) -> Result<(), PipelineError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PipelineError::Store(format!("migration failed: {e}")))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RawRecord>, PipelineError> {
        let row = sqlx::query_as::<_, RawRecord>(
            r#"
            SELECT id, channel, raw_content, hash_content, created_at, updated_at
            FROM social_post_raw
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_by_channel(&self, channel: &str) -> Result<Vec<RawRecord>, PipelineError> {
        let rows = sqlx::query_as::<_, RawRecord>(
            r#"
            SELECT id, channel, raw_content, hash_content, created_at, updated_at
            FROM social_post_raw
            WHERE channel = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(channel)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All records sharing a fingerprint. More than one row means the same
    /// payload was ingested more than once.
    pub async fn find_by_fingerprint(
        &self,
        hash_content: &str,
    ) -> Result<Vec<RawRecord>, PipelineError> {
        let rows = sqlx::query_as::<_, RawRecord>(
            r#"
            SELECT id, channel, raw_content, hash_content, created_at, updated_at
            FROM social_post_raw
            WHERE hash_content = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(hash_content)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl RawRecordStore for PgRawRecordStore {
    async fn create(&self, record: &NewRawRecord) -> Result<RawRecord, PipelineError> {
        record.validate()?;

        let row = sqlx::query_as::<_, RawRecord>(
            r#"
            INSERT INTO social_post_raw (id, channel, raw_content, hash_content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, channel, raw_content, hash_content, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.channel())
        .bind(record.raw_content())
        .bind(record.hash_content())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_all(&self) -> Result<Vec<RawRecord>, PipelineError> {
        let rows = sqlx::query_as::<_, RawRecord>(
            r#"
            SELECT id, channel, raw_content, hash_content, created_at, updated_at
            FROM social_post_raw
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Process-local store for dry runs and tests.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<Vec<RawRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl RawRecordStore for InMemoryRecordStore {
    async fn create(&self, record: &NewRawRecord) -> Result<RawRecord, PipelineError> {
        record.validate()?;

        let now = Utc::now();
        let stored = RawRecord {
            id: Uuid::new_v4(),
            channel: record.channel().to_string(),
            raw_content: record.raw_content().clone(),
            hash_content: record.hash_content().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.records.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_all(&self) -> Result<Vec<RawRecord>, PipelineError> {
        Ok(self.records.lock().await.clone())
    }
}
