use std::fmt;

/// Counters from one sync pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    pub datasets_listed: u64,
    pub datasets_failed: u64,
    pub items_fetched: u64,
    pub records_created: u64,
    pub records_failed: u64,
    /// Items whose fingerprint already appeared earlier in the same pass.
    /// They are still stored.
    pub duplicate_fingerprints: u64,
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "datasets_listed={} datasets_failed={} items_fetched={} records_created={} records_failed={} duplicate_fingerprints={}",
            self.datasets_listed,
            self.datasets_failed,
            self.items_fetched,
            self.records_created,
            self.records_failed,
            self.duplicate_fingerprints,
        )
    }
}

/// Counters from one classification pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClassifyStats {
    pub records_loaded: u64,
    pub classified: u64,
    pub decode_failed: u64,
    /// Posts that decoded with blank text. They are still classified.
    pub empty_text: u64,
}

impl ClassifyStats {
    pub fn skipped(&self) -> u64 {
        self.decode_failed
    }
}

impl fmt::Display for ClassifyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "records_loaded={} classified={} decode_failed={} empty_text={}",
            self.records_loaded, self.classified, self.decode_failed, self.empty_text,
        )
    }
}
