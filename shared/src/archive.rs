use async_trait::async_trait;
use parking_lot::Mutex;

use crate::types::Deviation;

/// Durable-store boundary for deviation records. Writes are best-effort;
/// the in-process ledger stays authoritative and is never rolled back when
/// a write fails.
#[async_trait]
pub trait DeviationArchive: Send + Sync {
    async fn persist(&self, deviation: &Deviation) -> anyhow::Result<()>;
}

/// In-memory archive, enough to satisfy the contract in tests.
#[derive(Default)]
pub struct MemoryArchive {
    records: Mutex<Vec<Deviation>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Deviation> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl DeviationArchive for MemoryArchive {
    async fn persist(&self, deviation: &Deviation) -> anyhow::Result<()> {
        self.records.lock().push(deviation.clone());
        Ok(())
    }
}
