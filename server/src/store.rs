//! Extraction record store.
//!
//! DESIGN
//! ======
//! `RecordStore` is the persistence seam used by the API core. The only
//! implementation is `MemoryStore`, which keeps records for the lifetime of
//! the process. Identifiers start at 1 and are never reused.
//!
//! TRADE-OFFS
//! ==========
//! Id assignment and insertion share one mutex acquisition, so parallel
//! handlers in one process never hand out duplicate ids. Separate processes
//! each own their own counter; cross-process uniqueness needs a different
//! `RecordStore` implementation.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use elements::{ElementsInput, ExtractedElementsRecord};

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Assign the next identifier to `input`, store it, and return the record.
    async fn save(&self, input: ElementsInput) -> ExtractedElementsRecord;

    /// Look up a record by identifier.
    async fn get(&self, id: u64) -> Option<ExtractedElementsRecord>;

    /// Number of stored records.
    async fn count(&self) -> usize;
}

pub struct MemoryStore {
    inner: Mutex<MemoryStoreInner>,
}

struct MemoryStoreInner {
    next_id: u64,
    records: HashMap<u64, ExtractedElementsRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: Mutex::new(MemoryStoreInner { next_id: 1, records: HashMap::new() }) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn save(&self, input: ElementsInput) -> ExtractedElementsRecord {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let record = ExtractedElementsRecord::from_input(id, input);
        inner.records.insert(id, record.clone());
        record
    }

    async fn get(&self, id: u64) -> Option<ExtractedElementsRecord> {
        self.lock().records.get(&id).cloned()
    }

    async fn count(&self) -> usize {
        self.lock().records.len()
    }
}
