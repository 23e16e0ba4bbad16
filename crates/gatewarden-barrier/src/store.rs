//! Persistence boundary for barrier records.

use async_trait::async_trait;
use gatewarden_types::{Barrier, BarrierId, StoreError, ZoneId};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Durable storage for barrier records. Single-entity writes are assumed
/// atomic.
#[async_trait]
pub trait BarrierStore: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, barrier: Barrier) -> Result<(), StoreError>;

    /// Fetch a record by id.
    async fn get(&self, id: BarrierId) -> Result<Option<Barrier>, StoreError>;

    /// Fetch a record by name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Barrier>, StoreError>;

    /// Fetch the barrier guarding a zone, if one exists.
    async fn find_by_zone(&self, zone: ZoneId) -> Result<Option<Barrier>, StoreError>;

    /// Replace an existing record.
    async fn update(&self, barrier: Barrier) -> Result<(), StoreError>;

    /// All records, in no particular order.
    async fn list(&self) -> Result<Vec<Barrier>, StoreError>;
}

/// In-memory barrier store.
#[derive(Default)]
pub struct MemoryBarrierStore {
    records: RwLock<HashMap<BarrierId, Barrier>>,
}

impl MemoryBarrierStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BarrierStore for MemoryBarrierStore {
    async fn insert(&self, barrier: Barrier) -> Result<(), StoreError> {
        self.records.write().insert(barrier.id, barrier);
        Ok(())
    }

    async fn get(&self, id: BarrierId) -> Result<Option<Barrier>, StoreError> {
        Ok(self.records.read().get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Barrier>, StoreError> {
        Ok(self
            .records
            .read()
            .values()
            .find(|b| b.name == name)
            .cloned())
    }

    async fn find_by_zone(&self, zone: ZoneId) -> Result<Option<Barrier>, StoreError> {
        Ok(self
            .records
            .read()
            .values()
            .find(|b| b.zone == Some(zone))
            .cloned())
    }

    async fn update(&self, barrier: Barrier) -> Result<(), StoreError> {
        self.records.write().insert(barrier.id, barrier);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Barrier>, StoreError> {
        Ok(self.records.read().values().cloned().collect())
    }
}
