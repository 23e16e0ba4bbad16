//! Persistence boundary for sensor records.

use async_trait::async_trait;
use gatewarden_types::{Sensor, SensorId, StoreError};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Durable storage for sensor records. Single-entity writes are assumed
/// atomic; concurrent writers resolve last-writer-wins at the record
/// level.
#[async_trait]
pub trait SensorStore: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, sensor: Sensor) -> Result<(), StoreError>;

    /// Fetch a record by internal id.
    async fn get(&self, id: SensorId) -> Result<Option<Sensor>, StoreError>;

    /// Fetch a record by external uid (exact, case-sensitive).
    async fn find_by_uid(&self, uid: &str) -> Result<Option<Sensor>, StoreError>;

    /// Replace an existing record.
    async fn update(&self, sensor: Sensor) -> Result<(), StoreError>;

    /// All records, in no particular order.
    async fn list(&self) -> Result<Vec<Sensor>, StoreError>;
}

/// In-memory sensor store.
#[derive(Default)]
pub struct MemorySensorStore {
    records: RwLock<HashMap<SensorId, Sensor>>,
}

impl MemorySensorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SensorStore for MemorySensorStore {
    async fn insert(&self, sensor: Sensor) -> Result<(), StoreError> {
        self.records.write().insert(sensor.id, sensor);
        Ok(())
    }

    async fn get(&self, id: SensorId) -> Result<Option<Sensor>, StoreError> {
        Ok(self.records.read().get(&id).cloned())
    }

    async fn find_by_uid(&self, uid: &str) -> Result<Option<Sensor>, StoreError> {
        Ok(self
            .records
            .read()
            .values()
            .find(|s| s.uid == uid)
            .cloned())
    }

    async fn update(&self, sensor: Sensor) -> Result<(), StoreError> {
        self.records.write().insert(sensor.id, sensor);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Sensor>, StoreError> {
        Ok(self.records.read().values().cloned().collect())
    }
}
