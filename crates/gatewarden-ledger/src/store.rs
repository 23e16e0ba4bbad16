//! Persistence boundary for the event ledger.

use async_trait::async_trait;
use chrono::Utc;
use gatewarden_types::{Event, EventDraft, EventId, StoreError};
use parking_lot::RwLock;

/// Append-only storage for audit events. The trait deliberately exposes
/// no update or delete; immutability is structural.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Commit a draft, assigning identity, insertion sequence, and
    /// timestamp under the same write.
    async fn append(&self, draft: EventDraft) -> Result<Event, StoreError>;

    /// All committed events, in no particular order.
    async fn scan(&self) -> Result<Vec<Event>, StoreError>;
}

/// In-memory event store.
#[derive(Default)]
pub struct MemoryEventStore {
    records: RwLock<Vec<Event>>,
}

impl MemoryEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append(&self, draft: EventDraft) -> Result<Event, StoreError> {
        let mut records = self.records.write();
        let event = Event {
            id: EventId::new(),
            seq: records.len() as u64,
            timestamp: Utc::now(),
            kind: draft.kind,
            source: draft.source,
            barrier: draft.barrier,
            acting_user: draft.acting_user,
            message: draft.message,
        };
        records.push(event.clone());
        Ok(event)
    }

    async fn scan(&self) -> Result<Vec<Event>, StoreError> {
        Ok(self.records.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatewarden_types::{EventKind, EventSource};

    #[tokio::test]
    async fn test_append_assigns_sequential_seq() {
        let store = MemoryEventStore::new();
        let first = store
            .append(EventDraft::new(EventKind::AccessAttempted, EventSource::Operator))
            .await
            .unwrap();
        let second = store
            .append(EventDraft::new(EventKind::AccessGranted, EventSource::Operator))
            .await
            .unwrap();
        assert_eq!(first.seq, 0);
        assert_eq!(second.seq, 1);
        assert_ne!(first.id, second.id);
        assert!(second.timestamp >= first.timestamp);
    }
}
