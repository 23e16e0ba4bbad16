//! Ledger operations: append, query, integrity verification.

use crate::{ChainError, EventStore, HashChain};
use chrono::{DateTime, Utc};
use gatewarden_types::{CoreError, CoreResult, Event, EventDraft, EventKind, SensorId};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error};

/// Ledger configuration.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Upper bound applied to queries that specify no explicit limit.
    /// Keeps every query finite.
    pub default_query_limit: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_query_limit: 1_000,
        }
    }
}

/// Filter for ledger queries. All fields are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Only events attributed to this sensor.
    pub sensor: Option<SensorId>,
    /// Only events of this kind.
    pub kind: Option<EventKind>,
    /// Only events at or after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Maximum number of events to return.
    pub limit: Option<usize>,
}

impl EventFilter {
    /// Match everything (up to the default limit).
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one sensor.
    pub fn sensor(mut self, sensor: SensorId) -> Self {
        self.sensor = Some(sensor);
        self
    }

    /// Restrict to one kind.
    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restrict to events at or after `since`.
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Cap the result size.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, event: &Event) -> bool {
        if let Some(sensor) = self.sensor {
            if event.source.sensor_id() != Some(sensor) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if event.kind != kind {
                return false;
            }
        }
        if let Some(since) = self.since {
            if event.timestamp < since {
                return false;
            }
        }
        true
    }
}

/// The append-only audit trail. Cheap to clone; clones share the store
/// and the hash chain.
#[derive(Clone)]
pub struct EventLedger {
    store: Arc<dyn EventStore>,
    chain: Arc<RwLock<HashChain>>,
    append_gate: Arc<tokio::sync::Mutex<()>>,
    config: Arc<LedgerConfig>,
}

impl EventLedger {
    /// Create a ledger over the given store.
    pub fn new(store: Arc<dyn EventStore>, config: LedgerConfig) -> Self {
        Self {
            store,
            chain: Arc::new(RwLock::new(HashChain::new())),
            append_gate: Arc::new(tokio::sync::Mutex::new(())),
            config: Arc::new(config),
        }
    }

    /// Commit a draft. The store assigns identity, sequence, and
    /// timestamp; the committed record then extends the hash chain.
    /// Fails only on store unavailability.
    pub async fn append(&self, draft: EventDraft) -> CoreResult<Event> {
        // The gate keeps chain order identical to the store's seq order
        // under concurrent appends.
        let _gate = self.append_gate.lock().await;
        let event = self.store.append(draft).await.map_err(|e| {
            error!(error = %e, "event append failed");
            CoreError::from(e)
        })?;
        self.chain.write().extend(&canonical_bytes(&event)?);
        debug!(event = %event.id, kind = %event.kind, "event appended");
        Ok(event)
    }

    /// Query committed events, descending by (timestamp, seq). Finite:
    /// capped by the filter's limit or the configured default.
    pub async fn query(&self, filter: EventFilter) -> CoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .store
            .scan()
            .await?
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();
        events.sort_by(|a, b| (b.timestamp, b.seq).cmp(&(a.timestamp, a.seq)));

        let limit = filter.limit.unwrap_or(self.config.default_query_limit);
        events.truncate(limit);
        Ok(events)
    }

    /// Count committed events matching the filter. Ignores the filter's
    /// limit; used for rollups where truncation would skew the tally.
    pub async fn count(&self, filter: EventFilter) -> CoreResult<usize> {
        Ok(self
            .store
            .scan()
            .await?
            .iter()
            .filter(|e| filter.matches(e))
            .count())
    }

    /// Verify the hash chain and that every stored event still matches
    /// the content recorded for its sequence.
    pub async fn verify_integrity(&self) -> CoreResult<()> {
        let mut events = self.store.scan().await?;
        events.sort_by_key(|e| e.seq);

        // Guard taken after the scan; never held across an await.
        let chain = self.chain.read();
        chain.verify().map_err(chain_unavailable)?;
        for event in &events {
            chain
                .verify_content(event.seq, &canonical_bytes(event)?)
                .map_err(chain_unavailable)?;
        }
        Ok(())
    }
}

fn canonical_bytes(event: &Event) -> CoreResult<Vec<u8>> {
    // Committed events never change, so their JSON form is stable.
    serde_json::to_vec(event).map_err(|e| {
        CoreError::from(gatewarden_types::StoreError::new(format!(
            "event serialization failed: {e}"
        )))
    })
}

fn chain_unavailable(err: ChainError) -> CoreError {
    CoreError::from(gatewarden_types::StoreError::new(format!(
        "ledger integrity check failed: {err}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryEventStore;
    use gatewarden_types::{EventSource, SensorId};

    fn ledger() -> EventLedger {
        EventLedger::new(Arc::new(MemoryEventStore::new()), LedgerConfig::default())
    }

    fn draft(kind: EventKind, sensor: SensorId) -> EventDraft {
        EventDraft::new(kind, EventSource::sensor(sensor)).message("test event")
    }

    #[tokio::test]
    async fn test_append_then_query_round_trips() {
        let ledger = ledger();
        let sensor = SensorId::new();
        ledger
            .append(draft(EventKind::AccessDenied, sensor))
            .await
            .unwrap();
        let newest = ledger
            .append(draft(EventKind::AccessGranted, sensor))
            .await
            .unwrap();

        let events = ledger.query(EventFilter::all()).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].id, newest.id);
    }

    #[tokio::test]
    async fn test_filter_by_sensor_and_kind() {
        let ledger = ledger();
        let ours = SensorId::new();
        let theirs = SensorId::new();
        ledger
            .append(draft(EventKind::AccessGranted, ours))
            .await
            .unwrap();
        ledger
            .append(draft(EventKind::AccessDenied, ours))
            .await
            .unwrap();
        ledger
            .append(draft(EventKind::AccessGranted, theirs))
            .await
            .unwrap();

        let events = ledger
            .query(EventFilter::all().sensor(ours).kind(EventKind::AccessGranted))
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source.sensor_id(), Some(ours));
    }

    #[tokio::test]
    async fn test_since_filter() {
        let ledger = ledger();
        let sensor = SensorId::new();
        let old = ledger
            .append(draft(EventKind::AccessGranted, sensor))
            .await
            .unwrap();

        let events = ledger
            .query(EventFilter::all().since(old.timestamp + chrono::Duration::seconds(1)))
            .await
            .unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn test_query_limit() {
        let ledger = ledger();
        let sensor = SensorId::new();
        for _ in 0..5 {
            ledger
                .append(draft(EventKind::AccessAttempted, sensor))
                .await
                .unwrap();
        }
        let events = ledger.query(EventFilter::all().limit(2)).await.unwrap();
        assert_eq!(events.len(), 2);
        // Newest first even when truncated.
        assert!(events[0].seq > events[1].seq);
    }

    /// Store that stalls its first append after the seq is assigned,
    /// widening the window between seq assignment and chain extension.
    struct StallingStore {
        inner: MemoryEventStore,
        stall_first: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl crate::EventStore for StallingStore {
        async fn append(
            &self,
            draft: EventDraft,
        ) -> Result<Event, gatewarden_types::StoreError> {
            let event = self.inner.append(draft).await?;
            if self
                .stall_first
                .swap(false, std::sync::atomic::Ordering::SeqCst)
            {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            }
            Ok(event)
        }

        async fn scan(&self) -> Result<Vec<Event>, gatewarden_types::StoreError> {
            self.inner.scan().await
        }
    }

    #[tokio::test]
    async fn test_concurrent_appends_keep_chain_in_seq_order() {
        let store = Arc::new(StallingStore {
            inner: MemoryEventStore::new(),
            stall_first: std::sync::atomic::AtomicBool::new(true),
        });
        let ledger = EventLedger::new(store, LedgerConfig::default());
        let sensor = SensorId::new();

        let (first, second) = tokio::join!(
            ledger.append(draft(EventKind::AccessAttempted, sensor)),
            ledger.append(draft(EventKind::AccessGranted, sensor)),
        );
        let (first, second) = (first.unwrap(), second.unwrap());
        assert_ne!(first.seq, second.seq);

        // An untampered ledger verifies regardless of append interleaving.
        assert!(ledger.verify_integrity().await.is_ok());
    }

    #[tokio::test]
    async fn test_integrity_over_appends() {
        let ledger = ledger();
        let sensor = SensorId::new();
        for _ in 0..4 {
            ledger
                .append(draft(EventKind::AccessGranted, sensor))
                .await
                .unwrap();
        }
        assert!(ledger.verify_integrity().await.is_ok());
    }
}
