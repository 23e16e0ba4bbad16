//! Read-only system status rollups.

use chrono::{DateTime, Duration, Utc};
use gatewarden_barrier::BarrierController;
use gatewarden_ledger::{EventFilter, EventLedger};
use gatewarden_registry::SensorRegistry;
use gatewarden_types::{BarrierPosition, CoreResult, EventKind, SensorStatus};
use serde::{Deserialize, Serialize};

/// Sensor counts by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorTally {
    /// All registered sensors.
    pub total: usize,
    /// Sensors with status `active`.
    pub active: usize,
    /// Sensors with status `inactive`.
    pub inactive: usize,
    /// Sensors with status `blocked`.
    pub blocked: usize,
    /// Sensors with status `lost`.
    pub lost: usize,
}

/// Barrier counts by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarrierTally {
    /// All registered barriers.
    pub total: usize,
    /// Barriers currently open.
    pub open: usize,
    /// Barriers currently closed.
    pub closed: usize,
}

/// Event counts within the report window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTally {
    /// All events in the window, regardless of kind.
    pub total: usize,
    /// `access_granted` events in the window.
    pub granted: usize,
    /// `access_denied` events in the window.
    pub denied: usize,
}

/// Point-in-time dashboard rollup. Counts are independently derived reads
/// with no cross-store transaction; mild skew between sections is
/// acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Sensor counts by status.
    pub sensors: SensorTally,
    /// Barrier counts by position.
    pub barriers: BarrierTally,
    /// Event counts within the window.
    pub events: EventTally,
    /// Start of the event window.
    pub window_start: DateTime<Utc>,
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
}

/// Read-only aggregator over the three stores. Stateless; every snapshot
/// is derived fresh.
#[derive(Clone)]
pub struct StatusAggregator {
    sensors: SensorRegistry,
    barriers: BarrierController,
    ledger: EventLedger,
}

impl StatusAggregator {
    /// Create an aggregator over the three stores.
    pub fn new(
        sensors: SensorRegistry,
        barriers: BarrierController,
        ledger: EventLedger,
    ) -> Self {
        Self {
            sensors,
            barriers,
            ledger,
        }
    }

    /// Assemble a report covering the trailing `window`.
    pub async fn snapshot(&self, window: Duration) -> CoreResult<StatusReport> {
        let generated_at = Utc::now();
        let window_start = generated_at - window;

        let mut sensors = SensorTally::default();
        for sensor in self.sensors.list().await? {
            sensors.total += 1;
            match sensor.status {
                SensorStatus::Active => sensors.active += 1,
                SensorStatus::Inactive => sensors.inactive += 1,
                SensorStatus::Blocked => sensors.blocked += 1,
                SensorStatus::Lost => sensors.lost += 1,
            }
        }

        let mut barriers = BarrierTally::default();
        for barrier in self.barriers.list().await? {
            barriers.total += 1;
            match barrier.position {
                BarrierPosition::Open => barriers.open += 1,
                BarrierPosition::Closed => barriers.closed += 1,
            }
        }

        let in_window = EventFilter::all().since(window_start);
        let events = EventTally {
            total: self.ledger.count(in_window.clone()).await?,
            granted: self
                .ledger
                .count(in_window.clone().kind(EventKind::AccessGranted))
                .await?,
            denied: self
                .ledger
                .count(in_window.kind(EventKind::AccessDenied))
                .await?,
        };

        Ok(StatusReport {
            sensors,
            barriers,
            events,
            window_start,
            generated_at,
        })
    }
}
