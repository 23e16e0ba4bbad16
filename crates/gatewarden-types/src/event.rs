//! Immutable audit event records.

use crate::{BarrierId, EventId, SensorId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Kind of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    /// A presentation was received and is being evaluated.
    AccessAttempted,
    /// A presentation was admitted.
    AccessGranted,
    /// A presentation was refused.
    AccessDenied,
    /// A barrier was opened by an administrative command.
    BarrierOpenedManual,
    /// A barrier was closed by an administrative command.
    BarrierClosedManual,
}

impl EventKind {
    /// Whether this kind records an access decision (as opposed to a
    /// manual barrier command).
    pub fn is_access(&self) -> bool {
        matches!(
            self,
            Self::AccessAttempted | Self::AccessGranted | Self::AccessDenied
        )
    }
}

/// The origin an event is attributed to.
///
/// Every event carries a source; when no sensor identity resolved the
/// presented uid is kept verbatim instead of pointing at an unrelated
/// sensor record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventSource {
    /// A registered sensor.
    Sensor {
        /// The resolved sensor.
        sensor_id: SensorId,
    },
    /// A presentation whose uid matched no registered sensor.
    Unidentified {
        /// The uid exactly as presented.
        presented_uid: String,
    },
    /// An administrative command with no sensor involved.
    Operator,
}

impl EventSource {
    /// Attribute to a registered sensor.
    pub fn sensor(sensor_id: SensorId) -> Self {
        Self::Sensor { sensor_id }
    }

    /// Attribute to an unresolved credential.
    pub fn unidentified(presented_uid: impl Into<String>) -> Self {
        Self::Unidentified {
            presented_uid: presented_uid.into(),
        }
    }

    /// The sensor this source resolves to, if any.
    pub fn sensor_id(&self) -> Option<SensorId> {
        match self {
            Self::Sensor { sensor_id } => Some(*sensor_id),
            _ => None,
        }
    }
}

/// A committed ledger record. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier, assigned at append time.
    pub id: EventId,
    /// Store-assigned insertion sequence; breaks timestamp ties.
    pub seq: u64,
    /// When the event was appended.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub kind: EventKind,
    /// Who or what the event is attributed to.
    pub source: EventSource,
    /// Barrier involved, if any.
    pub barrier: Option<BarrierId>,
    /// User who performed the action, for administrative commands.
    pub acting_user: Option<UserId>,
    /// Human-readable description.
    pub message: String,
}

/// An event pending append. The ledger assigns identity, sequence, and
/// timestamp when the draft is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    /// What happened.
    pub kind: EventKind,
    /// Who or what the event is attributed to.
    pub source: EventSource,
    /// Barrier involved, if any.
    pub barrier: Option<BarrierId>,
    /// User who performed the action.
    pub acting_user: Option<UserId>,
    /// Human-readable description.
    pub message: String,
}

impl EventDraft {
    /// Create a draft with the required fields.
    pub fn new(kind: EventKind, source: EventSource) -> Self {
        Self {
            kind,
            source,
            barrier: None,
            acting_user: None,
            message: String::new(),
        }
    }

    /// Reference a barrier.
    pub fn barrier(mut self, barrier: BarrierId) -> Self {
        self.barrier = Some(barrier);
        self
    }

    /// Record the acting user.
    pub fn acting_user(mut self, user: UserId) -> Self {
        self.acting_user = Some(user);
        self
    }

    /// Set the description.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&EventKind::BarrierOpenedManual).unwrap();
        assert_eq!(json, "\"barrier_opened_manual\"");
    }

    #[test]
    fn test_unidentified_source_keeps_uid() {
        let source = EventSource::unidentified("AA:BB:CC:DD:EE:99");
        assert_eq!(source.sensor_id(), None);
        match source {
            EventSource::Unidentified { presented_uid } => {
                assert_eq!(presented_uid, "AA:BB:CC:DD:EE:99");
            }
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn test_source_tagged_serialization() {
        let source = EventSource::sensor(SensorId::new());
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "sensor");
    }

    #[test]
    fn test_draft_builder() {
        let barrier = BarrierId::new();
        let user = UserId::new();
        let draft = EventDraft::new(EventKind::BarrierClosedManual, EventSource::Operator)
            .barrier(barrier)
            .acting_user(user)
            .message("barrier closed manually");
        assert_eq!(draft.barrier, Some(barrier));
        assert_eq!(draft.acting_user, Some(user));
        assert!(!draft.kind.is_access());
    }
}
