//! Structured outcome of evaluating a presentation.

use crate::{Barrier, EventId, Sensor, SensorStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a presentation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenyReason {
    /// The presented uid matched no registered sensor.
    Unregistered {
        /// The uid exactly as presented.
        presented_uid: String,
    },
    /// The sensor is registered but disabled.
    Inactive,
    /// The sensor was blocked by an administrator.
    Blocked,
    /// The sensor was reported lost.
    Lost,
}

impl DenyReason {
    /// Derive the denial reason for a non-admitting status.
    /// Returns `None` for [`SensorStatus::Active`].
    pub fn for_status(status: SensorStatus) -> Option<Self> {
        match status {
            SensorStatus::Active => None,
            SensorStatus::Inactive => Some(Self::Inactive),
            SensorStatus::Blocked => Some(Self::Blocked),
            SensorStatus::Lost => Some(Self::Lost),
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unregistered { .. } => write!(f, "unregistered sensor"),
            Self::Inactive => write!(f, "sensor inactive"),
            Self::Blocked => write!(f, "sensor blocked by administrator"),
            Self::Lost => write!(f, "sensor reported lost"),
        }
    }
}

/// Whether a presentation was admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AccessOutcome {
    /// The carrier was admitted.
    Granted,
    /// The carrier was refused.
    Denied {
        /// Why the carrier was refused.
        reason: DenyReason,
    },
}

impl AccessOutcome {
    /// Check whether the outcome admits the carrier.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Transport-agnostic status classification. Boundary layers map these to
/// their protocol's status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusHint {
    /// Decision made and recorded.
    Ok,
    /// Referenced entity does not exist.
    NotFound,
    /// Malformed input.
    Invalid,
    /// Policy refused the action.
    Forbidden,
    /// Persistence failure.
    Unavailable,
}

/// The structured result of a decision-path operation. Denials are
/// outcomes, not errors; by the time a `Decision` exists the audit record
/// has already been written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Granted or denied, with reason.
    pub outcome: AccessOutcome,
    /// Snapshot of the sensor at decision time, if one resolved.
    pub sensor: Option<Sensor>,
    /// Snapshot of the barrier after actuation, if one was involved.
    pub barrier: Option<Barrier>,
    /// The audit event recording this decision.
    pub event_id: EventId,
    /// When the decision was recorded.
    pub timestamp: DateTime<Utc>,
}

impl Decision {
    /// Whether the carrier was admitted.
    pub fn granted(&self) -> bool {
        self.outcome.is_granted()
    }

    /// The denial reason, if refused.
    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match &self.outcome {
            AccessOutcome::Denied { reason } => Some(reason),
            AccessOutcome::Granted => None,
        }
    }

    /// Transport-agnostic status classification for this decision.
    pub fn status_hint(&self) -> StatusHint {
        match &self.outcome {
            AccessOutcome::Granted => StatusHint::Ok,
            AccessOutcome::Denied {
                reason: DenyReason::Unregistered { .. },
            } => StatusHint::NotFound,
            AccessOutcome::Denied { .. } => StatusHint::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(
            DenyReason::Unregistered {
                presented_uid: "XX".into()
            }
            .to_string(),
            "unregistered sensor"
        );
        assert_eq!(
            DenyReason::Blocked.to_string(),
            "sensor blocked by administrator"
        );
        assert_eq!(DenyReason::Lost.to_string(), "sensor reported lost");
    }

    #[test]
    fn test_reason_for_status() {
        assert_eq!(DenyReason::for_status(SensorStatus::Active), None);
        assert_eq!(
            DenyReason::for_status(SensorStatus::Inactive),
            Some(DenyReason::Inactive)
        );
    }

    #[test]
    fn test_unregistered_maps_to_not_found() {
        let outcome = AccessOutcome::Denied {
            reason: DenyReason::Unregistered {
                presented_uid: "AA:BB".into(),
            },
        };
        let decision = Decision {
            outcome,
            sensor: None,
            barrier: None,
            event_id: EventId::new(),
            timestamp: Utc::now(),
        };
        assert!(!decision.granted());
        assert_eq!(decision.status_hint(), StatusHint::NotFound);
    }

    #[test]
    fn test_status_denial_maps_to_forbidden() {
        let decision = Decision {
            outcome: AccessOutcome::Denied {
                reason: DenyReason::Inactive,
            },
            sensor: None,
            barrier: None,
            event_id: EventId::new(),
            timestamp: Utc::now(),
        };
        assert_eq!(decision.status_hint(), StatusHint::Forbidden);
    }
}
