//! Physical barrier abstraction.

use crate::{BarrierId, ZoneId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Position of a barrier. The state machine is binary; transitions happen
/// only through the controller's single transition operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BarrierPosition {
    /// Barrier is raised; carriers may pass.
    Open,
    /// Barrier is lowered.
    Closed,
}

impl Default for BarrierPosition {
    fn default() -> Self {
        Self::Closed
    }
}

/// A physical access barrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    /// Unique internal identifier.
    pub id: BarrierId,
    /// Unique display name.
    pub name: String,
    /// Current position.
    pub position: BarrierPosition,
    /// Zone this barrier guards. A zone has at most one barrier.
    pub zone: Option<ZoneId>,
    /// When the position last changed (or was last re-asserted).
    pub changed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_position_serialization() {
        let json = serde_json::to_string(&BarrierPosition::Open).unwrap();
        assert_eq!(json, "\"open\"");
    }

    #[test]
    fn test_position_from_str() {
        assert_eq!(
            BarrierPosition::from_str("closed").unwrap(),
            BarrierPosition::Closed
        );
        assert!(BarrierPosition::from_str("ajar").is_err());
    }

    #[test]
    fn test_default_position_is_closed() {
        assert_eq!(BarrierPosition::default(), BarrierPosition::Closed);
    }
}
