//! RFID sensor identity records.

use crate::{SensorId, UserId, ZoneId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Minimum length for a sensor uid.
pub const MIN_UID_LEN: usize = 5;
/// Minimum length for a sensor display name.
pub const MIN_NAME_LEN: usize = 3;

/// Lifecycle status of a sensor credential.
///
/// There are no automatic transitions; every change is an explicit
/// administrative action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SensorStatus {
    /// Credential admits its carrier.
    Active,
    /// Credential is registered but disabled.
    Inactive,
    /// Credential was blocked by an administrator.
    Blocked,
    /// Credential was reported lost by its carrier.
    Lost,
}

impl SensorStatus {
    /// Whether a presentation with this status may be admitted.
    pub fn admits(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Default for SensorStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A registered sensor credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    /// Unique internal identifier.
    pub id: SensorId,
    /// External credential identifier (UID/MAC). Unique, case-sensitive.
    pub uid: String,
    /// Display name.
    pub name: String,
    /// Current lifecycle status.
    pub status: SensorStatus,
    /// Owning user, if assigned.
    pub user: Option<UserId>,
    /// Zone the sensor belongs to, if any.
    pub zone: Option<ZoneId>,
    /// When the sensor was registered.
    pub created_at: DateTime<Utc>,
    /// When the sensor was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Parameters for registering a new sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSensor {
    /// External credential identifier. Must be at least 5 characters.
    pub uid: String,
    /// Display name. Must be at least 3 characters.
    pub name: String,
    /// Zone assignment.
    pub zone: Option<ZoneId>,
    /// Owning user.
    pub user: Option<UserId>,
}

impl NewSensor {
    /// Create a minimal registration request.
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            zone: None,
            user: None,
        }
    }

    /// Assign a zone.
    pub fn with_zone(mut self, zone: ZoneId) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Assign an owning user.
    pub fn with_user(mut self, user: UserId) -> Self {
        self.user = Some(user);
        self
    }
}
