//! Strongly-typed identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Declares a prefixed UUID newtype for one entity kind.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[doc = concat!("A unique identifier with prefix '", $prefix, "_'.")]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse from string (with or without prefix).
            pub fn parse(s: &str) -> Result<Self, IdParseError> {
                let s = s.strip_prefix(concat!($prefix, "_")).unwrap_or(s);
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| IdParseError::InvalidFormat)
            }

            /// Create from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}_{}", $prefix, self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

/// Error parsing an ID.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdParseError {
    /// The ID format is invalid.
    #[error("invalid ID format")]
    InvalidFormat,
}

// Define all ID types
define_id!(SensorId, "sns");
define_id!(BarrierId, "bar");
define_id!(EventId, "evt");
define_id!(UserId, "usr");
define_id!(ZoneId, "zon");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_each_entity_gets_its_own_prefix() {
        assert!(SensorId::new().to_string().starts_with("sns_"));
        assert!(BarrierId::new().to_string().starts_with("bar_"));
        assert!(EventId::new().to_string().starts_with("evt_"));
        assert!(UserId::new().to_string().starts_with("usr_"));
        assert!(ZoneId::new().to_string().starts_with("zon_"));
    }

    #[test]
    fn test_parse_accepts_prefixed_and_bare_forms() {
        let id = SensorId::new();
        assert_eq!(SensorId::parse(&id.to_string()).unwrap(), id);
        assert_eq!(SensorId::parse(&id.as_uuid().to_string()).unwrap(), id);
    }

    #[test]
    fn test_foreign_prefix_does_not_parse() {
        // A barrier id handed to a sensor lookup must not slip through.
        let barrier = BarrierId::new();
        assert!(matches!(
            SensorId::parse(&barrier.to_string()),
            Err(IdParseError::InvalidFormat)
        ));
    }

    #[test]
    fn test_garbage_does_not_parse() {
        assert!(EventId::from_str("evt_not-a-uuid").is_err());
        assert!(EventId::from_str("").is_err());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let id = EventId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let back: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        assert_eq!(SensorId::from_uuid(uuid).as_uuid(), uuid);
    }
}
