//! Resolved caller identity and capabilities.
//!
//! The identity collaborator authenticates callers and hands the engine a
//! resolved [`ActingUser`]; the engine only performs explicit capability
//! checks against it.

use crate::UserId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role assigned to a user by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Day-to-day operation; no administrative overrides.
    Operator,
}

/// An action a role may or may not perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Open or close a barrier by manual command.
    OperateBarrier,
    /// Change a sensor's lifecycle status.
    ManageSensors,
}

impl Role {
    /// Explicit capability check. Returns a plain boolean; absence of a
    /// capability is never inferred from a missing attribute.
    pub fn can(&self, capability: Capability) -> bool {
        match (self, capability) {
            (Self::Admin, _) => true,
            (Self::Operator, Capability::OperateBarrier) => false,
            (Self::Operator, Capability::ManageSensors) => false,
        }
    }
}

/// A caller identity resolved by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActingUser {
    /// The user's identifier.
    pub user_id: UserId,
    /// The user's resolved role.
    pub role: Role,
}

impl ActingUser {
    /// Create an acting user.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Shorthand capability check.
    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }
}
