//! Domain types for the gatewarden access-control core.

mod actor;
mod barrier;
mod decision;
mod error;
mod event;
mod ids;
mod sensor;

pub use actor::{ActingUser, Capability, Role};
pub use barrier::{Barrier, BarrierPosition};
pub use decision::{AccessOutcome, Decision, DenyReason, StatusHint};
pub use error::{CoreError, CoreResult, StoreError};
pub use event::{Event, EventDraft, EventKind, EventSource};
pub use ids::{BarrierId, EventId, IdParseError, SensorId, UserId, ZoneId};
pub use sensor::{NewSensor, Sensor, SensorStatus, MIN_NAME_LEN, MIN_UID_LEN};
