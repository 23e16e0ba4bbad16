//! Access decision engine and system status rollups.
//!
//! The engine coordinates the three leaf stores — sensor registry, barrier
//! controller, event ledger — within one logical operation per
//! presentation. It holds no persistent state of its own.

mod engine;
mod status;

pub use engine::AccessEngine;
pub use status::{BarrierTally, EventTally, SensorTally, StatusAggregator, StatusReport};
