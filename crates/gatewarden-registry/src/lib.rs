//! Sensor registry: the leaf owner of sensor identity records.

mod registry;
mod store;

pub use registry::SensorRegistry;
pub use store::{MemorySensorStore, SensorStore};
