//! Barrier controller: the leaf owner of barrier position state.

mod controller;
mod store;

pub use controller::BarrierController;
pub use store::{BarrierStore, MemoryBarrierStore};
