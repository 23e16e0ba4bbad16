//! Event ledger: the append-only audit trail.
//!
//! Every decision and barrier action in the system lands here as an
//! immutable record. No update or delete path exists; the store trait
//! itself has no mutating methods beyond append. A SHA-256 hash chain over
//! the append stream lets integrity be verified after the fact.

mod chain;
mod ledger;
mod store;

pub use chain::{ChainError, ChainLink, HashChain};
pub use ledger::{EventFilter, EventLedger, LedgerConfig};
pub use store::{EventStore, MemoryEventStore};
