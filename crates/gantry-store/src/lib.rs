//! Reference policy and history stores for the Gantry autoscaler.
//!
//! The decision engine consumes the [`PolicyStore`] and [`HistoryStore`]
//! traits; production deployments put a database behind them. This crate
//! provides the reference implementations: in-memory stores for tests
//! and local wiring, and JSON-snapshot-backed variants that survive
//! restarts.
//!
//! [`PolicyStore`]: gantry_engine::PolicyStore
//! [`HistoryStore`]: gantry_engine::HistoryStore

#![forbid(unsafe_code)]

pub mod history;
pub mod persist;
pub mod policy;

pub use history::{InMemoryHistoryStore, JsonHistoryStore};
pub use persist::SnapshotFile;
pub use policy::{InMemoryPolicyStore, JsonPolicyStore};
