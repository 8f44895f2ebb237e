//! Per-application scaling decision-and-enactment engine.
//!
//! [`ScalingEngine`] reconciles a proposed adjustment — a dynamic trigger
//! from the threshold evaluator, or an active-schedule start/stop — against
//! current state, policy bounds, active schedules, and cooldown, then
//! enacts the resulting instance count through a [`PlatformClient`].
//! Decisions for the same application serialize on a striped lock table;
//! every decision leaves exactly one audit entry in the history store.
//!
//! Collaborators ([`PlatformClient`], [`PolicyStore`], [`HistoryStore`],
//! [`Clock`]) are injected as trait objects; tests substitute fakes.

#![forbid(unsafe_code)]

pub mod adjustment;
pub mod clock;
pub mod engine;
pub mod error;
pub mod lock;
pub mod platform;
pub mod reason;
pub mod recorder;
pub mod store;

pub use adjustment::compute_new_instances;
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineConfig, ScalingEngine};
pub use error::{Error, Result};
pub use lock::StripedLock;
pub use platform::{InMemoryPlatform, PlatformClient};
pub use recorder::HistoryRecorder;
pub use store::{HistoryStore, PolicyStore};
