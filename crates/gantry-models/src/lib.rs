//! Shared data model for the Gantry application autoscaler.
//!
//! This crate provides the types exchanged between the decision engine,
//! its collaborators, and the audit trail:
//! - [`Trigger`]: a dynamic scaling request from the threshold evaluator
//! - [`ActiveSchedule`]: a time-windowed override of policy bounds
//! - [`ScalingPolicy`]: the steady-state instance bounds for an app
//! - [`AppScalingHistory`]: the audit record produced by every decision

#![forbid(unsafe_code)]

pub mod error;
pub mod types;

pub use error::{ModelError, Result};
pub use types::{
    ActiveSchedule, AppId, AppScalingHistory, ScalingPolicy, ScalingStatus, ScalingType, Trigger,
};
