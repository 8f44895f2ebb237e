//! Core types shared across the autoscaler.
//!
//! Instance counts are `i32` throughout: `-1` marks a quantity that was
//! never successfully determined during a decision, and step adjustments
//! are parsed in 32-bit range.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Unique identifier for a managed application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppId(String);

impl AppId {
    /// Creates a new application ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of decision produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingType {
    /// Scaling triggered by a metric threshold breach.
    Dynamic,
    /// Scaling triggered by a schedule start or end.
    Schedule,
}

impl ScalingType {
    /// Returns the string representation of this scaling type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dynamic => "dynamic",
            Self::Schedule => "schedule",
        }
    }
}

impl fmt::Display for ScalingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal status of a scaling decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingStatus {
    /// The instance count was changed on the platform.
    Succeeded,
    /// The decision failed; `error` on the history entry says where.
    Failed,
    /// The decision was a deliberate no-op; `message` says why.
    Ignored,
}

impl ScalingStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Ignored => "ignored",
        }
    }
}

impl fmt::Display for ScalingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dynamic scaling request emitted by the threshold evaluator.
///
/// Immutable within a decision; the engine reads the adjustment,
/// cooldown, and the fields rendered into the audit reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Application this trigger targets.
    pub app_id: AppId,
    /// Metric whose threshold was breached (e.g. `memorybytes`).
    pub metric_type: String,
    /// Comparison operator of the breached rule (e.g. `>=`).
    pub operator: String,
    /// Threshold value of the breached rule.
    pub threshold: i64,
    /// How long the metric stayed past the threshold, in seconds.
    pub breach_duration_seconds: i64,
    /// Cooldown after a successful scale, in seconds.
    pub cool_down_seconds: i64,
    /// Textual adjustment: signed step (`"+2"`, `"-1"`) or signed
    /// percentage of the current count (`"25%"`, `"-10%"`).
    pub adjustment: String,
}

impl Trigger {
    /// The cooldown window as a duration.
    #[must_use]
    pub fn cool_down(&self) -> Duration {
        Duration::seconds(self.cool_down_seconds)
    }
}

/// A time-windowed override of policy bounds for one application.
///
/// At most one active schedule exists per app; its bounds are
/// authoritative over the policy bounds while it is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSchedule {
    /// Identifier assigned by the schedule actuator.
    pub schedule_id: String,
    /// Steady-state floor while the schedule is active.
    pub instance_min: i32,
    /// Ceiling while the schedule is active.
    pub instance_max: i32,
    /// One-shot floor applied when the schedule starts; may exceed
    /// `instance_min`.
    pub instance_min_initial: i32,
}

impl ActiveSchedule {
    /// Validates this schedule's bounds.
    ///
    /// # Errors
    ///
    /// Returns error if the bounds are inconsistent.
    pub fn validate(&self) -> Result<()> {
        if self.instance_min < 1 {
            return Err(ModelError::InvalidSchedule {
                reason: "instance_min must be at least 1".into(),
            });
        }
        if self.instance_max < self.instance_min {
            return Err(ModelError::InvalidSchedule {
                reason: format!(
                    "instance_min ({}) cannot exceed instance_max ({})",
                    self.instance_min, self.instance_max
                ),
            });
        }
        if self.instance_min_initial < 0 {
            return Err(ModelError::InvalidSchedule {
                reason: "instance_min_initial cannot be negative".into(),
            });
        }
        Ok(())
    }
}

/// Steady-state instance bounds for an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingPolicy {
    /// Never scale below this count.
    pub instance_min: i32,
    /// Never scale above this count.
    pub instance_max: i32,
}

impl ScalingPolicy {
    /// Validates this policy's bounds.
    ///
    /// # Errors
    ///
    /// Returns error if the bounds are inconsistent.
    pub fn validate(&self) -> Result<()> {
        if self.instance_min < 1 {
            return Err(ModelError::InvalidPolicy {
                reason: "instance_min must be at least 1".into(),
            });
        }
        if self.instance_max < self.instance_min {
            return Err(ModelError::InvalidPolicy {
                reason: format!(
                    "instance_min ({}) cannot exceed instance_max ({})",
                    self.instance_min, self.instance_max
                ),
            });
        }
        Ok(())
    }
}

/// Audit record of one scaling decision, append-only.
///
/// Every decision that reaches its history-initialization step produces
/// exactly one entry, whatever the outcome. `reason`, `message`, and
/// `error` are contractually stable strings; history readers grep them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppScalingHistory {
    /// Application the decision was for.
    pub app_id: AppId,
    /// Decision time in Unix nanoseconds.
    pub timestamp: i64,
    /// Dynamic trigger or schedule transition.
    pub scaling_type: ScalingType,
    /// Terminal status of the decision.
    pub status: ScalingStatus,
    /// Instance count before the decision; `-1` if never determined.
    pub old_instances: i32,
    /// Instance count after the decision; `-1` if never determined.
    pub new_instances: i32,
    /// Human-readable cause of the decision.
    pub reason: String,
    /// Why a decision was ignored or clamped, when it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Where a failed decision failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
