//! Collaborator store contracts.
//!
//! The engine consumes these traits; the persistence behind them is
//! external. Implementations must be safe under parallel access from
//! decisions for different applications.

use crate::error::Result;
use gantry_models::{ActiveSchedule, AppId, AppScalingHistory, ScalingPolicy};

/// Read access to steady-state scaling policies.
pub trait PolicyStore: Send + Sync {
    /// Fetches the scaling policy for an app.
    ///
    /// `None` means no policy is configured for the app.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn get_app_policy(&self, app_id: &AppId) -> Result<Option<ScalingPolicy>>;
}

/// Scaling state owned by the engine's history store: cooldown expiries,
/// active schedules, and the append-only audit trail.
pub trait HistoryStore: Send + Sync {
    /// Whether the app is outside its cooldown window.
    ///
    /// `false` means a recent successful scale is still cooling down.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn can_scale_app(&self, app_id: &AppId) -> Result<bool>;

    /// Fetches the app's active schedule, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn get_active_schedule(&self, app_id: &AppId) -> Result<Option<ActiveSchedule>>;

    /// Stores the app's active schedule, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written.
    fn set_active_schedule(&self, app_id: &AppId, schedule: &ActiveSchedule) -> Result<()>;

    /// Removes the app's active schedule.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written.
    fn remove_active_schedule(&self, app_id: &AppId) -> Result<()>;

    /// Appends one audit entry. Best-effort from the engine's point of
    /// view: the engine logs failures and keeps going.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written.
    fn save_scaling_history(&self, entry: &AppScalingHistory) -> Result<()>;

    /// Sets when the app's cooldown window ends, in Unix nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be written.
    fn update_scaling_cooldown_expire_time(&self, app_id: &AppId, expires_at: i64) -> Result<()>;
}
