//! The per-application scaling state machine.
//!
//! [`ScalingEngine`] exposes three entry points — [`scale`], driven by a
//! dynamic trigger, and [`set_active_schedule`] / [`remove_active_schedule`],
//! driven by the schedule actuator. Each acquires the app's stripe,
//! gathers current state from the collaborators, runs the decision rules,
//! conditionally applies the new instance count, and leaves exactly one
//! history entry on every path that reaches history initialization.
//!
//! [`scale`]: ScalingEngine::scale
//! [`set_active_schedule`]: ScalingEngine::set_active_schedule
//! [`remove_active_schedule`]: ScalingEngine::remove_active_schedule

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adjustment;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::lock::StripedLock;
use crate::platform::PlatformClient;
use crate::reason::{SCHEDULE_END_REASON, dynamic_scaling_reason, schedule_start_reason};
use crate::recorder::HistoryRecorder;
use crate::store::{HistoryStore, PolicyStore};

use gantry_models::{
    ActiveSchedule, AppId, AppScalingHistory, ScalingStatus, ScalingType, Trigger,
};

/// Configuration for the decision engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Width of the striped lock table.
    #[serde(default = "default_lock_stripes")]
    pub lock_stripes: usize,
}

const fn default_lock_stripes() -> usize {
    32
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_stripes: default_lock_stripes(),
        }
    }
}

/// The decision-and-enactment engine.
///
/// Owns the striped lock table; collaborators are injected and shared.
/// Any number of decisions may run concurrently — decisions for the same
/// application serialize on their stripe, and the collaborators must be
/// safe under parallel access for different applications.
pub struct ScalingEngine {
    platform: Arc<dyn PlatformClient>,
    policies: Arc<dyn PolicyStore>,
    history: Arc<dyn HistoryStore>,
    clock: Arc<dyn Clock>,
    app_locks: StripedLock,
}

impl ScalingEngine {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(
        platform: Arc<dyn PlatformClient>,
        policies: Arc<dyn PolicyStore>,
        history: Arc<dyn HistoryStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::with_config(platform, policies, history, clock, EngineConfig::default())
    }

    /// Creates an engine with custom configuration.
    #[must_use]
    pub fn with_config(
        platform: Arc<dyn PlatformClient>,
        policies: Arc<dyn PolicyStore>,
        history: Arc<dyn HistoryStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            platform,
            policies,
            history,
            clock,
            app_locks: StripedLock::new(config.lock_stripes),
        }
    }

    /// Applies a dynamic trigger to an app, returning the resulting
    /// instance count.
    ///
    /// The proposed count is the trigger's adjustment applied to the
    /// current count, clamped to the active schedule's bounds if one
    /// exists, else to the policy bounds. Cooldown suppresses the
    /// decision entirely; a successful apply pushes the cooldown expiry
    /// forward by the trigger's cooldown window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BadAdjustment`] for an unparseable adjustment,
    /// or the collaborator error when gathering state or applying the
    /// change fails. A cooldown-expiry write failure after a successful
    /// apply is logged, not returned.
    pub fn scale(&self, app_id: &AppId, trigger: &Trigger) -> Result<i32> {
        let _guard = self.app_locks.lock(app_id.as_str());

        let now = self.clock.now();
        let mut history = HistoryRecorder::new(
            self.history.as_ref(),
            AppScalingHistory {
                app_id: app_id.clone(),
                timestamp: now.timestamp_nanos_opt().unwrap_or_default(),
                scaling_type: ScalingType::Dynamic,
                status: ScalingStatus::Failed,
                old_instances: -1,
                new_instances: -1,
                reason: dynamic_scaling_reason(trigger),
                message: None,
                error: None,
            },
        );

        let instances = match self.platform.get_app_instances(app_id) {
            Ok(instances) => instances,
            Err(e) => {
                warn!(app_id = %app_id, error = %e, "failed to get app instances");
                history.error = Some("failed to get app instances".into());
                return Err(e);
            }
        };
        history.old_instances = instances;

        match self.history.can_scale_app(app_id) {
            Ok(true) => {}
            Ok(false) => {
                history.status = ScalingStatus::Ignored;
                history.new_instances = instances;
                history.message = Some("app in cooldown period".into());
                return Ok(instances);
            }
            Err(e) => {
                warn!(app_id = %app_id, error = %e, "failed to check app cooldown setting");
                history.error = Some("failed to check app cooldown setting".into());
                return Err(e);
            }
        }

        let proposed = match adjustment::compute_new_instances(instances, &trigger.adjustment) {
            Ok(proposed) => proposed,
            Err(e) => {
                warn!(
                    app_id = %app_id,
                    instances,
                    adjustment = %trigger.adjustment,
                    error = %e,
                    "failed to compute new app instances"
                );
                history.error = Some("failed to compute new app instances".into());
                return Err(e);
            }
        };

        let schedule = match self.history.get_active_schedule(app_id) {
            Ok(schedule) => schedule,
            Err(e) => {
                warn!(app_id = %app_id, error = %e, "failed to get active schedule");
                history.error = Some("failed to get active schedule".into());
                return Err(e);
            }
        };

        let (instance_min, instance_max) = match schedule {
            Some(schedule) => (schedule.instance_min, schedule.instance_max),
            None => match self.policies.get_app_policy(app_id) {
                Ok(Some(policy)) => (policy.instance_min, policy.instance_max),
                Ok(None) => {
                    let e = Error::Store {
                        message: format!("no scaling policy for app {app_id}"),
                    };
                    warn!(app_id = %app_id, error = %e, "failed to get scaling policy");
                    history.error = Some("failed to get scaling policy".into());
                    return Err(e);
                }
                Err(e) => {
                    warn!(app_id = %app_id, error = %e, "failed to get scaling policy");
                    history.error = Some("failed to get scaling policy".into());
                    return Err(e);
                }
            },
        };

        let mut new_instances = proposed;
        if new_instances < instance_min {
            new_instances = instance_min;
            history.message = Some(format!("limited by min instances {instance_min}"));
        } else if new_instances > instance_max {
            new_instances = instance_max;
            history.message = Some(format!("limited by max instances {instance_max}"));
        }
        history.new_instances = new_instances;

        if new_instances == instances {
            history.status = ScalingStatus::Ignored;
            return Ok(new_instances);
        }

        if let Err(e) = self.platform.set_app_instances(app_id, new_instances) {
            warn!(app_id = %app_id, new_instances, error = %e, "failed to set app instances");
            history.error = Some("failed to set app instances".into());
            return Err(e);
        }

        history.status = ScalingStatus::Succeeded;
        info!(app_id = %app_id, old = instances, new = new_instances, "scaled app");

        let expires_at = (now + trigger.cool_down())
            .timestamp_nanos_opt()
            .unwrap_or_default();
        if let Err(e) = self
            .history
            .update_scaling_cooldown_expire_time(app_id, expires_at)
        {
            // The scale already happened; the cooldown write is best-effort.
            warn!(app_id = %app_id, error = %e, "failed to update scaling cooldown expire time");
        }

        Ok(new_instances)
    }

    /// Starts a schedule for an app, raising the current instance count
    /// to the schedule's initial floor if needed.
    ///
    /// Setting the schedule that is already active is an idempotent
    /// no-op: no history, no action. A schedule with a different id
    /// replaces the stored one. The initial floor is
    /// `max(instance_min_initial, instance_min)`; cooldown is neither
    /// consulted nor updated.
    ///
    /// # Errors
    ///
    /// Returns the collaborator error if reading or persisting the
    /// schedule fails (before any history is written), or if gathering
    /// instances / applying the change fails (recorded as a failed
    /// decision).
    pub fn set_active_schedule(&self, app_id: &AppId, schedule: &ActiveSchedule) -> Result<()> {
        let _guard = self.app_locks.lock(app_id.as_str());

        let current = match self.history.get_active_schedule(app_id) {
            Ok(current) => current,
            Err(e) => {
                warn!(app_id = %app_id, error = %e, "failed to get existing active schedule");
                return Err(e);
            }
        };

        if let Some(current) = current {
            if current.schedule_id == schedule.schedule_id {
                info!(
                    app_id = %app_id,
                    schedule_id = %schedule.schedule_id,
                    "duplicate request to set active schedule"
                );
                return Ok(());
            }
            info!(
                app_id = %app_id,
                current_schedule_id = %current.schedule_id,
                schedule_id = %schedule.schedule_id,
                "an active schedule exists, replacing it"
            );
        }

        if let Err(e) = self.history.set_active_schedule(app_id, schedule) {
            warn!(app_id = %app_id, error = %e, "failed to set active schedule");
            return Err(e);
        }

        let now = self.clock.now();
        let mut history = HistoryRecorder::new(
            self.history.as_ref(),
            AppScalingHistory {
                app_id: app_id.clone(),
                timestamp: now.timestamp_nanos_opt().unwrap_or_default(),
                scaling_type: ScalingType::Schedule,
                status: ScalingStatus::Failed,
                old_instances: -1,
                new_instances: -1,
                reason: schedule_start_reason(schedule),
                message: None,
                error: None,
            },
        );

        let instances = match self.platform.get_app_instances(app_id) {
            Ok(instances) => instances,
            Err(e) => {
                warn!(app_id = %app_id, error = %e, "failed to get app instances");
                history.error = Some("failed to get app instances".into());
                return Err(e);
            }
        };
        history.old_instances = instances;

        // The initial floor may exceed the steady-state floor.
        let instance_min = schedule.instance_min_initial.max(schedule.instance_min);

        let mut new_instances = instances;
        if new_instances < instance_min {
            new_instances = instance_min;
            history.message = Some(format!("limited by min instances {instance_min}"));
        } else if new_instances > schedule.instance_max {
            new_instances = schedule.instance_max;
            // The max-clamp message carries the effective minimum; history
            // readers grep this exact wording.
            history.message = Some(format!("limited by max instances {instance_min}"));
        }
        history.new_instances = new_instances;

        if new_instances == instances {
            history.status = ScalingStatus::Ignored;
            return Ok(());
        }

        if let Err(e) = self.platform.set_app_instances(app_id, new_instances) {
            warn!(app_id = %app_id, new_instances, error = %e, "failed to set app instances");
            history.error = Some("failed to set app instances".into());
            return Err(e);
        }

        history.status = ScalingStatus::Succeeded;
        info!(app_id = %app_id, old = instances, new = new_instances, "schedule started");
        Ok(())
    }

    /// Ends a schedule for an app, bringing the instance count back
    /// inside the policy bounds.
    ///
    /// The stored schedule must match `schedule_id`; otherwise nothing
    /// is removed and no history is written. With no policy configured
    /// the removal is recorded as ignored and the count is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActiveScheduleNotFound`] if no schedule with
    /// that id is active, or the collaborator error when store,
    /// instance, or policy access fails.
    pub fn remove_active_schedule(&self, app_id: &AppId, schedule_id: &str) -> Result<()> {
        let _guard = self.app_locks.lock(app_id.as_str());

        let current = match self.history.get_active_schedule(app_id) {
            Ok(current) => current,
            Err(e) => {
                warn!(app_id = %app_id, error = %e, "failed to get existing active schedule");
                return Err(e);
            }
        };

        match current {
            Some(current) if current.schedule_id == schedule_id => {}
            _ => {
                let e = Error::ActiveScheduleNotFound;
                warn!(app_id = %app_id, schedule_id, error = %e, "failed to remove active schedule");
                return Err(e);
            }
        }

        if let Err(e) = self.history.remove_active_schedule(app_id) {
            warn!(app_id = %app_id, error = %e, "failed to remove active schedule");
            return Err(e);
        }

        let now = self.clock.now();
        let mut history = HistoryRecorder::new(
            self.history.as_ref(),
            AppScalingHistory {
                app_id: app_id.clone(),
                timestamp: now.timestamp_nanos_opt().unwrap_or_default(),
                scaling_type: ScalingType::Schedule,
                status: ScalingStatus::Failed,
                old_instances: -1,
                new_instances: -1,
                reason: SCHEDULE_END_REASON.into(),
                message: None,
                error: None,
            },
        );

        let instances = match self.platform.get_app_instances(app_id) {
            Ok(instances) => instances,
            Err(e) => {
                warn!(app_id = %app_id, error = %e, "failed to get app instances");
                history.error = Some("failed to get app instances".into());
                return Err(e);
            }
        };
        history.old_instances = instances;

        let policy = match self.policies.get_app_policy(app_id) {
            Ok(policy) => policy,
            Err(e) => {
                warn!(app_id = %app_id, error = %e, "failed to get app policy");
                history.error = Some("failed to get app policy".into());
                return Err(e);
            }
        };

        let Some(policy) = policy else {
            history.status = ScalingStatus::Ignored;
            return Ok(());
        };

        let mut new_instances = instances;
        if new_instances < policy.instance_min {
            new_instances = policy.instance_min;
            history.message = Some(format!("limited by min instances {}", policy.instance_min));
        } else if new_instances > policy.instance_max {
            new_instances = policy.instance_max;
            history.message = Some(format!("limited by max instances {}", policy.instance_max));
        }
        history.new_instances = new_instances;

        if new_instances == instances {
            history.status = ScalingStatus::Ignored;
            return Ok(());
        }

        if let Err(e) = self.platform.set_app_instances(app_id, new_instances) {
            warn!(app_id = %app_id, new_instances, error = %e, "failed to set app instances");
            history.error = Some("failed to set app instances".into());
            return Err(e);
        }

        history.status = ScalingStatus::Succeeded;
        info!(app_id = %app_id, old = instances, new = new_instances, "schedule ended");
        Ok(())
    }

    /// Number of stripes in the engine's lock table.
    #[must_use]
    pub fn lock_stripes(&self) -> usize {
        self.app_locks.len()
    }
}
