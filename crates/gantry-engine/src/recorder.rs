//! Deferred history recording.
//!
//! Each decision mutates one [`AppScalingHistory`] entry along its path
//! and must persist it exactly once on every exit, including early
//! returns and failures. [`HistoryRecorder`] is a drop guard that does
//! the write when it goes out of scope, observing the final mutated
//! state of the entry. Store failures are logged, not propagated: the
//! audit trail is best-effort once a decision has run.

use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::store::HistoryStore;
use gantry_models::AppScalingHistory;

/// Drop guard that records one scaling-history entry on scope exit.
pub struct HistoryRecorder<'a> {
    store: &'a dyn HistoryStore,
    entry: AppScalingHistory,
}

impl<'a> HistoryRecorder<'a> {
    /// Creates a recorder that will persist `entry` when dropped.
    #[must_use]
    pub fn new(store: &'a dyn HistoryStore, entry: AppScalingHistory) -> Self {
        Self { store, entry }
    }
}

impl Deref for HistoryRecorder<'_> {
    type Target = AppScalingHistory;

    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}

impl DerefMut for HistoryRecorder<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.entry
    }
}

impl Drop for HistoryRecorder<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.store.save_scaling_history(&self.entry) {
            warn!(app_id = %self.entry.app_id, error = %e, "failed to save scaling history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use gantry_models::{ActiveSchedule, AppId, ScalingStatus, ScalingType};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CapturingStore {
        saved: Mutex<Vec<AppScalingHistory>>,
        fail_saves: bool,
    }

    impl HistoryStore for CapturingStore {
        fn can_scale_app(&self, _app_id: &AppId) -> Result<bool> {
            Ok(true)
        }

        fn get_active_schedule(&self, _app_id: &AppId) -> Result<Option<ActiveSchedule>> {
            Ok(None)
        }

        fn set_active_schedule(
            &self,
            _app_id: &AppId,
            _schedule: &ActiveSchedule,
        ) -> Result<()> {
            Ok(())
        }

        fn remove_active_schedule(&self, _app_id: &AppId) -> Result<()> {
            Ok(())
        }

        fn save_scaling_history(&self, entry: &AppScalingHistory) -> Result<()> {
            if self.fail_saves {
                return Err(Error::Store {
                    message: "history unavailable".into(),
                });
            }
            self.saved.lock().push(entry.clone());
            Ok(())
        }

        fn update_scaling_cooldown_expire_time(
            &self,
            _app_id: &AppId,
            _expires_at: i64,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn entry() -> AppScalingHistory {
        AppScalingHistory {
            app_id: AppId::new("app"),
            timestamp: 42,
            scaling_type: ScalingType::Dynamic,
            status: ScalingStatus::Failed,
            old_instances: -1,
            new_instances: -1,
            reason: "+1 instance(s) because memorybytes > 300 for 120 seconds".into(),
            message: None,
            error: None,
        }
    }

    #[test]
    fn records_exactly_once_on_drop() {
        let store = CapturingStore::default();
        {
            let _recorder = HistoryRecorder::new(&store, entry());
        }
        assert_eq!(store.saved.lock().len(), 1);
    }

    #[test]
    fn observes_final_mutated_state() {
        let store = CapturingStore::default();
        {
            let mut recorder = HistoryRecorder::new(&store, entry());
            recorder.old_instances = 2;
            recorder.new_instances = 3;
            recorder.status = ScalingStatus::Succeeded;
        }

        let saved = store.saved.lock();
        assert_eq!(saved[0].old_instances, 2);
        assert_eq!(saved[0].new_instances, 3);
        assert_eq!(saved[0].status, ScalingStatus::Succeeded);
    }

    #[test]
    fn records_on_early_return_paths() {
        let store = CapturingStore::default();

        fn decide(store: &dyn HistoryStore, entry: AppScalingHistory) -> Result<()> {
            let mut recorder = HistoryRecorder::new(store, entry);
            recorder.error = Some("failed to get app instances".into());
            Err(Error::Platform {
                message: "unreachable".into(),
            })
        }

        let _ = decide(&store, entry());
        let saved = store.saved.lock();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].error.as_deref(), Some("failed to get app instances"));
    }

    #[test]
    fn save_failure_does_not_panic() {
        let store = CapturingStore {
            fail_saves: true,
            ..Default::default()
        };
        let _recorder = HistoryRecorder::new(&store, entry());
        // Drop logs the failure and returns normally.
    }
}
