//! History store implementations.
//!
//! The history store owns the engine's scaling state: cooldown
//! expiries, active schedules (at most one per app), and the
//! append-only audit trail.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use gantry_engine::{Clock, HistoryStore, Result};
use gantry_models::{ActiveSchedule, AppId, AppScalingHistory};

use crate::persist::SnapshotFile;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HistoryState {
    cooldown_expirations: HashMap<String, i64>,
    active_schedules: HashMap<String, ActiveSchedule>,
    histories: Vec<AppScalingHistory>,
}

impl HistoryState {
    fn can_scale(&self, app_id: &AppId, now_ns: i64) -> bool {
        match self.cooldown_expirations.get(app_id.as_str()) {
            Some(expires_at) => now_ns >= *expires_at,
            None => true,
        }
    }

    fn histories_in_window(
        &self,
        app_id: &AppId,
        start_ns: i64,
        end_ns: i64,
    ) -> Vec<AppScalingHistory> {
        self.histories
            .iter()
            .filter(|entry| {
                entry.app_id == *app_id
                    && entry.timestamp >= start_ns
                    && entry.timestamp <= end_ns
            })
            .cloned()
            .collect()
    }
}

/// In-memory history store for tests and local wiring.
pub struct InMemoryHistoryStore {
    clock: Arc<dyn Clock>,
    state: RwLock<HistoryState>,
}

impl InMemoryHistoryStore {
    /// Creates an empty history store reading time from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: RwLock::new(HistoryState::default()),
        }
    }

    /// Audit entries for an app within `[start_ns, end_ns]`, in the
    /// order they were recorded.
    #[must_use]
    pub fn scaling_histories(
        &self,
        app_id: &AppId,
        start_ns: i64,
        end_ns: i64,
    ) -> Vec<AppScalingHistory> {
        self.state.read().histories_in_window(app_id, start_ns, end_ns)
    }

    fn now_ns(&self) -> i64 {
        self.clock.now().timestamp_nanos_opt().unwrap_or_default()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn can_scale_app(&self, app_id: &AppId) -> Result<bool> {
        Ok(self.state.read().can_scale(app_id, self.now_ns()))
    }

    fn get_active_schedule(&self, app_id: &AppId) -> Result<Option<ActiveSchedule>> {
        Ok(self.state.read().active_schedules.get(app_id.as_str()).cloned())
    }

    fn set_active_schedule(&self, app_id: &AppId, schedule: &ActiveSchedule) -> Result<()> {
        self.state
            .write()
            .active_schedules
            .insert(app_id.as_str().to_string(), schedule.clone());
        Ok(())
    }

    fn remove_active_schedule(&self, app_id: &AppId) -> Result<()> {
        self.state.write().active_schedules.remove(app_id.as_str());
        Ok(())
    }

    fn save_scaling_history(&self, entry: &AppScalingHistory) -> Result<()> {
        self.state.write().histories.push(entry.clone());
        Ok(())
    }

    fn update_scaling_cooldown_expire_time(&self, app_id: &AppId, expires_at: i64) -> Result<()> {
        self.state
            .write()
            .cooldown_expirations
            .insert(app_id.as_str().to_string(), expires_at);
        Ok(())
    }
}

/// History store backed by a JSON snapshot.
pub struct JsonHistoryStore {
    clock: Arc<dyn Clock>,
    state: RwLock<HistoryState>,
    store: SnapshotFile,
}

impl JsonHistoryStore {
    /// Creates a history store, loading any existing state from disk.
    #[must_use]
    pub fn new(state_dir: &Path, clock: Arc<dyn Clock>) -> Self {
        let store = SnapshotFile::new(state_dir, "scaling-state");
        let state: HistoryState = store.load();
        debug!(
            schedules = state.active_schedules.len(),
            histories = state.histories.len(),
            "loaded scaling state from disk"
        );
        Self {
            clock,
            state: RwLock::new(state),
            store,
        }
    }

    /// Audit entries for an app within `[start_ns, end_ns]`, in the
    /// order they were recorded.
    #[must_use]
    pub fn scaling_histories(
        &self,
        app_id: &AppId,
        start_ns: i64,
        end_ns: i64,
    ) -> Vec<AppScalingHistory> {
        self.state.read().histories_in_window(app_id, start_ns, end_ns)
    }

    fn now_ns(&self) -> i64 {
        self.clock.now().timestamp_nanos_opt().unwrap_or_default()
    }

    fn snapshot(&self, state: &HistoryState) {
        if let Err(e) = self.store.save(state) {
            warn!(error = %e, "failed to snapshot scaling state");
        }
    }
}

impl HistoryStore for JsonHistoryStore {
    fn can_scale_app(&self, app_id: &AppId) -> Result<bool> {
        Ok(self.state.read().can_scale(app_id, self.now_ns()))
    }

    fn get_active_schedule(&self, app_id: &AppId) -> Result<Option<ActiveSchedule>> {
        Ok(self.state.read().active_schedules.get(app_id.as_str()).cloned())
    }

    fn set_active_schedule(&self, app_id: &AppId, schedule: &ActiveSchedule) -> Result<()> {
        let mut state = self.state.write();
        state
            .active_schedules
            .insert(app_id.as_str().to_string(), schedule.clone());
        self.snapshot(&state);
        Ok(())
    }

    fn remove_active_schedule(&self, app_id: &AppId) -> Result<()> {
        let mut state = self.state.write();
        state.active_schedules.remove(app_id.as_str());
        self.snapshot(&state);
        Ok(())
    }

    fn save_scaling_history(&self, entry: &AppScalingHistory) -> Result<()> {
        let mut state = self.state.write();
        state.histories.push(entry.clone());
        self.snapshot(&state);
        Ok(())
    }

    fn update_scaling_cooldown_expire_time(&self, app_id: &AppId, expires_at: i64) -> Result<()> {
        let mut state = self.state.write();
        state
            .cooldown_expirations
            .insert(app_id.as_str().to_string(), expires_at);
        self.snapshot(&state);
        Ok(())
    }
}
