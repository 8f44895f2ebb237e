//! Policy store implementations.

use std::collections::HashMap;
use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, warn};

use gantry_engine::{PolicyStore, Result};
use gantry_models::{AppId, ScalingPolicy};

use crate::persist::SnapshotFile;

/// In-memory policy store for tests and local wiring.
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    policies: RwLock<HashMap<String, ScalingPolicy>>,
}

impl InMemoryPolicyStore {
    /// Creates an empty policy store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the policy for an app, replacing any existing one.
    pub fn set(&self, app_id: &AppId, policy: ScalingPolicy) {
        self.policies
            .write()
            .insert(app_id.as_str().to_string(), policy);
    }

    /// Removes the policy for an app.
    pub fn remove(&self, app_id: &AppId) -> Option<ScalingPolicy> {
        self.policies.write().remove(app_id.as_str())
    }
}

impl PolicyStore for InMemoryPolicyStore {
    fn get_app_policy(&self, app_id: &AppId) -> Result<Option<ScalingPolicy>> {
        Ok(self.policies.read().get(app_id.as_str()).cloned())
    }
}

/// Policy store backed by a JSON snapshot.
pub struct JsonPolicyStore {
    policies: RwLock<HashMap<String, ScalingPolicy>>,
    store: SnapshotFile,
}

impl JsonPolicyStore {
    /// Creates a policy store, loading any existing state from disk.
    #[must_use]
    pub fn new(state_dir: &Path) -> Self {
        let store = SnapshotFile::new(state_dir, "policies");
        let policies: HashMap<String, ScalingPolicy> = store.load();
        debug!(count = policies.len(), "loaded scaling policies from disk");
        Self {
            policies: RwLock::new(policies),
            store,
        }
    }

    /// Sets the policy for an app, replacing any existing one.
    pub fn set(&self, app_id: &AppId, policy: ScalingPolicy) {
        let mut policies = self.policies.write();
        policies.insert(app_id.as_str().to_string(), policy);
        self.snapshot(&policies);
    }

    /// Removes the policy for an app.
    pub fn remove(&self, app_id: &AppId) -> Option<ScalingPolicy> {
        let mut policies = self.policies.write();
        let removed = policies.remove(app_id.as_str());
        if removed.is_some() {
            self.snapshot(&policies);
        }
        removed
    }

    fn snapshot(&self, policies: &HashMap<String, ScalingPolicy>) {
        if let Err(e) = self.store.save(policies) {
            warn!(error = %e, "failed to snapshot policy store");
        }
    }
}

impl PolicyStore for JsonPolicyStore {
    fn get_app_policy(&self, app_id: &AppId) -> Result<Option<ScalingPolicy>> {
        Ok(self.policies.read().get(app_id.as_str()).cloned())
    }
}
