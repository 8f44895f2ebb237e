//! Platform instance-control client.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{Error, Result};
use gantry_models::AppId;

/// Control surface for reading and setting an application's instance
/// count on the platform.
///
/// Timeouts, retries, and cancellation are the client's responsibility;
/// the engine treats any failure the same way.
pub trait PlatformClient: Send + Sync {
    /// Fetches the current instance count for an app.
    ///
    /// # Errors
    ///
    /// Returns error if the platform cannot report the count.
    fn get_app_instances(&self, app_id: &AppId) -> Result<i32>;

    /// Sets the instance count for an app.
    ///
    /// # Errors
    ///
    /// Returns error if the platform rejects the change.
    fn set_app_instances(&self, app_id: &AppId, instances: i32) -> Result<()>;
}

/// Simple in-memory platform for tests and local wiring.
#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    instances: RwLock<HashMap<String, i32>>,
}

impl InMemoryPlatform {
    /// Creates a new in-memory platform with no apps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an app with an initial instance count.
    pub fn set_instances(&self, app_id: &AppId, instances: i32) {
        self.instances
            .write()
            .insert(app_id.as_str().to_string(), instances);
    }
}

impl PlatformClient for InMemoryPlatform {
    fn get_app_instances(&self, app_id: &AppId) -> Result<i32> {
        self.instances
            .read()
            .get(app_id.as_str())
            .copied()
            .ok_or_else(|| Error::Platform {
                message: format!("no app {app_id}"),
            })
    }

    fn set_app_instances(&self, app_id: &AppId, instances: i32) -> Result<()> {
        let mut map = self.instances.write();
        if !map.contains_key(app_id.as_str()) {
            return Err(Error::Platform {
                message: format!("no app {app_id}"),
            });
        }
        map.insert(app_id.as_str().to_string(), instances);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get() {
        let platform = InMemoryPlatform::new();
        let app = AppId::new("app-1");

        platform.set_instances(&app, 4);
        assert_eq!(platform.get_app_instances(&app).unwrap(), 4);

        platform.set_app_instances(&app, 7).unwrap();
        assert_eq!(platform.get_app_instances(&app).unwrap(), 7);
    }

    #[test]
    fn unknown_app_get_fails() {
        let platform = InMemoryPlatform::new();
        let result = platform.get_app_instances(&AppId::new("missing"));
        assert!(matches!(result, Err(Error::Platform { .. })));
    }

    #[test]
    fn unknown_app_set_fails() {
        let platform = InMemoryPlatform::new();
        let result = platform.set_app_instances(&AppId::new("missing"), 3);
        assert!(matches!(result, Err(Error::Platform { .. })));
    }
}
