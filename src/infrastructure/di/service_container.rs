//! Service container for dependency injection
//!
//! Wires settings, transport and the tree store together.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::{StoreOptions, TreeStore};
use crate::config::Settings;
use crate::infrastructure::traits::{HttpTransport, Transport};
use crate::infrastructure::InfraResult;

/// Container holding the application's shared dependencies.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// API transport
    pub transport: Arc<dyn Transport>,
}

impl ServiceContainer {
    /// Create a new service container talking HTTP to the configured API.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let transport = HttpTransport::new(&settings.api)?;
        debug!(base_url = %transport.base_url(), "http transport ready");
        Ok(Self::with_deps(settings, Arc::new(transport)))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, transport: Arc<dyn Transport>) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            transport,
        }
    }

    /// A fresh store configured from the settings.
    pub fn tree_store(&self) -> TreeStore {
        TreeStore::with_options(
            Arc::clone(&self.transport),
            StoreOptions::from(self.settings.as_ref()),
        )
    }
}
