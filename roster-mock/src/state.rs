use crate::config::Config;
use crate::store::EmployeeStore;
use shared::KeyScheme;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handler state
#[derive(Debug)]
pub struct AppState {
    pub store: RwLock<EmployeeStore>,
    /// Bearer token required on `/graphql`; `None` disables the check
    pub token: Option<String>,
}

impl AppState {
    pub fn new(store: EmployeeStore, token: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            store: RwLock::new(store),
            token,
        })
    }

    /// Seeded state for a configuration
    pub fn from_config(config: &Config) -> Arc<Self> {
        Self::new(EmployeeStore::seeded(config.key_scheme), config.token.clone())
    }

    pub async fn scheme(&self) -> KeyScheme {
        self.store.read().await.scheme()
    }
}
