use std::sync::Arc;

use chrono::Duration;

use crate::{
    clock::{Clock, SystemClock},
    config::AppConfig,
    seed,
    session::SessionStore,
    storage::MemStorage,
};

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<MemStorage>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage: Arc::new(MemStorage::new(clock.clone())),
            sessions: Arc::new(SessionStore::new(
                Duration::hours(config.session_ttl_hours),
                clock,
            )),
        }
    }

    /// Fresh state with the demo catalog and the admin account loaded.
    pub async fn seeded(config: &AppConfig) -> anyhow::Result<Self> {
        Self::seeded_with_clock(config, Arc::new(SystemClock)).await
    }

    pub async fn seeded_with_clock(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let state = Self::new(config, clock);
        seed::seed_catalog(&state.storage).await?;
        seed::ensure_admin(&state.storage, config).await?;
        Ok(state)
    }
}
