use axum::extract::FromRef;

use crate::catalog_store::CatalogStore;
use crate::profiles::ProfileStore;
use crate::radio::ManagerProfile;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogStore = Arc<dyn CatalogStore>;
pub type GuardedProfileStore = Arc<dyn ProfileStore>;
/// Read-only schedule shown to managers whose own schedule is empty.
pub type ManagerTemplate = Option<Arc<ManagerProfile>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_store: GuardedCatalogStore,
    pub profile_store: GuardedProfileStore,
    pub manager_template: ManagerTemplate,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        catalog_store: GuardedCatalogStore,
        profile_store: GuardedProfileStore,
        manager_template: ManagerTemplate,
    ) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog_store,
            profile_store,
            manager_template,
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogStore {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_store.clone()
    }
}

impl FromRef<ServerState> for GuardedProfileStore {
    fn from_ref(input: &ServerState) -> Self {
        input.profile_store.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
