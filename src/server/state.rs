use axum::extract::FromRef;

use crate::catalog::Catalog;
use crate::counter_store::CounterStore;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCounterStore = Arc<dyn CounterStore>;
pub type GuardedCatalog = Arc<Catalog>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub counter_store: GuardedCounterStore,
    pub catalog: GuardedCatalog,
}

impl FromRef<ServerState> for GuardedCounterStore {
    fn from_ref(input: &ServerState) -> Self {
        input.counter_store.clone()
    }
}

impl FromRef<ServerState> for GuardedCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
