use crate::{
    config::myconfig::InventorySettings,
    di::{DependenciesInject, DependenciesInjectDeps},
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub registry: Arc<Mutex<Registry>>,
    pub settings: InventorySettings,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("settings", &self.settings)
            .finish()
    }
}

impl AppState {
    pub fn new(pool: ConnectionPool, settings: InventorySettings) -> Result<Self> {
        Self::from_deps(DependenciesInjectDeps::from_pool(pool, settings))
    }

    pub fn from_deps(deps: DependenciesInjectDeps) -> Result<Self> {
        let mut registry = Registry::default();
        let settings = deps.settings;

        let di_container = DependenciesInject::new(deps, &mut registry)
            .context("Failed to initialize dependency injection container")?;

        Ok(Self {
            di_container,
            registry: Arc::new(Mutex::new(registry)),
            settings,
        })
    }
}
