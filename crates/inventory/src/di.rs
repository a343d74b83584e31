use crate::{
    abstract_trait::inventory::{
        repository::{DynInventoryCommandRepository, DynInventoryQueryRepository},
        service::{DynInventoryCommandService, DynInventoryQueryService},
    },
    config::myconfig::InventorySettings,
    repository::{InventoryCommandRepository, InventoryQueryRepository},
    service::{InventoryCommandService, InventoryQueryService},
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::config::ConnectionPool;
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub inventory_query: DynInventoryQueryService,
    pub inventory_command: DynInventoryCommandService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("inventory_query", &"InventoryQueryService")
            .field("inventory_command", &"InventoryCommandService")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub query_repo: DynInventoryQueryRepository,
    pub command_repo: DynInventoryCommandRepository,
    pub settings: InventorySettings,
}

impl DependenciesInjectDeps {
    pub fn from_pool(pool: ConnectionPool, settings: InventorySettings) -> Self {
        Self {
            query_repo: Arc::new(InventoryQueryRepository::new(pool.clone())),
            command_repo: Arc::new(InventoryCommandRepository::new(pool)),
            settings,
        }
    }
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Result<Self> {
        let DependenciesInjectDeps {
            query_repo,
            command_repo,
            settings,
        } = deps;

        let inventory_query = InventoryQueryService::new(query_repo, settings, registry)
            .context("failed initialize inventory query")?;

        let inventory_command = InventoryCommandService::new(command_repo, settings, registry)
            .context("failed initialize inventory command")?;

        Ok(Self {
            inventory_query: Arc::new(inventory_query),
            inventory_command: Arc::new(inventory_command),
        })
    }
}
