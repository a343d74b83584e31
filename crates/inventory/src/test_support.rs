//! In-memory repositories for service and handler tests. Transactions work on
//! a private copy of the table and publish it on commit.

use crate::{
    abstract_trait::inventory::repository::{
        DynInventoryCommandRepository, DynInventoryQueryRepository,
        InventoryCommandRepositoryTrait, InventoryQueryRepositoryTrait, InventoryTransaction,
        InventoryWriter,
    },
    config::myconfig::InventorySettings,
    domain::requests::inventory::{
        ColumnValue, CreateInventoryRequest, FieldChange, FindAllInventory, InventoryColumn,
        NewInventoryItem,
    },
    model::{InventoryItem as InventoryModel, InventoryStats as InventoryStatsModel},
    repository::statements::{self, DUPLICATE_PRODUCT_ID},
    service::{InventoryCommandService, InventoryQueryService},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use prometheus_client::registry::Registry;
use shared::{config::ConnectionPool, errors::RepositoryError};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct Table {
    rows: BTreeMap<i32, InventoryModel>,
    next_id: i32,
    clock: DateTime<Utc>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
            clock: Utc::now(),
        }
    }
}

impl Table {
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += Duration::milliseconds(1);
        self.clock
    }

    fn product_id_taken(&self, product_id: &str, except_id: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|row| row.product_id == product_id && Some(row.id) != except_id)
    }

    fn insert(&mut self, item: &NewInventoryItem) -> Result<InventoryModel, RepositoryError> {
        if self.product_id_taken(&item.product_id, None) {
            return Err(RepositoryError::AlreadyExists(DUPLICATE_PRODUCT_ID.into()));
        }

        let now = self.tick();
        let row = InventoryModel {
            id: self.next_id,
            product_name: item.product_name.clone(),
            product_id: item.product_id.clone(),
            category: item.category.clone(),
            location: item.location.clone(),
            available_quantity: item.available_quantity,
            reserved_quantity: item.reserved_quantity,
            on_hand_quantity: item.on_hand_quantity,
            created_at: now,
            updated_at: now,
        };

        self.next_id += 1;
        self.rows.insert(row.id, row.clone());
        Ok(row)
    }

    fn update(&mut self, id: i32, changes: &[FieldChange]) -> Result<u64, RepositoryError> {
        let Some(current) = self.rows.get(&id) else {
            return Ok(0);
        };

        let mut row = current.clone();
        for change in changes {
            match (change.column, &change.value) {
                (InventoryColumn::ProductName, ColumnValue::Text(v)) => row.product_name = v.clone(),
                (InventoryColumn::ProductId, ColumnValue::Text(v)) => row.product_id = v.clone(),
                (InventoryColumn::Category, ColumnValue::Text(v)) => row.category = v.clone(),
                (InventoryColumn::Location, ColumnValue::Text(v)) => row.location = v.clone(),
                (InventoryColumn::AvailableQuantity, ColumnValue::Quantity(v)) => {
                    row.available_quantity = *v
                }
                (InventoryColumn::ReservedQuantity, ColumnValue::Quantity(v)) => {
                    row.reserved_quantity = *v
                }
                (InventoryColumn::OnHandQuantity, ColumnValue::Quantity(v)) => {
                    row.on_hand_quantity = *v
                }
                (column, value) => {
                    return Err(RepositoryError::Custom(format!(
                        "type mismatch for {}: {value:?}",
                        column.as_str()
                    )));
                }
            }
        }

        if [row.available_quantity, row.reserved_quantity, row.on_hand_quantity]
            .iter()
            .any(|q| *q < 0)
        {
            return Err(RepositoryError::Custom("check constraint violated".into()));
        }

        if self
            .rows
            .values()
            .any(|other| other.id != id && other.product_id == row.product_id)
        {
            return Err(RepositoryError::AlreadyExists(DUPLICATE_PRODUCT_ID.into()));
        }

        let now = self.tick();
        row.updated_at = now.max(row.updated_at + Duration::microseconds(1));
        self.rows.insert(id, row);
        Ok(1)
    }
}

#[derive(Default)]
struct Hooks {
    skip_next_uniqueness_check: AtomicBool,
    lose_next_delete: AtomicBool,
    fail_reads: AtomicBool,
}

fn unavailable() -> RepositoryError {
    RepositoryError::Sqlx(sqlx::Error::PoolTimedOut)
}

/// Shared handle to one in-memory table and its fault hooks.
#[derive(Clone, Default)]
pub struct MemoryInventory {
    table: Arc<Mutex<Table>>,
    hooks: Arc<Hooks>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query_repo(&self) -> DynInventoryQueryRepository {
        Arc::new(self.clone())
    }

    pub fn command_repo(&self) -> DynInventoryCommandRepository {
        Arc::new(self.clone())
    }

    /// The next uniqueness pre-check reports the product ID as free, as if a
    /// concurrent creator committed right after the check.
    pub fn race_next_insert(&self) {
        self.hooks
            .skip_next_uniqueness_check
            .store(true, Ordering::SeqCst);
    }

    /// The next delete finds its row already removed by someone else.
    pub fn lose_next_delete(&self) {
        self.hooks.lose_next_delete.store(true, Ordering::SeqCst);
    }

    /// Every pooled read fails as if the store were unreachable.
    pub fn fail_reads(&self) {
        self.hooks.fail_reads.store(true, Ordering::SeqCst);
    }

    pub async fn row(&self, id: i32) -> Option<InventoryModel> {
        self.table.lock().await.rows.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    /// Inserts directly, bypassing the service.
    pub async fn seed(&self, item: NewInventoryItem) -> InventoryModel {
        self.table
            .lock()
            .await
            .insert(&item)
            .expect("seed rows must have unique product IDs")
    }

    fn check_reads(&self) -> Result<(), RepositoryError> {
        if self.hooks.fail_reads.load(Ordering::SeqCst) {
            Err(unavailable())
        } else {
            Ok(())
        }
    }

    fn take_uniqueness_skip(&self) -> bool {
        self.hooks
            .skip_next_uniqueness_check
            .swap(false, Ordering::SeqCst)
    }
}

pub fn new_item(product_id: &str, category: &str, location: &str, available: i32) -> NewInventoryItem {
    NewInventoryItem {
        product_name: format!("Item {product_id}"),
        product_id: product_id.to_string(),
        category: category.to_string(),
        location: location.to_string(),
        available_quantity: available,
        reserved_quantity: 0,
        on_hand_quantity: available,
    }
}

/// Inserts a row straight through the SQL layer for `#[sqlx::test]` cases.
pub async fn pg_seed(pool: &ConnectionPool, item: NewInventoryItem) -> InventoryModel {
    let mut conn = pool.acquire().await.expect("pooled connection");
    statements::insert(&mut conn, &item)
        .await
        .expect("seed rows must have unique product IDs")
}

pub fn create_request(product_id: &str, quantities: (i32, i32, i32)) -> CreateInventoryRequest {
    CreateInventoryRequest {
        product_name: Some(format!("Item {product_id}")),
        product_id: Some(product_id.to_string()),
        category: Some("Tools".into()),
        location: Some("Warehouse A".into()),
        available_quantity: Some(quantities.0),
        reserved_quantity: Some(quantities.1),
        on_hand_quantity: Some(quantities.2),
    }
}

pub fn services(
    store: &MemoryInventory,
    settings: InventorySettings,
) -> (InventoryQueryService, InventoryCommandService) {
    let mut registry = Registry::default();

    let query = InventoryQueryService::new(store.query_repo(), settings, &mut registry)
        .expect("query service");
    let command = InventoryCommandService::new(store.command_repo(), settings, &mut registry)
        .expect("command service");

    (query, command)
}

fn matches(row: &InventoryModel, req: &FindAllInventory) -> bool {
    let search_ok = req.search_term().is_none_or(|term| {
        let term = term.to_lowercase();
        [&row.product_name, &row.product_id, &row.category]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    });

    search_ok
        && req.category_filter().is_none_or(|c| row.category == c)
        && req.location_filter().is_none_or(|l| row.location == l)
}

#[async_trait]
impl InventoryQueryRepositoryTrait for MemoryInventory {
    async fn find_all(
        &self,
        req: &FindAllInventory,
    ) -> Result<Vec<InventoryModel>, RepositoryError> {
        self.check_reads()?;

        let table = self.table.lock().await;
        let mut rows: Vec<_> = table
            .rows
            .values()
            .filter(|row| matches(row, req))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        if let Some((limit, offset)) = req.window() {
            let offset = offset.unwrap_or(0) as usize;
            rows = rows.into_iter().skip(offset).take(limit as usize).collect();
        }

        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<InventoryModel>, RepositoryError> {
        self.check_reads()?;
        Ok(self.row(id).await)
    }

    async fn find_by_product_id(
        &self,
        product_id: &str,
    ) -> Result<Option<InventoryModel>, RepositoryError> {
        self.check_reads()?;

        let table = self.table.lock().await;
        Ok(table
            .rows
            .values()
            .find(|row| row.product_id == product_id)
            .cloned())
    }

    async fn find_low_stock(&self, threshold: i32) -> Result<Vec<InventoryModel>, RepositoryError> {
        self.check_reads()?;

        let table = self.table.lock().await;
        let mut rows: Vec<_> = table
            .rows
            .values()
            .filter(|row| row.available_quantity < threshold)
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.available_quantity, row.id));
        Ok(rows)
    }

    async fn find_categories(&self) -> Result<Vec<String>, RepositoryError> {
        self.check_reads()?;

        let table = self.table.lock().await;
        let distinct: BTreeSet<_> = table.rows.values().map(|r| r.category.clone()).collect();
        Ok(distinct.into_iter().collect())
    }

    async fn find_locations(&self) -> Result<Vec<String>, RepositoryError> {
        self.check_reads()?;

        let table = self.table.lock().await;
        let distinct: BTreeSet<_> = table.rows.values().map(|r| r.location.clone()).collect();
        Ok(distinct.into_iter().collect())
    }

    async fn stats(&self, low_stock_threshold: i32) -> Result<InventoryStatsModel, RepositoryError> {
        self.check_reads()?;

        let table = self.table.lock().await;
        let rows = table.rows.values();

        let mut stats = InventoryStatsModel::default();
        let mut categories = BTreeSet::new();
        let mut locations = BTreeSet::new();

        for row in rows {
            stats.total_items += 1;
            stats.total_available_quantity += i64::from(row.available_quantity);
            stats.total_reserved_quantity += i64::from(row.reserved_quantity);
            stats.total_on_hand_quantity += i64::from(row.on_hand_quantity);
            if row.available_quantity < low_stock_threshold {
                stats.low_stock_items += 1;
            }
            categories.insert(row.category.as_str());
            locations.insert(row.location.as_str());
        }

        stats.categories_count = categories.len() as i64;
        stats.locations_count = locations.len() as i64;
        Ok(stats)
    }
}

/// Autocommit writer: every statement hits the shared table directly.
pub struct MemoryConnection {
    store: MemoryInventory,
}

#[async_trait]
impl InventoryWriter for MemoryConnection {
    async fn find_by_id(&mut self, id: i32) -> Result<Option<InventoryModel>, RepositoryError> {
        Ok(self.store.row(id).await)
    }

    async fn product_id_taken(
        &mut self,
        product_id: &str,
        except_id: Option<i32>,
    ) -> Result<bool, RepositoryError> {
        if self.store.take_uniqueness_skip() {
            return Ok(false);
        }
        Ok(self
            .store
            .table
            .lock()
            .await
            .product_id_taken(product_id, except_id))
    }

    async fn insert(&mut self, item: &NewInventoryItem) -> Result<InventoryModel, RepositoryError> {
        self.store.table.lock().await.insert(item)
    }

    async fn update(&mut self, id: i32, changes: &[FieldChange]) -> Result<u64, RepositoryError> {
        self.store.table.lock().await.update(id, changes)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, RepositoryError> {
        let mut table = self.store.table.lock().await;

        if self.store.hooks.lose_next_delete.swap(false, Ordering::SeqCst) {
            table.rows.remove(&id);
            return Ok(0);
        }

        Ok(u64::from(table.rows.remove(&id).is_some()))
    }
}

/// Works on a private copy of the table until commit.
pub struct MemoryTransaction {
    store: MemoryInventory,
    working: Option<Table>,
}

impl MemoryTransaction {
    fn working(&mut self) -> Result<&mut Table, RepositoryError> {
        self.working
            .as_mut()
            .ok_or_else(|| RepositoryError::Custom("Transaction already finished".into()))
    }
}

#[async_trait]
impl InventoryWriter for MemoryTransaction {
    async fn find_by_id(&mut self, id: i32) -> Result<Option<InventoryModel>, RepositoryError> {
        Ok(self.working()?.rows.get(&id).cloned())
    }

    async fn product_id_taken(
        &mut self,
        product_id: &str,
        except_id: Option<i32>,
    ) -> Result<bool, RepositoryError> {
        Ok(self.working()?.product_id_taken(product_id, except_id))
    }

    async fn insert(&mut self, item: &NewInventoryItem) -> Result<InventoryModel, RepositoryError> {
        self.working()?.insert(item)
    }

    async fn update(&mut self, id: i32, changes: &[FieldChange]) -> Result<u64, RepositoryError> {
        self.working()?.update(id, changes)
    }

    async fn delete(&mut self, id: i32) -> Result<u64, RepositoryError> {
        Ok(u64::from(self.working()?.rows.remove(&id).is_some()))
    }
}

#[async_trait]
impl InventoryTransaction for MemoryTransaction {
    async fn commit(&mut self) -> Result<(), RepositoryError> {
        let working = self
            .working
            .take()
            .ok_or_else(|| RepositoryError::Custom("Transaction already finished".into()))?;

        *self.store.table.lock().await = working;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), RepositoryError> {
        self.working = None;
        Ok(())
    }
}

#[async_trait]
impl InventoryCommandRepositoryTrait for MemoryInventory {
    async fn acquire(&self) -> Result<Box<dyn InventoryWriter>, RepositoryError> {
        Ok(Box::new(MemoryConnection {
            store: self.clone(),
        }))
    }

    async fn begin(&self) -> Result<Box<dyn InventoryTransaction>, RepositoryError> {
        let snapshot = self.table.lock().await.clone();

        Ok(Box::new(MemoryTransaction {
            store: self.clone(),
            working: Some(snapshot),
        }))
    }
}
