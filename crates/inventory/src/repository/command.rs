use crate::{
    abstract_trait::inventory::repository::{
        InventoryCommandRepositoryTrait, InventoryTransaction, InventoryWriter,
    },
    domain::requests::inventory::{FieldChange, NewInventoryItem},
    model::InventoryItem as InventoryModel,
    repository::statements,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{PgConnection, Postgres, Transaction, pool::PoolConnection};
use tracing::{error, info, warn};

/// Autocommit writer over a single pooled connection.
pub struct PgInventoryConnection {
    conn: PoolConnection<Postgres>,
}

/// Writer inside an open transaction. Dropping it without `commit` rolls back.
pub struct PgInventoryTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgInventoryTransaction {
    fn conn(&mut self) -> Result<&mut PgConnection, RepositoryError> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| RepositoryError::Custom("Transaction already finished".into()))
    }
}

#[async_trait]
impl InventoryWriter for PgInventoryConnection {
    async fn find_by_id(&mut self, id: i32) -> Result<Option<InventoryModel>, RepositoryError> {
        statements::find_by_id(&mut self.conn, id).await
    }

    async fn product_id_taken(
        &mut self,
        product_id: &str,
        except_id: Option<i32>,
    ) -> Result<bool, RepositoryError> {
        statements::product_id_taken(&mut self.conn, product_id, except_id).await
    }

    async fn insert(&mut self, item: &NewInventoryItem) -> Result<InventoryModel, RepositoryError> {
        statements::insert(&mut self.conn, item).await
    }

    async fn update(&mut self, id: i32, changes: &[FieldChange]) -> Result<u64, RepositoryError> {
        statements::update(&mut self.conn, id, changes).await
    }

    async fn delete(&mut self, id: i32) -> Result<u64, RepositoryError> {
        statements::delete(&mut self.conn, id).await
    }
}

#[async_trait]
impl InventoryWriter for PgInventoryTransaction {
    async fn find_by_id(&mut self, id: i32) -> Result<Option<InventoryModel>, RepositoryError> {
        statements::find_by_id(self.conn()?, id).await
    }

    async fn product_id_taken(
        &mut self,
        product_id: &str,
        except_id: Option<i32>,
    ) -> Result<bool, RepositoryError> {
        statements::product_id_taken(self.conn()?, product_id, except_id).await
    }

    async fn insert(&mut self, item: &NewInventoryItem) -> Result<InventoryModel, RepositoryError> {
        statements::insert(self.conn()?, item).await
    }

    async fn update(&mut self, id: i32, changes: &[FieldChange]) -> Result<u64, RepositoryError> {
        statements::update(self.conn()?, id, changes).await
    }

    async fn delete(&mut self, id: i32) -> Result<u64, RepositoryError> {
        statements::delete(self.conn()?, id).await
    }
}

#[async_trait]
impl InventoryTransaction for PgInventoryTransaction {
    async fn commit(&mut self) -> Result<(), RepositoryError> {
        let Some(tx) = self.tx.take() else {
            return Err(RepositoryError::Custom("Transaction already finished".into()));
        };

        tx.commit().await.map_err(|e| {
            error!("❌ Failed to commit transaction: {e:?}");
            RepositoryError::from(e)
        })
    }

    async fn rollback(&mut self) -> Result<(), RepositoryError> {
        match self.tx.take() {
            Some(tx) => tx.rollback().await.map_err(|e| {
                warn!("⚠️ Failed to roll back transaction: {e:?}");
                RepositoryError::from(e)
            }),
            None => Ok(()),
        }
    }
}

#[derive(Clone)]
pub struct InventoryCommandRepository {
    db: ConnectionPool,
}

impl InventoryCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InventoryCommandRepositoryTrait for InventoryCommandRepository {
    async fn acquire(&self) -> Result<Box<dyn InventoryWriter>, RepositoryError> {
        let conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {e:?}");
            RepositoryError::from(e)
        })?;

        Ok(Box::new(PgInventoryConnection { conn }))
    }

    async fn begin(&self) -> Result<Box<dyn InventoryTransaction>, RepositoryError> {
        let tx = self.db.begin().await.map_err(|e| {
            error!("❌ Failed to begin transaction: {e:?}");
            RepositoryError::from(e)
        })?;

        info!("🔒 Transaction started");

        Ok(Box::new(PgInventoryTransaction { tx: Some(tx) }))
    }
}
