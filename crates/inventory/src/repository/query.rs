use crate::{
    abstract_trait::inventory::repository::InventoryQueryRepositoryTrait,
    domain::requests::inventory::FindAllInventory,
    model::{InventoryItem as InventoryModel, InventoryStats as InventoryStatsModel},
    repository::statements::{self, SELECT_COLUMNS},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::{Postgres, pool::PoolConnection};
use tracing::{error, info};

#[derive(Clone)]
pub struct InventoryQueryRepository {
    db: ConnectionPool,
}

impl InventoryQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn conn(&self) -> Result<PoolConnection<Postgres>, RepositoryError> {
        self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {e:?}");
            RepositoryError::from(e)
        })
    }
}

#[async_trait]
impl InventoryQueryRepositoryTrait for InventoryQueryRepository {
    async fn find_all(
        &self,
        req: &FindAllInventory,
    ) -> Result<Vec<InventoryModel>, RepositoryError> {
        info!("🔍 Fetching inventory with search: {:?}", req.search);

        let mut conn = self.conn().await?;

        let mut query = statements::find_all_query(req);

        query
            .build_query_as::<InventoryModel>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch inventory: {e:?}");
                RepositoryError::from(e)
            })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<InventoryModel>, RepositoryError> {
        let mut conn = self.conn().await?;

        statements::find_by_id(&mut conn, id).await
    }

    async fn find_by_product_id(
        &self,
        product_id: &str,
    ) -> Result<Option<InventoryModel>, RepositoryError> {
        let mut conn = self.conn().await?;

        statements::find_by_product_id(&mut conn, product_id).await
    }

    async fn find_low_stock(&self, threshold: i32) -> Result<Vec<InventoryModel>, RepositoryError> {
        info!("📉 Fetching items with available quantity below {threshold}");

        let mut conn = self.conn().await?;

        sqlx::query_as::<_, InventoryModel>(&format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM inventory
            WHERE available_quantity < $1
            ORDER BY available_quantity ASC, id ASC
            "#
        ))
        .bind(threshold)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch low stock items: {e:?}");
            RepositoryError::from(e)
        })
    }

    async fn find_categories(&self) -> Result<Vec<String>, RepositoryError> {
        let mut conn = self.conn().await?;

        sqlx::query_scalar::<_, String>(
            r#"SELECT DISTINCT category FROM inventory ORDER BY category COLLATE "C""#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch categories: {e:?}");
            RepositoryError::from(e)
        })
    }

    async fn find_locations(&self) -> Result<Vec<String>, RepositoryError> {
        let mut conn = self.conn().await?;

        sqlx::query_scalar::<_, String>(
            r#"SELECT DISTINCT location FROM inventory ORDER BY location COLLATE "C""#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch locations: {e:?}");
            RepositoryError::from(e)
        })
    }

    async fn stats(&self, low_stock_threshold: i32) -> Result<InventoryStatsModel, RepositoryError> {
        let mut conn = self.conn().await?;

        sqlx::query_as::<_, InventoryStatsModel>(
            r#"
            SELECT
                COUNT(*) AS total_items,
                COALESCE(SUM(available_quantity), 0)::BIGINT AS total_available_quantity,
                COALESCE(SUM(reserved_quantity), 0)::BIGINT AS total_reserved_quantity,
                COALESCE(SUM(on_hand_quantity), 0)::BIGINT AS total_on_hand_quantity,
                COUNT(DISTINCT category) AS categories_count,
                COUNT(DISTINCT location) AS locations_count,
                COUNT(*) FILTER (WHERE available_quantity < $1) AS low_stock_items
            FROM inventory
            "#,
        )
        .bind(low_stock_threshold)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to compute inventory statistics: {e:?}");
            RepositoryError::from(e)
        })
    }
}
