//! SQL shared by the pooled and transactional repositories. Every function
//! takes a bare `PgConnection` so it runs the same way on a pooled
//! connection and inside a transaction.

use crate::{
    domain::requests::inventory::{ColumnValue, FieldChange, FindAllInventory, NewInventoryItem},
    model::InventoryItem as InventoryModel,
};
use shared::errors::RepositoryError;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::error;

pub const SELECT_COLUMNS: &str = "id, product_name, product_id, category, location, \
     available_quantity, reserved_quantity, on_hand_quantity, created_at, updated_at";

pub const DUPLICATE_PRODUCT_ID: &str = "Product ID already exists. Please use a unique Product ID.";

/// Escapes `LIKE` metacharacters so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

pub fn find_all_query(req: &FindAllInventory) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {SELECT_COLUMNS} FROM inventory WHERE 1=1"));

    if let Some(term) = req.search_term() {
        let pattern = format!("%{}%", escape_like(term));
        qb.push(" AND (product_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR product_id ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR category ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(category) = req.category_filter() {
        qb.push(" AND category = ").push_bind(category.to_string());
    }

    if let Some(location) = req.location_filter() {
        qb.push(" AND location = ").push_bind(location.to_string());
    }

    qb.push(" ORDER BY created_at DESC, id DESC");

    if let Some((limit, offset)) = req.window() {
        qb.push(" LIMIT ").push_bind(limit);
        if let Some(offset) = offset {
            qb.push(" OFFSET ").push_bind(offset);
        }
    }

    qb
}

/// Column names come from `InventoryColumn` only; values are always bound.
pub fn update_query(id: i32, changes: &[FieldChange]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE inventory SET ");

    for change in changes {
        qb.push(change.column.as_str()).push(" = ");
        match &change.value {
            ColumnValue::Text(value) => qb.push_bind(value.clone()),
            ColumnValue::Quantity(value) => qb.push_bind(*value),
        };
        qb.push(", ");
    }

    // strictly increasing, even for repeated updates inside one transaction
    qb.push("updated_at = GREATEST(clock_timestamp(), updated_at + INTERVAL '1 microsecond')");
    qb.push(" WHERE id = ").push_bind(id);
    qb
}

pub async fn find_by_id(
    conn: &mut PgConnection,
    id: i32,
) -> Result<Option<InventoryModel>, RepositoryError> {
    sqlx::query_as::<_, InventoryModel>(&format!(
        "SELECT {SELECT_COLUMNS} FROM inventory WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
    .map_err(|e| {
        error!("❌ Failed to fetch inventory item {id}: {e:?}");
        RepositoryError::from(e)
    })
}

pub async fn find_by_product_id(
    conn: &mut PgConnection,
    product_id: &str,
) -> Result<Option<InventoryModel>, RepositoryError> {
    sqlx::query_as::<_, InventoryModel>(&format!(
        "SELECT {SELECT_COLUMNS} FROM inventory WHERE product_id = $1"
    ))
    .bind(product_id)
    .fetch_optional(conn)
    .await
    .map_err(|e| {
        error!("❌ Failed to fetch inventory item by product ID {product_id}: {e:?}");
        RepositoryError::from(e)
    })
}

pub async fn product_id_taken(
    conn: &mut PgConnection,
    product_id: &str,
    except_id: Option<i32>,
) -> Result<bool, RepositoryError> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM inventory
            WHERE product_id = $1
              AND ($2::INTEGER IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(product_id)
    .bind(except_id)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        error!("❌ Failed to check product ID {product_id}: {e:?}");
        RepositoryError::from(e)
    })
}

pub async fn insert(
    conn: &mut PgConnection,
    item: &NewInventoryItem,
) -> Result<InventoryModel, RepositoryError> {
    sqlx::query_as::<_, InventoryModel>(&format!(
        r#"
        INSERT INTO inventory (
            product_name, product_id, category, location,
            available_quantity, reserved_quantity, on_hand_quantity
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {SELECT_COLUMNS}
        "#
    ))
    .bind(&item.product_name)
    .bind(&item.product_id)
    .bind(&item.category)
    .bind(&item.location)
    .bind(item.available_quantity)
    .bind(item.reserved_quantity)
    .bind(item.on_hand_quantity)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        error!("❌ Failed to insert inventory item {}: {e:?}", item.product_id);
        RepositoryError::from_unique_violation(e, DUPLICATE_PRODUCT_ID)
    })
}

pub async fn update(
    conn: &mut PgConnection,
    id: i32,
    changes: &[FieldChange],
) -> Result<u64, RepositoryError> {
    let result = update_query(id, changes)
        .build()
        .execute(conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to update inventory item {id}: {e:?}");
            RepositoryError::from_unique_violation(e, DUPLICATE_PRODUCT_ID)
        })?;

    Ok(result.rows_affected())
}

pub async fn delete(conn: &mut PgConnection, id: i32) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM inventory WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to delete inventory item {id}: {e:?}");
            RepositoryError::from(e)
        })?;

    Ok(result.rows_affected())
}
