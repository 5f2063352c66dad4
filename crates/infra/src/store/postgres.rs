//! Postgres-backed [`SqlPool`].
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | `Database` | `Query` (message includes the SQLSTATE code when present) |
//! | `Io`, `Tls`, `PoolTimedOut` | `Connection` |
//! | `PoolClosed` | `PoolClosed` |
//! | `ColumnNotFound`, `ColumnDecode`, `Decode` | `Decode` |
//! | Other | `Query` |
//!
//! ## Thread Safety
//!
//! `PostgresPool` is `Send + Sync`; the SQLx pool hands out one connection per
//! statement and returns it when the statement completes or fails.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row};
use tracing::instrument;

use joyas_core::ItemId;
use joyas_inventory::InventoryItem;

use super::{SqlPool, StoreError};
use crate::sql::{SqlValue, Statement};

/// SQLx connection pool wrapped as a [`SqlPool`].
#[derive(Debug, Clone)]
pub struct PostgresPool {
    pool: Arc<PgPool>,
}

impl PostgresPool {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool against `database_url`.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl SqlPool for PostgresPool {
    #[instrument(skip(self, stmt), fields(sql = %stmt.text, params = stmt.params.len()), err)]
    async fn fetch_items(&self, stmt: &Statement) -> Result<Vec<InventoryItem>, StoreError> {
        let rows = bind_all(stmt)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch_items", e))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(item_from_row(row).map_err(|e| map_sqlx_error("fetch_items", e))?);
        }
        Ok(items)
    }

    #[instrument(skip(self, stmt), fields(sql = %stmt.text, params = stmt.params.len()), err)]
    async fn fetch_scalar(&self, stmt: &Statement) -> Result<i64, StoreError> {
        let row = bind_all(stmt)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("fetch_scalar", e))?;

        row.try_get::<i64, _>(0)
            .map_err(|e| map_sqlx_error("fetch_scalar", e))
    }
}

/// Attach every statement parameter, in placeholder order.
fn bind_all(stmt: &Statement) -> sqlx::query::Query<'_, Postgres, PgArguments> {
    let mut query = sqlx::query(&stmt.text);
    for param in &stmt.params {
        query = match param {
            SqlValue::Int(v) => query.bind(*v),
            SqlValue::Float(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

fn item_from_row(row: &PgRow) -> Result<InventoryItem, sqlx::Error> {
    Ok(InventoryItem {
        id: ItemId::new(row.try_get("id")?),
        nombre: row.try_get("nombre")?,
        categoria: row.try_get("categoria")?,
        metal: row.try_get("metal")?,
        precio: row.try_get("precio")?,
        stock: row.try_get("stock")?,
    })
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.to_string()).unwrap_or_default();
            StoreError::Query(format!(
                "database error in {} [{}]: {}",
                operation,
                code,
                db_err.message()
            ))
        }
        sqlx::Error::Io(e) => StoreError::Connection(format!("io error in {}: {}", operation, e)),
        sqlx::Error::Tls(e) => StoreError::Connection(format!("tls error in {}: {}", operation, e)),
        sqlx::Error::PoolTimedOut => {
            StoreError::Connection(format!("timed out acquiring connection in {}", operation))
        }
        sqlx::Error::PoolClosed => StoreError::PoolClosed(operation.to_string()),
        err @ (sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)) => {
            StoreError::Decode(format!("{} in {}", err, operation))
        }
        _ => StoreError::Query(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_map_to_connection_variants() {
        assert_eq!(
            map_sqlx_error("fetch_items", sqlx::Error::PoolClosed),
            StoreError::PoolClosed("fetch_items".to_string())
        );
        assert!(matches!(
            map_sqlx_error("fetch_scalar", sqlx::Error::PoolTimedOut),
            StoreError::Connection(msg) if msg.contains("fetch_scalar")
        ));
    }

    #[test]
    fn missing_columns_map_to_decode() {
        let err = map_sqlx_error("fetch_items", sqlx::Error::ColumnNotFound("precio".into()));
        assert!(matches!(err, StoreError::Decode(msg) if msg.contains("precio")));
    }

    #[test]
    fn other_errors_map_to_query() {
        let err = map_sqlx_error("fetch_items", sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Query(msg) if msg.contains("fetch_items")));
    }
}
