//! Store boundary.
//!
//! The query executor talks to the relational store only through [`SqlPool`]:
//! it hands over a fully built [`Statement`] and gets rows or a scalar back.
//! Connection lifecycle (acquire per call, release on completion or error) is
//! the pool's concern.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use joyas_inventory::InventoryItem;

use crate::sql::Statement;

pub mod postgres;
pub mod stub;

pub use postgres::PostgresPool;
pub use stub::StubPool;

/// Failure reported by the store.
///
/// Messages may contain driver detail; they are meant for server-side logs,
/// never for HTTP clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached (I/O, TLS, acquire timeout).
    #[error("connection error: {0}")]
    Connection(String),

    /// The pool was shut down.
    #[error("connection pool closed in {0}")]
    PoolClosed(String),

    /// The database rejected or failed the statement.
    #[error("query failed: {0}")]
    Query(String),

    /// A returned row did not have the expected shape.
    #[error("failed to decode row: {0}")]
    Decode(String),
}

/// Connection pool abstraction consumed by the executor.
#[async_trait]
pub trait SqlPool: Send + Sync {
    /// Run a statement returning inventory rows.
    async fn fetch_items(&self, stmt: &Statement) -> Result<Vec<InventoryItem>, StoreError>;

    /// Run a statement returning a single integer in its first column.
    async fn fetch_scalar(&self, stmt: &Statement) -> Result<i64, StoreError>;
}

#[async_trait]
impl<T> SqlPool for Arc<T>
where
    T: SqlPool + ?Sized,
{
    async fn fetch_items(&self, stmt: &Statement) -> Result<Vec<InventoryItem>, StoreError> {
        (**self).fetch_items(stmt).await
    }

    async fn fetch_scalar(&self, stmt: &Statement) -> Result<i64, StoreError> {
        (**self).fetch_scalar(stmt).await
    }
}
