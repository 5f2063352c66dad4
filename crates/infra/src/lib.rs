//! Infrastructure layer: SQL construction, the store seam and its Postgres adapter.

pub mod executor;
pub mod sql;
pub mod store;

pub use executor::InventoryQueries;
pub use sql::{SqlValue, Statement};
pub use store::{PostgresPool, SqlPool, StoreError, StubPool};
