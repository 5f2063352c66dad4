//! In-process [`SqlPool`] for tests and local wiring.
//!
//! Returns canned rows and totals, and records every statement it receives so
//! callers can assert on the exact SQL text and bound parameters.

use std::sync::Mutex;

use async_trait::async_trait;

use joyas_inventory::InventoryItem;

use super::{SqlPool, StoreError};
use crate::sql::Statement;

#[derive(Debug, Default)]
pub struct StubPool {
    rows: Vec<InventoryItem>,
    total_count: i64,
    stock_total: i64,
    failure: Option<StoreError>,
    statements: Mutex<Vec<Statement>>,
}

impl StubPool {
    /// Stub answering every row query with `rows`; totals are derived from them.
    pub fn new(rows: Vec<InventoryItem>) -> Self {
        let total_count = rows.len() as i64;
        let stock_total = rows.iter().map(|r| i64::from(r.stock)).sum();
        Self {
            rows,
            total_count,
            stock_total,
            ..Self::default()
        }
    }

    /// Override the totals reported by scalar queries.
    pub fn with_totals(mut self, total_count: i64, stock_total: i64) -> Self {
        self.total_count = total_count;
        self.stock_total = stock_total;
        self
    }

    /// Stub failing every statement with `err`.
    pub fn failing(err: StoreError) -> Self {
        Self {
            failure: Some(err),
            ..Self::default()
        }
    }

    /// Statements received so far, in order.
    pub fn statements(&self) -> Vec<Statement> {
        self.statements
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn record(&self, stmt: &Statement) -> Result<(), StoreError> {
        if let Ok(mut statements) = self.statements.lock() {
            statements.push(stmt.clone());
        }
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SqlPool for StubPool {
    async fn fetch_items(&self, stmt: &Statement) -> Result<Vec<InventoryItem>, StoreError> {
        self.record(stmt)?;
        Ok(self.rows.clone())
    }

    async fn fetch_scalar(&self, stmt: &Statement) -> Result<i64, StoreError> {
        self.record(stmt)?;
        if stmt.text.starts_with("SELECT COUNT(") {
            Ok(self.total_count)
        } else {
            Ok(self.stock_total)
        }
    }
}
