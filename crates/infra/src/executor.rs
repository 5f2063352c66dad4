//! Query executor: runs the listing, filter and lookup statements against a
//! [`SqlPool`].
//!
//! Listing is all-or-nothing: if the count, the stock aggregate or the page
//! query fails, the whole call fails and no partial totals are returned.

use tracing::instrument;

use joyas_core::ItemId;
use joyas_inventory::{InventoryItem, ItemFilter, ListQuery, Totals};

use crate::sql;
use crate::store::{SqlPool, StoreError};

/// Read-side queries over the inventory table.
#[derive(Debug, Clone)]
pub struct InventoryQueries<P> {
    pool: P,
}

impl<P: SqlPool> InventoryQueries<P> {
    pub fn new(pool: P) -> Self {
        Self { pool }
    }

    #[cfg(test)]
    fn pool(&self) -> &P {
        &self.pool
    }

    /// One page of items plus the filtered row count and summed stock.
    #[instrument(
        skip(self, query),
        fields(
            limit = query.limit(),
            page = query.page(),
            sort = query.sort_field().column(),
            direction = query.sort_direction().as_sql(),
            predicates = query.filter().len()
        ),
        err
    )]
    pub async fn list(
        &self,
        query: &ListQuery,
    ) -> Result<(Vec<InventoryItem>, Totals), StoreError> {
        let total_count = self.pool.fetch_scalar(&sql::count(query.filter())).await?;
        let stock_total = self
            .pool
            .fetch_scalar(&sql::stock_total(query.filter()))
            .await?;
        let rows = self.pool.fetch_items(&sql::page(query)).await?;

        tracing::debug!(rows = rows.len(), total_count, stock_total, "listing fetched");

        Ok((
            rows,
            Totals {
                total_count,
                stock_total: Some(stock_total),
            },
        ))
    }

    /// Every item matching `filter`, unprojected.
    #[instrument(skip(self, filter), fields(predicates = filter.len()), err)]
    pub async fn filter(&self, filter: &ItemFilter) -> Result<Vec<InventoryItem>, StoreError> {
        self.pool.fetch_items(&sql::filtered(filter)).await
    }

    /// A single item by id.
    #[instrument(skip(self), fields(item_id = %id), err)]
    pub async fn get(&self, id: ItemId) -> Result<Option<InventoryItem>, StoreError> {
        let rows = self.pool.fetch_items(&sql::by_id(id)).await?;
        Ok(rows.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use joyas_inventory::resolve;

    use crate::sql::SqlValue;
    use crate::store::StubPool;

    fn item(id: i32, stock: i32) -> InventoryItem {
        InventoryItem {
            id: ItemId::new(id),
            nombre: format!("Joya {id}"),
            categoria: "aros".to_string(),
            metal: "oro".to_string(),
            precio: 1000,
            stock,
        }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn list_issues_count_aggregate_and_page_in_order() {
        let pool = Arc::new(StubPool::new(vec![item(1, 4), item(2, 6)]).with_totals(12, 40));
        let queries = InventoryQueries::new(pool.clone());

        let query = resolve(&params(&[("limits", "2"), ("category", "aros")]));
        let (rows, totals) = queries.list(&query).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            totals,
            Totals {
                total_count: 12,
                stock_total: Some(40),
            }
        );

        let statements = pool.statements();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].text.starts_with("SELECT COUNT(*)"));
        assert!(statements[1].text.starts_with("SELECT COALESCE(SUM(stock), 0)"));
        assert!(statements[2].text.contains("LIMIT $2 OFFSET $3"));
        for stmt in &statements {
            assert_eq!(stmt.params[0], SqlValue::Text("aros".to_string()));
        }
    }

    #[tokio::test]
    async fn list_fails_entirely_when_any_statement_fails() {
        let pool = StubPool::failing(StoreError::Connection("refused".to_string()));
        let queries = InventoryQueries::new(pool);

        let err = queries.list(&ListQuery::default()).await.unwrap_err();
        assert_eq!(err, StoreError::Connection("refused".to_string()));
        // Stops at the first failing statement.
        assert_eq!(queries.pool().statements().len(), 1);
    }

    #[tokio::test]
    async fn filter_passes_text_values_as_bound_parameters() {
        let hostile = "oro' OR '1'='1";
        let queries = InventoryQueries::new(StubPool::new(vec![item(3, 1)]));

        let filter = joyas_inventory::resolve_filter(&params(&[("metal", hostile)]));
        let rows = queries.filter(&filter).await.unwrap();
        assert_eq!(rows, vec![item(3, 1)]);

        let statements = queries.pool().statements();
        assert_eq!(
            statements[0].text,
            "SELECT id, nombre, categoria, metal, precio, stock FROM inventario \
             WHERE metal = $1 ORDER BY id ASC"
        );
        assert_eq!(statements[0].params, vec![SqlValue::Text(hostile.to_string())]);
    }

    #[tokio::test]
    async fn get_returns_first_row_or_none() {
        let queries = InventoryQueries::new(StubPool::new(vec![item(5, 2)]));
        assert_eq!(queries.get(ItemId::new(5)).await.unwrap(), Some(item(5, 2)));

        let empty = InventoryQueries::new(StubPool::new(Vec::new()));
        assert_eq!(empty.get(ItemId::new(5)).await.unwrap(), None);
        assert_eq!(empty.pool().statements()[0].params, vec![SqlValue::Int(5)]);
    }
}
