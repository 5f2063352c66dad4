//! Result projection: stored rows -> external listing envelope.

use serde::Serialize;

use crate::item::InventoryItem;

/// Aggregates computed alongside a listing page.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Totals {
    /// Rows matching the query across all pages.
    pub total_count: i64,
    /// Summed stock of the matching rows, when the listing computes it.
    pub stock_total: Option<i64>,
}

/// Public view of one item, with its resource link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub name: String,
    pub href: String,
    pub categoria: String,
    pub metal: String,
    pub precio: i32,
    pub stock: i32,
}

impl From<InventoryItem> for ItemView {
    fn from(item: InventoryItem) -> Self {
        let href = item.href();
        Self {
            name: item.nombre,
            href,
            categoria: item.categoria,
            metal: item.metal,
            precio: item.precio,
            stock: item.stock,
        }
    }
}

/// Paginated listing envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListResult {
    #[serde(rename = "totalJoyas")]
    pub total_count: i64,
    #[serde(rename = "stockTotal", skip_serializing_if = "Option::is_none")]
    pub stock_total: Option<i64>,
    pub results: Vec<ItemView>,
}

/// Project rows into the listing envelope.
///
/// Row order is preserved; totals are attached unmodified.
pub fn project(rows: Vec<InventoryItem>, totals: Totals) -> ListResult {
    ListResult {
        total_count: totals.total_count,
        stock_total: totals.stock_total,
        results: rows.into_iter().map(ItemView::from).collect(),
    }
}
