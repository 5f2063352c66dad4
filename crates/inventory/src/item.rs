use serde::{Deserialize, Serialize};

use joyas_core::ItemId;

/// A row of the `inventario` table, as owned by the store.
///
/// Field names mirror the table columns; the raw filter endpoint serializes
/// rows in this shape unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub nombre: String,
    pub categoria: String,
    pub metal: String,
    pub precio: i32,
    pub stock: i32,
}

impl InventoryItem {
    /// Resource link for this item (`/joyas/{id}`).
    pub fn href(&self) -> String {
        format!("/joyas/{}", self.id)
    }
}
