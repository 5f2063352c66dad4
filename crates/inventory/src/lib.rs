//! Inventory domain module (read side).
//!
//! This crate contains the pure logic of the jewelry listing endpoints: the
//! stored row shape, the resolver that turns untrusted query parameters into a
//! bounded [`ListQuery`], and the projector that shapes rows into the
//! link-annotated [`ListResult`] envelope. No IO, no HTTP, no storage.

pub mod item;
pub mod projection;
pub mod query;

pub use item::InventoryItem;
pub use projection::{project, ItemView, ListResult, Totals};
pub use query::{
    resolve, resolve_filter, FilterField, FilterOp, FilterValue, ItemFilter, ListQuery, Predicate,
    SortDirection, SortField, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT,
};
