//! Parameterized SQL statements for the `inventario` table.
//!
//! Every caller-supplied value travels in [`Statement::params`] and is bound
//! by the driver. The statement text is assembled only from fixed fragments
//! and the allow-listed tokens of [`SortField`], [`SortDirection`],
//! [`FilterField`] and [`FilterOp`].
//!
//! [`SortField`]: joyas_inventory::SortField
//! [`SortDirection`]: joyas_inventory::SortDirection
//! [`FilterField`]: joyas_inventory::FilterField
//! [`FilterOp`]: joyas_inventory::FilterOp

use joyas_core::ItemId;
use joyas_inventory::{FilterValue, ItemFilter, ListQuery, SortField};

const TABLE: &str = "inventario";
const COLUMNS: &str = "id, nombre, categoria, metal, precio, stock";

/// A value bound to a positional placeholder (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&FilterValue> for SqlValue {
    fn from(value: &FilterValue) -> Self {
        match value {
            FilterValue::Number(n) => SqlValue::Float(*n),
            FilterValue::Text(s) => SqlValue::Text(s.clone()),
        }
    }
}

/// SQL text plus the values for its placeholders, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub params: Vec<SqlValue>,
}

impl Statement {
    fn new(text: String, params: Vec<SqlValue>) -> Self {
        Self { text, params }
    }

    /// Append `value` as the next positional parameter and return its placeholder.
    fn push_param(&mut self, value: SqlValue) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }
}

/// `SELECT COUNT(*)` over the rows matching `filter`.
pub fn count(filter: &ItemFilter) -> Statement {
    let (where_sql, params) = where_clause(filter);
    Statement::new(
        format!("SELECT COUNT(*) AS total FROM {TABLE}{where_sql}"),
        params,
    )
}

/// Summed stock of the rows matching `filter` (0 when nothing matches).
pub fn stock_total(filter: &ItemFilter) -> Statement {
    let (where_sql, params) = where_clause(filter);
    Statement::new(
        format!("SELECT COALESCE(SUM(stock), 0) AS total FROM {TABLE}{where_sql}"),
        params,
    )
}

/// One sorted, bounded page of the rows matching the query's filter.
pub fn page(query: &ListQuery) -> Statement {
    let (where_sql, params) = where_clause(query.filter());
    let mut stmt = Statement::new(String::new(), params);

    let mut order_sql = format!(
        "{} {}",
        query.sort_field().column(),
        query.sort_direction().as_sql()
    );
    // Ties on non-unique columns would otherwise shuffle rows between pages.
    if query.sort_field() != SortField::Id {
        order_sql.push_str(", id ASC");
    }

    let limit = stmt.push_param(SqlValue::Int(i64::from(query.limit())));
    let offset = stmt.push_param(SqlValue::Int(
        i64::try_from(query.offset()).unwrap_or(i64::MAX),
    ));

    stmt.text = format!(
        "SELECT {COLUMNS} FROM {TABLE}{where_sql} ORDER BY {order_sql} LIMIT {limit} OFFSET {offset}"
    );
    stmt
}

/// All rows matching `filter`, by id.
pub fn filtered(filter: &ItemFilter) -> Statement {
    let (where_sql, params) = where_clause(filter);
    Statement::new(
        format!("SELECT {COLUMNS} FROM {TABLE}{where_sql} ORDER BY id ASC"),
        params,
    )
}

/// A single row by primary key.
pub fn by_id(id: ItemId) -> Statement {
    Statement::new(
        format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = $1"),
        vec![SqlValue::Int(i64::from(id.get()))],
    )
}

/// Render `filter` as ` WHERE a AND b ...` (or nothing when empty).
///
/// Predicates are first collected as `(clause, value)` pairs; placeholders are
/// then numbered by position, so clause `i` always pairs with parameter `i`.
fn where_clause(filter: &ItemFilter) -> (String, Vec<SqlValue>) {
    let pairs: Vec<(String, SqlValue)> = filter
        .predicates()
        .iter()
        .map(|p| {
            (
                format!("{} {}", p.field.column(), p.op.as_sql()),
                SqlValue::from(&p.value),
            )
        })
        .collect();

    if pairs.is_empty() {
        return (String::new(), Vec::new());
    }

    let clauses: Vec<String> = pairs
        .iter()
        .enumerate()
        .map(|(i, (clause, _))| format!("{clause} ${}", i + 1))
        .collect();
    let params = pairs.into_iter().map(|(_, value)| value).collect();

    (format!(" WHERE {}", clauses.join(" AND ")), params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use joyas_inventory::{resolve, resolve_filter, SortDirection};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unfiltered_count_has_no_where_clause() {
        let stmt = count(&ItemFilter::default());
        assert_eq!(stmt.text, "SELECT COUNT(*) AS total FROM inventario");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn single_category_filter_binds_one_parameter() {
        let stmt = count(&resolve_filter(&params(&[("category", "gold")])));
        assert_eq!(
            stmt.text,
            "SELECT COUNT(*) AS total FROM inventario WHERE categoria = $1"
        );
        assert_eq!(stmt.params, vec![SqlValue::Text("gold".to_string())]);
    }

    #[test]
    fn placeholders_follow_predicate_order() {
        let filter = resolve_filter(&params(&[
            ("priceMin", "100"),
            ("priceMax", "500"),
            ("category", "aros"),
            ("metal", "oro"),
        ]));
        let stmt = stock_total(&filter);

        assert_eq!(
            stmt.text,
            "SELECT COALESCE(SUM(stock), 0) AS total FROM inventario \
             WHERE precio >= $1 AND precio <= $2 AND categoria = $3 AND metal = $4"
        );
        assert_eq!(
            stmt.params,
            vec![
                SqlValue::Float(100.0),
                SqlValue::Float(500.0),
                SqlValue::Text("aros".to_string()),
                SqlValue::Text("oro".to_string()),
            ]
        );
    }

    #[test]
    fn page_binds_limit_and_offset_after_filters() {
        let query = resolve(&params(&[
            ("limits", "3"),
            ("page", "2"),
            ("order_by", "precio_DESC"),
            ("metal", "plata"),
        ]));
        let stmt = page(&query);

        assert_eq!(
            stmt.text,
            "SELECT id, nombre, categoria, metal, precio, stock FROM inventario \
             WHERE metal = $1 ORDER BY precio DESC, id ASC LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            stmt.params,
            vec![
                SqlValue::Text("plata".to_string()),
                SqlValue::Int(3),
                SqlValue::Int(3),
            ]
        );
    }

    #[test]
    fn default_page_orders_by_id_only() {
        let stmt = page(&ListQuery::default());
        assert_eq!(
            stmt.text,
            "SELECT id, nombre, categoria, metal, precio, stock FROM inventario \
             ORDER BY id ASC LIMIT $1 OFFSET $2"
        );
        assert_eq!(stmt.params, vec![SqlValue::Int(10), SqlValue::Int(0)]);
    }

    #[test]
    fn by_id_binds_the_key() {
        let stmt = by_id(ItemId::new(7));
        assert!(stmt.text.ends_with("WHERE id = $1"));
        assert_eq!(stmt.params, vec![SqlValue::Int(7)]);
    }

    #[test]
    fn filtered_rows_are_ordered_by_id() {
        let stmt = filtered(&resolve_filter(&params(&[("priceMax", "2000")])));
        assert_eq!(
            stmt.text,
            "SELECT id, nombre, categoria, metal, precio, stock FROM inventario \
             WHERE precio <= $1 ORDER BY id ASC"
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 512,
            ..ProptestConfig::default()
        })]

        /// Property: text filter values never reach the statement text; they
        /// are bound verbatim and the clause structure stays fixed.
        #[test]
        fn text_filters_never_alter_statement_text(
            category in "\\PC+",
            metal in "[a-z'\";\\-\\\\ ]{1,40}",
        ) {
            prop_assume!(!category.trim().is_empty() && !metal.trim().is_empty());

            let query = resolve(&params(&[
                ("category", category.as_str()),
                ("metal", metal.as_str()),
                ("order_by", "nombre_DESC"),
            ]));
            let stmt = page(&query);

            prop_assert_eq!(
                stmt.text.as_str(),
                "SELECT id, nombre, categoria, metal, precio, stock FROM inventario \
                 WHERE categoria = $1 AND metal = $2 ORDER BY nombre DESC, id ASC LIMIT $3 OFFSET $4"
            );
            prop_assert_eq!(&stmt.params[0], &SqlValue::Text(category.clone()));
            prop_assert_eq!(&stmt.params[1], &SqlValue::Text(metal.clone()));
        }

        /// Property: any resolved order renders only allow-listed tokens.
        #[test]
        fn order_clause_uses_only_allow_listed_tokens(order_by in ".*") {
            let query = resolve(&params(&[("order_by", order_by.as_str())]));
            let stmt = page(&query);

            let order = stmt
                .text
                .split(" ORDER BY ")
                .nth(1)
                .and_then(|rest| rest.split(" LIMIT ").next())
                .unwrap();
            let mut tokens = order.split([' ', ',']).filter(|t| !t.is_empty());
            let column = tokens.next().unwrap();
            let direction = tokens.next().unwrap();

            prop_assert!(SortField::ALL.iter().any(|f| f.column() == column));
            prop_assert!(
                direction == SortDirection::Asc.as_sql() || direction == SortDirection::Desc.as_sql()
            );
        }
    }
}
