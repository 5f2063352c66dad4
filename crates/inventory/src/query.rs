//! Query parameter resolution.
//!
//! Turns the raw (untrusted) query string of the listing endpoints into a
//! bounded [`ListQuery`]. Resolution is total: anything outside the allow-lists
//! degrades to a safe default instead of being rejected. Column names and sort
//! directions are closed enums, so the only text that can ever be rendered into
//! SQL is one of their fixed tokens.

use core::str::FromStr;
use std::collections::HashMap;
use std::num::IntErrorKind;

use joyas_core::{DomainError, DomainResult};

/// Page size used when `limits` is absent or invalid.
pub const DEFAULT_LIMIT: u32 = 10;
/// Upper bound on the page size.
pub const MAX_LIMIT: u32 = 100;
/// Page used when `page` is absent or invalid.
pub const DEFAULT_PAGE: u32 = 1;

const LIMIT_PARAM: &str = "limits";
const PAGE_PARAM: &str = "page";
const ORDER_BY_PARAM: &str = "order_by";

const PRICE_MIN_PARAMS: &[&str] = &["priceMin", "precio_min"];
const PRICE_MAX_PARAMS: &[&str] = &["priceMax", "precio_max"];
const CATEGORY_PARAMS: &[&str] = &["category", "categoria"];
const METAL_PARAMS: &[&str] = &["metal"];

/// Sortable column (allow-list).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum SortField {
    #[default]
    Id,
    Nombre,
    Categoria,
    Metal,
    Precio,
    Stock,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Id,
        SortField::Nombre,
        SortField::Categoria,
        SortField::Metal,
        SortField::Precio,
        SortField::Stock,
    ];

    /// Column name as it appears in SQL text.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Nombre => "nombre",
            SortField::Categoria => "categoria",
            SortField::Metal => "metal",
            SortField::Precio => "precio",
            SortField::Stock => "stock",
        }
    }
}

impl FromStr for SortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "nombre" | "name" => Ok(SortField::Nombre),
            "categoria" | "category" => Ok(SortField::Categoria),
            "metal" => Ok(SortField::Metal),
            "precio" | "price" => Ok(SortField::Precio),
            "stock" => Ok(SortField::Stock),
            other => Err(DomainError::validation(format!(
                "unknown sort field '{other}'"
            ))),
        }
    }
}

/// Sort direction (allow-list).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(DomainError::validation(format!(
                "unknown sort direction '{other}'"
            ))),
        }
    }
}

/// Filterable column (allow-list).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterField {
    Precio,
    Categoria,
    Metal,
}

impl FilterField {
    pub fn column(&self) -> &'static str {
        match self {
            FilterField::Precio => "precio",
            FilterField::Categoria => "categoria",
            FilterField::Metal => "metal",
        }
    }
}

/// Comparison applied by a [`Predicate`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

impl FilterOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Gte => ">=",
            FilterOp::Lte => "<=",
        }
    }
}

/// Value compared against a column. Always travels as a bound parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Number(f64),
    Text(String),
}

/// One `column op value` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: FilterField,
    pub op: FilterOp,
    pub value: FilterValue,
}

/// Conjunction of predicates, in resolution order
/// (price lower bound, price upper bound, category, metal).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemFilter {
    predicates: Vec<Predicate>,
}

impl ItemFilter {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }
}

/// Validated, bounded listing query.
///
/// Invariants: `1 <= limit <= MAX_LIMIT`, `page >= 1`,
/// `offset == (page - 1) * limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    limit: u32,
    page: u32,
    offset: u64,
    sort_field: SortField,
    sort_direction: SortDirection,
    filter: ItemFilter,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(
            DEFAULT_LIMIT,
            DEFAULT_PAGE,
            SortField::default(),
            SortDirection::default(),
            ItemFilter::default(),
        )
    }
}

impl ListQuery {
    /// Build a query, clamping `limit` into `1..=MAX_LIMIT` and `page` to at least 1.
    pub fn new(
        limit: u32,
        page: u32,
        sort_field: SortField,
        sort_direction: SortDirection,
        filter: ItemFilter,
    ) -> Self {
        let limit = limit.clamp(1, MAX_LIMIT);
        let page = page.max(1);
        let offset = u64::from(page - 1) * u64::from(limit);
        Self {
            limit,
            page,
            offset,
            sort_field,
            sort_direction,
            filter,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }
}

/// Resolve listing parameters (`limits`, `page`, `order_by` and the filter
/// parameters) into a [`ListQuery`]. Never fails.
pub fn resolve(params: &HashMap<String, String>) -> ListQuery {
    let limit = or_default(
        LIMIT_PARAM,
        parse_limit(param(params, LIMIT_PARAM)),
        DEFAULT_LIMIT,
    );
    let page = or_default(
        PAGE_PARAM,
        parse_page(param(params, PAGE_PARAM)),
        DEFAULT_PAGE,
    );
    let (sort_field, sort_direction) = resolve_order_by(param(params, ORDER_BY_PARAM));

    ListQuery::new(limit, page, sort_field, sort_direction, resolve_filter(params))
}

/// Resolve the optional filter parameters. Absent, empty and unparseable
/// values are left out of the filter entirely.
pub fn resolve_filter(params: &HashMap<String, String>) -> ItemFilter {
    let mut predicates = Vec::new();

    if let Some(min) = number_param(params, PRICE_MIN_PARAMS) {
        predicates.push(Predicate {
            field: FilterField::Precio,
            op: FilterOp::Gte,
            value: FilterValue::Number(min),
        });
    }
    if let Some(max) = number_param(params, PRICE_MAX_PARAMS) {
        predicates.push(Predicate {
            field: FilterField::Precio,
            op: FilterOp::Lte,
            value: FilterValue::Number(max),
        });
    }
    if let Some(category) = text_param(params, CATEGORY_PARAMS) {
        predicates.push(Predicate {
            field: FilterField::Categoria,
            op: FilterOp::Eq,
            value: FilterValue::Text(category.to_string()),
        });
    }
    if let Some(metal) = text_param(params, METAL_PARAMS) {
        predicates.push(Predicate {
            field: FilterField::Metal,
            op: FilterOp::Eq,
            value: FilterValue::Text(metal.to_string()),
        });
    }

    ItemFilter::new(predicates)
}

/// Split `<field>_<direction>` on the first underscore and validate both halves
/// independently; each falls back to its own default.
fn resolve_order_by(raw: Option<&str>) -> (SortField, SortDirection) {
    let Some(raw) = raw else {
        return (SortField::default(), SortDirection::default());
    };

    let (field, direction) = match raw.split_once('_') {
        Some((field, direction)) => (field, Some(direction)),
        None => (raw, None),
    };

    let field = or_default(ORDER_BY_PARAM, field.parse(), SortField::default());
    let direction = match direction {
        Some(d) => or_default(ORDER_BY_PARAM, d.parse(), SortDirection::default()),
        None => SortDirection::default(),
    };

    (field, direction)
}

fn parse_limit(raw: Option<&str>) -> DomainResult<u32> {
    let value = parse_integer(LIMIT_PARAM, raw)?;
    if value < 1 {
        return Err(DomainError::validation(format!(
            "{LIMIT_PARAM} must be positive, got {value}"
        )));
    }
    Ok(u32::try_from(value).unwrap_or(MAX_LIMIT).min(MAX_LIMIT))
}

fn parse_page(raw: Option<&str>) -> DomainResult<u32> {
    let value = parse_integer(PAGE_PARAM, raw)?;
    if value < 1 {
        return Err(DomainError::validation(format!(
            "{PAGE_PARAM} must be at least 1, got {value}"
        )));
    }
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

/// Digits too large for `i64` saturate to `i64::MAX` so callers cap them like
/// any other oversized value.
fn parse_integer(name: &str, raw: Option<&str>) -> DomainResult<i64> {
    let raw = raw.ok_or_else(|| DomainError::validation(format!("{name} is missing")))?;
    match raw.trim().parse::<i64>() {
        Ok(v) => Ok(v),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Ok(i64::MAX),
        Err(e) => Err(DomainError::validation(format!("{name}: {e}"))),
    }
}

fn or_default<T>(name: &str, parsed: DomainResult<T>, default: T) -> T {
    match parsed {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(param = name, error = %e, "query parameter replaced by default");
            default
        }
    }
}

fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

fn text_param<'a>(params: &'a HashMap<String, String>, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| param(params, name))
}

fn number_param(params: &HashMap<String, String>, names: &[&str]) -> Option<f64> {
    let raw = text_param(params, names)?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            tracing::debug!(param = names[0], value = raw, "ignoring non-numeric filter value");
            None
        }
    }
}
