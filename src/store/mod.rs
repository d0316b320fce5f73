//! Abstract document store
//!
//! The analytics core never talks to a concrete database. It sees a
//! `DocumentStore`: a paginated, filterable collection store with
//! server-side range queries, single-field ordering, and opaque resume
//! cursors. Two implementations are provided: `SqliteStore` (production)
//! and `MemoryStore` (tests, local demo).

pub mod memory;
pub mod sqlite;

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),

    #[error("collection scan deadline exceeded")]
    DeadlineExceeded,
}

/// An immutable snapshot of one stored document.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self { id: id.into(), fields }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn get_u64(&self, field: &str) -> Option<u64> {
        self.fields.get(field).and_then(Value::as_u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lte,
}

#[derive(Debug, Clone)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Opaque resume token: the order-key value and id of the last document
/// of the previous page. Passing it back yields documents strictly after
/// it in the query's declared order.
#[derive(Debug, Clone)]
pub struct Cursor {
    pub order_value: Value,
    pub doc_id: String,
}

#[derive(Debug, Clone)]
pub struct CollectionQuery {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: String,
    pub direction: Direction,
    pub start_after: Option<Cursor>,
    pub limit: usize,
}

impl CollectionQuery {
    pub fn new(collection: impl Into<String>, order_by: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order_by: order_by.into(),
            direction: Direction::Ascending,
            start_after: None,
            limit: 500,
        }
    }

    pub fn filter(mut self, field: impl Into<String>, op: FilterOp, value: Value) -> Self {
        self.filters.push(Filter { field: field.into(), op, value });
        self
    }

    pub fn descending(mut self) -> Self {
        self.direction = Direction::Descending;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Paging contract shared by all implementations: results are ordered by
/// `(order_by value, doc_id)`, and a page shorter than `limit` implies the
/// scan is exhausted.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn query(&self, query: &CollectionQuery) -> Result<Vec<Document>, StoreError>;

    async fn fetch(&self, collection: &str, doc_id: &str) -> Result<Option<Document>, StoreError>;
}

pub type SharedStore = Arc<dyn DocumentStore>;

/// Field-value ordering used by `MemoryStore` for sorting and range
/// filters. Date-like values (epoch millis, ISO-8601 strings) compare
/// chronologically so that mixed representations of the same field order
/// correctly; everything else falls back to type-wise comparison.
pub(crate) fn compare_field(a: &Value, b: &Value) -> Ordering {
    if let (Some(ta), Some(tb)) = (
        crate::analytics::dates::instant_from_value(a),
        crate::analytics::dates::instant_from_value(b),
    ) {
        return ta.cmp(&tb);
    }
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}
