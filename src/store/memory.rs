//! In-memory document store
//!
//! Implements the same paging contract as `SqliteStore`. Used as the test
//! double and as the `memory` backend for local demos.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::{
    compare_field, CollectionQuery, Cursor, Direction, Document, DocumentStore, Filter, FilterOp,
    StoreError,
};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, collection: &str, doc: Document) {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        collections
            .entry(collection.to_string())
            .or_default()
            .push(doc);
    }
}

fn matches(doc: &Document, filter: &Filter) -> bool {
    let value = doc.get(&filter.field).unwrap_or(&Value::Null);
    match filter.op {
        FilterOp::Eq => value == &filter.value,
        FilterOp::Gte => compare_field(value, &filter.value) != Ordering::Less,
        FilterOp::Lte => compare_field(value, &filter.value) != Ordering::Greater,
    }
}

fn order_key(doc: &Document, order_by: &str) -> Value {
    doc.get(order_by).cloned().unwrap_or(Value::Null)
}

/// Position of `doc` relative to the cursor in ascending `(order, id)` order.
fn cursor_cmp(doc: &Document, order_by: &str, cursor: &Cursor) -> Ordering {
    compare_field(&order_key(doc, order_by), &cursor.order_value)
        .then_with(|| doc.id.cmp(&cursor.doc_id))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(&self, query: &CollectionQuery) -> Result<Vec<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let docs = match collections.get(&query.collection) {
            Some(docs) => docs,
            None => return Ok(Vec::new()),
        };

        let mut selected: Vec<&Document> = docs
            .iter()
            .filter(|doc| query.filters.iter().all(|f| matches(doc, f)))
            .filter(|doc| match &query.start_after {
                None => true,
                Some(cursor) => match query.direction {
                    Direction::Ascending => {
                        cursor_cmp(doc, &query.order_by, cursor) == Ordering::Greater
                    }
                    Direction::Descending => {
                        cursor_cmp(doc, &query.order_by, cursor) == Ordering::Less
                    }
                },
            })
            .collect();

        selected.sort_by(|a, b| {
            let ordering = compare_field(
                &order_key(a, &query.order_by),
                &order_key(b, &query.order_by),
            )
            .then_with(|| a.id.cmp(&b.id));
            match query.direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            }
        });

        Ok(selected.into_iter().take(query.limit).cloned().collect())
    }

    async fn fetch(&self, collection: &str, doc_id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == doc_id))
            .cloned())
    }
}
