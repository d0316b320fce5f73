//! Cursor-based full-collection scanner
//!
//! Drives a `DocumentStore` query to exhaustion in `page_size` batches.
//! The loop terminates on an empty batch; a batch shorter than the page
//! size also terminates the scan, which is sound under the store's paging
//! contract (a short page implies exhaustion). A deadline, when set, is
//! checked between page fetches so unbounded collections cannot produce
//! unbounded request latency.

use std::time::Instant;

use serde_json::Value;

use crate::store::{CollectionQuery, Cursor, Document, DocumentStore, StoreError};

pub struct PagedCollectionReader<'a> {
    store: &'a dyn DocumentStore,
    query: CollectionQuery,
    cursor: Option<Cursor>,
    deadline: Option<Instant>,
    exhausted: bool,
}

impl<'a> PagedCollectionReader<'a> {
    pub fn new(store: &'a dyn DocumentStore, query: CollectionQuery) -> Self {
        Self {
            store,
            query,
            cursor: None,
            deadline: None,
            exhausted: false,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fetch the next batch, or `None` once the collection is exhausted
    /// under the query's filters.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<Document>>, StoreError> {
        if self.exhausted {
            return Ok(None);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(StoreError::DeadlineExceeded);
            }
        }

        let mut query = self.query.clone();
        query.start_after = self.cursor.clone();
        let batch = self.store.query(&query).await?;

        if batch.is_empty() {
            self.exhausted = true;
            return Ok(None);
        }
        if batch.len() < self.query.limit {
            self.exhausted = true;
        }
        if let Some(last) = batch.last() {
            self.cursor = Some(Cursor {
                order_value: last.get(&self.query.order_by).cloned().unwrap_or(Value::Null),
                doc_id: last.id.clone(),
            });
        }
        Ok(Some(batch))
    }

    /// Assemble the full scan into one vector.
    pub async fn collect_all(&mut self) -> Result<Vec<Document>, StoreError> {
        let mut all = Vec::new();
        while let Some(batch) = self.next_batch().await? {
            all.extend(batch);
        }
        Ok(all)
    }
}
