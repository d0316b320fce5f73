//! Gender-scoped user lookup
//!
//! Name-keyed index over the registrations collection, built once per
//! request when a gender filter is active and used as a membership
//! predicate by the dataset aggregations. Building it costs a full scan
//! of the filtered registrations, so it is skipped entirely for "All".

use std::collections::HashMap;
use std::time::Instant;

use serde_json::Value;

use super::collections;
use super::reader::PagedCollectionReader;
use super::Gender;
use crate::store::{CollectionQuery, Document, DocumentStore, FilterOp, StoreError};

pub struct UserFilterIndex {
    profiles: HashMap<String, Document>,
}

impl UserFilterIndex {
    pub async fn build(
        store: &dyn DocumentStore,
        gender: Gender,
        page_size: usize,
        deadline: Option<Instant>,
    ) -> Result<Self, StoreError> {
        let mut query =
            CollectionQuery::new(collections::REGISTRATIONS, "name").with_limit(page_size);
        if let Some(stored) = gender.stored_value() {
            query = query.filter("gender", FilterOp::Eq, Value::String(stored.to_string()));
        }

        let mut reader = PagedCollectionReader::new(store, query);
        if let Some(deadline) = deadline {
            reader = reader.with_deadline(deadline);
        }

        let mut profiles = HashMap::new();
        while let Some(batch) = reader.next_batch().await? {
            for doc in batch {
                if let Some(name) = doc.get_str("name") {
                    profiles.insert(name.to_string(), doc.clone());
                }
            }
        }
        tracing::debug!(users = profiles.len(), ?gender, "built user filter index");
        Ok(Self { profiles })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
