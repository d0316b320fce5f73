//! Generic single-pass aggregation engine
//!
//! One engine replaces the per-dataset copies of the same loop: scan a
//! record stream once, apply an optional predicate, feed every named
//! extractor, and project each surviving record into a fixed column set.
//! An extractor that cannot derive a bucket (missing or unparseable date,
//! invalid category) skips only its own tally for that record.

use std::collections::{BTreeMap, HashMap};

use chrono_tz::Tz;
use serde_json::{Map, Value};

use super::dates;
use super::reader::PagedCollectionReader;
use crate::store::{Document, StoreError};

/// Bucket-key counts. BTreeMap keeps day keys in chronological order
/// (`YYYY-MM-DD` sorts lexicographically) and makes every tally
/// deterministic at read time.
pub type Tally = BTreeMap<String, u64>;

type ExtractFn = Box<dyn Fn(&Document) -> Option<String> + Send + Sync>;
type PredicateFn = Box<dyn Fn(&Document) -> bool + Send + Sync>;

pub struct Extractor {
    name: &'static str,
    extract: ExtractFn,
}

impl Extractor {
    pub fn new(
        name: &'static str,
        extract: impl Fn(&Document) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            extract: Box::new(extract),
        }
    }

    /// Calendar-day bucket from a date-like field.
    pub fn day(name: &'static str, date_field: &'static str, tz: Tz) -> Self {
        Self::new(name, move |doc| {
            dates::day_key(doc.get(date_field).unwrap_or(&Value::Null), tz)
        })
    }

    /// Categorical bucket from a string field, with an optional fallback
    /// label for missing or empty values.
    pub fn field(
        name: &'static str,
        field: &'static str,
        fallback: Option<&'static str>,
    ) -> Self {
        Self::new(name, move |doc| match doc.get_str(field) {
            Some(value) if !value.trim().is_empty() => Some(value.to_string()),
            _ => fallback.map(str::to_string),
        })
    }
}

#[derive(Debug, Default)]
pub struct AggregationOutput {
    tallies: HashMap<&'static str, Tally>,
    pub rows: Vec<Map<String, Value>>,
}

impl AggregationOutput {
    pub fn tally(&self, name: &str) -> Tally {
        self.tallies.get(name).cloned().unwrap_or_default()
    }
}

pub struct AggregationEngine {
    columns: &'static [&'static str],
    extractors: Vec<Extractor>,
    predicate: Option<PredicateFn>,
}

impl AggregationEngine {
    pub fn new(columns: &'static [&'static str]) -> Self {
        Self {
            columns,
            extractors: Vec::new(),
            predicate: None,
        }
    }

    pub fn extractor(mut self, extractor: Extractor) -> Self {
        self.extractors.push(extractor);
        self
    }

    pub fn predicate(
        mut self,
        predicate: impl Fn(&Document) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Feed one record through the predicate, every extractor, and the
    /// structured-row projection.
    pub fn observe(&self, output: &mut AggregationOutput, doc: &Document) {
        if let Some(predicate) = &self.predicate {
            if !predicate(doc) {
                return;
            }
        }

        for extractor in &self.extractors {
            if let Some(bucket) = (extractor.extract)(doc) {
                *output
                    .tallies
                    .entry(extractor.name)
                    .or_default()
                    .entry(bucket)
                    .or_insert(0) += 1;
            }
        }

        // Fixed projection: missing fields become null, never an error
        let mut row = Map::with_capacity(self.columns.len());
        for column in self.columns {
            row.insert(
                column.to_string(),
                doc.get(column).cloned().unwrap_or(Value::Null),
            );
        }
        output.rows.push(row);
    }

    /// Single pass over the full scan.
    pub async fn run(
        &self,
        reader: &mut PagedCollectionReader<'_>,
    ) -> Result<AggregationOutput, StoreError> {
        let mut output = AggregationOutput::default();
        for extractor in &self.extractors {
            output.tallies.insert(extractor.name, Tally::new());
        }
        while let Some(batch) = reader.next_batch().await? {
            for doc in &batch {
                self.observe(&mut output, doc);
            }
        }
        Ok(output)
    }
}
