//! Stats orchestration
//!
//! One request flows `ResolveWindow -> [BuildUserIndex] -> dataset
//! aggregations (concurrent, order-independent) -> merge`. Every dataset
//! is isolated: a failure inside one is logged and replaced with its
//! zero shape, so partial analytics beats no analytics. Only window
//! resolution and the user-index build can fail the whole request.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration as ChronoDuration, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::collections;
use super::dates;
use super::datasets::{self, AnalyticsContext};
use super::rank::{CategoryCount, DayCount, LabelValue};
use super::users::UserFilterIndex;
use super::{AnalyticsSettings, Gender, TimeWindow};
use crate::error::ApiError;
use crate::store::{CollectionQuery, Document, DocumentStore, FilterOp, SharedStore, StoreError};

const RECENT_ENTRIES: usize = 5;

/// Parsed analytics request. `filtered` marks a POST-style request with
/// caller-supplied bounds; a plain GET uses the trailing default window.
#[derive(Debug, Clone, Default)]
pub struct StatsRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub gender: Option<String>,
    pub filtered: bool,
}

impl StatsRequest {
    pub fn default_window() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct BasicStats {
    pub total_users: u64,
    pub active_today: u64,
    pub active_week: u64,
    pub disease_predictions: u64,
    pub chatbot_interactions: u64,
    pub mental_health_assessments: u64,
    pub new_users_week: u64,
    pub retention_rate: f64,
    pub feedbacks: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSection {
    pub disease_trends: Vec<DayCount>,
    pub disease_categories: Vec<CategoryCount>,
    pub disease_risk_levels: Vec<CategoryCount>,
    pub disease_doctors: Vec<CategoryCount>,
    pub disease_medicine: Vec<CategoryCount>,
    pub disease_records: Vec<Map<String, Value>>,
    pub mental_health_trends: Vec<DayCount>,
    pub mental_health_distribution: Vec<LabelValue>,
    pub mental_health_records: Vec<Map<String, Value>>,
    pub medical_bot_trends: Vec<DayCount>,
    pub medical_bot_categories: Vec<CategoryCount>,
    pub medical_bot_records: Vec<Map<String, Value>>,
    pub user_growth: Vec<DayCount>,
    pub user_activity: Vec<DayCount>,
    pub feedback_sentiment: Vec<CategoryCount>,
    pub feedback_records: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginEntry {
    pub email: String,
    pub feature: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackComment {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub recent_logs: Vec<LoginEntry>,
    pub feedback: Vec<FeedbackComment>,
    pub recent_disease_predictions: Vec<Map<String, Value>>,
    pub recent_mental_health: Vec<Map<String, Value>>,
    pub recent_medical_bot: Vec<Map<String, Value>>,
    pub recent_feedbacks: Vec<Map<String, Value>>,
    pub recent_registrations: Vec<Map<String, Value>>,
}

/// Fixed-shape response: every key is always present, zero-filled when a
/// dataset produced nothing (or failed).
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub basic_stats: BasicStats,
    pub analytics: AnalyticsSection,
    pub recent_activity: RecentActivity,
}

/// Zero-fill wrapper implementing the per-dataset failure policy.
async fn dataset_or_zero<T, F>(name: &'static str, fut: F) -> T
where
    T: Default,
    F: Future<Output = Result<T, StoreError>>,
{
    match fut.await {
        Ok(section) => section,
        Err(err) => {
            tracing::error!(dataset = name, "dataset aggregation failed, zero-filling: {err}");
            T::default()
        }
    }
}

#[derive(Clone)]
pub struct StatsAggregator {
    store: SharedStore,
    settings: AnalyticsSettings,
}

impl StatsAggregator {
    pub fn new(store: SharedStore, settings: AnalyticsSettings) -> Self {
        Self { store, settings }
    }

    pub async fn run(&self, request: StatsRequest) -> Result<StatsResponse, ApiError> {
        let (window, gender) = self.resolve(&request)?;
        let deadline = Instant::now() + self.settings.deadline;

        // The index build is a top-level failure: without it a gender
        // filter would silently degrade into unfiltered results.
        let user_index = match gender.stored_value() {
            Some(_) => {
                let index = UserFilterIndex::build(
                    self.store.as_ref(),
                    gender,
                    self.settings.page_size,
                    Some(deadline),
                )
                .await
                .map_err(ApiError::aggregation)?;
                Some(Arc::new(index))
            }
            None => None,
        };

        let ctx = AnalyticsContext {
            store: self.store.clone(),
            tz: self.settings.tz,
            page_size: self.settings.page_size,
            deadline: Some(deadline),
            window,
            filtered: request.filtered,
            user_index,
        };

        tracing::info!(
            start = %window.start,
            end = %window.end,
            ?gender,
            filtered = request.filtered,
            "running stats aggregation"
        );

        let (disease, mental, bot, users, feedback, basic_stats, recent_activity) = tokio::join!(
            dataset_or_zero("disease", datasets::disease(&ctx)),
            dataset_or_zero("mental_health", datasets::mental_health(&ctx)),
            dataset_or_zero("medical_bot", datasets::medical_bot(&ctx)),
            dataset_or_zero("user_growth_activity", datasets::user_growth_activity(&ctx)),
            dataset_or_zero("feedback", datasets::feedback(&ctx)),
            self.basic_stats(&ctx),
            self.recent_activity(&ctx),
        );

        Ok(StatsResponse {
            basic_stats,
            analytics: AnalyticsSection {
                disease_trends: disease.trends,
                disease_categories: disease.categories,
                disease_risk_levels: disease.risk_levels,
                disease_doctors: disease.doctors,
                disease_medicine: disease.cures,
                disease_records: disease.records,
                mental_health_trends: mental.trends,
                mental_health_distribution: mental.distribution,
                mental_health_records: mental.records,
                medical_bot_trends: bot.trends,
                medical_bot_categories: bot.categories,
                medical_bot_records: bot.records,
                user_growth: users.growth,
                user_activity: users.activity,
                feedback_sentiment: feedback.sentiment,
                feedback_records: feedback.records,
            },
            recent_activity,
        })
    }

    fn resolve(&self, request: &StatsRequest) -> Result<(TimeWindow, Gender), ApiError> {
        let gender = match &request.gender {
            None => Gender::All,
            Some(raw) => Gender::parse(raw).ok_or_else(|| {
                ApiError::InvalidRequest(format!(
                    "invalid gender value '{}'; expected All, Male or Female",
                    raw
                ))
            })?,
        };

        let mut window = TimeWindow::trailing_days(self.settings.default_window_days);
        if request.filtered {
            if let Some(raw) = &request.start_date {
                window.start = dates::parse_instant(raw).ok_or_else(|| {
                    ApiError::InvalidRequest(
                        "invalid start_date; use ISO 8601 (e.g. 2025-05-01T00:00:00Z)".into(),
                    )
                })?;
            }
            if let Some(raw) = &request.end_date {
                window.end = dates::parse_instant(raw).ok_or_else(|| {
                    ApiError::InvalidRequest(
                        "invalid end_date; use ISO 8601 (e.g. 2025-05-31T23:59:59Z)".into(),
                    )
                })?;
            }
            window.validate()?;
        }
        Ok((window, gender))
    }

    // --- scalar counters -------------------------------------------------

    /// Full-scan record count. Zero on failure; scalar counters follow
    /// the same isolation policy as dataset aggregations.
    async fn count(&self, ctx: &AnalyticsContext, collection: &str, order_by: &str) -> u64 {
        self.count_since(ctx, collection, order_by, None).await
    }

    async fn count_since(
        &self,
        ctx: &AnalyticsContext,
        collection: &str,
        order_by: &str,
        since_days: Option<i64>,
    ) -> u64 {
        let mut query = CollectionQuery::new(collection, order_by).with_limit(ctx.page_size);
        if let Some(days) = since_days {
            query = query.filter(order_by, FilterOp::Gte, cutoff_bound(days));
        }
        let mut reader = ctx.reader(query);
        let mut total = 0u64;
        loop {
            match reader.next_batch().await {
                Ok(Some(batch)) => total += batch.len() as u64,
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(collection, "count scan failed: {err}");
                    return 0;
                }
            }
        }
        total
    }

    /// Distinct login users within the trailing day range.
    async fn active_users(&self, ctx: &AnalyticsContext, days: i64) -> u64 {
        let query = CollectionQuery::new(collections::USER_LOGINS, "timestamp")
            .filter("timestamp", FilterOp::Gte, cutoff_bound(days))
            .with_limit(ctx.page_size);
        let mut reader = ctx.reader(query);
        let mut seen: HashSet<String> = HashSet::new();
        loop {
            match reader.next_batch().await {
                Ok(Some(batch)) => {
                    for doc in &batch {
                        if let Some(user_id) = doc.get_str("userId") {
                            if !user_id.is_empty() {
                                seen.insert(user_id.to_string());
                            }
                        }
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!("active-user scan failed: {err}");
                    return 0;
                }
            }
        }
        seen.len() as u64
    }

    /// Pre-maintained per-collection counters, keyed by collection name.
    async fn counters(&self, ctx: &AnalyticsContext) -> HashMap<String, u64> {
        let query =
            CollectionQuery::new(collections::COUNTERS, "count").with_limit(ctx.page_size);
        let mut reader = ctx.reader(query);
        let mut counters = HashMap::new();
        loop {
            match reader.next_batch().await {
                Ok(Some(batch)) => {
                    for doc in batch {
                        if let Some(count) = doc.get_u64("count") {
                            counters.insert(doc.id, count);
                        }
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!("counter scan failed: {err}");
                    return HashMap::new();
                }
            }
        }
        counters
    }

    async fn basic_stats(&self, ctx: &AnalyticsContext) -> BasicStats {
        let (counters, total_users, feedbacks, active_today, active_week, new_users_week) = tokio::join!(
            self.counters(ctx),
            self.count(ctx, collections::USERS, "createdAt"),
            self.count(ctx, collections::FEEDBACK, "date"),
            self.active_users(ctx, 1),
            self.active_users(ctx, 7),
            self.count_since(ctx, collections::USERS, "createdAt", Some(7)),
        );

        let retention_rate = if total_users > 0 {
            (active_week as f64 / total_users as f64 * 10_000.0).round() / 100.0
        } else {
            0.0
        };

        let counter = |name: &str| counters.get(name).copied().unwrap_or(0);
        BasicStats {
            total_users,
            active_today,
            active_week,
            disease_predictions: counter(collections::DISEASE_PREDICTIONS),
            chatbot_interactions: counter(collections::MEDICAL_BOT),
            mental_health_assessments: counter(collections::MENTAL_HEALTH),
            new_users_week,
            retention_rate,
            feedbacks,
        }
    }

    // --- recent activity -------------------------------------------------

    async fn recent_entries(
        &self,
        ctx: &AnalyticsContext,
        collection: &str,
        date_field: &str,
    ) -> Vec<Map<String, Value>> {
        let query = CollectionQuery::new(collection, date_field)
            .descending()
            .with_limit(RECENT_ENTRIES);
        match self.store.query(&query).await {
            Ok(docs) => docs
                .into_iter()
                .map(|doc| format_entry(doc, ctx))
                .collect(),
            Err(err) => {
                tracing::warn!(collection, "recent-entries query failed: {err}");
                Vec::new()
            }
        }
    }

    /// Last logins within a week, joined to the users collection for the
    /// account email.
    async fn recent_logs(&self, ctx: &AnalyticsContext) -> Vec<LoginEntry> {
        let query = CollectionQuery::new(collections::USER_LOGINS, "timestamp")
            .filter("timestamp", FilterOp::Gte, cutoff_bound(7))
            .descending()
            .with_limit(self.settings.recent_limit);
        let docs = match self.store.query(&query).await {
            Ok(docs) => docs,
            Err(err) => {
                tracing::warn!("recent-logins query failed: {err}");
                return Vec::new();
            }
        };

        let mut entries = Vec::with_capacity(docs.len());
        for doc in docs {
            let user_id = match doc.get_str("userId") {
                Some(id) if !id.is_empty() => id,
                _ => continue,
            };
            let email = match self.store.fetch(collections::USERS, user_id).await {
                Ok(Some(user)) => user
                    .get_str("email")
                    .unwrap_or("Unknown")
                    .to_string(),
                Ok(None) => "Unknown".to_string(),
                Err(err) => {
                    tracing::warn!(user_id, "user lookup failed: {err}");
                    "Unknown".to_string()
                }
            };
            entries.push(LoginEntry {
                email,
                feature: doc.get_str("feature").unwrap_or("Login").to_string(),
                timestamp: dates::iso_in_zone(
                    doc.get("timestamp").unwrap_or(&Value::Null),
                    ctx.tz,
                ),
            });
        }
        entries
    }

    async fn recent_feedback(&self, ctx: &AnalyticsContext) -> Vec<FeedbackComment> {
        let query = CollectionQuery::new(collections::FEEDBACK, "date")
            .descending()
            .with_limit(self.settings.recent_limit);
        match self.store.query(&query).await {
            Ok(docs) => docs
                .into_iter()
                .map(|doc| FeedbackComment {
                    name: doc.get_str("name").unwrap_or("Anonymous").to_string(),
                    email: doc.get_str("email").unwrap_or("Unknown").to_string(),
                    message: doc.get_str("message").unwrap_or_default().to_string(),
                    timestamp: dates::iso_in_zone(doc.get("date").unwrap_or(&Value::Null), ctx.tz),
                })
                .collect(),
            Err(err) => {
                tracing::warn!("recent-feedback query failed: {err}");
                Vec::new()
            }
        }
    }

    async fn recent_activity(&self, ctx: &AnalyticsContext) -> RecentActivity {
        let (
            recent_logs,
            feedback,
            recent_disease_predictions,
            recent_mental_health,
            recent_medical_bot,
            recent_feedbacks,
            recent_registrations,
        ) = tokio::join!(
            self.recent_logs(ctx),
            self.recent_feedback(ctx),
            self.recent_entries(ctx, collections::DISEASE_PREDICTIONS, "date"),
            self.recent_entries(ctx, collections::MENTAL_HEALTH, "date"),
            self.recent_entries(ctx, collections::MEDICAL_BOT, "date"),
            self.recent_entries(ctx, collections::FEEDBACK, "date"),
            self.recent_entries(ctx, collections::REGISTRATIONS, "date"),
        );

        RecentActivity {
            recent_logs,
            feedback,
            recent_disease_predictions,
            recent_mental_health,
            recent_medical_bot,
            recent_feedbacks,
            recent_registrations,
        }
    }
}

fn cutoff_bound(days: i64) -> Value {
    Value::String(
        (Utc::now() - ChronoDuration::days(days))
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string(),
    )
}

/// Flatten a document for the "recent items" lists: id plus all fields,
/// with a normalized timestamp in the reporting zone.
fn format_entry(doc: Document, ctx: &AnalyticsContext) -> Map<String, Value> {
    let raw_date = ["date", "timestamp", "createdAt"]
        .iter()
        .find_map(|field| doc.get(field))
        .cloned()
        .unwrap_or(Value::Null);
    let mut entry = Map::with_capacity(doc.fields.len() + 2);
    entry.insert("id".to_string(), Value::String(doc.id.clone()));
    for (key, value) in doc.fields {
        entry.insert(key, value);
    }
    entry.insert(
        "timestamp".to_string(),
        dates::iso_in_zone(&raw_date, ctx.tz)
            .map(Value::String)
            .unwrap_or(Value::Null),
    );
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DocumentStore, MemoryStore};
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use serde_json::json;
    use std::time::Duration;

    fn settings() -> AnalyticsSettings {
        AnalyticsSettings {
            tz: chrono_tz::Asia::Karachi,
            page_size: 3,
            default_window_days: 30,
            recent_limit: 10,
            deadline: Duration::from_secs(10),
        }
    }

    fn doc(id: &str, fields: Value) -> Document {
        Document::new(id, fields.as_object().cloned().unwrap_or_default())
    }

    fn days_ago(days: i64) -> String {
        (Utc::now() - ChronoDuration::days(days))
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string()
    }

    /// Store with data in every collection, dated relative to now so the
    /// default trailing window covers it.
    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for (i, name, gender) in [(1, "ali", "male"), (2, "zara", "female"), (3, "omar", "male")] {
            store.insert(
                collections::REGISTRATIONS,
                doc(
                    &format!("r{}", i),
                    json!({ "name": name, "gender": gender, "date": days_ago(20 + i) }),
                ),
            );
            store.insert(
                collections::USERS,
                doc(
                    &format!("u{}", i),
                    json!({ "email": format!("{}@x.pk", name), "createdAt": days_ago(10 + i) }),
                ),
            );
        }
        for (i, user, disease) in [
            (1, "ali", "Flu"),
            (2, "ali", "Flu"),
            (3, "zara", "Asthma"),
            (4, "omar", "Migraine"),
        ] {
            store.insert(
                collections::DISEASE_PREDICTIONS,
                doc(
                    &format!("d{}", i),
                    json!({
                        "date": days_ago(i),
                        "disease": disease,
                        "riskLevel": "High",
                        "doctor": "Dr. Khan",
                        "cures": "Rest",
                        "userName": user
                    }),
                ),
            );
        }
        for (i, user, condition) in [(1, "ali", "depressed"), (2, "zara", "normal")] {
            store.insert(
                collections::MENTAL_HEALTH,
                doc(
                    &format!("m{}", i),
                    json!({ "date": days_ago(i), "condition": condition, "userName": user }),
                ),
            );
        }
        store.insert(
            collections::MEDICAL_BOT,
            doc(
                "b1",
                json!({ "date": days_ago(2), "categoryQuestion": "symptoms", "userName": "ali" }),
            ),
        );
        store.insert(
            collections::FEEDBACK,
            doc(
                "f1",
                json!({ "date": days_ago(1), "message": "great tool", "name": "ali", "email": "ali@x.pk" }),
            ),
        );
        store.insert(
            collections::USER_LOGINS,
            doc("l1", json!({ "timestamp": days_ago(1), "userId": "u1", "feature": "Login" })),
        );
        store.insert(
            collections::USER_LOGINS,
            doc("l2", json!({ "timestamp": days_ago(2), "userId": "u2", "feature": "Prediction" })),
        );
        store.insert(
            collections::COUNTERS,
            doc(collections::DISEASE_PREDICTIONS, json!({ "count": 4 })),
        );
        store.insert(
            collections::COUNTERS,
            doc(collections::MEDICAL_BOT, json!({ "count": 1 })),
        );
        store
    }

    #[tokio::test]
    async fn default_request_produces_full_shape() {
        let aggregator = StatsAggregator::new(Arc::new(seeded()), settings());
        let response = aggregator.run(StatsRequest::default_window()).await.unwrap();

        assert_eq!(response.basic_stats.total_users, 3);
        assert_eq!(response.basic_stats.disease_predictions, 4);
        assert_eq!(response.basic_stats.active_week, 2);
        assert_eq!(response.basic_stats.feedbacks, 1);
        assert!(response.basic_stats.retention_rate > 0.0);

        assert_eq!(response.analytics.disease_records.len(), 4);
        assert_eq!(response.analytics.disease_categories[0].name, "Flu");
        assert_eq!(response.analytics.mental_health_distribution.len(), 5);
        assert_eq!(response.analytics.feedback_sentiment.len(), 3);
        assert_eq!(response.analytics.user_growth.len(), 3);

        assert_eq!(response.recent_activity.recent_logs.len(), 2);
        assert_eq!(response.recent_activity.recent_logs[0].email, "ali@x.pk");
        assert_eq!(response.recent_activity.recent_disease_predictions.len(), 4);
        assert_eq!(response.recent_activity.feedback.len(), 1);
    }

    #[tokio::test]
    async fn aggregation_is_idempotent() {
        let aggregator = StatsAggregator::new(Arc::new(seeded()), settings());
        let first = aggregator.run(StatsRequest::default_window()).await.unwrap();
        let second = aggregator.run(StatsRequest::default_window()).await.unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn filtered_window_excludes_outside_records() {
        let store = seeded();
        store.insert(
            collections::DISEASE_PREDICTIONS,
            doc(
                "old",
                json!({ "date": "2020-01-01T00:00:00Z", "disease": "Flu", "userName": "ali" }),
            ),
        );
        let aggregator = StatsAggregator::new(Arc::new(store), settings());
        let request = StatsRequest {
            start_date: Some(days_ago(7)),
            end_date: Some(days_ago(0)),
            gender: None,
            filtered: true,
        };
        let response = aggregator.run(request).await.unwrap();
        assert_eq!(response.analytics.disease_records.len(), 4);
        let bucket_total: u64 = response
            .analytics
            .disease_trends
            .iter()
            .map(|d| d.count)
            .sum();
        assert_eq!(bucket_total, 4);
    }

    #[tokio::test]
    async fn gender_filter_restricts_via_registrations() {
        let aggregator = StatsAggregator::new(Arc::new(seeded()), settings());
        let request = StatsRequest {
            start_date: None,
            end_date: None,
            gender: Some("Female".into()),
            filtered: true,
        };
        let response = aggregator.run(request).await.unwrap();
        assert_eq!(response.analytics.disease_records.len(), 1);
        assert_eq!(response.analytics.disease_categories[0].name, "Asthma");
    }

    #[tokio::test]
    async fn invalid_gender_is_rejected_before_store_access() {
        let aggregator = StatsAggregator::new(Arc::new(MemoryStore::new()), settings());
        let request = StatsRequest {
            gender: Some("other".into()),
            filtered: true,
            ..Default::default()
        };
        assert!(matches!(
            aggregator.run(request).await,
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn inverted_window_is_rejected() {
        let aggregator = StatsAggregator::new(Arc::new(MemoryStore::new()), settings());
        let request = StatsRequest {
            start_date: Some("2025-06-30T00:00:00Z".into()),
            end_date: Some("2025-06-01T00:00:00Z".into()),
            gender: None,
            filtered: true,
        };
        assert!(matches!(
            aggregator.run(request).await,
            Err(ApiError::InvalidRequest(_))
        ));
    }

    /// Store wrapper that fails every query against one collection.
    struct FailingCollection {
        inner: MemoryStore,
        collection: &'static str,
    }

    #[async_trait]
    impl DocumentStore for FailingCollection {
        async fn query(&self, query: &CollectionQuery) -> Result<Vec<Document>, StoreError> {
            if query.collection == self.collection {
                return Err(StoreError::Unavailable("injected failure".into()));
            }
            self.inner.query(query).await
        }

        async fn fetch(
            &self,
            collection: &str,
            doc_id: &str,
        ) -> Result<Option<Document>, StoreError> {
            if collection == self.collection {
                return Err(StoreError::Unavailable("injected failure".into()));
            }
            self.inner.fetch(collection, doc_id).await
        }
    }

    #[tokio::test]
    async fn one_failing_dataset_does_not_take_down_the_rest() {
        let store = FailingCollection {
            inner: seeded(),
            collection: collections::MENTAL_HEALTH,
        };
        let aggregator = StatsAggregator::new(Arc::new(store), settings());
        let response = aggregator.run(StatsRequest::default_window()).await.unwrap();

        // Mental health is zero-shaped but structurally complete
        assert!(response.analytics.mental_health_trends.is_empty());
        assert_eq!(response.analytics.mental_health_distribution.len(), 5);
        assert!(response
            .analytics
            .mental_health_distribution
            .iter()
            .all(|d| d.value == 0));

        // Everything else is fully populated
        assert_eq!(response.analytics.disease_records.len(), 4);
        assert!(!response.analytics.user_growth.is_empty());
        assert_eq!(response.basic_stats.total_users, 3);
    }
}
