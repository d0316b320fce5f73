//! Dataset aggregations
//!
//! Five independent analytics computations, each a configuration of the
//! generic engine rather than its own hand-written scan loop. Every
//! dataset produces a disjoint section of the final response; isolation
//! and zero-filling on failure are handled by the orchestrator.

use std::sync::Arc;
use std::time::Instant;

use chrono_tz::Tz;
use serde::Serialize;
use serde_json::{Map, Value};

use super::collections;
use super::dates;
use super::engine::{AggregationEngine, Extractor, Tally};
use super::rank::{day_series, distribution, full_set, ranked, top_n, CategoryCount, DayCount, LabelValue};
use super::reader::PagedCollectionReader;
use super::sentiment::{self, SENTIMENT_KEYS};
use super::users::UserFilterIndex;
use super::TimeWindow;
use crate::store::{CollectionQuery, Document, FilterOp, SharedStore, StoreError};

const DISEASE_COLUMNS: &[&str] = &[
    "date",
    "cures",
    "doctor",
    "disease",
    "userName",
    "riskLevel",
    "inputDescription",
    "serialNo",
];
const MENTAL_COLUMNS: &[&str] = &["userName", "date", "userMessage", "botResponse", "serialNo"];
const BOT_COLUMNS: &[&str] = &[
    "userName",
    "date",
    "userMessage",
    "botResponse",
    "serialNo",
    "categoryQuestion",
];
const FEEDBACK_COLUMNS: &[&str] = &["name", "date", "message", "email"];

const DISEASE_TOP_N: usize = 10;

pub const MENTAL_DISTRIBUTION_KEYS: &[&str] =
    &["Suicidal", "Depressed", "Anxiety", "Normal", "Other"];

/// Question categories the medical bot is allowed to report on; anything
/// else is noise from free-form writers and stays out of the tally.
const VALID_BOT_CATEGORIES: &[&str] = &[
    "susceptibility",
    "symptoms",
    "exams and tests",
    "treatment",
    "prevention",
    "information",
    "frequency",
    "complications",
    "causes",
    "research",
    "outlook",
    "considerations",
    "inheritance",
    "stages",
    "genetic changes",
    "support groups",
];

/// Request-scoped inputs shared by all dataset aggregations.
#[derive(Clone)]
pub struct AnalyticsContext {
    pub store: SharedStore,
    pub tz: Tz,
    pub page_size: usize,
    pub deadline: Option<Instant>,
    pub window: TimeWindow,
    /// POST-style request: caller supplied the window explicitly.
    pub filtered: bool,
    pub user_index: Option<Arc<UserFilterIndex>>,
}

impl AnalyticsContext {
    pub fn reader(&self, query: CollectionQuery) -> PagedCollectionReader<'_> {
        let mut reader = PagedCollectionReader::new(self.store.as_ref(), query);
        if let Some(deadline) = self.deadline {
            reader = reader.with_deadline(deadline);
        }
        reader
    }

    fn windowed(&self, query: CollectionQuery, date_field: &str) -> CollectionQuery {
        query
            .filter(date_field, FilterOp::Gte, self.window.start_bound())
            .filter(date_field, FilterOp::Lte, self.window.end_bound())
    }

    fn membership_predicate(&self) -> Option<impl Fn(&Document) -> bool + Send + Sync + 'static> {
        self.user_index.clone().map(|index| {
            move |doc: &Document| {
                doc.get_str("userName")
                    .map(|name| index.contains(name))
                    .unwrap_or(false)
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct DiseaseSection {
    pub trends: Vec<DayCount>,
    pub categories: Vec<CategoryCount>,
    pub risk_levels: Vec<CategoryCount>,
    pub doctors: Vec<CategoryCount>,
    pub cures: Vec<CategoryCount>,
    pub records: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MentalSection {
    pub trends: Vec<DayCount>,
    pub distribution: Vec<LabelValue>,
    pub records: Vec<Map<String, Value>>,
}

impl Default for MentalSection {
    fn default() -> Self {
        Self {
            trends: Vec::new(),
            distribution: distribution(&Tally::new(), MENTAL_DISTRIBUTION_KEYS),
            records: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct BotSection {
    pub trends: Vec<DayCount>,
    pub categories: Vec<CategoryCount>,
    pub records: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct UserSection {
    pub growth: Vec<DayCount>,
    pub activity: Vec<DayCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackSection {
    pub sentiment: Vec<CategoryCount>,
    pub records: Vec<Map<String, Value>>,
}

impl Default for FeedbackSection {
    fn default() -> Self {
        Self {
            sentiment: sentiment_output(&Tally::new()),
            records: Vec::new(),
        }
    }
}

/// Disease predictions: daily trend, top diseases, and the full risk,
/// doctor, and cure breakdowns. The window is applied server-side; the
/// gender filter is a membership predicate against the user index.
pub async fn disease(ctx: &AnalyticsContext) -> Result<DiseaseSection, StoreError> {
    let query = ctx.windowed(
        CollectionQuery::new(collections::DISEASE_PREDICTIONS, "date").with_limit(ctx.page_size),
        "date",
    );

    let mut engine = AggregationEngine::new(DISEASE_COLUMNS)
        .extractor(Extractor::day("trends", "date", ctx.tz))
        .extractor(Extractor::field("categories", "disease", Some("Unknown")))
        .extractor(Extractor::field("risk_levels", "riskLevel", Some("High")))
        .extractor(Extractor::field("doctors", "doctor", Some("Not Prescribed")))
        .extractor(Extractor::field("cures", "cures", Some("Not Prescribed")));
    if let Some(predicate) = ctx.membership_predicate() {
        engine = engine.predicate(predicate);
    }

    let mut reader = ctx.reader(query);
    let output = engine.run(&mut reader).await?;

    Ok(DiseaseSection {
        trends: day_series(&output.tally("trends")),
        categories: top_n(&output.tally("categories"), DISEASE_TOP_N),
        risk_levels: full_set(&output.tally("risk_levels")),
        doctors: full_set(&output.tally("doctors")),
        cures: full_set(&output.tally("cures")),
        records: output.rows,
    })
}

fn condition_bucket(condition: &str) -> &'static str {
    let condition = condition.to_lowercase();
    if condition.contains("suicid") {
        "Suicidal"
    } else if condition.contains("depress") {
        "Depressed"
    } else if condition.contains("anxi") {
        "Anxiety"
    } else if condition.contains("normal") {
        "Normal"
    } else {
        "Other"
    }
}

/// Mental-health assessments: daily trend plus the fixed condition
/// distribution. The window is pushed to the store only for filtered
/// requests; unfiltered reads take the whole collection.
pub async fn mental_health(ctx: &AnalyticsContext) -> Result<MentalSection, StoreError> {
    let mut query =
        CollectionQuery::new(collections::MENTAL_HEALTH, "date").with_limit(ctx.page_size);
    if ctx.filtered {
        query = ctx.windowed(query, "date");
    }

    let mut engine = AggregationEngine::new(MENTAL_COLUMNS)
        .extractor(Extractor::day("trends", "date", ctx.tz))
        .extractor(Extractor::new("distribution", |doc| {
            Some(condition_bucket(doc.get_str("condition").unwrap_or("")).to_string())
        }));
    if let Some(predicate) = ctx.membership_predicate() {
        engine = engine.predicate(predicate);
    }

    let mut reader = ctx.reader(query);
    let output = engine.run(&mut reader).await?;

    Ok(MentalSection {
        trends: day_series(&output.tally("trends")),
        distribution: distribution(&output.tally("distribution"), MENTAL_DISTRIBUTION_KEYS),
        records: output.rows,
    })
}

/// Medical-bot interactions: daily trend and valid question categories.
/// This collection has no server-side date index, so for filtered
/// requests the window is enforced in-pass on the normalized instant.
pub async fn medical_bot(ctx: &AnalyticsContext) -> Result<BotSection, StoreError> {
    let query = CollectionQuery::new(collections::MEDICAL_BOT, "date").with_limit(ctx.page_size);

    let index = ctx.user_index.clone();
    let window = ctx.window;
    let filtered = ctx.filtered;
    let engine = AggregationEngine::new(BOT_COLUMNS)
        .extractor(Extractor::day("trends", "date", ctx.tz))
        .extractor(Extractor::new("categories", |doc| {
            doc.get_str("categoryQuestion")
                .map(str::to_lowercase)
                .filter(|category| VALID_BOT_CATEGORIES.contains(&category.as_str()))
        }))
        .predicate(move |doc| {
            if filtered {
                match dates::instant_from_value(doc.get("date").unwrap_or(&Value::Null)) {
                    Some(instant) if window.contains(instant) => {}
                    _ => return false,
                }
            }
            match &index {
                Some(index) => doc
                    .get_str("userName")
                    .map(|name| index.contains(name))
                    .unwrap_or(false),
                None => true,
            }
        });

    let mut reader = ctx.reader(query);
    let output = engine.run(&mut reader).await?;

    Ok(BotSection {
        trends: day_series(&output.tally("trends")),
        categories: ranked(&output.tally("categories")),
        records: output.rows,
    })
}

async fn day_tally(
    ctx: &AnalyticsContext,
    collection: &str,
    date_field: &str,
) -> Result<Tally, StoreError> {
    let query = ctx.windowed(
        CollectionQuery::new(collection, date_field).with_limit(ctx.page_size),
        date_field,
    );
    let mut reader = ctx.reader(query);
    let mut tally = Tally::new();
    while let Some(batch) = reader.next_batch().await? {
        for doc in &batch {
            if let Some(day) = dates::day_key(doc.get(date_field).unwrap_or(&Value::Null), ctx.tz)
            {
                *tally.entry(day).or_insert(0) += 1;
            }
        }
    }
    Ok(tally)
}

/// User growth (daily signups) and activity (daily logins), both
/// windowed server-side. The gender filter does not apply here; these
/// series describe the whole user base.
pub async fn user_growth_activity(ctx: &AnalyticsContext) -> Result<UserSection, StoreError> {
    let growth = day_tally(ctx, collections::USERS, "createdAt").await?;
    let activity = day_tally(ctx, collections::USER_LOGINS, "timestamp").await?;
    Ok(UserSection {
        growth: day_series(&growth),
        activity: day_series(&activity),
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Complete sentiment set (every key present, zero-filled), presented
/// count-descending with capitalized labels.
fn sentiment_output(tally: &Tally) -> Vec<CategoryCount> {
    let mut entries: Vec<CategoryCount> = distribution(tally, SENTIMENT_KEYS)
        .into_iter()
        .map(|entry| CategoryCount {
            name: capitalize(&entry.label),
            count: entry.value,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    entries
}

/// Feedback sentiment over the whole collection. Deliberately
/// unfiltered: the sentiment chart always reflects all feedback.
pub async fn feedback(ctx: &AnalyticsContext) -> Result<FeedbackSection, StoreError> {
    let query = CollectionQuery::new(collections::FEEDBACK, "date").with_limit(ctx.page_size);
    let engine = AggregationEngine::new(FEEDBACK_COLUMNS)
        .extractor(Extractor::new("sentiment", sentiment::sentiment_bucket));

    let mut reader = ctx.reader(query);
    let output = engine.run(&mut reader).await?;

    Ok(FeedbackSection {
        sentiment: sentiment_output(&output.tally("sentiment")),
        records: output.rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Gender;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    const KARACHI: Tz = chrono_tz::Asia::Karachi;

    fn doc(id: &str, fields: Value) -> Document {
        Document::new(id, fields.as_object().cloned().unwrap_or_default())
    }

    fn window_june() -> TimeWindow {
        TimeWindow {
            start: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap(),
        }
    }

    fn ctx(store: MemoryStore, filtered: bool) -> AnalyticsContext {
        AnalyticsContext {
            store: Arc::new(store),
            tz: KARACHI,
            page_size: 3,
            deadline: None,
            window: window_june(),
            filtered,
            user_index: None,
        }
    }

    #[tokio::test]
    async fn disease_ranks_categories_and_keeps_window() {
        let store = MemoryStore::new();
        for (id, date, disease) in [
            ("d1", "2025-06-02T10:00:00Z", "Flu"),
            ("d2", "2025-06-02T11:00:00Z", "Flu"),
            ("d3", "2025-06-03T10:00:00Z", "Asthma"),
            ("d4", "2025-05-01T10:00:00Z", "Flu"), // outside window
        ] {
            store.insert(
                collections::DISEASE_PREDICTIONS,
                doc(id, json!({ "date": date, "disease": disease, "userName": "ali" })),
            );
        }

        let section = disease(&ctx(store, true)).await.unwrap();
        assert_eq!(section.records.len(), 3);
        assert_eq!(section.categories[0].name, "Flu");
        assert_eq!(section.categories[0].count, 2);
        let total: u64 = section.trends.iter().map(|d| d.count).sum();
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn disease_gender_filter_uses_membership_index() {
        let store = MemoryStore::new();
        store.insert(
            collections::REGISTRATIONS,
            doc("r1", json!({ "name": "ali", "gender": "male" })),
        );
        store.insert(
            collections::DISEASE_PREDICTIONS,
            doc("d1", json!({ "date": "2025-06-02T10:00:00Z", "disease": "Flu", "userName": "ali" })),
        );
        store.insert(
            collections::DISEASE_PREDICTIONS,
            doc("d2", json!({ "date": "2025-06-02T10:00:00Z", "disease": "Flu", "userName": "zara" })),
        );

        let index = UserFilterIndex::build(&store, Gender::Male, 500, None)
            .await
            .unwrap();
        let mut context = ctx(store, true);
        context.user_index = Some(Arc::new(index));

        let section = disease(&context).await.unwrap();
        assert_eq!(section.records.len(), 1);
        assert_eq!(section.categories[0].count, 1);
    }

    #[tokio::test]
    async fn mental_distribution_is_always_complete() {
        let store = MemoryStore::new();
        store.insert(
            collections::MENTAL_HEALTH,
            doc("m1", json!({ "date": "2025-06-02T10:00:00Z", "condition": "Feeling depressed lately", "userName": "ali" })),
        );
        // No usable date: must still count toward the distribution
        store.insert(
            collections::MENTAL_HEALTH,
            doc("m2", json!({ "condition": "anxiety attack", "userName": "ali" })),
        );

        let section = mental_health(&ctx(store, false)).await.unwrap();
        assert_eq!(section.distribution.len(), MENTAL_DISTRIBUTION_KEYS.len());
        let get = |label: &str| {
            section
                .distribution
                .iter()
                .find(|d| d.label == label)
                .map(|d| d.value)
        };
        assert_eq!(get("Depressed"), Some(1));
        assert_eq!(get("Anxiety"), Some(1));
        assert_eq!(get("Suicidal"), Some(0));
        let trend_total: u64 = section.trends.iter().map(|d| d.count).sum();
        assert_eq!(trend_total, 1);
        assert_eq!(section.records.len(), 2);
    }

    #[tokio::test]
    async fn medical_bot_enforces_window_in_pass() {
        let store = MemoryStore::new();
        for (id, date, category) in [
            ("b1", "2025-06-02T10:00:00Z", "symptoms"),
            ("b2", "2025-06-03T10:00:00Z", "treatment"),
            ("b3", "2025-07-09T10:00:00Z", "symptoms"), // outside window
            ("b4", "2025-06-04T10:00:00Z", "smalltalk"), // invalid category
        ] {
            store.insert(
                collections::MEDICAL_BOT,
                doc(id, json!({ "date": date, "categoryQuestion": category, "userName": "ali" })),
            );
        }

        let section = medical_bot(&ctx(store, true)).await.unwrap();
        assert_eq!(section.records.len(), 3);
        let names: Vec<_> = section.categories.iter().map(|c| c.name.as_str()).collect();
        assert!(names.contains(&"symptoms"));
        assert!(names.contains(&"treatment"));
        assert!(!names.contains(&"smalltalk"));
    }

    #[tokio::test]
    async fn feedback_sentiment_is_complete_and_sorted() {
        let store = MemoryStore::new();
        for (id, message) in [
            ("f1", "great service"),
            ("f2", "really great help"),
            ("f3", "terrible wait time"),
        ] {
            store.insert(
                collections::FEEDBACK,
                doc(id, json!({ "date": "2025-06-02T10:00:00Z", "message": message, "name": "ali", "email": "a@x.pk" })),
            );
        }

        let section = feedback(&ctx(store, false)).await.unwrap();
        assert_eq!(section.sentiment.len(), 3);
        assert_eq!(section.sentiment[0].name, "Positive");
        assert_eq!(section.sentiment[0].count, 2);
        let neutral = section
            .sentiment
            .iter()
            .find(|s| s.name == "Neutral")
            .unwrap();
        assert_eq!(neutral.count, 0);
    }

    #[tokio::test]
    async fn empty_feedback_yields_zeroed_complete_distribution() {
        let store = MemoryStore::new();
        let section = feedback(&ctx(store, false)).await.unwrap();
        assert_eq!(section.sentiment.len(), 3);
        assert!(section.sentiment.iter().all(|s| s.count == 0));
    }

    #[tokio::test]
    async fn user_series_are_daily_counts() {
        let store = MemoryStore::new();
        for (id, created) in [
            ("u1", "2025-06-02T10:00:00Z"),
            ("u2", "2025-06-02T11:00:00Z"),
            ("u3", "2025-06-05T11:00:00Z"),
        ] {
            store.insert(collections::USERS, doc(id, json!({ "createdAt": created })));
        }
        store.insert(
            collections::USER_LOGINS,
            doc("l1", json!({ "timestamp": "2025-06-03T09:00:00Z", "userId": "u1" })),
        );

        let section = user_growth_activity(&ctx(store, true)).await.unwrap();
        assert_eq!(section.growth.len(), 2);
        assert_eq!(section.growth[0].count, 2);
        assert_eq!(section.activity.len(), 1);
    }
}
