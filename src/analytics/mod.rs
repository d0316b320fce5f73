//! Analytics aggregation core
//!
//! Everything needed by the `/admin/stats` endpoint: cursor-paged
//! collection scans, date normalization into a fixed reporting zone,
//! a generic single-pass bucketing engine, ranking/distribution
//! post-processing, and the orchestrator that merges five independent
//! dataset aggregations into one fixed-shape response.

pub mod dates;
pub mod datasets;
pub mod engine;
pub mod rank;
pub mod reader;
pub mod sentiment;
pub mod stats;
pub mod users;

use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use chrono_tz::Tz;

use crate::error::ApiError;

/// Logical collection names in the document store.
pub mod collections {
    pub const USERS: &str = "users";
    pub const USER_LOGINS: &str = "user_logins";
    pub const REGISTRATIONS: &str = "registrations";
    pub const DISEASE_PREDICTIONS: &str = "disease_predictions";
    pub const MENTAL_HEALTH: &str = "mental_health_assessments";
    pub const MEDICAL_BOT: &str = "medical_bot_interactions";
    pub const FEEDBACK: &str = "feedback";
    pub const COUNTERS: &str = "counters";
}

/// Gender filter for analytics requests. Stored profile values are
/// canonical lowercase; normalization happens here, not per dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    All,
    Male,
    Female,
}

impl Gender {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }

    /// Canonical stored value, `None` for `All` (no filtering).
    pub fn stored_value(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Male => Some("male"),
            Self::Female => Some("female"),
        }
    }
}

/// Closed time window over UTC instants. `start <= end` is a request
/// validation invariant, never a silent empty result.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn trailing_days(days: i64) -> Self {
        let end = Utc::now();
        Self {
            start: end - ChronoDuration::days(days),
            end,
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.start > self.end {
            return Err(ApiError::InvalidRequest(
                "start_date cannot be after end_date".into(),
            ));
        }
        Ok(())
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Bound value for server-side range filters on date fields.
    pub fn start_bound(&self) -> serde_json::Value {
        serde_json::Value::String(self.start.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }

    pub fn end_bound(&self) -> serde_json::Value {
        serde_json::Value::String(self.end.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }
}

/// Request-independent analytics settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct AnalyticsSettings {
    /// Fixed reporting zone every date buckets into.
    pub tz: Tz,
    pub page_size: usize,
    pub default_window_days: i64,
    pub recent_limit: usize,
    /// Per-request budget, checked between page fetches.
    pub deadline: Duration,
}
