//! Configuration management

use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::analytics::AnalyticsSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub analytics: AnalyticsConfig,
    pub models: ModelsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS (the dashboard frontend).
    #[serde(default)]
    pub allowed_origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// "sqlite" or "memory" (memory is for local demos only).
    pub backend: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Reporting timezone all dates bucket into (IANA name).
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Documents fetched per page during collection scans.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Trailing window for unfiltered stats requests.
    #[serde(default = "default_window_days")]
    pub default_window_days: i64,
    /// Entries returned in recent-logins and recent-feedback lists.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Per-request scan budget in seconds, checked between page fetches.
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

fn default_timezone() -> String {
    "Asia/Karachi".to_string()
}

fn default_page_size() -> usize {
    500
}

fn default_window_days() -> i64 {
    30
}

fn default_recent_limit() -> usize {
    10
}

fn default_deadline_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    pub disease: String,
    pub mental_health: String,
    pub medical_qa: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = "config.toml";

        let builder = config::Config::builder()
            .add_source(config::File::with_name(config_path))
            .add_source(config::Environment::with_prefix("MEDBOARD").separator("__"));

        let settings = builder.build()?;
        let config: Config = settings.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Invalid server port: 0 is not allowed");
        }
        if self.server.host.is_empty() {
            anyhow::bail!("Server host cannot be empty");
        }

        if self.store.backend != "sqlite" && self.store.backend != "memory" {
            anyhow::bail!(
                "Invalid store backend '{}'. Must be 'sqlite' or 'memory'",
                self.store.backend
            );
        }
        if self.store.backend == "sqlite" && self.store.url.is_empty() {
            anyhow::bail!("Store URL cannot be empty for the sqlite backend");
        }

        if self.analytics.timezone.parse::<chrono_tz::Tz>().is_err() {
            anyhow::bail!(
                "Invalid timezone '{}'. Must be an IANA zone name",
                self.analytics.timezone
            );
        }
        if self.analytics.page_size == 0 {
            anyhow::bail!("analytics.page_size must be at least 1");
        }
        if self.analytics.default_window_days <= 0 {
            anyhow::bail!("analytics.default_window_days must be positive");
        }
        if self.analytics.deadline_secs == 0 {
            anyhow::bail!("analytics.deadline_secs must be at least 1");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid logging level '{}'. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        Ok(())
    }

    /// Resolved analytics settings. `validate` already proved the zone
    /// parses, so the fallback never fires in a loaded config.
    pub fn analytics_settings(&self) -> AnalyticsSettings {
        AnalyticsSettings {
            tz: self
                .analytics
                .timezone
                .parse()
                .unwrap_or(chrono_tz::Asia::Karachi),
            page_size: self.analytics.page_size,
            default_window_days: self.analytics.default_window_days,
            recent_limit: self.analytics.recent_limit,
            deadline: Duration::from_secs(self.analytics.deadline_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8080,
                allowed_origin: "http://localhost:3000".into(),
            },
            store: StoreConfig {
                backend: "sqlite".into(),
                url: "medboard.db".into(),
            },
            analytics: AnalyticsConfig {
                timezone: "Asia/Karachi".into(),
                page_size: 500,
                default_window_days: 30,
                recent_limit: 10,
                deadline_secs: 30,
            },
            models: ModelsConfig {
                disease: "models/disease.json".into(),
                mental_health: "models/mental_health.json".into(),
                medical_qa: "models/medical_qa.json".into(),
            },
            logging: LoggingConfig { level: "info".into() },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_unknown_backend_and_timezone() {
        let mut config = sample();
        config.store.backend = "postgres".into();
        assert!(config.validate().is_err());

        let mut config = sample();
        config.analytics.timezone = "Mars/Olympus".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_page_size() {
        let mut config = sample();
        config.analytics.page_size = 0;
        assert!(config.validate().is_err());
    }
}
