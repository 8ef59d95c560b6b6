use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::debug;

use entity::event_config;

use crate::error::RsvpError;

/// Primary key of the settings row in `event_config`.
pub const EVENT_CONFIG_ID: &str = "event";

/// Event details used to render guest and host mail.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventConfig {
    pub title: String,
    pub date: String,
    pub location: String,
    pub host_email: String,
    pub app_base_url: String,
}

impl EventConfig {
    /// Build from environment-style lookups (`EVENT_TITLE`, `EVENT_DATE`, `EVENT_LOCATION`,
    /// `HOST_EMAIL`, `APP_BASE_URL`).
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            title: lookup("EVENT_TITLE").unwrap_or_else(|| "Event".to_string()),
            date: lookup("EVENT_DATE").unwrap_or_default(),
            location: lookup("EVENT_LOCATION").unwrap_or_default(),
            host_email: lookup("HOST_EMAIL").unwrap_or_default(),
            app_base_url: lookup("APP_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_default(),
        }
    }

    /// Prefer the stored settings row; fall back to `fallback` when it is missing.
    pub async fn load(db: &DatabaseConnection, fallback: EventConfig) -> Result<Self, RsvpError> {
        match event_config::Entity::find_by_id(EVENT_CONFIG_ID.to_string())
            .one(db)
            .await?
        {
            Some(row) => Ok(row.into()),
            None => {
                debug!("no stored event settings, using environment");
                Ok(fallback)
            }
        }
    }
}

impl From<event_config::Model> for EventConfig {
    fn from(row: event_config::Model) -> Self {
        Self {
            title: row.title,
            date: row.date,
            location: row.location,
            host_email: row.host_email,
            app_base_url: row.app_base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Trim and strip one layer of matching quotes, as dashboards tend to add them.
pub fn normalize_env_value(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(inner) = trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return inner.trim().to_string();
    }
    if let Some(inner) = trimmed.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return inner.trim().to_string();
    }

    trimmed.to_string()
}
