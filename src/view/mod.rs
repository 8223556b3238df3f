//! View models - display-ready shapes derived from post documents

mod date;
mod reading;

use chrono::Locale;
use chrono_tz::Tz;
use serde::Serialize;

use crate::config::{ConfigError, ReadingConfig, SiteConfig};
use crate::content::{richtext, RawPost};

pub use date::format_date;
pub use reading::{count_tokens, estimate_reading_minutes, estimate_reading_time, ReadingTime};

/// Settings that shape a view model
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub locale: Locale,
    pub timezone: Option<Tz>,
    pub date_format: String,
    pub reading: ReadingConfig,
}

impl ViewSettings {
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            locale: config.locale()?,
            timezone: config.timezone()?,
            date_format: config.date_format.clone(),
            reading: config.reading.clone(),
        })
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            locale: Locale::pt_BR,
            timezone: None,
            date_format: "d MMM yyyy".to_string(),
            reading: ReadingConfig::default(),
        }
    }
}

/// A post ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct ViewPost {
    pub first_publication_date: Option<String>,
    pub title: String,
    pub banner_url: Option<String>,
    pub author: String,
    pub reading_time: String,
    pub sections: Vec<ViewSection>,
}

/// A content section with its body rendered to HTML
#[derive(Debug, Clone, Serialize)]
pub struct ViewSection {
    pub heading: String,
    pub body_html: String,
}

/// Derive the display shape of a post
pub fn build_view_model(raw: &RawPost, settings: &ViewSettings) -> ViewPost {
    let first_publication_date = raw
        .first_publication_date
        .as_ref()
        .map(|date| format_date(date, settings.timezone, &settings.date_format, settings.locale));

    let sections = raw
        .data
        .content
        .iter()
        .map(|section| ViewSection {
            heading: section.heading.clone(),
            body_html: richtext::as_html(&section.body),
        })
        .collect();

    ViewPost {
        first_publication_date,
        title: raw.data.title.clone(),
        banner_url: raw.banner_url().map(str::to_string),
        author: raw.data.author.clone(),
        reading_time: estimate_reading_time(raw, &settings.reading).to_string(),
        sections,
    }
}
