//! Site configuration (_config.yml)

use anyhow::Result;
use chrono::Locale;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `prismic.endpoint`
pub const ENDPOINT_ENV: &str = "PRISMIC_API_ENDPOINT";

/// Environment variable overriding `prismic.access_token`
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Largest page size the search API accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("prismic.endpoint must not be empty (set it in _config.yml or PRISMIC_API_ENDPOINT)")]
    MissingEndpoint,

    #[error("prismic.document_type must not be empty")]
    MissingDocumentType,

    #[error("reading.words_per_minute must be at least 1")]
    ZeroReadingSpeed,

    #[error("prismic.page_size must be between 1 and 100, got {0}")]
    InvalidPageSize(u32),

    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,
    pub timezone: String,

    // Rendering
    pub date_format: String,
    pub loading_text: String,
    pub not_found_text: String,
    #[serde(default)]
    pub reading: ReadingConfig,

    // Generation
    pub public_dir: String,
    pub revalidate_secs: u64,

    // Content repository
    #[serde(default)]
    pub prismic: PrismicConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Space Traveling".to_string(),
            language: "pt-BR".to_string(),
            timezone: String::new(),

            date_format: "d MMM yyyy".to_string(),
            loading_text: "Carregando...".to_string(),
            not_found_text: "Post não encontrado".to_string(),
            reading: ReadingConfig::default(),

            public_dir: "public".to_string(),
            revalidate_secs: 60 * 30,

            prismic: PrismicConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `PRISMIC_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            tracing::debug!("Using Prismic endpoint from {}", ENDPOINT_ENV);
            self.prismic.endpoint = endpoint;
        }
        if let Some(token) = lookup(ACCESS_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.prismic.access_token = Some(token);
        }
    }

    /// Check that the configuration can drive a render
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prismic.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        if self.prismic.document_type.trim().is_empty() {
            return Err(ConfigError::MissingDocumentType);
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.prismic.page_size) {
            return Err(ConfigError::InvalidPageSize(self.prismic.page_size));
        }
        if self.reading.words_per_minute == 0 {
            return Err(ConfigError::ZeroReadingSpeed);
        }
        self.timezone()?;
        self.locale()?;
        Ok(())
    }

    /// Timezone publication dates are shown in; `None` means UTC
    pub fn timezone(&self) -> Result<Option<Tz>, ConfigError> {
        if self.timezone.is_empty() {
            return Ok(None);
        }
        self.timezone
            .parse::<Tz>()
            .map(Some)
            .map_err(|_| ConfigError::UnknownTimezone(self.timezone.clone()))
    }

    /// Locale used for month names in publication dates
    pub fn locale(&self) -> Result<Locale, ConfigError> {
        let locale = match self.language.replace('_', "-").to_ascii_lowercase().as_str() {
            "pt-br" | "pt" => Locale::pt_BR,
            "pt-pt" => Locale::pt_PT,
            "en" | "en-us" => Locale::en_US,
            "en-gb" => Locale::en_GB,
            "es" | "es-es" => Locale::es_ES,
            "fr" | "fr-fr" => Locale::fr_FR,
            "de" | "de-de" => Locale::de_DE,
            "it" | "it-it" => Locale::it_IT,
            _ => return Err(ConfigError::UnsupportedLanguage(self.language.clone())),
        };
        Ok(locale)
    }

    /// How long a generated page stays fresh
    pub fn revalidate_after(&self) -> Duration {
        Duration::from_secs(self.revalidate_secs)
    }
}

/// Prismic repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismicConfig {
    /// API entry point, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub access_token: Option<String>,
    pub document_type: String,
    pub page_size: u32,
}

impl Default for PrismicConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_token: None,
            document_type: "post".to_string(),
            page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Reading time estimation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub words_per_minute: u64,
    pub mode: ReadingMode,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            mode: ReadingMode::Split,
        }
    }
}

/// Token counting strategy for reading time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingMode {
    /// Count every piece produced by splitting on non-word characters,
    /// empty pieces included
    #[default]
    Split,
    /// Count only non-empty words
    Words,
}
