//! space-traveling: Space Traveling blog post pages from a Prismic repository
//!
//! Posts are fetched from the content repository, shaped into view models
//! (formatted date, reading time, HTML sections) and rendered with
//! embedded Tera templates, either ahead of time or on first request.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod page;
pub mod prismic;
pub mod server;
pub mod store;
pub mod templates;
pub mod view;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::generator::Generator;
use crate::prismic::{ContentSource, PrismicClient};

/// The main application
#[derive(Clone)]
pub struct SpaceTraveling {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl SpaceTraveling {
    /// Create a new instance from a directory
    ///
    /// Reads `_config.yml` when present and applies `PRISMIC_*` environment
    /// overrides.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Client for the configured repository
    pub fn source(&self) -> Result<Arc<dyn ContentSource>> {
        self.config.validate()?;
        Ok(Arc::new(PrismicClient::new(self.config.prismic.clone())?))
    }

    /// Generator backed by the configured repository
    pub fn generator(&self) -> Result<Generator> {
        Generator::new(&self.config, self.source()?)
    }

    /// Write every known post to the public directory
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
