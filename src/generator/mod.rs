//! Generator module - turns repository documents into post pages
//!
//! Pre-declared posts are rendered ahead of time; any other identifier is
//! resolved on its first request and retained like the rest. Retained
//! pages are regenerated in the background once stale.

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::page::{self, PageRenderer, PageState};
use crate::prismic::ContentSource;
use crate::store::{Lookup, PageStore};
use crate::view::ViewSettings;

/// A page ready to be sent to a client
#[derive(Debug, Clone)]
pub struct ServedPage {
    pub status: u16,
    pub html: String,
}

/// Page generator backed by a content source
pub struct Generator {
    source: Arc<dyn ContentSource>,
    settings: ViewSettings,
    renderer: PageRenderer,
    store: PageStore,
}

impl Generator {
    /// Create a new generator
    pub fn new(config: &SiteConfig, source: Arc<dyn ContentSource>) -> Result<Self> {
        Ok(Self {
            source,
            settings: ViewSettings::from_config(config)?,
            renderer: PageRenderer::new(config)?,
            store: PageStore::new(config.revalidate_after()),
        })
    }

    pub fn store(&self) -> &PageStore {
        &self.store
    }

    pub fn renderer(&self) -> &PageRenderer {
        &self.renderer
    }

    /// Resolve and render one post without touching the store
    pub async fn render(&self, uid: &str) -> Result<(PageState, String)> {
        let state = page::resolve(self.source.as_ref(), uid, &self.settings).await?;
        let html = self.renderer.render(&state)?;
        Ok((state, html))
    }

    /// Declare every known post and render it into the store
    ///
    /// Returns the number of pages generated.
    pub async fn prebuild(&self) -> Result<usize> {
        let uids = self.source.list_known_identifiers().await?;
        self.store.declare(uids.iter().cloned()).await;

        let mut generated = 0;
        for uid in &uids {
            let (state, html) = self.render(uid).await?;
            if state.is_ready() {
                self.store.insert(uid, html).await;
                generated += 1;
            } else {
                tracing::warn!("Declared post {} could not be found", uid);
            }
        }

        tracing::info!("Pre-rendered {} of {} posts", generated, uids.len());
        Ok(generated)
    }

    /// Serve a post page, generating it on first request
    pub async fn serve(self: &Arc<Self>, uid: &str) -> Result<ServedPage> {
        match self.store.lookup(uid).await {
            Lookup::Fresh(page) => {
                return Ok(ServedPage {
                    status: 200,
                    html: page.html,
                })
            }
            Lookup::Stale(page) => {
                self.spawn_regeneration(uid);
                return Ok(ServedPage {
                    status: 200,
                    html: page.html,
                });
            }
            Lookup::Missing => {}
        }

        let known = self.store.known().await;
        let resolution =
            page::resolve_request(self.source.as_ref(), &known, uid, &self.settings).await?;
        let html = self.renderer.render(&resolution.state)?;

        if resolution.state.is_ready() {
            if resolution.via_fallback {
                tracing::info!("Generated {} on first request", uid);
            }
            self.store.insert(uid, html.clone()).await;
        }

        Ok(ServedPage {
            status: resolution.state.status_code(),
            html,
        })
    }

    /// Regenerate a stale page in the background; the old page stays
    /// in place if regeneration fails
    fn spawn_regeneration(self: &Arc<Self>, uid: &str) {
        if !self.store.begin_regeneration(uid) {
            return;
        }

        let claim = RegenerationClaim {
            generator: Arc::clone(self),
            uid: uid.to_string(),
        };
        tokio::spawn(async move {
            let generator = &claim.generator;
            let uid = &claim.uid;
            match generator.render(uid).await {
                Ok((state, html)) if state.is_ready() => {
                    generator.store.insert(uid, html).await;
                    tracing::debug!("Regenerated {}", uid);
                }
                Ok(_) => {
                    generator.store.remove(uid).await;
                    tracing::info!("Post {} no longer exists, dropped", uid);
                }
                Err(e) => {
                    tracing::error!("Regenerating {} failed: {:#}", uid, e);
                }
            }
        });
    }

    /// Write every known post to `<public_dir>/post/<uid>/index.html`
    ///
    /// Returns the written paths.
    pub async fn write_static(&self, public_dir: &Path) -> Result<Vec<PathBuf>> {
        let uids = self.source.list_known_identifiers().await?;
        let mut written = Vec::with_capacity(uids.len());

        for uid in &uids {
            let (state, html) = self.render(uid).await?;
            if !state.is_ready() {
                tracing::warn!("Declared post {} could not be found", uid);
                continue;
            }

            let Some(output_path) = post_output_path(public_dir, uid) else {
                tracing::warn!("Skipping post with unsafe identifier {:?}", uid);
                continue;
            };
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create dir {:?}", parent))?;
            }
            fs::write(&output_path, &html)
                .with_context(|| format!("Failed to write {:?}", output_path))?;
            tracing::debug!("Generated post: {:?}", output_path);
            written.push(output_path);
        }

        Ok(written)
    }
}

/// Running regeneration of one page; released on drop, even if the task
/// panics
struct RegenerationClaim {
    generator: Arc<Generator>,
    uid: String,
}

impl Drop for RegenerationClaim {
    fn drop(&mut self) {
        self.generator.store.finish_regeneration(&self.uid);
    }
}

/// Output path of a post page
///
/// `None` when `uid` is not a single plain path segment.
pub fn post_output_path(public_dir: &Path, uid: &str) -> Option<PathBuf> {
    let unsafe_uid = uid.is_empty()
        || uid == "."
        || uid == ".."
        || uid.contains(['/', '\\'])
        || uid.contains('\0');
    if unsafe_uid {
        return None;
    }
    Some(public_dir.join("post").join(uid).join("index.html"))
}
