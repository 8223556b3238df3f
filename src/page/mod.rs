//! Post page lifecycle and rendering
//!
//! A requested post is in one of three states:
//!
//! - [`PageState::Fallback`]: the identifier was not generated ahead of
//!   time and is being resolved for the first time
//! - [`PageState::Ready`]: the document was found and its view model built
//! - [`PageState::NotFound`]: no document has the identifier
//!
//! Fallback always resolves into one of the other two; the pre-declared
//! identifiers only decide whether a request passes through it.

use anyhow::Result;
use std::collections::HashSet;
use tera::Context;

use crate::config::SiteConfig;
use crate::prismic::{ContentSource, FetchError};
use crate::templates::TemplateRenderer;
use crate::view::{build_view_model, ViewPost, ViewSettings};

/// Render state of a post page
#[derive(Debug, Clone)]
pub enum PageState {
    Fallback,
    Ready(ViewPost),
    NotFound,
}

impl PageState {
    /// HTTP status the state is served with
    pub fn status_code(&self) -> u16 {
        match self {
            PageState::Fallback | PageState::Ready(_) => 200,
            PageState::NotFound => 404,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PageState::Ready(_))
    }
}

/// Outcome of resolving a page request
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Whether the request entered the fallback state first
    pub via_fallback: bool,
    pub state: PageState,
}

/// State a request for `uid` starts in, `None` when it was pre-declared
pub fn entry_state(uid: &str, known: &HashSet<String>) -> Option<PageState> {
    if known.contains(uid) {
        None
    } else {
        Some(PageState::Fallback)
    }
}

/// Fetch a post and move it to `Ready` or `NotFound`
///
/// Errors other than a missing document propagate unchanged.
pub async fn resolve(
    source: &dyn ContentSource,
    uid: &str,
    settings: &ViewSettings,
) -> Result<PageState, FetchError> {
    match source.fetch_by_identifier(uid).await {
        Ok(raw) => Ok(PageState::Ready(build_view_model(&raw, settings))),
        Err(e) if e.is_not_found() => Ok(PageState::NotFound),
        Err(e) => Err(e),
    }
}

/// Resolve a request for `uid`, passing through fallback when the
/// identifier was not pre-declared
pub async fn resolve_request(
    source: &dyn ContentSource,
    known: &HashSet<String>,
    uid: &str,
    settings: &ViewSettings,
) -> Result<Resolution, FetchError> {
    let via_fallback = matches!(entry_state(uid, known), Some(PageState::Fallback));
    if via_fallback {
        tracing::debug!("{} was not pre-declared, resolving on demand", uid);
    }

    let state = resolve(source, uid, settings).await?;
    Ok(Resolution {
        via_fallback,
        state,
    })
}

/// Renders page states to HTML documents
pub struct PageRenderer {
    templates: TemplateRenderer,
    site_title: String,
    lang: String,
    loading_text: String,
    not_found_text: String,
}

impl PageRenderer {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            templates: TemplateRenderer::new()?,
            site_title: config.title.clone(),
            lang: config.language.clone(),
            loading_text: config.loading_text.clone(),
            not_found_text: config.not_found_text.clone(),
        })
    }

    /// Render the HTML document for a state
    pub fn render(&self, state: &PageState) -> Result<String> {
        let mut context = Context::new();
        context.insert("site_title", &self.site_title);
        context.insert("lang", &self.lang);

        match state {
            PageState::Fallback => {
                context.insert("loading_text", &self.loading_text);
                self.templates.render("loading.html", &context)
            }
            PageState::Ready(post) => {
                context.insert("post", post);
                self.templates.render("post.html", &context)
            }
            PageState::NotFound => {
                context.insert("not_found_text", &self.not_found_text);
                self.templates.render("not_found.html", &context)
            }
        }
    }
}
