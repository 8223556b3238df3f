//! Content repository access
//!
//! Pages are built from documents held in a Prismic repository. The
//! [`ContentSource`] trait is the seam between page generation and the
//! remote API so generation can run against any document provider.

mod client;
mod predicate;

use async_trait::async_trait;
use thiserror::Error;

use crate::content::RawPost;

pub use client::PrismicClient;
pub use predicate::Predicate;

/// Errors raised while talking to the content repository
#[derive(Debug, Error)]
pub enum FetchError {
    /// No document matches the identifier
    #[error("no {doc_type} document with uid {uid:?}")]
    NotFound { doc_type: String, uid: String },

    /// Transport-level failure
    #[error("request to content repository failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("content repository returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body is not the expected JSON shape
    #[error("malformed response from content repository: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API entry point lists no master ref
    #[error("content repository has no master ref")]
    NoMasterRef,
}

impl FetchError {
    /// Whether the error means the document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

/// A provider of post documents
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Identifiers of every post the repository holds
    async fn list_known_identifiers(&self) -> Result<Vec<String>, FetchError>;

    /// Fetch exactly one post by identifier
    ///
    /// Returns [`FetchError::NotFound`] when no document matches.
    async fn fetch_by_identifier(&self, uid: &str) -> Result<RawPost, FetchError>;
}
