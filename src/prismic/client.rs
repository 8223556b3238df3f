//! Prismic REST API client

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::predicate::{self, Predicate};
use super::{ContentSource, FetchError};
use crate::config::PrismicConfig;
use crate::content::RawPost;

/// API entry point description
#[derive(Debug, Deserialize)]
struct ApiInfo {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

/// One page of search results
#[derive(Debug, Deserialize)]
struct SearchPage<T> {
    #[serde(default = "first_page")]
    total_pages: u32,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

fn first_page() -> u32 {
    1
}

/// Listing entry; only the uid is needed
#[derive(Debug, Deserialize)]
struct DocumentRef {
    #[serde(default)]
    id: String,
    #[serde(default)]
    uid: Option<String>,
}

/// Client for a Prismic repository
pub struct PrismicClient {
    client: Client,
    config: PrismicConfig,
}

impl PrismicClient {
    /// Create a client for the configured repository
    pub fn new(config: PrismicConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("space-traveling/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> &str {
        self.config.endpoint.trim_end_matches('/')
    }

    /// Resolve the ref of the published content release
    async fn master_ref(&self) -> Result<String, FetchError> {
        let mut request = self.client.get(self.endpoint());
        if let Some(token) = &self.config.access_token {
            request = request.query(&[("access_token", token)]);
        }

        let info: ApiInfo = decode(request.send().await?).await?;
        info.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(FetchError::NoMasterRef)
    }

    /// Run a search query and return one page of results
    async fn search<T: DeserializeOwned>(
        &self,
        master_ref: &str,
        predicates: &[Predicate],
        page: u32,
    ) -> Result<SearchPage<T>, FetchError> {
        let url = format!("{}/documents/search", self.endpoint());
        let q = predicate::query(predicates);
        let page_size = self.config.page_size.to_string();
        let page = page.to_string();

        let mut params = vec![
            ("ref", master_ref),
            ("q", q.as_str()),
            ("pageSize", page_size.as_str()),
            ("page", page.as_str()),
        ];
        if let Some(token) = &self.config.access_token {
            params.push(("access_token", token.as_str()));
        }

        debug!("Querying {} with q={} page={}", url, q, page);
        let response = self.client.get(&url).query(&params).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl ContentSource for PrismicClient {
    async fn list_known_identifiers(&self) -> Result<Vec<String>, FetchError> {
        let master_ref = self.master_ref().await?;
        let predicates = [Predicate::document_type(&self.config.document_type)];

        let mut uids = Vec::new();
        let mut page = 1;
        loop {
            let results: SearchPage<DocumentRef> =
                self.search(&master_ref, &predicates, page).await?;

            for doc in results.results {
                match doc.uid {
                    Some(uid) if !uid.is_empty() => uids.push(uid),
                    _ => warn!("Skipping document {} without uid", doc.id),
                }
            }

            if page >= results.total_pages {
                break;
            }
            page += 1;
        }

        debug!("Found {} {} documents", uids.len(), self.config.document_type);
        Ok(uids)
    }

    async fn fetch_by_identifier(&self, uid: &str) -> Result<RawPost, FetchError> {
        let master_ref = self.master_ref().await?;
        let predicates = [Predicate::uid(&self.config.document_type, uid)];

        let results: SearchPage<RawPost> = self.search(&master_ref, &predicates, 1).await?;
        results
            .results
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NotFound {
                doc_type: self.config.document_type.clone(),
                uid: uid.to_string(),
            })
    }
}

/// Check the status and decode a JSON body
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(FetchError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
