//! Generated page store
//!
//! Pages generated ahead of time or on first request are retained here
//! and served until they go stale. A stale page is still served while a
//! single background regeneration replaces it.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// A rendered page kept for reuse
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub html: String,
    pub generated_at: Instant,
}

impl GeneratedPage {
    pub fn new(html: String) -> Self {
        Self {
            html,
            generated_at: Instant::now(),
        }
    }

    /// Whether the page is older than `revalidate`
    pub fn is_stale(&self, revalidate: Duration) -> bool {
        self.generated_at.elapsed() >= revalidate
    }
}

/// Result of a store lookup
#[derive(Debug, Clone)]
pub enum Lookup {
    Fresh(GeneratedPage),
    Stale(GeneratedPage),
    Missing,
}

/// Retained pages plus the identifiers declared at build time
pub struct PageStore {
    pages: RwLock<HashMap<String, GeneratedPage>>,
    known: RwLock<HashSet<String>>,
    regenerating: Mutex<HashSet<String>>,
    revalidate: Duration,
}

impl PageStore {
    pub fn new(revalidate: Duration) -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
            known: RwLock::new(HashSet::new()),
            regenerating: Mutex::new(HashSet::new()),
            revalidate,
        }
    }

    pub async fn lookup(&self, uid: &str) -> Lookup {
        match self.pages.read().await.get(uid) {
            Some(page) if page.is_stale(self.revalidate) => Lookup::Stale(page.clone()),
            Some(page) => Lookup::Fresh(page.clone()),
            None => Lookup::Missing,
        }
    }

    pub async fn insert(&self, uid: &str, html: String) {
        self.pages
            .write()
            .await
            .insert(uid.to_string(), GeneratedPage::new(html));
    }

    pub async fn remove(&self, uid: &str) {
        self.pages.write().await.remove(uid);
    }

    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }

    /// Record the identifiers declared at build time
    pub async fn declare(&self, uids: impl IntoIterator<Item = String>) {
        self.known.write().await.extend(uids);
    }

    /// Snapshot of the declared identifiers
    pub async fn known(&self) -> HashSet<String> {
        self.known.read().await.clone()
    }

    /// Claim the regeneration of `uid`; false when one is already running
    pub fn begin_regeneration(&self, uid: &str) -> bool {
        match self.regenerating.lock() {
            Ok(mut running) => running.insert(uid.to_string()),
            Err(_) => false,
        }
    }

    pub fn finish_regeneration(&self, uid: &str) {
        if let Ok(mut running) = self.regenerating.lock() {
            running.remove(uid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_fresh_and_missing() {
        let store = PageStore::new(Duration::from_secs(1800));
        assert!(matches!(store.lookup("a").await, Lookup::Missing));

        store.insert("a", "<html>a</html>".to_string()).await;
        match store.lookup("a").await {
            Lookup::Fresh(page) => assert_eq!(page.html, "<html>a</html>"),
            other => panic!("expected fresh page, got {:?}", other),
        }
        assert_eq!(store.len().await, 1);

        store.remove("a").await;
        assert!(matches!(store.lookup("a").await, Lookup::Missing));
    }

    #[tokio::test]
    async fn test_zero_interval_is_always_stale() {
        let store = PageStore::new(Duration::ZERO);
        store.insert("a", String::new()).await;
        assert!(matches!(store.lookup("a").await, Lookup::Stale(_)));
    }

    #[tokio::test]
    async fn test_declared_identifiers() {
        let store = PageStore::new(Duration::from_secs(1));
        store
            .declare(vec!["a".to_string(), "b".to_string()])
            .await;
        let known = store.known().await;
        assert!(known.contains("a"));
        assert!(!known.contains("c"));
    }

    #[test]
    fn test_single_regeneration() {
        let store = PageStore::new(Duration::from_secs(1));
        assert!(store.begin_regeneration("a"));
        assert!(!store.begin_regeneration("a"));
        store.finish_regeneration("a");
        assert!(store.begin_regeneration("a"));
    }
}
