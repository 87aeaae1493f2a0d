//! Search capability used by the tempo fallback
//!
//! The verifier only ever calls [`SearchCapability::search`]. Synchronous
//! backends are adapted with [`BlockingSearch`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::types::SearchError;

/// One search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
        }
    }
}

/// Flatten hits into one text blob, one "title: snippet" line per hit
pub fn hits_to_text(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|h| format!("{}: {}", h.title, h.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Free-text search. Must be safe to call concurrently.
#[async_trait]
pub trait SearchCapability: Send + Sync {
    /// Backend name (for logs)
    fn name(&self) -> &str;

    /// Run a text query
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

/// Never finds anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSearch;

#[async_trait]
impl SearchCapability for NoSearch {
    fn name(&self) -> &str {
        "none"
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
        Ok(Vec::new())
    }
}

/// In-memory search: returns the hits of every entry whose keyword occurs in
/// the query (case-insensitive).
#[derive(Debug, Default, Clone)]
pub struct StaticSearch {
    entries: Vec<(String, SearchHit)>,
}

impl StaticSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hit for queries mentioning `keyword`
    pub fn with_entry(mut self, keyword: impl Into<String>, hit: SearchHit) -> Self {
        self.entries.push((keyword.into().to_lowercase(), hit));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SearchCapability for StaticSearch {
    fn name(&self) -> &str {
        "static"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let query = query.to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|(keyword, _)| query.contains(keyword.as_str()))
            .map(|(_, hit)| hit.clone())
            .collect())
    }
}

type BlockingBackend = dyn Fn(&str) -> Result<Vec<SearchHit>, SearchError> + Send + Sync;

/// Adapts a synchronous search backend; each call runs on the blocking pool
#[derive(Clone)]
pub struct BlockingSearch {
    name: String,
    backend: Arc<BlockingBackend>,
}

impl BlockingSearch {
    pub fn new<F>(name: impl Into<String>, backend: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<SearchHit>, SearchError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            backend: Arc::new(backend),
        }
    }
}

impl std::fmt::Debug for BlockingSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingSearch").field("name", &self.name).finish()
    }
}

#[async_trait]
impl SearchCapability for BlockingSearch {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let backend = Arc::clone(&self.backend);
        let query = query.to_string();
        tokio::task::spawn_blocking(move || backend(&query))
            .await
            .map_err(|e| SearchError::Backend(format!("blocking search task failed: {}", e)))?
    }
}

// =============================================================================
// TESTS
// =============================================================================
