//! Runtime configuration for a pipeline run

use std::time::Duration;

use crate::{DEFAULT_MAX_CONCURRENT_VERIFICATIONS, DEFAULT_SEARCH_TIMEOUT_MS};

/// Knobs shared by the verifier and the supervisor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Upper bound on one fallback search call
    pub search_timeout: Duration,
    /// Candidates verified concurrently within one run (min 1)
    pub max_concurrent_verifications: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_timeout: Duration::from_millis(DEFAULT_SEARCH_TIMEOUT_MS),
            max_concurrent_verifications: DEFAULT_MAX_CONCURRENT_VERIFICATIONS,
        }
    }
}

impl PipelineConfig {
    pub fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent_verifications = n.max(1);
        self
    }
}
