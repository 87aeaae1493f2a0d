//! Playlist request and aggregate result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Mode, TrackCandidate};
use crate::DEFAULT_DURATION_MINUTES;

/// User request for playlist generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistRequest {
    pub mode: Mode,
    #[serde(default)]
    pub genre: Option<String>,
    /// Target playlist duration, carried through to the result; None = unset
    #[serde(default = "default_duration")]
    pub duration_minutes: Option<u32>,
}

fn default_duration() -> Option<u32> {
    Some(DEFAULT_DURATION_MINUTES)
}

impl PlaylistRequest {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            genre: None,
            duration_minutes: default_duration(),
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_duration_minutes(mut self, minutes: Option<u32>) -> Self {
        self.duration_minutes = minutes;
        self
    }
}

/// Counts over all verification decisions of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total_candidates: usize,
    pub approved: usize,
    pub rejected: usize,
}

/// Generated playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistResult {
    pub mode: Mode,
    /// Requested target duration; informational only
    pub duration_minutes: Option<u32>,
    /// Every accepted track, in candidate order
    pub tracks: Vec<TrackCandidate>,
    pub total_duration_ms: u64,
    pub verification_summary: VerificationSummary,
    pub generated_at: DateTime<Utc>,
}

impl PlaylistResult {
    /// Total duration in minutes
    pub fn total_minutes(&self) -> f64 {
        self.total_duration_ms as f64 / 1000.0 / 60.0
    }
}
