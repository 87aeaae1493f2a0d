//! Candidate generation
//!
//! Real catalog search is out of scope; sources here return fixed lists.

use async_trait::async_trait;

use crate::core::search::{SearchHit, StaticSearch};
use crate::types::{AudioFeatures, CatalogError, ProtocolConstraints, TrackCandidate};

/// Produces candidate tracks for a set of constraints
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Source name (for logs)
    fn name(&self) -> &str;

    async fn candidates(
        &self,
        constraints: &ProtocolConstraints,
    ) -> Result<Vec<TrackCandidate>, CatalogError>;
}

/// Returns no candidates
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyCatalog;

#[async_trait]
impl CandidateSource for EmptyCatalog {
    fn name(&self) -> &str {
        "empty"
    }

    async fn candidates(
        &self,
        _constraints: &ProtocolConstraints,
    ) -> Result<Vec<TrackCandidate>, CatalogError> {
        Ok(Vec::new())
    }
}

/// Returns the same fixed list for every request
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    tracks: Vec<TrackCandidate>,
}

impl StaticCatalog {
    pub fn new(tracks: Vec<TrackCandidate>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[async_trait]
impl CandidateSource for StaticCatalog {
    fn name(&self) -> &str {
        "static"
    }

    async fn candidates(
        &self,
        _constraints: &ProtocolConstraints,
    ) -> Result<Vec<TrackCandidate>, CatalogError> {
        Ok(self.tracks.clone())
    }
}

fn demo_track(
    id: &str,
    name: &str,
    artist: &str,
    duration_ms: u64,
    features: AudioFeatures,
) -> TrackCandidate {
    TrackCandidate {
        uri: format!("spotify:track:{}", id),
        id: id.to_string(),
        name: name.to_string(),
        artist: artist.to_string(),
        album: None,
        duration_ms: Some(duration_ms),
        key: None,
        features,
        is_live: false,
        is_remaster: false,
        has_feat: false,
        explicit: false,
        is_instrumental: None,
        source: Default::default(),
    }
}

/// Small built-in catalog for dry runs
pub fn demo_catalog() -> StaticCatalog {
    let mut awake = demo_track(
        "5YQwhbh8d1N3AlBqGyWHbG",
        "Awake",
        "Tycho",
        286_000,
        AudioFeatures {
            tempo: Some(130.0),
            speechiness: Some(0.05),
            instrumentalness: Some(0.95),
            energy: Some(0.4),
        },
    );
    awake.is_instrumental = Some(true);

    let sandstorm = demo_track(
        "6Sy9BUbgFse0n0LPA5lwy5",
        "Sandstorm",
        "Darude",
        225_000,
        AudioFeatures {
            tempo: None,
            speechiness: Some(0.04),
            instrumentalness: Some(0.88),
            energy: Some(0.6),
        },
    );

    let mut bohemian = demo_track(
        "4u7EnebtmKWrUHhmAwpZw1",
        "Bohemian Rhapsody",
        "Queen",
        354_000,
        AudioFeatures {
            tempo: Some(72.0),
            speechiness: Some(0.3),
            instrumentalness: Some(0.0),
            energy: Some(0.4),
        },
    );
    bohemian.is_instrumental = Some(false);

    let mut live = demo_track(
        "3mRM4NM8iO7UBqrSigCQFH",
        "Kerala (Live)",
        "Bonobo",
        262_000,
        AudioFeatures {
            tempo: Some(124.0),
            speechiness: Some(0.05),
            instrumentalness: Some(0.9),
            energy: Some(0.5),
        },
    );
    live.is_live = true;

    let weightless = demo_track(
        "1WJzRtI1ABzV3TPIeJZVvi",
        "Weightless",
        "Marconi Union",
        480_000,
        AudioFeatures {
            tempo: Some(60.0),
            speechiness: Some(0.03),
            instrumentalness: Some(0.92),
            energy: Some(0.1),
        },
    );

    let mut so_what = demo_track(
        "7q3kkfcQcXJlVUvB7XqN1Y",
        "So What",
        "Miles Davis",
        562_000,
        AudioFeatures {
            tempo: Some(88.0),
            speechiness: Some(0.04),
            instrumentalness: Some(0.8),
            energy: Some(0.3),
        },
    );
    so_what.key = Some("D Dorian".to_string());

    StaticCatalog::new(vec![awake, sandstorm, bohemian, live, weightless, so_what])
}

/// Search results matching the demo catalog's tracks without tempo metadata
pub fn demo_search() -> StaticSearch {
    StaticSearch::new().with_entry(
        "sandstorm",
        SearchHit::new(
            "Sandstorm by Darude - Song BPM",
            "Sandstorm is a trance song by Darude with a tempo of 136 BPM.",
        ),
    )
}

// =============================================================================
// TESTS
// =============================================================================
