//! Candidate tracks and their metadata

use serde::{Deserialize, Serialize};

use crate::types::PipelineError;

/// Which subsystem populated a track's tempo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// Came with the catalog metadata
    #[default]
    DirectMetadata,
    /// Resolved by mining external search results
    ExternalFallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::DirectMetadata => "direct-metadata",
            Provenance::ExternalFallback => "external-fallback",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Audio features; each one independently present or absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    /// BPM
    #[serde(default)]
    pub tempo: Option<f64>,
    /// 0.0-1.0
    #[serde(default)]
    pub speechiness: Option<f64>,
    /// 0.0-1.0
    #[serde(default)]
    pub instrumentalness: Option<f64>,
    /// 0.0-1.0
    #[serde(default)]
    pub energy: Option<f64>,
}

/// A track proposed by candidate generation, awaiting verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCandidate {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub features: AudioFeatures,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub is_remaster: bool,
    #[serde(default)]
    pub has_feat: bool,
    #[serde(default)]
    pub explicit: bool,
    /// None = unknown
    #[serde(default)]
    pub is_instrumental: Option<bool>,
    /// Who last set `features.tempo`
    #[serde(default)]
    pub source: Provenance,
}

impl TrackCandidate {
    /// Create a candidate with identity only; uri defaults to `track:<id>`
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        artist: impl Into<String>,
    ) -> Result<Self, PipelineError> {
        let id = id.into();
        let candidate = Self {
            uri: format!("track:{}", id),
            id,
            name: name.into(),
            artist: artist.into(),
            album: None,
            duration_ms: None,
            key: None,
            features: AudioFeatures::default(),
            is_live: false,
            is_remaster: false,
            has_feat: false,
            explicit: false,
            is_instrumental: None,
            source: Provenance::DirectMetadata,
        };
        candidate.validate()?;
        Ok(candidate)
    }

    /// Identity fields must be non-empty and present features finite
    pub fn validate(&self) -> Result<(), PipelineError> {
        for (field, value) in [
            ("id", &self.id),
            ("uri", &self.uri),
            ("name", &self.name),
            ("artist", &self.artist),
        ] {
            if value.trim().is_empty() {
                return Err(PipelineError::InvalidCandidate(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        let f = &self.features;
        for (field, value) in [
            ("tempo", f.tempo),
            ("speechiness", f.speechiness),
            ("instrumentalness", f.instrumentalness),
            ("energy", f.energy),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(PipelineError::InvalidCandidate(format!(
                        "{} must be finite, got {}",
                        field, v
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_tempo(mut self, bpm: f64) -> Self {
        self.features.tempo = Some(bpm);
        self.source = Provenance::DirectMetadata;
        self
    }

    pub fn with_features(mut self, features: AudioFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn with_instrumental(mut self, instrumental: bool) -> Self {
        self.is_instrumental = Some(instrumental);
        self
    }

    pub fn live(mut self) -> Self {
        self.is_live = true;
        self
    }

    pub fn remaster(mut self) -> Self {
        self.is_remaster = true;
        self
    }

    pub fn featuring(mut self) -> Self {
        self.has_feat = true;
        self
    }

    pub fn explicit(mut self) -> Self {
        self.explicit = true;
        self
    }

    pub fn tempo(&self) -> Option<f64> {
        self.features.tempo
    }

    /// Record a tempo found by fallback research
    pub fn resolve_tempo(&mut self, bpm: f64) {
        self.features.tempo = Some(bpm);
        self.source = Provenance::ExternalFallback;
    }

    /// "Name - Artist"
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.name, self.artist)
    }
}

// =============================================================================
// TESTS
// =============================================================================
