//! Machine-readable protocol constraints
//!
//! Built once per (mode, genre hint) and read-only afterwards. The only way in
//! is [`ConstraintsBuilder::build`], which rejects inverted or out-of-range
//! bounds so the verifier never sees an empty feasible range.

use serde::{Deserialize, Serialize};

use crate::types::{Mode, PipelineError};

/// Preferred musical key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyPreference {
    Major,
    Minor,
}

impl std::fmt::Display for KeyPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyPreference::Major => write!(f, "Major"),
            KeyPreference::Minor => write!(f, "Minor"),
        }
    }
}

/// Constraints a track must satisfy for one mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolConstraints {
    mode: Mode,
    tempo_min: Option<f64>,
    tempo_max: Option<f64>,
    energy_min: Option<f64>,
    energy_max: Option<f64>,
    no_vocals: bool,
    avoid_live: bool,
    avoid_remaster: bool,
    avoid_feat: bool,
    preferred_genres: Vec<String>,
    key_preference: Option<KeyPreference>,
}

impl ProtocolConstraints {
    /// Start building constraints for a mode (everything unset / allowed)
    pub fn builder(mode: Mode) -> ConstraintsBuilder {
        ConstraintsBuilder::new(mode)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Minimum BPM (inclusive)
    pub fn tempo_min(&self) -> Option<f64> {
        self.tempo_min
    }

    /// Maximum BPM (inclusive)
    pub fn tempo_max(&self) -> Option<f64> {
        self.tempo_max
    }

    pub fn energy_min(&self) -> Option<f64> {
        self.energy_min
    }

    pub fn energy_max(&self) -> Option<f64> {
        self.energy_max
    }

    /// Hard ban on vocals
    pub fn no_vocals(&self) -> bool {
        self.no_vocals
    }

    /// Hard ban on live versions
    pub fn avoid_live(&self) -> bool {
        self.avoid_live
    }

    /// Hard ban on remasters
    pub fn avoid_remaster(&self) -> bool {
        self.avoid_remaster
    }

    /// Hard ban on featured artists
    pub fn avoid_feat(&self) -> bool {
        self.avoid_feat
    }

    /// Ordered genre preference, empty = no preference
    pub fn preferred_genres(&self) -> &[String] {
        &self.preferred_genres
    }

    pub fn key_preference(&self) -> Option<KeyPreference> {
        self.key_preference
    }

    /// Is either tempo bound configured?
    pub fn has_tempo_bounds(&self) -> bool {
        self.tempo_min.is_some() || self.tempo_max.is_some()
    }

    /// Human-readable tempo range, e.g. "120-140 BPM" or "<= 60 BPM"
    pub fn tempo_label(&self) -> String {
        match (self.tempo_min, self.tempo_max) {
            (Some(min), Some(max)) => format!("{}-{} BPM", min, max),
            (Some(min), None) => format!(">= {} BPM", min),
            (None, Some(max)) => format!("<= {} BPM", max),
            (None, None) => "any".to_string(),
        }
    }
}

/// Builder for [`ProtocolConstraints`]
#[derive(Debug, Clone)]
pub struct ConstraintsBuilder {
    inner: ProtocolConstraints,
}

impl ConstraintsBuilder {
    fn new(mode: Mode) -> Self {
        Self {
            inner: ProtocolConstraints {
                mode,
                tempo_min: None,
                tempo_max: None,
                energy_min: None,
                energy_max: None,
                no_vocals: false,
                avoid_live: false,
                avoid_remaster: false,
                avoid_feat: false,
                preferred_genres: Vec::new(),
                key_preference: None,
            },
        }
    }

    pub fn tempo(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.inner.tempo_min = min;
        self.inner.tempo_max = max;
        self
    }

    pub fn energy(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.inner.energy_min = min;
        self.inner.energy_max = max;
        self
    }

    pub fn no_vocals(mut self, ban: bool) -> Self {
        self.inner.no_vocals = ban;
        self
    }

    pub fn avoid_live(mut self, ban: bool) -> Self {
        self.inner.avoid_live = ban;
        self
    }

    pub fn avoid_remaster(mut self, ban: bool) -> Self {
        self.inner.avoid_remaster = ban;
        self
    }

    pub fn avoid_feat(mut self, ban: bool) -> Self {
        self.inner.avoid_feat = ban;
        self
    }

    pub fn genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.preferred_genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn key_preference(mut self, key: Option<KeyPreference>) -> Self {
        self.inner.key_preference = key;
        self
    }

    /// Validate bounds and produce the constraints
    pub fn build(self) -> Result<ProtocolConstraints, PipelineError> {
        let c = &self.inner;

        for (name, value) in [
            ("tempo_min", c.tempo_min),
            ("tempo_max", c.tempo_max),
            ("energy_min", c.energy_min),
            ("energy_max", c.energy_max),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(PipelineError::InvalidConstraints(format!(
                        "{} must be finite, got {}",
                        name, v
                    )));
                }
            }
        }

        if let (Some(min), Some(max)) = (c.tempo_min, c.tempo_max) {
            if min > max {
                return Err(PipelineError::InvalidConstraints(format!(
                    "tempo_min {} exceeds tempo_max {}",
                    min, max
                )));
            }
        }

        for (name, value) in [("energy_min", c.energy_min), ("energy_max", c.energy_max)] {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(PipelineError::InvalidConstraints(format!(
                        "{} {} outside 0.0-1.0",
                        name, v
                    )));
                }
            }
        }

        if let (Some(min), Some(max)) = (c.energy_min, c.energy_max) {
            if min > max {
                return Err(PipelineError::InvalidConstraints(format!(
                    "energy_min {} exceeds energy_max {}",
                    min, max
                )));
            }
        }

        Ok(self.inner)
    }
}

// =============================================================================
// TESTS
// =============================================================================
