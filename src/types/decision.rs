//! Verification decisions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Provenance, VerdictCode};

/// Which signal decided instrumental status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VocalSource {
    /// Vocals allowed, no determination made
    NotRequired,
    /// Explicit is_instrumental flag
    InstrumentalFlag,
    /// instrumentalness proxy
    Instrumentalness,
    /// speechiness proxy
    Speechiness,
    /// No signal; treated as containing vocals
    Unknown,
}

/// Accept/reject outcome for one candidate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationDecision {
    /// Candidate id this decision belongs to
    pub track_id: String,
    pub accepted: bool,
    /// 0.0-1.0
    pub confidence: f64,
    pub code: VerdictCode,
    /// Failing check, or a single success message
    pub reasons: Vec<String>,
    /// Focus mode only, present on accepted and rejected decisions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distraction_score: Option<f64>,
    /// Tempo used by the tempo check
    pub bpm: Option<f64>,
    pub bpm_source: Option<Provenance>,
    pub vocal_source: VocalSource,
    pub verified_at: DateTime<Utc>,
}

impl VerificationDecision {
    /// Format for terminal display
    pub fn to_parseable_string(&self) -> String {
        let bpm = self
            .bpm
            .map(|b| format!("{}", b))
            .unwrap_or_else(|| "?".to_string());
        let distraction = self
            .distraction_score
            .map(|d| format!(" | distraction={:.2}", d))
            .unwrap_or_default();
        format!(
            "{} | conf={:.1} | bpm={}{} | {}",
            if self.accepted { "ACCEPT" } else { "REJECT" },
            self.confidence,
            bpm,
            distraction,
            self.code.code()
        )
    }
}
