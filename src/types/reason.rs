//! Verdict codes for verification decisions

use serde::{Deserialize, Serialize};

/// Machine-readable outcome of one verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum VerdictCode {
    // =========================================================================
    // V001: Acceptance
    // =========================================================================
    /// Every configured check passed
    V001_ACCEPTED,

    // =========================================================================
    // V01x: Hard bans
    // =========================================================================
    /// Vocals present (or instrumental status unknown) under a vocal ban
    V010_CONTAINS_VOCALS,
    /// Live recording under avoid_live
    V011_LIVE_VERSION,
    /// Remaster under avoid_remaster
    V012_REMASTERED,
    /// Featured artists under avoid_feat
    V013_FEATURED_ARTISTS,

    // =========================================================================
    // V02x: Tempo
    // =========================================================================
    /// No tempo in metadata and fallback research found none
    V020_BPM_UNKNOWN,
    /// Tempo below tempo_min
    V021_BPM_BELOW_MIN,
    /// Tempo above tempo_max
    V022_BPM_ABOVE_MAX,

    // =========================================================================
    // V03x: Energy
    // =========================================================================
    V030_ENERGY_BELOW_MIN,
    V031_ENERGY_ABOVE_MAX,

    // =========================================================================
    // V04x: Focus heuristics
    // =========================================================================
    /// Distraction score above threshold
    V040_DISTRACTION_TOO_HIGH,
}

impl VerdictCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::V001_ACCEPTED => "V001_ACCEPTED",
            Self::V010_CONTAINS_VOCALS => "V010_CONTAINS_VOCALS",
            Self::V011_LIVE_VERSION => "V011_LIVE_VERSION",
            Self::V012_REMASTERED => "V012_REMASTERED",
            Self::V013_FEATURED_ARTISTS => "V013_FEATURED_ARTISTS",
            Self::V020_BPM_UNKNOWN => "V020_BPM_UNKNOWN",
            Self::V021_BPM_BELOW_MIN => "V021_BPM_BELOW_MIN",
            Self::V022_BPM_ABOVE_MAX => "V022_BPM_ABOVE_MAX",
            Self::V030_ENERGY_BELOW_MIN => "V030_ENERGY_BELOW_MIN",
            Self::V031_ENERGY_ABOVE_MAX => "V031_ENERGY_ABOVE_MAX",
            Self::V040_DISTRACTION_TOO_HIGH => "V040_DISTRACTION_TOO_HIGH",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::V001_ACCEPTED => "Accepted",
            Self::V010_CONTAINS_VOCALS => "Contains vocals",
            Self::V011_LIVE_VERSION => "Live version",
            Self::V012_REMASTERED => "Remastered version",
            Self::V013_FEATURED_ARTISTS => "Featured artists",
            Self::V020_BPM_UNKNOWN => "Insufficient BPM data",
            Self::V021_BPM_BELOW_MIN => "BPM below minimum",
            Self::V022_BPM_ABOVE_MAX => "BPM above maximum",
            Self::V030_ENERGY_BELOW_MIN => "Energy below minimum",
            Self::V031_ENERGY_ABOVE_MAX => "Energy above maximum",
            Self::V040_DISTRACTION_TOO_HIGH => "Distraction score too high",
        }
    }

    /// Boolean ban (as opposed to a range or heuristic check)?
    pub fn is_hard_ban(&self) -> bool {
        matches!(
            self,
            Self::V010_CONTAINS_VOCALS
                | Self::V011_LIVE_VERSION
                | Self::V012_REMASTERED
                | Self::V013_FEATURED_ARTISTS
        )
    }
}

impl std::fmt::Display for VerdictCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
