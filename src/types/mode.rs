//! Neuro-protocol modes

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::PipelineError;

/// The four cognitive-state targets a playlist can be built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Sustained attention, no vocals
    Focus,
    /// Wind down, vocals allowed
    Relax,
    /// Very slow, very low energy
    Sleep,
    /// Slow and vocal-free
    Meditation,
}

impl Mode {
    /// Every mode, in table order
    pub const ALL: [Mode; 4] = [Mode::Focus, Mode::Relax, Mode::Sleep, Mode::Meditation];

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::Relax => "relax",
            Mode::Sleep => "sleep",
            Mode::Meditation => "meditation",
        }
    }
}

impl FromStr for Mode {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" => Ok(Mode::Focus),
            "relax" => Ok(Mode::Relax),
            "sleep" => Ok(Mode::Sleep),
            "meditation" => Ok(Mode::Meditation),
            _ => Err(PipelineError::InvalidMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// TESTS
// =============================================================================
