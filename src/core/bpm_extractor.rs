//! BPM extractor: mines a tempo value out of free text
//!
//! Patterns are tried in priority order; for each one only the first match is
//! considered, and values outside the sanity range fall through to the next
//! pattern.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{MAX_VALID_BPM, MIN_VALID_BPM};

lazy_static! {
    /// "120 BPM", "128.5 bpm"
    static ref RE_NUMBER_BPM: Regex = Regex::new(
        r"(?i)\b(\d{2,3}(?:\.\d+)?)\s*BPM\b"
    ).unwrap();

    /// "BPM: 140", "bpm 96"
    static ref RE_BPM_NUMBER: Regex = Regex::new(
        r"(?i)BPM[:\s]+(\d{2,3}(?:\.\d+)?)"
    ).unwrap();

    /// "tempo: 130", "Tempo 88"
    static ref RE_TEMPO_NUMBER: Regex = Regex::new(
        r"(?i)tempo[:\s]+(\d{2,3}(?:\.\d+)?)"
    ).unwrap();

    /// "128bpm", "90bpms", "track_128bpm"
    static ref RE_NUMBER_BPM_LOOSE: Regex = Regex::new(
        r"(?i)(\d{2,3}(?:\.\d+)?)\s*bpm"
    ).unwrap();
}

/// Extracts tempo values from search result text
#[derive(Debug, Default, Clone, Copy)]
pub struct BpmExtractor;

impl BpmExtractor {
    /// Create new extractor
    pub fn new() -> Self {
        Self
    }

    /// First plausible tempo in `text`, if any
    pub fn extract(&self, text: &str) -> Option<f64> {
        let patterns: [&Regex; 4] = [
            &RE_NUMBER_BPM,
            &RE_BPM_NUMBER,
            &RE_TEMPO_NUMBER,
            &RE_NUMBER_BPM_LOOSE,
        ];

        patterns
            .iter()
            .filter_map(|re| re.captures(text))
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .find(|bpm| is_plausible_bpm(*bpm))
    }
}

/// Inside the sanity range (inclusive)?
pub fn is_plausible_bpm(bpm: f64) -> bool {
    (MIN_VALID_BPM..=MAX_VALID_BPM).contains(&bpm)
}

// =============================================================================
// TESTS
// =============================================================================
