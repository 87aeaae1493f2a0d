//! Brain-Radio: neuro-protocol playlist verification
//!
//! Mode → NeuroComposer → ProtocolConstraints → TrackVerifier → PlaylistResult

pub mod core;
pub mod types;

// =============================================================================
// MODE TABLE [C] - tempo in BPM, energy in 0.0-1.0
// =============================================================================

pub const FOCUS_TEMPO_MIN: f64 = 120.0;
pub const FOCUS_TEMPO_MAX: f64 = 140.0;
pub const FOCUS_ENERGY_MAX: f64 = 0.7;

pub const RELAX_TEMPO_MIN: f64 = 60.0;
pub const RELAX_TEMPO_MAX: f64 = 90.0;
pub const RELAX_ENERGY_MAX: f64 = 0.6;

pub const SLEEP_TEMPO_MAX: f64 = 60.0;
pub const SLEEP_ENERGY_MAX: f64 = 0.3;

pub const MEDITATION_TEMPO_MAX: f64 = 70.0;
pub const MEDITATION_ENERGY_MAX: f64 = 0.4;

// =============================================================================
// VOCAL PROXIES [C]
// =============================================================================

/// instrumentalness above this counts as instrumental
pub const INSTRUMENTALNESS_THRESHOLD: f64 = 0.5;

/// speechiness below this counts as instrumental
pub const SPEECHINESS_THRESHOLD: f64 = 0.33;

// =============================================================================
// BPM SANITY RANGE [C] - text extraction only
// =============================================================================

pub const MIN_VALID_BPM: f64 = 40.0;
pub const MAX_VALID_BPM: f64 = 220.0;

// =============================================================================
// DISTRACTION SCORE [C] - focus mode only (sum of weights = 1.0)
// =============================================================================

pub const DISTRACTION_WEIGHT_SPEECHINESS: f64 = 0.4;
pub const DISTRACTION_WEIGHT_INSTRUMENTALNESS: f64 = 0.3;
pub const DISTRACTION_WEIGHT_ENERGY: f64 = 0.2;
pub const DISTRACTION_EXPLICIT_PENALTY: f64 = 0.1;

/// Scores strictly above this reject the track
pub const DISTRACTION_REJECTION_THRESHOLD: f64 = 0.7;

// =============================================================================
// CONFIDENCE LEVELS
// =============================================================================

pub const CONFIDENCE_CERTAIN: f64 = 1.0;
pub const CONFIDENCE_DISTRACTION: f64 = 0.9;
pub const CONFIDENCE_NONE: f64 = 0.0;

// =============================================================================
// RUNTIME DEFAULTS
// =============================================================================

/// Upper bound on one fallback search call (milliseconds)
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 5000;

/// Candidates verified concurrently within one run
pub const DEFAULT_MAX_CONCURRENT_VERIFICATIONS: usize = 4;

/// Target playlist length when the request doesn't say
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "0.1.0";
