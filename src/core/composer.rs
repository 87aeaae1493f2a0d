//! Neuro-Composer: translates a mode into strict protocol constraints
//!
//! | mode       | tempo   | energy max | vocals  | live  | remaster | feat  |
//! |------------|---------|------------|---------|-------|----------|-------|
//! | focus      | 120-140 | 0.7        | banned  | avoid | avoid    | avoid |
//! | relax      | 60-90   | 0.6        | allowed |       |          |       |
//! | sleep      | <= 60   | 0.3        | allowed | avoid |          |       |
//! | meditation | <= 70   | 0.4        | banned  | avoid |          |       |

use crate::types::{KeyPreference, Mode, ProtocolConstraints};
use crate::{
    FOCUS_ENERGY_MAX, FOCUS_TEMPO_MAX, FOCUS_TEMPO_MIN, MEDITATION_ENERGY_MAX,
    MEDITATION_TEMPO_MAX, RELAX_ENERGY_MAX, RELAX_TEMPO_MAX, RELAX_TEMPO_MIN, SLEEP_ENERGY_MAX,
    SLEEP_TEMPO_MAX,
};

const FOCUS_GENRES: [&str; 3] = ["Techno", "Baroque", "Post-Rock"];
const RELAX_GENRES: [&str; 3] = ["Acoustic", "Ambient", "Jazz"];
const CALM_GENRES: [&str; 3] = ["Ambient", "Drone", "Nature Sounds"];

/// One row of the mode table
struct ModeProfile {
    tempo_min: Option<f64>,
    tempo_max: Option<f64>,
    energy_max: f64,
    no_vocals: bool,
    avoid_live: bool,
    avoid_remaster: bool,
    avoid_feat: bool,
    genres: &'static [&'static str],
    key_preference: Option<KeyPreference>,
}

impl ModeProfile {
    fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Focus => Self {
                tempo_min: Some(FOCUS_TEMPO_MIN),
                tempo_max: Some(FOCUS_TEMPO_MAX),
                energy_max: FOCUS_ENERGY_MAX,
                no_vocals: true,
                avoid_live: true,
                avoid_remaster: true,
                avoid_feat: true,
                genres: &FOCUS_GENRES,
                key_preference: None,
            },
            Mode::Relax => Self {
                tempo_min: Some(RELAX_TEMPO_MIN),
                tempo_max: Some(RELAX_TEMPO_MAX),
                energy_max: RELAX_ENERGY_MAX,
                no_vocals: false,
                avoid_live: false,
                avoid_remaster: false,
                avoid_feat: false,
                genres: &RELAX_GENRES,
                key_preference: Some(KeyPreference::Major),
            },
            Mode::Sleep => Self {
                tempo_min: None,
                tempo_max: Some(SLEEP_TEMPO_MAX),
                energy_max: SLEEP_ENERGY_MAX,
                // soft vocals are fine for sleep
                no_vocals: false,
                avoid_live: true,
                avoid_remaster: false,
                avoid_feat: false,
                genres: &CALM_GENRES,
                key_preference: None,
            },
            Mode::Meditation => Self {
                tempo_min: None,
                tempo_max: Some(MEDITATION_TEMPO_MAX),
                energy_max: MEDITATION_ENERGY_MAX,
                // no guided speech
                no_vocals: true,
                avoid_live: true,
                avoid_remaster: false,
                avoid_feat: false,
                genres: &CALM_GENRES,
                key_preference: None,
            },
        }
    }
}

/// Neuro-Composer, stateless
#[derive(Debug, Default, Clone, Copy)]
pub struct NeuroComposer;

impl NeuroComposer {
    /// Create new composer
    pub fn new() -> Self {
        Self
    }

    /// Compose constraints for a mode.
    ///
    /// A non-blank genre hint replaces the default genre list.
    pub fn compose(&self, mode: Mode, genre_hint: Option<&str>) -> ProtocolConstraints {
        let profile = ModeProfile::for_mode(mode);

        let genres: Vec<String> = match genre_hint.map(str::trim).filter(|g| !g.is_empty()) {
            Some(hint) => vec![hint.to_string()],
            None => profile.genres.iter().map(|g| g.to_string()).collect(),
        };

        let builder = ProtocolConstraints::builder(mode)
            .tempo(profile.tempo_min, profile.tempo_max)
            .energy(None, Some(profile.energy_max))
            .no_vocals(profile.no_vocals)
            .avoid_live(profile.avoid_live)
            .avoid_remaster(profile.avoid_remaster)
            .avoid_feat(profile.avoid_feat)
            .genres(genres)
            .key_preference(profile.key_preference);

        // Unreachable unless the lib.rs constants are broken
        match builder.build() {
            Ok(constraints) => constraints,
            Err(e) => panic!("mode table for {} is invalid: {}", mode, e),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
