//! Track Verifier: checks one candidate against one set of constraints
//!
//! Check order (first failure wins):
//! 1. vocals      - hard ban
//! 2. live        - hard ban
//! 3. remaster    - hard ban
//! 4. feat        - hard ban
//! 5. tempo       - range, with search fallback when metadata has no tempo
//! 6. energy      - range, skipped when energy is unknown
//! 7. distraction - focus only
//!
//! The distraction score is computed before any check so it is attached to
//! every focus decision, accepted or not.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use crate::core::bpm_extractor::BpmExtractor;
use crate::core::search::{hits_to_text, SearchCapability};
use crate::types::{
    Mode, ProtocolConstraints, Provenance, SearchError, TrackCandidate, VerdictCode,
    VerificationDecision, VocalSource,
};
use crate::{
    CONFIDENCE_CERTAIN, CONFIDENCE_DISTRACTION, CONFIDENCE_NONE, DEFAULT_SEARCH_TIMEOUT_MS,
    DISTRACTION_EXPLICIT_PENALTY, DISTRACTION_REJECTION_THRESHOLD, DISTRACTION_WEIGHT_ENERGY,
    DISTRACTION_WEIGHT_INSTRUMENTALNESS, DISTRACTION_WEIGHT_SPEECHINESS,
    INSTRUMENTALNESS_THRESHOLD, SPEECHINESS_THRESHOLD,
};

/// Hybrid verifier: metadata first, proxies second, web search last
#[derive(Clone)]
pub struct TrackVerifier {
    search: Arc<dyn SearchCapability>,
    extractor: BpmExtractor,
    search_timeout: Duration,
}

impl std::fmt::Debug for TrackVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackVerifier")
            .field("search", &self.search.name())
            .field("search_timeout", &self.search_timeout)
            .finish()
    }
}

impl TrackVerifier {
    /// Create verifier with the default search timeout
    pub fn new(search: Arc<dyn SearchCapability>) -> Self {
        Self {
            search,
            extractor: BpmExtractor::new(),
            search_timeout: Duration::from_millis(DEFAULT_SEARCH_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }

    /// Verify a track.
    ///
    /// If the tempo has to be researched and is found, it is written back onto
    /// `track` with [`Provenance::ExternalFallback`].
    pub async fn verify(
        &self,
        track: &mut TrackCandidate,
        constraints: &ProtocolConstraints,
    ) -> VerificationDecision {
        let mut draft = DecisionDraft::new(track, constraints.mode());

        // 1. Vocals
        if constraints.no_vocals() {
            let (instrumental, source) = instrumental_status(track);
            draft.vocal_source = source;
            if !instrumental {
                let reason = if source == VocalSource::Unknown {
                    "Contains vocals - instrumental status unknown"
                } else {
                    "Contains vocals - violates protocol constraint"
                };
                return draft.reject(VerdictCode::V010_CONTAINS_VOCALS, CONFIDENCE_CERTAIN, reason);
            }
        }

        // 2-4. Remaining hard bans
        if constraints.avoid_live() && track.is_live {
            return draft.reject(
                VerdictCode::V011_LIVE_VERSION,
                CONFIDENCE_CERTAIN,
                "Live version - violates protocol constraint",
            );
        }
        if constraints.avoid_remaster() && track.is_remaster {
            return draft.reject(
                VerdictCode::V012_REMASTERED,
                CONFIDENCE_CERTAIN,
                "Remastered version - violates protocol constraint",
            );
        }
        if constraints.avoid_feat() && track.has_feat {
            return draft.reject(
                VerdictCode::V013_FEATURED_ARTISTS,
                CONFIDENCE_CERTAIN,
                "Featured artists - violates protocol constraint",
            );
        }

        // 5. Tempo
        if constraints.has_tempo_bounds() {
            let bpm = match track.tempo() {
                Some(bpm) => bpm,
                None => match self.research_bpm(track).await {
                    Some(bpm) => {
                        track.resolve_tempo(bpm);
                        draft.bpm = Some(bpm);
                        draft.bpm_source = Some(Provenance::ExternalFallback);
                        bpm
                    }
                    None => {
                        return draft.reject(
                            VerdictCode::V020_BPM_UNKNOWN,
                            CONFIDENCE_NONE,
                            "Could not determine BPM - insufficient BPM data",
                        );
                    }
                },
            };

            if let Some(min) = constraints.tempo_min() {
                if bpm < min {
                    return draft.reject(
                        VerdictCode::V021_BPM_BELOW_MIN,
                        CONFIDENCE_CERTAIN,
                        format!("BPM {} below minimum {}", bpm, min),
                    );
                }
            }
            if let Some(max) = constraints.tempo_max() {
                if bpm > max {
                    return draft.reject(
                        VerdictCode::V022_BPM_ABOVE_MAX,
                        CONFIDENCE_CERTAIN,
                        format!("BPM {} above maximum {}", bpm, max),
                    );
                }
            }
        }

        // 6. Energy (no fallback path)
        if let Some(energy) = track.features.energy {
            if let Some(min) = constraints.energy_min() {
                if energy < min {
                    return draft.reject(
                        VerdictCode::V030_ENERGY_BELOW_MIN,
                        CONFIDENCE_CERTAIN,
                        format!("Energy {} below minimum {}", energy, min),
                    );
                }
            }
            if let Some(max) = constraints.energy_max() {
                if energy > max {
                    return draft.reject(
                        VerdictCode::V031_ENERGY_ABOVE_MAX,
                        CONFIDENCE_CERTAIN,
                        format!("Energy {} above maximum {}", energy, max),
                    );
                }
            }
        }

        // 7. Distraction
        if let Some(score) = draft.distraction_score {
            if score > DISTRACTION_REJECTION_THRESHOLD {
                return draft.reject(
                    VerdictCode::V040_DISTRACTION_TOO_HIGH,
                    CONFIDENCE_DISTRACTION,
                    format!("Distraction score {:.2} too high", score),
                );
            }
        }

        draft.accept()
    }

    /// Look the tempo up via search. Errors and timeouts count as "not found".
    async fn research_bpm(&self, track: &TrackCandidate) -> Option<f64> {
        match self.search_bpm(track).await {
            Ok(bpm) => {
                debug!(track = %track.display_name(), bpm = ?bpm, "fallback BPM research finished");
                bpm
            }
            Err(e) => {
                warn!(
                    track = %track.display_name(),
                    backend = self.search.name(),
                    error = %e,
                    "fallback BPM search failed"
                );
                None
            }
        }
    }

    /// One bounded search call; an elapsed timeout becomes [`SearchError::Timeout`]
    async fn search_bpm(&self, track: &TrackCandidate) -> Result<Option<f64>, SearchError> {
        let query = format!("{} {} BPM tempo", track.name, track.artist);
        let hits = tokio::time::timeout(self.search_timeout, self.search.search(&query))
            .await
            .unwrap_or(Err(SearchError::Timeout))?;
        Ok(self.extractor.extract(&hits_to_text(&hits)))
    }
}

/// Instrumental status and the signal that decided it.
///
/// Flag, then instrumentalness, then speechiness. With no signal at all the
/// track is treated as containing vocals.
pub fn instrumental_status(track: &TrackCandidate) -> (bool, VocalSource) {
    if let Some(flag) = track.is_instrumental {
        return (flag, VocalSource::InstrumentalFlag);
    }
    if let Some(instrumentalness) = track.features.instrumentalness {
        return (
            instrumentalness > INSTRUMENTALNESS_THRESHOLD,
            VocalSource::Instrumentalness,
        );
    }
    if let Some(speechiness) = track.features.speechiness {
        return (speechiness < SPEECHINESS_THRESHOLD, VocalSource::Speechiness);
    }
    (false, VocalSource::Unknown)
}

/// Focus distraction score in 0.0-1.0; lower is better.
///
/// Missing features contribute nothing.
pub fn distraction_score(track: &TrackCandidate) -> f64 {
    let f = &track.features;
    let mut score = 0.0;

    if let Some(speechiness) = f.speechiness {
        score += speechiness * DISTRACTION_WEIGHT_SPEECHINESS;
    }
    if let Some(instrumentalness) = f.instrumentalness {
        score += (1.0 - instrumentalness) * DISTRACTION_WEIGHT_INSTRUMENTALNESS;
    }
    if let Some(energy) = f.energy {
        score += energy * DISTRACTION_WEIGHT_ENERGY;
    }
    if track.explicit {
        score += DISTRACTION_EXPLICIT_PENALTY;
    }

    score.clamp(0.0, 1.0)
}

/// Fields gathered while the checks run
struct DecisionDraft {
    track_id: String,
    track_label: String,
    distraction_score: Option<f64>,
    bpm: Option<f64>,
    bpm_source: Option<Provenance>,
    vocal_source: VocalSource,
}

impl DecisionDraft {
    fn new(track: &TrackCandidate, mode: Mode) -> Self {
        Self {
            track_id: track.id.clone(),
            track_label: track.display_name(),
            distraction_score: (mode == Mode::Focus).then(|| distraction_score(track)),
            bpm: track.tempo(),
            bpm_source: track.tempo().map(|_| track.source),
            vocal_source: VocalSource::NotRequired,
        }
    }

    fn reject(self, code: VerdictCode, confidence: f64, reason: impl Into<String>) -> VerificationDecision {
        let reason = reason.into();
        debug!(track = %self.track_label, code = code.code(), %reason, "track rejected");
        self.finish(false, code, confidence, reason)
    }

    fn accept(self) -> VerificationDecision {
        debug!(track = %self.track_label, "track accepted");
        self.finish(
            true,
            VerdictCode::V001_ACCEPTED,
            CONFIDENCE_CERTAIN,
            "All protocol constraints satisfied".to_string(),
        )
    }

    fn finish(
        self,
        accepted: bool,
        code: VerdictCode,
        confidence: f64,
        reason: String,
    ) -> VerificationDecision {
        VerificationDecision {
            track_id: self.track_id,
            accepted,
            confidence,
            code,
            reasons: vec![reason],
            distraction_score: self.distraction_score,
            bpm: self.bpm,
            bpm_source: self.bpm_source,
            vocal_source: self.vocal_source,
            verified_at: Utc::now(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::search::{NoSearch, SearchHit, StaticSearch};
    use crate::core::NeuroComposer;
    use crate::types::AudioFeatures;

    fn verifier() -> TrackVerifier {
        TrackVerifier::new(Arc::new(NoSearch))
    }

    fn focus() -> ProtocolConstraints {
        NeuroComposer::new().compose(Mode::Focus, None)
    }

    fn clean_focus_track() -> TrackCandidate {
        TrackCandidate::new("awake", "Awake", "Tycho")
            .unwrap()
            .with_tempo(130.0)
            .with_features(AudioFeatures {
                tempo: Some(130.0),
                speechiness: Some(0.05),
                instrumentalness: Some(0.95),
                energy: Some(0.4),
            })
    }

    #[test]
    fn test_instrumental_flag_wins_over_proxies() {
        let track = TrackCandidate::new("t", "N", "A")
            .unwrap()
            .with_instrumental(true)
            .with_features(AudioFeatures {
                speechiness: Some(0.9),
                instrumentalness: Some(0.0),
                ..Default::default()
            });
        assert_eq!(instrumental_status(&track), (true, VocalSource::InstrumentalFlag));
    }

    #[test]
    fn test_speechiness_proxy_used_last() {
        let track = TrackCandidate::new("t", "N", "A").unwrap().with_features(AudioFeatures {
            speechiness: Some(0.1),
            ..Default::default()
        });
        assert_eq!(instrumental_status(&track), (true, VocalSource::Speechiness));
    }

    #[test]
    fn test_no_vocal_signal_counts_as_vocals() {
        let track = TrackCandidate::new("t", "N", "A").unwrap();
        assert_eq!(instrumental_status(&track), (false, VocalSource::Unknown));
    }

    #[test]
    fn test_distraction_score_is_clamped() {
        let track = TrackCandidate::new("t", "N", "A")
            .unwrap()
            .explicit()
            .with_features(AudioFeatures {
                speechiness: Some(1.0),
                instrumentalness: Some(0.0),
                energy: Some(1.0),
                tempo: None,
            });
        assert!((distraction_score(&track) - 1.0).abs() < 1e-10);
    }

    #[tokio::test]
    async fn test_clean_focus_track_is_accepted() {
        let mut track = clean_focus_track();
        let decision = verifier().verify(&mut track, &focus()).await;
        assert!(decision.accepted, "{:?}", decision.reasons);
        assert_eq!(decision.code, VerdictCode::V001_ACCEPTED);
        assert_eq!(decision.confidence, 1.0);
        assert_eq!(decision.reasons, vec!["All protocol constraints satisfied"]);
        assert_eq!(decision.bpm_source, Some(Provenance::DirectMetadata));
        assert_eq!(decision.vocal_source, VocalSource::Instrumentalness);
        assert!(decision.distraction_score.unwrap() < 0.5);
    }

    #[tokio::test]
    async fn test_unknown_vocals_rejected_under_ban() {
        let mut track = TrackCandidate::new("t", "Mystery", "Nobody").unwrap().with_tempo(130.0);
        let decision = verifier().verify(&mut track, &focus()).await;
        assert!(!decision.accepted);
        assert_eq!(decision.code, VerdictCode::V010_CONTAINS_VOCALS);
        assert_eq!(decision.vocal_source, VocalSource::Unknown);
        assert!(decision.reasons[0].contains("vocals"));
    }

    #[tokio::test]
    async fn test_missing_bpm_without_search_is_low_confidence() {
        let mut track = clean_focus_track();
        track.features.tempo = None;
        let decision = verifier().verify(&mut track, &focus()).await;
        assert!(!decision.accepted);
        assert_eq!(decision.code, VerdictCode::V020_BPM_UNKNOWN);
        assert_eq!(decision.confidence, 0.0);
        assert!(decision.reasons[0].contains("insufficient BPM data"));
        assert!(decision.distraction_score.is_some());
    }

    #[tokio::test]
    async fn test_fallback_tempo_is_written_back() {
        let search = StaticSearch::new()
            .with_entry("awake", SearchHit::new("Awake - Tycho", "Awake is 125 BPM"));
        let verifier = TrackVerifier::new(Arc::new(search));

        let mut track = clean_focus_track();
        track.features.tempo = None;
        let decision = verifier.verify(&mut track, &focus()).await;

        assert!(decision.accepted);
        assert_eq!(decision.bpm, Some(125.0));
        assert_eq!(decision.bpm_source, Some(Provenance::ExternalFallback));
        assert_eq!(track.tempo(), Some(125.0));
        assert_eq!(track.source, Provenance::ExternalFallback);
    }

    /// Never answers within any test timeout
    struct StalledSearch;

    #[async_trait::async_trait]
    impl SearchCapability for StalledSearch {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_elapsed_search_maps_to_timeout_error() {
        let verifier =
            TrackVerifier::new(Arc::new(StalledSearch)).with_timeout(Duration::from_millis(20));
        let track = TrackCandidate::new("t", "Slow", "Server").unwrap();
        assert_eq!(verifier.search_bpm(&track).await, Err(SearchError::Timeout));
        assert_eq!(verifier.research_bpm(&track).await, None);
    }

    #[tokio::test]
    async fn test_energy_above_max() {
        let mut track = clean_focus_track();
        track.features.energy = Some(0.9);
        let decision = verifier().verify(&mut track, &focus()).await;
        assert_eq!(decision.code, VerdictCode::V031_ENERGY_ABOVE_MAX);
        assert_eq!(decision.reasons, vec!["Energy 0.9 above maximum 0.7"]);
    }

    #[tokio::test]
    async fn test_missing_energy_is_skipped() {
        let mut track = clean_focus_track();
        track.features.energy = None;
        let decision = verifier().verify(&mut track, &focus()).await;
        assert!(decision.accepted);
    }

    #[tokio::test]
    async fn test_distraction_rejection() {
        // Flagged instrumental, but the proxies say "very speechy"
        let mut track = TrackCandidate::new("t", "Spoken", "Poet")
            .unwrap()
            .with_tempo(130.0)
            .with_instrumental(true)
            .explicit()
            .with_features(AudioFeatures {
                tempo: Some(130.0),
                speechiness: Some(0.9),
                instrumentalness: Some(0.1),
                energy: Some(0.5),
            });
        let decision = verifier().verify(&mut track, &focus()).await;
        // 0.36 + 0.27 + 0.10 + 0.10 = 0.83
        assert_eq!(decision.code, VerdictCode::V040_DISTRACTION_TOO_HIGH);
        assert_eq!(decision.confidence, 0.9);
        assert_eq!(decision.reasons, vec!["Distraction score 0.83 too high"]);
    }

    #[tokio::test]
    async fn test_no_distraction_score_outside_focus() {
        let relax = NeuroComposer::new().compose(Mode::Relax, None);
        let mut track = TrackCandidate::new("t", "Song", "Singer").unwrap().with_tempo(80.0);
        let decision = verifier().verify(&mut track, &relax).await;
        assert!(decision.accepted);
        assert_eq!(decision.distraction_score, None);
        assert_eq!(decision.vocal_source, VocalSource::NotRequired);
    }
}
