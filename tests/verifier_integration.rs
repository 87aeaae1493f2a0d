//! Integration tests for track verification
//!
//! Tests the full path: mode → NeuroComposer → TrackVerifier → decision

use async_trait::async_trait;
use brainradio::core::{
    BlockingSearch, NeuroComposer, NoSearch, SearchCapability, SearchHit, StaticSearch,
    TrackVerifier,
};
use brainradio::types::{
    AudioFeatures, Mode, ProtocolConstraints, Provenance, SearchError, TrackCandidate,
    VerdictCode, VocalSource,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Search backend that always fails
struct BrokenSearch;

#[async_trait]
impl SearchCapability for BrokenSearch {
    fn name(&self) -> &str {
        "broken"
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
        Err(SearchError::Backend("connection refused".to_string()))
    }
}

/// Search backend that answers too late
struct SlowSearch;

#[async_trait]
impl SearchCapability for SlowSearch {
    fn name(&self) -> &str {
        "slow"
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, SearchError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(vec![SearchHit::new("late", "128 BPM")])
    }
}

/// Records the queries it receives
#[derive(Default)]
struct RecordingSearch {
    calls: AtomicUsize,
    last_query: std::sync::Mutex<Option<String>>,
}

#[async_trait]
impl SearchCapability for RecordingSearch {
    fn name(&self) -> &str {
        "recording"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.to_string());
        Ok(vec![SearchHit::new("result", "tempo: 132")])
    }
}

fn constraints(mode: Mode) -> ProtocolConstraints {
    NeuroComposer::new().compose(mode, None)
}

fn quiet_verifier() -> TrackVerifier {
    TrackVerifier::new(Arc::new(NoSearch))
}

/// Focus-friendly features
fn focus_features(tempo: Option<f64>) -> AudioFeatures {
    AudioFeatures {
        tempo,
        speechiness: Some(0.05),
        instrumentalness: Some(0.95),
        energy: Some(0.4),
    }
}

fn focus_track(id: &str, tempo: Option<f64>) -> TrackCandidate {
    TrackCandidate::new(id, "Awake", "Tycho")
        .unwrap()
        .with_features(focus_features(tempo))
}

#[tokio::test]
async fn test_focus_clean_track_accepted() {
    let mut track = focus_track("awake", Some(130.0));
    let decision = quiet_verifier().verify(&mut track, &constraints(Mode::Focus)).await;

    assert!(decision.accepted);
    assert_eq!(decision.confidence, 1.0);
    let score = decision.distraction_score.expect("focus computes a distraction score");
    assert!(score < 0.5, "distraction {} should be < 0.5", score);
}

#[tokio::test]
async fn test_live_always_rejected_under_avoid_live() {
    let verifier = quiet_verifier();
    let focus = constraints(Mode::Focus);

    let variants = [
        focus_track("a", Some(130.0)).live(),
        focus_track("b", Some(10.0)).live(),
        focus_track("c", None).live(),
        focus_track("d", Some(130.0)).live().remaster().featuring().explicit(),
    ];

    for mut track in variants {
        let decision = verifier.verify(&mut track, &focus).await;
        assert!(!decision.accepted);
        assert_eq!(decision.code, VerdictCode::V011_LIVE_VERSION);
        assert!(decision.reasons.iter().any(|r| r.to_lowercase().contains("live")));
    }
}

#[tokio::test]
async fn test_hard_ban_beats_bpm_violation() {
    let mut track = focus_track("x", Some(200.0)).live();
    let decision = quiet_verifier().verify(&mut track, &constraints(Mode::Focus)).await;
    assert_eq!(decision.code, VerdictCode::V011_LIVE_VERSION);
    assert_eq!(decision.confidence, 1.0);
    assert_eq!(decision.reasons.len(), 1);
}

#[tokio::test]
async fn test_hard_ban_order() {
    let verifier = quiet_verifier();
    let focus = constraints(Mode::Focus);

    let mut remaster_and_feat = focus_track("r", Some(130.0)).remaster().featuring();
    let decision = verifier.verify(&mut remaster_and_feat, &focus).await;
    assert_eq!(decision.code, VerdictCode::V012_REMASTERED);

    let mut feat = focus_track("f", Some(130.0)).featuring();
    let decision = verifier.verify(&mut feat, &focus).await;
    assert_eq!(decision.code, VerdictCode::V013_FEATURED_ARTISTS);
    assert!(decision.code.is_hard_ban());
}

#[tokio::test]
async fn test_vocal_track_rejected_for_focus() {
    let mut track = TrackCandidate::new("q", "Bohemian Rhapsody", "Queen")
        .unwrap()
        .with_instrumental(false)
        .with_features(AudioFeatures {
            speechiness: Some(0.3),
            instrumentalness: Some(0.0),
            ..Default::default()
        });
    let decision = quiet_verifier().verify(&mut track, &constraints(Mode::Focus)).await;
    assert!(!decision.accepted);
    assert_eq!(decision.vocal_source, VocalSource::InstrumentalFlag);
    assert!(decision.reasons[0].to_lowercase().contains("vocals"));
}

#[tokio::test]
async fn test_relax_accepts_vocals() {
    let mut track = TrackCandidate::new("q", "Sunday Morning", "Singer")
        .unwrap()
        .with_instrumental(false)
        .with_tempo(75.0)
        .with_features(AudioFeatures {
            tempo: Some(75.0),
            speechiness: Some(0.2),
            instrumentalness: Some(0.0),
            energy: Some(0.4),
        });
    let decision = quiet_verifier().verify(&mut track, &constraints(Mode::Relax)).await;
    assert!(decision.accepted, "{:?}", decision.reasons);
    assert_eq!(decision.distraction_score, None);
}

#[tokio::test]
async fn test_fallback_bpm_from_search() {
    let search = StaticSearch::new().with_entry(
        "sandstorm",
        SearchHit::new("Sandstorm - Darude", "Sandstorm has a tempo of 136 BPM"),
    );
    let verifier = TrackVerifier::new(Arc::new(search));

    let mut track = TrackCandidate::new("s", "Sandstorm", "Darude")
        .unwrap()
        .with_features(focus_features(None));
    let decision = verifier.verify(&mut track, &constraints(Mode::Focus)).await;

    assert_eq!(decision.bpm, Some(136.0));
    assert_eq!(decision.bpm_source, Some(Provenance::ExternalFallback));
    assert_eq!(track.tempo(), Some(136.0));
    assert_eq!(track.source, Provenance::ExternalFallback);
    assert!(decision.accepted);
}

#[tokio::test]
async fn test_fallback_bpm_still_range_checked() {
    let search = StaticSearch::new()
        .with_entry("slowcore", SearchHit::new("Slowcore", "Slowcore drifts at 70 BPM"));
    let verifier = TrackVerifier::new(Arc::new(search));

    let mut track = TrackCandidate::new("s", "Slowcore", "Band")
        .unwrap()
        .with_features(focus_features(None));
    let decision = verifier.verify(&mut track, &constraints(Mode::Focus)).await;

    assert!(!decision.accepted);
    assert_eq!(decision.code, VerdictCode::V021_BPM_BELOW_MIN);
    assert_eq!(decision.reasons, vec!["BPM 70 below minimum 120"]);
    assert_eq!(decision.bpm_source, Some(Provenance::ExternalFallback));
}

#[tokio::test]
async fn test_fallback_query_shape() {
    let search = Arc::new(RecordingSearch::default());
    let verifier = TrackVerifier::new(search.clone());

    let mut track = TrackCandidate::new("s", "Strobe", "deadmau5")
        .unwrap()
        .with_features(focus_features(None));
    verifier.verify(&mut track, &constraints(Mode::Focus)).await;

    assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        search.last_query.lock().unwrap().as_deref(),
        Some("Strobe deadmau5 BPM tempo")
    );
}

#[tokio::test]
async fn test_no_search_when_tempo_known() {
    let search = Arc::new(RecordingSearch::default());
    let verifier = TrackVerifier::new(search.clone());

    let mut track = focus_track("k", Some(125.0));
    verifier.verify(&mut track, &constraints(Mode::Focus)).await;

    assert_eq!(search.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_search_error_degrades_to_low_confidence() {
    let verifier = TrackVerifier::new(Arc::new(BrokenSearch));
    let mut track = focus_track("b", None);
    let decision = verifier.verify(&mut track, &constraints(Mode::Focus)).await;

    assert!(!decision.accepted);
    assert_eq!(decision.confidence, 0.0);
    assert_eq!(decision.code, VerdictCode::V020_BPM_UNKNOWN);
    assert_eq!(track.tempo(), None);
    assert_eq!(track.source, Provenance::DirectMetadata);
}

#[tokio::test]
async fn test_search_timeout_degrades_to_low_confidence() {
    let verifier =
        TrackVerifier::new(Arc::new(SlowSearch)).with_timeout(Duration::from_millis(50));
    let mut track = focus_track("t", None);
    let decision = verifier.verify(&mut track, &constraints(Mode::Focus)).await;

    assert_eq!(decision.code, VerdictCode::V020_BPM_UNKNOWN);
    assert_eq!(decision.confidence, 0.0);
}

#[tokio::test]
async fn test_blocking_backend_feeds_fallback() {
    let search = BlockingSearch::new("sync", |query: &str| {
        Ok(vec![SearchHit::new(query, "BPM: 128")])
    });
    let verifier = TrackVerifier::new(Arc::new(search));
    let mut track = focus_track("b", None);
    let decision = verifier.verify(&mut track, &constraints(Mode::Focus)).await;

    assert_eq!(decision.bpm, Some(128.0));
    assert!(decision.accepted);
}

#[tokio::test]
async fn test_distraction_score_iff_focus() {
    let verifier = quiet_verifier();

    for mode in Mode::ALL {
        // One in-range and one out-of-range track per mode
        let mut good = TrackCandidate::new("g", "Drone", "Artist")
            .unwrap()
            .with_instrumental(true)
            .with_features(AudioFeatures {
                tempo: Some(if mode == Mode::Focus { 130.0 } else { 55.0 }),
                speechiness: Some(0.02),
                instrumentalness: Some(0.97),
                energy: Some(0.1),
            });
        let mut bad = TrackCandidate::new("b", "Noise", "Artist")
            .unwrap()
            .with_instrumental(true)
            .with_tempo(300.0);

        let good_decision = verifier.verify(&mut good, &constraints(mode)).await;
        let bad_decision = verifier.verify(&mut bad, &constraints(mode)).await;
        assert!(!bad_decision.accepted);

        let is_focus = mode == Mode::Focus;
        assert_eq!(good_decision.distraction_score.is_some(), is_focus, "{}", mode);
        assert_eq!(bad_decision.distraction_score.is_some(), is_focus, "{}", mode);
    }
}

#[tokio::test]
async fn test_sleep_energy_and_tempo() {
    let verifier = quiet_verifier();
    let sleep = constraints(Mode::Sleep);

    let mut too_fast = TrackCandidate::new("f", "Fast", "A").unwrap().with_tempo(61.0);
    let decision = verifier.verify(&mut too_fast, &sleep).await;
    assert_eq!(decision.code, VerdictCode::V022_BPM_ABOVE_MAX);

    let mut too_energetic = TrackCandidate::new("e", "Loud", "A")
        .unwrap()
        .with_features(AudioFeatures {
            tempo: Some(50.0),
            energy: Some(0.5),
            ..Default::default()
        });
    let decision = verifier.verify(&mut too_energetic, &sleep).await;
    assert_eq!(decision.code, VerdictCode::V031_ENERGY_ABOVE_MAX);

    let mut boundary = TrackCandidate::new("b", "Edge", "A")
        .unwrap()
        .with_features(AudioFeatures {
            tempo: Some(60.0),
            energy: Some(0.3),
            ..Default::default()
        });
    let decision = verifier.verify(&mut boundary, &sleep).await;
    assert!(decision.accepted, "bounds are inclusive: {:?}", decision.reasons);
}

#[tokio::test]
async fn test_custom_energy_floor() {
    let constraints = ProtocolConstraints::builder(Mode::Relax)
        .energy(Some(0.2), Some(0.8))
        .build()
        .unwrap();
    let mut track = TrackCandidate::new("e", "Whisper", "A")
        .unwrap()
        .with_features(AudioFeatures {
            energy: Some(0.1),
            ..Default::default()
        });
    let decision = quiet_verifier().verify(&mut track, &constraints).await;
    assert_eq!(decision.code, VerdictCode::V030_ENERGY_BELOW_MIN);
    assert_eq!(decision.reasons, vec!["Energy 0.1 below minimum 0.2"]);
}
