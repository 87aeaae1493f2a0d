//! Supervisor: runs one playlist request through the pipeline
//!
//! Stages (linear, no retry):
//! - COMPOSE_CONSTRAINTS → GENERATE_CANDIDATES → VERIFY_TRACKS
//! - VERIFY_TRACKS → FILTER_APPROVED → BUILD_RESULT → DONE
//!
//! A stage that cannot do its work records an error in the run state and the
//! run keeps walking to DONE. The error is surfaced once, at the end.

use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::core::catalog::CandidateSource;
use crate::core::composer::NeuroComposer;
use crate::core::config::PipelineConfig;
use crate::core::search::SearchCapability;
use crate::core::verifier::TrackVerifier;
use crate::types::{
    PipelineError, PlaylistRequest, PlaylistResult, ProtocolConstraints, TrackCandidate,
    VerificationDecision, VerificationSummary,
};

/// Error recorded by stages that need constraints and find none
pub const ERR_NO_CONSTRAINTS: &str = "Constraints not composed";

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ComposeConstraints,
    GenerateCandidates,
    VerifyTracks,
    FilterApproved,
    BuildResult,
    Done,
}

impl Stage {
    /// Following stage; DONE is terminal
    pub fn next(self) -> Stage {
        match self {
            Stage::ComposeConstraints => Stage::GenerateCandidates,
            Stage::GenerateCandidates => Stage::VerifyTracks,
            Stage::VerifyTracks => Stage::FilterApproved,
            Stage::FilterApproved => Stage::BuildResult,
            Stage::BuildResult => Stage::Done,
            Stage::Done => Stage::Done,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::ComposeConstraints => "COMPOSE_CONSTRAINTS",
            Stage::GenerateCandidates => "GENERATE_CANDIDATES",
            Stage::VerifyTracks => "VERIFY_TRACKS",
            Stage::FilterApproved => "FILTER_APPROVED",
            Stage::BuildResult => "BUILD_RESULT",
            Stage::Done => "DONE",
        };
        write!(f, "{}", name)
    }
}

/// Everything one run reads and writes
#[derive(Debug, Clone)]
pub struct RunState {
    pub request: PlaylistRequest,
    pub constraints: Option<ProtocolConstraints>,
    pub candidates: Vec<TrackCandidate>,
    /// Same order as `candidates`
    pub decisions: Vec<VerificationDecision>,
    pub approved: Vec<TrackCandidate>,
    pub result: Option<PlaylistResult>,
    pub error: Option<String>,
}

impl RunState {
    pub fn new(request: PlaylistRequest) -> Self {
        Self {
            request,
            constraints: None,
            candidates: Vec::new(),
            decisions: Vec::new(),
            approved: Vec::new(),
            result: None,
            error: None,
        }
    }

    /// Record an error; the first one recorded is kept
    pub fn record_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(error = %message, "stage error recorded");
        if self.error.is_none() {
            self.error = Some(message);
        }
    }

    /// Final outcome of a finished run
    pub fn into_result(self) -> Result<PlaylistResult, PipelineError> {
        if let Some(error) = self.error {
            return Err(PipelineError::Orchestration(error));
        }
        self.result.ok_or(PipelineError::NoResult)
    }
}

/// Orchestrates composer, catalog and verifier
#[derive(Clone)]
pub struct Supervisor {
    composer: NeuroComposer,
    catalog: Arc<dyn CandidateSource>,
    verifier: TrackVerifier,
    config: PipelineConfig,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("catalog", &self.catalog.name())
            .field("verifier", &self.verifier)
            .field("config", &self.config)
            .finish()
    }
}

impl Supervisor {
    /// Create new supervisor
    pub fn new(
        catalog: Arc<dyn CandidateSource>,
        search: Arc<dyn SearchCapability>,
        config: PipelineConfig,
    ) -> Self {
        let verifier = TrackVerifier::new(search).with_timeout(config.search_timeout);
        Self {
            composer: NeuroComposer::new(),
            catalog,
            verifier,
            config,
        }
    }

    /// Verifier shared by every run of this supervisor
    pub fn verifier(&self) -> &TrackVerifier {
        &self.verifier
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Generate a playlist
    pub async fn run(&self, request: PlaylistRequest) -> Result<PlaylistResult, PipelineError> {
        self.execute(request).await.into_result()
    }

    /// Walk every stage and hand back the final run state
    pub async fn execute(&self, request: PlaylistRequest) -> RunState {
        let mut state = RunState::new(request);
        let mut stage = Stage::ComposeConstraints;

        while stage != Stage::Done {
            info!(%stage, "entering stage");
            self.run_stage(stage, &mut state).await;
            stage = stage.next();
        }

        match &state.result {
            Some(result) if state.error.is_none() => info!(
                mode = %result.mode,
                total = result.verification_summary.total_candidates,
                approved = result.verification_summary.approved,
                rejected = result.verification_summary.rejected,
                "playlist run complete"
            ),
            _ => warn!(error = ?state.error, "playlist run failed"),
        }

        state
    }

    async fn run_stage(&self, stage: Stage, state: &mut RunState) {
        match stage {
            Stage::ComposeConstraints => self.compose_constraints(state),
            Stage::GenerateCandidates => self.generate_candidates(state).await,
            Stage::VerifyTracks => self.verify_tracks(state).await,
            Stage::FilterApproved => self.filter_approved(state),
            Stage::BuildResult => self.build_result(state),
            Stage::Done => {}
        }
    }

    pub fn compose_constraints(&self, state: &mut RunState) {
        let constraints = self
            .composer
            .compose(state.request.mode, state.request.genre.as_deref());
        debug!(
            mode = %constraints.mode(),
            tempo = %constraints.tempo_label(),
            genres = ?constraints.preferred_genres(),
            "constraints composed"
        );
        state.constraints = Some(constraints);
    }

    pub async fn generate_candidates(&self, state: &mut RunState) {
        let Some(constraints) = state.constraints.clone() else {
            state.record_error(ERR_NO_CONSTRAINTS);
            return;
        };

        match self.catalog.candidates(&constraints).await {
            Ok(tracks) => {
                let total = tracks.len();
                state.candidates = tracks
                    .into_iter()
                    .filter(|track| match track.validate() {
                        Ok(()) => true,
                        Err(e) => {
                            warn!(track_id = %track.id, error = %e, "dropping invalid candidate");
                            false
                        }
                    })
                    .collect();
                debug!(
                    source = self.catalog.name(),
                    total,
                    kept = state.candidates.len(),
                    "candidates generated"
                );
            }
            Err(e) => state.record_error(format!("Candidate generation failed: {}", e)),
        }
    }

    /// Verify every candidate; decisions keep candidate order
    pub async fn verify_tracks(&self, state: &mut RunState) {
        let Some(constraints) = state.constraints.clone() else {
            state.record_error(ERR_NO_CONSTRAINTS);
            return;
        };

        // Each future owns its candidate so the run future stays Send
        let candidates = std::mem::take(&mut state.candidates);
        let verified: Vec<(TrackCandidate, VerificationDecision)> = stream::iter(candidates)
            .map(|mut track| {
                let verifier = self.verifier.clone();
                let constraints = constraints.clone();
                async move {
                    let decision = verifier.verify(&mut track, &constraints).await;
                    (track, decision)
                }
            })
            .buffered(self.config.max_concurrent_verifications.max(1))
            .collect()
            .await;

        (state.candidates, state.decisions) = verified.into_iter().unzip();
    }

    pub fn filter_approved(&self, state: &mut RunState) {
        state.approved = state
            .candidates
            .iter()
            .zip(&state.decisions)
            .filter(|(_, decision)| decision.accepted)
            .map(|(track, _)| track.clone())
            .collect();
    }

    /// Aggregate every approved track; the duration target is carried, not enforced
    pub fn build_result(&self, state: &mut RunState) {
        let tracks = state.approved.clone();
        let total_duration_ms: u64 = tracks.iter().filter_map(|t| t.duration_ms).sum();

        let approved = state.decisions.iter().filter(|d| d.accepted).count();
        let verification_summary = VerificationSummary {
            total_candidates: state.candidates.len(),
            approved,
            rejected: state.decisions.len() - approved,
        };

        state.result = Some(PlaylistResult {
            mode: state.request.mode,
            duration_minutes: state.request.duration_minutes,
            tracks,
            total_duration_ms,
            verification_summary,
            generated_at: chrono::Utc::now(),
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================
