//! HTTP API for Brain-Radio
//!
//! Endpoints:
//! - GET /health - Health check
//! - GET /constraints/:mode - Composed constraints (?genre=)
//! - POST /session/new - Create session
//! - GET /session/:id - Session status
//! - POST /playlist/generate - Run the pipeline
//! - POST /verify - Verify a single track

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::core::{NeuroComposer, Supervisor, TrackVerifier};
use crate::types::{
    Mode, PipelineError, PlaylistRequest, PlaylistResult, ProtocolConstraints, TrackCandidate,
    VerificationDecision, VerificationSummary,
};

/// Per-session record
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord {
    pub created_at: DateTime<Utc>,
    /// Completed playlist runs
    pub runs: u64,
    pub last_mode: Option<Mode>,
    pub last_summary: Option<VerificationSummary>,
}

impl SessionRecord {
    fn new() -> Self {
        Self {
            created_at: Utc::now(),
            runs: 0,
            last_mode: None,
            last_summary: None,
        }
    }
}

/// Keyed session store, owned by whoever builds the router
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session and return its opaque id
    pub async fn create(&self) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.sessions.write().await.insert(id.clone(), SessionRecord::new());
        id
    }

    pub async fn get(&self, id: &str) -> Option<SessionRecord> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Record a finished run against a session; false if the id is unknown
    pub async fn record_run(&self, id: &str, result: &PlaylistResult) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(record) => {
                record.runs += 1;
                record.last_mode = Some(result.mode);
                record.last_summary = Some(result.verification_summary);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// App state
pub struct AppState {
    pub supervisor: Supervisor,
    pub verifier: TrackVerifier,
    pub sessions: Arc<SessionStore>,
}

/// Error body: {"error": "..."}
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn session_not_found(id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("Unknown session: {}", id))
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        let status = match e {
            PipelineError::InvalidMode(_)
            | PipelineError::InvalidConstraints(_)
            | PipelineError::InvalidCandidate(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Query for /constraints/:mode
#[derive(Debug, Deserialize)]
pub struct ConstraintsQuery {
    pub genre: Option<String>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub record: SessionRecord,
}

/// Generate playlist request
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub mode: String,
    pub genre: Option<String>,
    pub duration_minutes: Option<u32>,
    pub session_id: Option<String>,
}

/// Verify single track request
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub mode: String,
    pub genre: Option<String>,
    pub track: TrackCandidate,
}

/// Verify single track response; `track` carries any fallback-resolved tempo
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub decision: VerificationDecision,
    pub track: TrackCandidate,
}

/// Create the API router around an existing supervisor and session store
pub fn create_router(supervisor: Supervisor, sessions: Arc<SessionStore>) -> Router {
    let verifier = supervisor.verifier().clone();
    let state = Arc::new(AppState {
        supervisor,
        verifier,
        sessions,
    });

    Router::new()
        .route("/health", get(health))
        .route("/constraints/:mode", get(get_constraints))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session))
        .route("/playlist/generate", post(generate_playlist))
        .route("/verify", post(verify_track))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: state.sessions.len().await,
    })
}

/// Composed constraints for a mode
async fn get_constraints(
    Path(mode): Path<String>,
    Query(query): Query<ConstraintsQuery>,
) -> Result<Json<ProtocolConstraints>, ApiError> {
    let mode: Mode = mode.parse()?;
    Ok(Json(NeuroComposer::new().compose(mode, query.genre.as_deref())))
}

/// Create new session
async fn create_session(State(state): State<Arc<AppState>>) -> Json<NewSessionResponse> {
    let session_id = state.sessions.create().await;
    Json(NewSessionResponse { session_id })
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let record = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| ApiError::session_not_found(&id))?;
    Ok(Json(SessionStatusResponse {
        session_id: id,
        record,
    }))
}

/// Run the pipeline
async fn generate_playlist(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<PlaylistResult>, ApiError> {
    let mode: Mode = req.mode.parse()?;

    if let Some(id) = &req.session_id {
        if !state.sessions.contains(id).await {
            return Err(ApiError::session_not_found(id));
        }
    }

    let mut request = PlaylistRequest::new(mode);
    request.genre = req.genre;
    // 0 clears the target, as on the CLI
    if let Some(minutes) = req.duration_minutes {
        request.duration_minutes = (minutes > 0).then_some(minutes);
    }

    let result = state.supervisor.run(request).await?;

    if let Some(id) = &req.session_id {
        state.sessions.record_run(id, &result).await;
    }

    Ok(Json(result))
}

/// Verify one track against a mode's constraints
async fn verify_track(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let mode: Mode = req.mode.parse()?;
    let constraints = NeuroComposer::new().compose(mode, req.genre.as_deref());

    let mut track = req.track;
    track.validate()?;

    let decision = state.verifier.verify(&mut track, &constraints).await;
    Ok(Json(VerifyResponse { decision, track }))
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    supervisor: Supervisor,
    sessions: Arc<SessionStore>,
) -> Result<(), PipelineError> {
    let router = create_router(supervisor, sessions);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Brain-Radio API listening");
    info!("  GET  /health             - Health check");
    info!("  GET  /constraints/:mode  - Composed constraints");
    info!("  POST /session/new        - Create session");
    info!("  GET  /session/:id        - Session status");
    info!("  POST /playlist/generate  - Generate playlist");
    info!("  POST /verify             - Verify one track");
    axum::serve(listener, router).await?;
    Ok(())
}
