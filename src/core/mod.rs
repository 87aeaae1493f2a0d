//! Core modules for Brain-Radio

pub mod api;
pub mod bpm_extractor;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod search;
pub mod supervisor;
pub mod verifier;

pub use api::{create_router, run_server, SessionRecord, SessionStore};
pub use bpm_extractor::BpmExtractor;
pub use catalog::{demo_catalog, demo_search, CandidateSource, EmptyCatalog, StaticCatalog};
pub use composer::NeuroComposer;
pub use config::PipelineConfig;
pub use search::{BlockingSearch, NoSearch, SearchCapability, SearchHit, StaticSearch};
pub use supervisor::{RunState, Stage, Supervisor, ERR_NO_CONSTRAINTS};
pub use verifier::{distraction_score, instrumental_status, TrackVerifier};
