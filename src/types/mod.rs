//! Core types for Brain-Radio

mod constraints;
mod decision;
mod error;
mod mode;
mod playlist;
mod reason;
mod track;

pub use constraints::{ConstraintsBuilder, KeyPreference, ProtocolConstraints};
pub use decision::{VerificationDecision, VocalSource};
pub use error::{CatalogError, PipelineError, SearchError};
pub use mode::Mode;
pub use playlist::{PlaylistRequest, PlaylistResult, VerificationSummary};
pub use reason::VerdictCode;
pub use track::{AudioFeatures, Provenance, TrackCandidate};
