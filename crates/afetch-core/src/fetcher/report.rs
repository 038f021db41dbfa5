//! Per-candidate and final fetch reports.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::CandidateError;

/// What happened with one candidate source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptReport {
    pub url: String,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Passed strict validation and was persisted.
    Accepted { bytes: u64, final_url: String },
    /// Failed strict validation but passed the opted-in best-effort rule.
    Degraded { bytes: u64, reason: String },
    Failed { error: CandidateError },
}

impl AttemptReport {
    pub fn failed(url: impl Into<String>, error: CandidateError) -> Self {
        Self {
            url: url.into(),
            outcome: AttemptOutcome::Failed { error },
        }
    }

    pub fn error(&self) -> Option<&CandidateError> {
        match &self.outcome {
            AttemptOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

/// One line per candidate, as printed by the CLI.
impl fmt::Display for AttemptReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            AttemptOutcome::Accepted { bytes, .. } => {
                write!(f, "[ok] {} ({} bytes)", self.url, bytes)
            }
            AttemptOutcome::Degraded { bytes, reason } => {
                write!(f, "[degraded] {} ({} bytes): {}", self.url, bytes, reason)
            }
            AttemptOutcome::Failed { error } => write!(f, "[fail] {}: {}", self.url, error),
        }
    }
}

/// Successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchReport {
    pub destination: PathBuf,
    /// Size of the artifact at `destination`.
    pub bytes: u64,
    /// Candidate URL the artifact came from; `None` when an existing valid
    /// file was kept without any request.
    pub source: Option<String>,
    /// False when the artifact was accepted in best-effort mode only.
    pub verified: bool,
    pub attempts: Vec<AttemptReport>,
}

impl FetchReport {
    pub fn kept_existing(&self) -> bool {
        self.source.is_none()
    }
}
