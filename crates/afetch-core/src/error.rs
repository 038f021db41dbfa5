//! Error taxonomy for the fetcher.
//!
//! Per-candidate failures ([`CandidateError`]) are never returned to the
//! caller on their own: the fetcher logs them, reports them to the observer,
//! and moves on to the next candidate. Only [`FetchError`] ends an invocation.

use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fetcher::AttemptReport;

/// Why a single candidate source did not yield a valid artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateError {
    /// Network-level failure: DNS, connect, TLS, timeout, truncated stream.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// Non-success response status.
    #[error("HTTP {code}")]
    HttpStatus { code: u32 },
    /// Hop budget exhausted while following redirects.
    #[error("too many redirects (limit {limit})")]
    RedirectLoop { limit: u32 },
    /// Redirect `Location` that cannot be resolved to an http(s) URL.
    #[error("bad redirect location: {location}")]
    BadRedirect { location: String },
    /// Body was retrieved but failed the validation rule.
    #[error("validation failed: {reason}")]
    Validation { reason: String },
}

/// Failure writing the artifact to its destination. Fatal for the invocation.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    #[error("read back {}: {source}", path.display())]
    ReadBack { path: PathBuf, source: io::Error },
    #[error("size mismatch at {}: wrote {expected} bytes, found {actual}", path.display())]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
}

/// Terminal failure of a fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The artifact was obtained but could not be written. No further
    /// candidates are tried.
    #[error(transparent)]
    Persist(#[from] PersistError),
    /// Every candidate failed; `attempts` holds one report per candidate, in order.
    #[error("all {} candidate source(s) failed", attempts.len())]
    Exhausted { attempts: Vec<AttemptReport> },
}

/// Invalid candidate list input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("no candidate URLs given")]
    Empty,
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("unsupported scheme {scheme:?} in {url}; expected http, https or file")]
    UnsupportedScheme { url: String, scheme: String },
}
