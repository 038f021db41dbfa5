//! Resilient artifact fetcher.
//!
//! Tries candidate sources strictly in order, one request at a time.
//! Redirects are followed here (not by the transport) so the hop budget is
//! enforced per candidate; `file:` candidates are read from disk. The first body that passes strict validation is
//! persisted and ends the fetch; per-candidate failures are logged, reported
//! to the observer, and only surface in the final `Exhausted` error.

mod report;


pub use report::{AttemptOutcome, AttemptReport, FetchReport};

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{CandidateError, FetchError};
use crate::inspect;
use crate::source::{self, CandidateSources};
use crate::storage;
use crate::transport::{self, CurlTransport, Transport};
use crate::validate::{ValidationPolicy, Verdict};

/// Default redirect hop budget per candidate.
pub const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Browser-like identifier; some mirrors reject empty or library-default agents.
pub const DEFAULT_USER_AGENT: &str =
    concat!("Mozilla/5.0 (compatible; afetch/", env!("CARGO_PKG_VERSION"), ")");

/// Knobs that apply to every candidate of a fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub max_redirects: u32,
    pub user_agent: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Keep an existing destination file that already passes strict validation.
    pub skip_existing: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            skip_existing: false,
        }
    }
}

/// What to fetch and where to put it.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub sources: CandidateSources,
    pub policy: ValidationPolicy,
    pub destination: PathBuf,
}

/// Body retrieved from one candidate, after redirects, with its verdict.
#[derive(Debug, Clone)]
pub struct FetchedArtifact {
    pub final_url: Url,
    pub redirects: u32,
    pub bytes: Vec<u8>,
    pub verdict: Verdict,
}

pub struct ArtifactFetcher<T = CurlTransport> {
    transport: T,
    max_redirects: u32,
    skip_existing: bool,
}

impl ArtifactFetcher<CurlTransport> {
    /// Fetcher over libcurl configured from `options`.
    pub fn new(options: &FetchOptions) -> Self {
        let transport = CurlTransport::new(
            options.user_agent.clone(),
            options.timeout,
            options.connect_timeout,
        );
        Self::with_transport(transport, options)
    }
}

impl<T: Transport> ArtifactFetcher<T> {
    pub fn with_transport(transport: T, options: &FetchOptions) -> Self {
        Self {
            transport,
            max_redirects: options.max_redirects,
            skip_existing: options.skip_existing,
        }
    }

    /// Fetch without observing individual attempts.
    pub fn fetch(&self, request: &FetchRequest) -> Result<FetchReport, FetchError> {
        self.fetch_with(request, |_| {})
    }

    /// Fetch, calling `observer` once per candidate as soon as its outcome is known.
    pub fn fetch_with<F>(
        &self,
        request: &FetchRequest,
        mut observer: F,
    ) -> Result<FetchReport, FetchError>
    where
        F: FnMut(&AttemptReport),
    {
        if self.skip_existing {
            if let Some(report) = self.existing_artifact(request) {
                return Ok(report);
            }
        }

        let mut attempts = Vec::with_capacity(request.sources.len());
        // Most recent body that only passed the best-effort rule.
        let mut fallback: Option<(String, Vec<u8>)> = None;

        for url in &request.sources {
            tracing::info!(url = %url, "trying candidate");
            let report = match self.fetch_candidate(url, &request.policy) {
                Ok(FetchedArtifact {
                    verdict: Verdict::Degraded(reason),
                    bytes: body,
                    ..
                }) => {
                    let bytes = body.len() as u64;
                    tracing::warn!(
                        url = %url,
                        bytes,
                        %reason,
                        "candidate only passes best-effort validation"
                    );
                    fallback = Some((url.to_string(), body));
                    AttemptReport {
                        url: url.to_string(),
                        outcome: AttemptOutcome::Degraded { bytes, reason },
                    }
                }
                Ok(artifact) => {
                    let bytes = storage::persist(&request.destination, &artifact.bytes)?;
                    tracing::info!(
                        url = %url,
                        final_url = %artifact.final_url,
                        redirects = artifact.redirects,
                        bytes,
                        destination = %request.destination.display(),
                        "artifact accepted"
                    );
                    let report = AttemptReport {
                        url: url.to_string(),
                        outcome: AttemptOutcome::Accepted {
                            bytes,
                            final_url: artifact.final_url.to_string(),
                        },
                    };
                    observer(&report);
                    attempts.push(report);
                    return Ok(FetchReport {
                        destination: request.destination.clone(),
                        bytes,
                        source: Some(url.to_string()),
                        verified: true,
                        attempts,
                    });
                }
                Err(error) => {
                    tracing::warn!(url = %url, %error, "candidate failed");
                    AttemptReport::failed(url.to_string(), error)
                }
            };
            observer(&report);
            attempts.push(report);
        }

        if let Some((url, body)) = fallback {
            let bytes = storage::persist(&request.destination, &body)?;
            tracing::warn!(
                url = %url,
                bytes,
                destination = %request.destination.display(),
                "no candidate passed strict validation; persisted best-effort artifact"
            );
            return Ok(FetchReport {
                destination: request.destination.clone(),
                bytes,
                source: Some(url),
                verified: false,
                attempts,
            });
        }

        tracing::warn!(candidates = attempts.len(), "all candidates failed");
        Err(FetchError::Exhausted { attempts })
    }

    /// Retrieve one candidate (following redirects) and evaluate it.
    /// A body that fails every allowed rule is a `Validation` error; a
    /// degraded body is returned with its verdict.
    pub fn fetch_candidate(
        &self,
        url: &Url,
        policy: &ValidationPolicy,
    ) -> Result<FetchedArtifact, CandidateError> {
        let (final_url, redirects, bytes) = self.follow(url)?;
        let verdict = policy.evaluate(&bytes);
        if let Verdict::Invalid(reason) = verdict {
            return Err(CandidateError::Validation { reason });
        }
        Ok(FetchedArtifact {
            final_url,
            redirects,
            bytes,
            verdict,
        })
    }

    /// GET `url`, following up to `max_redirects` redirects. A `file:`
    /// candidate is read from disk instead.
    fn follow(&self, url: &Url) -> Result<(Url, u32, Vec<u8>), CandidateError> {
        let mut current = url.clone();
        let mut hops = 0u32;
        loop {
            let response = if source::is_local(&current) {
                transport::read_local(&current)
            } else {
                self.transport.get(&current)
            }
            .map_err(|e| CandidateError::Transport {
                message: e.to_string(),
            })?;

            if response.is_redirect() {
                if let Some(location) = response.location.as_deref() {
                    if hops >= self.max_redirects {
                        return Err(CandidateError::RedirectLoop {
                            limit: self.max_redirects,
                        });
                    }
                    let next = source::resolve_location(&current, location).ok_or_else(|| {
                        CandidateError::BadRedirect {
                            location: location.to_string(),
                        }
                    })?;
                    hops += 1;
                    tracing::debug!(from = %current, to = %next, hop = hops, "following redirect");
                    current = next;
                    continue;
                }
            }

            if !response.is_success() {
                return Err(CandidateError::HttpStatus {
                    code: response.status,
                });
            }
            if let Some((declared, received)) = response.length_mismatch() {
                return Err(CandidateError::Transport {
                    message: format!("truncated body: got {received} of {declared} bytes"),
                });
            }
            return Ok((current, hops, response.body));
        }
    }

    /// Report for an existing destination that already passes strict validation.
    fn existing_artifact(&self, request: &FetchRequest) -> Option<FetchReport> {
        if !request.destination.is_file() {
            return None;
        }
        match inspect::inspect(&request.destination, &request.policy) {
            Ok(found) if found.verdict.is_valid() => {
                tracing::info!(
                    destination = %request.destination.display(),
                    bytes = found.size,
                    "existing artifact is valid; skipping fetch"
                );
                Some(FetchReport {
                    destination: request.destination.clone(),
                    bytes: found.size,
                    source: None,
                    verified: true,
                    attempts: Vec::new(),
                })
            }
            Ok(found) => {
                tracing::debug!(verdict = ?found.verdict, "existing artifact fails validation; refetching");
                None
            }
            Err(e) => {
                tracing::warn!("could not inspect existing artifact: {:#}", e);
                None
            }
        }
    }
}
