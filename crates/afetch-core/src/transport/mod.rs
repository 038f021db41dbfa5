//! Single-request HTTP transport.
//!
//! A transport performs exactly one GET and returns the status, the redirect
//! `Location` (if any) and the full body. It never follows redirects itself;
//! the fetcher owns the hop budget so a redirect loop is reported per candidate.
//! `file:` candidates bypass the transport and are read by [`read_local`].

mod easy;
mod local;
mod parse;

pub use easy::CurlTransport;
pub use local::read_local;

use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Response to one GET, without redirect following.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code of the final response line.
    pub status: u32,
    /// `Location` header value, untrimmed and unresolved.
    pub location: Option<String>,
    /// `Content-Length` header value if present.
    pub content_length: Option<u64>,
    /// Full response body.
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Body shorter or longer than the declared `Content-Length`.
    pub fn length_mismatch(&self) -> Option<(u64, u64)> {
        let declared = self.content_length?;
        let received = self.body.len() as u64;
        (declared != received).then_some((declared, received))
    }
}

/// Network-level failure performing a request.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("{}: {source}", path.display())]
    Local {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0}")]
    Other(String),
}

/// Performs a single GET request. Implemented by [`CurlTransport`]; tests
/// substitute scripted transports.
pub trait Transport {
    fn get(&self, url: &Url) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &Url) -> Result<Response, TransportError> {
        (**self).get(url)
    }
}
