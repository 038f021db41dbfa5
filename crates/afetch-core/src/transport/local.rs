//! `file:` candidates: an artifact already on this machine.

use std::fs;
use url::Url;

use super::{Response, TransportError};

/// Read the file behind a `file:` URL as if it were a `200 OK` response.
pub fn read_local(url: &Url) -> Result<Response, TransportError> {
    let path = url
        .to_file_path()
        .map_err(|()| TransportError::Other(format!("not a local file path: {url}")))?;
    let body = fs::read(&path).map_err(|source| TransportError::Local {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = body.len(), "read local candidate");
    Ok(Response {
        status: 200,
        location: None,
        content_length: Some(body.len() as u64),
        body,
    })
}
