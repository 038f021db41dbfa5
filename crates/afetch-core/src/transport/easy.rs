//! libcurl-backed transport (one `Easy` handle per request).

use std::str;
use std::time::Duration;
use url::Url;

use super::parse::parse_headers;
use super::{Response, Transport, TransportError};

/// Blocking GET over libcurl. Redirects are returned to the caller, not followed.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    user_agent: String,
    timeout: Duration,
    connect_timeout: Duration,
}

impl CurlTransport {
    pub fn new(user_agent: impl Into<String>, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
            connect_timeout,
        }
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &Url) -> Result<Response, TransportError> {
        let mut headers: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.get(true)?;
        easy.follow_location(false)?;
        // Some origins reject requests with no or a library-default User-Agent.
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        let head = parse_headers(&headers);
        tracing::debug!(
            url = %url,
            status,
            bytes = body.len(),
            location = head.location.as_deref().unwrap_or(""),
            "GET completed"
        );

        Ok(Response {
            status,
            location: head.location,
            content_length: head.content_length,
            body,
        })
    }
}
