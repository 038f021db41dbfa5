//! Parse HTTP response header lines collected by libcurl.

/// Headers the fetcher cares about.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    pub location: Option<String>,
    pub content_length: Option<u64>,
}

/// Parse collected header lines into a [`ResponseHead`].
///
/// A status line (`HTTP/...`) starts a new header block, so only the headers
/// of the last response are kept (e.g. after `100 Continue` or a proxy `CONNECT`).
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            head = ResponseHead::default();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("location") && !value.is_empty() {
                head.location = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.parse::<u64>() {
                    head.content_length = Some(n);
                }
            }
        }
    }

    head
}
