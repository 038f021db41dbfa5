//! Candidate source lists and redirect target resolution.

use std::env;
use std::path::Path;
use url::Url;

use crate::error::SourceError;

/// Ordered, non-empty list of candidate URLs. Earlier entries are preferred;
/// the first one that yields a valid artifact wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSources(Vec<Url>);

impl CandidateSources {
    /// Parse candidates, keeping their order. Each is an http(s) URL, a
    /// `file:` URL, or a local path (`/abs`, `./rel`, `../rel`), which is
    /// turned into a `file:` URL. Rejects an empty list, unparsable input and
    /// any other scheme.
    pub fn parse<I, S>(urls: I) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for raw in urls {
            parsed.push(parse_candidate(raw.as_ref().trim())?);
        }
        if parsed.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(Self(parsed))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Url> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a list built by [`CandidateSources::parse`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateSources {
    type Item = &'a Url;
    type IntoIter = std::slice::Iter<'a, Url>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn parse_candidate(raw: &str) -> Result<Url, SourceError> {
    if raw.starts_with('/') || raw.starts_with("./") || raw.starts_with("../") {
        return local_url(raw);
    }
    let url = Url::parse(raw).map_err(|e| SourceError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !is_http(&url) && !is_local(&url) {
        return Err(SourceError::UnsupportedScheme {
            url: raw.to_string(),
            scheme: url.scheme().to_string(),
        });
    }
    Ok(url)
}

fn local_url(raw: &str) -> Result<Url, SourceError> {
    let invalid = |reason: String| SourceError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let path = Path::new(raw);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map_err(|e| invalid(e.to_string()))?
            .join(path)
    };
    Url::from_file_path(&absolute).map_err(|()| invalid("not a usable local path".to_string()))
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// True for `file:` candidates, which are read from disk instead of requested.
pub fn is_local(url: &Url) -> bool {
    url.scheme() == "file"
}

/// Resolve a redirect `Location` against the URL that returned it.
///
/// Handles absolute (`https://host/x`), scheme-relative (`//host/x`),
/// absolute-path (`/x`) and relative (`x`, `../x`) forms. Returns `None`
/// if the result is unparsable or not http(s).
pub fn resolve_location(base: &Url, location: &str) -> Option<Url> {
    let next = base.join(location.trim()).ok()?;
    is_http(&next).then_some(next)
}
