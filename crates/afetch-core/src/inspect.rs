//! Inspect an artifact already on disk.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum;
use crate::validate::{ValidationPolicy, Verdict};

/// Number of leading bytes reported by [`inspect`].
pub const HEAD_LEN: usize = 16;

#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub path: PathBuf,
    pub size: u64,
    /// First bytes of the file as lowercase hex.
    pub head_hex: String,
    pub verdict: Verdict,
    pub sha256: String,
    /// Leading text of a file that fails validation, when it looks like text
    /// (typically an HTML error page saved by mistake).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_preview: Option<String>,
}

/// Read `path` and evaluate it against `policy`.
pub fn inspect(path: &Path, policy: &ValidationPolicy) -> Result<Inspection> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let verdict = policy.evaluate(&bytes);
    let text_preview = if verdict.is_valid() {
        None
    } else {
        text_preview(&bytes)
    };
    Ok(Inspection {
        path: path.to_path_buf(),
        size: bytes.len() as u64,
        head_hex: hex::encode(&bytes[..bytes.len().min(HEAD_LEN)]),
        verdict,
        sha256: checksum::sha256_bytes(&bytes),
        text_preview,
    })
}

fn text_preview(bytes: &[u8]) -> Option<String> {
    const PREVIEW_LEN: usize = 200;
    let head = &bytes[..bytes.len().min(PREVIEW_LEN)];
    let text = String::from_utf8_lossy(head);
    let printable = text
        .chars()
        .all(|c| !c.is_control() || c.is_whitespace());
    (printable && !text.trim().is_empty()).then(|| text.into_owned())
}
