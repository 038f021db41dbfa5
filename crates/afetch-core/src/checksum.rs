//! SHA-256 helpers for the hash validation rule and `afetch checksum`.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
/// Reads in chunks to keep memory use bounded.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// SHA-256 of an in-memory buffer as lowercase hex.
pub fn sha256_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Normalize a user-supplied SHA-256 digest: trims whitespace, lowercases,
/// and checks that it is exactly 32 bytes of hex.
pub fn normalize_sha256(digest: &str) -> Result<String> {
    let digest = digest.trim().to_ascii_lowercase();
    let raw = hex::decode(&digest).with_context(|| format!("invalid sha256 hex: {digest}"))?;
    if raw.len() != 32 {
        anyhow::bail!("sha256 must be 64 hex characters, got {}", digest.len());
    }
    Ok(digest)
}
