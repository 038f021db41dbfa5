//! Build a validation policy from CLI flags, profile values and config defaults.

use anyhow::{Context, Result};
use afetch_core::checksum;
use afetch_core::config::{AfetchConfig, ArtifactProfile};
use afetch_core::validate::{ValidationPolicy, ZIP_SIGNATURE};

use crate::cli::PolicyArgs;

/// Parse a hex signature such as `504b`. Must be non-empty.
pub fn parse_signature(hex_sig: &str) -> Result<Vec<u8>> {
    let bytes = hex::decode(hex_sig.trim())
        .with_context(|| format!("invalid signature hex: {}", hex_sig))?;
    if bytes.is_empty() {
        anyhow::bail!("signature must contain at least one byte");
    }
    Ok(bytes)
}

/// Flags win over the profile, the profile over the global config.
pub fn build_policy(
    args: &PolicyArgs,
    profile: Option<&ArtifactProfile>,
    cfg: &AfetchConfig,
    best_effort: bool,
) -> Result<ValidationPolicy> {
    let min_size = args
        .min_size
        .or(profile.and_then(|p| p.min_size))
        .unwrap_or(cfg.min_size);

    let signature = match args
        .signature
        .as_deref()
        .or(profile.and_then(|p| p.signature.as_deref()))
    {
        Some(hex_sig) => parse_signature(hex_sig)?,
        None => ZIP_SIGNATURE.to_vec(),
    };

    let sha256 = args
        .sha256
        .as_deref()
        .or(profile.and_then(|p| p.sha256.as_deref()))
        .map(checksum::normalize_sha256)
        .transpose()?;

    Ok(ValidationPolicy::archive()
        .signature(signature)
        .min_size(min_size)
        .sha256(sha256)
        .best_effort(best_effort)
        .build())
}
