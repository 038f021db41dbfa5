//! Byte-level validation rules and their AND/OR combinators.

use serde::{Deserialize, Serialize};

use crate::checksum;

/// Predicate over a fetched body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationRule {
    /// Body starts with these bytes.
    Signature(Vec<u8>),
    /// Body is strictly longer than this many bytes.
    MinLen(u64),
    /// Lowercase hex SHA-256 of the body equals this digest.
    Sha256(String),
    /// Every rule passes. An empty list passes.
    All(Vec<ValidationRule>),
    /// At least one rule passes. An empty list fails.
    Any(Vec<ValidationRule>),
}

impl ValidationRule {
    /// Check `bytes` against the rule. On failure returns a human-readable reason.
    pub fn check(&self, bytes: &[u8]) -> Result<(), String> {
        match self {
            ValidationRule::Signature(sig) => {
                if bytes.starts_with(sig) {
                    Ok(())
                } else {
                    let got = &bytes[..bytes.len().min(sig.len())];
                    Err(format!(
                        "signature mismatch: expected {}, got {}",
                        hex::encode(sig),
                        if got.is_empty() {
                            "empty body".to_string()
                        } else {
                            hex::encode(got)
                        }
                    ))
                }
            }
            ValidationRule::MinLen(min) => {
                let len = bytes.len() as u64;
                if len > *min {
                    Ok(())
                } else {
                    Err(format!("too small: {} bytes (need > {})", len, min))
                }
            }
            ValidationRule::Sha256(expected) => {
                let actual = checksum::sha256_bytes(bytes);
                if actual.eq_ignore_ascii_case(expected) {
                    Ok(())
                } else {
                    Err(format!("sha256 mismatch: expected {}, got {}", expected, actual))
                }
            }
            ValidationRule::All(rules) => rules.iter().try_for_each(|r| r.check(bytes)),
            ValidationRule::Any(rules) => {
                let mut reasons = Vec::with_capacity(rules.len());
                for rule in rules {
                    match rule.check(bytes) {
                        Ok(()) => return Ok(()),
                        Err(reason) => reasons.push(reason),
                    }
                }
                if reasons.is_empty() {
                    Err("no acceptable alternative".to_string())
                } else {
                    Err(reasons.join(" or "))
                }
            }
        }
    }

    pub fn passes(&self, bytes: &[u8]) -> bool {
        self.check(bytes).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(prefix: &[u8], len: usize) -> Vec<u8> {
        let mut b = prefix.to_vec();
        b.resize(len, 0);
        b
    }

    #[test]
    fn signature_accepts_matching_prefix() {
        let rule = ValidationRule::Signature(vec![0x50, 0x4B]);
        assert!(rule.passes(&body(b"PK\x03\x04", 64)));
    }

    #[test]
    fn signature_rejects_html_with_reason() {
        let rule = ValidationRule::Signature(vec![0x50, 0x4B]);
        let err = rule.check(b"<html><body>Not Found</body></html>").unwrap_err();
        assert_eq!(err, "signature mismatch: expected 504b, got 3c68");
    }

    #[test]
    fn signature_rejects_short_and_empty_bodies() {
        let rule = ValidationRule::Signature(vec![0x50, 0x4B]);
        assert!(!rule.passes(b"P"));
        assert_eq!(
            rule.check(b"").unwrap_err(),
            "signature mismatch: expected 504b, got empty body"
        );
    }

    #[test]
    fn min_len_is_strictly_greater() {
        let rule = ValidationRule::MinLen(10);
        assert!(!rule.passes(&[0u8; 10]));
        assert!(rule.passes(&[0u8; 11]));
        assert_eq!(
            rule.check(&[0u8; 3]).unwrap_err(),
            "too small: 3 bytes (need > 10)"
        );
    }

    #[test]
    fn sha256_rule() {
        let digest = checksum::sha256_bytes(b"artifact");
        assert!(ValidationRule::Sha256(digest.clone()).passes(b"artifact"));
        assert!(ValidationRule::Sha256(digest.to_ascii_uppercase()).passes(b"artifact"));
        let err = ValidationRule::Sha256(digest).check(b"tampered").unwrap_err();
        assert!(err.starts_with("sha256 mismatch"));
    }

    #[test]
    fn all_reports_first_failure() {
        let rule = ValidationRule::All(vec![
            ValidationRule::Signature(vec![0x50, 0x4B]),
            ValidationRule::MinLen(100),
        ]);
        assert!(rule.passes(&body(b"PK", 101)));
        assert!(rule.check(&body(b"PK", 50)).unwrap_err().starts_with("too small"));
        assert!(rule
            .check(&body(b"<h", 50))
            .unwrap_err()
            .starts_with("signature mismatch"));
        assert!(ValidationRule::All(Vec::new()).passes(b""));
    }

    #[test]
    fn any_passes_on_one_alternative() {
        let rule = ValidationRule::Any(vec![
            ValidationRule::Signature(vec![0x50, 0x4B]),
            ValidationRule::Signature(vec![0x1F, 0x8B]),
        ]);
        assert!(rule.passes(b"PK.."));
        assert!(rule.passes(b"\x1f\x8b.."));
        let err = rule.check(b"<html>").unwrap_err();
        assert!(err.contains(" or "));
        assert!(!ValidationRule::Any(Vec::new()).passes(b"anything"));
    }
}
