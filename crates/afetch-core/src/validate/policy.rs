//! Strict and best-effort validation policy.

use serde::Serialize;

use super::rule::ValidationRule;

/// Zip container signature ("PK"); jar files are zip archives.
pub const ZIP_SIGNATURE: [u8; 2] = [0x50, 0x4B];

/// Default minimum plausible artifact size in bytes. Error pages and
/// truncated downloads are usually well below this.
pub const DEFAULT_MIN_SIZE: u64 = 10_000;

/// Outcome of applying a policy to a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    /// Passes the strict rule.
    Valid,
    /// Fails the strict rule (reason attached) but passes the opted-in best-effort rule.
    Degraded(String),
    /// Fails every rule the policy allows.
    Invalid(String),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

/// Strict rule plus an optional best-effort fallback, which is `None`
/// unless explicitly enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    strict: ValidationRule,
    best_effort: Option<ValidationRule>,
}

impl ValidationPolicy {
    /// Policy with only a strict rule.
    pub fn strict(rule: ValidationRule) -> Self {
        Self {
            strict: rule,
            best_effort: None,
        }
    }

    /// Builder for the usual archive policy (signature + minimum size).
    pub fn archive() -> PolicyBuilder {
        PolicyBuilder::default()
    }

    /// Enable a best-effort rule, consulted only when the strict rule fails.
    pub fn with_best_effort(mut self, rule: ValidationRule) -> Self {
        self.best_effort = Some(rule);
        self
    }

    pub fn best_effort_rule(&self) -> Option<&ValidationRule> {
        self.best_effort.as_ref()
    }

    pub fn evaluate(&self, bytes: &[u8]) -> Verdict {
        let reason = match self.strict.check(bytes) {
            Ok(()) => return Verdict::Valid,
            Err(reason) => reason,
        };
        match &self.best_effort {
            Some(rule) => match rule.check(bytes) {
                Ok(()) => Verdict::Degraded(reason),
                Err(fallback_reason) => Verdict::Invalid(format!("{reason}; {fallback_reason}")),
            },
            None => Verdict::Invalid(reason),
        }
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::archive().build()
    }
}

/// Builds the archive policy: `All[Signature, MinLen]` (plus SHA-256 if
/// given). When opted in, the best-effort rule drops only the signature.
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    signature: Vec<u8>,
    min_size: u64,
    sha256: Option<String>,
    best_effort: bool,
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self {
            signature: ZIP_SIGNATURE.to_vec(),
            min_size: DEFAULT_MIN_SIZE,
            sha256: None,
            best_effort: false,
        }
    }
}

impl PolicyBuilder {
    /// Expected leading bytes. An empty signature keeps the zip signature.
    pub fn signature(mut self, signature: impl Into<Vec<u8>>) -> Self {
        self.signature = signature.into();
        self
    }

    pub fn min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Expected lowercase hex digest; ANDed into the strict rule.
    pub fn sha256(mut self, digest: Option<String>) -> Self {
        self.sha256 = digest;
        self
    }

    /// Accept bodies that fail only the signature check when nothing passes strictly.
    pub fn best_effort(mut self, enabled: bool) -> Self {
        self.best_effort = enabled;
        self
    }

    pub fn build(self) -> ValidationPolicy {
        let min_len = ValidationRule::MinLen(self.min_size);
        let digest = self.sha256.map(ValidationRule::Sha256);

        // A signature can only be relaxed through best-effort mode.
        let signature = if self.signature.is_empty() {
            ZIP_SIGNATURE.to_vec()
        } else {
            self.signature
        };
        let mut strict = vec![ValidationRule::Signature(signature), min_len.clone()];
        strict.extend(digest.clone());
        let policy = ValidationPolicy::strict(ValidationRule::All(strict));

        if !self.best_effort {
            return policy;
        }
        match digest {
            Some(digest) => policy.with_best_effort(ValidationRule::All(vec![min_len, digest])),
            None => policy.with_best_effort(min_len),
        }
    }
}
