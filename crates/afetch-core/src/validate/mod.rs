//! Validation of fetched bytes.
//!
//! A [`ValidationRule`] is a predicate over a byte buffer; a
//! [`ValidationPolicy`] pairs the strict rule with an optional best-effort
//! fallback that must be enabled explicitly.

mod policy;
mod rule;

pub use policy::{PolicyBuilder, ValidationPolicy, Verdict, DEFAULT_MIN_SIZE, ZIP_SIGNATURE};
pub use rule::ValidationRule;
