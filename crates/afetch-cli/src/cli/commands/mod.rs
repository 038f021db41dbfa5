//! CLI command handlers, one file per command.

mod checksum;
mod completions;
mod fetch;
mod inspect;
mod policy;

pub use checksum::run_checksum;
pub use completions::{run_completions, run_man};
pub use fetch::run_fetch;
pub use inspect::run_inspect;

#[cfg(test)]
pub use fetch::plan_fetch;
#[cfg(test)]
pub use policy::parse_signature;
