pub mod config;
pub mod logging;

pub mod checksum;
pub mod error;
pub mod fetcher;
pub mod inspect;
pub mod source;
pub mod storage;
pub mod transport;
pub mod validate;

pub use error::{CandidateError, FetchError, PersistError, SourceError};
pub use fetcher::{
    ArtifactFetcher, AttemptOutcome, AttemptReport, FetchOptions, FetchReport, FetchRequest,
    FetchedArtifact,
};
pub use source::CandidateSources;
pub use validate::{ValidationPolicy, ValidationRule, Verdict};
