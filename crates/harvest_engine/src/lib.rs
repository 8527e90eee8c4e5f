//! Harvest engine: search API access and atomic artifact persistence.
mod persist;
mod search;
mod types;

pub use persist::{write_atomic, PersistError};
pub use search::{ClientBuildError, SearchApi, SearchSettings, YoutubeSearchClient};
pub use types::{FailureKind, PageOutcome, SearchFailure, SearchPage};
