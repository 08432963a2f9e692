//! Error taxonomy for the aggregation layer.
//!
//! Only two failure kinds exist: a caller bug (`InvalidArgument`) and an
//! unreadable/unparsable snapshot file. An empty result set is *not* an
//! error — every aggregate returns `Option<f64>` and `None` is the no-data
//! marker the presentation layer renders as a dash.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Unknown entity type, feature name, or standings field passed by a
    /// caller. A programming error, surfaced immediately rather than
    /// masked as an empty result.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A snapshot file could not be read.
    #[error("snapshot unavailable: {path}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot file was read but is not valid JSON for its schema.
    #[error("snapshot malformed: {path}")]
    SourceMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
