//! Error taxonomy shared by every stage of the download pipeline.
//!
//! Nothing here is recovered internally: each variant surfaces to the caller
//! as soon as it happens. Upstream HTTP failures keep the status and body so
//! the caller can inspect what GitHub (or the file host) answered.

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The call site gave neither a complete URL nor a network location.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote answered with a status the caller does not accept.
    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UpstreamStatus {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("HTTP transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse commit timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The year filter was empty, so no year range can be reported.
    #[error("year filter is empty")]
    EmptyYearFilter,

    /// A year label that cannot be read as an integer.
    #[error("year {0:?} is not numeric")]
    InvalidYear(String),

    /// A downloaded table whose columns differ from the first table's.
    #[error("schema of {url} does not match the first table")]
    SchemaMismatch { url: String },

    #[error("no tables to aggregate")]
    NothingToAggregate,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
