use std::path::PathBuf;

use thiserror::Error;

/// Failures of the driver layer. Planning itself cannot fail.
#[derive(Error, Debug)]
pub enum ClonegenError {
    #[error("failed to resolve input pattern `{pattern}`: {message}")]
    InputPattern { pattern: String, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON pointer `{pointer}` selected nothing in {origin}")]
    PointerMiss { pointer: String, origin: String },

    #[error("invalid type declaration in {origin} at {location}: {message}")]
    Descriptor {
        origin: String,
        location: String,
        message: String,
    },

    #[error("jq filter failed on {origin}: {message}")]
    Jq { origin: String, message: String },
}

pub type ClonegenResult<T> = Result<T, ClonegenError>;
