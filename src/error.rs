//! Failure taxonomy for the report pipeline.
//!
//! Every variant is recovered at the point of use: the caller logs it and
//! carries on with an empty or no-op result.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    /// A required environment credential is absent or empty.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// Fetch or send against an external service failed.
    #[error("network failure: {0}")]
    Network(String),

    /// The sent-URL history could not be read or written.
    #[error("failed to persist history to {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sent-URL history exists but is not a JSON array of strings.
    #[error("malformed history file {}: {source}", .path.display())]
    MalformedState {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DigestError {
    /// Collapse an `anyhow` chain from the HTTP plumbing into a network failure.
    pub fn network(err: &anyhow::Error) -> Self {
        Self::Network(format!("{err:#}"))
    }
}
