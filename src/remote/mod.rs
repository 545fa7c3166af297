pub mod client;

pub use client::JiraClient;

use thiserror::Error;

/// Error type for calls to the Jira REST API
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("missing credentials: {0}")]
    Credentials(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Jira returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("unexpected response shape: {0}")]
    Malformed(String),
}

/// Server-side classification of one scoped query.
///
/// `valid` is true exactly when the server reported zero errors; warnings
/// never affect validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCheck {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}
