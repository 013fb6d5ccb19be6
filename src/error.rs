//! Error types for talking to the statistics backend.
//!
//! The aggregator catches every variant and degrades to zero-filled results,
//! so these never reach a renderer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    /// Transport error or non-success HTTP status
    #[error("Request to {endpoint} failed: {message}")]
    FetchFailure { endpoint: String, message: String },

    /// Body could not be decoded into the expected rows
    #[error("Malformed response from {endpoint}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid endpoint URL for {path}")]
    InvalidUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client")]
    ClientInit(#[source] reqwest::Error),
}

impl StatsError {
    pub fn fetch(endpoint: &str, message: impl Into<String>) -> Self {
        StatsError::FetchFailure {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }
}

pub type StatsResult<T> = Result<T, StatsError>;
