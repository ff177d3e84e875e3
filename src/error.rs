//! Client-side error types.

use thiserror::Error;

/// Anything that keeps a request from producing a usable reply.
///
/// All variants take the same path in the UI ("Erreur de connexion");
/// the detail only goes to the log.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: connection refused, reset, timeout, invalid URL.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status whose body carried no application error.
    #[error("HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Body was not JSON.
    #[error("Invalid JSON body: {0}")]
    Decode(#[from] serde_json::Error),

    /// JSON, but neither an `error` nor a `response` string.
    #[error("Malformed reply: {0}")]
    Malformed(String),

    /// The request task went away before reporting back.
    #[error("Request task ended without a result")]
    Abandoned,
}

pub type Result<T> = std::result::Result<T, ClientError>;
