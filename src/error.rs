//! Error types shared by the four functions.

use lambda_http::{Body, Response};
use thiserror::Error;

use crate::http::error_response;

/// Problems detected while resolving settings at cold start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("{name} is not a valid port: {value:?}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{name} is not a valid mailbox: {value:?}")]
    InvalidMailbox { name: &'static str, value: String },
}

/// Failures from the SMTP side.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("{0}")]
    Build(#[from] lettre::error::Error),

    #[error("{0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),

    #[error("{0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Failures from the projects database.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// Why an uploaded file did not make it into the email.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("file has no content")]
    MissingContent,

    #[error("file has no name")]
    MissingName,

    #[error("file content is not valid base64: {0}")]
    Decode(String),
}

/// Per-request failures, each mapped onto a status code and `{ "error": .. }` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Body could not be read as the expected JSON shape.
    #[error("{0}")]
    MalformedBody(&'static str),

    #[error("{0}")]
    MissingFields(&'static str),

    /// SMTP failure, prefixed by the function's own wording.
    #[error("{prefix}{source}")]
    Delivery {
        prefix: &'static str,
        #[source]
        source: MailError,
    },

    #[error("{0}")]
    Query(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::MethodNotAllowed => 405,
            ApiError::MalformedBody(_) | ApiError::MissingFields(_) => 400,
            ApiError::Delivery { .. } | ApiError::Query(_) => 500,
        }
    }

    pub fn into_response(self) -> Response<Body> {
        error_response(self.status(), &self.to_string())
    }
}
