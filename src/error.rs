//! Request-level error type and its HTTP status mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::extract::ExtractError;
use crate::fetch::FetchError;

/// Everything that can fail while answering a feed request.
///
/// All variants propagate uncaught to the adapter boundary; the only local
/// recovery in the pipeline is the title-selector fallback in [`crate::extract`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("invalid verification code")]
    InvalidCode,
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("failed to write feed XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCode => StatusCode::FORBIDDEN,
            // A bad encoding name is the caller's mistake; anything else from
            // the fetch is the upstream page failing us.
            Error::Fetch(FetchError::UnknownCharset(_)) => StatusCode::BAD_REQUEST,
            Error::Fetch(_) => StatusCode::BAD_GATEWAY,
            Error::Extract(_) => StatusCode::BAD_REQUEST,
            Error::Xml(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request pipeline failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, self.to_string()).into_response()
    }
}
