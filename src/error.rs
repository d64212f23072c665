//! Error taxonomy for calls to the clinic API.
//!
//! ERROR HANDLING
//! ==============
//! Validation failures carry the API's per-field messages so forms can
//! annotate inputs; everything else collapses to a single display message.
//! `user_message` is what a toast shows.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use std::collections::BTreeMap;

use serde::Deserialize;

/// Per-field validation messages keyed by input name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

const FALLBACK_MESSAGE: &str = "Request failed. Please try again.";

/// Failure talking to the clinic API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The API rejected the payload with field-level errors.
    #[error("validation failed: {message}")]
    Validation { message: String, fields: FieldErrors },
    /// Non-success status without field errors (bad credentials, 401, 500).
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// Login/register returned success but no bearer token.
    #[error("authentication response did not include a token")]
    MissingToken,
    /// The request never produced a response.
    #[error("network error: {0}")]
    Transport(String),
    /// The response body did not match the endpoint's envelope.
    #[error("unexpected response shape: {0}")]
    Decode(String),
    /// No HTTP transport is available on this target.
    #[error("api not available in this environment")]
    Unavailable,
    /// The owner of the request was torn down before it resolved.
    #[error("request cancelled")]
    Cancelled,
}

/// Error body shape: `{ message?, errors?: { field: [String] } }`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<FieldErrors>,
}

impl ApiError {
    /// Build an error from a non-success HTTP status and its raw body.
    ///
    /// Bodies that are not JSON fall back to a status-only message.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let fields: FieldErrors = parsed
            .errors
            .unwrap_or_default()
            .into_iter()
            .filter(|(_, msgs)| !msgs.is_empty())
            .collect();

        if !fields.is_empty() {
            let message = parsed
                .message
                .or_else(|| fields.values().flatten().next().cloned())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_owned());
            return Self::Validation { message, fields };
        }

        let message = parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("status {status}"));
        Self::Rejected { status, message }
    }

    /// Field-level errors, empty unless this is a validation failure.
    #[must_use]
    pub fn field_errors(&self) -> &FieldErrors {
        static EMPTY: FieldErrors = BTreeMap::new();
        match self {
            Self::Validation { fields, .. } => fields,
            _ => &EMPTY,
        }
    }

    /// First message for `field`, if any.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors().get(field).and_then(|msgs| msgs.first()).map(String::as_str)
    }

    /// Message suitable for a transient notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, fields } => fields
                .values()
                .flatten()
                .next()
                .cloned()
                .unwrap_or_else(|| message.clone()),
            Self::Rejected { message, .. } => message.clone(),
            Self::MissingToken => "Login failed: no session was issued.".to_owned(),
            Self::Transport(_) => "Could not reach the clinic server.".to_owned(),
            Self::Decode(_) | Self::Unavailable => FALLBACK_MESSAGE.to_owned(),
            Self::Cancelled => "Request cancelled.".to_owned(),
        }
    }

    /// Whether the session token was refused (expired or revoked).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Rejected { status: 401 | 419, .. })
    }
}
