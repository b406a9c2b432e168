// crates/mietpreis-core/src/error.rs

//! Error types.
//!
//! [`Error`] is the low-level error of a single source or transport call.
//! The two boundary failures, [`GeoLoadFailure`] and [`SubmissionFailure`],
//! are what the view layer renders: plain cloneable values carrying a
//! user-visible message.

use thiserror::Error;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when a submission fails without a service-provided detail.
pub const GENERIC_SUBMISSION_MESSAGE: &str =
    "Die Mietpreis-Schätzung ist fehlgeschlagen. Bitte später erneut versuchen.";

pub const IN_FLIGHT_MESSAGE: &str = "Die Schätzung läuft bereits.";

/// Message shown when neither geo source produced a usable message.
pub const GENERIC_GEO_MESSAGE: &str = "Standortdaten konnten nicht geladen werden.";

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote end answered with a non-success status.
    #[error("{url} responded with status {status}")]
    Status {
        url: String,
        status: u16,
        detail: Option<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Message suitable for inline display, if this error carries one.
    ///
    /// A bare status without a service `detail`, or an empty description,
    /// has no usable message.
    pub fn user_message(&self) -> Option<String> {
        let msg = match self {
            Error::Status { detail, .. } => detail.clone().unwrap_or_default(),
            Error::NotFound(s) | Error::InvalidData(s) | Error::Config(s) => s.clone(),
            other => other.to_string(),
        };
        (!msg.trim().is_empty()).then_some(msg)
    }
}

/// Both geo sources failed.
///
/// Non-fatal: the location inputs stay disabled and `message` is shown inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GeoLoadFailure {
    pub message: String,
    /// Diagnostic description of the primary source's error.
    pub primary: String,
    /// Diagnostic description of the fallback source's error.
    pub fallback: String,
}

impl GeoLoadFailure {
    /// Combine the two source errors.
    ///
    /// The fallback's message is used when it has one, otherwise the
    /// primary's, otherwise a generic text.
    pub fn from_errors(primary: &Error, fallback: &Error) -> Self {
        let message = fallback
            .user_message()
            .or_else(|| primary.user_message())
            .unwrap_or_else(|| GENERIC_GEO_MESSAGE.to_string());

        GeoLoadFailure {
            message,
            primary: primary.to_string(),
            fallback: fallback.to_string(),
        }
    }
}

/// A prediction submission that did not produce a result.
///
/// Non-fatal: shown inline, other form fields are kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionFailure {
    /// The service answered with a non-success status.
    #[error("service rejected the request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// No response was received.
    #[error("service unreachable: {reason}")]
    Network { reason: String },

    /// A success status with a body that is not a prediction.
    #[error("invalid service response: {reason}")]
    InvalidResponse { reason: String },

    /// Another submission is still waiting for its response.
    #[error("a submission is already in flight")]
    InFlight,
}

impl SubmissionFailure {
    /// Builds a rejection from a non-2xx status and an optional service detail.
    pub fn rejected(status: u16, detail: Option<String>) -> Self {
        let message = detail
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| GENERIC_SUBMISSION_MESSAGE.to_string());
        SubmissionFailure::Rejected { status, message }
    }

    pub fn user_message(&self) -> &str {
        match self {
            SubmissionFailure::Rejected { message, .. } => message,
            SubmissionFailure::Network { .. } | SubmissionFailure::InvalidResponse { .. } => {
                GENERIC_SUBMISSION_MESSAGE
            }
            SubmissionFailure::InFlight => IN_FLIGHT_MESSAGE,
        }
    }
}

/// Misuse of the location selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("the geo index has not been loaded yet")]
    NotReady,

    #[error("a state must be selected before a city")]
    NoStateSelected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_prefers_service_detail() {
        let f = SubmissionFailure::rejected(422, Some("Ungültige PLZ".into()));
        assert_eq!(f.user_message(), "Ungültige PLZ");

        let f = SubmissionFailure::rejected(500, Some("   ".into()));
        assert_eq!(f.user_message(), GENERIC_SUBMISSION_MESSAGE);

        let f = SubmissionFailure::rejected(500, None);
        assert_eq!(f.user_message(), GENERIC_SUBMISSION_MESSAGE);
    }

    #[test]
    fn network_failure_uses_generic_message() {
        let f = SubmissionFailure::Network {
            reason: "connection refused".into(),
        };
        assert_eq!(f.user_message(), GENERIC_SUBMISSION_MESSAGE);
    }

    #[test]
    fn geo_failure_takes_fallback_message_first() {
        let primary = Error::Status {
            url: "http://x/geo".into(),
            status: 500,
            detail: Some("geo_data.json not found".into()),
        };
        let fallback = Error::NotFound("fallback missing".into());
        let f = GeoLoadFailure::from_errors(&primary, &fallback);
        assert_eq!(f.message, "fallback missing");
        assert_eq!(f.primary, "http://x/geo responded with status 500");
    }

    #[test]
    fn geo_failure_falls_back_to_primary_message() {
        let primary = Error::InvalidData("bad payload".into());
        let fallback = Error::Status {
            url: "http://x/geo_data.json".into(),
            status: 404,
            detail: None,
        };
        let f = GeoLoadFailure::from_errors(&primary, &fallback);
        assert_eq!(f.message, "bad payload");
        assert_eq!(f.fallback, "http://x/geo_data.json responded with status 404");
    }

    #[test]
    fn geo_failure_without_any_message_is_generic() {
        let primary = Error::Status {
            url: "http://x/geo".into(),
            status: 502,
            detail: None,
        };
        let fallback = Error::NotFound("  ".into());
        let f = GeoLoadFailure::from_errors(&primary, &fallback);
        assert_eq!(f.message, GENERIC_GEO_MESSAGE);
    }
}
