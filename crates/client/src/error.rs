//! Errors returned by the service clients.

use emporium_core::ErrorBody;
use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when calling an Emporium service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered 404.
    #[error("{service}: not found: {message}")]
    NotFound {
        service: &'static str,
        message: String,
    },

    /// The service could not be reached, answered 503, or the registry has
    /// no instance of it.
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        service: &'static str,
        reason: String,
    },

    /// The service rejected the request (400, 409, 422, ...).
    #[error("{service} rejected the request ({status}): {message}")]
    Rejected {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// The service failed while handling the request.
    #[error("{service} failed ({status}): {message}")]
    Server {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// The service answered 2xx with a body that does not fit.
    #[error("{service} returned an unexpected response: {detail}")]
    UnexpectedResponse {
        service: &'static str,
        detail: String,
    },

    /// Any other transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A configured service URL is malformed.
    #[error("invalid service url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The registry could not be built from its configuration.
    #[error("registry error: {0}")]
    Registry(#[from] emporium_discovery::RegistryError),
}

impl ClientError {
    /// Whether the failure means the service was not reachable at all.
    ///
    /// End-to-end callers skip instead of failing on these.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Whether the service answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Classify a transport error, treating connect failures and timeouts as
    /// unavailability.
    pub(crate) fn transport(service: &'static str, error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::Unavailable {
                service,
                reason: error.to_string(),
            }
        } else {
            Self::Http(error)
        }
    }

    /// Classify a non-success response. The body is the service's JSON
    /// error record when it sent one, raw text otherwise.
    pub(crate) fn from_status(service: &'static str, status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|error| error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());

        match status {
            StatusCode::NOT_FOUND => Self::NotFound { service, message },
            StatusCode::SERVICE_UNAVAILABLE => Self::Unavailable {
                service,
                reason: message,
            },
            s if s.is_client_error() => Self::Rejected {
                service,
                status: s.as_u16(),
                message,
            },
            s => Self::Server {
                service,
                status: s.as_u16(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_message_is_extracted() {
        let body = r#"{"status":400,"error":"Bad Request","message":"quantity must not be negative"}"#;
        let err = ClientError::from_status("product-service", StatusCode::BAD_REQUEST, body);
        assert!(matches!(
            &err,
            ClientError::Rejected { status: 400, message, .. } if message == "quantity must not be negative"
        ));
    }

    #[test]
    fn test_status_classification() {
        assert!(ClientError::from_status("user-service", StatusCode::NOT_FOUND, "").is_not_found());
        assert!(
            ClientError::from_status("user-service", StatusCode::SERVICE_UNAVAILABLE, "down")
                .is_unavailable()
        );
        assert!(matches!(
            ClientError::from_status("user-service", StatusCode::BAD_GATEWAY, "<html>"),
            ClientError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn test_display() {
        let err = ClientError::Unavailable {
            service: "order-service",
            reason: "no instances registered".to_string(),
        };
        assert_eq!(err.to_string(), "order-service unavailable: no instances registered");
    }
}
