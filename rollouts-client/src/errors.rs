use std::io;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure to fetch a resource tree. The watch loop retries transient
/// errors on the next tick and stops on fatal ones.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Transient(#[source] BoxError),
    #[error("{0}")]
    Fatal(#[source] BoxError),
}

impl FetchError {
    pub fn transient(err: impl Into<BoxError>) -> Self {
        FetchError::Transient(err.into())
    }

    pub fn fatal(err: impl Into<BoxError>) -> Self {
        FetchError::Fatal(err.into())
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::Fatal(_))
    }
}

impl From<kube::Error> for FetchError {
    fn from(err: kube::Error) -> Self {
        // missing object or no access to it: retrying will not help
        let fatal = match &err {
            kube::Error::Api(resp) => matches!(resp.code, 401 | 403 | 404),
            kube::Error::SerdeError(_) => true,
            _ => false,
        };
        if fatal {
            FetchError::fatal(err)
        } else {
            FetchError::transient(err)
        }
    }
}

/// Failure while looking up completion candidates. Never shown to the
/// user; completion degrades to an empty list.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("unable to resolve namespace: {0}")]
    Namespace(#[source] BoxError),
    #[error("unknown resource kind {0}")]
    UnknownKind(String),
    #[error("invalid name template: {0}")]
    Template(String),
    #[error(transparent)]
    Kube(#[from] kube::Error),
    #[error(transparent)]
    Json(#[from] k8s_openapi::serde_json::Error),
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "rollouts.argoproj.io \"guestbook\" not found".to_string(),
            reason: "NotFound".to_string(),
            code,
        })
    }

    #[test]
    fn test_missing_resource_is_fatal() {
        assert!(FetchError::from(api_error(404)).is_fatal());
        assert!(FetchError::from(api_error(403)).is_fatal());
    }

    #[test]
    fn test_server_errors_are_transient() {
        assert!(!FetchError::from(api_error(500)).is_fatal());
        assert!(!FetchError::from(api_error(429)).is_fatal());
    }

    #[test]
    fn test_message_is_preserved() {
        let err = FetchError::transient("connection reset");
        assert_eq!(err.to_string(), "connection reset");
    }
}
