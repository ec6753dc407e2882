//! Error types shared across the crate.
//!
//! Lookup faults are isolated per channel and never abort a round. Store
//! and config faults surface at startup and are fatal to the operator.

use std::path::PathBuf;

use thiserror::Error;

use crate::channel::Platform;

/// Failure of a single provider lookup.
///
/// "Not live" is never one of these: a channel that is offline is a
/// successful lookup with `is_live == false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid channel entry: {0}")]
    InvalidEntry(String),

    #[error("{entry} channel sent to the {client} client")]
    PlatformMismatch { entry: Platform, client: Platform },

    #[error("lookup task aborted: {0}")]
    Aborted(String),
}

impl LookupError {
    /// Classify a transport error from reqwest.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::NetworkFailure(err.to_string())
        }
    }

    /// Classify a non-success HTTP status.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = if body.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {}", body.chars().take(200).collect::<String>())
        };
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized(detail)
            }
            _ => Self::NetworkFailure(detail),
        }
    }
}

/// Failure to turn a requested name into a playable URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("'{0}' is not in the live set")]
    NotFound(String),

    #[error("no channel name given")]
    EmptyName,
}

/// Channel list persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("channel store {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    CorruptRow {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("field {0:?} cannot contain commas, quotes or newlines")]
    InvalidField(String),

    #[error("channel '{0}' is already in the list")]
    Duplicate(String),
}

/// Startup configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing credential: set {0} in the environment or .env")]
    MissingCredential(&'static str),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// External player errors.
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::live::providers::testing::{local_client, serve_once};

    #[test]
    fn auth_statuses_are_unauthorized() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            assert!(matches!(
                LookupError::from_status(status, ""),
                LookupError::Unauthorized(_)
            ));
        }
        assert_eq!(
            LookupError::from_status(StatusCode::UNAUTHORIZED, ""),
            LookupError::Unauthorized("401 Unauthorized".into())
        );
    }

    #[test]
    fn other_statuses_are_network_failures() {
        assert_eq!(
            LookupError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            LookupError::NetworkFailure("500 Internal Server Error: boom".into())
        );
        for status in [StatusCode::TOO_MANY_REQUESTS, StatusCode::NOT_FOUND, StatusCode::BAD_GATEWAY] {
            assert!(matches!(
                LookupError::from_status(status, "{}"),
                LookupError::NetworkFailure(_)
            ));
        }
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(1000);
        let LookupError::NetworkFailure(detail) =
            LookupError::from_status(StatusCode::SERVICE_UNAVAILABLE, &body)
        else {
            panic!("expected a network failure");
        };
        assert_eq!(detail.len(), "503 Service Unavailable: ".len() + 200);
    }

    #[tokio::test]
    async fn refused_connection_is_network_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = local_client()
            .get(format!("http://{addr}/"))
            .send()
            .await
            .unwrap_err();
        assert!(matches!(
            LookupError::from_transport(&err),
            LookupError::NetworkFailure(_)
        ));
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed_response() {
        let (base, server) = serve_once("200 OK", "<html>not json</html>").await;
        let err = local_client()
            .get(base)
            .send()
            .await
            .unwrap()
            .json::<serde_json::Value>()
            .await
            .unwrap_err();
        assert!(matches!(
            LookupError::from_transport(&err),
            LookupError::MalformedResponse(_)
        ));
        server.await.unwrap();
    }
}
