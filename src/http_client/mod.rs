pub(crate) mod reqwest_client;

/// Errors returned by a [`Client`].
///
/// The first four variants are the classified failures Reddit signals through the status
/// code. They carry no data and can be matched directly.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("unauthorized access to endpoint")]
    PermissionDenied,
    #[error("Reddit is busy right now")]
    Busy,
    #[error("Reddit is rate limiting requests")]
    RateLimited,
    #[error("502 bad gateway code from Reddit")]
    Gateway,
    #[error("bad response code: {0}")]
    UnexpectedStatus(u16),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("invalid app configuration: {0}")]
    InvalidConfig(String),
    #[error("authorization failed: {0}")]
    Authorization(String),
}

impl ClientError {
    /// Maps a response status to its error. Returns `None` for `200 OK`.
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode) -> Option<Self> {
        match status {
            reqwest::StatusCode::OK => None,
            reqwest::StatusCode::FORBIDDEN => Some(Self::PermissionDenied),
            reqwest::StatusCode::SERVICE_UNAVAILABLE => Some(Self::Busy),
            reqwest::StatusCode::TOO_MANY_REQUESTS => Some(Self::RateLimited),
            reqwest::StatusCode::BAD_GATEWAY => Some(Self::Gateway),
            other => Some(Self::UnexpectedStatus(other.as_u16())),
        }
    }
}

/// Executes HTTP requests against Reddit and returns the raw response body.
///
/// Implementations perform no retries: a transport failure or any status other than
/// `200 OK` ends the call with a [`ClientError`].
#[async_trait::async_trait]
pub trait Client: Send + Sync {
    async fn execute(&self, request: reqwest::Request) -> Result<Vec<u8>, ClientError>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(ClientError::from_status(reqwest::StatusCode::OK).is_none());
        assert!(matches!(
            ClientError::from_status(reqwest::StatusCode::FORBIDDEN),
            Some(ClientError::PermissionDenied)
        ));
        assert!(matches!(
            ClientError::from_status(reqwest::StatusCode::SERVICE_UNAVAILABLE),
            Some(ClientError::Busy)
        ));
        assert!(matches!(
            ClientError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS),
            Some(ClientError::RateLimited)
        ));
        assert!(matches!(
            ClientError::from_status(reqwest::StatusCode::BAD_GATEWAY),
            Some(ClientError::Gateway)
        ));
        assert!(matches!(
            ClientError::from_status(reqwest::StatusCode::CREATED),
            Some(ClientError::UnexpectedStatus(201))
        ));
    }

    #[test]
    fn unexpected_status_message_carries_code() {
        let err = ClientError::UnexpectedStatus(500);
        assert_eq!("bad response code: 500", err.to_string());
    }
}
