//! Provider error types.

use thiserror::Error;

use eduflex_core::error::CoreError;

/// Errors that can occur when talking to a remote collaborator.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The service rejected our credentials.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The service returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The configured endpoint is not a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ProviderError {
    /// Classify a transport error from reqwest.
    pub(crate) fn from_transport(e: reqwest::Error, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout(timeout_secs)
        } else {
            ProviderError::NetworkError(e.to_string())
        }
    }
}

impl From<ProviderError> for CoreError {
    fn from(e: ProviderError) -> Self {
        CoreError::external(e.to_string())
    }
}

/// Turn a non-success response into an error, passing successes through.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    if status == 401 || status == 403 {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::AuthenticationFailed(body));
    }
    if status >= 400 {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::ApiError {
            status,
            message: body,
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_external_service_error() {
        let err: CoreError = ProviderError::ApiError {
            status: 503,
            message: "down".into(),
        }
        .into();
        assert!(err.is_external());
        assert!(err.to_string().contains("503"));

        let err: CoreError = ProviderError::Timeout(30).into();
        assert!(err.to_string().contains("30s"));
    }
}
