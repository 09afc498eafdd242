//! HTTP transport seam for token endpoint calls.

use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::redirect::Policy;

use crate::auth::token::RawTokenResponse;
use crate::error::{RefreshError, Result};
use crate::util::timeout_millis;

/// Default bound on a single token endpoint round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A fully built token endpoint POST.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenHttpRequest {
    pub url: String,
    pub authorization: String,
    pub content_type: &'static str,
    pub body: String,
}

impl std::fmt::Debug for TokenHttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenHttpRequest")
            .field("url", &self.url)
            .field("content_type", &self.content_type)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

/// HTTP capability used by [`crate::auth::TokenRefresher`].
///
/// Implementations must not follow redirects and must return the body for
/// every status code; only transport-level failures are errors. A body that
/// is not UTF-8 is [`RefreshError::InvalidResponse`] rather than lossily
/// decoded, so a pass-through body is always the bytes the server sent.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_form(&self, request: &TokenHttpRequest) -> Result<RawTokenResponse>;
}

/// Options for the production transport.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use dwx_oauth::auth::TransportOptions;
///
/// let options = TransportOptions::builder()
///     .timeout(Duration::from_secs(10))
///     .build();
/// assert!(!options.accept_invalid_certs);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct TransportOptions {
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    /// Skip TLS certificate verification.
    ///
    /// Unsafe: anyone on the network path can impersonate the token
    /// endpoint and harvest the client secret and refresh token.
    #[builder(default)]
    pub accept_invalid_certs: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// [`HttpTransport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(options: &TransportOptions) -> Result<Self> {
        if options.accept_invalid_certs {
            tracing::warn!("TLS certificate verification disabled for token endpoint");
        }
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()
            .map_err(|e| RefreshError::Configuration(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            timeout: options.timeout,
        })
    }

    fn map_send_error(&self, error: reqwest::Error) -> RefreshError {
        if error.is_timeout() {
            tracing::debug!(error = %error, "token endpoint request timed out");
            return RefreshError::Timeout(timeout_millis(self.timeout));
        }
        error.into()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_form(&self, request: &TokenHttpRequest) -> Result<RawTokenResponse> {
        let resp = self
            .client
            .post(&request.url)
            .header(AUTHORIZATION, &request.authorization)
            .header(CONTENT_TYPE, request.content_type)
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = resp.status().as_u16();
        let bytes = resp.bytes().await.map_err(|e| self.map_send_error(e))?;
        let body = String::from_utf8(bytes.to_vec()).map_err(|_| {
            RefreshError::InvalidResponse(format!(
                "token endpoint answered {status} with a body that is not valid UTF-8"
            ))
        })?;
        Ok(RawTokenResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_verify_tls() {
        let options = TransportOptions::default();
        assert_eq!(options.timeout, DEFAULT_TIMEOUT);
        assert!(!options.accept_invalid_certs);
    }

    #[test]
    fn request_debug_omits_credentials() {
        let request = TokenHttpRequest {
            url: "https://api.darwinex.com/token".to_string(),
            authorization: "Basic c2VjcmV0".to_string(),
            content_type: "application/x-www-form-urlencoded",
            body: "grant_type=refresh_token&refresh_token=xyz".to_string(),
        };
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("c2VjcmV0"));
        assert!(!rendered.contains("xyz"));
        assert!(rendered.contains("api.darwinex.com"));
    }

    #[tokio::test]
    async fn builds_client_with_and_without_verification() {
        assert!(ReqwestTransport::new(&TransportOptions::default()).is_ok());
        let insecure = TransportOptions::builder().accept_invalid_certs(true).build();
        assert!(ReqwestTransport::new(&insecure).is_ok());
    }
}
