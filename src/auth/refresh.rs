use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::auth::credentials::{ClientCredentials, ResourceOwnerCredentials};
use crate::auth::grant::{GrantRequest, FORM_CONTENT_TYPE};
use crate::auth::token::{RawTokenResponse, Token};
use crate::auth::transport::{
    HttpTransport, ReqwestTransport, TokenHttpRequest, TransportOptions, DEFAULT_TIMEOUT,
};
use crate::config::RefreshConfig;
use crate::error::{RefreshError, Result};
use crate::util::with_timeout;

/// Performs OAuth2 grants against a single token endpoint.
///
/// Holds no token state: every call is independent and nothing passed in is
/// retained after it returns.
///
/// # Example
/// ```no_run
/// use dwx_oauth::auth::{ClientCredentials, TokenRefresher};
///
/// # async fn example() -> dwx_oauth::error::Result<()> {
/// let refresher = TokenRefresher::new("https://api.darwinex.com/token")?;
/// let creds = ClientCredentials::new("consumer-key", "consumer-secret");
/// let token = refresher.refresh(&creds, "refresh-token").await?;
/// println!("{}", token.access_token);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TokenRefresher {
    endpoint: String,
    transport: Option<Arc<dyn HttpTransport>>,
    timeout: Duration,
}

impl std::fmt::Debug for TokenRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRefresher")
            .field("endpoint", &self.endpoint)
            .field("transport", &self.transport.as_ref().map(|_| ".."))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TokenRefresher {
    /// Refresher with the default `reqwest` transport (TLS verified).
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_options(endpoint, &TransportOptions::default())
    }

    pub fn with_options(endpoint: impl Into<String>, options: &TransportOptions) -> Result<Self> {
        let transport = ReqwestTransport::new(options)?;
        let transport: Arc<dyn HttpTransport> = Arc::new(transport);
        Ok(Self::with_transport(endpoint, Some(transport)).with_timeout(options.timeout))
    }

    /// Refresher over an explicit transport; `None` means no HTTP capability
    /// and every call fails with [`RefreshError::TransportUnavailable`].
    pub fn with_transport(
        endpoint: impl Into<String>,
        transport: Option<Arc<dyn HttpTransport>>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(config: &RefreshConfig) -> Result<Self> {
        Self::with_options(&config.token_endpoint, &config.transport_options())
    }

    /// Bound on a whole transport call, including reading the body.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Refresh-token grant, returning the endpoint's answer unchanged.
    ///
    /// Any HTTP status is returned as-is; only a missing transport, a
    /// network failure or a timeout is an error.
    pub async fn refresh_raw(
        &self,
        credentials: &ClientCredentials,
        refresh_token: &str,
    ) -> Result<RawTokenResponse> {
        self.send(credentials, GrantRequest::refresh_token(refresh_token)).await
    }

    /// Refresh-token grant parsed into a [`Token`].
    ///
    /// Non-2xx answers become [`RefreshError::Server`].
    pub async fn refresh(
        &self,
        credentials: &ClientCredentials,
        refresh_token: &str,
    ) -> Result<Token> {
        self.refresh_raw(credentials, refresh_token)
            .await?
            .into_token()
    }

    /// Password grant, returning the endpoint's answer unchanged.
    pub async fn password_grant_raw(
        &self,
        credentials: &ClientCredentials,
        owner: &ResourceOwnerCredentials,
        scope: &str,
    ) -> Result<RawTokenResponse> {
        self.send(credentials, GrantRequest::password(owner.clone(), scope)).await
    }

    /// Password grant parsed into a [`Token`].
    pub async fn password_grant(
        &self,
        credentials: &ClientCredentials,
        owner: &ResourceOwnerCredentials,
        scope: &str,
    ) -> Result<Token> {
        self.password_grant_raw(credentials, owner, scope)
            .await?
            .into_token()
    }

    async fn send(
        &self,
        credentials: &ClientCredentials,
        grant: GrantRequest,
    ) -> Result<RawTokenResponse> {
        let transport = self
            .transport
            .as_ref()
            .ok_or(RefreshError::TransportUnavailable)?;
        credentials.validate()?;
        grant.validate()?;

        let request = TokenHttpRequest {
            url: self.endpoint.clone(),
            authorization: credentials.basic_authorization(),
            content_type: FORM_CONTENT_TYPE,
            body: grant.encode(),
        };

        debug!(
            endpoint = %self.endpoint,
            grant_type = %grant.grant_type(),
            client_id = %credentials.client_id(),
            "requesting token"
        );
        let response = with_timeout(self.timeout, transport.post_form(&request)).await?;
        debug!(
            endpoint = %self.endpoint,
            status = response.status,
            body_len = response.body.len(),
            "token endpoint responded"
        );
        Ok(response)
    }
}

/// One refresh-token exchange with the default transport; returns the raw body.
///
/// The body is returned for every HTTP status, so a `400` carrying
/// `{"error":"invalid_grant"}` is an `Ok`. Use [`TokenRefresher::refresh`]
/// for a typed result.
pub async fn refresh(
    endpoint: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<String> {
    let refresher = TokenRefresher::new(endpoint)?;
    let credentials = ClientCredentials::new(client_id, client_secret);
    Ok(refresher
        .refresh_raw(&credentials, refresh_token)
        .await?
        .body)
}
