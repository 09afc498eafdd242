use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RefreshError, Result};

/// Token set issued by the token endpoint.
///
/// # Example
/// ```
/// use dwx_oauth::auth::Token;
///
/// let token = Token::from_json(
///     r#"{"access_token":"abc","refresh_token":"def","expires_in":3600,"token_type":"Bearer"}"#,
/// )
/// .unwrap();
/// assert_eq!(token.bearer_authorization(), "Bearer abc");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub id_token: Option<String>,
    pub expires_in: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Parse a 2xx token endpoint body. `expires_at` is measured from now.
    pub fn from_json(body: &str) -> Result<Self> {
        let payload: TokenExchangeResponse = serde_json::from_str(body)
            .map_err(|e| RefreshError::InvalidResponse(format!("token body: {e}")))?;
        if payload.access_token.is_empty() {
            return Err(RefreshError::InvalidResponse(
                "token body has an empty access_token".to_string(),
            ));
        }
        Ok(token_from_exchange_response(payload, Utc::now()))
    }

    /// Value for the `Authorization` header of downstream API calls.
    pub fn bearer_authorization(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires_at| Utc::now() >= expires_at)
            .unwrap_or(false)
    }
}

/// Unparsed token endpoint answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTokenResponse {
    pub status: u16,
    pub body: String,
}

impl RawTokenResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON, `None` when it is not JSON at all.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Typed view: 2xx parses into a [`Token`], anything else is a server error.
    pub fn into_token(self) -> Result<Token> {
        if self.is_success() {
            Token::from_json(&self.body)
        } else {
            Err(RefreshError::Server {
                status: self.status,
                body: self.body,
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenExchangeResponse {
    access_token: String,
    refresh_token: Option<String>,
    token_type: Option<String>,
    scope: Option<String>,
    id_token: Option<String>,
    expires_in: Option<i64>,
}

fn token_from_exchange_response(
    payload: TokenExchangeResponse,
    received_at: DateTime<Utc>,
) -> Token {
    // Out-of-range lifetimes leave the expiry unknown.
    let expires_at = payload
        .expires_in
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| received_at.checked_add_signed(lifetime));
    Token {
        access_token: payload.access_token,
        refresh_token: payload.refresh_token,
        token_type: payload.token_type,
        scope: payload.scope,
        id_token: payload.id_token,
        expires_in: payload.expires_in,
        expires_at,
    }
}
