//! dwx-oauth: OAuth2 token grants for the Darwinex API.
//!
//! Exchanges a refresh token (or a resource owner's password) for a fresh
//! access token at the token endpoint, using Basic client authentication and
//! a form-encoded body.
//!
//! # Quick Start
//!
//! ```no_run
//! use dwx_oauth::auth::{ClientCredentials, TokenRefresher};
//!
//! # async fn example() -> dwx_oauth::error::Result<()> {
//! let refresher = TokenRefresher::new("https://api.darwinex.com/token")?;
//! let creds = ClientCredentials::new("consumer-key", "consumer-secret");
//!
//! // Raw pass-through: whatever the endpoint said, any status.
//! let raw = refresher.refresh_raw(&creds, "refresh-token").await?;
//! println!("{} {}", raw.status, raw.body);
//!
//! // Typed: Ok(Token) on 2xx, Err(RefreshError::Server { .. }) otherwise.
//! let token = refresher.refresh(&creds, "refresh-token").await?;
//! println!("{}", token.bearer_authorization());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
