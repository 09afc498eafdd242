//! Configuration (layered: explicit values > env > credentials file).

pub mod credentials_file;

pub use credentials_file::CredentialsFile;

use std::fmt;
use std::time::Duration;

use crate::auth::credentials::ClientCredentials;
use crate::auth::transport::{TransportOptions, DEFAULT_TIMEOUT};
use crate::error::{RefreshError, Result};

/// Token endpoint used when nothing else is configured.
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.darwinex.com/token";

pub const ENV_TOKEN_ENDPOINT: &str = "DWX_TOKEN_ENDPOINT";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "DWX_HTTP_TIMEOUT_SECS";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "DWX_DANGER_ACCEPT_INVALID_CERTS";
pub const ENV_CLIENT_ID: &str = "DWX_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "DWX_CLIENT_SECRET";
pub const ENV_REFRESH_TOKEN: &str = "DWX_REFRESH_TOKEN";

/// Settings for talking to the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    pub token_endpoint: String,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub refresh_token: Option<String>,
}

impl fmt::Debug for RefreshConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshConfig")
            .field("token_endpoint", &self.token_endpoint)
            .field("timeout", &self.timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| ".."))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
            client_id: None,
            client_secret: None,
            refresh_token: None,
        }
    }
}

impl RefreshConfig {
    /// Load from environment variables (`DWX_TOKEN_ENDPOINT`, `DWX_CLIENT_ID`, ...).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(endpoint) = get(ENV_TOKEN_ENDPOINT) {
            config.token_endpoint = endpoint;
        }
        if let Some(raw) = get(ENV_HTTP_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                RefreshError::Configuration(format!(
                    "{ENV_HTTP_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            if secs == 0 {
                return Err(RefreshError::Configuration(format!(
                    "{ENV_HTTP_TIMEOUT_SECS} must be greater than zero"
                )));
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = get(ENV_ACCEPT_INVALID_CERTS) {
            config.accept_invalid_certs = parse_flag(ENV_ACCEPT_INVALID_CERTS, &raw)?;
        }
        config.client_id = get(ENV_CLIENT_ID);
        config.client_secret = get(ENV_CLIENT_SECRET);
        config.refresh_token = get(ENV_REFRESH_TOKEN);
        Ok(config)
    }

    /// Fill unset credentials from a credentials file.
    pub fn merge_file(mut self, file: &CredentialsFile) -> Self {
        if self.client_id.is_none() {
            self.client_id = file.get("client_id").map(str::to_string);
        }
        if self.client_secret.is_none() {
            self.client_secret = file.get("client_secret").map(str::to_string);
        }
        if self.refresh_token.is_none() {
            self.refresh_token = file.get("refresh_token").map(str::to_string);
        }
        self
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions::builder()
            .timeout(self.timeout)
            .accept_invalid_certs(self.accept_invalid_certs)
            .build()
    }

    pub fn client_credentials(&self) -> Result<ClientCredentials> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => Ok(ClientCredentials::new(id, secret)),
            (None, _) => Err(missing("client_id", ENV_CLIENT_ID)),
            (_, None) => Err(missing("client_secret", ENV_CLIENT_SECRET)),
        }
    }

    pub fn require_refresh_token(&self) -> Result<&str> {
        self.refresh_token
            .as_deref()
            .ok_or_else(|| missing("refresh_token", ENV_REFRESH_TOKEN))
    }
}

fn missing(field: &str, env_var: &str) -> RefreshError {
    RefreshError::Configuration(format!("{field} not configured (set {env_var})"))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(RefreshError::Configuration(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_verify_tls_against_darwinex() {
        let config = RefreshConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.token_endpoint, DEFAULT_TOKEN_ENDPOINT);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.accept_invalid_certs);
        assert!(config.client_credentials().is_err());
    }

    #[test]
    fn reads_all_settings() {
        let config = RefreshConfig::from_lookup(lookup(&[
            (ENV_TOKEN_ENDPOINT, "http://localhost:8080/token"),
            (ENV_HTTP_TIMEOUT_SECS, "12"),
            (ENV_ACCEPT_INVALID_CERTS, "TRUE"),
            (ENV_CLIENT_ID, "id"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_REFRESH_TOKEN, "refresh"),
        ]))
        .unwrap();
        assert_eq!(config.token_endpoint, "http://localhost:8080/token");
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert!(config.accept_invalid_certs);
        assert_eq!(config.client_credentials().unwrap().client_id(), "id");
        assert_eq!(config.require_refresh_token().unwrap(), "refresh");
        assert!(config.transport_options().accept_invalid_certs);
    }

    #[test]
    fn rejects_bad_timeout_and_flag() {
        let bad_timeout = RefreshConfig::from_lookup(lookup(&[(ENV_HTTP_TIMEOUT_SECS, "soon")]));
        assert!(matches!(bad_timeout, Err(RefreshError::Configuration(_))));
        let zero_timeout = RefreshConfig::from_lookup(lookup(&[(ENV_HTTP_TIMEOUT_SECS, "0")]));
        assert!(matches!(zero_timeout, Err(RefreshError::Configuration(_))));
        let bad_flag = RefreshConfig::from_lookup(lookup(&[(ENV_ACCEPT_INVALID_CERTS, "maybe")]));
        assert!(matches!(bad_flag, Err(RefreshError::Configuration(_))));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = RefreshConfig::from_lookup(lookup(&[(ENV_CLIENT_ID, "  ")])).unwrap();
        assert!(config.client_id.is_none());
    }

    #[test]
    fn file_fills_only_missing_credentials() {
        let file = CredentialsFile::parse(
            "client_id=file-id\nclient_secret=file-secret\nrefresh_token=file-refresh\n",
        )
        .unwrap();
        let config = RefreshConfig::from_lookup(lookup(&[(ENV_CLIENT_ID, "env-id")]))
            .unwrap()
            .merge_file(&file);
        let creds = config.client_credentials().unwrap();
        assert_eq!(creds.client_id(), "env-id");
        assert_eq!(creds.client_secret(), "file-secret");
        assert_eq!(config.require_refresh_token().unwrap(), "file-refresh");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = RefreshConfig {
            client_secret: Some("top-secret".to_string()),
            refresh_token: Some("long-lived".to_string()),
            ..RefreshConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(!rendered.contains("long-lived"));
    }
}
