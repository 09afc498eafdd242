//! CLI command handlers for the refresh and password grants.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::auth::{RawTokenResponse, ResourceOwnerCredentials, TokenRefresher};
use crate::cli::{ClientArgs, LoginArgs, RefreshArgs};
use crate::config::credentials_file::{DEFAULT_CREDENTIALS_PATH, DEMO_CREDENTIALS_PATH};
use crate::config::{CredentialsFile, RefreshConfig};
use crate::error::RefreshError;

/// Handle `dwx-oauth refresh`.
pub async fn handle_refresh(args: RefreshArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, _) = resolve_config(&args.client)?;
    if args.refresh_token.is_some() {
        config.refresh_token = args.refresh_token;
    }
    let credentials = config.client_credentials()?;
    let refresh_token = config.require_refresh_token()?;

    let refresher = TokenRefresher::from_config(&config)?;
    let response = refresher.refresh_raw(&credentials, refresh_token).await?;
    emit(&response, args.client.raw)
}

/// Handle `dwx-oauth login`.
pub async fn handle_login(args: LoginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (config, file) = resolve_config(&args.client)?;
    let credentials = config.client_credentials()?;
    let from_file = |key: &str| {
        file.as_ref()
            .and_then(|file| file.get(key))
            .map(str::to_string)
    };
    let username = args
        .username
        .or_else(|| from_file("username"))
        .ok_or_else(|| RefreshError::Configuration("username not configured".into()))?;
    let password = args
        .password
        .or_else(|| from_file("password"))
        .ok_or_else(|| RefreshError::Configuration("password not configured".into()))?;
    let owner = ResourceOwnerCredentials::new(username, password);

    let refresher = TokenRefresher::from_config(&config)?;
    let response = refresher
        .password_grant_raw(&credentials, &owner, &args.scope)
        .await?;
    emit(&response, args.client.raw)
}

/// Layer config: env, then the credentials file, then explicit flags.
pub fn resolve_config(
    args: &ClientArgs,
) -> Result<(RefreshConfig, Option<CredentialsFile>), RefreshError> {
    layer_config(RefreshConfig::from_env()?, args)
}

/// Apply the credentials file and explicit flags on top of `config`.
pub fn layer_config(
    mut config: RefreshConfig,
    args: &ClientArgs,
) -> Result<(RefreshConfig, Option<CredentialsFile>), RefreshError> {
    let file = match credentials_path(args) {
        Some(path) => Some(CredentialsFile::load(&path)?),
        None => None,
    };
    if let Some(file) = &file {
        config = config.merge_file(file);
    }

    if let Some(endpoint) = &args.endpoint {
        config.token_endpoint = endpoint.clone();
    }
    if let Some(client_id) = &args.client_id {
        config.client_id = Some(client_id.clone());
    }
    if let Some(client_secret) = &args.client_secret {
        config.client_secret = Some(client_secret.clone());
    }
    if let Some(secs) = args.timeout_secs {
        if secs == 0 {
            return Err(RefreshError::Configuration(
                "--timeout-secs must be greater than zero".to_string(),
            ));
        }
        config.timeout = Duration::from_secs(secs);
    }
    if args.insecure {
        config.accept_invalid_certs = true;
    }
    Ok((config, file))
}

/// Explicit path, else the demo or live default file when it exists.
fn credentials_path(args: &ClientArgs) -> Option<PathBuf> {
    if let Some(path) = &args.credentials {
        return Some(path.clone());
    }
    let default = if args.demo {
        DEMO_CREDENTIALS_PATH
    } else {
        DEFAULT_CREDENTIALS_PATH
    };
    Path::new(default).exists().then(|| PathBuf::from(default))
}

fn emit(response: &RawTokenResponse, raw: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_body(response, raw));
    if response.is_success() {
        info!(status = response.status, "token endpoint accepted the grant");
        Ok(())
    } else {
        warn!(status = response.status, "token endpoint rejected the grant");
        Err(format!("token endpoint returned status {}", response.status).into())
    }
}

/// Decoded JSON, pretty-printed; `null` when the body is not JSON.
pub fn render_body(response: &RawTokenResponse, raw: bool) -> String {
    if raw {
        return response.body.clone();
    }
    let value = response.json().unwrap_or(serde_json::Value::Null);
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> RawTokenResponse {
        RawTokenResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn renders_pretty_json() {
        let rendered = render_body(&response(200, r#"{"access_token":"abc"}"#), false);
        assert_eq!(rendered, "{\n  \"access_token\": \"abc\"\n}");
    }

    #[test]
    fn non_json_renders_null_unless_raw() {
        let resp = response(502, "Bad Gateway");
        assert_eq!(render_body(&resp, false), "null");
        assert_eq!(render_body(&resp, true), "Bad Gateway");
    }

    #[test]
    fn explicit_credentials_path_wins() {
        let args = ClientArgs {
            credentials: Some(PathBuf::from("/tmp/other.cfg")),
            demo: true,
            ..ClientArgs::default()
        };
        assert_eq!(credentials_path(&args), Some(PathBuf::from("/tmp/other.cfg")));
    }

    #[test]
    fn flags_override_credentials_file() {
        let temp = tempfile::TempDir::new().expect("tempdir");
        let path = temp.path().join("creds.cfg");
        std::fs::write(
            &path,
            "client_id=file-id\nclient_secret=file-secret\nrefresh_token=file-refresh\n",
        )
        .expect("write creds");
        let args = ClientArgs {
            credentials: Some(path),
            client_id: Some("flag-id".to_string()),
            endpoint: Some("http://127.0.0.1:1/token".to_string()),
            insecure: true,
            timeout_secs: Some(3),
            ..ClientArgs::default()
        };

        let (config, file) = layer_config(RefreshConfig::default(), &args).unwrap();

        assert!(file.is_some());
        assert_eq!(config.token_endpoint, "http://127.0.0.1:1/token");
        assert!(config.accept_invalid_certs);
        assert_eq!(config.timeout, Duration::from_secs(3));
        let creds = config.client_credentials().unwrap();
        assert_eq!(creds.client_id(), "flag-id");
        assert_eq!(creds.client_secret(), "file-secret");
    }

    #[test]
    fn zero_timeout_flag_is_rejected() {
        let args = ClientArgs {
            timeout_secs: Some(0),
            ..ClientArgs::default()
        };
        let result = layer_config(RefreshConfig::default(), &args);
        assert!(matches!(result, Err(RefreshError::Configuration(_))));
    }
}
