//! `key=value` credentials file (`CONFIG/creds.cfg`).

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::auth::credentials::{ClientCredentials, ResourceOwnerCredentials};
use crate::error::{RefreshError, Result};

/// Default live credentials file, relative to the working directory.
pub const DEFAULT_CREDENTIALS_PATH: &str = "CONFIG/creds.cfg";
/// Default demo-account credentials file.
pub const DEMO_CREDENTIALS_PATH: &str = "CONFIG/creds_demo.cfg";

/// Parsed credentials file.
///
/// One `key=value` pair per line. Blank lines and lines starting with `#`
/// are skipped; the value is everything after the first `=`.
///
/// ```text
/// username=trader@example.com
/// password=...
/// client_id=...
/// client_secret=...
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CredentialsFile {
    values: HashMap<String, String>,
}

impl CredentialsFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RefreshError::Io(format!("{}: {e}", path.display())))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let mut values = HashMap::new();
        for (index, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                RefreshError::Configuration(format!(
                    "credentials line {} is not key=value",
                    index + 1
                ))
            })?;
            values.insert(key.trim().to_string(), value.trim().to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn client_credentials(&self) -> Result<ClientCredentials> {
        Ok(ClientCredentials::new(
            self.require("client_id")?,
            self.require("client_secret")?,
        ))
    }

    pub fn resource_owner(&self) -> Result<ResourceOwnerCredentials> {
        Ok(ResourceOwnerCredentials::new(
            self.require("username")?,
            self.require("password")?,
        ))
    }

    fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| {
            RefreshError::Configuration(format!("credentials file has no '{key}'"))
        })
    }
}

impl fmt::Debug for CredentialsFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.values.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("CredentialsFile").field("keys", &keys).finish()
    }
}
