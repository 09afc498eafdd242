//! Grant request bodies for the token endpoint.

use strum::{Display, EnumString};

use crate::auth::credentials::ResourceOwnerCredentials;
use crate::error::{RefreshError, Result};

/// Content type of every token endpoint request.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Scope requested by the password grant unless overridden.
pub const DEFAULT_SCOPE: &str = "openid";

/// OAuth2 grant types supported by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum GrantType {
    RefreshToken,
    Password,
}

/// A single grant request, encoded as a form body.
#[derive(Clone, PartialEq, Eq)]
pub enum GrantRequest {
    RefreshToken {
        refresh_token: String,
    },
    Password {
        owner: ResourceOwnerCredentials,
        scope: String,
    },
}

impl GrantRequest {
    pub fn refresh_token(refresh_token: impl Into<String>) -> Self {
        Self::RefreshToken {
            refresh_token: refresh_token.into(),
        }
    }

    pub fn password(owner: ResourceOwnerCredentials, scope: impl Into<String>) -> Self {
        Self::Password {
            owner,
            scope: scope.into(),
        }
    }

    pub fn grant_type(&self) -> GrantType {
        match self {
            Self::RefreshToken { .. } => GrantType::RefreshToken,
            Self::Password { .. } => GrantType::Password,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let missing = match self {
            Self::RefreshToken { refresh_token } if refresh_token.is_empty() => "refresh_token",
            Self::Password { owner, .. } if owner.username.is_empty() => "username",
            _ => return Ok(()),
        };
        Err(RefreshError::InvalidArgument(format!(
            "{missing} must not be empty"
        )))
    }

    /// Form fields in wire order. `grant_type` always comes first.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("grant_type", self.grant_type().to_string())];
        match self {
            Self::RefreshToken { refresh_token } => {
                fields.push(("refresh_token", refresh_token.clone()));
            }
            Self::Password { owner, scope } => {
                fields.push(("username", owner.username.clone()));
                fields.push(("password", owner.password.clone()));
                fields.push(("scope", scope.clone()));
            }
        }
        fields
    }

    /// `application/x-www-form-urlencoded` body for this grant.
    pub fn encode(&self) -> String {
        self.form_fields()
            .iter()
            .map(|(key, value)| format!("{}={}", form_encode(key), form_encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl std::fmt::Debug for GrantRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrantRequest")
            .field("grant_type", &self.grant_type())
            .finish_non_exhaustive()
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
///
/// Space becomes `%20`, not the `+` of HTML form posts; both decode to a
/// space under `application/x-www-form-urlencoded`, and a literal `+` in a
/// token is sent as `%2B` so it can never be read back as a space.
pub fn form_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn refresh_body_has_exactly_two_fields() {
        let body = GrantRequest::refresh_token("abc123").encode();
        assert_eq!(body, "grant_type=refresh_token&refresh_token=abc123");
    }

    #[test]
    fn reserved_characters_are_percent_encoded() {
        let body = GrantRequest::refresh_token("a&b=c+d e/f").encode();
        assert_eq!(
            body,
            "grant_type=refresh_token&refresh_token=a%26b%3Dc%2Bd%20e%2Ff"
        );
    }

    #[test]
    fn multibyte_characters_are_encoded_per_byte() {
        assert_eq!(form_encode("é"), "%C3%A9");
        assert_eq!(form_encode("safe-._~"), "safe-._~");
    }

    #[test]
    fn password_body_carries_scope() {
        let owner = ResourceOwnerCredentials::new("trader@example.com", "p@ss");
        let body = GrantRequest::password(owner, DEFAULT_SCOPE).encode();
        assert_eq!(
            body,
            "grant_type=password&username=trader%40example.com&password=p%40ss&scope=openid"
        );
    }

    #[test]
    fn grant_type_string_forms() {
        assert_eq!(GrantType::RefreshToken.to_string(), "refresh_token");
        assert_eq!("password".parse::<GrantType>().unwrap(), GrantType::Password);
    }

    #[test]
    fn empty_refresh_token_fails_validation() {
        assert!(GrantRequest::refresh_token("").validate().is_err());
        assert!(GrantRequest::refresh_token("abc").validate().is_ok());
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", GrantRequest::refresh_token("very-secret"));
        assert!(!rendered.contains("very-secret"));
    }
}
