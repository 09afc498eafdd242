//! OAuth2 grants against the token endpoint.

pub mod credentials;
pub mod grant;
pub mod refresh;
pub mod token;
pub mod transport;

pub use credentials::{ClientCredentials, ResourceOwnerCredentials};
pub use grant::{GrantRequest, GrantType, DEFAULT_SCOPE, FORM_CONTENT_TYPE};
pub use refresh::{refresh, TokenRefresher};
pub use token::{RawTokenResponse, Token};
pub use transport::{HttpTransport, ReqwestTransport, TokenHttpRequest, TransportOptions};
