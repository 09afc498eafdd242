#![allow(dead_code)]

use std::time::Duration;

use dwx_oauth::auth::{ClientCredentials, TokenRefresher, TransportOptions};
use wiremock::MockServer;

pub const CLIENT_ID: &str = "consumer-key";
pub const CLIENT_SECRET: &str = "consumer-secret";
pub const BASIC_HEADER: &str = "Basic Y29uc3VtZXIta2V5OmNvbnN1bWVyLXNlY3JldA==";
pub const FORM: &str = "application/x-www-form-urlencoded";

pub fn credentials() -> ClientCredentials {
    ClientCredentials::new(CLIENT_ID, CLIENT_SECRET)
}

pub fn token_url(server: &MockServer) -> String {
    format!("{}/token", server.uri())
}

pub fn refresher(server: &MockServer) -> TokenRefresher {
    TokenRefresher::new(token_url(server)).expect("build refresher")
}

pub fn refresher_with_timeout(server: &MockServer, timeout: Duration) -> TokenRefresher {
    let options = TransportOptions::builder().timeout(timeout).build();
    TokenRefresher::with_options(token_url(server), &options).expect("build refresher")
}
