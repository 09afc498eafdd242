//! CLI entry point for dwx-oauth.

pub mod auth;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::auth::DEFAULT_SCOPE;

/// Darwinex OAuth2 token tool
#[derive(Parser, Debug)]
#[command(name = "dwx-oauth", version, about = "OAuth2 token grants for the Darwinex API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Exchange a refresh token for a new token pair
    Refresh(RefreshArgs),
    /// Obtain a token pair with the resource owner's username and password
    Login(LoginArgs),
}

/// Client and transport options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct ClientArgs {
    /// Token endpoint URL (default: $DWX_TOKEN_ENDPOINT or the Darwinex endpoint)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// OAuth2 client id / consumer key
    #[arg(long)]
    pub client_id: Option<String>,

    /// OAuth2 client secret / consumer secret
    #[arg(long)]
    pub client_secret: Option<String>,

    /// key=value credentials file
    #[arg(short, long)]
    pub credentials: Option<PathBuf>,

    /// Use the demo account credentials file
    #[arg(long)]
    pub demo: bool,

    /// Skip TLS certificate verification (unsafe)
    #[arg(long)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Print the response body as received instead of decoded JSON
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for `dwx-oauth refresh`.
#[derive(Parser, Debug)]
pub struct RefreshArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    /// Refresh token issued by a previous grant
    #[arg(short, long)]
    pub refresh_token: Option<String>,
}

/// Arguments for `dwx-oauth login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    #[arg(short, long)]
    pub username: Option<String>,

    #[arg(short, long)]
    pub password: Option<String>,

    #[arg(long, default_value = DEFAULT_SCOPE)]
    pub scope: String,
}
