//! # reddit-client
//!
//! The `reddit-client` crate provides a minimal HTTP client for the Reddit API. Requests are
//! sent as given and the response status is translated into a typed [`ClientError`]. If the
//! configuration carries the credentials of a registered Reddit app, every request is
//! authorized with an OAuth2 bearer token.
//!
//! ## Usage
//!
//! ```no_run
//! use reddit_client::{AppCredentials, Client, ClientConfigBuilder, ClientError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a client configuration
//!     let config = ClientConfigBuilder::default()
//!         .agent("linux:my-bot:v0.1.0 (by /u/my-account)")
//!         .app(AppCredentials {
//!             id: "client-id".into(),
//!             secret: "client-secret".into(),
//!             username: "my-account".into(),
//!             password: "my-password".into(),
//!         })
//!         .build()?;
//!
//!     // Create the client, authorized as the app because all credentials are set
//!     let client = reddit_client::new_client(&config)?;
//!
//!     // Fetch a listing
//!     let request = reqwest::Request::new(
//!         reqwest::Method::GET,
//!         "https://www.reddit.com/r/rust/hot.json".parse()?,
//!     );
//!     match client.execute(request).await {
//!         Ok(body) => println!("{}", String::from_utf8_lossy(&body)),
//!         Err(ClientError::RateLimited) => println!("Slow down"),
//!         Err(err) => return Err(err.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code, rust_2018_idioms, clippy::unwrap_used)]
#![warn(rust_2024_compatibility, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

mod app;
mod cache;
mod config;
mod http_client;

pub use app::AppClient;
pub use config::{
    AppCredentials, ClientConfig, ClientConfigBuilder, ClientConfigBuilderError,
    DEFAULT_OAUTH_URL, DEFAULT_TOKEN_URL,
};
pub use http_client::reqwest_client::BaseClient;
pub use http_client::{Client, ClientError};

/// Creates the client matching the configuration.
///
/// An [`AppClient`] is returned if all app credentials are set, a [`BaseClient`] sending only
/// the user agent otherwise.
pub fn new_client(config: &ClientConfig<'_>) -> Result<Box<dyn Client>, ClientError> {
    if config.app().is_configured() {
        tracing::debug!("App credentials configured, authorizing requests");
        return Ok(Box::new(AppClient::new(config)?));
    }

    Ok(Box::new(BaseClient::new(config.agent())?))
}
