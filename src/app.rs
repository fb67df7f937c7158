//! The OAuth2 authorizing client for registered Reddit apps.

use crate::cache::TokenCache;
use crate::config::ClientConfig;
use crate::http_client::reqwest_client::BaseClient;
use crate::http_client::ClientError;

/// Tokens are refreshed this long before Reddit reports them as expired.
const TOKEN_EXPIRY_MARGIN: std::time::Duration = std::time::Duration::from_secs(60);

/// Hosts whose requests are redirected to the OAuth host once authorized.
const PUBLIC_HOSTS: [&str; 2] = ["www.reddit.com", "reddit.com"];

/// Token response from Reddit.
///
/// Reddit answers a rejected password grant with `200 OK` and an `error` field, so every
/// field is optional.
#[derive(Debug, serde::Deserialize, Clone)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    expires_in: u64,
    error: Option<String>,
}

/// A [`crate::Client`] that identifies as a registered Reddit app and attaches a bearer token
/// to every request.
pub struct AppClient {
    /// The client used for both token and API requests.
    base: BaseClient,
    /// The client id of the app.
    id: String,
    /// The client secret of the app.
    secret: String,
    /// The account the app acts on behalf of.
    username: String,
    /// The password of that account.
    password: String,
    /// The URL for the request of an access token.
    token_url: String,
    /// The base URL authorized requests are sent to.
    oauth_url: url::Url,
    /// A cache for the current bearer token.
    token_cache: TokenCache,
}

impl std::fmt::Debug for AppClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppClient")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("token_url", &self.token_url)
            .field("oauth_url", &self.oauth_url.as_str())
            .finish_non_exhaustive()
    }
}

impl AppClient {
    /// Creates a new app client based on the given configuration.
    pub fn new(config: &ClientConfig<'_>) -> Result<Self, ClientError> {
        let app = &config.app;
        if !app.is_configured() {
            return Err(ClientError::InvalidConfig(
                "all app credential fields must be set".to_string(),
            ));
        }
        // The id is the user part of the basic auth pair
        if app.id.contains(':') {
            return Err(ClientError::InvalidConfig(
                "app id must not contain ':'".to_string(),
            ));
        }
        let oauth_url = config
            .oauth_url
            .parse::<url::Url>()
            .map_err(|e| ClientError::InvalidConfig(format!("OAuth URL is invalid: {e}")))?;

        Ok(Self {
            base: BaseClient::new(&config.agent)?,
            id: app.id.to_string(),
            secret: app.secret.to_string(),
            username: app.username.to_string(),
            password: app.password.to_string(),
            token_url: config.token_url.to_string(),
            oauth_url,
            token_cache: TokenCache::new(TOKEN_EXPIRY_MARGIN),
        })
    }

    /// Requests an access token with the password grant.
    async fn request_token(&self) -> Result<(String, std::time::Duration), ClientError> {
        let request = self
            .base
            .inner()
            .post(&self.token_url)
            .basic_auth(&self.id, Some(&self.secret))
            .form(&[
                ("grant_type", "password"),
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .build()?;

        let response = self.base.send(request).await?;

        // Read failures stay transport errors, only the content is an authorization problem
        let body = response.bytes().await?;
        let token = serde_json::from_slice::<TokenResponse>(&body)
            .map_err(|e| ClientError::Authorization(format!("invalid token response: {e}")))?;

        match token {
            TokenResponse {
                error: Some(error), ..
            } => Err(ClientError::Authorization(error)),
            TokenResponse {
                access_token: Some(access_token),
                expires_in,
                ..
            } => {
                tracing::info!("Received access token valid for {expires_in}s");
                Ok((access_token, std::time::Duration::from_secs(expires_in)))
            }
            TokenResponse {
                access_token: None, ..
            } => Err(ClientError::Authorization(
                "token response without access token".to_string(),
            )),
        }
    }

    /// Points requests for the public hosts at the OAuth host, keeping path and query.
    fn route(&self, url: &mut url::Url) {
        if !url
            .host_str()
            .is_some_and(|host| PUBLIC_HOSTS.contains(&host))
        {
            return;
        }

        let mut routed = self.oauth_url.clone();
        routed.set_path(url.path());
        routed.set_query(url.query());
        tracing::debug!("Routing {} to {}", url, routed);
        *url = routed;
    }
}

#[async_trait::async_trait]
impl crate::Client for AppClient {
    async fn execute(&self, mut request: reqwest::Request) -> Result<Vec<u8>, ClientError> {
        let token = self
            .token_cache
            .get_or_refresh(|| self.request_token())
            .await?;

        self.route(request.url_mut());

        let mut bearer = reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ClientError::Authorization(format!("unusable access token: {e}")))?;
        bearer.set_sensitive(true);
        request
            .headers_mut()
            .insert(reqwest::header::AUTHORIZATION, bearer);

        let response = self.base.send(request).await?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}
