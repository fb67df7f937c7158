use std::borrow::Cow;

/// Default endpoint for the OAuth2 token request.
pub const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
/// Default host serving authorized API requests.
pub const DEFAULT_OAUTH_URL: &str = "https://oauth.reddit.com";

/// Credentials of a registered Reddit script application.
///
/// The client only identifies as the app if every field is set, see
/// [`AppCredentials::is_configured`].
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AppCredentials<'a> {
    /// The client id of the app.
    pub id: Cow<'a, str>,
    /// The client secret of the app.
    pub secret: Cow<'a, str>,
    /// The account the app acts on behalf of.
    pub username: Cow<'a, str>,
    /// The password of that account.
    pub password: Cow<'a, str>,
}

impl AppCredentials<'_> {
    /// Returns `true` iff all fields are non-empty.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !(self.id.is_empty()
            || self.secret.is_empty()
            || self.username.is_empty()
            || self.password.is_empty())
    }
}

impl std::fmt::Debug for AppCredentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("id", &self.id)
            .field("secret", &"***")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Configuration for the Reddit client.
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[allow(clippy::module_name_repetitions)]
pub struct ClientConfig<'a> {
    /// The user agent sent with every request.
    pub(crate) agent: Cow<'a, str>,
    /// The app credentials. If all fields are set, requests are authorized as this app.
    #[builder(default)]
    pub(crate) app: AppCredentials<'a>,
    /// The URL for the request of an access token.
    #[builder(default = "Cow::Borrowed(DEFAULT_TOKEN_URL)")]
    pub(crate) token_url: Cow<'a, str>,
    /// The base URL authorized requests are sent to.
    #[builder(default = "Cow::Borrowed(DEFAULT_OAUTH_URL)")]
    pub(crate) oauth_url: Cow<'a, str>,
}

impl ClientConfig<'_> {
    /// The user agent sent with every request.
    #[must_use]
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// The configured app credentials.
    #[must_use]
    pub fn app(&self) -> &AppCredentials<'_> {
        &self.app
    }
}

impl ClientConfigBuilder<'_> {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        match &self.agent {
            None => return Err("Agent is empty".to_string()),
            Some(agent) if agent.is_empty() => return Err("Agent is empty".to_string()),
            Some(agent) => {
                reqwest::header::HeaderValue::from_str(agent)
                    .map_err(|e| format!("Agent is not a valid header value: {e}"))?;
            }
        }
        if let Some(token_url) = &self.token_url {
            token_url
                .parse::<url::Url>()
                .map_err(|e| format!("Token URL is invalid: {e}"))?;
        }
        if let Some(oauth_url) = &self.oauth_url {
            oauth_url
                .parse::<url::Url>()
                .map_err(|e| format!("OAuth URL is invalid: {e}"))?;
        }
        Ok(())
    }
}
