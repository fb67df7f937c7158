use super::ClientError;

/// A [`super::Client`] that forwards requests unmodified, identifying itself with the
/// configured user agent.
#[derive(Debug, Clone)]
pub struct BaseClient {
    client: reqwest::Client,
}

impl BaseClient {
    /// Creates a client sending `agent` as `User-Agent` with every request.
    pub fn new(agent: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().user_agent(agent).build()?;
        Ok(Self { client })
    }

    /// Returns a reference to the underlying reqwest client.
    pub(crate) fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Sends the request and classifies the status. The body is only handed back on `200 OK`.
    pub(crate) async fn send(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, ClientError> {
        tracing::debug!("{} {}", request.method(), request.url());

        let response = self.client.execute(request).await?;

        // Check status before the body is touched
        match ClientError::from_status(response.status()) {
            Some(err) => Err(err),
            None => Ok(response),
        }
    }
}

#[async_trait::async_trait]
impl super::Client for BaseClient {
    async fn execute(&self, request: reqwest::Request) -> Result<Vec<u8>, ClientError> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}
