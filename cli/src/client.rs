use irsim_core::output::ErrorBody;
use irsim_core::SimulateRequest;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

pub const SIMULATE_PATH: &str = "/api/simulate";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Nothing is listening, or the host could not be reached.
    #[error("could not reach the irsim server at {url}; start it with `irsim-server`")]
    ServiceUnavailable { url: String },

    /// The server answered with an `{"error": ...}` body.
    #[error("{message}")]
    Application { status: StatusCode, message: String },

    #[error("invalid server url `{0}`")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn is_service_unavailable(&self) -> bool { matches!(self, ClientError::ServiceUnavailable { .. }) }
}

/// Posts requests to a running `irsim-server`.
#[derive(Debug, Clone)]
pub struct SimulateClient {
    client: Client,
    endpoint: Url,
}

impl SimulateClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let endpoint = Url::parse(base_url)
            .and_then(|u| u.join(SIMULATE_PATH))
            .map_err(|_| ClientError::InvalidUrl(base_url.to_string()))?;
        let client = Client::builder()
            .user_agent(concat!("irsim/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url { &self.endpoint }

    /// Runs one request remotely. Connection failures are reported apart from engine errors.
    pub async fn simulate(&self, req: &SimulateRequest) -> Result<Value, ClientError> {
        let resp = match self.client.post(self.endpoint.clone()).json(req).send().await {
            Ok(resp) => resp,
            Err(e) if e.is_connect() => {
                tracing::warn!(url = %self.endpoint, error = %e, "server unreachable");
                return Err(ClientError::ServiceUnavailable { url: self.endpoint.to_string() });
            }
            Err(e) => return Err(e.into()),
        };

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }
        let message = match resp.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("server error: {status}"),
        };
        Err(ClientError::Application { status, message })
    }
}
