use common::{ErrorBody, Registered, RegistrationRequest, HEALTH_PATH, REGISTER_PATH};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("[{status}] {}", rejected_message(.body))]
    Rejected {
        status: StatusCode,
        body: Option<ErrorBody>,
    },
}

fn rejected_message(body: &Option<ErrorBody>) -> &str {
    body.as_ref()
        .map(|body| &*body.message)
        .unwrap_or("unknown server response")
}

/// Blocking http access to the registration server.
pub struct RegistrationApi {
    client: reqwest::blocking::Client,
    server_url: Url,
}

impl RegistrationApi {
    pub fn new(server_url: Url) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .build()?;

        Ok(Self::with_client(client, server_url))
    }

    pub fn with_client(client: reqwest::blocking::Client, server_url: Url) -> Self {
        RegistrationApi { client, server_url }
    }

    pub fn register(&self, payload: &RegistrationRequest) -> Result<Registered, ApiError> {
        let url = self.server_url.join(REGISTER_PATH)?;
        let result = self.client.post(url)
            .json(payload)
            .send()?;

        let status = result.status();

        if !status.is_success() {
            return Err(ApiError::Rejected {
                status,
                body: result.json().ok(),
            });
        }

        Ok(result.json()?)
    }

    pub fn health(&self) -> Result<Value, ApiError> {
        let url = self.server_url.join(HEALTH_PATH)?;
        let result = self.client.get(url).send()?;

        let status = result.status();

        if !status.is_success() {
            return Err(ApiError::Rejected {
                status,
                body: result.json().ok(),
            });
        }

        Ok(result.json()?)
    }
}
