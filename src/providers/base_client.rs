use crate::core::error::AgentError;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use std::time::Duration;

const USER_AGENT: &str = concat!("pchat/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over a shared `reqwest::Client` rooted at one base URL.
#[derive(Clone)]
pub struct BaseApiClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl BaseApiClient {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AgentError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// POSTs a JSON payload with bearer authentication.
    pub async fn send_request<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, AgentError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json");

        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        Ok(request.json(payload).send().await?)
    }

    /// GETs `path` with the given query parameters.
    pub async fn get<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response, AgentError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        Ok(self.client.get(&url).query(query).send().await?)
    }

    /// GETs the URL formed by appending percent-encoded `segments` to the base.
    pub async fn get_segments(&self, segments: &[&str]) -> Result<Response, AgentError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| AgentError::Config(format!("Invalid base URL {}: {}", self.endpoint, e)))?;
        url.path_segments_mut()
            .map_err(|_| AgentError::Config(format!("Base URL cannot be a base: {}", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);
        tracing::debug!(%url, "GET");

        Ok(self.client.get(url).send().await?)
    }
}
