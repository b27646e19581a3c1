// HTTP client core for the Flowline REST API
// Decision: One shared reqwest client behind an Arc; operation groups are
// cheap handles over it
//
// Authentication is HTTP basic on every request: the application id as user
// name, its token as password.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::{Result, RestError};
use crate::models::DefaultError;
use crate::operations::{KmsOperations, PrincipalOperations, TaskOperations};

/// API version segment present in every request path.
pub const API_VERSION: &str = "v2024-06-14";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder for [`RestClient`]. Endpoint, application id and token are
/// required; timeouts have sensible defaults.
pub struct RestClientBuilder {
    endpoint: Option<String>,
    application_id: Option<String>,
    token: Option<String>,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl RestClientBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            application_id: None,
            token: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Base URL of the API, without the version segment.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<RestClient> {
        let endpoint = require(self.endpoint, "endpoint")?;
        let application_id = require(self.application_id, "application_id")?;
        let token = require(self.token, "token")?;

        let parsed = Url::parse(&endpoint)
            .map_err(|e| RestError::InvalidConfig(format!("invalid endpoint '{endpoint}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RestError::InvalidConfig(format!(
                "endpoint '{endpoint}' must use http or https"
            )));
        }

        let http = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()?;

        Ok(RestClient {
            core: Arc::new(ClientCore {
                http,
                endpoint: endpoint.trim_end_matches('/').to_string(),
                application_id,
                token,
            }),
        })
    }
}

impl Default for RestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn require(value: Option<String>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(RestError::InvalidConfig(format!("{name} is required"))),
    }
}

/// Typed client for the Flowline REST API.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone)]
pub struct RestClient {
    core: Arc<ClientCore>,
}

impl RestClient {
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::new()
    }

    /// Operations over the task resource.
    pub fn tasks(&self) -> TaskOperations {
        TaskOperations::new(self.core.clone())
    }

    /// Operations over the principal resource.
    pub fn principals(&self) -> PrincipalOperations {
        PrincipalOperations::new(self.core.clone())
    }

    /// Operations over the key-management resource.
    pub fn kms(&self) -> KmsOperations {
        KmsOperations::new(self.core.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.core.endpoint
    }
}

/// Shared state behind every operation group.
pub(crate) struct ClientCore {
    http: reqwest::Client,
    endpoint: String,
    application_id: String,
    token: String,
}

impl ClientCore {
    fn url(&self, path: &str) -> String {
        format!("{}/{}{}", self.endpoint, API_VERSION, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!(path, "GET");
        let mut request = self.http.get(self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.send(request).await?;
        self.read_json(response).await
    }

    /// POST with an optional JSON body. Action endpoints take no body at all.
    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        debug!(path, "POST");
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(request).await?;
        self.read_json(response).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .basic_auth(&self.application_id, Some(&self.token))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Prefer the backend's own error message when the body parses
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<DefaultError>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body
                }
            });
        Err(RestError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_json<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| RestError::InvalidResponse(format!("unexpected body: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_endpoint_and_credentials() {
        let missing_endpoint = RestClient::builder()
            .application_id("app")
            .token("secret")
            .build();
        assert!(matches!(
            missing_endpoint,
            Err(RestError::InvalidConfig(_))
        ));

        let missing_token = RestClient::builder()
            .endpoint("https://api.flowline.example.com")
            .application_id("app")
            .build();
        assert!(matches!(missing_token, Err(RestError::InvalidConfig(_))));
    }

    #[test]
    fn test_builder_rejects_non_http_endpoints() {
        let result = RestClient::builder()
            .endpoint("ftp://api.flowline.example.com")
            .application_id("app")
            .token("secret")
            .build();
        assert!(matches!(result, Err(RestError::InvalidConfig(_))));
    }

    #[test]
    fn test_endpoint_trailing_slash_is_normalized() {
        let client = RestClient::builder()
            .endpoint("https://api.flowline.example.com/")
            .application_id("app")
            .token("secret")
            .build()
            .unwrap();

        assert_eq!(client.endpoint(), "https://api.flowline.example.com");
    }
}
