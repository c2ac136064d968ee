//! Async remote gateway: executes `ApiClient` requests over a `Transport`.
//!
//! # Design
//! The gateway is the only place that awaits the network. Every call is a
//! single attempt bounded by the configured timeout; there is no retry. The
//! `Transport` trait is the host seam: `ReqwestTransport` is the production
//! implementation, tests plug in scripted transports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{List, Todo};

/// Executes one HTTP round-trip.
///
/// Implementations must return non-2xx responses as data; only failures to
/// obtain a response at all are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request).await
    }
}

/// `Transport` backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
        };
        let mut builder = self.http.request(method, &request.path);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// The four remote operations the client needs.
#[derive(Debug, Clone)]
pub struct RemoteGateway<T> {
    client: ApiClient,
    transport: T,
    timeout: Duration,
}

impl RemoteGateway<ReqwestTransport> {
    /// Gateway over a fresh reqwest client, configured from `config`.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        Ok(Self::from_config(config, ReqwestTransport::new()?))
    }
}

impl<T: Transport> RemoteGateway<T> {
    pub fn new(client: ApiClient, transport: T, timeout: Duration) -> Self {
        Self {
            client,
            transport,
            timeout,
        }
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Self {
        Self::new(
            ApiClient::new(&config.base_url),
            transport,
            config.request_timeout,
        )
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn fetch_lists(&self) -> Result<Option<Vec<List>>> {
        let response = self.round_trip(self.client.build_fetch_lists()).await?;
        self.client.parse_fetch_lists(response)
    }

    pub async fn fetch_todos(&self) -> Result<Option<Vec<Todo>>> {
        let response = self.round_trip(self.client.build_fetch_todos()).await?;
        self.client.parse_fetch_todos(response)
    }

    pub async fn mark_complete(&self, id: &str) -> Result<()> {
        let response = self.round_trip(self.client.build_mark_complete(id)).await?;
        self.client.parse_mark_complete(response)
    }

    pub async fn mark_incomplete(&self, id: &str) -> Result<()> {
        let response = self.round_trip(self.client.build_mark_incomplete(id)).await?;
        self.client.parse_mark_incomplete(response)
    }

    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, path = %request.path, "sending request");
        let response = tokio::time::timeout(self.timeout, self.transport.execute(request))
            .await
            .map_err(|_| ApiError::Timeout {
                after: self.timeout,
            })??;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}
