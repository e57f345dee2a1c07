use std::future::Future;

use reqwest::{Client, Method, StatusCode, Url, header};
use tracing::warn;

use crate::{
    config::{HandleConfig, TrustMode},
    error::TransportError,
};

/// One outbound call, with `path` relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            authorization: None,
            body: None,
        }
    }

    #[must_use]
    pub fn authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: Option<Vec<u8>>) -> Self {
        self.body = body;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Sends requests to the Handle server.
///
/// Any HTTP response, whatever its status, is `Ok`. Errors are reserved for
/// calls that produced no response at all. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// [`Transport`] over `reqwest` with rustls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &HandleConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if config.trust_mode == TrustMode::AcceptSelfSigned {
            warn!(
                "certificate validation disabled for {}:{}",
                config.server_host, config.server_port
            );
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build().map_err(TransportError::Client)?;
        Ok(Self {
            http,
            base_url: config.base_url(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let target = format!("{}{}", self.base_url, request.path);
        let url = Url::parse(&target).map_err(|err| TransportError::InvalidUrl {
            message: err.to_string(),
            url: target,
        })?;

        let mut builder = self.http.request(request.method, url);
        if let Some(authorization) = request.authorization {
            builder = builder.header(header::AUTHORIZATION, authorization);
        }
        if let Some(body) = request.body {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await.map_err(TransportError::Request)?;
        let status = response.status();
        let body = response.bytes().await.map_err(TransportError::Request)?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
