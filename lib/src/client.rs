use serde::de::DeserializeOwned;

use crate::{
    config::HandleConfig,
    error::{HandleError, HandleResult},
    transport::{HttpRequest, HttpResponse, HttpTransport, Transport},
    types::ApiResponse,
};

/// Client for one Handle server.
///
/// Holds the configuration and the transport only. Sessions are returned by
/// [`HandleClient::authenticate`] and passed back in by the caller, so one
/// client can serve any number of sessions concurrently.
#[derive(Debug, Clone)]
pub struct HandleClient<T = HttpTransport> {
    config: HandleConfig,
    transport: T,
}

impl HandleClient<HttpTransport> {
    pub fn new(config: HandleConfig) -> HandleResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> HandleClient<T> {
    pub const fn with_transport(config: HandleConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub const fn config(&self) -> &HandleConfig {
        &self.config
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) async fn send(&self, request: HttpRequest) -> HandleResult<HttpResponse> {
        Ok(self.transport.send(request).await?)
    }

    pub(crate) async fn send_decoded<R: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> HandleResult<ApiResponse<R>> {
        let endpoint = format!("{} {}", request.method, request.path);
        let response = self.send(request).await?;
        decode(endpoint, response)
    }
}

pub(crate) fn decode<R: DeserializeOwned>(
    endpoint: String,
    response: HttpResponse,
) -> HandleResult<ApiResponse<R>> {
    let body = serde_json::from_slice(&response.body)
        .map_err(|source| HandleError::Decode { endpoint, source })?;
    Ok(ApiResponse {
        status: response.status,
        body,
    })
}
