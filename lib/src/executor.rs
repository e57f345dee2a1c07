use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    client::HandleClient,
    error::{HandleError, HandleResult},
    protocol::AuthorizationCredential,
    transport::{HttpRequest, Transport},
    types::{ApiResponse, Session},
};

impl<T: Transport> HandleClient<T> {
    /// Sends one request authorized by `session`.
    ///
    /// Fails with [`HandleError::NotLoggedIn`] before touching the network when
    /// the session id is empty. Non-2xx responses are decoded and returned like
    /// any other; only transport failures and undecodable bodies are errors.
    pub async fn execute<R, B>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> HandleResult<ApiResponse<R>>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        if session.id().is_empty() {
            return Err(HandleError::NotLoggedIn);
        }

        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(HandleError::Encode)?;
        let credential = AuthorizationCredential::session(session.id().clone());
        debug!("{} {} (session_id={})", method, path, session.id());

        let request = HttpRequest::new(method, path)
            .authorization(credential.to_string())
            .body(body);
        self.send_decoded(request).await
    }

    pub async fn get<R: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
    ) -> HandleResult<ApiResponse<R>> {
        self.execute::<R, ()>(session, Method::GET, path, None).await
    }

    pub async fn put<R, B>(
        &self,
        session: &Session,
        path: &str,
        body: &B,
    ) -> HandleResult<ApiResponse<R>>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(session, Method::PUT, path, Some(body)).await
    }

    pub async fn delete<R, B>(
        &self,
        session: &Session,
        path: &str,
        body: Option<&B>,
    ) -> HandleResult<ApiResponse<R>>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(session, Method::DELETE, path, body).await
    }
}
