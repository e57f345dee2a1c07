//! Session handshake.
//!
//! 1. `POST /sessions/` opens an anonymous session and returns its id plus a
//!    server nonce.
//! 2. The client signs `server_nonce || client_nonce` with its private key.
//! 3. `POST /sessions/this` presents the signature; the server answers with
//!    `authenticated: true` once it has verified it against the public key
//!    registered for the signer identity.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Method;
use tracing::{debug, info, warn};

use crate::{
    client::{HandleClient, decode},
    error::{AuthenticationError, HandleError, HandleResult},
    protocol::{
        AuthorizationCredential, ChallengeAnswer, ClientNonce, HashAlgorithm, PUBKEY_TYPE,
        PrivateKey, ServerNonce, signing_payload,
    },
    transport::{HttpRequest, Transport},
    types::{Session, SessionChallenge, SessionId, SessionStatus, SignerId},
};

pub const SESSIONS_PATH: &str = "/sessions/";
pub const THIS_SESSION_PATH: &str = "/sessions/this";

/// Signs the nonce payload and assembles the challenge credential.
pub fn answer_challenge(
    key: &PrivateKey,
    algorithm: HashAlgorithm,
    signer: &SignerId,
    session_id: &SessionId,
    server_nonce: &ServerNonce,
    client_nonce: &ClientNonce,
) -> Result<ChallengeAnswer, AuthenticationError> {
    let payload = signing_payload(server_nonce, client_nonce);
    let signature = key.sign(algorithm, &payload)?;
    Ok(ChallengeAnswer {
        session_id: session_id.clone(),
        cnonce: client_nonce.to_base64(),
        id: signer.clone(),
        key_type: PUBKEY_TYPE.to_string(),
        alg: algorithm.wire_name().to_string(),
        signature: STANDARD.encode(signature),
    })
}

impl<T: Transport> HandleClient<T> {
    /// Runs the two-step handshake and returns the authenticated session.
    ///
    /// The private key is read from disk on every call. Nothing is retried.
    pub async fn authenticate(&self) -> HandleResult<Session> {
        let config = self.config();
        let key = PrivateKey::load(&config.private_key_path).await?;

        let opened = self
            .send_decoded::<SessionChallenge>(HttpRequest::new(Method::POST, SESSIONS_PATH))
            .await?
            .body;
        let session_id = opened
            .session_id
            .filter(|id| !id.is_empty())
            .map(SessionId::new)
            .ok_or(AuthenticationError::MissingSessionId)?;
        let server_nonce = opened.nonce.ok_or(AuthenticationError::MissingNonce)?;
        let server_nonce =
            ServerNonce::from_base64(&server_nonce).map_err(AuthenticationError::InvalidNonce)?;
        debug!("session opened (session_id={})", session_id);

        let answer = answer_challenge(
            &key,
            config.hash_algorithm,
            &config.auth_id,
            &session_id,
            &server_nonce,
            &ClientNonce::generate(),
        )?;
        let credential = AuthorizationCredential::Challenge(answer);
        let request =
            HttpRequest::new(Method::POST, THIS_SESSION_PATH).authorization(credential.to_string());
        let endpoint = format!("{} {}", request.method, request.path);
        let response = self.send(request).await?;
        let status = response.status;

        let confirmed = match decode::<SessionStatus>(endpoint, response) {
            Ok(confirmed) => confirmed.body,
            Err(HandleError::Decode { .. }) if !status.is_success() => SessionStatus {
                error: Some(format!("HTTP {}", status)),
                ..SessionStatus::default()
            },
            Err(err) => return Err(err),
        };

        if !confirmed.is_authenticated() {
            warn!(
                "handle server did not authenticate session {} for {} (HTTP {})",
                session_id, config.auth_id, status
            );
            return Err(AuthenticationError::NotAuthenticated {
                reason: confirmed.error,
            }
            .into());
        }

        info!(
            "session authenticated (session_id={}, id={})",
            session_id, config.auth_id
        );
        Ok(Session::established(session_id))
    }
}
