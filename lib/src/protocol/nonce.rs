use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use rand::{RngCore, rngs::OsRng};

pub const CLIENT_NONCE_LEN: usize = 16;

/// Nonce issued by the server when a session is opened.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerNonce(Vec<u8>);

impl ServerNonce {
    pub fn from_base64(encoded: &str) -> Result<Self, base64::DecodeError> {
        STANDARD.decode(encoded.trim()).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ServerNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServerNonce({} bytes)", self.0.len())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ClientNonce([u8; CLIENT_NONCE_LEN]);

impl ClientNonce {
    pub fn generate() -> Self {
        let mut bytes = [0u8; CLIENT_NONCE_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub const fn from_bytes(bytes: [u8; CLIENT_NONCE_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; CLIENT_NONCE_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }
}

impl fmt::Debug for ClientNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientNonce({} bytes)", CLIENT_NONCE_LEN)
    }
}

/// Bytes signed to prove key possession: server nonce first, client nonce second.
pub fn signing_payload(server: &ServerNonce, client: &ClientNonce) -> Vec<u8> {
    let mut payload = Vec::with_capacity(server.0.len() + CLIENT_NONCE_LEN);
    payload.extend_from_slice(&server.0);
    payload.extend_from_slice(&client.0);
    payload
}
