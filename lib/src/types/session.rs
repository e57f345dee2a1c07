use serde::{Deserialize, Serialize};

use super::ids::SessionId;

/// Reply to `POST /sessions/`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionChallenge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

/// Reply to `POST /sessions/this`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SessionStatus {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated == Some(true)
    }
}

/// An authenticated session.
///
/// The session id is the only state later requests need. It is never refreshed
/// locally; expiry is enforced by the server and shows up as a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    id: SessionId,
}

impl Session {
    pub(crate) const fn established(id: SessionId) -> Self {
        Self { id }
    }

    /// Rebuilds a session from an id obtained by an earlier handshake.
    pub fn resume(id: impl Into<SessionId>) -> Self {
        Self { id: id.into() }
    }

    pub const fn id(&self) -> &SessionId {
        &self.id
    }
}
