use std::{collections::BTreeMap, error::Error, fmt, str::FromStr};

use crate::types::{SessionId, SignerId};

pub const AUTH_SCHEME: &str = "Handle";
pub const CREDENTIAL_VERSION: &str = "0";
pub const PUBKEY_TYPE: &str = "HS_PUBKEY";

/// Fields of the credential that answers a session challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeAnswer {
    pub session_id: SessionId,
    pub cnonce: String,
    pub id: SignerId,
    pub key_type: String,
    pub alg: String,
    pub signature: String,
}

/// Value of the `Authorization` header sent to the Handle server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationCredential {
    /// Carried on every request after the handshake.
    Session { session_id: SessionId },
    /// Carried once, on the request that activates the session.
    Challenge(ChallengeAnswer),
}

impl AuthorizationCredential {
    pub const fn session(session_id: SessionId) -> Self {
        Self::Session { session_id }
    }

    pub fn session_id(&self) -> &SessionId {
        match self {
            AuthorizationCredential::Session { session_id } => session_id,
            AuthorizationCredential::Challenge(answer) => &answer.session_id,
        }
    }
}

impl fmt::Display for AuthorizationCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationCredential::Session { session_id } => write!(
                f,
                "{} version=\"{}\", sessionId=\"{}\"",
                AUTH_SCHEME, CREDENTIAL_VERSION, session_id
            ),
            AuthorizationCredential::Challenge(answer) => write!(
                f,
                "{} version=\"{}\", sessionId=\"{}\", cnonce=\"{}\", id=\"{}\", type=\"{}\", alg=\"{}\", signature=\"{}\"",
                AUTH_SCHEME,
                CREDENTIAL_VERSION,
                answer.session_id,
                answer.cnonce,
                answer.id,
                answer.key_type,
                answer.alg,
                answer.signature
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialParseError(String);

impl fmt::Display for CredentialParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid authorization credential: {}", self.0)
    }
}

impl Error for CredentialParseError {}

fn parse_error(message: impl Into<String>) -> CredentialParseError {
    CredentialParseError(message.into())
}

impl FromStr for AuthorizationCredential {
    type Err = CredentialParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, params) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| parse_error("missing scheme"))?;
        if !scheme.eq_ignore_ascii_case(AUTH_SCHEME) {
            return Err(parse_error(format!("unexpected scheme '{}'", scheme)));
        }

        let mut fields = BTreeMap::new();
        for pair in params.split(',') {
            let (key, value) = pair
                .trim()
                .split_once('=')
                .ok_or_else(|| parse_error(format!("malformed parameter '{}'", pair.trim())))?;
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .ok_or_else(|| parse_error(format!("parameter '{}' is not quoted", key)))?;
            fields.insert(key.to_string(), value.to_string());
        }

        let mut take = |key: &str| fields.remove(key);
        match take("version") {
            Some(version) if version == CREDENTIAL_VERSION => {}
            Some(version) => return Err(parse_error(format!("unsupported version '{}'", version))),
            None => return Err(parse_error("missing version")),
        }
        let session_id = take("sessionId")
            .map(SessionId::new)
            .ok_or_else(|| parse_error("missing sessionId"))?;

        let Some(signature) = take("signature") else {
            return Ok(Self::Session { session_id });
        };
        let mut required = |key: &'static str| {
            take(key).ok_or_else(|| parse_error(format!("missing {}", key)))
        };
        let cnonce = required("cnonce")?;
        let id = required("id")?
            .parse::<SignerId>()
            .map_err(|err| parse_error(err.to_string()))?;
        let key_type = required("type")?;
        let alg = required("alg")?;

        Ok(Self::Challenge(ChallengeAnswer {
            session_id,
            cnonce,
            id,
            key_type,
            alg,
            signature,
        }))
    }
}
