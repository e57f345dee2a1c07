use std::{error::Error, fmt, io, path::PathBuf};

use crate::protocol::KeyError;

pub type HandleResult<T> = Result<T, HandleError>;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid {
        field: &'static str,
        message: String,
    },
    KeyUnreadable {
        path: PathBuf,
        source: io::Error,
    },
    KeyInvalid {
        path: PathBuf,
        source: KeyError,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(field) => write!(f, "missing required config value {}", field),
            ConfigError::Invalid { field, message } => {
                write!(f, "invalid config value {}: {}", field, message)
            }
            ConfigError::KeyUnreadable { path, source } => {
                write!(f, "cannot read private key {}: {}", path.display(), source)
            }
            ConfigError::KeyInvalid { path, source } => {
                write!(f, "cannot parse private key {}: {}", path.display(), source)
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::KeyUnreadable { source, .. } => Some(source),
            ConfigError::KeyInvalid { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum AuthenticationError {
    MissingSessionId,
    MissingNonce,
    InvalidNonce(base64::DecodeError),
    Signing(String),
    NotAuthenticated { reason: Option<String> },
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthenticationError::MissingSessionId => {
                f.write_str("session open response carried no session id")
            }
            AuthenticationError::MissingNonce => {
                f.write_str("session open response carried no server nonce")
            }
            AuthenticationError::InvalidNonce(err) => {
                write!(f, "server nonce is not valid base64: {}", err)
            }
            AuthenticationError::Signing(message) => {
                write!(f, "failed to sign session challenge: {}", message)
            }
            AuthenticationError::NotAuthenticated { reason: None } => {
                f.write_str("handle server responded, but did not authenticate")
            }
            AuthenticationError::NotAuthenticated {
                reason: Some(reason),
            } => write!(
                f,
                "handle server responded, but did not authenticate: {}",
                reason
            ),
        }
    }
}

impl Error for AuthenticationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AuthenticationError::InvalidNonce(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum TransportError {
    InvalidUrl { url: String, message: String },
    Client(reqwest::Error),
    Request(reqwest::Error),
    Other(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidUrl { url, message } => {
                write!(f, "invalid request URL {}: {}", url, message)
            }
            TransportError::Client(err) => write!(f, "failed to build HTTP client: {}", err),
            TransportError::Request(err) => write!(f, "HTTP request failed: {}", err),
            TransportError::Other(err) => write!(f, "transport failed: {}", err),
        }
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TransportError::Client(err) | TransportError::Request(err) => Some(err),
            TransportError::Other(err) => Some(err.as_ref()),
            TransportError::InvalidUrl { .. } => None,
        }
    }
}

/// Coarse classification of a [`HandleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Authentication,
    Precondition,
    Transport,
    Serialization,
}

#[derive(Debug)]
pub enum HandleError {
    Config(ConfigError),
    Authentication(AuthenticationError),
    /// An authenticated call was attempted without an established session.
    NotLoggedIn,
    Transport(TransportError),
    Encode(serde_json::Error),
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
}

impl HandleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandleError::Config(_) => ErrorKind::Configuration,
            HandleError::Authentication(_) => ErrorKind::Authentication,
            HandleError::NotLoggedIn => ErrorKind::Precondition,
            HandleError::Transport(_) => ErrorKind::Transport,
            HandleError::Encode(_) | HandleError::Decode { .. } => ErrorKind::Serialization,
        }
    }
}

impl fmt::Display for HandleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandleError::Config(err) => write!(f, "configuration error: {}", err),
            HandleError::Authentication(err) => write!(f, "authentication error: {}", err),
            HandleError::NotLoggedIn => f.write_str("not logged in"),
            HandleError::Transport(err) => write!(f, "transport error: {}", err),
            HandleError::Encode(err) => write!(f, "failed to encode request body: {}", err),
            HandleError::Decode { endpoint, source } => {
                write!(f, "unexpected response from {}: {}", endpoint, source)
            }
        }
    }
}

impl Error for HandleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            HandleError::Config(err) => Some(err),
            HandleError::Authentication(err) => Some(err),
            HandleError::NotLoggedIn => None,
            HandleError::Transport(err) => Some(err),
            HandleError::Encode(err) => Some(err),
            HandleError::Decode { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for HandleError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<AuthenticationError> for HandleError {
    fn from(value: AuthenticationError) -> Self {
        Self::Authentication(value)
    }
}

impl From<TransportError> for HandleError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}
