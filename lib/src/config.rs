//! Connection and credential settings for a Handle server.
//!
//! `HandleConfig` is a plain value. It is read once (usually from `HANDLE_*`
//! environment variables) and handed to [`crate::HandleClient`]; nothing in the
//! crate reads the environment afterwards.

use std::{env, fmt, path::PathBuf, str::FromStr};

use crate::{error::ConfigError, protocol::HashAlgorithm, types::SignerId};

pub const DEFAULT_AUTH_INDEX: u32 = 300;
pub const DEFAULT_AUTH_HANDLE: &str = "0.NA/12345";
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "/admpriv.key";
pub const DEFAULT_SERVER_HOST: &str = "localhost";
pub const DEFAULT_SERVER_PORT: u16 = 8000;
pub const DEFAULT_SERVER_PATH: &str = "/api";
pub const DEFAULT_TEST_HANDLE: &str = "12345/test";

pub const ENV_HASH_ALGORITHM: &str = "HANDLE_HASH_ALGORITHM";
pub const ENV_AUTH_ID: &str = "HANDLE_AUTH_ID";
pub const ENV_PRIVATE_KEY_PATH: &str = "HANDLE_AUTH_PRIVATE_KEY_PATH";
pub const ENV_SERVER_HOST: &str = "HANDLE_SERVER_HOST";
pub const ENV_SERVER_PORT: &str = "HANDLE_SERVER_PORT";
pub const ENV_SERVER_PATH: &str = "HANDLE_SERVER_PATH";
pub const ENV_SERVER_SCHEME: &str = "HANDLE_SERVER_SCHEME";
pub const ENV_SERVER_SELF_SIGNED: &str = "HANDLE_SERVER_SELF_SIGNED";
pub const ENV_TEST_HANDLE: &str = "HANDLE_TEST_HANDLE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Https,
    Http,
}

impl Scheme {
    pub const fn as_str(self) -> &'static str {
        match self {
            Scheme::Https => "https",
            Scheme::Http => "http",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "https" => Ok(Scheme::Https),
            "http" => Ok(Scheme::Http),
            other => Err(ConfigError::invalid(
                ENV_SERVER_SCHEME,
                format!("expected http or https, got '{}'", other),
            )),
        }
    }
}

/// How the server certificate is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrustMode {
    #[default]
    Verified,
    /// Certificate validation disabled. Only for servers with self-signed certificates.
    AcceptSelfSigned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleConfig {
    pub hash_algorithm: HashAlgorithm,
    pub auth_id: SignerId,
    pub private_key_path: PathBuf,
    pub server_host: String,
    pub server_port: u16,
    pub server_path: String,
    pub scheme: Scheme,
    pub trust_mode: TrustMode,
    pub test_handle: String,
}

impl Default for HandleConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: HashAlgorithm::Sha1,
            auth_id: SignerId::new(DEFAULT_AUTH_INDEX, DEFAULT_AUTH_HANDLE),
            private_key_path: PathBuf::from(DEFAULT_PRIVATE_KEY_PATH),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            server_path: DEFAULT_SERVER_PATH.to_string(),
            scheme: Scheme::Https,
            trust_mode: TrustMode::Verified,
            test_handle: DEFAULT_TEST_HANDLE.to_string(),
        }
    }
}

impl HandleConfig {
    pub fn new(auth_id: SignerId, private_key_path: impl Into<PathBuf>) -> Self {
        Self {
            auth_id,
            private_key_path: private_key_path.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable source. Unset and empty variables
    /// fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(value) = var(ENV_HASH_ALGORITHM) {
            config.hash_algorithm = value
                .parse::<HashAlgorithm>()
                .map_err(|err| ConfigError::invalid(ENV_HASH_ALGORITHM, err.to_string()))?;
        }
        if let Some(value) = var(ENV_AUTH_ID) {
            config.auth_id = value
                .parse::<SignerId>()
                .map_err(|err| ConfigError::invalid(ENV_AUTH_ID, err.to_string()))?;
        }
        if let Some(value) = var(ENV_PRIVATE_KEY_PATH) {
            config.private_key_path = PathBuf::from(value);
        }
        if let Some(value) = var(ENV_SERVER_HOST) {
            config.server_host = value;
        }
        if let Some(value) = var(ENV_SERVER_PORT) {
            config.server_port = value.parse().map_err(|_| {
                ConfigError::invalid(ENV_SERVER_PORT, format!("'{}' is not a port", value))
            })?;
        }
        if let Some(value) = var(ENV_SERVER_PATH) {
            config.server_path = value;
        }
        if let Some(value) = var(ENV_SERVER_SCHEME) {
            config.scheme = value.parse()?;
        }
        if let Some(value) = var(ENV_SERVER_SELF_SIGNED) {
            config.trust_mode = parse_self_signed(&value)?;
        }
        if let Some(value) = var(ENV_TEST_HANDLE) {
            config.test_handle = value;
        }

        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_server(mut self, scheme: Scheme, host: impl Into<String>, port: u16) -> Self {
        self.scheme = scheme;
        self.server_host = host.into();
        self.server_port = port;
        self
    }

    #[must_use]
    pub fn with_server_path(mut self, path: impl Into<String>) -> Self {
        self.server_path = path.into();
        self
    }

    #[must_use]
    pub const fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.hash_algorithm = algorithm;
        self
    }

    #[must_use]
    pub const fn with_trust_mode(mut self, trust_mode: TrustMode) -> Self {
        self.trust_mode = trust_mode;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_host.trim().is_empty() {
            return Err(ConfigError::Missing(ENV_SERVER_HOST));
        }
        if self.server_port == 0 {
            return Err(ConfigError::invalid(ENV_SERVER_PORT, "port must be non-zero"));
        }
        if self.private_key_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing(ENV_PRIVATE_KEY_PATH));
        }
        if self.auth_id.handle().is_empty() {
            return Err(ConfigError::Missing(ENV_AUTH_ID));
        }
        Ok(())
    }

    /// `<scheme>://<host>:<port><path>`, without a trailing slash.
    pub fn base_url(&self) -> String {
        let path = self.server_path.trim_end_matches('/');
        let separator = if path.is_empty() || path.starts_with('/') {
            ""
        } else {
            "/"
        };
        format!(
            "{}://{}:{}{}{}",
            self.scheme, self.server_host, self.server_port, separator, path
        )
    }

    /// Prefix of the configured test handle, e.g. `12345` for `12345/test`.
    pub fn test_prefix(&self) -> &str {
        self.test_handle
            .split_once('/')
            .map_or(self.test_handle.as_str(), |(prefix, _)| prefix)
    }
}

fn parse_self_signed(value: &str) -> Result<TrustMode, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" | "on" => Ok(TrustMode::AcceptSelfSigned),
        "no" | "false" | "0" | "off" => Ok(TrustMode::Verified),
        other => Err(ConfigError::invalid(
            ENV_SERVER_SELF_SIGNED,
            format!("expected yes or no, got '{}'", other),
        )),
    }
}
