use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdError {
    kind: &'static str,
    message: String,
}

impl IdError {
    fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} id {}", self.kind, self.message)
    }
}

impl Error for IdError {}

/// Opaque session identifier issued by the server. Never interpreted locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Administrator identity in `<index>:<prefix>/<suffix>` form, e.g. `300:0.NA/12345`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SignerId {
    index: u32,
    handle: String,
}

impl SignerId {
    pub fn new(index: u32, handle: impl Into<String>) -> Self {
        Self {
            index,
            handle: handle.into(),
        }
    }

    pub const fn index(&self) -> u32 {
        self.index
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }
}

impl fmt::Display for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.handle)
    }
}

impl FromStr for SignerId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, handle) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| IdError::new("signer", "must have the form <index>:<prefix>/<suffix>"))?;

        let index = index
            .parse::<u32>()
            .ok()
            .filter(|index| *index > 0)
            .ok_or_else(|| IdError::new("signer", "index must be a positive integer"))?;

        match handle.split_once('/') {
            Some((prefix, suffix)) if !prefix.is_empty() && !suffix.is_empty() => {
                Ok(Self::new(index, handle))
            }
            _ => Err(IdError::new(
                "signer",
                "handle must have the form <prefix>/<suffix>",
            )),
        }
    }
}

impl Serialize for SignerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SignerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
