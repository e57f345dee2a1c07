//! Handle records as carried in request and response bodies.
//!
//! Values are passed through as the caller built them: `type` tags are
//! free-form, indices are caller-assigned, and any field this crate does not
//! model is preserved in `extra`.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::SignerId;

pub const DEFAULT_TTL: u32 = 86400;

const fn default_ttl() -> u32 {
    DEFAULT_TTL
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HandleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default)]
    pub values: Vec<ValueEntry>,
}

impl HandleRecord {
    pub fn new(handle: impl Into<String>, values: Vec<ValueEntry>) -> Self {
        Self {
            handle: Some(handle.into()),
            values,
        }
    }

    /// A record body without the handle name, as sent by updates.
    pub const fn with_values(values: Vec<ValueEntry>) -> Self {
        Self {
            handle: None,
            values,
        }
    }

    pub fn value(&self, index: u32) -> Option<&ValueEntry> {
        self.values.iter().find(|value| value.index == index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEntry {
    pub index: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub data: ValueData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValueEntry {
    /// Builds a value stamped with the current time and the default TTL.
    pub fn new(index: u32, kind: impl Into<String>, data: ValueData) -> Self {
        Self {
            index,
            kind: kind.into(),
            ttl: DEFAULT_TTL,
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            data,
            extra: Map::new(),
        }
    }

    pub fn text(index: u32, kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(index, kind, ValueData::text(value))
    }

    pub fn admin(index: u32, admin: AdminValue) -> Self {
        Self::new(
            index,
            "HS_ADMIN",
            ValueData {
                format: "admin".into(),
                value: DataValue::Admin(admin),
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueData {
    pub format: String,
    pub value: DataValue,
}

impl ValueData {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            format: "string".into(),
            value: DataValue::Text(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Text(String),
    Admin(AdminValue),
    Other(Value),
}

impl DataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DataValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Payload of an `HS_ADMIN` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminValue {
    pub index: u32,
    pub handle: String,
    pub permissions: String,
}

impl AdminValue {
    pub const ALL_PERMISSIONS: &'static str = "111111111111";

    /// Grants every permission to the admin identified by `signer`.
    pub fn full_control(signer: &SignerId) -> Self {
        Self {
            index: signer.index(),
            handle: signer.handle().to_string(),
            permissions: Self::ALL_PERMISSIONS.into(),
        }
    }
}
