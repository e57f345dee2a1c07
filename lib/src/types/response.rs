use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

use super::handle::{HandleRecord, ValueEntry};

/// Handle protocol response code carried in every handle endpoint envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseCode(pub u32);

impl ResponseCode {
    pub const RESERVED: Self = Self(0);
    pub const SUCCESS: Self = Self(1);
    pub const ERROR: Self = Self(2);
    pub const SERVER_TOO_BUSY: Self = Self(3);
    pub const PROTOCOL_ERROR: Self = Self(4);
    pub const OPERATION_NOT_SUPPORTED: Self = Self(5);
    pub const RECURSION_COUNT_TOO_HIGH: Self = Self(6);
    pub const SERVER_READ_ONLY: Self = Self(7);
    pub const HANDLE_NOT_FOUND: Self = Self(100);
    pub const HANDLE_ALREADY_EXISTS: Self = Self(101);
    pub const INVALID_HANDLE: Self = Self(102);
    pub const VALUES_NOT_FOUND: Self = Self(200);
    pub const VALUE_ALREADY_EXISTS: Self = Self(201);
    pub const INVALID_VALUE: Self = Self(202);
    pub const EXPIRED_SITE_INFO: Self = Self(300);
    pub const SERVER_NOT_RESP: Self = Self(301);
    pub const SERVICE_REFERRAL: Self = Self(302);
    pub const PREFIX_REFERRAL: Self = Self(303);
    pub const INVALID_ADMIN: Self = Self(400);
    pub const INSUFFICIENT_PERMISSIONS: Self = Self(401);
    pub const AUTHENTICATION_NEEDED: Self = Self(402);
    pub const AUTHENTICATION_FAILED: Self = Self(403);
    pub const INVALID_CREDENTIAL: Self = Self(404);
    pub const AUTHEN_TIMEOUT: Self = Self(405);
    pub const AUTHEN_ERROR: Self = Self(406);
    pub const SESSION_TIMEOUT: Self = Self(500);
    pub const SESSION_FAILED: Self = Self(501);
    pub const INVALID_SESSION_KEY: Self = Self(502);
    pub const INVALID_SESSION_SETUP: Self = Self(504);
    pub const SESSION_NO_ENC_ALG: Self = Self(505);

    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    pub const fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0 => "reserved",
            1 => "success",
            2 => "error",
            3 => "server too busy",
            4 => "protocol error",
            5 => "operation not supported",
            6 => "recursion count too high",
            7 => "server read only",
            100 => "handle not found",
            101 => "handle already exists",
            102 => "invalid handle",
            200 => "values not found",
            201 => "value already exists",
            202 => "invalid value",
            300 => "expired site info",
            301 => "server not responsible",
            302 => "service referral",
            303 => "prefix referral",
            400 => "invalid admin",
            401 => "insufficient permissions",
            402 => "authentication needed",
            403 => "authentication failed",
            404 => "invalid credential",
            405 => "authentication timed out",
            406 => "authentication error",
            500 => "session timeout",
            501 => "session failed",
            502 => "invalid session key",
            504 => "invalid session setup",
            505 => "session has no encryption algorithm",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", self.0, name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Response bodies that carry a handle protocol response code.
pub trait ResponseEnvelope {
    fn response_code(&self) -> ResponseCode;
}

/// Reply from the single-handle endpoints (`GET`, `PUT`, `DELETE /handles/<handle>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleResponse {
    pub response_code: ResponseCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<ValueEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HandleResponse {
    pub fn value(&self, index: u32) -> Option<&ValueEntry> {
        self.values
            .as_deref()
            .and_then(|values| values.iter().find(|value| value.index == index))
    }

    pub fn into_record(self) -> HandleRecord {
        HandleRecord {
            handle: self.handle,
            values: self.values.unwrap_or_default(),
        }
    }
}

impl ResponseEnvelope for HandleResponse {
    fn response_code(&self) -> ResponseCode {
        self.response_code
    }
}

/// Reply from `GET /handles?prefix=<prefix>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleListResponse {
    pub response_code: ResponseCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_count: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub page: Option<i64>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub page_size: Option<i64>,
    #[serde(default)]
    pub handles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Servers send `totalCount` as a string and paging fields as numbers.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_i64()
            .map(Some)
            .ok_or_else(|| de::Error::custom("count is not an integer")),
        Some(Value::String(text)) => text.trim().parse().map(Some).map_err(de::Error::custom),
        Some(other) => Err(de::Error::custom(format!("unexpected count {}", other))),
    }
}

impl ResponseEnvelope for HandleListResponse {
    fn response_code(&self) -> ResponseCode {
        self.response_code
    }
}

impl ResponseEnvelope for Value {
    fn response_code(&self) -> ResponseCode {
        self.get("responseCode")
            .and_then(Value::as_u64)
            .and_then(|code| u32::try_from(code).ok())
            .map_or(ResponseCode::RESERVED, ResponseCode)
    }
}

/// Decoded reply together with its HTTP status.
///
/// Any HTTP status is returned here; application failures are left to the
/// caller through the status and the envelope's response code.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: StatusCode,
    pub body: T,
}

impl<T: ResponseEnvelope> ApiResponse<T> {
    pub fn response_code(&self) -> ResponseCode {
        self.body.response_code()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success() && self.response_code().is_success()
    }
}
