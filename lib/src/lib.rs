//! Client for the Handle System REST API.
//!
//! [`HandleClient::authenticate`] runs the `HS_PUBKEY` challenge-response
//! handshake and returns a [`Session`]. Every later call takes that session
//! and sends it as the `Authorization` credential.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
mod executor;
pub mod handles;
pub mod protocol;
pub mod transport;
pub mod types;

pub use client::HandleClient;
pub use config::{HandleConfig, Scheme, TrustMode};
pub use error::{
    AuthenticationError, ConfigError, ErrorKind, HandleError, HandleResult, TransportError,
};
pub use types::{
    ApiResponse, HandleListResponse, HandleRecord, HandleResponse, ResponseCode, Session,
    SessionId, ValueEntry,
};
