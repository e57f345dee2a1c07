#![allow(dead_code)]

pub mod mock_server;

use std::{
    collections::VecDeque,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use handlenet_lib::{
    TransportError,
    transport::{HttpRequest, HttpResponse, Transport},
    types::{AdminValue, HandleRecord, SignerId, ValueEntry},
};
use reqwest::StatusCode;
use serde_json::Value;

pub use mock_server::{Behavior, MockHandleServer};

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn signer() -> SignerId {
    SignerId::new(300, "0.NA/10217")
}

/// URL, EMAIL and HS_ADMIN values at indices 1, 2 and 100.
pub fn sample_record(handle: &str) -> HandleRecord {
    HandleRecord::new(
        handle,
        vec![
            ValueEntry::text(1, "URL", "https://example.com"),
            ValueEntry::text(2, "EMAIL", "email@example.com"),
            ValueEntry::admin(100, AdminValue::full_control(&signer())),
        ],
    )
}

/// Transport that records requests and answers from a script.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<HttpRequest>>>,
    replies: Arc<Mutex<VecDeque<HttpResponse>>>,
}

impl RecordingTransport {
    pub fn with_replies(replies: Vec<(StatusCode, Value)>) -> Self {
        let transport = Self::default();
        for (status, body) in replies {
            transport.push_raw(status, body.to_string().into_bytes());
        }
        transport
    }

    pub fn push_raw(&self, status: StatusCode, body: Vec<u8>) {
        self.replies
            .lock()
            .expect("replies lock")
            .push_back(HttpResponse { status, body });
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().expect("calls lock").push(request);
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .ok_or_else(|| TransportError::Other("no scripted reply left".into()))
    }
}
