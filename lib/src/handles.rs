//! Handle CRUD over the authenticated request layer.
//!
//! Handle names and prefixes are interpolated into paths as given. Rejecting
//! malformed identifiers is left to the server. Whether an update merges
//! values by index or replaces them is also the server's decision; the body is
//! sent unchanged.

use crate::{
    client::HandleClient,
    error::HandleResult,
    transport::Transport,
    types::{ApiResponse, HandleListResponse, HandleRecord, HandleResponse, Session},
};

pub const HANDLES_PATH: &str = "/handles";

pub fn list_path(prefix: &str) -> String {
    format!("{}?prefix={}", HANDLES_PATH, prefix)
}

pub fn handle_path(handle: &str) -> String {
    format!("{}/{}", HANDLES_PATH, handle)
}

fn put_path(handle: &str, overwrite: bool) -> String {
    format!("{}?overwrite={}", handle_path(handle), overwrite)
}

impl<T: Transport> HandleClient<T> {
    pub async fn list_handles(
        &self,
        session: &Session,
        prefix: &str,
    ) -> HandleResult<ApiResponse<HandleListResponse>> {
        self.get(session, &list_path(prefix)).await
    }

    pub async fn get_handle(
        &self,
        session: &Session,
        handle: &str,
    ) -> HandleResult<ApiResponse<HandleResponse>> {
        self.get(session, &handle_path(handle)).await
    }

    /// Creates `handle`; the server refuses if it already exists.
    pub async fn create_handle(
        &self,
        session: &Session,
        handle: &str,
        record: &HandleRecord,
    ) -> HandleResult<ApiResponse<HandleResponse>> {
        self.put(session, &put_path(handle, false), record).await
    }

    pub async fn update_handle(
        &self,
        session: &Session,
        handle: &str,
        record: &HandleRecord,
    ) -> HandleResult<ApiResponse<HandleResponse>> {
        self.put(session, &put_path(handle, true), record).await
    }

    pub async fn delete_handle(
        &self,
        session: &Session,
        handle: &str,
    ) -> HandleResult<ApiResponse<HandleResponse>> {
        self.delete::<HandleResponse, ()>(session, &handle_path(handle), None)
            .await
    }
}
