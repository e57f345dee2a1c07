//! In-memory Handle server for integration tests.
//!
//! Issues sessions with random nonces, verifies challenge signatures against
//! the fixture public key and stores handles in a map. Updates with
//! `overwrite=true` merge values by index.

use std::{
    collections::{BTreeMap, HashMap, btree_map::Entry},
    error::Error,
    net::SocketAddr,
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Path as UrlPath, Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use handlenet_lib::{
    HandleConfig, Scheme,
    protocol::{AuthorizationCredential, ChallengeAnswer, HashAlgorithm, PUBKEY_TYPE, PublicKey},
    types::{HandleRecord, ValueEntry},
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, sync::RwLock, task::JoinHandle};
use uuid::Uuid;

use super::{fixture, signer};

type Reply = (StatusCode, Json<Value>);

/// How the mock answers the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behavior {
    #[default]
    Verify,
    /// Verifies against `client_nonce || server_nonce`.
    VerifyClientFirst,
    OmitAuthenticatedFlag,
    OmitNonce,
    OmitSessionId,
}

struct MockSession {
    nonce: Vec<u8>,
    authenticated: bool,
}

#[derive(Default)]
struct Registry {
    sessions: HashMap<String, MockSession>,
    issued: Vec<String>,
    challenges: Vec<String>,
    handles: BTreeMap<String, Vec<ValueEntry>>,
}

#[derive(Clone)]
struct MockState {
    registry: Arc<RwLock<Registry>>,
    public_key: Arc<PublicKey>,
    behavior: Behavior,
    requests: Arc<AtomicUsize>,
}

impl MockState {
    fn count(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    async fn authorized(&self, headers: &HeaderMap) -> bool {
        let Some((_, AuthorizationCredential::Session { session_id })) = credential(headers)
        else {
            return false;
        };
        self.registry
            .read()
            .await
            .sessions
            .get(session_id.as_str())
            .is_some_and(|session| session.authenticated)
    }

    fn verify(&self, session: &MockSession, answer: &ChallengeAnswer) -> bool {
        let (Ok(cnonce), Ok(signature), Ok(alg)) = (
            STANDARD.decode(&answer.cnonce),
            STANDARD.decode(&answer.signature),
            answer.alg.parse::<HashAlgorithm>(),
        ) else {
            return false;
        };
        let payload = match self.behavior {
            Behavior::VerifyClientFirst => [cnonce, session.nonce.clone()].concat(),
            _ => [session.nonce.clone(), cnonce].concat(),
        };
        answer.key_type == PUBKEY_TYPE
            && answer.id == signer()
            && self.public_key.verify(alg, &payload, &signature)
    }
}

pub struct MockHandleServer {
    addr: SocketAddr,
    state: MockState,
    task: JoinHandle<()>,
}

impl MockHandleServer {
    pub async fn spawn() -> Result<Self, Box<dyn Error>> {
        Self::spawn_with(Behavior::Verify).await
    }

    pub async fn spawn_with(behavior: Behavior) -> Result<Self, Box<dyn Error>> {
        let public_key = PublicKey::from_pem(&std::fs::read_to_string(fixture("admpub.pem"))?)?;
        let state = MockState {
            registry: Arc::new(RwLock::new(Registry::default())),
            public_key: Arc::new(public_key),
            behavior,
            requests: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new()
            .route("/api/sessions/", post(open_session))
            .route("/api/sessions/this", post(confirm_session))
            .route("/api/handles", get(list_handles))
            .route(
                "/api/handles/{*handle}",
                get(get_handle).put(put_handle).delete(delete_handle),
            )
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self { addr, state, task })
    }

    pub fn config(&self, key_path: &Path) -> HandleConfig {
        HandleConfig::new(signer(), key_path)
            .with_server(Scheme::Http, "127.0.0.1", self.addr.port())
            .with_server_path("/api")
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }

    pub async fn issued_sessions(&self) -> Vec<String> {
        self.state.registry.read().await.issued.clone()
    }

    pub async fn challenges(&self) -> Vec<String> {
        self.state.registry.read().await.challenges.clone()
    }

    pub async fn stored(&self, handle: &str) -> Option<Vec<ValueEntry>> {
        self.state.registry.read().await.handles.get(handle).cloned()
    }
}

impl Drop for MockHandleServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn credential(headers: &HeaderMap) -> Option<(String, AuthorizationCredential)> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?.to_string();
    let parsed = raw.parse().ok()?;
    Some((raw, parsed))
}

fn reply(status: StatusCode, body: Value) -> Reply {
    (status, Json(body))
}

fn authentication_needed() -> Reply {
    reply(
        StatusCode::UNAUTHORIZED,
        json!({ "responseCode": 402, "message": "Authentication needed" }),
    )
}

async fn open_session(State(state): State<MockState>) -> Json<Value> {
    state.count();
    let session_id = Uuid::new_v4().to_string();
    let nonce = Uuid::new_v4().as_bytes().to_vec();
    let encoded = STANDARD.encode(&nonce);

    let mut registry = state.registry.write().await;
    registry.issued.push(session_id.clone());
    registry.sessions.insert(
        session_id.clone(),
        MockSession {
            nonce,
            authenticated: false,
        },
    );

    Json(match state.behavior {
        Behavior::OmitNonce => json!({ "sessionId": session_id }),
        Behavior::OmitSessionId => json!({ "nonce": encoded }),
        _ => json!({ "sessionId": session_id, "nonce": encoded }),
    })
}

async fn confirm_session(State(state): State<MockState>, headers: HeaderMap) -> Reply {
    state.count();
    let Some((raw, AuthorizationCredential::Challenge(answer))) = credential(&headers) else {
        return reply(
            StatusCode::UNAUTHORIZED,
            json!({ "authenticated": false, "error": "missing challenge credential" }),
        );
    };

    let mut registry = state.registry.write().await;
    registry.challenges.push(raw);
    let session_id = answer.session_id.to_string();
    let verified = registry
        .sessions
        .get(&session_id)
        .is_some_and(|session| state.verify(session, &answer));
    if verified {
        if let Some(session) = registry.sessions.get_mut(&session_id) {
            session.authenticated = true;
        }
    }

    match (state.behavior, verified) {
        (Behavior::OmitAuthenticatedFlag, _) => {
            reply(StatusCode::OK, json!({ "sessionId": session_id }))
        }
        (_, true) => reply(
            StatusCode::OK,
            json!({ "sessionId": session_id, "authenticated": true, "id": answer.id.to_string() }),
        ),
        (_, false) => reply(
            StatusCode::UNAUTHORIZED,
            json!({
                "sessionId": session_id,
                "authenticated": false,
                "error": "signature verification failed"
            }),
        ),
    }
}

async fn list_handles(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    state.count();
    if !state.authorized(&headers).await {
        return authentication_needed();
    }
    let prefix = params.get("prefix").cloned().unwrap_or_default();
    let registry = state.registry.read().await;
    let handles: Vec<&String> = registry
        .handles
        .keys()
        .filter(|handle| {
            handle
                .split_once('/')
                .is_some_and(|(candidate, _)| candidate == prefix)
        })
        .collect();
    reply(
        StatusCode::OK,
        json!({
            "responseCode": 1,
            "prefix": prefix,
            "totalCount": handles.len().to_string(),
            "handles": handles
        }),
    )
}

async fn get_handle(
    State(state): State<MockState>,
    UrlPath(handle): UrlPath<String>,
    headers: HeaderMap,
) -> Reply {
    state.count();
    if !state.authorized(&headers).await {
        return authentication_needed();
    }
    match state.registry.read().await.handles.get(&handle) {
        Some(values) => reply(
            StatusCode::OK,
            json!({ "responseCode": 1, "handle": handle, "values": values }),
        ),
        None => reply(
            StatusCode::NOT_FOUND,
            json!({ "responseCode": 100, "handle": handle }),
        ),
    }
}

async fn put_handle(
    State(state): State<MockState>,
    UrlPath(handle): UrlPath<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(record): Json<HandleRecord>,
) -> Reply {
    state.count();
    if !state.authorized(&headers).await {
        return authentication_needed();
    }
    let overwrite = params.get("overwrite").is_some_and(|value| value == "true");
    let mut registry = state.registry.write().await;
    match registry.handles.entry(handle.clone()) {
        Entry::Occupied(_) if !overwrite => reply(
            StatusCode::CONFLICT,
            json!({ "responseCode": 101, "handle": handle }),
        ),
        Entry::Occupied(mut slot) => {
            let existing = slot.get_mut();
            for value in record.values {
                match existing.iter_mut().find(|entry| entry.index == value.index) {
                    Some(entry) => *entry = value,
                    None => existing.push(value),
                }
            }
            reply(
                StatusCode::OK,
                json!({ "responseCode": 1, "handle": handle }),
            )
        }
        Entry::Vacant(slot) => {
            slot.insert(record.values);
            reply(
                StatusCode::CREATED,
                json!({ "responseCode": 1, "handle": handle }),
            )
        }
    }
}

async fn delete_handle(
    State(state): State<MockState>,
    UrlPath(handle): UrlPath<String>,
    headers: HeaderMap,
) -> Reply {
    state.count();
    if !state.authorized(&headers).await {
        return authentication_needed();
    }
    match state.registry.write().await.handles.remove(&handle) {
        Some(_) => reply(
            StatusCode::OK,
            json!({ "responseCode": 1, "handle": handle }),
        ),
        None => reply(
            StatusCode::NOT_FOUND,
            json!({ "responseCode": 100, "handle": handle }),
        ),
    }
}
