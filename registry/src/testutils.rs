//! In-process stand-in for the console backend, used by client tests across
//! the workspace.

use crate::types::Domain;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct ServerState {
    domains: Mutex<Vec<Domain>>,
    list_requests: AtomicUsize,
    last_route_body: Mutex<Option<Value>>,
    last_domain_update: Mutex<Option<Value>>,
    delay: Duration,
}

impl ServerState {
    pub fn list_requests(&self) -> usize {
        self.list_requests.load(Ordering::SeqCst)
    }

    pub fn last_route_body(&self) -> Option<Value> {
        self.last_route_body.lock().unwrap().clone()
    }

    pub fn last_domain_update(&self) -> Option<Value> {
        self.last_domain_update.lock().unwrap().clone()
    }

    pub fn domains(&self) -> Vec<Domain> {
        self.domains.lock().unwrap().clone()
    }
}

pub struct TestRegistryServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
    pub state: Arc<ServerState>,
}

impl TestRegistryServer {
    pub async fn spawn(domains: Vec<Domain>) -> Self {
        Self::spawn_with_delay(domains, Duration::ZERO).await
    }

    /// `delay` is applied to every mutation handler; tests use it to hold a
    /// mutation in flight while a second one is attempted.
    pub async fn spawn_with_delay(domains: Vec<Domain>, delay: Duration) -> Self {
        let state = Arc::new(ServerState {
            domains: Mutex::new(domains),
            list_requests: AtomicUsize::new(0),
            last_route_body: Mutex::new(None),
            last_domain_update: Mutex::new(None),
            delay,
        });

        let app = Router::new()
            .route("/api/v1", get(list_domains))
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/domain", post(create_domain))
            .route("/api/v1/updateDomain", put(update_domain))
            .route("/api/v1/domain/{domain}", delete(delete_domain))
            .route("/api/v1/route", post(create_route))
            .route("/api/v1/updateData", put(update_route))
            .route("/api/v1/domain/{domain}/route/{route}", delete(delete_route))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test server");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server");
        });

        TestRegistryServer { addr, handle, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }
}

impl Drop for TestRegistryServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn list_domains(State(state): State<Arc<ServerState>>) -> Json<Value> {
    state.list_requests.fetch_add(1, Ordering::SeqCst);
    let domains = state.domains.lock().unwrap().clone();
    Json(json!(domains))
}

async fn login(Json(body): Json<Value>) -> Response {
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();
    if password == "wrong" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid credentials"})),
        )
            .into_response();
    }
    if password == "broken" {
        // Plain-text failure body, for the raw-text tier of the message
        // fallback.
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    Json(json!({
        "user": {
            "email": email,
            "firstName": "Jake",
            "lastName": "Hunter",
            "role": "mediaBuyer"
        },
        "token": "test-token"
    }))
    .into_response()
}

async fn create_domain(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Domain>,
) -> StatusCode {
    tokio::time::sleep(state.delay).await;
    state.domains.lock().unwrap().push(body);
    StatusCode::CREATED
}

async fn update_domain(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> StatusCode {
    tokio::time::sleep(state.delay).await;
    *state.last_domain_update.lock().unwrap() = Some(body);
    StatusCode::OK
}

async fn delete_domain(
    State(state): State<Arc<ServerState>>,
    Path(domain): Path<String>,
) -> StatusCode {
    tokio::time::sleep(state.delay).await;
    state.domains.lock().unwrap().retain(|d| d.domain != domain);
    StatusCode::OK
}

async fn create_route(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<Value>,
) -> StatusCode {
    tokio::time::sleep(state.delay).await;
    *state.last_route_body.lock().unwrap() = Some(body);
    StatusCode::CREATED
}

async fn update_route(State(state): State<Arc<ServerState>>, Json(_body): Json<Value>) -> StatusCode {
    tokio::time::sleep(state.delay).await;
    StatusCode::OK
}

async fn delete_route(
    State(state): State<Arc<ServerState>>,
    Path((domain, route)): Path<(String, String)>,
) -> StatusCode {
    tokio::time::sleep(state.delay).await;
    let mut domains = state.domains.lock().unwrap();
    if let Some(entry) = domains.iter_mut().find(|d| d.domain == domain) {
        entry.routes.retain(|r| r.route != route);
    }
    StatusCode::OK
}
