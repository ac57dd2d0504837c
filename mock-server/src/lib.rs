use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provision {
    pub tunnel_id: String,
    pub tunnel_token: String,
    pub dns_record_id: String,
    pub access_app_id: String,
}

impl Provision {
    /// Fresh resource ids, standing in for what Cloudflare would hand out.
    pub fn generate() -> Self {
        Self {
            tunnel_id: Uuid::new_v4().to_string(),
            tunnel_token: Uuid::new_v4().simple().to_string(),
            dns_record_id: Uuid::new_v4().to_string(),
            access_app_id: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoginRecord {
    pub user: String,
    pub ip: String,
    pub timestamp: String,
}

#[derive(Deserialize)]
pub struct LoginEvent {
    pub user: String,
    pub ip: String,
}

#[derive(Deserialize)]
pub struct DeleteRequest {
    pub tunnel_token: String,
}

#[derive(Clone, Debug)]
struct StoredLogin {
    user: String,
    ip: String,
    at: DateTime<Utc>,
}

#[derive(Default)]
struct Db {
    provisions: HashMap<String, Provision>,
    logins: HashMap<String, Vec<StoredLogin>>,
    rotations: HashMap<String, u32>,
}

#[derive(Clone, Default)]
pub struct AppState {
    token: Option<String>,
    db: Arc<RwLock<Db>>,
}

impl AppState {
    /// State requiring `Authorization: Bearer <token>` when `token` is set.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            db: Arc::default(),
        }
    }

    /// Register a provisioned service and return its resources.
    pub async fn provision(&self, subdomain: &str) -> Provision {
        let provision = Provision::generate();
        self.db
            .write()
            .await
            .provisions
            .insert(subdomain.to_string(), provision.clone());
        provision
    }

    pub async fn record_login(&self, subdomain: &str, user: &str, ip: &str, at: DateTime<Utc>) {
        self.db
            .write()
            .await
            .logins
            .entry(subdomain.to_string())
            .or_default()
            .push(StoredLogin {
                user: user.to_string(),
                ip: ip.to_string(),
                at,
            });
    }

    pub async fn rotations(&self, subdomain: &str) -> u32 {
        self.db
            .read()
            .await
            .rotations
            .get(subdomain)
            .copied()
            .unwrap_or(0)
    }

    pub async fn is_provisioned(&self, subdomain: &str) -> bool {
        self.db.read().await.provisions.contains_key(subdomain)
    }
}

pub fn app() -> Router {
    app_with(AppState::default())
}

pub fn app_with(state: AppState) -> Router {
    Router::new()
        .route("/provision/{subdomain}", get(get_provision).delete(delete_provision))
        .route("/rotate-key/{subdomain}", post(rotate_key))
        .route("/history/{subdomain}", get(history))
        .route("/record-login/{subdomain}", post(record_login))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(token) = &state.token {
        let expected = format!("Bearer {token}");
        let supplied = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if supplied != Some(expected.as_str()) {
            tracing::warn!(path = %request.uri().path(), "rejected request with bad bearer token");
            return detail(StatusCode::UNAUTHORIZED, "unauthorized");
        }
    }
    next.run(request).await
}

async fn get_provision(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> Result<Json<Provision>, Response> {
    let db = state.db.read().await;
    db.provisions
        .get(&subdomain)
        .cloned()
        .map(Json)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "unknown subdomain"))
}

// The body is optional: the console deletes without one, scripts send the
// tunnel token.
async fn delete_provision(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, Response> {
    let proof: Option<DeleteRequest> = if body.is_empty() {
        None
    } else {
        Some(
            serde_json::from_slice(&body)
                .map_err(|e| detail(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()))?,
        )
    };

    let mut db = state.db.write().await;
    let provision = db
        .provisions
        .get(&subdomain)
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "unknown subdomain"))?;
    if let Some(proof) = proof {
        if proof.tunnel_token != provision.tunnel_token {
            return Err(detail(StatusCode::FORBIDDEN, "invalid token"));
        }
    }
    db.provisions.remove(&subdomain);
    db.rotations.remove(&subdomain);
    tracing::info!(%subdomain, "provision deleted");
    Ok(Json(json!({ "status": "deleted" })))
}

async fn rotate_key(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> Result<Json<serde_json::Value>, Response> {
    let mut db = state.db.write().await;
    if !db.provisions.contains_key(&subdomain) {
        return Err(detail(StatusCode::NOT_FOUND, "unknown subdomain"));
    }
    *db.rotations.entry(subdomain.clone()).or_default() += 1;
    tracing::info!(%subdomain, "host key rotated");
    Ok(Json(json!({ "status": "rotated" })))
}

async fn history(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> Json<Vec<LoginRecord>> {
    let db = state.db.read().await;
    let mut events = db.logins.get(&subdomain).cloned().unwrap_or_default();
    events.sort_by(|a, b| b.at.cmp(&a.at));
    Json(
        events
            .into_iter()
            .map(|e| LoginRecord {
                user: e.user,
                ip: e.ip,
                timestamp: e.at.to_rfc3339_opts(SecondsFormat::Micros, true),
            })
            .collect(),
    )
}

async fn record_login(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    Json(event): Json<LoginEvent>,
) -> Json<serde_json::Value> {
    state
        .record_login(&subdomain, &event.user, &event.ip, Utc::now())
        .await;
    Json(json!({ "status": "recorded" }))
}
