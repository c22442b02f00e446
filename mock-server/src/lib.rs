use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// What `/echo` saw of the request it answered.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, Vec<String>>,
    pub body: String,
}

#[derive(Deserialize)]
pub struct FlakyParams {
    #[serde(default = "default_failures")]
    pub failures: u32,
}

fn default_failures() -> u32 {
    1
}

/// Hit counters per key, shared by `/flaky` and `/hits`.
pub type Hits = Arc<RwLock<HashMap<String, u32>>>;

pub fn app() -> Router {
    let hits: Hits = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", get(status))
        .route("/slow/{ms}", get(slow))
        .route("/flaky/{key}", get(flaky))
        .route("/hits/{key}", get(hit_count))
        .route("/items/{id}", get(item))
        .route("/malformed", get(malformed))
        .with_state(hits)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Echo> {
    let mut seen: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in &headers {
        seen.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    Json(Echo {
        method: method.to_string(),
        query,
        headers: seen,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, Json(json!({ "error": format!("status {code}") }))))
}

async fn slow(Path(ms): Path<u64>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(json!({ "slept_ms": ms }))
}

async fn flaky(
    State(hits): State<Hits>,
    Path(key): Path<String>,
    Query(params): Query<FlakyParams>,
) -> (StatusCode, Json<Value>) {
    let attempts = {
        let mut hits = hits.write().await;
        let count = hits.entry(key).or_insert(0);
        *count += 1;
        *count
    };
    if attempts <= params.failures {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "try again" })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "id": 42, "attempts": attempts })))
    }
}

async fn hit_count(State(hits): State<Hits>, Path(key): Path<String>) -> Json<Value> {
    let count = hits.read().await.get(&key).copied().unwrap_or(0);
    Json(json!({ "key": key, "hits": count }))
}

async fn item(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({ "id": id }))
}

async fn malformed() -> &'static str {
    "not json"
}
