use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::AppState;
use crate::error::{Result, ServiceError};
use crate::models::worker::WorkerStatus;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>> {
    if body.username != state.admin_username || body.password != state.admin_password {
        return Err(ServiceError::Unauthorized);
    }
    let token = Uuid::new_v4().to_string();
    state.sessions.lock().insert(token.clone());
    Ok(Json(json!({ "token": token })))
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<Value> {
    if let Some(token) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.sessions.lock().remove(token);
    }
    Json(json!({ "message": "Logged out" }))
}

/// Sensor ingest. Fields are pulled out of a raw value so a missing field is
/// a 400 rather than a body-rejection status.
pub async fn receive_alert(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    let bin_id = body.get("bin_id").and_then(Value::as_str);
    let fill_level = body.get("fill_level").and_then(Value::as_f64);
    let (bin_id, fill_level) = match (bin_id, fill_level) {
        (Some(b), Some(f)) => (b, f),
        _ => {
            return Err(ServiceError::Validation(
                "Missing bin_id or fill_level".to_string(),
            ))
        }
    };

    let receipt = state.engine.lock().record_report(bin_id, fill_level)?;
    Ok(Json(json!({
        "message": receipt.outcome.message(),
        "severity": receipt.alert.severity,
    })))
}

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let summary = state.engine.lock().dashboard()?;
    Ok(Json(serde_json::to_value(summary)?))
}

pub async fn list_workers(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let workers = state.engine.lock().list_workers()?;
    Ok(Json(json!({ "workers": workers })))
}

#[derive(Deserialize)]
pub struct NewWorker {
    pub id: String,
    pub name: String,
    pub phone: String,
}

pub async fn add_worker(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewWorker>,
) -> Result<Json<Value>> {
    let worker = state
        .engine
        .lock()
        .add_worker(&body.id, &body.name, &body.phone)?;
    Ok(Json(json!({ "message": "Worker added", "worker": worker })))
}

pub async fn delete_worker(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.engine.lock().delete_worker(&id)?;
    Ok(Json(json!({ "message": "Worker deleted" })))
}

#[derive(Deserialize)]
pub struct StatusChange {
    pub status: WorkerStatus,
}

pub async fn change_worker_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<StatusChange>,
) -> Result<Json<Value>> {
    let worker = state.engine.lock().set_worker_status(&id, body.status)?;
    Ok(Json(json!({ "message": "Worker status changed", "worker": worker })))
}

pub async fn list_bins(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let bins = state.engine.lock().list_bins()?;
    Ok(Json(json!({ "bins": bins })))
}

fn default_capacity() -> u32 {
    100
}

#[derive(Deserialize)]
pub struct NewBin {
    pub id: String,
    pub address: String,
    pub area: String,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
}

pub async fn add_bin(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewBin>,
) -> Result<Json<Value>> {
    let bin = state
        .engine
        .lock()
        .add_bin(&body.id, &body.address, &body.area, body.capacity)?;
    Ok(Json(json!({ "message": "Bin added", "bin": bin })))
}

#[derive(Deserialize)]
pub struct BinUpdate {
    pub address: String,
    pub area: String,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
}

pub async fn edit_bin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<BinUpdate>,
) -> Result<Json<Value>> {
    let bin = state
        .engine
        .lock()
        .edit_bin(&id, &body.address, &body.area, body.capacity)?;
    Ok(Json(json!({ "message": "Bin updated", "bin": bin })))
}

pub async fn delete_bin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    state.engine.lock().delete_bin(&id)?;
    Ok(Json(json!({ "message": "Bin deleted" })))
}

pub async fn list_alerts(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let alerts = state.engine.lock().active_alerts()?;
    Ok(Json(json!({ "alerts": alerts })))
}

pub async fn resolve_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let alert = state.engine.lock().resolve_alert(&id)?;
    Ok(Json(json!({ "message": "Alert resolved", "alert": alert })))
}

#[derive(Deserialize)]
pub struct NewAssignment {
    pub alert_id: String,
    pub worker_id: String,
}

pub async fn assign_worker(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewAssignment>,
) -> Result<Json<Value>> {
    let assignment = state
        .engine
        .lock()
        .assign_worker(&body.alert_id, &body.worker_id)?;
    Ok(Json(json!({ "message": "Worker assigned", "assignment": assignment })))
}

pub async fn unassign_worker(
    State(state): State<Arc<AppState>>,
    Path((alert_id, worker_id)): Path<(String, String)>,
) -> Result<Json<Value>> {
    state.engine.lock().unassign_worker(&alert_id, &worker_id)?;
    Ok(Json(json!({ "message": "Worker unassigned" })))
}
