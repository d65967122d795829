//! Request handlers. Every core call runs on the blocking pool because key
//! derivation is CPU-bound.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use laterlock_core::{
    Clock, CreateLockRequest, GateAction, GateOutcome, LockId, LockService, LockStatus, LockStore,
};

use super::error::ApiError;

pub type SharedService<S, C> = Arc<LockService<S, C>>;

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
}

async fn run_blocking<S, C, T, F>(service: &SharedService<S, C>, op: F) -> Result<T, ApiError>
where
    S: LockStore + 'static,
    C: Clock + Clone + 'static,
    T: Send + 'static,
    F: FnOnce(&LockService<S, C>) -> laterlock_core::Result<T> + Send + 'static,
{
    let service = Arc::clone(service);
    tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?
        .map_err(ApiError::from)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn create_lock<S, C>(
    State(service): State<SharedService<S, C>>,
    payload: Result<Json<CreateLockRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LockStatus>), ApiError>
where
    S: LockStore + 'static,
    C: Clock + Clone + 'static,
{
    let Json(request) = payload?;
    let status = run_blocking(&service, move |svc| svc.create(request)).await?;
    Ok((StatusCode::CREATED, Json(status)))
}

pub async fn get_lock<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(id): Path<String>,
) -> Result<Json<LockStatus>, ApiError>
where
    S: LockStore + 'static,
    C: Clock + Clone + 'static,
{
    let id = LockId::parse(&id)?;
    let status = run_blocking(&service, move |svc| svc.status(&id)).await?;
    Ok(Json(status))
}

pub async fn apply_action<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(id): Path<String>,
    payload: Result<Json<ActionRequest>, JsonRejection>,
) -> Result<Response, ApiError>
where
    S: LockStore + 'static,
    C: Clock + Clone + 'static,
{
    let id = LockId::parse(&id)?;
    let Json(body) = payload?;
    let action = GateAction::from_str(&body.action)?;

    let outcome = run_blocking(&service, move |svc| svc.gate().apply(&id, action)).await?;
    Ok(match outcome {
        GateOutcome::Receipt(receipt) => Json(receipt).into_response(),
        GateOutcome::Disclosed(disclosure) => Json(disclosure.to_response()).into_response(),
    })
}

pub async fn delete_lock<S, C>(
    State(service): State<SharedService<S, C>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    S: LockStore + 'static,
    C: Clock + Clone + 'static,
{
    let id = LockId::parse(&id)?;
    run_blocking(&service, move |svc| svc.delete(&id)).await?;
    Ok(Json(json!({ "message": "Lock deleted successfully" })))
}
