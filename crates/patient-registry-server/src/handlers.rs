//! Request handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::anyhow;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use patient_registry_core::{
    NewPatient, PatientBody, PatientRegistry, PatientUpdate, RegistryResult, SortField, SortOrder,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Plain `{"message": ...}` response.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// Query string of `GET /sort`.
#[derive(Debug, Deserialize)]
pub struct SortParams {
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Run a registry operation on the blocking pool. The registry takes a std
/// mutex and does file I/O, so it never runs on a runtime worker.
async fn with_registry<T, F>(state: &AppState, op: F) -> ApiResult<T>
where
    F: FnOnce(&PatientRegistry) -> RegistryResult<T> + Send + 'static,
    T: Send + 'static,
{
    let registry = Arc::clone(&state.registry);
    let result = tokio::task::spawn_blocking(move || op(&registry))
        .await
        .map_err(|err| ApiError::internal(anyhow!("task join error: {err}")))?;
    Ok(result?)
}

pub async fn root() -> Json<Message> {
    Json(Message {
        message: "Patient Management System API",
    })
}

pub async fn about() -> Json<Message> {
    Json(Message {
        message: "A fully functional API to manage your patient record.",
    })
}

/// GET /view — the whole collection keyed by id.
pub async fn view(State(state): State<AppState>) -> ApiResult<Response> {
    let patients = with_registry(&state, |registry| registry.list()).await?;
    let collection: BTreeMap<&str, PatientBody<'_>> =
        patients.iter().map(|p| (p.id(), p.body())).collect();
    Ok(Json(collection).into_response())
}

/// GET /patient/:id
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let patient = with_registry(&state, move |registry| registry.get(&id)).await?;
    Ok(Json(patient.view()).into_response())
}

/// GET /sort?sort_by=..&order=..
pub async fn sort_patients(
    State(state): State<AppState>,
    params: Result<Query<SortParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) = params?;
    let field: SortField = params
        .sort_by
        .as_deref()
        .ok_or_else(|| ApiError::Unprocessable("sort_by query parameter is required".into()))?
        .parse()?;
    let order: SortOrder = match params.order.as_deref() {
        Some(order) => order.parse()?,
        None => SortOrder::default(),
    };

    let patients = with_registry(&state, move |registry| registry.sorted(field, order)).await?;
    let views: Vec<_> = patients.iter().map(|p| p.view()).collect();
    Ok(Json(views).into_response())
}

/// POST /create
pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<NewPatient>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(new) = payload?;
    let patient = with_registry(&state, move |registry| registry.create(new)).await?;
    Ok((StatusCode::CREATED, Json(patient.view())).into_response())
}

/// PUT /edit/:id
pub async fn edit_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PatientUpdate>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(update) = payload?;
    let patient =
        with_registry(&state, move |registry| registry.update(&id, &update)).await?;
    Ok(Json(patient.view()).into_response())
}

/// DELETE /delete/:id
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    with_registry(&state, move |registry| registry.delete(&id)).await?;
    Ok(Json(Message {
        message: "Patient deleted",
    }))
}

pub async fn fallback() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
