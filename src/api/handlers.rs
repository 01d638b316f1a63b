//! Route handlers
//!
//! Telemetry queries block on the session worker, so every handler hops onto
//! the blocking pool before touching the service.

use crate::api::error::ApiError;
use crate::domain::{GpuInfo, GpuList, HealthReport, MemoryInfo, Utilization};
use crate::services::Telemetry;

use axum::{
    extract::{Path, State},
    Json,
};

async fn blocking<T, F>(telemetry: Telemetry, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Telemetry) -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&telemetry))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

/// `GET /`
pub async fn health(State(telemetry): State<Telemetry>) -> Result<Json<HealthReport>, ApiError> {
    let report = blocking(telemetry, |t| Ok(t.health())).await?;
    Ok(Json(report))
}

/// `GET /api/v1/gpus`
pub async fn list_gpus(State(telemetry): State<Telemetry>) -> Result<Json<GpuList>, ApiError> {
    let list = blocking(telemetry, |t| Ok(t.all_gpus())).await?;
    Ok(Json(list))
}

/// `GET /api/v1/gpus/:device_id`
pub async fn get_gpu(
    State(telemetry): State<Telemetry>,
    Path(device_id): Path<i64>,
) -> Result<Json<GpuInfo>, ApiError> {
    let info = blocking(telemetry, move |t| {
        let index = t
            .checked_index(device_id)
            .ok_or(ApiError::GpuNotFound(device_id))?;
        t.gpu_info(index).ok_or(ApiError::InfoUnavailable(index))
    })
    .await?;
    Ok(Json(info))
}

/// `GET /api/v1/gpus/:device_id/memory`
pub async fn get_memory(
    State(telemetry): State<Telemetry>,
    Path(device_id): Path<i64>,
) -> Result<Json<MemoryInfo>, ApiError> {
    let memory = blocking(telemetry, move |t| {
        let index = t
            .checked_index(device_id)
            .ok_or(ApiError::GpuNotFound(device_id))?;
        t.memory_info(index)
            .ok_or(ApiError::HandleUnavailable(index))
    })
    .await?;
    Ok(Json(memory))
}

/// `GET /api/v1/gpus/:device_id/utilization`
pub async fn get_utilization(
    State(telemetry): State<Telemetry>,
    Path(device_id): Path<i64>,
) -> Result<Json<Utilization>, ApiError> {
    let utilization = blocking(telemetry, move |t| {
        let index = t
            .checked_index(device_id)
            .ok_or(ApiError::GpuNotFound(device_id))?;
        let handle = t.handle(index).ok_or(ApiError::HandleUnavailable(index))?;
        t.utilization(&handle)
            .ok_or(ApiError::UtilizationUnavailable(index))
    })
    .await?;
    Ok(Json(utilization))
}
