use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;

use crate::dashboard::gantt::{build_gantt, GanttChart};
use crate::dashboard::map::{build_map, MapPoint};
use crate::dashboard::summary::{summarize, DashboardSummary};
use crate::errors::AppError;
use crate::models::metro::MetroCode;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let rfps = state.store.list_rfps().await?;
    Ok(Json(summarize(&rfps, Utc::now().date_naive())))
}

/// GET /api/v1/dashboard/gantt
pub async fn handle_gantt(State(state): State<AppState>) -> Result<Json<GanttChart>, AppError> {
    let rfps = state.store.list_rfps().await?;
    Ok(Json(build_gantt(&rfps)))
}

/// GET /api/v1/dashboard/map
pub async fn handle_map(State(state): State<AppState>) -> Result<Json<Vec<MapPoint>>, AppError> {
    let metros = state.store.list_metro_codes().await?;
    let rfps = state.store.list_rfps().await?;
    let contractors = state.store.list_contractors().await?;
    Ok(Json(build_map(metros, &rfps, &contractors)))
}

/// GET /api/v1/metros
pub async fn handle_list_metros(
    State(state): State<AppState>,
) -> Result<Json<Vec<MetroCode>>, AppError> {
    Ok(Json(state.store.list_metro_codes().await?))
}

/// GET /api/v1/metros/:code
pub async fn handle_get_metro(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MetroCode>, AppError> {
    let code = code.trim().to_ascii_uppercase();
    state
        .store
        .list_metro_codes()
        .await?
        .into_iter()
        .find(|m| m.code == code)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("metro code {code} not found")))
}
