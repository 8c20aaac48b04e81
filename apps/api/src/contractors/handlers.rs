use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::contractors::validation::{validate_contractor, ContractorInput, ValidContractor};
use crate::errors::AppError;
use crate::models::contractor::Contractor;
use crate::state::AppState;

/// GET /api/v1/contractors
pub async fn handle_list_contractors(
    State(state): State<AppState>,
) -> Result<Json<Vec<Contractor>>, AppError> {
    Ok(Json(state.store.list_contractors().await?))
}

/// GET /api/v1/contractors/:id
pub async fn handle_get_contractor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Contractor>, AppError> {
    Ok(Json(state.store.get_contractor(id).await?))
}

/// POST /api/v1/contractors
pub async fn handle_create_contractor(
    State(state): State<AppState>,
    Json(input): Json<ContractorInput>,
) -> Result<(StatusCode, Json<Contractor>), AppError> {
    let valid = validate(&state, &input).await?;
    let now = Utc::now();
    let contractor = build(Uuid::new_v4(), valid, now, now);

    state.store.upsert_contractor(&contractor).await?;
    info!(
        "Created contractor {} ({}) serving {:?}",
        contractor.id, contractor.name, contractor.metro_codes
    );
    Ok((StatusCode::CREATED, Json(contractor)))
}

/// PUT /api/v1/contractors/:id
pub async fn handle_update_contractor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ContractorInput>,
) -> Result<Json<Contractor>, AppError> {
    let existing = state.store.get_contractor(id).await?;
    let valid = validate(&state, &input).await?;
    let contractor = build(id, valid, existing.created_at, Utc::now());

    state.store.upsert_contractor(&contractor).await?;
    info!("Updated contractor {}", contractor.id);
    Ok(Json(contractor))
}

async fn validate(state: &AppState, input: &ContractorInput) -> Result<ValidContractor, AppError> {
    let reference = state.store.list_metro_codes().await?;
    validate_contractor(input, &reference).map_err(AppError::InvalidFields)
}

fn build(
    id: Uuid,
    valid: ValidContractor,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
) -> Contractor {
    Contractor {
        id,
        name: valid.name,
        contact_names: valid.contact_names,
        contact_emails: valid.contact_emails,
        contractor_type: valid.contractor_type,
        preferred_status: valid.preferred_status,
        region: valid.region,
        metro_site: valid.metro_site,
        metro_codes: valid.metro_codes,
        performance: valid.performance,
        created_at,
        updated_at,
    }
}
