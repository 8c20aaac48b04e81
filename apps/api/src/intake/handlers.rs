use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::files::object_key;
use crate::intake::validation::{validate_intake, IntakeForm, EDITABLE_FIELDS};
use crate::models::rfp::Rfp;
use crate::state::AppState;
use crate::store::RfpStore;

/// Validates the form and writes a new Draft RFP. Nothing is written on failure.
pub async fn create_rfp(store: &dyn RfpStore, form: &IntakeForm) -> Result<Rfp, AppError> {
    let fields = validate_intake(form).map_err(|errors| {
        warn!("Rejected intake form: {} invalid field(s)", errors.len());
        AppError::InvalidFields(errors)
    })?;

    let rfp = Rfp::new(fields);
    store.insert_rfp(&rfp).await?;
    info!("Created RFP {} ({})", rfp.id, rfp.project_name);
    Ok(rfp)
}

/// Overlays the editable keys present in `patch` onto the RFP's current fields,
/// then re-validates the merged form.
pub async fn edit_rfp(store: &dyn RfpStore, id: Uuid, patch: &Map<String, Value>) -> Result<Rfp, AppError> {
    let mut rfp = store.get_rfp(id).await?;

    let mut merged = match serde_json::to_value(rfp.fields())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize RFP fields: {e}")))?
    {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        if EDITABLE_FIELDS.contains(&key.as_str()) {
            merged.insert(key.clone(), value.clone());
        } else {
            return Err(AppError::Validation(format!("Field '{key}' cannot be edited")));
        }
    }

    let form: IntakeForm = serde_json::from_value(Value::Object(merged))
        .map_err(|e| AppError::Validation(format!("Malformed RFP fields: {e}")))?;
    let fields = validate_intake(&form).map_err(AppError::InvalidFields)?;

    rfp.apply_fields(fields);
    rfp.touch();
    store.update_rfp(&rfp).await?;
    info!("Updated RFP {}", rfp.id);
    Ok(rfp)
}

/// POST /api/v1/rfps
pub async fn handle_create_rfp(
    State(state): State<AppState>,
    Json(form): Json<IntakeForm>,
) -> Result<(StatusCode, Json<Rfp>), AppError> {
    let rfp = create_rfp(state.store.as_ref(), &form).await?;
    Ok((StatusCode::CREATED, Json(rfp)))
}

/// GET /api/v1/rfps
pub async fn handle_list_rfps(State(state): State<AppState>) -> Result<Json<Vec<Rfp>>, AppError> {
    Ok(Json(state.store.list_rfps().await?))
}

/// GET /api/v1/rfps/:id
pub async fn handle_get_rfp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Rfp>, AppError> {
    Ok(Json(state.store.get_rfp(id).await?))
}

/// PATCH /api/v1/rfps/:id
pub async fn handle_update_rfp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<Map<String, Value>>,
) -> Result<Json<Rfp>, AppError> {
    Ok(Json(edit_rfp(state.store.as_ref(), id, &patch).await?))
}

/// DELETE /api/v1/rfps/:id
pub async fn handle_delete_rfp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_rfp(id).await?;
    info!("Deleted RFP {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/rfps/:id/documents
///
/// Multipart upload of one or more technical documents. Each file is stored and its
/// URL appended to the RFP's `technicalDocuments`.
pub async fn handle_upload_documents(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Rfp>, AppError> {
    let mut rfp = state.store.get_rfp(id).await?;
    let mut uploaded = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let filename = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::Validation(format!("File '{filename}' is empty")));
        }

        let key = object_key(id, "documents", &filename);
        let url = state.files.put(&key, bytes, &content_type).await?;
        rfp.technical_documents.push(url);
        uploaded += 1;
    }

    if uploaded == 0 {
        return Err(AppError::Validation("No files were uploaded".to_string()));
    }

    rfp.touch();
    state.store.update_rfp(&rfp).await?;
    info!("Attached {uploaded} document(s) to RFP {id}");
    Ok(Json(rfp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rfp::RfpStatus;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn scenario_form() -> IntakeForm {
        serde_json::from_value(json!({
            "projectName": "NYC Data Center Expansion",
            "scopeOfWork": "Install backup generators",
            "metroCode": "NYC",
            "contractorType": "Electrical",
            "estimatedBudget": 500000,
            "projectStartDate": "2025-01-01"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_scenario_creates_draft_rfp() {
        let store = MemoryStore::new();
        let rfp = create_rfp(&store, &scenario_form()).await.unwrap();

        assert_eq!(rfp.status, RfpStatus::Draft);
        assert!(rfp.invited_contractors.is_empty());
        assert!(rfp.completed_stages.is_empty());
        assert_eq!(rfp.project_name, "NYC Data Center Expansion");
    }

    #[tokio::test]
    async fn test_round_trip_preserves_editable_fields() {
        let store = MemoryStore::new();
        let form = scenario_form();
        let created = create_rfp(&store, &form).await.unwrap();

        let read_back = store.get_rfp(created.id).await.unwrap();
        assert_eq!(read_back.fields(), validate_intake(&form).unwrap());
    }

    #[tokio::test]
    async fn test_invalid_budget_writes_nothing() {
        let store = MemoryStore::new();
        for bad in [json!(-5), json!("lots")] {
            let mut form = scenario_form();
            form.estimated_budget = bad;
            let result = create_rfp(&store, &form).await;
            assert!(matches!(result, Err(AppError::InvalidFields(_))));
        }
        assert!(store.list_rfps().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_overlays_only_supplied_fields() {
        let store = MemoryStore::new();
        let rfp = create_rfp(&store, &scenario_form()).await.unwrap();

        let patch = json!({ "estimatedBudget": "750000", "rfpEndDate": "2025-02-15" });
        let edited = edit_rfp(&store, rfp.id, patch.as_object().unwrap())
            .await
            .unwrap();

        assert_eq!(edited.estimated_budget, 750000.0);
        assert_eq!(edited.project_name, rfp.project_name);
        assert_eq!(
            edited.rfp_end_date,
            chrono::NaiveDate::from_ymd_opt(2025, 2, 15)
        );
    }

    #[tokio::test]
    async fn test_edit_rejects_workflow_fields() {
        let store = MemoryStore::new();
        let rfp = create_rfp(&store, &scenario_form()).await.unwrap();
        let patch = json!({ "status": "Awarded" });
        assert!(matches!(
            edit_rfp(&store, rfp.id, patch.as_object().unwrap()).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_edit_with_negative_budget_leaves_record_unchanged() {
        let store = MemoryStore::new();
        let rfp = create_rfp(&store, &scenario_form()).await.unwrap();
        let patch = json!({ "estimatedBudget": -10 });
        assert!(edit_rfp(&store, rfp.id, patch.as_object().unwrap())
            .await
            .is_err());
        assert_eq!(store.get_rfp(rfp.id).await.unwrap().estimated_budget, 500000.0);
    }
}
