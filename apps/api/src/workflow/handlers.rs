use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::proposal::ProposalStatus;
use crate::models::rfp::WorkflowStage;
use crate::state::AppState;
use crate::store::RfpStore;
use crate::workflow::stages::{complete_stage, WorkflowView};

pub async fn complete_rfp_stage(
    store: &dyn RfpStore,
    rfp_id: Uuid,
    stage: WorkflowStage,
) -> Result<WorkflowView, AppError> {
    let mut rfp = store.get_rfp(rfp_id).await?;
    let has_awarded_proposal = store
        .list_proposals(rfp_id)
        .await?
        .iter()
        .any(|p| p.status == ProposalStatus::Awarded);

    let changed = complete_stage(&mut rfp, stage, has_awarded_proposal).map_err(|msg| {
        warn!("Refused to complete {stage} on RFP {rfp_id}: {msg}");
        AppError::Validation(msg)
    })?;
    if changed {
        store.update_rfp(&rfp).await?;
        info!("Completed {stage} on RFP {rfp_id}; status is now {}", rfp.status);
    }
    Ok(WorkflowView::from(&rfp))
}

/// GET /api/v1/rfps/:id/workflow
pub async fn handle_get_workflow(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkflowView>, AppError> {
    let rfp = state.store.get_rfp(id).await?;
    Ok(Json(WorkflowView::from(&rfp)))
}

/// POST /api/v1/rfps/:id/stages/:stage/complete
pub async fn handle_complete_stage(
    State(state): State<AppState>,
    Path((id, stage)): Path<(Uuid, String)>,
) -> Result<Json<WorkflowView>, AppError> {
    let stage: WorkflowStage = stage.parse().map_err(AppError::Validation)?;
    Ok(Json(complete_rfp_stage(state.store.as_ref(), id, stage).await?))
}
