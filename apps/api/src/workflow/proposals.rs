use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::drafting::kinds::MessageKind;
use crate::drafting::outputs::EmailDraft;
use crate::errors::AppError;
use crate::files::extract::extract_text;
use crate::files::object_key;
use crate::models::contractor::ContractorType;
use crate::models::proposal::Proposal;
use crate::state::AppState;
use crate::workflow::invitations::draft_for_contractor;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualProposalRequest {
    pub contractor_id: Uuid,
    #[serde(default)]
    pub extracted_text: String,
    pub document_url: Option<String>,
}

/// What a contractor sees on the public submission page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPage {
    pub rfp_id: Uuid,
    pub project_name: String,
    pub scope_of_work: String,
    pub metro_code: String,
    pub contractor_type: ContractorType,
    pub rfp_end_date: Option<NaiveDate>,
    pub technical_documents: Vec<String>,
}

/// Records a proposal received outside the submission link. The contractor need not
/// have been invited.
pub async fn add_manual_proposal(
    state: &AppState,
    rfp_id: Uuid,
    request: ManualProposalRequest,
) -> Result<Proposal, AppError> {
    state.store.get_rfp(rfp_id).await?;
    let contractor = state.store.get_contractor(request.contractor_id).await?;

    let proposal = Proposal::submitted(
        rfp_id,
        contractor.id,
        contractor.name,
        request.document_url,
        request.extracted_text.trim().to_string(),
    );
    state.store.insert_proposal(&proposal).await?;
    info!("Recorded manual proposal {} on RFP {rfp_id}", proposal.id);
    Ok(proposal)
}

/// Stores an invited contractor's uploaded proposal and its extracted text.
pub async fn submit_proposal(
    state: &AppState,
    rfp_id: Uuid,
    contractor_id: Uuid,
    filename: &str,
    content_type: &str,
    bytes: Bytes,
) -> Result<Proposal, AppError> {
    let rfp = state.store.get_rfp(rfp_id).await?;
    if !rfp.is_invited(contractor_id) {
        warn!("Rejected submission from uninvited contractor {contractor_id} on RFP {rfp_id}");
        return Err(AppError::Validation(
            "Contractor is not invited to this RFP".to_string(),
        ));
    }
    if bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    let contractor = state.store.get_contractor(contractor_id).await?;

    let text = extract_text(filename, content_type, bytes.clone()).await?;
    let key = object_key(rfp_id, "proposals", filename);
    let url = state.files.put(&key, bytes, content_type).await?;

    let proposal = Proposal::submitted(rfp_id, contractor.id, contractor.name, Some(url), text);
    state.store.insert_proposal(&proposal).await?;
    info!(
        "Received proposal {} from {} on RFP {rfp_id}",
        proposal.id, proposal.contractor_name
    );
    Ok(proposal)
}

/// GET /api/v1/rfps/:id/proposals
pub async fn handle_list_proposals(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Proposal>>, AppError> {
    state.store.get_rfp(id).await?;
    Ok(Json(state.store.list_proposals(id).await?))
}

/// POST /api/v1/rfps/:id/proposals
pub async fn handle_add_proposal(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ManualProposalRequest>,
) -> Result<(StatusCode, Json<Proposal>), AppError> {
    let proposal = add_manual_proposal(&state, id, body).await?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

/// POST /api/v1/rfps/:id/reminders/:cid/draft
pub async fn handle_draft_reminder(
    State(state): State<AppState>,
    Path((id, contractor_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EmailDraft>, AppError> {
    Ok(Json(
        draft_for_contractor(&state, id, contractor_id, MessageKind::Reminder).await?,
    ))
}

/// GET /proposal/submit/:rfp_id (public)
pub async fn handle_submission_page(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
) -> Result<Json<SubmissionPage>, AppError> {
    let rfp = state.store.get_rfp(rfp_id).await?;
    Ok(Json(SubmissionPage {
        rfp_id: rfp.id,
        project_name: rfp.project_name,
        scope_of_work: rfp.scope_of_work,
        metro_code: rfp.metro_code,
        contractor_type: rfp.contractor_type,
        rfp_end_date: rfp.rfp_end_date,
        technical_documents: rfp.technical_documents,
    }))
}

/// POST /proposal/submit/:rfp_id (public, multipart: `contractorId` + `file`)
pub async fn handle_submit_proposal(
    State(state): State<AppState>,
    Path(rfp_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Proposal>), AppError> {
    let mut contractor_id: Option<Uuid> = None;
    let mut upload: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("contractorId") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                contractor_id = Some(raw.trim().parse().map_err(|_| {
                    AppError::Validation("contractorId must be a UUID".to_string())
                })?);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("proposal").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                upload = Some((filename, content_type, bytes));
            }
            _ => {}
        }
    }

    let contractor_id = contractor_id
        .ok_or_else(|| AppError::Validation("contractorId is required".to_string()))?;
    let (filename, content_type, bytes) =
        upload.ok_or_else(|| AppError::Validation("A proposal file is required".to_string()))?;

    let proposal =
        submit_proposal(&state, rfp_id, contractor_id, &filename, &content_type, bytes).await?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::proposal::ProposalStatus;
    use crate::models::rfp::Rfp;
    use crate::testing::{contractor, sample_fields, test_state};
    use crate::workflow::selection::invite_contractor;

    #[tokio::test]
    async fn test_invited_contractor_submission_is_stored_with_text() {
        let harness = test_state(vec![]);
        let state = &harness.state;
        let rfp = Rfp::new(sample_fields());
        state.store.insert_rfp(&rfp).await.unwrap();
        let vendor = contractor("Volt Co", ContractorType::Electrical, "NYC", 80);
        state.store.upsert_contractor(&vendor).await.unwrap();
        invite_contractor(state.store.as_ref(), rfp.id, vendor.id)
            .await
            .unwrap();

        let proposal = submit_proposal(
            state,
            rfp.id,
            vendor.id,
            "bid.txt",
            "text/plain",
            Bytes::from_static(b"We install generators safely."),
        )
        .await
        .unwrap();

        assert_eq!(proposal.status, ProposalStatus::Submitted);
        assert_eq!(proposal.extracted_text, "We install generators safely.");
        assert!(proposal.document_url.is_some());
        assert_eq!(state.store.list_proposals(rfp.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_uninvited_submission_is_rejected() {
        let harness = test_state(vec![]);
        let state = &harness.state;
        let rfp = Rfp::new(sample_fields());
        state.store.insert_rfp(&rfp).await.unwrap();
        let vendor = contractor("Volt Co", ContractorType::Electrical, "NYC", 80);
        state.store.upsert_contractor(&vendor).await.unwrap();

        let result = submit_proposal(
            state,
            rfp.id,
            vendor.id,
            "bid.txt",
            "text/plain",
            Bytes::from_static(b"text"),
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(state.store.list_proposals(rfp.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_manual_proposal_accepts_uninvited_contractor() {
        let harness = test_state(vec![]);
        let state = &harness.state;
        let rfp = Rfp::new(sample_fields());
        state.store.insert_rfp(&rfp).await.unwrap();
        let vendor = contractor("Walk-in Electric", ContractorType::Electrical, "BOS", 60);
        state.store.upsert_contractor(&vendor).await.unwrap();

        let proposal = add_manual_proposal(
            state,
            rfp.id,
            ManualProposalRequest {
                contractor_id: vendor.id,
                extracted_text: "Emailed bid".to_string(),
                document_url: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(proposal.contractor_name, "Walk-in Electric");
    }
}
