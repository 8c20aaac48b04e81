use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::drafting::clarifications::ensure_clarified;
use crate::drafting::inputs::EmailInput;
use crate::drafting::kinds::MessageKind;
use crate::drafting::outputs::EmailDraft;
use crate::errors::AppError;
use crate::mail::{OutgoingEmail, SendReceipt};
use crate::models::contractor::Contractor;
use crate::models::rfp::Rfp;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitedContractor {
    #[serde(flatten)]
    pub contractor: Contractor,
    pub eoi_sent: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResult {
    pub receipt: SendReceipt,
    pub rfp: Rfp,
}

/// Invited contractors in invitation order. Ids whose contractor record is gone are skipped.
pub async fn list_invited(state: &AppState, rfp_id: Uuid) -> Result<Vec<InvitedContractor>, AppError> {
    let rfp = state.store.get_rfp(rfp_id).await?;
    let contractors = state.store.list_contractors().await?;

    Ok(rfp
        .invited_contractors
        .iter()
        .filter_map(|id| contractors.iter().find(|c| c.id == *id))
        .map(|contractor| InvitedContractor {
            eoi_sent: rfp.eoi_sent.contains(&contractor.id),
            contractor: contractor.clone(),
        })
        .collect())
}

/// Drafts a contractor-addressed email for an RFP after the clarification check.
pub async fn draft_for_contractor(
    state: &AppState,
    rfp_id: Uuid,
    contractor_id: Uuid,
    kind: MessageKind,
) -> Result<EmailDraft, AppError> {
    let rfp = state.store.get_rfp(rfp_id).await?;
    let contractor = state.store.get_contractor(contractor_id).await?;
    draft_letter(state, &rfp, &contractor, kind).await
}

pub(crate) async fn draft_letter(
    state: &AppState,
    rfp: &Rfp,
    contractor: &Contractor,
    kind: MessageKind,
) -> Result<EmailDraft, AppError> {
    ensure_clarified(state.store.as_ref(), rfp, kind).await?;

    let link = matches!(
        kind,
        MessageKind::Invitation | MessageKind::Release | MessageKind::Reminder
    )
    .then(|| state.config.submission_link(rfp.id));

    let input = EmailInput::new(rfp, contractor, link);
    state.drafting.draft_email(kind, &input).await
}

/// Hands `draft` to the mail transport, addressed to every contact on file.
pub(crate) async fn send_letter(
    state: &AppState,
    rfp_id: Uuid,
    contractor: &Contractor,
    kind: MessageKind,
    draft: &EmailDraft,
) -> Result<SendReceipt, AppError> {
    let email = OutgoingEmail {
        rfp_id,
        kind: kind.as_str().to_string(),
        to: contractor.emails(),
        subject: draft.email_subject.clone(),
        body: draft.email_body.clone(),
    };
    Ok(state.mail.send(&email).await?)
}

/// Sends the EOI invitation and records the contractor in `eoiSent`.
pub async fn send_invitation(
    state: &AppState,
    rfp_id: Uuid,
    contractor_id: Uuid,
    draft: EmailDraft,
) -> Result<SendResult, AppError> {
    let mut rfp = state.store.get_rfp(rfp_id).await?;
    if !rfp.is_invited(contractor_id) {
        warn!("Refused invitation send to uninvited contractor {contractor_id} on RFP {rfp_id}");
        return Err(AppError::Validation(
            "Contractor has not been invited to this RFP".to_string(),
        ));
    }
    if draft.email_subject.trim().is_empty() || draft.email_body.trim().is_empty() {
        return Err(AppError::Validation(
            "Email subject and body are required".to_string(),
        ));
    }

    let contractor = state.store.get_contractor(contractor_id).await?;
    let receipt = send_letter(state, rfp_id, &contractor, MessageKind::Invitation, &draft).await?;

    if !rfp.eoi_sent.contains(&contractor_id) {
        rfp.eoi_sent.push(contractor_id);
        rfp.touch();
        state.store.update_rfp(&rfp).await?;
    }
    info!("EOI sent to {} for RFP {}", contractor.name, rfp.id);
    Ok(SendResult { receipt, rfp })
}

/// GET /api/v1/rfps/:id/invitations
pub async fn handle_list_invitations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<InvitedContractor>>, AppError> {
    Ok(Json(list_invited(&state, id).await?))
}

/// POST /api/v1/rfps/:id/invitations/:cid/draft
pub async fn handle_draft_invitation(
    State(state): State<AppState>,
    Path((id, contractor_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EmailDraft>, AppError> {
    Ok(Json(
        draft_for_contractor(&state, id, contractor_id, MessageKind::Invitation).await?,
    ))
}

/// POST /api/v1/rfps/:id/release/:cid/draft
pub async fn handle_draft_release(
    State(state): State<AppState>,
    Path((id, contractor_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EmailDraft>, AppError> {
    Ok(Json(
        draft_for_contractor(&state, id, contractor_id, MessageKind::Release).await?,
    ))
}

/// POST /api/v1/rfps/:id/invitations/:cid/send
pub async fn handle_send_invitation(
    State(state): State<AppState>,
    Path((id, contractor_id)): Path<(Uuid, Uuid)>,
    Json(draft): Json<EmailDraft>,
) -> Result<Json<SendResult>, AppError> {
    Ok(Json(send_invitation(&state, id, contractor_id, draft).await?))
}
