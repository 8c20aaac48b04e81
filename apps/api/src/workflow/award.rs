use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::drafting::kinds::MessageKind;
use crate::drafting::outputs::{DraftShape, EmailDraft};
use crate::errors::AppError;
use crate::mail::SendReceipt;
use crate::models::contractor::Contractor;
use crate::models::proposal::{Proposal, ProposalStatus};
use crate::models::rfp::{Rfp, RfpStatus};
use crate::state::AppState;
use crate::workflow::invitations::{draft_letter, send_letter};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardDraftRequest {
    pub contractor_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Letter {
    pub contractor_id: Uuid,
    pub kind: MessageKind,
    #[serde(flatten)]
    pub draft: EmailDraft,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardDrafts {
    pub award: Letter,
    pub non_awards: Vec<Letter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeAwardRequest {
    pub contractor_id: Uuid,
    /// Reviewed letters to send. Omitted means nothing is sent.
    #[serde(default)]
    pub letters: Vec<Letter>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardOutcome {
    pub rfp: Rfp,
    pub proposals: Vec<Proposal>,
    pub receipts: Vec<SendReceipt>,
}

/// Distinct proposers other than the winner, in submission order.
fn other_proposers(proposals: &[Proposal], winner: Uuid) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = Vec::new();
    for proposal in proposals {
        if proposal.contractor_id != winner && !ids.contains(&proposal.contractor_id) {
            ids.push(proposal.contractor_id);
        }
    }
    ids
}

fn require_proposal_from(proposals: &[Proposal], contractor_id: Uuid) -> Result<(), AppError> {
    if proposals.iter().any(|p| p.contractor_id == contractor_id) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "The chosen contractor has no proposal on this RFP".to_string(),
        ))
    }
}

/// Award letters go to the winner only and non-award letters to everyone else.
fn check_letter(letter: &Letter, winner_id: Uuid) -> Result<(), AppError> {
    let to_winner = letter.contractor_id == winner_id;
    match letter.kind {
        MessageKind::Award if !to_winner => {
            return Err(AppError::Validation(
                "Award letters may only go to the winning contractor".to_string(),
            ))
        }
        MessageKind::NonAward if to_winner => {
            return Err(AppError::Validation(
                "The winning contractor cannot receive a non-award letter".to_string(),
            ))
        }
        MessageKind::Award | MessageKind::NonAward => {}
        other => {
            return Err(AppError::Validation(format!(
                "'{other}' letters cannot be sent with an award"
            )))
        }
    }
    letter.draft.check().map_err(AppError::Validation)
}

/// Drafts the award letter for the winner and a non-award letter for every other proposer.
pub async fn draft_award_letters(
    state: &AppState,
    rfp_id: Uuid,
    winner_id: Uuid,
) -> Result<AwardDrafts, AppError> {
    let rfp = state.store.get_rfp(rfp_id).await?;
    let proposals = state.store.list_proposals(rfp_id).await?;
    require_proposal_from(&proposals, winner_id)?;

    let winner = state.store.get_contractor(winner_id).await?;
    let award = Letter {
        contractor_id: winner.id,
        kind: MessageKind::Award,
        draft: draft_letter(state, &rfp, &winner, MessageKind::Award).await?,
    };

    let mut non_awards = Vec::new();
    for contractor_id in other_proposers(&proposals, winner_id) {
        let contractor = state.store.get_contractor(contractor_id).await?;
        non_awards.push(Letter {
            contractor_id,
            kind: MessageKind::NonAward,
            draft: draft_letter(state, &rfp, &contractor, MessageKind::NonAward).await?,
        });
    }

    info!(
        "Drafted award letters for RFP {rfp_id}: 1 award, {} non-award",
        non_awards.len()
    );
    Ok(AwardDrafts { award, non_awards })
}

/// Marks the winning proposal Awarded and every other proposal Rejected, sets the RFP
/// to Awarded and sends the supplied letters.
///
/// Every letter is checked before the first write. Writes are sequential and not
/// atomic across documents.
pub async fn finalize_award(
    state: &AppState,
    rfp_id: Uuid,
    request: FinalizeAwardRequest,
) -> Result<AwardOutcome, AppError> {
    let mut rfp = state.store.get_rfp(rfp_id).await?;
    let mut proposals = state.store.list_proposals(rfp_id).await?;
    require_proposal_from(&proposals, request.contractor_id)?;

    let mut recipients: Vec<Contractor> = Vec::with_capacity(request.letters.len());
    for letter in &request.letters {
        if !proposals.iter().any(|p| p.contractor_id == letter.contractor_id) {
            return Err(AppError::Validation(format!(
                "Contractor {} has no proposal on this RFP",
                letter.contractor_id
            )));
        }
        check_letter(letter, request.contractor_id)?;
        let contractor = state.store.get_contractor(letter.contractor_id).await?;
        if contractor.emails().is_empty() {
            return Err(AppError::Validation(format!(
                "{} has no contact email on file",
                contractor.name
            )));
        }
        recipients.push(contractor);
    }

    for proposal in proposals.iter_mut() {
        proposal.status = if proposal.contractor_id == request.contractor_id {
            ProposalStatus::Awarded
        } else {
            ProposalStatus::Rejected
        };
        state.store.update_proposal(proposal).await?;
    }

    rfp.status = RfpStatus::Awarded;
    rfp.touch();
    state.store.update_rfp(&rfp).await?;
    info!("Awarded RFP {rfp_id} to contractor {}", request.contractor_id);

    let mut receipts = Vec::with_capacity(recipients.len());
    for (letter, contractor) in request.letters.iter().zip(&recipients) {
        receipts.push(send_letter(state, rfp_id, contractor, letter.kind, &letter.draft).await?);
    }

    Ok(AwardOutcome {
        rfp,
        proposals,
        receipts,
    })
}

/// POST /api/v1/rfps/:id/award/draft
pub async fn handle_draft_award(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AwardDraftRequest>,
) -> Result<Json<AwardDrafts>, AppError> {
    Ok(Json(draft_award_letters(&state, id, body.contractor_id).await?))
}

/// POST /api/v1/rfps/:id/award
pub async fn handle_finalize_award(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<FinalizeAwardRequest>,
) -> Result<Json<AwardOutcome>, AppError> {
    Ok(Json(finalize_award(&state, id, body).await?))
}
