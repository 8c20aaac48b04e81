use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::checklist::handlers::load_checklist;
use crate::drafting::inputs::{AnalysisInput, ComparisonInput};
use crate::drafting::outputs::ComparativeReport;
use crate::errors::AppError;
use crate::models::proposal::{Proposal, ProposalStatus};
use crate::state::AppState;

/// Scores one proposal against the RFP and its checklist, then persists the scorecard.
pub async fn analyze_proposal(
    state: &AppState,
    rfp_id: Uuid,
    proposal_id: Uuid,
) -> Result<Proposal, AppError> {
    let rfp = state.store.get_rfp(rfp_id).await?;
    let mut proposal = state.store.get_proposal(rfp_id, proposal_id).await?;
    if proposal.extracted_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Proposal has no extracted text to analyze".to_string(),
        ));
    }
    let checklist = load_checklist(state.store.as_ref(), rfp_id).await?;

    let input = AnalysisInput::new(&rfp, &proposal, checklist.items);
    let scorecard = state.drafting.analyze_proposal(&input).await?;

    proposal.scorecard = Some(scorecard);
    if matches!(proposal.status, ProposalStatus::Pending | ProposalStatus::Submitted) {
        proposal.status = ProposalStatus::UnderReview;
    }
    state.store.update_proposal(&proposal).await?;
    info!(
        "Analyzed proposal {} from {} on RFP {rfp_id}",
        proposal.id, proposal.contractor_name
    );
    Ok(proposal)
}

pub async fn compare_proposals(
    state: &AppState,
    rfp_id: Uuid,
) -> Result<ComparativeReport, AppError> {
    let rfp = state.store.get_rfp(rfp_id).await?;
    let proposals = state.store.list_proposals(rfp_id).await?;
    let input = ComparisonInput::new(&rfp, &proposals);
    state.drafting.compare_proposals(&input).await
}

/// POST /api/v1/rfps/:id/proposals/:pid/analyze
pub async fn handle_analyze_proposal(
    State(state): State<AppState>,
    Path((id, proposal_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Proposal>, AppError> {
    Ok(Json(analyze_proposal(&state, id, proposal_id).await?))
}

/// POST /api/v1/rfps/:id/analysis/compare
pub async fn handle_compare_proposals(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComparativeReport>, AppError> {
    Ok(Json(compare_proposals(&state, id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rfp::Rfp;
    use crate::testing::{sample_fields, sample_proposal, test_state, SCORECARD_JSON};

    #[tokio::test]
    async fn test_analysis_persists_scorecard_and_marks_under_review() {
        let harness = test_state(vec![SCORECARD_JSON]);
        let state = &harness.state;
        let rfp = Rfp::new(sample_fields());
        state.store.insert_rfp(&rfp).await.unwrap();
        let proposal = sample_proposal(rfp.id, "Volt Co");
        state.store.insert_proposal(&proposal).await.unwrap();

        analyze_proposal(state, rfp.id, proposal.id).await.unwrap();

        let stored = state.store.get_proposal(rfp.id, proposal.id).await.unwrap();
        assert_eq!(stored.status, ProposalStatus::UnderReview);
        assert!(stored.scorecard.is_some());
        assert!(harness.generator.prompts()[0].contains("Programmatic Approach"));
    }

    #[tokio::test]
    async fn test_empty_proposal_text_is_rejected_without_a_call() {
        let harness = test_state(vec![SCORECARD_JSON]);
        let state = &harness.state;
        let rfp = Rfp::new(sample_fields());
        state.store.insert_rfp(&rfp).await.unwrap();
        let mut proposal = sample_proposal(rfp.id, "Volt Co");
        proposal.extracted_text = "   ".to_string();
        state.store.insert_proposal(&proposal).await.unwrap();

        assert!(matches!(
            analyze_proposal(state, rfp.id, proposal.id).await,
            Err(AppError::Validation(_))
        ));
        assert!(harness.generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_proposal_untouched() {
        let harness = test_state(vec!["not json"]);
        let state = &harness.state;
        let rfp = Rfp::new(sample_fields());
        state.store.insert_rfp(&rfp).await.unwrap();
        let proposal = sample_proposal(rfp.id, "Volt Co");
        state.store.insert_proposal(&proposal).await.unwrap();

        assert!(matches!(
            analyze_proposal(state, rfp.id, proposal.id).await,
            Err(AppError::GenerationFailed(_))
        ));
        assert_eq!(
            state.store.get_proposal(rfp.id, proposal.id).await.unwrap(),
            proposal
        );
    }
}
