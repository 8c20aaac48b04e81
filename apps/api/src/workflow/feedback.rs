use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::drafting::clarifications::ensure_clarified;
use crate::drafting::inputs::{LessonsInput, ProjectFacts};
use crate::drafting::kinds::MessageKind;
use crate::drafting::outputs::LessonsLearned;
use crate::errors::AppError;
use crate::models::proposal::ProposalStatus;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LessonsRequest {
    pub notes: Option<String>,
}

pub async fn lessons_learned(
    state: &AppState,
    rfp_id: Uuid,
    notes: Option<String>,
) -> Result<LessonsLearned, AppError> {
    let rfp = state.store.get_rfp(rfp_id).await?;
    ensure_clarified(state.store.as_ref(), &rfp, MessageKind::LessonsLearned).await?;
    let proposals = state.store.list_proposals(rfp_id).await?;

    let input = LessonsInput {
        project: ProjectFacts::from(&rfp),
        completed_stages: rfp
            .completed_stages
            .iter()
            .map(|stage| stage.to_string())
            .collect(),
        proposal_count: proposals.len(),
        awarded_contractor: proposals
            .iter()
            .find(|p| p.status == ProposalStatus::Awarded)
            .map(|p| p.contractor_name.clone()),
        invited_count: rfp.invited_contractors.len(),
        notes: notes.filter(|n| !n.trim().is_empty()),
    };
    state.drafting.lessons_learned(&input).await
}

/// POST /api/v1/rfps/:id/feedback/lessons
pub async fn handle_lessons_learned(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<LessonsRequest>>,
) -> Result<Json<LessonsLearned>, AppError> {
    let notes = body.and_then(|Json(b)| b.notes);
    Ok(Json(lessons_learned(&state, id, notes).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rfp::Rfp;
    use crate::testing::{sample_fields, test_state};

    #[tokio::test]
    async fn test_lessons_include_notes_in_prompt() {
        let harness = test_state(vec![
            r#"{"summary": "Smooth RFP", "wentWell": ["Fast EOIs"], "improvements": [],
                "recommendations": ["Invite more bidders"]}"#,
        ]);
        let rfp = Rfp::new(sample_fields());
        harness.state.store.insert_rfp(&rfp).await.unwrap();

        let lessons = lessons_learned(&harness.state, rfp.id, Some("Site walk was late".into()))
            .await
            .unwrap();

        assert_eq!(lessons.went_well, vec!["Fast EOIs"]);
        assert!(harness.generator.prompts()[0].contains("Site walk was late"));
    }
}
