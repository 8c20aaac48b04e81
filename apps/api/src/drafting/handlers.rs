use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::drafting::clarifications::answer_clarification;
use crate::drafting::kinds::MessageKind;
use crate::drafting::outputs::UserGuide;
use crate::errors::AppError;
use crate::models::clarification::Clarification;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateView {
    pub kind: MessageKind,
    pub email: bool,
    pub system_prompt: &'static str,
    pub template: &'static str,
    pub required_rfp_fields: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
pub struct GuideRequest {
    pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateView>> {
    Json(
        MessageKind::ALL
            .into_iter()
            .map(|kind| TemplateView {
                kind,
                email: kind.is_email(),
                system_prompt: kind.system_prompt(),
                template: kind.template(),
                required_rfp_fields: kind.required_rfp_fields(),
            })
            .collect(),
    )
}

/// POST /api/v1/guide
pub async fn handle_user_guide(
    State(state): State<AppState>,
    Json(body): Json<GuideRequest>,
) -> Result<Json<UserGuide>, AppError> {
    Ok(Json(state.drafting.user_guide(&body.topic).await?))
}

/// GET /api/v1/rfps/:id/clarifications
pub async fn handle_list_clarifications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Clarification>>, AppError> {
    state.store.get_rfp(id).await?;
    Ok(Json(state.store.list_clarifications(id).await?))
}

/// POST /api/v1/rfps/:id/clarifications/:cid/answer
pub async fn handle_answer_clarification(
    State(state): State<AppState>,
    Path((id, clarification_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<AnswerRequest>,
) -> Result<Json<Clarification>, AppError> {
    let answered =
        answer_clarification(state.store.as_ref(), id, clarification_id, &body.answer).await?;
    Ok(Json(answered))
}
