//! Clarifications: questions raised when an RFP lacks a field a draft depends on.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::drafting::kinds::MessageKind;
use crate::errors::AppError;
use crate::intake::handlers::edit_rfp;
use crate::models::clarification::Clarification;
use crate::models::rfp::Rfp;
use crate::store::RfpStore;

fn question_for(field: &str, kind: MessageKind) -> String {
    let label = match field {
        "rfpStartDate" => "When is the RFP released to contractors",
        "rfpEndDate" => "When are proposals due",
        "projectStartDate" => "When does the project start on site",
        "projectEndDate" => "When is the project expected to finish",
        other => return format!("Please supply '{other}' before drafting the {kind}."),
    };
    format!("{label} (YYYY-MM-DD)? Needed for the {kind} draft.")
}

/// Whether `field` holds a value on the RFP.
fn has_value(rfp: &Rfp, field: &str) -> bool {
    match field {
        "rfpStartDate" => rfp.rfp_start_date.is_some(),
        "rfpEndDate" => rfp.rfp_end_date.is_some(),
        "projectStartDate" => rfp.project_start_date.is_some(),
        "projectEndDate" => rfp.project_end_date.is_some(),
        "projectName" => !rfp.project_name.trim().is_empty(),
        "scopeOfWork" => !rfp.scope_of_work.trim().is_empty(),
        _ => true,
    }
}

/// Passes when every field `kind` needs is filled in. Otherwise opens one clarification
/// per missing field (reusing any already open) and fails with the full list.
pub async fn ensure_clarified(
    store: &dyn RfpStore,
    rfp: &Rfp,
    kind: MessageKind,
) -> Result<(), AppError> {
    let missing: Vec<&str> = kind
        .required_rfp_fields()
        .iter()
        .copied()
        .filter(|field| !has_value(rfp, field))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let existing = store.list_clarifications(rfp.id).await?;
    let mut pending = Vec::with_capacity(missing.len());
    for field in missing {
        match existing.iter().find(|c| c.is_open() && c.field == field) {
            Some(open) => pending.push(open.clone()),
            None => {
                let clarification = Clarification::open(rfp.id, field, question_for(field, kind));
                store.insert_clarification(&clarification).await?;
                info!("Opened clarification {} on RFP {} for {field}", clarification.id, rfp.id);
                pending.push(clarification);
            }
        }
    }

    Err(AppError::ClarificationRequired(pending))
}

/// Records the answer and writes it into the RFP field the clarification asks about.
/// The RFP is validated as a whole, so a malformed answer changes nothing.
pub async fn answer_clarification(
    store: &dyn RfpStore,
    rfp_id: Uuid,
    clarification_id: Uuid,
    answer: &str,
) -> Result<Clarification, AppError> {
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(AppError::Validation("Answer must not be empty".to_string()));
    }

    let mut clarification = store
        .list_clarifications(rfp_id)
        .await?
        .into_iter()
        .find(|c| c.id == clarification_id)
        .ok_or_else(|| AppError::NotFound(format!("clarification {clarification_id} not found")))?;

    let mut patch = Map::new();
    patch.insert(clarification.field.clone(), Value::String(answer.to_string()));
    edit_rfp(store, rfp_id, &patch).await?;

    clarification.answer = Some(answer.to_string());
    clarification.answered_at = Some(Utc::now());
    store.update_clarification(&clarification).await?;
    info!("Answered clarification {clarification_id} on RFP {rfp_id}");
    Ok(clarification)
}
