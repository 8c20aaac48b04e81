use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::contractors::matcher::{match_contractors, Suggestion};
use crate::errors::AppError;
use crate::models::rfp::{Rfp, RfpStatus};
use crate::state::AppState;
use crate::store::RfpStore;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub contractor_id: Uuid,
}

/// Matching contractors for the RFP, each flagged with whether it is already invited.
pub async fn suggest_contractors(
    store: &dyn RfpStore,
    rfp_id: Uuid,
) -> Result<Vec<Suggestion>, AppError> {
    let rfp = store.get_rfp(rfp_id).await?;
    let contractors = store.list_contractors().await?;

    Ok(match_contractors(contractors, &rfp.metro_code, rfp.contractor_type)
        .into_iter()
        .map(|contractor| Suggestion {
            invited: rfp.is_invited(contractor.id),
            contractor,
        })
        .collect())
}

/// Adds the contractor to the invited list. A Draft RFP moves to Selection.
pub async fn invite_contractor(
    store: &dyn RfpStore,
    rfp_id: Uuid,
    contractor_id: Uuid,
) -> Result<Rfp, AppError> {
    let mut rfp = store.get_rfp(rfp_id).await?;
    let contractor = store.get_contractor(contractor_id).await?;

    if rfp.is_invited(contractor_id) {
        return Ok(rfp);
    }

    rfp.invited_contractors.push(contractor_id);
    if rfp.status == RfpStatus::Draft {
        rfp.status = RfpStatus::Selection;
    }
    rfp.touch();
    store.update_rfp(&rfp).await?;
    info!("Invited {} to RFP {}", contractor.name, rfp.id);
    Ok(rfp)
}

/// GET /api/v1/rfps/:id/selection
pub async fn handle_selection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Suggestion>>, AppError> {
    Ok(Json(suggest_contractors(state.store.as_ref(), id).await?))
}

/// POST /api/v1/rfps/:id/invitations
pub async fn handle_invite(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<InviteRequest>,
) -> Result<Json<Rfp>, AppError> {
    Ok(Json(
        invite_contractor(state.store.as_ref(), id, body.contractor_id).await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contractor::ContractorType;
    use crate::store::MemoryStore;
    use crate::testing::{contractor, sample_fields};

    async fn seeded() -> (MemoryStore, Rfp) {
        let store = MemoryStore::new();
        let mut fields = sample_fields();
        fields.metro_code = "DFW".to_string();
        fields.contractor_type = ContractorType::Mechanical;
        let rfp = Rfp::new(fields);
        store.insert_rfp(&rfp).await.unwrap();

        for c in [
            contractor("Alpha Mech", ContractorType::Mechanical, "DFW (Dallas)", 72),
            contractor("Beta Mech", ContractorType::Mechanical, "DFW, HOU", 91),
            contractor("Gamma Elec", ContractorType::Electrical, "DFW", 99),
            contractor("Delta Mech", ContractorType::Mechanical, "PHX", 95),
        ] {
            store.upsert_contractor(&c).await.unwrap();
        }
        (store, rfp)
    }

    #[tokio::test]
    async fn test_selection_returns_only_matches_best_first() {
        let (store, rfp) = seeded().await;
        let names: Vec<String> = suggest_contractors(&store, rfp.id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.contractor.name)
            .collect();
        assert_eq!(names, vec!["Beta Mech", "Alpha Mech"]);
    }

    #[tokio::test]
    async fn test_selection_has_no_side_effects() {
        let (store, rfp) = seeded().await;
        suggest_contractors(&store, rfp.id).await.unwrap();
        assert_eq!(store.get_rfp(rfp.id).await.unwrap(), rfp);
    }

    #[tokio::test]
    async fn test_invite_flags_suggestion_and_leaves_draft() {
        let (store, rfp) = seeded().await;
        let beta = suggest_contractors(&store, rfp.id).await.unwrap()[0]
            .contractor
            .clone();

        let updated = invite_contractor(&store, rfp.id, beta.id).await.unwrap();
        invite_contractor(&store, rfp.id, beta.id).await.unwrap();

        assert_eq!(updated.status, RfpStatus::Selection);
        assert_eq!(
            store.get_rfp(rfp.id).await.unwrap().invited_contractors,
            vec![beta.id]
        );
        assert!(suggest_contractors(&store, rfp.id).await.unwrap()[0].invited);
    }
}
