use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::checklist::weights::{default_checklist, validate_weights};
use crate::errors::AppError;
use crate::models::checklist::{ChecklistItem, EvaluationChecklist};
use crate::state::AppState;
use crate::store::RfpStore;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistView {
    pub rfp_id: Uuid,
    pub items: Vec<ChecklistItem>,
    /// True when nothing has been saved yet and `items` are the defaults.
    pub seeded: bool,
}

#[derive(Debug, Deserialize)]
pub struct SaveChecklistRequest {
    pub items: Vec<ChecklistItem>,
}

pub async fn load_checklist(store: &dyn RfpStore, rfp_id: Uuid) -> Result<ChecklistView, AppError> {
    store.get_rfp(rfp_id).await?;
    let view = match store.get_checklist(rfp_id).await? {
        Some(saved) => ChecklistView {
            rfp_id,
            items: saved.items,
            seeded: false,
        },
        None => ChecklistView {
            rfp_id,
            items: default_checklist(),
            seeded: true,
        },
    };
    Ok(view)
}

/// Replaces the whole checklist. Nothing is written unless the weights validate.
pub async fn save_checklist(
    store: &dyn RfpStore,
    rfp_id: Uuid,
    items: Vec<ChecklistItem>,
) -> Result<EvaluationChecklist, AppError> {
    store.get_rfp(rfp_id).await?;
    if let Err(errors) = validate_weights(&items) {
        warn!("Rejected checklist for RFP {rfp_id}: {} problem(s)", errors.len());
        return Err(AppError::InvalidFields(errors));
    }

    let checklist = EvaluationChecklist {
        rfp_id,
        items,
        updated_at: Utc::now(),
    };
    store.save_checklist(&checklist).await?;
    info!(
        "Saved checklist for RFP {rfp_id} ({} criteria)",
        checklist.items.len()
    );
    Ok(checklist)
}

/// GET /api/v1/rfps/:id/checklist
pub async fn handle_get_checklist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChecklistView>, AppError> {
    Ok(Json(load_checklist(state.store.as_ref(), id).await?))
}

/// PUT /api/v1/rfps/:id/checklist
pub async fn handle_save_checklist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SaveChecklistRequest>,
) -> Result<Json<EvaluationChecklist>, AppError> {
    Ok(Json(save_checklist(state.store.as_ref(), id, body.items).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rfp::Rfp;
    use crate::store::MemoryStore;
    use crate::testing::sample_fields;

    async fn store_with_rfp() -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let rfp = Rfp::new(sample_fields());
        store.insert_rfp(&rfp).await.unwrap();
        (store, rfp.id)
    }

    #[tokio::test]
    async fn test_unsaved_checklist_is_seeded_with_defaults() {
        let (store, id) = store_with_rfp().await;
        let view = load_checklist(&store, id).await.unwrap();
        assert!(view.seeded);
        assert_eq!(view.items, default_checklist());
        assert!(store.get_checklist(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_and_reads_back() {
        let (store, id) = store_with_rfp().await;
        let items = vec![
            ChecklistItem {
                criterion: "Safety".to_string(),
                weight: 60.0,
            },
            ChecklistItem {
                criterion: "Cost".to_string(),
                weight: 40.0,
            },
        ];
        save_checklist(&store, id, items.clone()).await.unwrap();

        let view = load_checklist(&store, id).await.unwrap();
        assert!(!view.seeded);
        assert_eq!(view.items, items);
    }

    #[tokio::test]
    async fn test_bad_total_is_not_persisted() {
        let (store, id) = store_with_rfp().await;
        let items = vec![ChecklistItem {
            criterion: "Safety".to_string(),
            weight: 99.0,
        }];
        assert!(matches!(
            save_checklist(&store, id, items).await,
            Err(AppError::InvalidFields(_))
        ));
        assert!(store.get_checklist(id).await.unwrap().is_none());
    }
}
