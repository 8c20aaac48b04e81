use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub criterion: String,
    pub weight: f64,
}

/// Weighted scoring rubric stored once per RFP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationChecklist {
    pub rfp_id: Uuid,
    pub items: Vec<ChecklistItem>,
    pub updated_at: DateTime<Utc>,
}
