use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A question raised when an RFP is missing a field a draft depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clarification {
    pub id: Uuid,
    pub rfp_id: Uuid,
    /// camelCase RFP field name the answer is written back into.
    pub field: String,
    pub question: String,
    pub answer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
}

impl Clarification {
    pub fn open(rfp_id: Uuid, field: &str, question: String) -> Self {
        Clarification {
            id: Uuid::new_v4(),
            rfp_id,
            field: field.to_string(),
            question,
            answer: None,
            created_at: Utc::now(),
            answered_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.answer.is_none()
    }
}
