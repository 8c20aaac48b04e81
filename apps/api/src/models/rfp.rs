use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::contractor::ContractorType;

/// Canonical RFP status.
///
/// Covers both the short lifecycle vocabulary (`Draft`, `Awarded`, `Completed`) and the
/// per-stage names. The older `Sent` and `In Progress` values are read as `Invitation`
/// and `Proposals` respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RfpStatus {
    Draft,
    Selection,
    #[serde(alias = "Sent")]
    Invitation,
    #[serde(alias = "In Progress")]
    Proposals,
    Analysis,
    Award,
    Feedback,
    Awarded,
    Completed,
}

impl RfpStatus {
    pub const ALL: [RfpStatus; 9] = [
        RfpStatus::Draft,
        RfpStatus::Selection,
        RfpStatus::Invitation,
        RfpStatus::Proposals,
        RfpStatus::Analysis,
        RfpStatus::Award,
        RfpStatus::Feedback,
        RfpStatus::Awarded,
        RfpStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RfpStatus::Draft => "Draft",
            RfpStatus::Selection => "Selection",
            RfpStatus::Invitation => "Invitation",
            RfpStatus::Proposals => "Proposals",
            RfpStatus::Analysis => "Analysis",
            RfpStatus::Award => "Award",
            RfpStatus::Feedback => "Feedback",
            RfpStatus::Awarded => "Awarded",
            RfpStatus::Completed => "Completed",
        }
    }

    /// Whether the RFP still counts as open work on the dashboard.
    pub fn is_active(&self) -> bool {
        !matches!(self, RfpStatus::Awarded | RfpStatus::Completed)
    }
}

impl FromStr for RfpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sent" => Ok(RfpStatus::Invitation),
            "In Progress" => Ok(RfpStatus::Proposals),
            other => RfpStatus::ALL
                .into_iter()
                .find(|status| status.as_str() == other)
                .ok_or_else(|| format!("unknown RFP status '{other}'")),
        }
    }
}

impl fmt::Display for RfpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six tabs an RFP is processed through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkflowStage {
    Selection,
    Invitations,
    Proposals,
    Analysis,
    Award,
    Feedback,
}

impl WorkflowStage {
    pub const ORDER: [WorkflowStage; 6] = [
        WorkflowStage::Selection,
        WorkflowStage::Invitations,
        WorkflowStage::Proposals,
        WorkflowStage::Analysis,
        WorkflowStage::Award,
        WorkflowStage::Feedback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Selection => "Selection",
            WorkflowStage::Invitations => "Invitations",
            WorkflowStage::Proposals => "Proposals",
            WorkflowStage::Analysis => "Analysis",
            WorkflowStage::Award => "Award",
            WorkflowStage::Feedback => "Feedback",
        }
    }

    pub fn index(&self) -> usize {
        Self::ORDER
            .iter()
            .position(|stage| stage == self)
            .unwrap_or_default()
    }

    pub fn next(&self) -> Option<WorkflowStage> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// Status an RFP carries while this stage is the one being worked.
    pub fn active_status(&self) -> RfpStatus {
        match self {
            WorkflowStage::Selection => RfpStatus::Selection,
            WorkflowStage::Invitations => RfpStatus::Invitation,
            WorkflowStage::Proposals => RfpStatus::Proposals,
            WorkflowStage::Analysis => RfpStatus::Analysis,
            WorkflowStage::Award => RfpStatus::Award,
            WorkflowStage::Feedback => RfpStatus::Feedback,
        }
    }
}

impl FromStr for WorkflowStage {
    type Err = String;

    /// Case-insensitive so route segments like `/stages/analysis` work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let lowered = if lowered == "invitation" {
            "invitations".to_string()
        } else {
            lowered
        };
        WorkflowStage::ORDER
            .into_iter()
            .find(|stage| stage.as_str().to_ascii_lowercase() == lowered)
            .ok_or_else(|| format!("unknown workflow stage '{s}'"))
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-editable RFP fields, after intake validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfpFields {
    pub project_name: String,
    pub scope_of_work: String,
    pub metro_code: String,
    pub contractor_type: ContractorType,
    pub estimated_budget: f64,
    pub rfp_start_date: Option<NaiveDate>,
    pub rfp_end_date: Option<NaiveDate>,
    pub project_start_date: Option<NaiveDate>,
    pub project_end_date: Option<NaiveDate>,
}

/// A persisted RFP document (`rfps` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rfp {
    pub id: Uuid,
    pub project_name: String,
    pub scope_of_work: String,
    pub metro_code: String,
    pub contractor_type: ContractorType,
    pub estimated_budget: f64,
    pub rfp_start_date: Option<NaiveDate>,
    pub rfp_end_date: Option<NaiveDate>,
    pub project_start_date: Option<NaiveDate>,
    pub project_end_date: Option<NaiveDate>,
    pub status: RfpStatus,
    pub invited_contractors: Vec<Uuid>,
    pub eoi_sent: Vec<Uuid>,
    pub completed_stages: Vec<WorkflowStage>,
    pub technical_documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rfp {
    /// Builds a fresh Draft RFP from validated intake fields.
    pub fn new(fields: RfpFields) -> Self {
        let now = Utc::now();
        Rfp {
            id: Uuid::new_v4(),
            project_name: fields.project_name,
            scope_of_work: fields.scope_of_work,
            metro_code: fields.metro_code,
            contractor_type: fields.contractor_type,
            estimated_budget: fields.estimated_budget,
            rfp_start_date: fields.rfp_start_date,
            rfp_end_date: fields.rfp_end_date,
            project_start_date: fields.project_start_date,
            project_end_date: fields.project_end_date,
            status: RfpStatus::Draft,
            invited_contractors: Vec::new(),
            eoi_sent: Vec::new(),
            completed_stages: Vec::new(),
            technical_documents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn fields(&self) -> RfpFields {
        RfpFields {
            project_name: self.project_name.clone(),
            scope_of_work: self.scope_of_work.clone(),
            metro_code: self.metro_code.clone(),
            contractor_type: self.contractor_type,
            estimated_budget: self.estimated_budget,
            rfp_start_date: self.rfp_start_date,
            rfp_end_date: self.rfp_end_date,
            project_start_date: self.project_start_date,
            project_end_date: self.project_end_date,
        }
    }

    pub fn apply_fields(&mut self, fields: RfpFields) {
        self.project_name = fields.project_name;
        self.scope_of_work = fields.scope_of_work;
        self.metro_code = fields.metro_code;
        self.contractor_type = fields.contractor_type;
        self.estimated_budget = fields.estimated_budget;
        self.rfp_start_date = fields.rfp_start_date;
        self.rfp_end_date = fields.rfp_end_date;
        self.project_start_date = fields.project_start_date;
        self.project_end_date = fields.project_end_date;
    }

    pub fn is_invited(&self, contractor_id: Uuid) -> bool {
        self.invited_contractors.contains(&contractor_id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_status_names_deserialize() {
        let sent: RfpStatus = serde_json::from_str("\"Sent\"").unwrap();
        let in_progress: RfpStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(sent, RfpStatus::Invitation);
        assert_eq!(in_progress, RfpStatus::Proposals);
        assert_eq!("Sent".parse::<RfpStatus>().unwrap(), RfpStatus::Invitation);
    }

    #[test]
    fn test_status_serializes_canonical_name() {
        assert_eq!(
            serde_json::to_string(&RfpStatus::Invitation).unwrap(),
            "\"Invitation\""
        );
    }

    #[test]
    fn test_stage_parsing_is_case_insensitive() {
        assert_eq!(
            "analysis".parse::<WorkflowStage>().unwrap(),
            WorkflowStage::Analysis
        );
        assert_eq!(
            "Invitation".parse::<WorkflowStage>().unwrap(),
            WorkflowStage::Invitations
        );
        assert!("review".parse::<WorkflowStage>().is_err());
    }

    #[test]
    fn test_stage_order_and_next() {
        assert_eq!(WorkflowStage::Selection.next(), Some(WorkflowStage::Invitations));
        assert_eq!(WorkflowStage::Feedback.next(), None);
        assert_eq!(WorkflowStage::Award.index(), 4);
    }
}
