use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Pending,
    Submitted,
    #[serde(rename = "Under Review")]
    UnderReview,
    Awarded,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "Pending",
            ProposalStatus::Submitted => "Submitted",
            ProposalStatus::UnderReview => "Under Review",
            ProposalStatus::Awarded => "Awarded",
            ProposalStatus::Rejected => "Rejected",
        }
    }
}

impl FromStr for ProposalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ProposalStatus::Pending),
            "Submitted" => Ok(ProposalStatus::Submitted),
            "Under Review" => Ok(ProposalStatus::UnderReview),
            "Awarded" => Ok(ProposalStatus::Awarded),
            "Rejected" => Ok(ProposalStatus::Rejected),
            other => Err(format!("unknown proposal status '{other}'")),
        }
    }
}

/// Per-criterion textual judgments. Not numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub safety: String,
    pub experience: String,
    pub programmatic_approach: String,
    pub commercial_excellence: String,
    pub innovative_solutions: String,
    pub mission_critical_experience: String,
}

impl Scorecard {
    pub fn criteria(&self) -> [(&'static str, &str); 6] {
        [
            ("safety", &self.safety),
            ("experience", &self.experience),
            ("programmaticApproach", &self.programmatic_approach),
            ("commercialExcellence", &self.commercial_excellence),
            ("innovativeSolutions", &self.innovative_solutions),
            ("missionCriticalExperience", &self.mission_critical_experience),
        ]
    }
}

/// A contractor's submission (`rfps/{id}/proposals`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: Uuid,
    pub rfp_id: Uuid,
    pub contractor_id: Uuid,
    pub contractor_name: String,
    pub submitted_at: DateTime<Utc>,
    pub status: ProposalStatus,
    pub document_url: Option<String>,
    pub extracted_text: String,
    pub scorecard: Option<Scorecard>,
}

impl Proposal {
    pub fn submitted(
        rfp_id: Uuid,
        contractor_id: Uuid,
        contractor_name: String,
        document_url: Option<String>,
        extracted_text: String,
    ) -> Self {
        Proposal {
            id: Uuid::new_v4(),
            rfp_id,
            contractor_id,
            contractor_name,
            submitted_at: Utc::now(),
            status: ProposalStatus::Submitted,
            document_url,
            extracted_text,
            scorecard: None,
        }
    }
}
