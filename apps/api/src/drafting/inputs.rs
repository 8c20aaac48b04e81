//! Facts handed to the model, validated before any outbound call.

use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::FieldError;
use crate::models::checklist::ChecklistItem;
use crate::models::contractor::Contractor;
use crate::models::proposal::{Proposal, Scorecard};
use crate::models::rfp::Rfp;

/// Project facts shared by every RFP-scoped prompt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFacts {
    pub project_name: String,
    pub scope_of_work: String,
    pub metro_code: String,
    pub contractor_type: String,
    pub estimated_budget: f64,
    pub rfp_start_date: Option<NaiveDate>,
    pub rfp_end_date: Option<NaiveDate>,
    pub project_start_date: Option<NaiveDate>,
    pub project_end_date: Option<NaiveDate>,
}

impl From<&Rfp> for ProjectFacts {
    fn from(rfp: &Rfp) -> Self {
        ProjectFacts {
            project_name: rfp.project_name.clone(),
            scope_of_work: rfp.scope_of_work.clone(),
            metro_code: rfp.metro_code.clone(),
            contractor_type: rfp.contractor_type.to_string(),
            estimated_budget: rfp.estimated_budget,
            rfp_start_date: rfp.rfp_start_date,
            rfp_end_date: rfp.rfp_end_date,
            project_start_date: rfp.project_start_date,
            project_end_date: rfp.project_end_date,
        }
    }
}

impl ProjectFacts {
    fn check(&self, errors: &mut Vec<FieldError>) {
        require(&self.project_name, "projectName", errors);
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    pub contractor_name: String,
    pub contact_names: Vec<String>,
}

impl From<&Contractor> for Recipient {
    fn from(contractor: &Contractor) -> Self {
        Recipient {
            contractor_name: contractor.name.clone(),
            contact_names: contractor.names(),
        }
    }
}

/// Input for every email-style draft.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailInput {
    pub project: ProjectFacts,
    pub recipient: Recipient,
    pub submission_link: Option<String>,
    pub technical_documents: Vec<String>,
}

impl EmailInput {
    pub fn new(rfp: &Rfp, contractor: &Contractor, submission_link: Option<String>) -> Self {
        EmailInput {
            project: ProjectFacts::from(rfp),
            recipient: Recipient::from(contractor),
            submission_link,
            technical_documents: rfp.technical_documents.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        self.project.check(&mut errors);
        require(&self.recipient.contractor_name, "contractorName", &mut errors);
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    pub project: ProjectFacts,
    pub contractor_name: String,
    pub criteria: Vec<ChecklistItem>,
    #[serde(skip)]
    pub proposal_text: String,
}

impl AnalysisInput {
    pub fn new(rfp: &Rfp, proposal: &Proposal, criteria: Vec<ChecklistItem>) -> Self {
        AnalysisInput {
            project: ProjectFacts::from(rfp),
            contractor_name: proposal.contractor_name.clone(),
            criteria,
            proposal_text: proposal.extracted_text.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        self.project.check(&mut errors);
        require(&self.project.scope_of_work, "scopeOfWork", &mut errors);
        require(&self.proposal_text, "extractedText", &mut errors);
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredProposal {
    pub contractor_name: String,
    pub scorecard: Scorecard,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonInput {
    pub project: ProjectFacts,
    pub proposals: Vec<ScoredProposal>,
}

impl ComparisonInput {
    /// Keeps only proposals that already carry a scorecard.
    pub fn new(rfp: &Rfp, proposals: &[Proposal]) -> Self {
        ComparisonInput {
            project: ProjectFacts::from(rfp),
            proposals: proposals
                .iter()
                .filter_map(|p| {
                    p.scorecard.clone().map(|scorecard| ScoredProposal {
                        contractor_name: p.contractor_name.clone(),
                        scorecard,
                    })
                })
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        self.project.check(&mut errors);
        if self.proposals.is_empty() {
            errors.push(FieldError::new(
                "proposals",
                "At least one analyzed proposal is required",
            ));
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonsInput {
    pub project: ProjectFacts,
    pub completed_stages: Vec<String>,
    pub proposal_count: usize,
    pub awarded_contractor: Option<String>,
    pub invited_count: usize,
    pub notes: Option<String>,
}

impl LessonsInput {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        self.project.check(&mut errors);
        finish(errors)
    }
}

fn require(value: &str, field: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "Required field is missing"));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
