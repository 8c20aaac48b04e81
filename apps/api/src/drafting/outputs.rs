//! Output shapes the model must return, each with a completeness check.

use serde::{Deserialize, Serialize};

use crate::models::proposal::Scorecard;

/// A parsed draft is only handed back when `check` passes.
pub trait DraftShape {
    fn check(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDraft {
    pub email_subject: String,
    pub email_body: String,
}

impl DraftShape for EmailDraft {
    fn check(&self) -> Result<(), String> {
        require("emailSubject", &self.email_subject)?;
        require("emailBody", &self.email_body)
    }
}

impl DraftShape for Scorecard {
    fn check(&self) -> Result<(), String> {
        self.criteria()
            .into_iter()
            .try_for_each(|(name, text)| require(name, text))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedContractor {
    pub contractor_name: String,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeReport {
    pub summary: String,
    pub ranking: Vec<RankedContractor>,
    pub recommendation: String,
}

impl DraftShape for ComparativeReport {
    fn check(&self) -> Result<(), String> {
        require("summary", &self.summary)?;
        require("recommendation", &self.recommendation)?;
        if self.ranking.is_empty() {
            return Err("ranking is empty".to_string());
        }
        self.ranking
            .iter()
            .try_for_each(|r| require("ranking.contractorName", &r.contractor_name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonsLearned {
    pub summary: String,
    #[serde(default)]
    pub went_well: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl DraftShape for LessonsLearned {
    fn check(&self) -> Result<(), String> {
        require("summary", &self.summary)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideSection {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGuide {
    pub title: String,
    pub sections: Vec<GuideSection>,
}

impl DraftShape for UserGuide {
    fn check(&self) -> Result<(), String> {
        require("title", &self.title)?;
        if self.sections.is_empty() {
            return Err("sections is empty".to_string());
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is empty"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_draft_requires_subject_and_body() {
        let mut draft = EmailDraft {
            email_subject: "RFP: NYC Data Center".to_string(),
            email_body: "<p>Hello</p>".to_string(),
        };
        assert!(draft.check().is_ok());
        draft.email_body = " ".to_string();
        assert_eq!(draft.check().unwrap_err(), "emailBody is empty");
    }

    #[test]
    fn test_scorecard_rejects_blank_criterion() {
        let card = Scorecard {
            safety: "Strong record".to_string(),
            experience: "Ten similar builds".to_string(),
            programmatic_approach: "".to_string(),
            commercial_excellence: "Competitive".to_string(),
            innovative_solutions: "Prefabrication".to_string(),
            mission_critical_experience: "Tier III sites".to_string(),
        };
        assert_eq!(card.check().unwrap_err(), "programmaticApproach is empty");
    }

    #[test]
    fn test_comparative_report_needs_a_ranking() {
        let report = ComparativeReport {
            summary: "Two bids".to_string(),
            ranking: vec![],
            recommendation: "Award Beta".to_string(),
        };
        assert!(report.check().is_err());
    }
}
