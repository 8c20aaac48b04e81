use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trade specialization catalogue shared by contractors and RFPs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractorType {
    Electrical,
    Mechanical,
    General,
    Civil,
    Structural,
    #[serde(rename = "Fire Protection")]
    FireProtection,
    Plumbing,
    Controls,
    Commissioning,
}

impl ContractorType {
    pub const ALL: [ContractorType; 9] = [
        ContractorType::Electrical,
        ContractorType::Mechanical,
        ContractorType::General,
        ContractorType::Civil,
        ContractorType::Structural,
        ContractorType::FireProtection,
        ContractorType::Plumbing,
        ContractorType::Controls,
        ContractorType::Commissioning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContractorType::Electrical => "Electrical",
            ContractorType::Mechanical => "Mechanical",
            ContractorType::General => "General",
            ContractorType::Civil => "Civil",
            ContractorType::Structural => "Structural",
            ContractorType::FireProtection => "Fire Protection",
            ContractorType::Plumbing => "Plumbing",
            ContractorType::Controls => "Controls",
            ContractorType::Commissioning => "Commissioning",
        }
    }
}

impl FromStr for ContractorType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContractorType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| format!("unknown contractor type '{s}'"))
    }
}

impl fmt::Display for ContractorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PreferredStatus {
    #[serde(rename = "Most Preferred")]
    MostPreferred,
    Preferred,
    #[serde(rename = "Not Evaluated")]
    NotEvaluated,
}

impl PreferredStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredStatus::MostPreferred => "Most Preferred",
            PreferredStatus::Preferred => "Preferred",
            PreferredStatus::NotEvaluated => "Not Evaluated",
        }
    }
}

impl FromStr for PreferredStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            PreferredStatus::MostPreferred,
            PreferredStatus::Preferred,
            PreferredStatus::NotEvaluated,
        ]
        .into_iter()
        .find(|p| p.as_str() == s.trim())
        .ok_or_else(|| format!("unknown preferred status '{s}'"))
    }
}

/// A persisted contractor document (`contractors` collection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contractor {
    pub id: Uuid,
    pub name: String,
    /// Semicolon-delimited, as entered.
    pub contact_names: String,
    /// Semicolon-delimited, as entered.
    pub contact_emails: String,
    pub contractor_type: ContractorType,
    pub preferred_status: PreferredStatus,
    pub region: String,
    pub metro_site: String,
    pub metro_codes: Vec<String>,
    pub performance: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contractor {
    pub fn emails(&self) -> Vec<String> {
        split_semicolons(&self.contact_emails)
    }

    pub fn names(&self) -> Vec<String> {
        split_semicolons(&self.contact_names)
    }

    pub fn serves_metro(&self, code: &str) -> bool {
        self.metro_codes.iter().any(|c| c == code)
    }
}

fn split_semicolons(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}
