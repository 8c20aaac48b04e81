use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::drafting::prompts::*;

/// Every kind of text the drafting gateway produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Invitation,
    Release,
    Award,
    NonAward,
    Reminder,
    Analysis,
    ComparativeAnalysis,
    LessonsLearned,
    UserGuide,
}

impl MessageKind {
    pub const ALL: [MessageKind; 9] = [
        MessageKind::Invitation,
        MessageKind::Release,
        MessageKind::Award,
        MessageKind::NonAward,
        MessageKind::Reminder,
        MessageKind::Analysis,
        MessageKind::ComparativeAnalysis,
        MessageKind::LessonsLearned,
        MessageKind::UserGuide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Invitation => "Invitation",
            MessageKind::Release => "Release",
            MessageKind::Award => "Award",
            MessageKind::NonAward => "NonAward",
            MessageKind::Reminder => "Reminder",
            MessageKind::Analysis => "Analysis",
            MessageKind::ComparativeAnalysis => "ComparativeAnalysis",
            MessageKind::LessonsLearned => "LessonsLearned",
            MessageKind::UserGuide => "UserGuide",
        }
    }

    pub fn is_email(&self) -> bool {
        self.purpose().is_some()
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            MessageKind::Invitation => INVITATION_SYSTEM,
            MessageKind::Release => RELEASE_SYSTEM,
            MessageKind::Award => AWARD_SYSTEM,
            MessageKind::NonAward => NON_AWARD_SYSTEM,
            MessageKind::Reminder => REMINDER_SYSTEM,
            MessageKind::Analysis => ANALYSIS_SYSTEM,
            MessageKind::ComparativeAnalysis => COMPARATIVE_SYSTEM,
            MessageKind::LessonsLearned => LESSONS_SYSTEM,
            MessageKind::UserGuide => GUIDE_SYSTEM,
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            MessageKind::Analysis => ANALYSIS_TEMPLATE,
            MessageKind::ComparativeAnalysis => COMPARATIVE_TEMPLATE,
            MessageKind::LessonsLearned => LESSONS_TEMPLATE,
            MessageKind::UserGuide => GUIDE_TEMPLATE,
            _ => EMAIL_TEMPLATE,
        }
    }

    /// What the email asks the model to write. `None` for non-email kinds.
    pub fn purpose(&self) -> Option<&'static str> {
        match self {
            MessageKind::Invitation => Some(INVITATION_PURPOSE),
            MessageKind::Release => Some(RELEASE_PURPOSE),
            MessageKind::Award => Some(AWARD_PURPOSE),
            MessageKind::NonAward => Some(NON_AWARD_PURPOSE),
            MessageKind::Reminder => Some(REMINDER_PURPOSE),
            _ => None,
        }
    }

    /// RFP fields (camelCase) a draft of this kind cannot be written without.
    pub fn required_rfp_fields(&self) -> &'static [&'static str] {
        match self {
            MessageKind::Invitation | MessageKind::Reminder => &["rfpEndDate"],
            MessageKind::Release => &["rfpStartDate", "rfpEndDate"],
            MessageKind::Award => &["projectStartDate"],
            MessageKind::LessonsLearned => &["projectStartDate", "projectEndDate"],
            MessageKind::NonAward
            | MessageKind::Analysis
            | MessageKind::ComparativeAnalysis
            | MessageKind::UserGuide => &[],
        }
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown message kind '{s}'"))
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
