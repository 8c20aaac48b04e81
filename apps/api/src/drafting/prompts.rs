// Prompt constants for the drafting gateway.
// Templates use `{placeholder}` markers that the gateway replaces before sending.

pub const INVITATION_SYSTEM: &str = "You are a procurement specialist at a data center \
    construction program. You write Expression of Interest invitations that ask a \
    contractor whether they want to bid on an upcoming RFP.";

pub const RELEASE_SYSTEM: &str = "You are a procurement specialist at a data center \
    construction program. You write RFP release notices that hand the full bid package \
    to a contractor who has expressed interest.";

pub const AWARD_SYSTEM: &str = "You are a procurement specialist at a data center \
    construction program. You write award letters that tell a contractor their proposal \
    was selected and explain the next steps toward contract.";

pub const NON_AWARD_SYSTEM: &str = "You are a procurement specialist at a data center \
    construction program. You write courteous non-award letters that thank a contractor \
    for their proposal and tell them another bidder was selected.";

pub const REMINDER_SYSTEM: &str = "You are a procurement specialist at a data center \
    construction program. You write short, polite reminders asking an invited contractor \
    to submit their proposal before the deadline.";

pub const ANALYSIS_SYSTEM: &str = "You are a senior construction procurement analyst. \
    You evaluate a single contractor proposal against the project scope and write a \
    concise qualitative judgment for each evaluation criterion.";

pub const COMPARATIVE_SYSTEM: &str = "You are a senior construction procurement analyst. \
    You compare several evaluated proposals for the same RFP and recommend which \
    contractor should be awarded.";

pub const LESSONS_SYSTEM: &str = "You are a procurement program manager running a \
    post-award retrospective on a completed RFP.";

pub const GUIDE_SYSTEM: &str = "You are a technical writer documenting an RFP management \
    tool for procurement staff who are new to it.";

/// Shared shape for every email-style kind.
/// Replace: {facts_instruction}, {email_body_instruction}, {purpose}, {context_json}
pub const EMAIL_TEMPLATE: &str = r#"{facts_instruction}

{email_body_instruction}

Write {purpose}.

Return a JSON object with this EXACT schema (no extra fields):
{
  "emailSubject": "one line subject",
  "emailBody": "<p>HTML body</p>"
}

PROJECT AND RECIPIENT FACTS:
{context_json}"#;

pub const INVITATION_PURPOSE: &str = "an Expression of Interest invitation. Summarize the \
    scope, location and schedule, ask the contractor to confirm interest, and include the \
    submission link if one is supplied";

pub const RELEASE_PURPOSE: &str = "an RFP release notice. State that the bid package is \
    now available, list the technical documents if any are supplied, give the proposal \
    due date and include the submission link if one is supplied";

pub const AWARD_PURPOSE: &str = "an award letter congratulating the contractor, naming the \
    project and stating that contracting will follow";

pub const NON_AWARD_PURPOSE: &str = "a non-award letter thanking the contractor for their \
    proposal, stating that it was not selected this time, and inviting them to future bids";

pub const REMINDER_PURPOSE: &str = "a reminder to submit a proposal, giving the due date \
    and the submission link if they are supplied";

/// Replace: {facts_instruction}, {criteria_json}, {context_json}, {proposal_text}
pub const ANALYSIS_TEMPLATE: &str = r#"{facts_instruction}

Evaluate the proposal below against the project scope. Weigh your judgments using the
evaluation criteria and weights supplied. Each field is two or three sentences of plain
text that cites what the proposal does or does not say.

Return a JSON object with this EXACT schema (no extra fields):
{
  "safety": "...",
  "experience": "...",
  "programmaticApproach": "...",
  "commercialExcellence": "...",
  "innovativeSolutions": "...",
  "missionCriticalExperience": "..."
}

EVALUATION CRITERIA:
{criteria_json}

PROJECT:
{context_json}

PROPOSAL TEXT:
{proposal_text}"#;

/// Replace: {facts_instruction}, {context_json}, {scorecards_json}
pub const COMPARATIVE_TEMPLATE: &str = r#"{facts_instruction}

Compare the evaluated proposals below. Rank every contractor from strongest to weakest
and recommend one for award.

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "one paragraph overview",
  "ranking": [
    {"contractorName": "...", "rationale": "..."}
  ],
  "recommendation": "who to award and why"
}

PROJECT:
{context_json}

EVALUATED PROPOSALS:
{scorecards_json}"#;

/// Replace: {facts_instruction}, {context_json}
pub const LESSONS_TEMPLATE: &str = r#"{facts_instruction}

Summarize lessons learned from running this RFP end to end.

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "one paragraph",
  "wentWell": ["..."],
  "improvements": ["..."],
  "recommendations": ["..."]
}

RFP HISTORY:
{context_json}"#;

/// Replace: {topic}
pub const GUIDE_TEMPLATE: &str = r#"Write a short user guide for the following part of the RFP
management tool. The tool walks an RFP through intake and then six stages: Selection,
Invitations, Proposals, Analysis, Award and Feedback.

Return a JSON object with this EXACT schema (no extra fields):
{
  "title": "...",
  "sections": [
    {"heading": "...", "body": "..."}
  ]
}

TOPIC:
{topic}"#;
