// Shared prompt fragments.
// Each module that drafts text defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps drafts tied to the project record.
pub const FACTS_INSTRUCTION: &str = "\
    CRITICAL: Use only the project and contractor facts supplied below. \
    Do NOT invent budgets, dates, names, certifications, or commitments. \
    If a fact is not supplied, write around it rather than guessing.";

/// Formatting rule for email bodies that are pasted into a mail client.
pub const EMAIL_BODY_INSTRUCTION: &str = "\
    The email body is simple HTML: <p> paragraphs, <ul>/<li> lists and <strong> only. \
    No <html>, <head> or inline styles. Address the recipient by their contact names \
    when supplied and sign off as the Procurement Team.";
