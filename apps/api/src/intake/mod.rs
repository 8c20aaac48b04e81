// Intake Form: RFP creation, editing and document upload.

pub mod handlers;
pub mod validation;
