pub mod checklist;
pub mod clarification;
pub mod contractor;
pub mod metro;
pub mod proposal;
pub mod rfp;
