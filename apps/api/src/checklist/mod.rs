//! Evaluation Checklist: weighted scoring rubric for an RFP.

pub mod handlers;
pub mod weights;
