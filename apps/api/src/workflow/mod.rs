//! RFP Workflow Orchestrator: the six stages and the operations each stage offers.

pub mod analysis;
pub mod award;
pub mod feedback;
pub mod handlers;
pub mod invitations;
pub mod proposals;
pub mod selection;
pub mod stages;
