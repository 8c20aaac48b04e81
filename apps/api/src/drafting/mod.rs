//! Email Drafting Gateway and its clarification flow.

pub mod clarifications;
pub mod gateway;
pub mod handlers;
pub mod inputs;
pub mod kinds;
pub mod outputs;
pub mod prompts;

pub use gateway::DraftingGateway;
