// Contractor registry: metro-code derivation, matching against RFPs, and write validation.

pub mod handlers;
pub mod matcher;
pub mod metro_codes;
pub mod validation;
