//! Mail transport port.
//!
//! Outgoing letters (EOI invitations, award and non-award notices) leave the system
//! only through `MailTransport`. The shipped implementation records the send in the
//! log and returns a receipt; a real transport plugs in behind the same trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("no recipient addresses on file")]
    NoRecipients,

    #[error("transport rejected the message: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingEmail {
    pub rfp_id: Uuid,
    /// e.g. "invitation", "award".
    pub kind: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub message_id: Uuid,
    pub recipients: usize,
    pub simulated: bool,
    pub sent_at: DateTime<Utc>,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<SendReceipt, MailError>;
}

/// Accepts every well-addressed message without delivering it.
pub struct SimulatedMailTransport {
    from: String,
}

impl SimulatedMailTransport {
    pub fn new(from: String) -> Self {
        Self { from }
    }
}

#[async_trait]
impl MailTransport for SimulatedMailTransport {
    async fn send(&self, email: &OutgoingEmail) -> Result<SendReceipt, MailError> {
        if email.to.is_empty() {
            return Err(MailError::NoRecipients);
        }
        if let Some(bad) = email.to.iter().find(|addr| !is_plausible_address(addr)) {
            return Err(MailError::Rejected(format!("invalid address '{bad}'")));
        }
        let receipt = SendReceipt {
            message_id: Uuid::new_v4(),
            recipients: email.to.len(),
            simulated: true,
            sent_at: Utc::now(),
        };
        info!(
            from = %self.from,
            to = %email.to.join(", "),
            kind = %email.kind,
            rfp_id = %email.rfp_id,
            message_id = %receipt.message_id,
            "Simulated send: {}",
            email.subject
        );
        Ok(receipt)
    }
}

fn is_plausible_address(addr: &str) -> bool {
    match addr.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    }
}
