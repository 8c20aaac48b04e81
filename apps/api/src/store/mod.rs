//! Document store: the sole source of truth for every collection.
//!
//! Handlers never hold a database handle directly. `AppState` carries an
//! `Arc<dyn RfpStore>` built once in `main`: `PgStore` when `DATABASE_URL` is set,
//! `MemoryStore` otherwise. Every successful write is published on the store's
//! `ChangeFeed`.
//!
//! Writes are whole-document overwrites. Concurrent writers race and the last one wins.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::checklist::EvaluationChecklist;
use crate::models::clarification::Clarification;
use crate::models::contractor::Contractor;
use crate::models::metro::MetroCode;
use crate::models::proposal::Proposal;
use crate::models::rfp::Rfp;

pub mod events;
pub mod memory;
pub mod postgres;

pub use events::{ChangeEvent, ChangeFeed, ChangeKind, Collection};
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{collection} document {id} not found")]
    NotFound { collection: &'static str, id: String },

    #[error("permission denied: {operation} on {path}")]
    PermissionDenied {
        operation: &'static str,
        path: String,
    },

    #[error("corrupt document in {collection}: {reason}")]
    Corrupt {
        collection: &'static str,
        reason: String,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(collection: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            collection,
            id: id.to_string(),
        }
    }
}

#[async_trait]
pub trait RfpStore: Send + Sync {
    // rfps
    async fn insert_rfp(&self, rfp: &Rfp) -> Result<(), StoreError>;
    async fn get_rfp(&self, id: Uuid) -> Result<Rfp, StoreError>;
    /// Newest first.
    async fn list_rfps(&self) -> Result<Vec<Rfp>, StoreError>;
    async fn update_rfp(&self, rfp: &Rfp) -> Result<(), StoreError>;
    /// Removes the RFP and its proposals, checklist and clarifications.
    async fn delete_rfp(&self, id: Uuid) -> Result<(), StoreError>;

    // contractors
    async fn list_contractors(&self) -> Result<Vec<Contractor>, StoreError>;
    async fn get_contractor(&self, id: Uuid) -> Result<Contractor, StoreError>;
    async fn upsert_contractor(&self, contractor: &Contractor) -> Result<(), StoreError>;

    // metro_codes
    async fn list_metro_codes(&self) -> Result<Vec<MetroCode>, StoreError>;
    async fn seed_metro_codes(&self, metros: &[MetroCode]) -> Result<(), StoreError>;

    // rfps/{id}/proposals
    async fn list_proposals(&self, rfp_id: Uuid) -> Result<Vec<Proposal>, StoreError>;
    async fn get_proposal(&self, rfp_id: Uuid, id: Uuid) -> Result<Proposal, StoreError>;
    async fn insert_proposal(&self, proposal: &Proposal) -> Result<(), StoreError>;
    async fn update_proposal(&self, proposal: &Proposal) -> Result<(), StoreError>;

    // rfps/{id}/evaluation_checklist
    async fn get_checklist(&self, rfp_id: Uuid)
        -> Result<Option<EvaluationChecklist>, StoreError>;
    async fn save_checklist(&self, checklist: &EvaluationChecklist) -> Result<(), StoreError>;

    // rfps/{id}/clarifications
    async fn list_clarifications(&self, rfp_id: Uuid) -> Result<Vec<Clarification>, StoreError>;
    async fn insert_clarification(&self, clarification: &Clarification)
        -> Result<(), StoreError>;
    async fn update_clarification(&self, clarification: &Clarification)
        -> Result<(), StoreError>;

    fn changes(&self) -> &ChangeFeed;
}
