use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::models::checklist::EvaluationChecklist;
use crate::models::clarification::Clarification;
use crate::models::contractor::Contractor;
use crate::models::metro::MetroCode;
use crate::models::proposal::Proposal;
use crate::models::rfp::Rfp;
use crate::store::{ChangeEvent, ChangeFeed, ChangeKind, Collection, RfpStore, StoreError};

#[derive(Default)]
struct Collections {
    rfps: HashMap<Uuid, Rfp>,
    contractors: HashMap<Uuid, Contractor>,
    metro_codes: Vec<MetroCode>,
    proposals: HashMap<Uuid, Proposal>,
    checklists: HashMap<Uuid, EvaluationChecklist>,
    clarifications: HashMap<Uuid, Clarification>,
}

/// Process-local store used when no database is configured, and in tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
    feed: ChangeFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        info!("Using in-memory document store");
        Self::default()
    }
}

#[async_trait]
impl RfpStore for MemoryStore {
    async fn insert_rfp(&self, rfp: &Rfp) -> Result<(), StoreError> {
        self.inner.write().await.rfps.insert(rfp.id, rfp.clone());
        self.feed.publish(ChangeEvent::new(
            Collection::Rfps,
            rfp.id,
            Some(rfp.id),
            ChangeKind::Created,
        ));
        Ok(())
    }

    async fn get_rfp(&self, id: Uuid) -> Result<Rfp, StoreError> {
        self.inner
            .read()
            .await
            .rfps
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("rfps", id))
    }

    async fn list_rfps(&self) -> Result<Vec<Rfp>, StoreError> {
        let mut rfps: Vec<Rfp> = self.inner.read().await.rfps.values().cloned().collect();
        rfps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rfps)
    }

    async fn update_rfp(&self, rfp: &Rfp) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.rfps.contains_key(&rfp.id) {
            return Err(StoreError::not_found("rfps", rfp.id));
        }
        inner.rfps.insert(rfp.id, rfp.clone());
        drop(inner);
        self.feed.publish(ChangeEvent::new(
            Collection::Rfps,
            rfp.id,
            Some(rfp.id),
            ChangeKind::Updated,
        ));
        Ok(())
    }

    async fn delete_rfp(&self, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.rfps.remove(&id).is_none() {
            return Err(StoreError::not_found("rfps", id));
        }
        inner.proposals.retain(|_, p| p.rfp_id != id);
        inner.checklists.remove(&id);
        inner.clarifications.retain(|_, c| c.rfp_id != id);
        drop(inner);
        self.feed.publish(ChangeEvent::new(
            Collection::Rfps,
            id,
            Some(id),
            ChangeKind::Deleted,
        ));
        Ok(())
    }

    async fn list_contractors(&self) -> Result<Vec<Contractor>, StoreError> {
        let mut contractors: Vec<Contractor> = self
            .inner
            .read()
            .await
            .contractors
            .values()
            .cloned()
            .collect();
        contractors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(contractors)
    }

    async fn get_contractor(&self, id: Uuid) -> Result<Contractor, StoreError> {
        self.inner
            .read()
            .await
            .contractors
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("contractors", id))
    }

    async fn upsert_contractor(&self, contractor: &Contractor) -> Result<(), StoreError> {
        let existed = self
            .inner
            .write()
            .await
            .contractors
            .insert(contractor.id, contractor.clone())
            .is_some();
        let kind = if existed {
            ChangeKind::Updated
        } else {
            ChangeKind::Created
        };
        self.feed.publish(ChangeEvent::new(
            Collection::Contractors,
            contractor.id,
            None,
            kind,
        ));
        Ok(())
    }

    async fn list_metro_codes(&self) -> Result<Vec<MetroCode>, StoreError> {
        let mut metros = self.inner.read().await.metro_codes.clone();
        metros.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(metros)
    }

    async fn seed_metro_codes(&self, metros: &[MetroCode]) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        for metro in metros {
            if !inner.metro_codes.iter().any(|m| m.code == metro.code) {
                inner.metro_codes.push(metro.clone());
            }
        }
        Ok(())
    }

    async fn list_proposals(&self, rfp_id: Uuid) -> Result<Vec<Proposal>, StoreError> {
        let mut proposals: Vec<Proposal> = self
            .inner
            .read()
            .await
            .proposals
            .values()
            .filter(|p| p.rfp_id == rfp_id)
            .cloned()
            .collect();
        proposals.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(proposals)
    }

    async fn get_proposal(&self, rfp_id: Uuid, id: Uuid) -> Result<Proposal, StoreError> {
        self.inner
            .read()
            .await
            .proposals
            .get(&id)
            .filter(|p| p.rfp_id == rfp_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("proposals", id))
    }

    async fn insert_proposal(&self, proposal: &Proposal) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .proposals
            .insert(proposal.id, proposal.clone());
        self.feed.publish(ChangeEvent::new(
            Collection::Proposals,
            proposal.id,
            Some(proposal.rfp_id),
            ChangeKind::Created,
        ));
        Ok(())
    }

    async fn update_proposal(&self, proposal: &Proposal) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.proposals.contains_key(&proposal.id) {
            return Err(StoreError::not_found("proposals", proposal.id));
        }
        inner.proposals.insert(proposal.id, proposal.clone());
        drop(inner);
        self.feed.publish(ChangeEvent::new(
            Collection::Proposals,
            proposal.id,
            Some(proposal.rfp_id),
            ChangeKind::Updated,
        ));
        Ok(())
    }

    async fn get_checklist(
        &self,
        rfp_id: Uuid,
    ) -> Result<Option<EvaluationChecklist>, StoreError> {
        Ok(self.inner.read().await.checklists.get(&rfp_id).cloned())
    }

    async fn save_checklist(&self, checklist: &EvaluationChecklist) -> Result<(), StoreError> {
        let existed = self
            .inner
            .write()
            .await
            .checklists
            .insert(checklist.rfp_id, checklist.clone())
            .is_some();
        let kind = if existed {
            ChangeKind::Updated
        } else {
            ChangeKind::Created
        };
        self.feed.publish(ChangeEvent::new(
            Collection::EvaluationChecklists,
            checklist.rfp_id,
            Some(checklist.rfp_id),
            kind,
        ));
        Ok(())
    }

    async fn list_clarifications(&self, rfp_id: Uuid) -> Result<Vec<Clarification>, StoreError> {
        let mut clarifications: Vec<Clarification> = self
            .inner
            .read()
            .await
            .clarifications
            .values()
            .filter(|c| c.rfp_id == rfp_id)
            .cloned()
            .collect();
        clarifications.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(clarifications)
    }

    async fn insert_clarification(
        &self,
        clarification: &Clarification,
    ) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .clarifications
            .insert(clarification.id, clarification.clone());
        self.feed.publish(ChangeEvent::new(
            Collection::Clarifications,
            clarification.id,
            Some(clarification.rfp_id),
            ChangeKind::Created,
        ));
        Ok(())
    }

    async fn update_clarification(
        &self,
        clarification: &Clarification,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.clarifications.contains_key(&clarification.id) {
            return Err(StoreError::not_found("clarifications", clarification.id));
        }
        inner
            .clarifications
            .insert(clarification.id, clarification.clone());
        drop(inner);
        self.feed.publish(ChangeEvent::new(
            Collection::Clarifications,
            clarification.id,
            Some(clarification.rfp_id),
            ChangeKind::Updated,
        ));
        Ok(())
    }

    fn changes(&self) -> &ChangeFeed {
        &self.feed
    }
}
