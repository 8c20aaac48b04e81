use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::checklist::{ChecklistItem, EvaluationChecklist};
use crate::models::clarification::Clarification;
use crate::models::contractor::Contractor;
use crate::models::metro::MetroCode;
use crate::models::proposal::{Proposal, Scorecard};
use crate::models::rfp::{Rfp, WorkflowStage};
use crate::store::{ChangeEvent, ChangeFeed, ChangeKind, Collection, RfpStore, StoreError};

/// PostgreSQL SQLSTATE for insufficient_privilege.
const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// PostgreSQL-backed document store. One table per collection; sub-collections
/// carry an `rfp_id` foreign key with `ON DELETE CASCADE`.
pub struct PgStore {
    pool: PgPool,
    feed: ChangeFeed,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            feed: ChangeFeed::default(),
        }
    }
}

/// Wraps a driver error, lifting privilege failures into a structured
/// permission error that names the attempted operation and document path.
fn classify(err: sqlx::Error, operation: &'static str, path: String) -> StoreError {
    let denied = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == INSUFFICIENT_PRIVILEGE)
        .unwrap_or(false);
    if denied {
        StoreError::PermissionDenied { operation, path }
    } else {
        StoreError::Database(err)
    }
}

fn parse_enum<T>(collection: &'static str, raw: &str) -> Result<T, StoreError>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse::<T>()
        .map_err(|reason| StoreError::Corrupt { collection, reason })
}

// ────────────────────────────────────────────────────────────────────────────
// Row types
// ────────────────────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct RfpRow {
    id: Uuid,
    project_name: String,
    scope_of_work: String,
    metro_code: String,
    contractor_type: String,
    estimated_budget: f64,
    rfp_start_date: Option<NaiveDate>,
    rfp_end_date: Option<NaiveDate>,
    project_start_date: Option<NaiveDate>,
    project_end_date: Option<NaiveDate>,
    status: String,
    invited_contractors: Vec<Uuid>,
    eoi_sent: Vec<Uuid>,
    completed_stages: Vec<String>,
    technical_documents: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RfpRow> for Rfp {
    type Error = StoreError;

    fn try_from(row: RfpRow) -> Result<Self, Self::Error> {
        let completed_stages = row
            .completed_stages
            .iter()
            .map(|s| parse_enum::<WorkflowStage>("rfps", s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Rfp {
            id: row.id,
            project_name: row.project_name,
            scope_of_work: row.scope_of_work,
            metro_code: row.metro_code,
            contractor_type: parse_enum("rfps", &row.contractor_type)?,
            estimated_budget: row.estimated_budget,
            rfp_start_date: row.rfp_start_date,
            rfp_end_date: row.rfp_end_date,
            project_start_date: row.project_start_date,
            project_end_date: row.project_end_date,
            status: parse_enum("rfps", &row.status)?,
            invited_contractors: row.invited_contractors,
            eoi_sent: row.eoi_sent,
            completed_stages,
            technical_documents: row.technical_documents,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ContractorRow {
    id: Uuid,
    name: String,
    contact_names: String,
    contact_emails: String,
    contractor_type: String,
    preferred_status: String,
    region: String,
    metro_site: String,
    metro_codes: Vec<String>,
    performance: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ContractorRow> for Contractor {
    type Error = StoreError;

    fn try_from(row: ContractorRow) -> Result<Self, Self::Error> {
        let performance = u8::try_from(row.performance).map_err(|_| StoreError::Corrupt {
            collection: "contractors",
            reason: format!("performance {} out of range", row.performance),
        })?;
        Ok(Contractor {
            id: row.id,
            name: row.name,
            contact_names: row.contact_names,
            contact_emails: row.contact_emails,
            contractor_type: parse_enum("contractors", &row.contractor_type)?,
            preferred_status: parse_enum("contractors", &row.preferred_status)?,
            region: row.region,
            metro_site: row.metro_site,
            metro_codes: row.metro_codes,
            performance,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct MetroRow {
    id: Uuid,
    code: String,
    city: String,
    state: String,
    region: String,
    latitude: f64,
    longitude: f64,
}

impl From<MetroRow> for MetroCode {
    fn from(row: MetroRow) -> Self {
        MetroCode {
            id: row.id,
            code: row.code,
            city: row.city,
            state: row.state,
            region: row.region,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

#[derive(FromRow)]
struct ProposalRow {
    id: Uuid,
    rfp_id: Uuid,
    contractor_id: Uuid,
    contractor_name: String,
    submitted_at: DateTime<Utc>,
    status: String,
    document_url: Option<String>,
    extracted_text: String,
    scorecard: Option<Json<Scorecard>>,
}

impl TryFrom<ProposalRow> for Proposal {
    type Error = StoreError;

    fn try_from(row: ProposalRow) -> Result<Self, Self::Error> {
        Ok(Proposal {
            id: row.id,
            rfp_id: row.rfp_id,
            contractor_id: row.contractor_id,
            contractor_name: row.contractor_name,
            submitted_at: row.submitted_at,
            status: parse_enum("proposals", &row.status)?,
            document_url: row.document_url,
            extracted_text: row.extracted_text,
            scorecard: row.scorecard.map(|Json(card)| card),
        })
    }
}

#[derive(FromRow)]
struct ChecklistRow {
    rfp_id: Uuid,
    items: Json<Vec<ChecklistItem>>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct ClarificationRow {
    id: Uuid,
    rfp_id: Uuid,
    field: String,
    question: String,
    answer: Option<String>,
    created_at: DateTime<Utc>,
    answered_at: Option<DateTime<Utc>>,
}

impl From<ClarificationRow> for Clarification {
    fn from(row: ClarificationRow) -> Self {
        Clarification {
            id: row.id,
            rfp_id: row.rfp_id,
            field: row.field,
            question: row.question,
            answer: row.answer,
            created_at: row.created_at,
            answered_at: row.answered_at,
        }
    }
}

fn stage_names(rfp: &Rfp) -> Vec<String> {
    rfp.completed_stages
        .iter()
        .map(|s| s.as_str().to_string())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Store implementation
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl RfpStore for PgStore {
    async fn insert_rfp(&self, rfp: &Rfp) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO rfps
                (id, project_name, scope_of_work, metro_code, contractor_type, estimated_budget,
                 rfp_start_date, rfp_end_date, project_start_date, project_end_date, status,
                 invited_contractors, eoi_sent, completed_stages, technical_documents,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(rfp.id)
        .bind(&rfp.project_name)
        .bind(&rfp.scope_of_work)
        .bind(&rfp.metro_code)
        .bind(rfp.contractor_type.as_str())
        .bind(rfp.estimated_budget)
        .bind(rfp.rfp_start_date)
        .bind(rfp.rfp_end_date)
        .bind(rfp.project_start_date)
        .bind(rfp.project_end_date)
        .bind(rfp.status.as_str())
        .bind(&rfp.invited_contractors)
        .bind(&rfp.eoi_sent)
        .bind(stage_names(rfp))
        .bind(&rfp.technical_documents)
        .bind(rfp.created_at)
        .bind(rfp.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, "create", format!("rfps/{}", rfp.id)))?;

        self.feed.publish(ChangeEvent::new(
            Collection::Rfps,
            rfp.id,
            Some(rfp.id),
            ChangeKind::Created,
        ));
        Ok(())
    }

    async fn get_rfp(&self, id: Uuid) -> Result<Rfp, StoreError> {
        sqlx::query_as::<_, RfpRow>("SELECT * FROM rfps WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "get", format!("rfps/{id}")))?
            .ok_or_else(|| StoreError::not_found("rfps", id))?
            .try_into()
    }

    async fn list_rfps(&self) -> Result<Vec<Rfp>, StoreError> {
        sqlx::query_as::<_, RfpRow>("SELECT * FROM rfps ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(e, "list", "rfps".to_string()))?
            .into_iter()
            .map(Rfp::try_from)
            .collect()
    }

    async fn update_rfp(&self, rfp: &Rfp) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE rfps SET
                project_name = $2, scope_of_work = $3, metro_code = $4, contractor_type = $5,
                estimated_budget = $6, rfp_start_date = $7, rfp_end_date = $8,
                project_start_date = $9, project_end_date = $10, status = $11,
                invited_contractors = $12, eoi_sent = $13, completed_stages = $14,
                technical_documents = $15, updated_at = $16
            WHERE id = $1
            "#,
        )
        .bind(rfp.id)
        .bind(&rfp.project_name)
        .bind(&rfp.scope_of_work)
        .bind(&rfp.metro_code)
        .bind(rfp.contractor_type.as_str())
        .bind(rfp.estimated_budget)
        .bind(rfp.rfp_start_date)
        .bind(rfp.rfp_end_date)
        .bind(rfp.project_start_date)
        .bind(rfp.project_end_date)
        .bind(rfp.status.as_str())
        .bind(&rfp.invited_contractors)
        .bind(&rfp.eoi_sent)
        .bind(stage_names(rfp))
        .bind(&rfp.technical_documents)
        .bind(rfp.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, "update", format!("rfps/{}", rfp.id)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("rfps", rfp.id));
        }
        self.feed.publish(ChangeEvent::new(
            Collection::Rfps,
            rfp.id,
            Some(rfp.id),
            ChangeKind::Updated,
        ));
        Ok(())
    }

    async fn delete_rfp(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM rfps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "delete", format!("rfps/{id}")))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("rfps", id));
        }
        self.feed.publish(ChangeEvent::new(
            Collection::Rfps,
            id,
            Some(id),
            ChangeKind::Deleted,
        ));
        Ok(())
    }

    async fn list_contractors(&self) -> Result<Vec<Contractor>, StoreError> {
        sqlx::query_as::<_, ContractorRow>("SELECT * FROM contractors ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(e, "list", "contractors".to_string()))?
            .into_iter()
            .map(Contractor::try_from)
            .collect()
    }

    async fn get_contractor(&self, id: Uuid) -> Result<Contractor, StoreError> {
        sqlx::query_as::<_, ContractorRow>("SELECT * FROM contractors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "get", format!("contractors/{id}")))?
            .ok_or_else(|| StoreError::not_found("contractors", id))?
            .try_into()
    }

    async fn upsert_contractor(&self, contractor: &Contractor) -> Result<(), StoreError> {
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO contractors
                (id, name, contact_names, contact_emails, contractor_type, preferred_status,
                 region, metro_site, metro_codes, performance, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                contact_names = EXCLUDED.contact_names,
                contact_emails = EXCLUDED.contact_emails,
                contractor_type = EXCLUDED.contractor_type,
                preferred_status = EXCLUDED.preferred_status,
                region = EXCLUDED.region,
                metro_site = EXCLUDED.metro_site,
                metro_codes = EXCLUDED.metro_codes,
                performance = EXCLUDED.performance,
                updated_at = EXCLUDED.updated_at
            RETURNING (xmax = 0)
            "#,
        )
        .bind(contractor.id)
        .bind(&contractor.name)
        .bind(&contractor.contact_names)
        .bind(&contractor.contact_emails)
        .bind(contractor.contractor_type.as_str())
        .bind(contractor.preferred_status.as_str())
        .bind(&contractor.region)
        .bind(&contractor.metro_site)
        .bind(&contractor.metro_codes)
        .bind(i16::from(contractor.performance))
        .bind(contractor.created_at)
        .bind(contractor.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "write", format!("contractors/{}", contractor.id)))?;

        let kind = if inserted {
            ChangeKind::Created
        } else {
            ChangeKind::Updated
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
        Ok(
            sqlx::query_as::<_, MetroRow>("SELECT * FROM metro_codes ORDER BY code ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| classify(e, "list", "metro_codes".to_string()))?
                .into_iter()
                .map(MetroCode::from)
                .collect(),
        )
    }

    async fn seed_metro_codes(&self, metros: &[MetroCode]) -> Result<(), StoreError> {
        for metro in metros {
            sqlx::query(
                r#"
                INSERT INTO metro_codes (id, code, city, state, region, latitude, longitude)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (code) DO NOTHING
                "#,
            )
            .bind(metro.id)
            .bind(&metro.code)
            .bind(&metro.city)
            .bind(&metro.state)
            .bind(&metro.region)
            .bind(metro.latitude)
            .bind(metro.longitude)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "seed", format!("metro_codes/{}", metro.code)))?;
        }
        Ok(())
    }

    async fn list_proposals(&self, rfp_id: Uuid) -> Result<Vec<Proposal>, StoreError> {
        sqlx::query_as::<_, ProposalRow>(
            "SELECT * FROM proposals WHERE rfp_id = $1 ORDER BY submitted_at ASC",
        )
        .bind(rfp_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "list", format!("rfps/{rfp_id}/proposals")))?
        .into_iter()
        .map(Proposal::try_from)
        .collect()
    }

    async fn get_proposal(&self, rfp_id: Uuid, id: Uuid) -> Result<Proposal, StoreError> {
        sqlx::query_as::<_, ProposalRow>("SELECT * FROM proposals WHERE rfp_id = $1 AND id = $2")
            .bind(rfp_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "get", format!("rfps/{rfp_id}/proposals/{id}")))?
            .ok_or_else(|| StoreError::not_found("proposals", id))?
            .try_into()
    }

    async fn insert_proposal(&self, proposal: &Proposal) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO proposals
                (id, rfp_id, contractor_id, contractor_name, submitted_at, status,
                 document_url, extracted_text, scorecard)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(proposal.id)
        .bind(proposal.rfp_id)
        .bind(proposal.contractor_id)
        .bind(&proposal.contractor_name)
        .bind(proposal.submitted_at)
        .bind(proposal.status.as_str())
        .bind(&proposal.document_url)
        .bind(&proposal.extracted_text)
        .bind(proposal.scorecard.as_ref().map(Json))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            classify(
                e,
                "create",
                format!("rfps/{}/proposals/{}", proposal.rfp_id, proposal.id),
            )
        })?;

        self.feed.publish(ChangeEvent::new(
            Collection::Proposals,
            proposal.id,
            Some(proposal.rfp_id),
            ChangeKind::Created,
        ));
        Ok(())
    }

    async fn update_proposal(&self, proposal: &Proposal) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE proposals SET
                contractor_name = $3, status = $4, document_url = $5,
                extracted_text = $6, scorecard = $7
            WHERE rfp_id = $1 AND id = $2
            "#,
        )
        .bind(proposal.rfp_id)
        .bind(proposal.id)
        .bind(&proposal.contractor_name)
        .bind(proposal.status.as_str())
        .bind(&proposal.document_url)
        .bind(&proposal.extracted_text)
        .bind(proposal.scorecard.as_ref().map(Json))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            classify(
                e,
                "update",
                format!("rfps/{}/proposals/{}", proposal.rfp_id, proposal.id),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("proposals", proposal.id));
        }
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
        Ok(sqlx::query_as::<_, ChecklistRow>(
            "SELECT * FROM evaluation_checklists WHERE rfp_id = $1",
        )
        .bind(rfp_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "get", format!("rfps/{rfp_id}/evaluation_checklist")))?
        .map(|row| EvaluationChecklist {
            rfp_id: row.rfp_id,
            items: row.items.0,
            updated_at: row.updated_at,
        }))
    }

    async fn save_checklist(&self, checklist: &EvaluationChecklist) -> Result<(), StoreError> {
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO evaluation_checklists (rfp_id, items, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (rfp_id) DO UPDATE SET
                items = EXCLUDED.items,
                updated_at = EXCLUDED.updated_at
            RETURNING (xmax = 0)
            "#,
        )
        .bind(checklist.rfp_id)
        .bind(Json(&checklist.items))
        .bind(checklist.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            classify(
                e,
                "write",
                format!("rfps/{}/evaluation_checklist", checklist.rfp_id),
            )
        })?;

        let kind = if inserted {
            ChangeKind::Created
        } else {
            ChangeKind::Updated
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
        Ok(sqlx::query_as::<_, ClarificationRow>(
            "SELECT * FROM clarifications WHERE rfp_id = $1 ORDER BY created_at ASC",
        )
        .bind(rfp_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "list", format!("rfps/{rfp_id}/clarifications")))?
        .into_iter()
        .map(Clarification::from)
        .collect())
    }

    async fn insert_clarification(
        &self,
        clarification: &Clarification,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO clarifications (id, rfp_id, field, question, answer, created_at, answered_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(clarification.id)
        .bind(clarification.rfp_id)
        .bind(&clarification.field)
        .bind(&clarification.question)
        .bind(&clarification.answer)
        .bind(clarification.created_at)
        .bind(clarification.answered_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            classify(
                e,
                "create",
                format!(
                    "rfps/{}/clarifications/{}",
                    clarification.rfp_id, clarification.id
                ),
            )
        })?;

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
        let result = sqlx::query(
            "UPDATE clarifications SET answer = $3, answered_at = $4 WHERE rfp_id = $1 AND id = $2",
        )
        .bind(clarification.rfp_id)
        .bind(clarification.id)
        .bind(&clarification.answer)
        .bind(clarification.answered_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            classify(
                e,
                "update",
                format!(
                    "rfps/{}/clarifications/{}",
                    clarification.rfp_id, clarification.id
                ),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("clarifications", clarification.id));
        }
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
