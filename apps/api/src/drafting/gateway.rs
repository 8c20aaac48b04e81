//! Email Drafting Gateway: the only path from workflow code to the hosted model.
//!
//! Each call validates its input, renders the kind's template, makes one generator
//! call and checks the returned shape. Any failure after validation is reported as
//! `GenerationFailed`. Nothing is retried.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, info};

use crate::drafting::inputs::{AnalysisInput, ComparisonInput, EmailInput, LessonsInput};
use crate::drafting::kinds::MessageKind;
use crate::drafting::outputs::{ComparativeReport, DraftShape, EmailDraft, LessonsLearned, UserGuide};
use crate::errors::{AppError, FieldError};
use crate::llm_client::prompts::{EMAIL_BODY_INSTRUCTION, FACTS_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{generate_json, TextGenerator};
use crate::models::proposal::Scorecard;

#[derive(Clone)]
pub struct DraftingGateway {
    generator: Arc<dyn TextGenerator>,
}

impl DraftingGateway {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn draft_email(
        &self,
        kind: MessageKind,
        input: &EmailInput,
    ) -> Result<EmailDraft, AppError> {
        let purpose = kind.purpose().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("{kind} is not an email kind"))
        })?;
        input.validate().map_err(AppError::InvalidFields)?;

        let prompt = kind
            .template()
            .replace("{facts_instruction}", FACTS_INSTRUCTION)
            .replace("{email_body_instruction}", EMAIL_BODY_INSTRUCTION)
            .replace("{purpose}", purpose)
            .replace("{context_json}", &to_json(input)?);

        self.generate(kind, &prompt).await
    }

    pub async fn analyze_proposal(&self, input: &AnalysisInput) -> Result<Scorecard, AppError> {
        input.validate().map_err(AppError::InvalidFields)?;

        let kind = MessageKind::Analysis;
        let prompt = kind
            .template()
            .replace("{facts_instruction}", FACTS_INSTRUCTION)
            .replace("{criteria_json}", &to_json(&input.criteria)?)
            .replace("{context_json}", &to_json(input)?)
            .replace("{proposal_text}", &input.proposal_text);

        self.generate(kind, &prompt).await
    }

    pub async fn compare_proposals(
        &self,
        input: &ComparisonInput,
    ) -> Result<ComparativeReport, AppError> {
        input.validate().map_err(AppError::InvalidFields)?;

        let kind = MessageKind::ComparativeAnalysis;
        let prompt = kind
            .template()
            .replace("{facts_instruction}", FACTS_INSTRUCTION)
            .replace("{context_json}", &to_json(&input.project)?)
            .replace("{scorecards_json}", &to_json(&input.proposals)?);

        self.generate(kind, &prompt).await
    }

    pub async fn lessons_learned(&self, input: &LessonsInput) -> Result<LessonsLearned, AppError> {
        input.validate().map_err(AppError::InvalidFields)?;

        let kind = MessageKind::LessonsLearned;
        let prompt = kind
            .template()
            .replace("{facts_instruction}", FACTS_INSTRUCTION)
            .replace("{context_json}", &to_json(input)?);

        self.generate(kind, &prompt).await
    }

    pub async fn user_guide(&self, topic: &str) -> Result<UserGuide, AppError> {
        if topic.trim().is_empty() {
            return Err(AppError::InvalidFields(vec![FieldError::new(
                "topic",
                "Required field is missing",
            )]));
        }

        let kind = MessageKind::UserGuide;
        let prompt = kind.template().replace("{topic}", topic.trim());
        self.generate(kind, &prompt).await
    }

    async fn generate<T>(&self, kind: MessageKind, prompt: &str) -> Result<T, AppError>
    where
        T: DeserializeOwned + DraftShape,
    {
        let system = format!("{}\n\n{}", kind.system_prompt(), JSON_ONLY_SYSTEM);

        let output: T = generate_json(self.generator.as_ref(), prompt, &system)
            .await
            .map_err(|e| {
                error!("{kind} generation failed: {e}");
                AppError::GenerationFailed(format!("{kind}: {e}"))
            })?;

        output.check().map_err(|reason| {
            error!("{kind} generation returned an incomplete result: {reason}");
            AppError::GenerationFailed(format!("{kind}: {reason}"))
        })?;

        info!("Drafted {kind}");
        Ok(output)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize prompt context: {e}")))
}
