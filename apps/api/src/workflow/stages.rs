//! Six-stage workflow state machine.
//!
//! Stages complete strictly in order. Completing a stage records it in
//! `completedStages` and moves the status to the next stage's working status.
//! Award is the exception: with an awarded proposal on file the RFP becomes
//! `Awarded`. Completing Feedback closes the RFP as `Completed`.

use serde::Serialize;

use crate::models::rfp::{Rfp, RfpStatus, WorkflowStage};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowView {
    /// First stage not yet completed. `None` once Feedback is done.
    pub current_stage: Option<WorkflowStage>,
    pub completed_stages: Vec<WorkflowStage>,
    pub status: RfpStatus,
}

impl From<&Rfp> for WorkflowView {
    fn from(rfp: &Rfp) -> Self {
        WorkflowView {
            current_stage: current_stage(rfp),
            completed_stages: rfp.completed_stages.clone(),
            status: rfp.status,
        }
    }
}

pub fn current_stage(rfp: &Rfp) -> Option<WorkflowStage> {
    WorkflowStage::ORDER
        .into_iter()
        .find(|stage| !rfp.completed_stages.contains(stage))
}

/// Marks `stage` complete. Returns `Ok(false)` when it already was.
pub fn complete_stage(
    rfp: &mut Rfp,
    stage: WorkflowStage,
    has_awarded_proposal: bool,
) -> Result<bool, String> {
    if rfp.completed_stages.contains(&stage) {
        return Ok(false);
    }

    if let Some(pending) = WorkflowStage::ORDER[..stage.index()]
        .iter()
        .find(|earlier| !rfp.completed_stages.contains(earlier))
    {
        return Err(format!("Complete the {pending} stage before {stage}"));
    }

    rfp.completed_stages.push(stage);
    rfp.status = match stage {
        WorkflowStage::Award if has_awarded_proposal => RfpStatus::Awarded,
        WorkflowStage::Feedback => RfpStatus::Completed,
        other => other
            .next()
            .map(|next| next.active_status())
            .unwrap_or(RfpStatus::Completed),
    };
    rfp.touch();
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_fields;

    fn complete_through(rfp: &mut Rfp, last: WorkflowStage) {
        for stage in WorkflowStage::ORDER {
            complete_stage(rfp, stage, false).unwrap();
            if stage == last {
                break;
            }
        }
    }

    #[test]
    fn test_new_rfp_starts_at_selection() {
        let rfp = Rfp::new(sample_fields());
        assert_eq!(current_stage(&rfp), Some(WorkflowStage::Selection));
    }

    #[test]
    fn test_completing_selection_moves_to_invitation() {
        let mut rfp = Rfp::new(sample_fields());
        assert_eq!(complete_stage(&mut rfp, WorkflowStage::Selection, false), Ok(true));
        assert_eq!(rfp.status, RfpStatus::Invitation);
        assert_eq!(current_stage(&rfp), Some(WorkflowStage::Invitations));
    }

    #[test]
    fn test_stages_cannot_be_skipped() {
        let mut rfp = Rfp::new(sample_fields());
        let err = complete_stage(&mut rfp, WorkflowStage::Analysis, false).unwrap_err();
        assert!(err.contains("Selection"));
        assert!(rfp.completed_stages.is_empty());
        assert_eq!(rfp.status, RfpStatus::Draft);
    }

    #[test]
    fn test_completion_is_idempotent() {
        let mut rfp = Rfp::new(sample_fields());
        complete_stage(&mut rfp, WorkflowStage::Selection, false).unwrap();
        assert_eq!(complete_stage(&mut rfp, WorkflowStage::Selection, false), Ok(false));
        assert_eq!(rfp.completed_stages, vec![WorkflowStage::Selection]);
    }

    #[test]
    fn test_award_with_winner_sets_awarded() {
        let mut rfp = Rfp::new(sample_fields());
        complete_through(&mut rfp, WorkflowStage::Analysis);
        complete_stage(&mut rfp, WorkflowStage::Award, true).unwrap();
        assert_eq!(rfp.status, RfpStatus::Awarded);
    }

    #[test]
    fn test_feedback_closes_the_rfp() {
        let mut rfp = Rfp::new(sample_fields());
        complete_through(&mut rfp, WorkflowStage::Feedback);
        assert_eq!(rfp.status, RfpStatus::Completed);
        assert_eq!(current_stage(&rfp), None);
    }
}
