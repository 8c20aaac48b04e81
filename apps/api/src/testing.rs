//! Fixtures shared by unit tests across modules.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use crate::config::Config;
use crate::contractors::metro_codes::extract_metro_codes;
use crate::drafting::DraftingGateway;
use crate::files::LocalFileStore;
use crate::llm_client::{LlmError, TextGenerator};
use crate::mail::{MailError, MailTransport, OutgoingEmail, SendReceipt};
use crate::models::contractor::{Contractor, ContractorType, PreferredStatus};
use crate::models::metro::reference_metros;
use crate::models::proposal::Proposal;
use crate::models::rfp::RfpFields;
use crate::state::AppState;
use crate::store::{MemoryStore, RfpStore};

pub const TEST_TOKEN: &str = "test-token";

pub const EMAIL_JSON: &str =
    r#"{"emailSubject": "NYC Data Center Expansion", "emailBody": "<p>Hello</p>"}"#;

pub const SCORECARD_JSON: &str = r#"{
    "safety": "EMR below 0.7",
    "experience": "Twelve comparable sites",
    "programmaticApproach": "Phased cutover plan",
    "commercialExcellence": "Within budget",
    "innovativeSolutions": "Prefabricated skids",
    "missionCriticalExperience": "Tier III facilities"
}"#;

/// Returns canned responses in order and records every prompt it was sent.
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(String::from).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::Api {
                status: 500,
                message: "no scripted response left".to_string(),
            })
    }
}

/// Accepts every message and keeps a copy.
#[derive(Default)]
pub struct RecordingMail {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMail {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMail {
    async fn send(&self, email: &OutgoingEmail) -> Result<SendReceipt, MailError> {
        if email.to.is_empty() {
            return Err(MailError::NoRecipients);
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(SendReceipt {
            message_id: Uuid::new_v4(),
            recipients: email.to.len(),
            simulated: true,
            sent_at: Utc::now(),
        })
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: None,
        s3: None,
        upload_dir: "./uploads".to_string(),
        anthropic_api_key: "test-key".to_string(),
        api_tokens: vec![TEST_TOKEN.to_string()],
        public_base_url: "http://localhost:8080".to_string(),
        mail_from: "rfp-desk@localhost".to_string(),
        port: 8080,
        rust_log: "debug".to_string(),
    }
}

/// App state over in-memory backends, plus handles to inspect them.
pub struct TestHarness {
    pub state: AppState,
    pub generator: Arc<ScriptedGenerator>,
    pub mail: Arc<RecordingMail>,
    _uploads: TempDir,
}

pub fn test_state(responses: Vec<&str>) -> TestHarness {
    let uploads = TempDir::new().unwrap();
    let generator = Arc::new(ScriptedGenerator::new(responses));
    let mail = Arc::new(RecordingMail::default());
    let store = MemoryStore::new();
    futures::executor::block_on(store.seed_metro_codes(&reference_metros())).unwrap();

    let state = AppState {
        store: Arc::new(store),
        files: Arc::new(LocalFileStore::new(uploads.path())),
        drafting: DraftingGateway::new(generator.clone()),
        mail: mail.clone(),
        config: test_config(),
    };
    TestHarness {
        state,
        generator,
        mail,
        _uploads: uploads,
    }
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// A fully dated NYC electrical RFP.
pub fn sample_fields() -> RfpFields {
    RfpFields {
        project_name: "NYC Data Center Expansion".to_string(),
        scope_of_work: "Install backup generators and switchgear".to_string(),
        metro_code: "NYC".to_string(),
        contractor_type: ContractorType::Electrical,
        estimated_budget: 500000.0,
        rfp_start_date: date(2025, 1, 6),
        rfp_end_date: date(2025, 2, 7),
        project_start_date: date(2025, 3, 3),
        project_end_date: date(2025, 9, 30),
    }
}

pub fn sample_proposal(rfp_id: Uuid, contractor_name: &str) -> Proposal {
    Proposal::submitted(
        rfp_id,
        Uuid::new_v4(),
        contractor_name.to_string(),
        None,
        "We will install two 2MW generators with a phased cutover.".to_string(),
    )
}

/// Contractor whose metro codes are derived from `metro_site`.
pub fn contractor(
    name: &str,
    contractor_type: ContractorType,
    metro_site: &str,
    performance: u8,
) -> Contractor {
    let slug: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    let now = Utc::now();
    Contractor {
        id: Uuid::new_v4(),
        name: name.to_string(),
        contact_names: "Pat Lee; Sam Ortiz".to_string(),
        contact_emails: format!("bids@{slug}.com; pm@{slug}.com"),
        contractor_type,
        preferred_status: PreferredStatus::Preferred,
        region: "Northeast".to_string(),
        metro_site: metro_site.to_string(),
        metro_codes: extract_metro_codes(metro_site),
        performance,
        created_at: now,
        updated_at: now,
    }
}
