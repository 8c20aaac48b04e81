use anyhow::{bail, Context, Result};

/// S3 settings. Present only when `S3_BUCKET` is set.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means the in-memory store.
    pub database_url: Option<String>,
    /// Unset means uploads go to `upload_dir`.
    pub s3: Option<S3Config>,
    pub upload_dir: String,
    pub anthropic_api_key: String,
    pub api_tokens: Vec<String>,
    pub public_base_url: String,
    pub mail_from: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let api_tokens = parse_tokens(&require_env("API_TOKENS")?);
        if api_tokens.is_empty() {
            bail!("API_TOKENS must contain at least one token");
        }

        let s3 = optional_env("S3_BUCKET").map(|bucket| S3Config {
            bucket,
            endpoint: optional_env("S3_ENDPOINT"),
            region: optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
            secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
        });

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            s3,
            upload_dir: optional_env("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string()),
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            api_tokens,
            public_base_url: optional_env("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            mail_from: optional_env("MAIL_FROM")
                .unwrap_or_else(|| "rfp-desk@localhost".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Link a contractor follows to submit a proposal without signing in.
    pub fn submission_link(&self, rfp_id: uuid::Uuid) -> String {
        format!("{}/proposal/submit/{}", self.public_base_url, rfp_id)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
