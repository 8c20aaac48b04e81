use std::sync::Arc;

use crate::config::Config;
use crate::drafting::DraftingGateway;
use crate::files::FileStore;
use crate::mail::MailTransport;
use crate::store::RfpStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every backend handle is built once in `main`.
#[derive(Clone)]
pub struct AppState {
    /// `PgStore` when `DATABASE_URL` is set, `MemoryStore` otherwise.
    pub store: Arc<dyn RfpStore>,
    /// `S3FileStore` when `S3_BUCKET` is set, `LocalFileStore` otherwise.
    pub files: Arc<dyn FileStore>,
    pub drafting: DraftingGateway,
    pub mail: Arc<dyn MailTransport>,
    pub config: Config,
}
