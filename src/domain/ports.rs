use crate::domain::ledger::LedgerEntry;
use crate::domain::student::Student;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Result of a ledger append. A redelivered transaction id is a silent
/// skip, not an error.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AppendOutcome {
    Appended,
    DuplicateSkipped,
}

/// Authoritative student directory. Every call returns a fresh snapshot;
/// callers must not cache the result across requests.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    async fn fetch_roster(&self) -> Result<Vec<Student>>;
}

/// Outbound text messaging. `Ok(true)` means the transport accepted the
/// message; delivery beyond that is best-effort.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send(&self, recipient: &str, text: &str) -> Result<bool>;
}

/// Offsite file storage for ledger backups and receipts.
#[async_trait]
pub trait ColdStorageUploader: Send + Sync {
    async fn upload(&self, local_file: &Path, destination_folder: &str) -> Result<()>;
}

/// Natural-language classifier deciding whether a free-text message
/// confirms that an enrollment form was filled in.
#[async_trait]
pub trait ConfirmationClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<bool>;
}

/// Append-only diagnostic log, separate from the ledger.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, action: &str, detail: &str) -> Result<()>;
}

/// Durable, deduplicated payment record.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Appends the entry unless its transaction id is already present.
    async fn append(&self, entry: LedgerEntry) -> Result<AppendOutcome>;

    /// Copies the current store to a timestamped snapshot, uploads it to
    /// cold storage and removes the local copy. The primary store is
    /// retained.
    async fn backup(&self, uploader: &dyn ColdStorageUploader, folder: &str) -> Result<()>;
}

pub type RosterProviderHandle = Arc<dyn RosterProvider>;
pub type MessagingGatewayHandle = Arc<dyn MessagingGateway>;
pub type ColdStorageUploaderHandle = Arc<dyn ColdStorageUploader>;
pub type ConfirmationClassifierHandle = Arc<dyn ConfirmationClassifier>;
pub type AuditSinkHandle = Arc<dyn AuditSink>;
pub type LedgerStoreHandle = Arc<dyn LedgerStore>;
