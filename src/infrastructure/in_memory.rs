use crate::domain::audit::AuditRecord;
use crate::domain::ledger::{LEDGER_HEADER, LedgerEntry};
use crate::domain::ports::{
    AppendOutcome, AuditSink, ColdStorageUploader, LedgerStore, MessagingGateway, RosterProvider,
};
use crate::domain::student::Student;
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger.
///
/// Holds the write lock across the duplicate check and the insert, so the
/// idempotence guarantee matches the file-backed store. Ideal for tests and
/// small deployments where durability is not required.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    entries: Arc<RwLock<Vec<LedgerEntry>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries, for inspection in tests.
    pub async fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedger {
    async fn append(&self, entry: LedgerEntry) -> Result<AppendOutcome> {
        let mut entries = self.entries.write().await;
        if entries
            .iter()
            .any(|existing| existing.transaction_id == entry.transaction_id)
        {
            return Ok(AppendOutcome::DuplicateSkipped);
        }
        entries.push(entry);
        Ok(AppendOutcome::Appended)
    }

    async fn backup(&self, uploader: &dyn ColdStorageUploader, folder: &str) -> Result<()> {
        let entries = self.entries.read().await.clone();
        let dir = tempfile::tempdir()?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.path().join(format!("pagamentos_backup_{stamp}.csv"));

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&path)?;
        writer.write_record(LEDGER_HEADER)?;
        for entry in &entries {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        drop(writer);

        uploader.upload(&path, folder).await
    }
}

/// Roster provider serving a fixed list of students.
#[derive(Default, Clone)]
pub struct InMemoryRoster {
    students: Arc<Vec<Student>>,
}

impl InMemoryRoster {
    pub fn new(students: Vec<Student>) -> Self {
        Self {
            students: Arc::new(students),
        }
    }
}

#[async_trait]
impl RosterProvider for InMemoryRoster {
    async fn fetch_roster(&self) -> Result<Vec<Student>> {
        Ok(self.students.as_ref().clone())
    }
}

/// Messaging gateway that records every message instead of sending it.
#[derive(Default, Clone)]
pub struct RecordingGateway {
    sent: Arc<RwLock<Vec<(String, String)>>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(recipient, text)` pairs in send order.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send(&self, recipient: &str, text: &str) -> Result<bool> {
        let mut sent = self.sent.write().await;
        sent.push((recipient.to_string(), text.to_string()));
        Ok(true)
    }
}

/// Audit sink keeping records in memory.
#[derive(Default, Clone)]
pub struct InMemoryAuditSink {
    records: Arc<RwLock<Vec<AuditRecord>>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, action: &str, detail: &str) -> Result<()> {
        let mut records = self.records.write().await;
        records.push(AuditRecord::now(action, detail));
        Ok(())
    }
}

/// Uploader that records what would have been uploaded.
#[derive(Default, Clone)]
pub struct RecordingUploader {
    uploads: Arc<RwLock<Vec<(PathBuf, String)>>>,
}

impl RecordingUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(local path, destination folder)` pairs in upload order.
    pub async fn uploads(&self) -> Vec<(PathBuf, String)> {
        self.uploads.read().await.clone()
    }
}

#[async_trait]
impl ColdStorageUploader for RecordingUploader {
    async fn upload(&self, local_file: &Path, destination_folder: &str) -> Result<()> {
        let mut uploads = self.uploads.write().await;
        uploads.push((local_file.to_path_buf(), destination_folder.to_string()));
        Ok(())
    }
}

/// Uploader that discards everything.
pub struct NoopUploader;

#[async_trait]
impl ColdStorageUploader for NoopUploader {
    async fn upload(&self, _local_file: &Path, _destination_folder: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::{PaymentEvent, PaymentMethod, PaymentStatus};
    use rust_decimal_macros::dec;

    fn entry(tx: &str) -> LedgerEntry {
        let event = PaymentEvent {
            transaction_id: tx.to_string(),
            status: PaymentStatus::Success,
            method: PaymentMethod::Pix,
            amount: Some(dec!(50)),
            payer_name: "maria silva".to_string(),
            payer_contact: None,
        };
        LedgerEntry::from_event(&event, None)
    }

    #[tokio::test]
    async fn test_in_memory_ledger_dedup() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.append(entry("T1")).await.unwrap(), AppendOutcome::Appended);
        assert_eq!(
            ledger.append(entry("T1")).await.unwrap(),
            AppendOutcome::DuplicateSkipped
        );
        assert_eq!(ledger.entries().await.len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_ledger_backup_uploads_snapshot() {
        let ledger = InMemoryLedger::new();
        ledger.append(entry("T1")).await.unwrap();

        let uploader = RecordingUploader::new();
        ledger.backup(&uploader, "folder-id").await.unwrap();

        let uploads = uploader.uploads().await;
        assert_eq!(uploads.len(), 1);
        let name = uploads[0].0.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("pagamentos_backup_"));
        assert_eq!(uploads[0].1, "folder-id");
    }

    #[tokio::test]
    async fn test_recording_gateway_keeps_order() {
        let gateway = RecordingGateway::new();
        gateway.send("+551", "first").await.unwrap();
        gateway.send("+552", "second").await.unwrap();

        let sent = gateway.sent().await;
        assert_eq!(sent[0], ("+551".to_string(), "first".to_string()));
        assert_eq!(sent[1], ("+552".to_string(), "second".to_string()));
    }
}
