use crate::domain::ledger::{LEDGER_HEADER, LedgerEntry};
use crate::domain::ports::{AppendOutcome, ColdStorageUploader, LedgerStore};
use crate::error::Result;
use async_trait::async_trait;
use chrono::Local;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// File-backed ledger store.
///
/// The on-disk format is the historical one: a literal header row, then one
/// record per payment with the transaction id in the last column. The
/// duplicate check scans that column over the whole file on every append;
/// linear, but well within budget at the expected volume. An id index is
/// the natural upgrade if volume grows.
pub struct CsvLedgerStore {
    path: PathBuf,
    /// Held across the duplicate scan and the write, so two near
    /// simultaneous redeliveries of one transaction id cannot both append.
    lock: Mutex<()>,
}

impl CsvLedgerStore {
    /// Opens the store at `path`, creating the file with its header row if
    /// it does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(LEDGER_HEADER)?;
            writer.flush()?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn contains_transaction(&self, transaction_id: &str) -> Result<bool> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        for record in reader.records() {
            let record = record?;
            if record.iter().last() == Some(transaction_id) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl LedgerStore for CsvLedgerStore {
    async fn append(&self, entry: LedgerEntry) -> Result<AppendOutcome> {
        let _guard = self.lock.lock().await;

        if self.contains_transaction(&entry.transaction_id)? {
            return Ok(AppendOutcome::DuplicateSkipped);
        }

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(&entry)?;
        writer.flush()?;
        Ok(AppendOutcome::Appended)
    }

    async fn backup(&self, uploader: &dyn ColdStorageUploader, folder: &str) -> Result<()> {
        // Copy under the lock for a consistent snapshot, upload outside it.
        let backup_path = {
            let _guard = self.lock.lock().await;
            let stamp = Local::now().format("%Y%m%d_%H%M%S");
            let backup_path = std::env::temp_dir().join(format!("pagamentos_backup_{stamp}.csv"));
            std::fs::copy(&self.path, &backup_path)?;
            backup_path
        };

        let result = uploader.upload(&backup_path, folder).await;
        std::fs::remove_file(&backup_path).ok();
        result
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
            payer_contact: Some("+5511999990000".to_string()),
        };
        LedgerEntry::from_event(&event, None)
    }

    #[tokio::test]
    async fn test_open_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagamentos.csv");

        let _store = CsvLedgerStore::open(&path).unwrap();
        let _store = CsvLedgerStore::open(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert_eq!(
            contents.lines().next().unwrap(),
            "Data,Nome,WhatsApp,Valor,Status,Livro,TransactionID"
        );
    }

    #[tokio::test]
    async fn test_append_then_duplicate_skip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvLedgerStore::open(dir.path().join("pagamentos.csv")).unwrap();

        assert_eq!(store.append(entry("T1")).await.unwrap(), AppendOutcome::Appended);
        assert_eq!(
            store.append(entry("T1")).await.unwrap(),
            AppendOutcome::DuplicateSkipped
        );
        assert_eq!(store.append(entry("T2")).await.unwrap(), AppendOutcome::Appended);

        let contents = std::fs::read_to_string(store.path()).unwrap();
        // header + two rows
        assert_eq!(contents.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagamentos.csv");

        let store = CsvLedgerStore::open(&path).unwrap();
        store.append(entry("T1")).await.unwrap();
        drop(store);

        let store = CsvLedgerStore::open(&path).unwrap();
        assert_eq!(
            store.append(entry("T1")).await.unwrap(),
            AppendOutcome::DuplicateSkipped
        );
    }
}
