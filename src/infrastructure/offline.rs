//! Stand-in collaborators for `--offline` runs: notifications and audit
//! records go to the log, uploads are skipped.

use crate::domain::ports::{AuditSink, ColdStorageUploader, MessagingGateway};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub struct LoggingGateway;

#[async_trait]
impl MessagingGateway for LoggingGateway {
    async fn send(&self, recipient: &str, text: &str) -> Result<bool> {
        tracing::info!(recipient, text, "notification (offline)");
        Ok(true)
    }
}

pub struct LoggingAuditSink;

#[async_trait]
impl AuditSink for LoggingAuditSink {
    async fn record(&self, action: &str, detail: &str) -> Result<()> {
        tracing::info!(action, detail, "audit record (offline)");
        Ok(())
    }
}

pub struct SkippingUploader;

#[async_trait]
impl ColdStorageUploader for SkippingUploader {
    async fn upload(&self, local_file: &Path, _destination_folder: &str) -> Result<()> {
        tracing::debug!(file = %local_file.display(), "skipping upload (offline)");
        Ok(())
    }
}
