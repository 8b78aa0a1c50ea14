//! Receipt pass-through: media received over the messaging channel is
//! written to a scratch file and handed to cold storage unchanged. No
//! further workflow hangs off it.

use crate::application::audit::AuditLog;
use crate::application::messages::AUDIT_RECEIPT_STORED;
use crate::domain::ports::ColdStorageUploader;
use crate::error::Result;
use chrono::Local;

pub async fn archive_receipt(
    uploader: &dyn ColdStorageUploader,
    folder: &str,
    audit: &AuditLog,
    bytes: &[u8],
    mimetype: &str,
    from_contact: &str,
) -> Result<()> {
    let extension = if mimetype.contains("pdf") { "pdf" } else { "jpg" };
    let file_name = format!(
        "comprovante_{}_{}.{}",
        from_contact,
        Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f"),
        extension
    );

    let dir = tempfile::tempdir()?;
    let path = dir.path().join(&file_name);
    std::fs::write(&path, bytes)?;

    uploader.upload(&path, folder).await?;
    audit.record(AUDIT_RECEIPT_STORED, from_contact).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::{
        InMemoryAuditSink, RecordingGateway, RecordingUploader,
    };
    use std::sync::Arc;

    #[tokio::test]
    async fn test_receipt_is_uploaded_and_audited() {
        let uploader = RecordingUploader::new();
        let audit_sink = Arc::new(InMemoryAuditSink::new());
        let audit = AuditLog::new(
            audit_sink.clone(),
            Arc::new(RecordingGateway::new()),
            "+550000000000".to_string(),
        );

        archive_receipt(
            &uploader,
            "folder-id",
            &audit,
            b"%PDF-1.4",
            "application/pdf",
            "+5511999990000",
        )
        .await
        .unwrap();

        let uploads = uploader.uploads().await;
        assert_eq!(uploads.len(), 1);
        let name = uploads[0].0.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("comprovante_+5511999990000_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(uploads[0].1, "folder-id");

        let records = audit_sink.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].action, AUDIT_RECEIPT_STORED);
        assert_eq!(records[0].detail, "+5511999990000");
    }

    #[tokio::test]
    async fn test_non_pdf_media_gets_jpg_extension() {
        let uploader = RecordingUploader::new();
        let audit_sink = Arc::new(InMemoryAuditSink::new());
        let audit = AuditLog::new(
            audit_sink,
            Arc::new(RecordingGateway::new()),
            "+550000000000".to_string(),
        );

        archive_receipt(&uploader, "folder-id", &audit, b"\xff\xd8", "image/jpeg", "+551")
            .await
            .unwrap();

        let uploads = uploader.uploads().await;
        let name = uploads[0].0.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with(".jpg"));
    }
}
