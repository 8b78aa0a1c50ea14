mod common;

use common::{FORM_URL, OPERATOR, pix_event, student};
use async_trait::async_trait;
use pix_reconciler::application::engine::{EngineSettings, Outcome, ReconciliationEngine};
use pix_reconciler::application::messages::{
    AUDIT_CONFIRMED_ACTIVE, AUDIT_CONFIRMED_INACTIVE, AUDIT_ENROLLMENT_REQUEST, AUDIT_SEND_FAILED,
    PAYMENT_CONFIRMED, WELCOME_BACK,
};
use pix_reconciler::domain::ledger::UNENROLLED_LABEL;
use pix_reconciler::domain::ports::MessagingGateway;
use pix_reconciler::domain::student::{EnrollmentStatus, Student};
use pix_reconciler::error::{ReconcileError, Result};
use pix_reconciler::infrastructure::in_memory::{
    InMemoryAuditSink, InMemoryLedger, InMemoryRoster, NoopUploader, RecordingGateway,
};
use std::sync::Arc;

struct Fixture {
    engine: ReconciliationEngine,
    ledger: Arc<InMemoryLedger>,
    gateway: Arc<RecordingGateway>,
    audit: Arc<InMemoryAuditSink>,
}

fn fixture(roster: Vec<Student>) -> Fixture {
    let ledger = Arc::new(InMemoryLedger::new());
    let gateway = Arc::new(RecordingGateway::new());
    let audit = Arc::new(InMemoryAuditSink::new());
    let engine = ReconciliationEngine::new(
        Arc::new(InMemoryRoster::new(roster)),
        ledger.clone(),
        Arc::new(NoopUploader),
        gateway.clone(),
        audit.clone(),
        EngineSettings {
            operator_contact: OPERATOR.to_string(),
            form_url: FORM_URL.to_string(),
            backup_folder: "backups".to_string(),
        },
    );
    Fixture {
        engine,
        ledger,
        gateway,
        audit,
    }
}

#[tokio::test]
async fn test_active_student_payment() {
    let fx = fixture(vec![student(
        "Maria Silva",
        "+5511888880000",
        EnrollmentStatus::Active,
        "Livro X",
    )]);

    let outcome = fx.engine.reconcile(pix_event("maria silva", "T1")).await;
    assert_eq!(outcome, Outcome::ConfirmedActive);

    let entries = fx.ledger.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status_label, "ATIVO");
    assert_eq!(entries[0].book_label, "Livro X");
    assert_eq!(entries[0].contact, "+5511888880000");
    assert_eq!(entries[0].transaction_id, "T1");

    let sent = fx.gateway.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], ("+5511888880000".to_string(), PAYMENT_CONFIRMED.to_string()));
    assert_eq!(sent[1].0, OPERATOR);
    assert!(sent[1].1.contains("Maria Silva"));
    assert!(sent[1].1.contains("Livro X"));

    let records = fx.audit.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action, AUDIT_CONFIRMED_ACTIVE);
    assert_eq!(records[0].detail, "Maria Silva");
}

#[tokio::test]
async fn test_inactive_student_gets_welcome_back() {
    let fx = fixture(vec![student(
        "Maria Silva",
        "+5511888880000",
        EnrollmentStatus::Inactive,
        "Livro X",
    )]);

    let outcome = fx.engine.reconcile(pix_event("maria silva", "T1")).await;
    assert_eq!(outcome, Outcome::ConfirmedInactive);

    let entries = fx.ledger.entries().await;
    assert_eq!(entries[0].status_label, "INATIVO");

    let sent = fx.gateway.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].1, WELCOME_BACK);
    assert!(sent[1].1.contains("INATIVA"));

    let records = fx.audit.records().await;
    assert_eq!(records[0].action, AUDIT_CONFIRMED_INACTIVE);
}

#[tokio::test]
async fn test_unmatched_payer_is_asked_to_enroll() {
    let fx = fixture(vec![student(
        "Maria Silva",
        "+5511888880000",
        EnrollmentStatus::Active,
        "Livro X",
    )]);

    let outcome = fx.engine.reconcile(pix_event("Pedro Souza", "T9")).await;
    assert_eq!(outcome, Outcome::EnrollmentRequested);

    let entries = fx.ledger.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status_label, UNENROLLED_LABEL);
    assert_eq!(entries[0].book_label, "");
    assert_eq!(entries[0].contact, "+5511999990000");

    // one message only, to the payer, with the enrollment form link
    let sent = fx.gateway.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+5511999990000");
    assert!(sent[0].1.contains(FORM_URL));

    let records = fx.audit.records().await;
    assert_eq!(records[0].action, AUDIT_ENROLLMENT_REQUEST);
    assert_eq!(records[0].detail, "Pedro Souza");
}

#[tokio::test]
async fn test_redelivery_deduplicates_ledger_only() {
    let fx = fixture(vec![student(
        "Maria Silva",
        "+5511888880000",
        EnrollmentStatus::Active,
        "Livro X",
    )]);

    let first = fx.engine.reconcile(pix_event("maria silva", "T1")).await;
    let second = fx.engine.reconcile(pix_event("maria silva", "T1")).await;
    assert_eq!(first, Outcome::ConfirmedActive);
    assert_eq!(second, Outcome::ConfirmedActive);

    // the ledger is idempotent under redelivery
    assert_eq!(fx.ledger.entries().await.len(), 1);

    // notifications are not deduplicated; both deliveries messaged
    assert_eq!(fx.gateway.sent().await.len(), 4);
    assert_eq!(fx.audit.records().await.len(), 2);
}

struct RejectingGateway;

#[async_trait]
impl MessagingGateway for RejectingGateway {
    async fn send(&self, _recipient: &str, _text: &str) -> Result<bool> {
        Err(ReconcileError::Gateway("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_send_failures_do_not_abort_reconciliation() {
    let ledger = Arc::new(InMemoryLedger::new());
    let audit = Arc::new(InMemoryAuditSink::new());
    let engine = ReconciliationEngine::new(
        Arc::new(InMemoryRoster::new(vec![student(
            "Maria Silva",
            "+5511888880000",
            EnrollmentStatus::Active,
            "Livro X",
        )])),
        ledger.clone(),
        Arc::new(NoopUploader),
        Arc::new(RejectingGateway),
        audit.clone(),
        EngineSettings {
            operator_contact: OPERATOR.to_string(),
            form_url: FORM_URL.to_string(),
            backup_folder: "backups".to_string(),
        },
    );

    let outcome = engine.reconcile(pix_event("maria silva", "T1")).await;
    assert_eq!(outcome, Outcome::ConfirmedActive);

    // the ledger append survived the dead transport
    assert_eq!(ledger.entries().await.len(), 1);

    // both failed sends were audit-logged, and the branch action still landed
    let records = audit.records().await;
    let send_failures = records
        .iter()
        .filter(|r| r.action == AUDIT_SEND_FAILED)
        .count();
    assert_eq!(send_failures, 2);
    assert!(records.iter().any(|r| r.action == AUDIT_CONFIRMED_ACTIVE));
}
