use crate::application::audit::AuditLog;
use crate::application::dispatcher::NotificationDispatcher;
use crate::application::messages::{
    AUDIT_CONFIRMED_ACTIVE, AUDIT_CONFIRMED_INACTIVE, AUDIT_ENROLLMENT_REQUEST, PAYMENT_CONFIRMED,
    WELCOME_BACK, enrollment_request, operator_backup_error, operator_ledger_error,
    operator_payment_active, operator_payment_inactive, operator_roster_error,
};
use crate::domain::ledger::LedgerEntry;
use crate::domain::matcher;
use crate::domain::payment::PaymentEvent;
use crate::domain::ports::{
    AppendOutcome, AuditSinkHandle, ColdStorageUploaderHandle, LedgerStoreHandle,
    MessagingGatewayHandle, RosterProviderHandle,
};
use crate::domain::student::EnrollmentStatus;
use std::fmt;

/// Result of reconciling one payment event.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
    /// Not a settled PIX payment; nothing was done.
    Ignored,
    /// The roster snapshot could not be fetched; the operator was notified
    /// and no ledger or audit writes happened.
    RosterUnavailable,
    /// Payer matched an active student.
    ConfirmedActive,
    /// Payer matched an inactive student.
    ConfirmedInactive,
    /// Payer matched no roster entry; they were asked to enroll.
    EnrollmentRequested,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Outcome::Ignored => "ignored",
            Outcome::RosterUnavailable => "roster unavailable",
            Outcome::ConfirmedActive => "confirmed (ativo)",
            Outcome::ConfirmedInactive => "confirmed (inativo)",
            Outcome::EnrollmentRequested => "enrollment requested",
        };
        f.write_str(text)
    }
}

/// Runtime settings the engine needs beyond its collaborator handles.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub operator_contact: String,
    pub form_url: String,
    /// Cold-storage folder receiving ledger snapshots.
    pub backup_folder: String,
}

/// The reconciliation orchestrator.
///
/// Each event is processed synchronously to completion: fetch a fresh roster
/// snapshot, resolve the payer by fuzzy name match, append the ledger entry
/// (the store enforces dedup), branch on enrollment status for the
/// notifications, record the audit action and trigger a ledger backup.
///
/// Side effects are not transactional. A failed notification does not roll
/// back the ledger append; every failure past the roster fetch is reported
/// to the operator and the remaining steps continue.
pub struct ReconciliationEngine {
    roster: RosterProviderHandle,
    ledger: LedgerStoreHandle,
    uploader: ColdStorageUploaderHandle,
    dispatcher: NotificationDispatcher,
    audit: AuditLog,
    settings: EngineSettings,
}

impl ReconciliationEngine {
    pub fn new(
        roster: RosterProviderHandle,
        ledger: LedgerStoreHandle,
        uploader: ColdStorageUploaderHandle,
        gateway: MessagingGatewayHandle,
        audit_sink: AuditSinkHandle,
        settings: EngineSettings,
    ) -> Self {
        let dispatcher = NotificationDispatcher::new(gateway.clone(), audit_sink.clone());
        let audit = AuditLog::new(audit_sink, gateway, settings.operator_contact.clone());
        Self {
            roster,
            ledger,
            uploader,
            dispatcher,
            audit,
            settings,
        }
    }

    pub async fn reconcile(&self, event: PaymentEvent) -> Outcome {
        if !event.is_reconcilable() {
            tracing::debug!(tx = %event.transaction_id, "not a settled PIX payment, ignoring");
            return Outcome::Ignored;
        }
        tracing::info!(tx = %event.transaction_id, payer = %event.payer_name, "reconciling payment");

        let roster = match self.roster.fetch_roster().await {
            Ok(roster) => roster,
            Err(e) => {
                tracing::error!(error = %e, "roster fetch failed");
                self.dispatcher
                    .send(
                        &self.settings.operator_contact,
                        &operator_roster_error(&e.to_string()),
                    )
                    .await;
                return Outcome::RosterUnavailable;
            }
        };

        let student = matcher::resolve(&event.payer_name, &roster);

        let entry = LedgerEntry::from_event(&event, student);
        match self.ledger.append(entry).await {
            Ok(AppendOutcome::Appended) => {}
            Ok(AppendOutcome::DuplicateSkipped) => {
                // Redelivery: the ledger is already settled, but the
                // notification branch below still runs. Only the ledger is
                // deduplicated.
                tracing::info!(tx = %event.transaction_id, "duplicate transaction id, ledger unchanged");
            }
            Err(e) => {
                tracing::error!(error = %e, "ledger append failed");
                self.dispatcher
                    .send(
                        &self.settings.operator_contact,
                        &operator_ledger_error(&e.to_string()),
                    )
                    .await;
            }
        }

        let outcome = match student {
            Some(student) if student.status == EnrollmentStatus::Active => {
                self.dispatcher.send(&student.contact, PAYMENT_CONFIRMED).await;
                self.dispatcher
                    .send(
                        &self.settings.operator_contact,
                        &operator_payment_active(student),
                    )
                    .await;
                self.audit.record(AUDIT_CONFIRMED_ACTIVE, &student.name).await;
                Outcome::ConfirmedActive
            }
            Some(student) => {
                self.dispatcher.send(&student.contact, WELCOME_BACK).await;
                self.dispatcher
                    .send(
                        &self.settings.operator_contact,
                        &operator_payment_inactive(student),
                    )
                    .await;
                self.audit
                    .record(AUDIT_CONFIRMED_INACTIVE, &student.name)
                    .await;
                Outcome::ConfirmedInactive
            }
            None => {
                // The notifier does not always include a sender phone; with
                // no roster entry there is nothing else to fall back to.
                let recipient = event.payer_contact.as_deref().unwrap_or_default();
                self.dispatcher
                    .send(recipient, &enrollment_request(&self.settings.form_url))
                    .await;
                self.audit
                    .record(AUDIT_ENROLLMENT_REQUEST, &event.payer_name)
                    .await;
                Outcome::EnrollmentRequested
            }
        };

        self.backup_ledger().await;
        outcome
    }

    /// Snapshots the ledger to cold storage. Failures are reported to the
    /// operator and swallowed; backups are redundant with the next one.
    pub async fn backup_ledger(&self) {
        if let Err(e) = self
            .ledger
            .backup(self.uploader.as_ref(), &self.settings.backup_folder)
            .await
        {
            tracing::warn!(error = %e, "ledger backup failed");
            self.dispatcher
                .send(
                    &self.settings.operator_contact,
                    &operator_backup_error(&e.to_string()),
                )
                .await;
        }
    }
}
