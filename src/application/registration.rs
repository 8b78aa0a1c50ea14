use crate::application::audit::AuditLog;
use crate::application::dispatcher::NotificationDispatcher;
use crate::application::messages::{
    AUDIT_REGISTRATION_CONFIRMED, operator_classifier_error, operator_registration_confirmed,
    operator_roster_error,
};
use crate::domain::ports::{
    AuditSinkHandle, ConfirmationClassifierHandle, MessagingGatewayHandle, RosterProviderHandle,
};
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RegistrationOutcome {
    /// Empty text, negative classification, or a contact unknown to the
    /// roster.
    Ignored,
    /// The message confirmed enrollment and the student was found by
    /// contact; the operator was notified.
    Confirmed,
    ClassifierUnavailable,
    RosterUnavailable,
}

impl fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RegistrationOutcome::Ignored => "ignored",
            RegistrationOutcome::Confirmed => "confirmed",
            RegistrationOutcome::ClassifierUnavailable => "classifier unavailable",
            RegistrationOutcome::RosterUnavailable => "roster unavailable",
        };
        f.write_str(text)
    }
}

/// Sibling workflow to the payment reconciliation: students announce over
/// the messaging channel that they filled in the enrollment form, and a
/// classifier decides whether a free-text message is such a confirmation.
pub struct RegistrationWorkflow {
    classifier: ConfirmationClassifierHandle,
    roster: RosterProviderHandle,
    dispatcher: NotificationDispatcher,
    audit: AuditLog,
    operator_contact: String,
}

impl RegistrationWorkflow {
    pub fn new(
        classifier: ConfirmationClassifierHandle,
        roster: RosterProviderHandle,
        gateway: MessagingGatewayHandle,
        audit_sink: AuditSinkHandle,
        operator_contact: String,
    ) -> Self {
        let dispatcher = NotificationDispatcher::new(gateway.clone(), audit_sink.clone());
        let audit = AuditLog::new(audit_sink, gateway, operator_contact.clone());
        Self {
            classifier,
            roster,
            dispatcher,
            audit,
            operator_contact,
        }
    }

    pub async fn confirm(&self, message_text: &str, from_contact: &str) -> RegistrationOutcome {
        if message_text.is_empty() {
            return RegistrationOutcome::Ignored;
        }

        // The classifier prompt treats the message as data; keep the input
        // ASCII-only so it cannot smuggle instructions past the prompt.
        let sanitized: String = message_text.chars().filter(char::is_ascii).collect();

        let confirmed = match self.classifier.classify(&sanitized).await {
            Ok(confirmed) => confirmed,
            Err(e) => {
                tracing::warn!(error = %e, "confirmation classifier failed");
                self.dispatcher
                    .send(&self.operator_contact, &operator_classifier_error(&e.to_string()))
                    .await;
                return RegistrationOutcome::ClassifierUnavailable;
            }
        };
        if !confirmed {
            return RegistrationOutcome::Ignored;
        }

        let roster = match self.roster.fetch_roster().await {
            Ok(roster) => roster,
            Err(e) => {
                tracing::error!(error = %e, "roster fetch failed");
                self.dispatcher
                    .send(&self.operator_contact, &operator_roster_error(&e.to_string()))
                    .await;
                return RegistrationOutcome::RosterUnavailable;
            }
        };

        match roster.iter().find(|s| s.contact == from_contact) {
            Some(student) => {
                self.dispatcher
                    .send(
                        &self.operator_contact,
                        &operator_registration_confirmed(student),
                    )
                    .await;
                self.audit
                    .record(AUDIT_REGISTRATION_CONFIRMED, &student.name)
                    .await;
                RegistrationOutcome::Confirmed
            }
            None => {
                tracing::info!(from = from_contact, "confirmation from unknown contact");
                RegistrationOutcome::Ignored
            }
        }
    }
}
