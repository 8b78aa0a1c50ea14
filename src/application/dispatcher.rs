use crate::application::messages::AUDIT_SEND_FAILED;
use crate::domain::ports::{AuditSinkHandle, MessagingGatewayHandle};

/// Best-effort outbound messaging.
///
/// Notification delivery is subordinate to ledger durability: a transport
/// failure is recorded in the audit log and swallowed, never surfaced to the
/// reconciliation path.
#[derive(Clone)]
pub struct NotificationDispatcher {
    gateway: MessagingGatewayHandle,
    audit: AuditSinkHandle,
}

impl NotificationDispatcher {
    pub fn new(gateway: MessagingGatewayHandle, audit: AuditSinkHandle) -> Self {
        Self { gateway, audit }
    }

    /// Sends a message, returning whether the transport accepted it.
    pub async fn send(&self, recipient: &str, text: &str) -> bool {
        match self.gateway.send(recipient, text).await {
            Ok(accepted) => {
                if !accepted {
                    tracing::warn!(recipient, "transport rejected message");
                }
                accepted
            }
            Err(e) => {
                tracing::warn!(recipient, error = %e, "message send failed");
                let _ = self
                    .audit
                    .record(AUDIT_SEND_FAILED, &format!("{recipient}: {e}"))
                    .await;
                false
            }
        }
    }
}
