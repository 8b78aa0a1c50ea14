use crate::application::messages::operator_audit_error;
use crate::domain::ports::{AuditSinkHandle, MessagingGatewayHandle};

/// Audit logging that never breaks the primary path.
///
/// A failing sink is reported to the operator contact instead of
/// propagating; the operator message itself is best-effort.
#[derive(Clone)]
pub struct AuditLog {
    sink: AuditSinkHandle,
    gateway: MessagingGatewayHandle,
    operator_contact: String,
}

impl AuditLog {
    pub fn new(
        sink: AuditSinkHandle,
        gateway: MessagingGatewayHandle,
        operator_contact: String,
    ) -> Self {
        Self {
            sink,
            gateway,
            operator_contact,
        }
    }

    pub async fn record(&self, action: &str, detail: &str) {
        if let Err(e) = self.sink.record(action, detail).await {
            tracing::warn!(action, error = %e, "audit append failed");
            let _ = self
                .gateway
                .send(&self.operator_contact, &operator_audit_error(&e.to_string()))
                .await;
        }
    }
}
