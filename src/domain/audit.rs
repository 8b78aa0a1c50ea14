use chrono::{Local, NaiveDateTime};

/// A single diagnostic log line.
///
/// Unlike the ledger there is no uniqueness constraint here; a retried
/// operation recording the same action twice is acceptable.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub recorded_at: NaiveDateTime,
    pub action: String,
    pub detail: String,
}

impl AuditRecord {
    pub fn now(action: &str, detail: &str) -> Self {
        Self {
            recorded_at: Local::now().naive_local(),
            action: action.to_string(),
            detail: detail.to_string(),
        }
    }

    /// ISO-8601 timestamp, the format the historical log sheet uses.
    pub fn recorded_at_iso(&self) -> String {
        self.recorded_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}
