use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Failure taxonomy for the reconciliation service.
///
/// Only `RosterUnavailable` aborts a reconciliation; every other failure is
/// caught at its call site, reported to the operator contact, and the
/// remaining steps continue. A redelivered transaction id is not an error at
/// all (see `AppendOutcome::DuplicateSkipped`).
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("roster unavailable: {0}")]
    RosterUnavailable(String),
    #[error("messaging gateway error: {0}")]
    Gateway(String),
    #[error("cold storage upload failed: {0}")]
    Upload(String),
    #[error("classifier unavailable: {0}")]
    Classifier(String),
    #[error("audit sink error: {0}")]
    Audit(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
