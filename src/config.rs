//! Environment-backed configuration, loaded once at startup.
//!
//! The resulting `Settings` value is passed explicitly into the constructors
//! that need it; nothing in the crate reads the environment after
//! initialization.

use crate::error::{ReconcileError, Result};
use std::path::PathBuf;

pub const DEFAULT_GATEWAY_URL: &str = "http://evolution-api-url:8080";
pub const DEFAULT_OPERATOR_CONTACT: &str = "+556392261578";
pub const DEFAULT_FORM_URL: &str = "https://admissaoprv.com.br/ensino/";
pub const DEFAULT_LEDGER_PATH: &str = "pagamentos.csv";

/// Connection and routing settings for the live collaborators.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the messaging gateway.
    pub gateway_url: String,
    /// API key sent with every gateway request.
    pub gateway_api_key: String,
    /// Spreadsheet holding the student roster and the audit log tab.
    pub sheet_id: String,
    /// Bearer token for the spreadsheet and cold-storage APIs.
    pub google_token: String,
    /// Cold-storage folder receiving ledger backups and receipts.
    pub drive_folder_id: String,
    /// API key for the confirmation classifier.
    pub classifier_api_key: String,
    /// Contact identifier that receives operator notifications.
    pub operator_contact: String,
    /// Enrollment form link included in the "registration required" message.
    pub form_url: String,
    /// Path of the primary ledger CSV file.
    pub ledger_path: PathBuf,
}

impl Settings {
    /// Reads settings from the process environment, preloading a `.env` file
    /// if one is present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Ok(Self {
            gateway_url: env_or("EVOLUTION_API_URL", DEFAULT_GATEWAY_URL),
            gateway_api_key: require("EVOLUTION_API_KEY")?,
            sheet_id: require("GOOGLE_SHEET_ID")?,
            google_token: require("GOOGLE_API_TOKEN")?,
            drive_folder_id: require("GOOGLE_DRIVE_FOLDER_ID")?,
            classifier_api_key: require("XAI_API_KEY")?,
            operator_contact: env_or("OPERATOR_CONTACT", DEFAULT_OPERATOR_CONTACT),
            form_url: env_or("FORM_URL", DEFAULT_FORM_URL),
            ledger_path: env_or("LEDGER_PATH", DEFAULT_LEDGER_PATH).into(),
        })
    }
}

fn require(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| ReconcileError::Config(format!("{key} must be set")))
}

pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_to_default() {
        assert_eq!(env_or("PIX_RECONCILER_UNSET_VAR", "fallback"), "fallback");
    }

    #[test]
    fn test_require_reports_missing_key() {
        let err = require("PIX_RECONCILER_UNSET_VAR").unwrap_err();
        assert!(matches!(err, ReconcileError::Config(_)));
        assert!(err.to_string().contains("PIX_RECONCILER_UNSET_VAR"));
    }
}
