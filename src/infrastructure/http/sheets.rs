use crate::domain::audit::AuditRecord;
use crate::domain::ports::{AuditSink, RosterProvider};
use crate::domain::student::{EnrollmentStatus, Student};
use crate::error::{ReconcileError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Roster tab: Nome, Email, WhatsApp, Status, Livro.
const ROSTER_RANGE: &str = "Alunos!A:E";
/// Audit tab: timestamp, action, detail.
const LOG_RANGE: &str = "Logs!A:C";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Student roster backed by the secretariat spreadsheet.
pub struct SheetsRoster {
    client: reqwest::Client,
    sheet_id: String,
    token: String,
}

impl SheetsRoster {
    pub fn new(client: reqwest::Client, sheet_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            sheet_id: sheet_id.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl RosterProvider for SheetsRoster {
    async fn fetch_roster(&self) -> Result<Vec<Student>> {
        let url = format!("{SHEETS_API}/{}/values/{ROSTER_RANGE}", self.sheet_id);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ReconcileError::RosterUnavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ReconcileError::RosterUnavailable(format!(
                "sheets API returned {}",
                response.status()
            )));
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| ReconcileError::RosterUnavailable(e.to_string()))?;

        // First row is the header. Short rows are padded with empty cells
        // rather than rejected; the sheet is hand-maintained.
        let students = range
            .values
            .into_iter()
            .skip(1)
            .map(|row| Student {
                name: cell(&row, 0),
                email: cell(&row, 1),
                contact: cell(&row, 2),
                status: EnrollmentStatus::from_label(&cell(&row, 3)),
                book: cell(&row, 4),
            })
            .collect();
        Ok(students)
    }
}

fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

/// Audit sink appending to the log tab of the same spreadsheet.
pub struct SheetsAuditSink {
    client: reqwest::Client,
    sheet_id: String,
    token: String,
}

impl SheetsAuditSink {
    pub fn new(client: reqwest::Client, sheet_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            sheet_id: sheet_id.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl AuditSink for SheetsAuditSink {
    async fn record(&self, action: &str, detail: &str) -> Result<()> {
        let record = AuditRecord::now(action, detail);
        let url = format!(
            "{SHEETS_API}/{}/values/{LOG_RANGE}:append?valueInputOption=USER_ENTERED",
            self.sheet_id
        );
        let body = json!({
            "values": [[record.recorded_at_iso(), record.action, record.detail]]
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReconcileError::Audit(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ReconcileError::Audit(format!(
                "sheets append returned {}",
                response.status()
            )))
        }
    }
}
