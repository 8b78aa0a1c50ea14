use crate::domain::ports::RosterProvider;
use crate::domain::student::{EnrollmentStatus, Student};
use crate::error::{ReconcileError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Roster provider reading a local CSV file with the same columns as the
/// secretariat sheet (`Nome,Email,WhatsApp,Status,Livro`). Used for offline
/// runs; the file is re-read on every fetch so edits between events are
/// picked up, matching the no-cache contract.
pub struct CsvRosterProvider {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Nome")]
    name: String,
    #[serde(rename = "Email", default)]
    email: String,
    #[serde(rename = "WhatsApp")]
    contact: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Livro", default)]
    book: String,
}

impl CsvRosterProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl RosterProvider for CsvRosterProvider {
    async fn fetch_roster(&self) -> Result<Vec<Student>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| ReconcileError::RosterUnavailable(e.to_string()))?;

        let mut students = Vec::new();
        for row in reader.deserialize::<RosterRow>() {
            let row = row.map_err(|e| ReconcileError::RosterUnavailable(e.to_string()))?;
            students.push(Student {
                name: row.name,
                email: row.email,
                contact: row.contact,
                status: EnrollmentStatus::from_label(&row.status),
                book: row.book,
            });
        }
        Ok(students)
    }
}
