use crate::error::{ReconcileError, Result};
use serde::Deserialize;
use std::io::BufRead;

/// An inbound free-text message that may confirm an enrollment.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ConfirmationMessage {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub from: String,
}

/// Reads confirmation messages from a JSON-lines source, one
/// `Result<ConfirmationMessage>` per non-empty line.
pub struct ConfirmationReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> ConfirmationReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn messages(self) -> impl Iterator<Item = Result<ConfirmationMessage>> {
        self.source.lines().filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(serde_json::from_str(&line).map_err(ReconcileError::from)),
            Err(e) => Some(Err(e.into())),
        })
    }
}
