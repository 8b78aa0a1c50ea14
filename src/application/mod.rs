//! Application layer orchestrating the reconciliation workflow.
//!
//! `ReconciliationEngine` is the primary entry point: one payment event in,
//! one outcome out, with the ledger, notifications and audit log driven
//! along the way. The sibling registration-confirmation workflow and the
//! receipt pass-through live here as well.

pub mod audit;
pub mod dispatcher;
pub mod engine;
pub mod messages;
pub mod receipts;
pub mod registration;
