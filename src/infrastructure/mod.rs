//! Adapters implementing the domain ports: the file-backed ledger, a
//! CSV roster for offline runs, in-memory stores for tests and small
//! deployments, and the live HTTP collaborators.

pub mod csv_ledger;
pub mod csv_roster;
pub mod http;
pub mod in_memory;
pub mod offline;
