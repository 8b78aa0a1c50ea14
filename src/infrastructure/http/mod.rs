//! Live HTTP collaborators. Thin wrappers over network calls: no retries,
//! no timeouts beyond the client's defaults; a failed call is terminal for
//! that attempt and recovery relies on upstream redelivery.

pub mod classifier;
pub mod drive;
pub mod gateway;
pub mod sheets;
