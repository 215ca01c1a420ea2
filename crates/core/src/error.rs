use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a scan before any walking happens. Everything that
/// goes wrong mid-walk is recorded in `Report.errors` instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("scan root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("scan root is not a directory: {0}")]
    NotADirectory(PathBuf),
}
