//! Draft persistence error types.

use std::path::PathBuf;

/// Errors that can occur while writing or deleting the saved draft.
///
/// Read-side problems (missing file, corrupt JSON) are intentionally not
/// errors: the store treats them as "no draft" and heals itself.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    /// Failed to create the directory holding the draft file
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the draft file
    #[error("Failed to save draft to {path}: {source}")]
    SaveFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to delete the draft file
    #[error("Failed to clear draft at {path}: {source}")]
    ClearFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to serialize the draft payload
    #[error("Failed to serialize draft: {0}")]
    SerializationFailed(String),
}
