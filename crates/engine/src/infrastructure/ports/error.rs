//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Compare-and-swap failed: the stored record changed since it was read.
    #[error("{entity_type} {id} was modified concurrently (expected version {expected}, found {found})")]
    Conflict {
        entity_type: &'static str,
        id: String,
        expected: u64,
        found: u64,
    },

    /// Storage operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Conflict error for a failed version check.
    pub fn conflict(entity_type: &'static str, id: impl ToString, expected: u64, found: u64) -> Self {
        Self::Conflict {
            entity_type,
            id: id.to_string(),
            expected,
            found,
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Blob store errors (portrait images).
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// The reference does not point into this store.
    #[error("Unknown blob reference: {0}")]
    InvalidReference(String),

    /// Filesystem operation failed.
    #[error("Blob I/O error in {operation}: {message}")]
    Io {
        operation: &'static str,
        message: String,
    },
}

impl BlobError {
    pub fn io(operation: &'static str, error: impl ToString) -> Self {
        Self::Io {
            operation,
            message: error.to_string(),
        }
    }
}
