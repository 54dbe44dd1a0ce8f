use thiserror::Error;

/// Failure of a table operation. The table is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// `insert` of a key that is already present.
    #[error("HashTable already contains {key} key!")]
    DuplicateKey { key: String },
    /// `get` or `delete` of a key that is absent.
    #[error("HashTable doesn't contain a {key} key!")]
    KeyNotFound { key: String },
}

impl TableError {
    pub(crate) fn duplicate<Q: ?Sized + core::fmt::Display>(key: &Q) -> Self {
        TableError::DuplicateKey {
            key: key.to_string(),
        }
    }

    pub(crate) fn not_found<Q: ?Sized + core::fmt::Display>(key: &Q) -> Self {
        TableError::KeyNotFound {
            key: key.to_string(),
        }
    }

    /// Canonical text of the key the operation failed on.
    pub fn key(&self) -> &str {
        match self {
            TableError::DuplicateKey { key } | TableError::KeyNotFound { key } => key,
        }
    }
}

pub type Result<T> = core::result::Result<T, TableError>;
