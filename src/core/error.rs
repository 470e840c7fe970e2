//! Custom error types for the application.
//!
//! Provides structured error handling with meaningful error messages
//! and proper error categorization for each domain:
//!
//! - [`FsError`] - Virtual filesystem operations
//! - [`AuthError`] - User registry operations
//! - [`StorageError`] - Snapshot persistence

use thiserror::Error;

/// Virtual filesystem errors.
///
/// Messages use the wording of coreutils so command handlers can append them
/// directly after the operand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    /// A path segment is missing
    #[error("No such file or directory")]
    NotFound,
    /// A file was found where a directory was required
    #[error("Not a directory")]
    NotADirectory,
    /// A directory was found where a file was required
    #[error("Is a directory")]
    IsADirectory,
    /// Create on an existing name
    #[error("File exists")]
    AlreadyExists,
    /// Path has no final component (the root itself)
    #[error("Invalid argument")]
    InvalidPath,
    /// Mode string rejected by `chmod`
    #[error("invalid mode: '{0}'")]
    InvalidMode(String),
    /// Copy or move onto itself
    #[error("are the same file")]
    SameFile,
    /// Copy or move of a directory into its own subtree
    #[error("cannot copy a directory into itself")]
    IntoItself,
}

/// User registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No registry entry for the username
    #[error("user '{0}' does not exist")]
    UserNotFound(String),
    /// Username already registered
    #[error("The user `{0}' already exists.")]
    UserExists(String),
    /// Home directory could not be created
    #[error("cannot create home directory '{path}': {source}")]
    HomeDirectory {
        path: String,
        #[source]
        source: FsError,
    },
}

/// Snapshot persistence errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Snapshot could not be encoded or decoded
    #[error("snapshot encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Backing file exists but is not a key-value object
    #[error("storage file is corrupt: {0}")]
    Corrupt(String),
}
