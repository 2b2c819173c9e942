//! Unified error types for CmisBridge.
//!
//! All crates map their internal failures into [`CmisError`] for consistent
//! propagation through the ? operator. The protocol layer maps [`ErrorKind`]
//! to fault codes; the kinds therefore carry the client-visible taxonomy.

use std::fmt;

use thiserror::Error;

/// Top-level error kind categorization used across the entire toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A schema or validation rule was violated (client-correctable).
    Constraint,
    /// An illegal versioning state transition was requested (client-correctable).
    Versioning,
    /// The object has no resolvable location in the folder tree.
    NotFiled,
    /// An unknown type id was referenced.
    TypeNotFound,
    /// The requested object does not exist.
    ObjectNotFound,
    /// The store returned structurally invalid data (always a defect).
    RepositoryData,
    /// A native store I/O failure, wrapped and rethrown.
    Storage,
    /// A caller supplied a malformed or missing argument.
    InvalidArgument,
    /// The repository does not support the requested capability.
    NotSupported,
    /// A configuration error occurred.
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constraint => write!(f, "CONSTRAINT"),
            Self::Versioning => write!(f, "VERSIONING"),
            Self::NotFiled => write!(f, "NOT_FILED"),
            Self::TypeNotFound => write!(f, "TYPE_NOT_FOUND"),
            Self::ObjectNotFound => write!(f, "OBJECT_NOT_FOUND"),
            Self::RepositoryData => write!(f, "REPOSITORY_DATA"),
            Self::Storage => write!(f, "STORAGE"),
            Self::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Self::NotSupported => write!(f, "NOT_SUPPORTED"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// The unified error used throughout CmisBridge.
///
/// Every raised error carries enough context (property id, node path, or
/// type id in the message) to be diagnosable without internal logs.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct CmisError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CmisError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a constraint-violation error.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Constraint, message)
    }

    /// Create a versioning error.
    pub fn versioning(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Versioning, message)
    }

    /// Create a not-filed error.
    pub fn not_filed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFiled, message)
    }

    /// Create a type-not-found error.
    pub fn type_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeNotFound, message)
    }

    /// Create an object-not-found error.
    pub fn object_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ObjectNotFound, message)
    }

    /// Create a repository-data error.
    pub fn repository_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RepositoryData, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create a not-supported error.
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotSupported, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl Clone for CmisError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<std::io::Error> for CmisError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for CmisError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
