//! Convenience result type alias for CmisBridge.

use crate::error::CmisError;

/// A specialized `Result` type for CmisBridge operations.
///
/// This is defined as a convenience so that every crate does not need to
/// write `Result<T, CmisError>` explicitly.
pub type CmisResult<T> = Result<T, CmisError>;
