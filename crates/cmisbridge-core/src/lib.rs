//! # cmisbridge-core
//!
//! Core crate for CmisBridge. Contains the `ContentStore` trait, configuration
//! schemas, the CMIS object-model types (properties, type definitions,
//! versioning states, allowable actions), and the unified error system.
//!
//! This crate has **no** internal dependencies on other CmisBridge crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::CmisError;
pub use result::CmisResult;
