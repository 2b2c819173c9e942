//! # cmisbridge-store
//!
//! Content-store providers for CmisBridge. Currently ships the in-memory
//! provider used by the inspection tool and the test suite; the
//! [`ContentStore`](cmisbridge_core::traits::ContentStore) trait it
//! implements lives in `cmisbridge-core`.

pub mod memory;

pub use memory::MemoryStore;
