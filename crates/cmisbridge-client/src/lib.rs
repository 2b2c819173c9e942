//! # cmisbridge-client
//!
//! The client runtime: a [`Session`] over an opaque [`Binding`] (object,
//! navigation, and multi-filing services), fileable [`ClientObject`]s with
//! the defensive validation a remote repository's answers require, and an
//! in-process binding over the adapter layer for loopback use.

pub mod binding;
pub mod local;
pub mod object;
pub mod session;

pub use binding::{Binding, ObjectEnvelope, ObjectParentData};
pub use local::LocalBinding;
pub use object::ClientObject;
pub use session::Session;
