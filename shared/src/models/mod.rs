//! Data models
//!
//! Shared between the remote store adapter and the operations core.
//! Documents use camelCase field names on the wire; ids are strings.

pub mod client;
pub mod job;
pub mod quote;

// Re-exports
pub use client::*;
pub use job::*;
pub use quote::*;
