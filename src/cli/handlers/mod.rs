//! CLI command handlers module
//!
//! One file per command:
//! - index: offline indexing
//! - ask: one-shot questions and the interactive session
//! - serve: API server
//! - info: configuration display

pub mod ask;
pub mod index;
pub mod info;
pub mod serve;

// Re-export all public handlers
pub use ask::*;
pub use index::*;
pub use info::*;
pub use serve::*;
