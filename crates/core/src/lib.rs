//! git-resolve core library.
//!
//! This crate provides the components of an interactive merge-conflict
//! resolution session: status report parsing, conflict classification,
//! conflict marker scanning, the per-file resolution loop, and the state
//! lattice that folds per-file outcomes into one session result.

pub mod classify;
pub mod config;
pub mod editor;
pub mod errors;
pub mod git;
pub mod marker;
pub mod prompt;
pub mod resolver;
pub mod session;
pub mod state;
pub mod status;

// Re-exports for convenience.
pub use config::ResolveConfig;
pub use errors::CoreError;
pub use resolver::{Resolver, SessionReport};
pub use session::Session;
pub use state::ConflictState;
