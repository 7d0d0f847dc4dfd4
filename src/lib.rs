//! pmkit server library: HTTP API, MCP tools, simulation runner and the
//! typed client used by the remote CLI commands.
//!
//! Domain models, persistence and formulas live in `pmkit-core` and are
//! re-exported here.

pub mod api;
pub mod automation;
pub mod client;
pub mod config;
pub mod mcp;

pub use pmkit_core::{db, diagrams, export, growth, metrics, models, simulation, validation};
