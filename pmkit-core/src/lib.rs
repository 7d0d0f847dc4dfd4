//! Core library for pmkit.
//!
//! This crate provides the domain models, validation, database operations and
//! the pure PM formulas (retention/stickiness analysis, growth calculators),
//! independent of any transport layer (HTTP, MCP, CLI).
//!
//! # Usage
//!
//! ```no_run
//! use pmkit_core::db::Database;
//! use pmkit_core::metrics;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let user = db.register_user("pm@example.com")?;
//! let cohorts = db.list_cohorts(user.id)?;
//! let analysis = metrics::analyze_cohorts(&cohorts);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod db;
pub mod diagrams;
pub mod export;
pub mod growth;
pub mod metrics;
pub mod models;
pub mod simulation;
pub mod validation;

// Re-export commonly used types at crate root
pub use db::Database;
pub use validation::ValidationError;
