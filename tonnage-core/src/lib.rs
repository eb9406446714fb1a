//! Core types and service wiring for the NYC sanitation tonnage tool.

/// Domain models and lookup tables.
pub mod model;
/// Traits describing the remote dataset and the local store.
pub mod ports;
/// Human-readable tonnage summaries.
pub mod report;
/// High-level service facade used by clients.
pub mod service;
/// Command line argument validation and normalization.
pub mod validate;

pub use model::*;
pub use ports::*;
pub use report::*;
pub use service::*;
pub use validate::*;
