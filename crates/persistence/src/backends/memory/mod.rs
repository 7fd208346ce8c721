//! In-memory reference backend.
//!
//! The only backend that executes queries itself: conditions compile into
//! predicates evaluated over stored entities. It defines the reference
//! semantics the native dialects are checked against in tests.

mod backend;
mod config;
mod dialect;

pub use backend::MemoryBackend;
pub use config::MemoryConfig;
pub use dialect::{MemoryDialect, Predicate, compare_values, sort_order};
