//! Core translation traits and abstractions.
//!
//! This module provides the backend-independent pieces of the persistence
//! layer:
//!
//! - [`BackendKind`] - Backend identification and capability table
//! - [`Dialect`] - The per-backend operator table
//! - [`Translator`] - The generic recursive condition interpreter
//! - [`QueryTranslator`] - Whole-query rendering into native requests
//! - [`EntityManager`] - Entity operations exposed by executable backends
//!
//! # Translation Pipeline
//!
//! ```text
//! SelectQuery ──► QueryTranslator::select
//!                     ├── Translator<D>::translate(condition)
//!                     │       ├── Dialect::compare / like / in_list / between
//!                     │       ├── Dialect::and / or
//!                     │       └── Dialect::not  or  negation::complement
//!                     └── sort, skip, limit, projection
//! ```

pub mod backend;
pub mod dialect;
pub mod manager;
pub mod negation;
pub mod pattern;
pub mod request;
pub mod translator;

pub use backend::{BackendCapability, BackendFamily, BackendKind};
pub use dialect::{CompareOp, Dialect, NegationStrategy};
pub use manager::EntityManager;
pub use pattern::{LikePattern, PatternShape, PatternToken};
pub use request::{QueryDocument, QueryTranslator};
pub use translator::Translator;
