//! Tessera data model
//!
//! This crate provides the database-agnostic representation shared by every
//! Tessera backend: coercible values, named elements and entities, a boolean
//! condition algebra, and select/delete queries. Nothing here performs I/O;
//! every type is immutable once built and safe to share across threads.
//!
//! # Modules
//!
//! - [`value`] - [`Value`], target type descriptors and the coercion registry
//! - [`entity`] - [`Element`] and [`Entity`]
//! - [`condition`] - the [`Condition`] tree and its factories
//! - [`query`] - [`SelectQuery`] and [`DeleteQuery`]
//! - [`error`] - model error types
//!
//! # Quick Start
//!
//! ```
//! use tessera_model::{Condition, Element, Entity, SelectQuery, Sort};
//!
//! let ada = Entity::new("person")
//!     .unwrap()
//!     .with_element(Element::new("name", "Ada").unwrap())
//!     .with_element(Element::new("age", 10).unwrap());
//!
//! let query = SelectQuery::new("person")
//!     .unwrap()
//!     .with_condition(Condition::eq(Element::new("name", "Ada").unwrap()))
//!     .with_sort(Sort::parse("-age"))
//!     .with_limit(10);
//!
//! assert_eq!(query.target(), ada.name());
//! assert_eq!(ada.find_value::<u8>("age").unwrap().unwrap(), 10);
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub mod condition;
pub mod entity;
pub mod error;
pub mod query;
pub mod value;

pub use condition::{Comparator, Comparison, Condition, ConditionOperator, Operands};
pub use entity::{Element, Entity};
pub use error::{CoercionError, ModelError, ModelResult};
pub use query::{DeleteQuery, SelectQuery, Sort, SortDirection};
pub use value::convert::{convert, convert_to_list};
pub use value::{FromValue, IntoValue, Scalar, ScalarKind, ScalarType, TypeRef, TypeReference, Value};
