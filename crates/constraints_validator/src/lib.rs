//! # Constraints Validator
//!
//! Evaluates constraint expressions against values exposed through
//! [`constraints_core::Inspect`]. This crate provides:
//!
//! - the structural evaluator ([`Validator`] and the free [`validate`])
//! - the predicate registry with the built-in rules (`eq`, `ne`, `gt`, `lt`,
//!   `gte`, `lte`, `empty`, `nil`, `one_of`, `format`)
//! - the format catalogue consulted by `format`
//! - the duration grammar used for duration-like values
//! - JSON documents bound to a schema, and batch reports
//!
//! ## Example
//!
//! ```rust
//! use constraints_core::{Field, Inspect, Value};
//! use constraints_validator::validate;
//!
//! struct User {
//!     age: i32,
//!     tags: Vec<String>,
//! }
//!
//! impl Inspect for User {
//!     fn inspect(&self) -> Value<'_> {
//!         Value::record([
//!             Field::new("age", "gte=0 & lte=150", &self.age),
//!             Field::new("tags", "empty=false > format=alpha", &self.tags),
//!         ])
//!     }
//! }
//!
//! let user = User { age: 30, tags: vec!["ab".into(), "1c".into()] };
//!
//! match validate(&user) {
//!     Ok(()) => println!("valid"),
//!     Err(err) => println!("invalid: {err}"),
//! }
//! # assert!(validate(&user).is_err());
//! ```

mod document;
mod duration;
mod engine;
mod error;
mod formats;
mod predicates;

pub use document::*;
pub use duration::*;
pub use engine::*;
pub use error::*;
pub use formats::*;
pub use predicates::*;
