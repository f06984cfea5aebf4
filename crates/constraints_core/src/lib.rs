//! # Constraints Core
//!
//! Core data structures and types for the constraint expression engine.
//!
//! Values are validated through the [`Inspect`] trait: an implementation
//! exposes its shape as a [`Value`] and, for records, attaches a raw
//! constraint expression to every field. Expressions look like
//! `gte=0 & lte=150`, `empty=false > format=alpha` or
//! `[empty=false] > gte=0`.
//!
//! ## Key Concepts
//!
//! - **Inspect / Value**: the shape-aware view of a value (scalar, optional,
//!   sequence, mapping, record)
//! - **SelfCheck**: an optional hook a value runs on itself before any rule
//! - **SyntaxError / ValidationError**: malformed expressions vs values that
//!   fail a rule
//! - **Schema**: file-based field annotations for dynamic documents
//!
//! ## Example
//!
//! ```rust
//! use constraints_core::{Field, Inspect, Kind, Value};
//!
//! struct Server {
//!     port: u16,
//!     hosts: Vec<String>,
//! }
//!
//! impl Inspect for Server {
//!     fn inspect(&self) -> Value<'_> {
//!         Value::record([
//!             Field::new("port", "gte=1024", &self.port),
//!             Field::new("hosts", "empty=false > format=hostname", &self.hosts),
//!         ])
//!     }
//! }
//!
//! let server = Server { port: 8080, hosts: vec!["localhost".into()] };
//! assert_eq!(server.inspect().kind(), Kind::Record);
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod inspect;
pub mod schema;
pub mod value;

pub use builder::*;
pub use context::*;
pub use error::*;
pub use inspect::*;
pub use schema::*;
pub use value::*;
