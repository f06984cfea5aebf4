//! Shape-aware handles over values under validation.
//!
//! Anything that can be validated implements [`Inspect`], which exposes the
//! value as a [`Value`]: a closed tag-union of scalars, optionals, sequences,
//! mappings and records. The evaluator only ever sees this view, so plain
//! structs, JSON documents and hand-rolled wrappers are all walked the same way.

use crate::BoxError;
use chrono::TimeDelta;
use std::borrow::Cow;
use std::fmt;

/// The shape of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Signed integer (durations included)
    Integer,
    /// Unsigned integer
    Unsigned,
    /// Floating point number
    Float,
    /// Text
    String,
    /// Boolean
    Boolean,
    /// Optional or nullable reference
    Optional,
    /// Slice, array, vector or set
    Sequence,
    /// Map
    Mapping,
    /// Struct with annotated fields
    Record,
    /// Anything else
    Other,
}

impl Kind {
    /// Returns the lowercase kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Integer => "integer",
            Kind::Unsigned => "unsigned",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Boolean => "boolean",
            Kind::Optional => "optional",
            Kind::Sequence => "sequence",
            Kind::Mapping => "mapping",
            Kind::Record => "record",
            Kind::Other => "other",
        }
    }

    /// Scalars are leaves: there is nothing to dive into.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Kind::Integer | Kind::Unsigned | Kind::Float | Kind::String | Kind::Boolean
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A child handle produced while inspecting a composite value.
pub type Node<'a> = Box<dyn Inspect + 'a>;

/// Boxes anything inspectable into a [`Node`].
pub fn node<'a>(value: impl Inspect + 'a) -> Node<'a> {
    Box::new(value)
}

/// View of a value as seen by the evaluator.
pub enum Value<'a> {
    /// Signed integer
    Integer(i64),
    /// Unsigned integer
    Unsigned(u64),
    /// Floating point number
    Float(f64),
    /// Duration-like integer; rule parameters use the duration grammar
    Duration(TimeDelta),
    /// Text
    String(Cow<'a, str>),
    /// Boolean
    Boolean(bool),
    /// Optional value; `None` when absent
    Optional(Option<Node<'a>>),
    /// Elements in index order
    Sequence(Vec<Node<'a>>),
    /// Key/value pairs in implementation-defined order
    Mapping(Vec<(Node<'a>, Node<'a>)>),
    /// Annotated fields in declaration order
    Record(Vec<Field<'a>>),
    /// Anything the evaluator cannot look into
    Other,
}

impl<'a> Value<'a> {
    /// Builds an optional value.
    pub fn optional(value: Option<impl Inspect + 'a>) -> Self {
        Value::Optional(value.map(node))
    }

    /// Builds a sequence from its elements.
    pub fn sequence<I, T>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Inspect + 'a,
    {
        Value::Sequence(elements.into_iter().map(node).collect())
    }

    /// Builds a mapping from key/value pairs.
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Inspect + 'a,
        V: Inspect + 'a,
    {
        Value::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (node(k), node(v)))
                .collect(),
        )
    }

    /// Builds a record from its fields.
    pub fn record(fields: impl IntoIterator<Item = Field<'a>>) -> Self {
        Value::Record(fields.into_iter().collect())
    }

    /// Returns the shape of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Integer(_) | Value::Duration(_) => Kind::Integer,
            Value::Unsigned(_) => Kind::Unsigned,
            Value::Float(_) => Kind::Float,
            Value::String(_) => Kind::String,
            Value::Boolean(_) => Kind::Boolean,
            Value::Optional(_) => Kind::Optional,
            Value::Sequence(_) => Kind::Sequence,
            Value::Mapping(_) => Kind::Mapping,
            Value::Record(_) => Kind::Record,
            Value::Other => Kind::Other,
        }
    }

    /// Length of strings (in characters), sequences and mappings.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Sequence(elements) => Some(elements.len()),
            Value::Mapping(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Returns true if `len()` is known and zero.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Returns true if this is a duration-like integer.
    pub fn is_duration(&self) -> bool {
        matches!(self, Value::Duration(_))
    }

    /// Returns true for an optional value that is absent.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Optional(None))
    }

    /// Signed integer value; durations are reported in nanoseconds.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Duration(d) => d.num_nanoseconds(),
            _ => None,
        }
    }

    /// Unsigned integer value.
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Value::Unsigned(u) => Some(*u),
            _ => None,
        }
    }

    /// Floating point value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Duration value.
    pub fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }

    /// Text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Pointee of a present optional.
    pub fn deref(&self) -> Option<&dyn Inspect> {
        match self {
            Value::Optional(Some(inner)) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "Integer({i})"),
            Value::Unsigned(u) => write!(f, "Unsigned({u})"),
            Value::Float(x) => write!(f, "Float({x})"),
            Value::Duration(d) => write!(f, "Duration({d})"),
            Value::String(s) => write!(f, "String({s:?})"),
            Value::Boolean(b) => write!(f, "Boolean({b})"),
            Value::Optional(None) => f.write_str("Optional(None)"),
            Value::Optional(Some(_)) => f.write_str("Optional(Some(..))"),
            Value::Sequence(e) => write!(f, "Sequence(len={})", e.len()),
            Value::Mapping(e) => write!(f, "Mapping(len={})", e.len()),
            Value::Record(fields) => f
                .debug_list()
                .entries(fields.iter().map(|field| &field.name))
                .finish(),
            Value::Other => f.write_str("Other"),
        }
    }
}

/// One annotated record field: its name, raw expression and value.
pub struct Field<'a> {
    name: Cow<'a, str>,
    expression: Cow<'a, str>,
    node: Node<'a>,
}

impl<'a> Field<'a> {
    /// Creates a field.
    ///
    /// # Example
    ///
    /// ```rust
    /// use constraints_core::{Field, Inspect, Kind};
    ///
    /// let age = 42;
    /// let field = Field::new("age", "gte=0 & lte=150", &age);
    /// assert_eq!(field.name(), "age");
    /// assert_eq!(field.node().inspect().kind(), Kind::Integer);
    /// ```
    pub fn new(
        name: impl Into<Cow<'a, str>>,
        expression: impl Into<Cow<'a, str>>,
        value: impl Inspect + 'a,
    ) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            node: node(value),
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw constraint expression attached to the field.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Handle to the field value.
    pub fn node(&self) -> &dyn Inspect {
        self.node.as_ref()
    }
}

/// Gives the evaluator a shape-aware view of a value.
///
/// # Example
///
/// ```rust
/// use constraints_core::{Field, Inspect, Kind, Value};
///
/// struct User {
///     age: i32,
///     tags: Vec<String>,
/// }
///
/// impl Inspect for User {
///     fn inspect(&self) -> Value<'_> {
///         Value::record([
///             Field::new("age", "gte=0 & lte=150", &self.age),
///             Field::new("tags", "empty=false > format=alpha", &self.tags),
///         ])
///     }
/// }
///
/// let user = User { age: 30, tags: vec!["admin".into()] };
/// assert_eq!(user.inspect().kind(), Kind::Record);
/// ```
pub trait Inspect {
    /// Returns the value's shape and contents.
    ///
    /// `Option` and `Result` have an inherent `inspect` method that shadows
    /// this one in method-call syntax. Call `Inspect::inspect(&opt)` on them.
    fn inspect(&self) -> Value<'_>;

    /// Human-readable type, used in validation errors.
    fn type_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }

    /// Self-validation capability, if the value has one.
    fn self_check(&self) -> Option<&dyn SelfCheck> {
        None
    }

    /// Self-validation on an owned duplicate of the value.
    ///
    /// Probed only when [`Inspect::self_check`] yields nothing.
    fn to_self_check(&self) -> Option<Box<dyn SelfCheck>> {
        None
    }
}

/// A value-supplied "check yourself" hook, run before any rule.
pub trait SelfCheck {
    /// Returns an error when the value is not valid.
    fn check(&self) -> std::result::Result<(), BoxError>;
}
