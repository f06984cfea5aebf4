//! `Inspect` implementations for standard library, chrono and JSON types.

use crate::{Inspect, Node, SelfCheck, Value, node};
use chrono::TimeDelta;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

macro_rules! inspect_as {
    ($variant:ident, $target:ty; $($t:ty),*) => {
        $(
            impl Inspect for $t {
                fn inspect(&self) -> Value<'_> {
                    Value::$variant(*self as $target)
                }
            }
        )*
    };
}

inspect_as!(Integer, i64; i8, i16, i32, i64, isize);
inspect_as!(Unsigned, u64; u8, u16, u32, u64, usize);
inspect_as!(Float, f64; f32, f64);

impl Inspect for char {
    fn inspect(&self) -> Value<'_> {
        Value::Integer(i64::from(u32::from(*self)))
    }
}

impl Inspect for bool {
    fn inspect(&self) -> Value<'_> {
        Value::Boolean(*self)
    }
}

impl Inspect for () {
    fn inspect(&self) -> Value<'_> {
        Value::Other
    }
}

impl Inspect for str {
    fn inspect(&self) -> Value<'_> {
        Value::String(Cow::Borrowed(self))
    }
}

impl Inspect for String {
    fn inspect(&self) -> Value<'_> {
        Value::String(Cow::Borrowed(self.as_str()))
    }
}

impl Inspect for Cow<'_, str> {
    fn inspect(&self) -> Value<'_> {
        Value::String(Cow::Borrowed(self.as_ref()))
    }

    fn type_name(&self) -> Cow<'static, str> {
        Cow::Borrowed("Cow<str>")
    }
}

impl Inspect for TimeDelta {
    fn inspect(&self) -> Value<'_> {
        Value::Duration(*self)
    }
}

impl Inspect for std::time::Duration {
    fn inspect(&self) -> Value<'_> {
        Value::Duration(TimeDelta::from_std(*self).unwrap_or(TimeDelta::MAX))
    }
}

// Smart pointers and references are transparent: they never dangle, so they
// are not optionals. `Option<T>` is the optional shape.
macro_rules! inspect_transparent {
    ($($wrapper:ident),*) => {
        $(
            impl<T: Inspect + ?Sized> Inspect for $wrapper<T> {
                fn inspect(&self) -> Value<'_> {
                    (**self).inspect()
                }

                fn type_name(&self) -> Cow<'static, str> {
                    (**self).type_name()
                }

                fn self_check(&self) -> Option<&dyn SelfCheck> {
                    (**self).self_check()
                }

                fn to_self_check(&self) -> Option<Box<dyn SelfCheck>> {
                    (**self).to_self_check()
                }
            }
        )*
    };
}

inspect_transparent!(Box, Rc, Arc);

impl<T: Inspect + ?Sized> Inspect for &T {
    fn inspect(&self) -> Value<'_> {
        (**self).inspect()
    }

    fn type_name(&self) -> Cow<'static, str> {
        (**self).type_name()
    }

    fn self_check(&self) -> Option<&dyn SelfCheck> {
        (**self).self_check()
    }

    fn to_self_check(&self) -> Option<Box<dyn SelfCheck>> {
        (**self).to_self_check()
    }
}

impl<T: Inspect> Inspect for Option<T> {
    fn inspect(&self) -> Value<'_> {
        Value::Optional(self.as_ref().map(node))
    }
}

fn elements<'a, T: Inspect + 'a>(items: impl Iterator<Item = &'a T>) -> Value<'a> {
    Value::Sequence(items.map(|item| node(item)).collect())
}

impl<T: Inspect> Inspect for [T] {
    fn inspect(&self) -> Value<'_> {
        elements(self.iter())
    }
}

impl<T: Inspect, const N: usize> Inspect for [T; N] {
    fn inspect(&self) -> Value<'_> {
        elements(self.iter())
    }
}

impl<T: Inspect> Inspect for Vec<T> {
    fn inspect(&self) -> Value<'_> {
        elements(self.iter())
    }
}

impl<T: Inspect> Inspect for VecDeque<T> {
    fn inspect(&self) -> Value<'_> {
        elements(self.iter())
    }
}

impl<T: Inspect, S> Inspect for HashSet<T, S> {
    fn inspect(&self) -> Value<'_> {
        elements(self.iter())
    }
}

impl<T: Inspect> Inspect for BTreeSet<T> {
    fn inspect(&self) -> Value<'_> {
        elements(self.iter())
    }
}

fn entries<'a, K, V>(pairs: impl Iterator<Item = (&'a K, &'a V)>) -> Value<'a>
where
    K: Inspect + 'a,
    V: Inspect + 'a,
{
    Value::Mapping(
        pairs
            .map(|(k, v)| -> (Node<'a>, Node<'a>) { (node(k), node(v)) })
            .collect(),
    )
}

impl<K: Inspect, V: Inspect, S> Inspect for HashMap<K, V, S> {
    fn inspect(&self) -> Value<'_> {
        entries(self.iter())
    }
}

impl<K: Inspect, V: Inspect> Inspect for BTreeMap<K, V> {
    fn inspect(&self) -> Value<'_> {
        entries(self.iter())
    }
}

impl Inspect for serde_json::Value {
    fn inspect(&self) -> Value<'_> {
        use serde_json::Value as Json;

        match self {
            Json::Null => Value::Optional(None),
            Json::Bool(b) => Value::Boolean(*b),
            Json::Number(n) => json_number(n),
            Json::String(s) => Value::String(Cow::Borrowed(s.as_str())),
            Json::Array(items) => elements(items.iter()),
            Json::Object(map) => entries(map.iter()),
        }
    }

    fn type_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(json_type_name(self))
    }
}

/// Maps a JSON number onto the narrowest numeric shape.
pub fn json_number(n: &serde_json::Number) -> Value<'static> {
    if let Some(i) = n.as_i64() {
        Value::Integer(i)
    } else if let Some(u) = n.as_u64() {
        Value::Unsigned(u)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// JSON type names as they appear in error messages.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value as Json;

    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_numeric_kinds() {
        assert_eq!((-3i8).inspect().as_integer(), Some(-3));
        assert_eq!(7usize.inspect().as_unsigned(), Some(7));
        assert_eq!(1.5f32.inspect().as_float(), Some(1.5));
        assert_eq!('a'.inspect().as_integer(), Some(97));
    }

    #[test]
    fn test_durations() {
        let std_duration = std::time::Duration::from_millis(1500);
        assert_eq!(
            std_duration.inspect().as_duration(),
            Some(TimeDelta::milliseconds(1500))
        );
        assert!(TimeDelta::seconds(-1).inspect().is_duration());
    }

    #[test]
    fn test_collections() {
        let items = vec![1, 2, 3];
        assert_eq!(items.inspect().kind(), Kind::Sequence);
        assert_eq!(items.inspect().len(), Some(3));

        let array = [0u8; 4];
        assert_eq!(array.inspect().len(), Some(4));

        let mut map = HashMap::new();
        map.insert("a".to_string(), 1);
        assert_eq!(map.inspect().kind(), Kind::Mapping);
        assert_eq!(map.inspect().len(), Some(1));
    }

    #[test]
    fn test_wrappers_are_transparent() {
        let boxed: Box<i32> = Box::new(5);
        assert_eq!(boxed.inspect().kind(), Kind::Integer);
        assert_eq!(Arc::new("x".to_string()).inspect().as_str(), Some("x"));
        assert_eq!(Inspect::inspect(&Some(1)).kind(), Kind::Optional);
        assert!(Inspect::inspect(&None::<i32>).is_absent());
    }

    #[test]
    fn test_json_values() {
        assert!(json!(null).inspect().is_absent());
        assert_eq!(json!(-4).inspect().as_integer(), Some(-4));
        assert_eq!(json!(u64::MAX).inspect().as_unsigned(), Some(u64::MAX));
        assert_eq!(json!(0.25).inspect().as_float(), Some(0.25));
        assert_eq!(json!({"a": 1}).inspect().kind(), Kind::Mapping);
        assert_eq!(json!(["x"]).inspect().len(), Some(1));
        assert_eq!(json!("x").type_name(), "string");
    }
}
