//! Declared argument types and bound values.
//!
//! [`TypeInfo`] describes what an argument converts to; [`Value`] is the
//! dynamically typed result of binding. Application code usually reads
//! values back through [`FromValue`] rather than matching on [`Value`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// The scalar type an argument (or each element of a list argument) converts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ValueType {
    Bool,
    Int,
    UInt,
    Float,
    Char,
    Text,
    /// A closed set of names, matched case-insensitively.
    Enum { name: String, variants: Vec<String> },
    /// A type converted by a registered string parser, keyed by name.
    Custom { name: String },
}

impl ValueType {
    /// Builds an enum type from its member names.
    pub fn enumeration<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueType::Enum {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a custom type keyed by the Rust type name of `T`.
    pub fn custom<T: 'static>() -> Self {
        ValueType::Custom {
            name: std::any::type_name::<T>().to_string(),
        }
    }

    /// A short name for diagnostics.
    pub fn name(&self) -> &str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::UInt => "uint",
            ValueType::Float => "float",
            ValueType::Char => "char",
            ValueType::Text => "string",
            ValueType::Enum { name, .. } | ValueType::Custom { name } => name,
        }
    }

    /// The zero-equivalent used when nothing provides a value.
    pub fn type_default(&self) -> Value {
        match self {
            ValueType::Bool => Value::Bool(false),
            ValueType::Int => Value::Int(0),
            ValueType::UInt => Value::UInt(0),
            ValueType::Float => Value::Float(0.0),
            _ => Value::None,
        }
    }
}

/// Full type information for an argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeInfo {
    /// The scalar type, or the element type for lists.
    pub underlying: ValueType,
    /// The argument collects a list of values.
    pub is_list: bool,
    /// The argument is nullable; its default is [`Value::None`].
    pub is_optional: bool,
}

impl TypeInfo {
    pub fn new(underlying: ValueType) -> Self {
        Self {
            underlying,
            is_list: false,
            is_optional: false,
        }
    }

    pub fn list(underlying: ValueType) -> Self {
        Self {
            underlying,
            is_list: true,
            is_optional: false,
        }
    }

    pub fn optional(underlying: ValueType) -> Self {
        Self {
            underlying,
            is_list: false,
            is_optional: true,
        }
    }

    pub fn bool() -> Self {
        Self::new(ValueType::Bool)
    }

    pub fn int() -> Self {
        Self::new(ValueType::Int)
    }

    pub fn uint() -> Self {
        Self::new(ValueType::UInt)
    }

    pub fn float() -> Self {
        Self::new(ValueType::Float)
    }

    pub fn text() -> Self {
        Self::new(ValueType::Text)
    }

    /// The value used when no input and no default exist.
    pub fn type_default(&self) -> Value {
        if self.is_list {
            Value::List(Vec::new())
        } else if self.is_optional {
            Value::None
        } else {
            self.underlying.type_default()
        }
    }

    /// Allowed values for enum types.
    pub fn allowed_values(&self) -> Option<&[String]> {
        match &self.underlying {
            ValueType::Enum { variants, .. } => Some(variants),
            _ => None,
        }
    }
}

/// A value of a user-registered type.
#[derive(Clone)]
pub struct CustomValue {
    type_name: String,
    display: String,
    inner: Arc<dyn Any + Send + Sync>,
}

impl CustomValue {
    pub fn new<T: Any + Send + Sync + fmt::Display>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>().to_string(),
            display: value.to_string(),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomValue")
            .field("type_name", &self.type_name)
            .field("display", &self.display)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.display == other.display
    }
}

/// A bound, typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Text(String),
    /// The canonical member name of an enum.
    Enum(String),
    List(Vec<Value>),
    Custom(CustomValue),
}

impl Value {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows a custom value as its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(c) => c.downcast_ref(),
            _ => None,
        }
    }

    /// Converts a typed value to `target`, covering lossless numeric widening.
    ///
    /// Used for defaults supplied as typed values rather than strings.
    pub fn coerce_to(self, target: &TypeInfo) -> Result<Value, String> {
        if target.is_list {
            return match self {
                Value::List(items) => items
                    .into_iter()
                    .map(|v| v.coerce_scalar(&target.underlying))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List),
                single => Ok(Value::List(vec![single.coerce_scalar(&target.underlying)?])),
            };
        }
        if self.is_none() && target.is_optional {
            return Ok(Value::None);
        }
        self.coerce_scalar(&target.underlying)
    }

    fn coerce_scalar(self, target: &ValueType) -> Result<Value, String> {
        let mismatch = |v: &Value| format!("cannot convert {v} to {}", target.name());
        match (target, self) {
            (ValueType::Bool, v @ Value::Bool(_))
            | (ValueType::Int, v @ Value::Int(_))
            | (ValueType::UInt, v @ Value::UInt(_))
            | (ValueType::Float, v @ Value::Float(_))
            | (ValueType::Char, v @ Value::Char(_))
            | (ValueType::Text, v @ Value::Text(_)) => Ok(v),
            (ValueType::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
            (ValueType::Float, Value::UInt(u)) => Ok(Value::Float(u as f64)),
            (ValueType::Int, v @ Value::UInt(u)) => i64::try_from(u)
                .map(Value::Int)
                .map_err(|_| mismatch(&v)),
            (ValueType::UInt, v @ Value::Int(i)) => u64::try_from(i)
                .map(Value::UInt)
                .map_err(|_| mismatch(&v)),
            (ValueType::Text, Value::Char(c)) => Ok(Value::Text(c.to_string())),
            (ValueType::Enum { variants, .. }, Value::Enum(name)) => {
                if variants.iter().any(|m| *m == name) {
                    Ok(Value::Enum(name))
                } else {
                    Err(mismatch(&Value::Enum(name)))
                }
            }
            (ValueType::Custom { name }, Value::Custom(c)) if c.type_name() == name => {
                Ok(Value::Custom(c))
            }
            (_, v) => Err(mismatch(&v)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Text(s) | Value::Enum(s) => f.write_str(s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Custom(c) => f.write_str(&c.display),
        }
    }
}

/// Conversion from a bound [`Value`] into a Rust type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! from_value_int {
    ($($t:ty),*) => {
        $(impl FromValue for $t {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Int(i) => <$t>::try_from(*i).ok(),
                    Value::UInt(u) => <$t>::try_from(*u).ok(),
                    _ => None,
                }
            }
        })*
    };
}

from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64().map(|f| f as f32)
    }
}

impl FromValue for char {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::None => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            Value::None => Some(Vec::new()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_defaults() {
        assert_eq!(TypeInfo::bool().type_default(), Value::Bool(false));
        assert_eq!(TypeInfo::int().type_default(), Value::Int(0));
        assert_eq!(TypeInfo::text().type_default(), Value::None);
        assert_eq!(
            TypeInfo::list(ValueType::Int).type_default(),
            Value::List(vec![])
        );
        assert_eq!(TypeInfo::optional(ValueType::Int).type_default(), Value::None);
    }

    #[test]
    fn coerce_widens_int_to_float() {
        let v = Value::Int(3).coerce_to(&TypeInfo::float()).unwrap();
        assert_eq!(v, Value::Float(3.0));
    }

    #[test]
    fn coerce_rejects_negative_uint() {
        assert!(Value::Int(-1).coerce_to(&TypeInfo::uint()).is_err());
    }

    #[test]
    fn coerce_rejects_mismatch() {
        let err = Value::Bool(true).coerce_to(&TypeInfo::int()).unwrap_err();
        assert_eq!(err, "cannot convert true to int");
    }

    #[test]
    fn coerce_wraps_scalar_into_list() {
        let v = Value::Int(1)
            .coerce_to(&TypeInfo::list(ValueType::Int))
            .unwrap();
        assert_eq!(v, Value::List(vec![Value::Int(1)]));
    }

    #[test]
    fn from_value_conversions() {
        assert_eq!(i32::from_value(&Value::Int(7)), Some(7));
        assert_eq!(u8::from_value(&Value::Int(300)), None);
        assert_eq!(
            Vec::<String>::from_value(&Value::List(vec![
                Value::Text("a".into()),
                Value::Text("b".into())
            ])),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(Option::<i64>::from_value(&Value::None), Some(None));
    }

    #[test]
    fn custom_values_downcast() {
        #[derive(Debug, PartialEq)]
        struct Port(u16);
        impl fmt::Display for Port {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, ":{}", self.0)
            }
        }

        let v = Value::Custom(CustomValue::new(Port(80)));
        assert_eq!(v.downcast_ref::<Port>(), Some(&Port(80)));
        assert_eq!(v.to_string(), ":80");
    }
}
