//! String-to-value conversion through a registry of type descriptors.
//!
//! A [`TypeDescriptor`] claims the types it can convert through
//! [`TypeDescriptor::can_support`]. The registry asks its descriptors in
//! order: user registrations first, then the built-ins (enum, bool, numbers,
//! char, text). List arguments convert each raw value with the element
//! type's descriptor.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::ConfigError;
use crate::model::{CommandTree, CustomValue, TypeInfo, Value, ValueType};

/// Converts raw strings into values of the types it supports.
pub trait TypeDescriptor: Send + Sync {
    fn can_support(&self, ty: &ValueType) -> bool;

    /// The name shown in help and prompts.
    fn display_name(&self, ty: &ValueType) -> String;

    fn parse(&self, ty: &ValueType, raw: &str) -> Result<Value, String>;
}

struct BoolDescriptor;

impl TypeDescriptor for BoolDescriptor {
    fn can_support(&self, ty: &ValueType) -> bool {
        *ty == ValueType::Bool
    }

    fn display_name(&self, _: &ValueType) -> String {
        "Boolean".to_string()
    }

    fn parse(&self, _: &ValueType, raw: &str) -> Result<Value, String> {
        if raw.eq_ignore_ascii_case("true") {
            Ok(Value::Bool(true))
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(Value::Bool(false))
        } else {
            Err(format!("'{raw}' is not a valid Boolean"))
        }
    }
}

struct NumberDescriptor;

impl TypeDescriptor for NumberDescriptor {
    fn can_support(&self, ty: &ValueType) -> bool {
        matches!(ty, ValueType::Int | ValueType::UInt | ValueType::Float)
    }

    fn display_name(&self, ty: &ValueType) -> String {
        match ty {
            ValueType::Float => "Decimal",
            _ => "Number",
        }
        .to_string()
    }

    fn parse(&self, ty: &ValueType, raw: &str) -> Result<Value, String> {
        let parsed = match ty {
            ValueType::Int => raw.parse().map(Value::Int).ok(),
            ValueType::UInt => raw.parse().map(Value::UInt).ok(),
            _ => raw.parse().map(Value::Float).ok(),
        };
        parsed.ok_or_else(|| format!("'{raw}' is not a valid {}", self.display_name(ty)))
    }
}

struct CharDescriptor;

impl TypeDescriptor for CharDescriptor {
    fn can_support(&self, ty: &ValueType) -> bool {
        *ty == ValueType::Char
    }

    fn display_name(&self, _: &ValueType) -> String {
        "Character".to_string()
    }

    fn parse(&self, _: &ValueType, raw: &str) -> Result<Value, String> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::Char(c)),
            _ => Err(format!("'{raw}' is not a single Character")),
        }
    }
}

struct TextDescriptor;

impl TypeDescriptor for TextDescriptor {
    fn can_support(&self, ty: &ValueType) -> bool {
        *ty == ValueType::Text
    }

    fn display_name(&self, _: &ValueType) -> String {
        "Text".to_string()
    }

    fn parse(&self, _: &ValueType, raw: &str) -> Result<Value, String> {
        Ok(Value::Text(raw.to_string()))
    }
}

/// Matches member names case-insensitively and binds the declared spelling.
struct EnumDescriptor;

impl TypeDescriptor for EnumDescriptor {
    fn can_support(&self, ty: &ValueType) -> bool {
        matches!(ty, ValueType::Enum { .. })
    }

    fn display_name(&self, ty: &ValueType) -> String {
        ty.name().to_string()
    }

    fn parse(&self, ty: &ValueType, raw: &str) -> Result<Value, String> {
        let ValueType::Enum { name, variants } = ty else {
            return Err(format!("'{raw}' is not a valid {}", ty.name()));
        };
        variants
            .iter()
            .find(|v| v.eq_ignore_ascii_case(raw))
            .map(|v| Value::Enum(v.clone()))
            .ok_or_else(|| {
                format!(
                    "'{raw}' is not a valid {name}. Allowed values: {}",
                    variants.join(", ")
                )
            })
    }
}

/// Converts a custom type through its [`FromStr`] implementation.
pub struct FromStrDescriptor<T> {
    type_name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromStrDescriptor<T>
where
    T: FromStr + fmt::Display + Send + Sync + 'static,
    T::Err: fmt::Display,
{
    pub fn new() -> Self {
        Self {
            type_name: std::any::type_name::<T>().to_string(),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for FromStrDescriptor<T>
where
    T: FromStr + fmt::Display + Send + Sync + 'static,
    T::Err: fmt::Display,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TypeDescriptor for FromStrDescriptor<T>
where
    T: FromStr + fmt::Display + Send + Sync + 'static,
    T::Err: fmt::Display,
{
    fn can_support(&self, ty: &ValueType) -> bool {
        matches!(ty, ValueType::Custom { name } if *name == self.type_name)
    }

    fn display_name(&self, _: &ValueType) -> String {
        self.type_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.type_name)
            .to_string()
    }

    fn parse(&self, _: &ValueType, raw: &str) -> Result<Value, String> {
        raw.parse::<T>()
            .map(|v| Value::Custom(CustomValue::new(v)))
            .map_err(|e| e.to_string())
    }
}

/// An ordered set of descriptors.
#[derive(Clone)]
pub struct DescriptorRegistry {
    descriptors: Vec<Arc<dyn TypeDescriptor>>,
}

impl fmt::Debug for DescriptorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorRegistry")
            .field("descriptors", &self.descriptors.len())
            .finish()
    }
}

impl Default for DescriptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_REGISTRY: Lazy<DescriptorRegistry> = Lazy::new(DescriptorRegistry::new);

/// The shared registry holding only the built-in descriptors.
pub fn default_registry() -> &'static DescriptorRegistry {
    &DEFAULT_REGISTRY
}

impl DescriptorRegistry {
    /// A registry with the built-in descriptors.
    pub fn new() -> Self {
        Self {
            descriptors: vec![
                Arc::new(EnumDescriptor),
                Arc::new(BoolDescriptor),
                Arc::new(NumberDescriptor),
                Arc::new(CharDescriptor),
                Arc::new(TextDescriptor),
            ],
        }
    }

    /// Adds a descriptor ahead of every one registered before it.
    pub fn register(&mut self, descriptor: impl TypeDescriptor + 'static) {
        self.descriptors.insert(0, Arc::new(descriptor));
    }

    /// Registers `T` through its `FromStr` implementation, for arguments
    /// typed [`ValueType::custom::<T>()`](ValueType::custom).
    pub fn register_from_str<T>(&mut self)
    where
        T: FromStr + fmt::Display + Send + Sync + 'static,
        T::Err: fmt::Display,
    {
        self.register(FromStrDescriptor::<T>::new());
    }

    pub fn find(&self, ty: &ValueType) -> Option<&dyn TypeDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.can_support(ty))
            .map(|d| d.as_ref())
    }

    /// Display name of a type; lists read `Text (Multiple)`.
    pub fn display_name(&self, info: &TypeInfo) -> String {
        let name = self
            .find(&info.underlying)
            .map(|d| d.display_name(&info.underlying))
            .unwrap_or_else(|| info.underlying.name().to_string());
        if info.is_list {
            format!("{name} (Multiple)")
        } else {
            name
        }
    }

    /// Converts raw values to a value of `info`.
    ///
    /// Lists convert each raw value; scalars require exactly one.
    pub fn parse(&self, info: &TypeInfo, raw: &[String]) -> Result<Value, String> {
        let descriptor = self
            .find(&info.underlying)
            .ok_or_else(|| format!("no type descriptor supports {}", info.underlying.name()))?;
        if info.is_list {
            return raw
                .iter()
                .map(|r| descriptor.parse(&info.underlying, r))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List);
        }
        match raw {
            [single] => descriptor.parse(&info.underlying, single),
            [] => Ok(info.type_default()),
            _ => Err(format!("expected a single value but got {}", raw.len())),
        }
    }

    /// Fails when an argument of `tree` has a type no descriptor supports.
    pub fn check_tree(&self, tree: &CommandTree) -> Result<(), ConfigError> {
        for command in tree.commands() {
            for id in command.operands.iter().chain(&command.options) {
                let argument = tree.argument(*id);
                if self.find(&argument.type_info.underlying).is_none() {
                    return Err(ConfigError::UnsupportedType {
                        argument: argument.name.clone(),
                        type_name: argument.type_info.underlying.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
