//! The command model: definitions, arities, value types, and the built tree.

pub mod arity;
pub mod definition;
pub mod tree;
pub mod value;

pub use arity::Arity;
pub use definition::{CommandDef, DefaultPayload, DefaultValue, OperandDef, OptionDef};
pub use tree::{
    Argument, ArgumentId, ArgumentKind, BuiltinOption, Command, CommandId, CommandTree,
    OptionNames,
};
pub use value::{CustomValue, FromValue, TypeInfo, Value, ValueType};
