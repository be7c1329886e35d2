//! Error types for tree construction, parsing, and binding.

use thiserror::Error;

use crate::model::CommandId;

/// A programming error in the hosting application.
///
/// Raised eagerly while building the command tree or the transformation
/// pipeline; never caused by user input.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Two options on the same command share an alias.
    #[error("duplicate alias '{alias}' on command '{command}'")]
    DuplicateAlias { command: String, alias: String },

    /// An option alias collides with an inherited option of an ancestor.
    #[error("alias '{alias}' on command '{command}' collides with an option inherited from '{ancestor}'")]
    InheritedAliasCollision {
        command: String,
        ancestor: String,
        alias: String,
    },

    /// An operand accepting many values is followed by another operand.
    #[error("operand '{operand}' on command '{command}' accepts many values but is not the last operand")]
    ManyOperandNotLast { command: String, operand: String },

    /// An option was declared without any alias.
    #[error("option '{option}' on command '{command}' has no short or long name")]
    OptionWithoutAlias { command: String, option: String },

    /// Two subcommands of one command share a name or alias.
    #[error("duplicate subcommand '{name}' under '{command}'")]
    DuplicateSubcommand { command: String, name: String },

    /// No registered type descriptor can convert values of this type.
    #[error("no type descriptor supports type '{type_name}' of argument '{argument}'")]
    UnsupportedType { argument: String, type_name: String },

    /// A token transformation failed; argument shape is unknown.
    #[error("transformation failure for: {name}")]
    TransformationFailed {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// More than one option asked to receive piped input.
    #[error("piped input can target only one option but {count} options requested it on '{command}'")]
    AmbiguousPipeTarget { command: String, count: usize },

    /// Settings could not be loaded.
    #[error("invalid settings: {0}")]
    Settings(String),
}

/// A user input error discovered while matching tokens against the tree.
///
/// Every variant carries the command that was current when the error
/// occurred, so the runner can print that command's help.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An option token matched no option visible from the current command.
    #[error("Unrecognized option '{raw}'")]
    UnrecognizedOption { command: CommandId, raw: String },

    /// A value token matched no subcommand and no operand.
    #[error("Unrecognized command or argument '{raw}'")]
    UnrecognizedArgument { command: CommandId, raw: String },

    /// An option received more values than its arity allows.
    #[error("Unexpected value '{value}' for option '{option}'")]
    UnexpectedOptionValue {
        command: CommandId,
        option: String,
        value: String,
    },

    /// An option that needs a value was followed by another option or the end of input.
    #[error("Missing value for option '{option}'")]
    MissingOptionValue { command: CommandId, option: String },
}

impl ParseError {
    /// The command that was current when the error occurred.
    pub fn command(&self) -> CommandId {
        match self {
            ParseError::UnrecognizedOption { command, .. }
            | ParseError::UnrecognizedArgument { command, .. }
            | ParseError::UnexpectedOptionValue { command, .. }
            | ParseError::MissingOptionValue { command, .. } => *command,
        }
    }

    /// The raw text of the token that could not be placed, if any.
    pub fn unrecognized_text(&self) -> Option<&str> {
        match self {
            ParseError::UnrecognizedOption { raw, .. }
            | ParseError::UnrecognizedArgument { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// A value could not be converted to its argument's type.
///
/// Recoverable: the runner reports it and exits with the binding-failure code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failure parsing value for {argument}.  values={}\n{reason}", .values.join(","))]
pub struct ValueParsingError {
    /// Display name of the argument.
    pub argument: String,
    /// The raw values that failed to convert.
    pub values: Vec<String>,
    /// Why conversion failed.
    pub reason: String,
}

impl ValueParsingError {
    pub fn new(argument: impl Into<String>, values: Vec<String>, reason: impl Into<String>) -> Self {
        Self {
            argument: argument.into(),
            values,
            reason: reason.into(),
        }
    }
}

/// Any failure of a full tokenize, parse, and bind run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Value(#[from] ValueParsingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_messages() {
        let err = ParseError::UnrecognizedArgument {
            command: CommandId::ROOT,
            raw: "%".into(),
        };
        assert_eq!(err.to_string(), "Unrecognized command or argument '%'");
        assert_eq!(err.unrecognized_text(), Some("%"));

        let err = ParseError::MissingOptionValue {
            command: CommandId::ROOT,
            option: "operator".into(),
        };
        assert_eq!(err.to_string(), "Missing value for option 'operator'");
        assert_eq!(err.unrecognized_text(), None);
    }

    #[test]
    fn value_parsing_error_lists_values() {
        let err = ValueParsingError::new("x", vec!["a".into(), "b".into()], "not a number");
        assert_eq!(
            err.to_string(),
            "Failure parsing value for x.  values=a,b\nnot a number"
        );
    }
}
