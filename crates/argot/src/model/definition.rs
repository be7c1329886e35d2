//! Builder-style definitions the command tree is built from.
//!
//! Definitions are what an application (or a metadata-discovery layer)
//! hands to [`CommandTree::build`](crate::model::CommandTree::build). They
//! carry no per-run state and are consumed by the build.

use crate::model::arity::Arity;
use crate::model::value::{TypeInfo, Value};

/// Where a default value came from, and its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue {
    /// The source name: `"declared"`, `"EnvVar"`, `"AppSetting"`, ...
    pub source: String,
    /// The lookup key within the source, when there is one.
    pub key: Option<String>,
    pub payload: DefaultPayload,
}

/// The payload of a default value.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultPayload {
    /// Parsed exactly like command-line input.
    Text(String),
    /// Parsed like several command-line values.
    List(Vec<String>),
    /// Assigned directly, or coerced to the argument's type.
    Typed(Value),
}

impl DefaultValue {
    pub fn new(source: impl Into<String>, key: Option<String>, payload: DefaultPayload) -> Self {
        Self {
            source: source.into(),
            key,
            payload,
        }
    }

    /// A default declared on the argument definition.
    pub fn declared(payload: DefaultPayload) -> Self {
        Self::new("declared", None, payload)
    }

    /// The raw strings of a text payload, for display.
    pub fn display_values(&self) -> Vec<String> {
        match &self.payload {
            DefaultPayload::Text(s) => vec![s.clone()],
            DefaultPayload::List(items) => items.clone(),
            DefaultPayload::Typed(v) => vec![v.to_string()],
        }
    }
}

/// A positional argument definition.
#[derive(Debug, Clone)]
pub struct OperandDef {
    pub(crate) name: String,
    pub(crate) type_info: TypeInfo,
    pub(crate) arity: Option<Arity>,
    pub(crate) description: Option<String>,
    pub(crate) default: Option<DefaultPayload>,
    pub(crate) env_var: Option<String>,
    pub(crate) app_setting: Option<String>,
}

impl OperandDef {
    pub fn new(name: impl Into<String>, type_info: TypeInfo) -> Self {
        Self {
            name: name.into(),
            type_info,
            arity: None,
            description: None,
            default: None,
            env_var: None,
            app_setting: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overrides the arity derived from the type.
    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = Some(arity);
        self
    }

    pub fn default_text(mut self, value: impl Into<String>) -> Self {
        self.default = Some(DefaultPayload::Text(value.into()));
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultPayload::Typed(value));
        self
    }

    /// Environment variable consulted when no input is given.
    pub fn env_var(mut self, key: impl Into<String>) -> Self {
        self.env_var = Some(key.into());
        self
    }

    /// App setting key consulted when no input is given.
    pub fn app_setting(mut self, key: impl Into<String>) -> Self {
        self.app_setting = Some(key.into());
        self
    }
}

/// A named argument definition.
#[derive(Debug, Clone)]
pub struct OptionDef {
    pub(crate) name: String,
    pub(crate) short: Option<char>,
    pub(crate) long: Option<String>,
    pub(crate) type_info: TypeInfo,
    pub(crate) arity: Option<Arity>,
    pub(crate) description: Option<String>,
    pub(crate) default: Option<DefaultPayload>,
    pub(crate) inherited: bool,
    pub(crate) hidden: bool,
    pub(crate) env_var: Option<String>,
    pub(crate) app_setting: Option<String>,
}

impl OptionDef {
    /// Creates an option whose long name is `name`.
    pub fn new(name: impl Into<String>, type_info: TypeInfo) -> Self {
        let name = name.into();
        Self {
            long: Some(name.clone()),
            name,
            short: None,
            type_info,
            arity: None,
            description: None,
            default: None,
            inherited: false,
            hidden: false,
            env_var: None,
            app_setting: None,
        }
    }

    /// A bool option; a flag under implicit boolean mode.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, TypeInfo::bool())
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = Some(long.into());
        self
    }

    /// Removes the long name so the option is reachable only by its short name.
    pub fn short_only(mut self) -> Self {
        self.long = None;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = Some(arity);
        self
    }

    pub fn default_text(mut self, value: impl Into<String>) -> Self {
        self.default = Some(DefaultPayload::Text(value.into()));
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultPayload::Typed(value));
        self
    }

    /// Makes the option assignable from every descendant command.
    pub fn inherited(mut self, inherited: bool) -> Self {
        self.inherited = inherited;
        self
    }

    /// Hides the option from help and suggestions.
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn env_var(mut self, key: impl Into<String>) -> Self {
        self.env_var = Some(key.into());
        self
    }

    pub fn app_setting(mut self, key: impl Into<String>) -> Self {
        self.app_setting = Some(key.into());
        self
    }
}

/// A command definition with its arguments and subcommands.
#[derive(Debug, Clone)]
pub struct CommandDef {
    pub(crate) name: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) operands: Vec<OperandDef>,
    pub(crate) options: Vec<OptionDef>,
    pub(crate) subcommands: Vec<CommandDef>,
}

impl CommandDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: None,
            version: None,
            operands: Vec::new(),
            options: Vec::new(),
            subcommands: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares the app version; adds `--version` when set on the root.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn operand(mut self, operand: OperandDef) -> Self {
        self.operands.push(operand);
        self
    }

    pub fn option(mut self, option: OptionDef) -> Self {
        self.options.push(option);
        self
    }

    pub fn subcommand(mut self, command: CommandDef) -> Self {
        self.subcommands.push(command);
        self
    }
}
