//! The immutable command tree.
//!
//! Commands and arguments are stored in two arenas and referenced by
//! [`CommandId`] and [`ArgumentId`]. The tree holds no per-run state, so one
//! tree can serve any number of parses; the values collected during a parse
//! live in the [`ParseResult`](crate::parser::ParseResult), keyed by
//! [`ArgumentId`].

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::error::ConfigError;
use crate::model::arity::Arity;
use crate::model::definition::{CommandDef, DefaultValue, OperandDef, OptionDef};
use crate::model::value::{TypeInfo, ValueType};
use crate::settings::{AppSettings, BooleanMode};

/// Identifies a command within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(usize);

impl CommandId {
    pub const ROOT: CommandId = CommandId(0);
}

/// Identifies an argument within its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgumentId(usize);

/// Options the framework adds on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOption {
    Help,
    Version,
}

/// Names and visibility of an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionNames {
    pub short: Option<char>,
    pub long: Option<String>,
    /// Assignable from descendant commands.
    pub inherited: bool,
    pub hidden: bool,
    pub builtin: Option<BuiltinOption>,
}

impl OptionNames {
    /// Every alias, short first.
    pub fn aliases(&self) -> Vec<String> {
        self.short
            .map(|c| c.to_string())
            .into_iter()
            .chain(self.long.clone())
            .collect()
    }

    /// Aliases with their prefixes: `-o`, `--operator`.
    pub fn prefixed_aliases(&self) -> Vec<String> {
        self.short
            .map(|c| format!("-{c}"))
            .into_iter()
            .chain(self.long.as_ref().map(|l| format!("--{l}")))
            .collect()
    }
}

/// Whether an argument is positional or named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentKind {
    Operand,
    Option(OptionNames),
}

/// A bindable parameter of a command.
#[derive(Debug, Clone)]
pub struct Argument {
    pub id: ArgumentId,
    /// The command that declares the argument.
    pub command: CommandId,
    pub name: String,
    pub kind: ArgumentKind,
    pub arity: Arity,
    pub type_info: TypeInfo,
    pub description: Option<String>,
    /// The default declared on the definition.
    pub default: Option<DefaultValue>,
    pub env_var: Option<String>,
    pub app_setting: Option<String>,
}

impl Argument {
    pub fn is_operand(&self) -> bool {
        matches!(self.kind, ArgumentKind::Operand)
    }

    pub fn is_option(&self) -> bool {
        matches!(self.kind, ArgumentKind::Option(_))
    }

    pub fn option_names(&self) -> Option<&OptionNames> {
        match &self.kind {
            ArgumentKind::Option(names) => Some(names),
            ArgumentKind::Operand => None,
        }
    }

    pub fn builtin(&self) -> Option<BuiltinOption> {
        self.option_names().and_then(|n| n.builtin)
    }

    pub fn is_hidden(&self) -> bool {
        self.option_names().is_some_and(|n| n.hidden)
    }

    /// Aliases an option is matched by; empty for operands.
    pub fn aliases(&self) -> Vec<String> {
        self.option_names().map(OptionNames::aliases).unwrap_or_default()
    }

    /// True when `alias` names this option.
    pub fn has_alias(&self, alias: &str) -> bool {
        match &self.kind {
            ArgumentKind::Option(names) => {
                names.long.as_deref() == Some(alias)
                    || names.short.is_some_and(|c| {
                        let mut chars = alias.chars();
                        chars.next() == Some(c) && chars.next().is_none()
                    })
            }
            ArgumentKind::Operand => false,
        }
    }

    pub fn allowed_values(&self) -> Option<&[String]> {
        self.type_info.allowed_values()
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ArgumentKind::Operand => write!(f, "operand '{}'", self.name),
            ArgumentKind::Option(_) => write!(f, "option '{}'", self.name),
        }
    }
}

/// A node of the command tree.
#[derive(Debug, Clone)]
pub struct Command {
    pub id: CommandId,
    pub name: String,
    pub aliases: Vec<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub parent: Option<CommandId>,
    pub subcommands: Vec<CommandId>,
    /// Positional arguments in declaration order.
    pub operands: Vec<ArgumentId>,
    /// Options declared on this command (inherited ones excluded).
    pub options: Vec<ArgumentId>,
}

impl Command {
    /// True when `text` equals the name or an alias, ignoring case.
    pub fn matches_name(&self, text: &str) -> bool {
        self.name.eq_ignore_ascii_case(text) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(text))
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The static command tree, validated at construction.
#[derive(Debug, Clone)]
pub struct CommandTree {
    commands: Vec<Command>,
    arguments: Vec<Argument>,
}

impl CommandTree {
    /// Builds and validates a tree from its root definition.
    ///
    /// Fails on duplicate option aliases within a command, aliases colliding
    /// with options inherited from an ancestor, duplicate subcommand names,
    /// and list operands that are not the last operand.
    pub fn build(root: CommandDef, settings: &AppSettings) -> Result<Self, ConfigError> {
        let mut tree = CommandTree {
            commands: Vec::new(),
            arguments: Vec::new(),
        };
        tree.add_command(root, None, settings)?;
        tree.add_builtin_options(settings);
        tree.validate()?;
        debug!(
            commands = tree.commands.len(),
            arguments = tree.arguments.len(),
            "built command tree"
        );
        Ok(tree)
    }

    fn add_command(
        &mut self,
        def: CommandDef,
        parent: Option<CommandId>,
        settings: &AppSettings,
    ) -> Result<CommandId, ConfigError> {
        let id = CommandId(self.commands.len());
        self.commands.push(Command {
            id,
            name: def.name,
            aliases: def.aliases,
            description: def.description,
            version: def.version,
            parent,
            subcommands: Vec::new(),
            operands: Vec::new(),
            options: Vec::new(),
        });

        for operand in def.operands {
            let arg = self.push_operand(id, operand);
            self.commands[id.0].operands.push(arg);
        }
        for option in def.options {
            let arg = self.push_option(id, option, settings.boolean_mode)?;
            self.commands[id.0].options.push(arg);
        }
        for sub in def.subcommands {
            let child = self.add_command(sub, Some(id), settings)?;
            self.commands[id.0].subcommands.push(child);
        }
        Ok(id)
    }

    fn push_operand(&mut self, command: CommandId, def: OperandDef) -> ArgumentId {
        let arity = def.arity.unwrap_or_else(|| {
            if def.type_info.is_list {
                Arity::ZeroOrMore
            } else if def.type_info.is_optional || def.default.is_some() {
                Arity::ZeroOrOne
            } else {
                Arity::ExactlyOne
            }
        });
        let id = ArgumentId(self.arguments.len());
        self.arguments.push(Argument {
            id,
            command,
            name: def.name,
            kind: ArgumentKind::Operand,
            arity,
            type_info: def.type_info,
            description: def.description,
            default: def.default.map(DefaultValue::declared),
            env_var: def.env_var,
            app_setting: def.app_setting,
        });
        id
    }

    fn push_option(
        &mut self,
        command: CommandId,
        def: OptionDef,
        mode: BooleanMode,
    ) -> Result<ArgumentId, ConfigError> {
        if def.short.is_none() && def.long.is_none() {
            return Err(ConfigError::OptionWithoutAlias {
                command: self.commands[command.0].name.clone(),
                option: def.name,
            });
        }
        let arity = def.arity.unwrap_or_else(|| {
            let info = &def.type_info;
            if info.is_list {
                Arity::ZeroOrMore
            } else if info.underlying == ValueType::Bool
                && !info.is_optional
                && mode == BooleanMode::Implicit
            {
                Arity::Zero
            } else {
                Arity::ZeroOrOne
            }
        });
        let id = ArgumentId(self.arguments.len());
        self.arguments.push(Argument {
            id,
            command,
            name: def.name,
            kind: ArgumentKind::Option(OptionNames {
                short: def.short,
                long: def.long,
                inherited: def.inherited,
                hidden: def.hidden,
                builtin: None,
            }),
            arity,
            type_info: def.type_info,
            description: def.description,
            default: def.default.map(DefaultValue::declared),
            env_var: def.env_var,
            app_setting: def.app_setting,
        });
        Ok(id)
    }

    fn add_builtin_options(&mut self, settings: &AppSettings) {
        let root = CommandId::ROOT;
        if settings.help_option {
            self.push_builtin(root, "help", Some('h'), BuiltinOption::Help, "Show help information");
        }
        if self.commands[root.0].version.is_some() {
            self.push_builtin(root, "version", None, BuiltinOption::Version, "Show version information");
        }
    }

    fn push_builtin(
        &mut self,
        command: CommandId,
        name: &str,
        short: Option<char>,
        builtin: BuiltinOption,
        description: &str,
    ) {
        let id = ArgumentId(self.arguments.len());
        self.arguments.push(Argument {
            id,
            command,
            name: name.to_string(),
            kind: ArgumentKind::Option(OptionNames {
                short,
                long: Some(name.to_string()),
                inherited: builtin == BuiltinOption::Help,
                hidden: false,
                builtin: Some(builtin),
            }),
            arity: Arity::Zero,
            type_info: TypeInfo::bool(),
            description: Some(description.to_string()),
            default: None,
            env_var: None,
            app_setting: None,
        });
        self.commands[command.0].options.push(id);
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for command in &self.commands {
            self.validate_operands(command)?;
            self.validate_aliases(command)?;
            self.validate_subcommands(command)?;
        }
        Ok(())
    }

    fn validate_operands(&self, command: &Command) -> Result<(), ConfigError> {
        let last = command.operands.len().saturating_sub(1);
        for (idx, id) in command.operands.iter().enumerate() {
            let operand = self.argument(*id);
            if operand.arity.allows_many() && idx != last {
                return Err(ConfigError::ManyOperandNotLast {
                    command: command.name.clone(),
                    operand: operand.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_aliases(&self, command: &Command) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for id in &command.options {
            for alias in self.argument(*id).aliases() {
                if !seen.insert(alias.clone()) {
                    return Err(ConfigError::DuplicateAlias {
                        command: command.name.clone(),
                        alias,
                    });
                }
            }
        }

        for ancestor in self.ancestors(command.id) {
            for inherited in self.inherited_options_of(ancestor) {
                for alias in inherited.aliases() {
                    if seen.contains(&alias) {
                        return Err(ConfigError::InheritedAliasCollision {
                            command: command.name.clone(),
                            ancestor: self.command(ancestor).name.clone(),
                            alias,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_subcommands(&self, command: &Command) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for id in &command.subcommands {
            let sub = self.command(*id);
            for name in std::iter::once(&sub.name).chain(&sub.aliases) {
                if !seen.insert(name.to_lowercase()) {
                    return Err(ConfigError::DuplicateSubcommand {
                        command: command.name.clone(),
                        name: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn root(&self) -> &Command {
        &self.commands[CommandId::ROOT.0]
    }

    pub fn command(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    pub fn argument(&self, id: ArgumentId) -> &Argument {
        &self.arguments[id.0]
    }

    /// Every command, root first, in depth-first declaration order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: CommandId) -> impl Iterator<Item = CommandId> + '_ {
        std::iter::successors(self.command(id).parent, move |c| self.command(*c).parent)
    }

    /// Commands from the root down to `id`, inclusive.
    pub fn path(&self, id: CommandId) -> Vec<CommandId> {
        let mut path: Vec<CommandId> = self.ancestors(id).collect();
        path.reverse();
        path.push(id);
        path
    }

    /// Names from the first subcommand down to `id`; empty for the root.
    pub fn path_names(&self, id: CommandId) -> Vec<String> {
        self.path(id)
            .into_iter()
            .skip(1)
            .map(|c| self.command(c).name.clone())
            .collect()
    }

    /// Finds the subcommand of `id` named `text`, ignoring case.
    pub fn find_subcommand(&self, id: CommandId, text: &str) -> Option<CommandId> {
        self.command(id)
            .subcommands
            .iter()
            .copied()
            .find(|c| self.command(*c).matches_name(text))
    }

    /// Resolves an option alias from `id`.
    ///
    /// Searches the command's own options first, then walks the ancestors,
    /// matching only options marked inherited.
    pub fn find_option(&self, id: CommandId, alias: &str) -> Option<ArgumentId> {
        let own = self
            .command(id)
            .options
            .iter()
            .copied()
            .find(|o| self.argument(*o).has_alias(alias));
        own.or_else(|| {
            self.ancestors(id).find_map(|ancestor| {
                self.inherited_options_of(ancestor)
                    .find(|o| o.has_alias(alias))
                    .map(|o| o.id)
            })
        })
    }

    fn inherited_options_of(&self, id: CommandId) -> impl Iterator<Item = &Argument> {
        self.command(id)
            .options
            .iter()
            .map(|o| self.argument(*o))
            .filter(|o| o.option_names().is_some_and(|n| n.inherited))
    }

    /// Options visible from `id`: its own, then inherited ones nearest first.
    pub fn all_options(&self, id: CommandId, include_inherited: bool) -> Vec<ArgumentId> {
        let mut options = self.command(id).options.clone();
        if include_inherited {
            for ancestor in self.ancestors(id) {
                options.extend(self.inherited_options_of(ancestor).map(|o| o.id));
            }
        }
        options
    }

    /// Arguments bound for an invocation of `id`.
    ///
    /// Walks the path from the root, yielding each command's operands and
    /// then its options, so parent options given before a subcommand are
    /// bound too.
    pub fn arguments_in_scope(&self, id: CommandId) -> Vec<ArgumentId> {
        self.path(id)
            .into_iter()
            .flat_map(|c| {
                let command = self.command(c);
                command
                    .operands
                    .iter()
                    .chain(&command.options)
                    .copied()
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
