//! Matches a transformed token stream against the command tree.
//!
//! The parser walks the tokens once, left to right. It tracks the current
//! command (starting at the root), an option waiting for its value, and an
//! operand cursor. The cursor parks on a list operand, so every following
//! bare value accumulates there until an option or subcommand name appears.
//!
//! A bare value equal to a subcommand name (or alias, ignoring case) always
//! descends into that subcommand, even when an operand could take it.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::ParseError;
use crate::model::{ArgumentId, BuiltinOption, CommandId, CommandTree};
use crate::settings::AppSettings;
use crate::token::{Token, TokenType, Tokens};

/// Where an input value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueSource {
    /// The command line.
    Argument,
    /// Redirected stdin.
    Piped,
    /// Answered at an interactive prompt.
    Prompt,
}

/// A batch of raw user-supplied values from one source.
///
/// Values looked up from the environment or app settings are defaults, not
/// input; the binder reports those through [`ValueOrigin`](crate::bind::ValueOrigin).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputValue {
    pub source: ValueSource,
    pub values: Vec<String>,
}

impl InputValue {
    pub fn new(source: ValueSource, values: Vec<String>) -> Self {
        Self { source, values }
    }
}

/// Per-run input values, keyed by argument.
///
/// This table is the only mutable state of a run; the tree stays untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentValues {
    inputs: BTreeMap<ArgumentId, Vec<InputValue>>,
}

impl ArgumentValues {
    /// Appends one value, extending the last batch when it has the same source.
    pub fn push(&mut self, id: ArgumentId, source: ValueSource, value: impl Into<String>) {
        let batches = self.inputs.entry(id).or_default();
        match batches.last_mut() {
            Some(last) if last.source == source => last.values.push(value.into()),
            _ => batches.push(InputValue::new(source, vec![value.into()])),
        }
    }

    /// Appends a whole batch.
    pub fn push_batch(&mut self, id: ArgumentId, input: InputValue) {
        self.inputs.entry(id).or_default().push(input);
    }

    /// Every batch recorded for `id`, in insertion order.
    pub fn inputs(&self, id: ArgumentId) -> &[InputValue] {
        self.inputs.get(&id).map(Vec::as_slice).unwrap_or_default()
    }

    /// True when the user supplied anything for `id`.
    pub fn has_user_input(&self, id: ArgumentId) -> bool {
        self.inputs(id).iter().any(|i| !i.values.is_empty())
    }

    /// User-supplied raw values, concatenated in insertion order.
    pub fn user_values(&self, id: ArgumentId) -> Vec<String> {
        self.inputs(id)
            .iter()
            .flat_map(|i| i.values.iter().cloned())
            .collect()
    }

    /// Removes every value equal to `value` from the batches of `id`,
    /// dropping batches left empty. Returns whether anything was removed.
    pub fn remove_value(&mut self, id: ArgumentId, value: &str) -> bool {
        let Some(batches) = self.inputs.get_mut(&id) else {
            return false;
        };
        let before: usize = batches.iter().map(|b| b.values.len()).sum();
        for batch in batches.iter_mut() {
            batch.values.retain(|v| v != value);
        }
        batches.retain(|b| !b.values.is_empty());
        let after: usize = batches.iter().map(|b| b.values.len()).sum();
        before != after
    }

    /// Arguments with at least one input batch.
    pub fn ids(&self) -> impl Iterator<Item = ArgumentId> + '_ {
        self.inputs.keys().copied()
    }
}

/// The outcome of a successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// The deepest command reached.
    pub target: CommandId,
    pub values: ArgumentValues,
    /// Tokens left unmatched in lenient mode, followed by the separated tail.
    pub unparsed: Vec<Token>,
    /// Raw values after `--`.
    pub separated: Vec<String>,
    /// `-h|--help` was seen; parsing stopped there.
    pub help_requested: bool,
    /// `--version` was seen; parsing stopped there.
    pub version_requested: bool,
}

impl ParseResult {
    /// The raw text of every unparsed token.
    pub fn unparsed_raw(&self) -> Vec<&str> {
        self.unparsed.iter().map(|t| t.raw.as_str()).collect()
    }
}

/// Matches tokens against a [`CommandTree`].
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    tree: &'a CommandTree,
    settings: &'a AppSettings,
}

struct ParseState {
    command: CommandId,
    pending: Option<ArgumentId>,
    operand_cursor: usize,
    /// Set in lenient mode after the first unplaceable token.
    cut_off: bool,
    /// The flag just seen, which must not receive an assigned value.
    last_flag: Option<ArgumentId>,
}

impl<'a> Parser<'a> {
    pub fn new(tree: &'a CommandTree, settings: &'a AppSettings) -> Self {
        Self { tree, settings }
    }

    /// Parses a transformed token stream. Directive tokens are skipped.
    pub fn parse(&self, tokens: &Tokens) -> Result<ParseResult, ParseError> {
        let mut state = ParseState {
            command: CommandId::ROOT,
            pending: None,
            operand_cursor: 0,
            cut_off: false,
            last_flag: None,
        };
        let mut result = ParseResult {
            target: CommandId::ROOT,
            values: ArgumentValues::default(),
            unparsed: Vec::new(),
            separated: tokens.separated().iter().map(|t| t.raw.clone()).collect(),
            help_requested: false,
            version_requested: false,
        };

        for token in tokens.without_directives() {
            if state.cut_off {
                result.unparsed.push(token.clone());
                continue;
            }
            match token.token_type {
                TokenType::Option => {
                    if self.on_option(token, &mut state, &mut result)? {
                        break;
                    }
                }
                TokenType::Value => self.on_value(token, &mut state, &mut result)?,
                // a separator never reaches the argument list and
                // directives are filtered above
                TokenType::Separator | TokenType::Directive => {}
            }
        }

        if !(result.help_requested || result.version_requested) {
            if let Some(pending) = state.pending {
                return Err(ParseError::MissingOptionValue {
                    command: state.command,
                    option: self.tree.argument(pending).name.clone(),
                });
            }
        }

        result.target = state.command;
        result.unparsed.extend(tokens.separated().iter().cloned());
        debug!(
            target_command = %self.tree.command(result.target).name,
            unparsed = result.unparsed.len(),
            "parsed input"
        );
        Ok(result)
    }

    /// Handles an option token. Returns true when parsing should stop.
    fn on_option(
        &self,
        token: &Token,
        state: &mut ParseState,
        result: &mut ParseResult,
    ) -> Result<bool, ParseError> {
        let alias = token.option.as_ref().map_or(token.value.as_str(), |o| o.name.as_str());
        let found = self.tree.find_option(state.command, alias);

        if let Some(id) = found {
            match self.tree.argument(id).builtin() {
                Some(BuiltinOption::Help) => {
                    result.help_requested = true;
                    return Ok(true);
                }
                Some(BuiltinOption::Version) => {
                    result.version_requested = true;
                    return Ok(true);
                }
                None => {}
            }
        }

        if let Some(pending) = state.pending {
            return Err(ParseError::MissingOptionValue {
                command: state.command,
                option: self.tree.argument(pending).name.clone(),
            });
        }

        state.last_flag = None;
        let Some(id) = found else {
            if self.settings.is_strict() {
                return Err(ParseError::UnrecognizedOption {
                    command: state.command,
                    raw: token.raw.clone(),
                });
            }
            trace!(raw = %token.raw, "unrecognized option, remaining tokens left unparsed");
            result.unparsed.push(token.clone());
            state.cut_off = true;
            return Ok(false);
        };

        let option = self.tree.argument(id);
        if option.arity.allows_none() {
            if !result.values.has_user_input(id) {
                result.values.push(id, ValueSource::Argument, "true");
            }
            state.last_flag = Some(id);
            trace!(option = %option.name, "flag set");
        } else {
            state.pending = Some(id);
        }
        Ok(false)
    }

    fn on_value(
        &self,
        token: &Token,
        state: &mut ParseState,
        result: &mut ParseResult,
    ) -> Result<(), ParseError> {
        if let (true, Some(flag)) = (token.assigned, state.last_flag.take()) {
            return Err(ParseError::UnexpectedOptionValue {
                command: state.command,
                option: self.tree.argument(flag).name.clone(),
                value: token.raw.clone(),
            });
        }

        if let Some(pending) = state.pending.take() {
            let option = self.tree.argument(pending);
            if !option.arity.allows_many() && result.values.has_user_input(pending) {
                return Err(ParseError::UnexpectedOptionValue {
                    command: state.command,
                    option: option.name.clone(),
                    value: token.raw.clone(),
                });
            }
            trace!(option = %option.name, "option value assigned");
            result.values.push(pending, ValueSource::Argument, token.value.clone());
            return Ok(());
        }

        if let Some(sub) = self.tree.find_subcommand(state.command, &token.value) {
            debug!(command = %self.tree.command(sub).name, "descending into subcommand");
            state.command = sub;
            state.operand_cursor = 0;
            return Ok(());
        }

        let operands = &self.tree.command(state.command).operands;
        if let Some(&id) = operands.get(state.operand_cursor) {
            let operand = self.tree.argument(id);
            trace!(operand = %operand.name, "operand value assigned");
            result.values.push(id, ValueSource::Argument, token.value.clone());
            if !operand.arity.allows_many() {
                state.operand_cursor += 1;
            }
            return Ok(());
        }

        if self.settings.is_strict() {
            return Err(ParseError::UnrecognizedArgument {
                command: state.command,
                raw: token.raw.clone(),
            });
        }
        trace!(raw = %token.raw, "unexpected value, remaining tokens left unparsed");
        result.unparsed.push(token.clone());
        state.cut_off = true;
        Ok(())
    }
}
