//! Converts raw process arguments into a [`Tokens`] stream.
//!
//! Tokenizing is a pure function of its input: the same argument array always
//! produces the same token sequence. No tree lookups happen here; clubbed
//! short options and inline assignments are only *recognized* and captured
//! as structure, the rewriting happens in the transformation pipeline.

use tracing::trace;

use crate::token::{OptionPrefix, Token, Tokens};

/// Tokenizes a raw argument array.
///
/// - Leading `[name]` / `[name:value]` arguments become directives when
///   `directives_enabled` is set. Bracket syntax anywhere else is a value.
/// - A lone `--` ends option processing; everything after it is a value.
/// - `--name` is a long option, `-x` a short option, `-xyz` a clubbed run.
/// - `-` followed by a digit is a value, so negative numbers pass through.
pub fn tokenize<I, S>(args: I, directives_enabled: bool) -> Tokens
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut arguments = Vec::new();
    let mut separated = Vec::new();
    let mut in_directive_zone = directives_enabled;
    let mut after_separator = false;

    for arg in args {
        let arg = arg.as_ref();

        if after_separator {
            separated.push(tokenize_value(arg));
            continue;
        }

        if in_directive_zone && is_directive_syntax(arg) {
            arguments.push(Token::directive(arg));
            continue;
        }
        in_directive_zone = false;

        if arg == "--" {
            after_separator = true;
            continue;
        }

        arguments.push(tokenize_argument(arg));
    }

    trace!(
        count = arguments.len(),
        separated = separated.len(),
        "tokenized input"
    );

    if after_separator {
        Tokens::with_separated(arguments, separated)
    } else {
        Tokens::new(arguments)
    }
}

/// Tokenizes a single argument that is known not to be a directive or separator.
pub fn tokenize_argument(arg: &str) -> Token {
    tokenize_option(arg).unwrap_or_else(|| tokenize_value(arg))
}

/// Creates a value token regardless of the argument's shape.
pub fn tokenize_value(arg: &str) -> Token {
    Token::value(arg)
}

/// Tokenizes `arg` as an option, or returns `None` when it is not option-shaped.
pub fn tokenize_option(arg: &str) -> Option<Token> {
    if let Some(rest) = arg.strip_prefix("--") {
        if rest.is_empty() {
            return None;
        }
        let (name, assignment) = split_assignment(rest);
        return Some(Token::option(arg, OptionPrefix::Long, name, assignment));
    }

    let rest = arg.strip_prefix('-')?;
    let first = rest.chars().next()?;
    if first.is_ascii_digit() || (first == '.' && rest[1..].starts_with(|c: char| c.is_ascii_digit()))
    {
        // negative number
        return None;
    }

    let (name, assignment) = split_assignment(rest);
    if name.is_empty() {
        return None;
    }
    Some(Token::option(arg, OptionPrefix::Short, name, assignment))
}

fn is_directive_syntax(arg: &str) -> bool {
    arg.len() > 2 && arg.starts_with('[') && arg.ends_with(']')
}

/// Splits `name=value` / `name:value` at the first assignment character.
fn split_assignment(rest: &str) -> (String, Option<String>) {
    match rest.find(['=', ':']) {
        Some(idx) => (rest[..idx].to_string(), Some(rest[idx + 1..].to_string())),
        None => (rest.to_string(), None),
    }
}
