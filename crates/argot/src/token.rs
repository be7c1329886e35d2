//! Token types produced by the tokenizer.
//!
//! A [`Token`] is an immutable unit of input. Every raw argument produces
//! exactly one token; transformations may later expand or split tokens.
//! [`Tokens`] keeps the tokens before the `--` separator apart from the
//! separated tail so that transformations and the parser never have to
//! re-discover the boundary.

use std::fmt;

use serde::Serialize;

/// The kind of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    /// `[name]` or `[name:value]` at the start of the input.
    Directive,
    /// `-x`, `--long`, `-abc`, `--opt=value`.
    Option,
    /// Anything else, including every token after the separator.
    Value,
    /// A lone `--`.
    Separator,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::Directive => "Directive",
            TokenType::Option => "Option",
            TokenType::Value => "Value",
            TokenType::Separator => "Separator",
        };
        // pad so `{:<9}` alignment works through Display
        f.pad(name)
    }
}

/// Prefix style of an option token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OptionPrefix {
    /// A single dash: `-x`, `-abc`.
    Short,
    /// A double dash: `--name`.
    Long,
}

/// Structure captured for option tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OptionToken {
    /// How the option was prefixed.
    pub prefix: OptionPrefix,
    /// The option name without prefix and without any assigned value.
    pub name: String,
    /// The inline value of `--opt=value` or `--opt:value`.
    pub assignment: Option<String>,
}

impl OptionToken {
    /// A short option with more than one character is a clubbed run (`-abc`).
    pub fn is_clubbed(&self) -> bool {
        self.prefix == OptionPrefix::Short && self.name.chars().count() > 1
    }

    /// True when the token carried an inline value.
    pub fn has_assignment(&self) -> bool {
        self.assignment.is_some()
    }

    /// Renders the option back to its prefixed form, without the assignment.
    pub fn prefixed_name(&self) -> String {
        match self.prefix {
            OptionPrefix::Short => format!("-{}", self.name),
            OptionPrefix::Long => format!("--{}", self.name),
        }
    }
}

/// An immutable unit of input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    /// The text exactly as typed by the user.
    pub raw: String,
    /// The payload: directive contents, option name, or the value itself.
    pub value: String,
    /// What kind of token this is.
    pub token_type: TokenType,
    /// Option structure; present only for [`TokenType::Option`].
    pub option: Option<OptionToken>,
    /// A value split off `--opt=value`; it belongs to the preceding option only.
    pub assigned: bool,
}

impl Token {
    /// Creates a value token whose payload is the raw text.
    pub fn value(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            value: raw.clone(),
            raw,
            token_type: TokenType::Value,
            option: None,
            assigned: false,
        }
    }

    /// Creates the value half of a split `--opt=value` assignment.
    pub fn assigned_value(raw: impl Into<String>) -> Self {
        Self {
            assigned: true,
            ..Self::value(raw)
        }
    }

    /// Creates the `--` separator token.
    pub fn separator() -> Self {
        Self {
            raw: "--".to_string(),
            value: "--".to_string(),
            token_type: TokenType::Separator,
            option: None,
            assigned: false,
        }
    }

    /// Creates a directive token. `raw` must include the brackets.
    pub fn directive(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let value = raw
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        Self {
            raw,
            value,
            token_type: TokenType::Directive,
            option: None,
            assigned: false,
        }
    }

    /// Creates an option token from its parts.
    pub fn option(
        raw: impl Into<String>,
        prefix: OptionPrefix,
        name: impl Into<String>,
        assignment: Option<String>,
    ) -> Self {
        let name = name.into();
        Self {
            raw: raw.into(),
            value: name.clone(),
            token_type: TokenType::Option,
            option: Some(OptionToken {
                prefix,
                name,
                assignment,
            }),
            assigned: false,
        }
    }

    pub fn is_option(&self) -> bool {
        self.token_type == TokenType::Option
    }

    pub fn is_value(&self) -> bool {
        self.token_type == TokenType::Value
    }

    pub fn is_directive(&self) -> bool {
        self.token_type == TokenType::Directive
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.token_type, self.raw)
    }
}

/// An ordered token stream split at the first separator.
///
/// `arguments` holds everything before `--` (directives included);
/// `separated` holds everything after it, always as value tokens.
/// The separator token itself is not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tokens {
    arguments: Vec<Token>,
    separated: Vec<Token>,
    has_separator: bool,
}

impl Tokens {
    /// Creates a token stream without a separator.
    pub fn new(arguments: Vec<Token>) -> Self {
        Self {
            arguments,
            separated: Vec::new(),
            has_separator: false,
        }
    }

    /// Creates a token stream with a separated tail.
    pub fn with_separated(arguments: Vec<Token>, separated: Vec<Token>) -> Self {
        Self {
            arguments,
            separated,
            has_separator: true,
        }
    }

    /// Tokens before the separator.
    pub fn arguments(&self) -> &[Token] {
        &self.arguments
    }

    /// Tokens after the separator.
    pub fn separated(&self) -> &[Token] {
        &self.separated
    }

    /// True when a `--` appeared in the input.
    pub fn has_separator(&self) -> bool {
        self.has_separator
    }

    /// Leading directive tokens.
    pub fn directives(&self) -> impl Iterator<Item = &Token> {
        self.arguments.iter().take_while(|t| t.is_directive())
    }

    /// Tokens before the separator, without directives.
    pub fn without_directives(&self) -> impl Iterator<Item = &Token> {
        self.arguments.iter().filter(|t| !t.is_directive())
    }

    /// Looks up a directive by name.
    ///
    /// Matches `[name]` and `[name:...]`, returning the full directive
    /// contents (`"suggest:3"` for `[suggest:3]`).
    pub fn directive(&self, name: &str) -> Option<&str> {
        self.directives()
            .map(|t| t.value.as_str())
            .find(|v| *v == name || v.strip_prefix(name).is_some_and(|rest| rest.starts_with(':')))
    }

    /// Total token count, counting the separator when present.
    pub fn len(&self) -> usize {
        self.arguments.len() + self.separated.len() + usize::from(self.has_separator)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates every token in input order, separator included.
    pub fn iter_all(&self) -> impl Iterator<Item = Token> + '_ {
        let separator = self.has_separator.then(Token::separator);
        self.arguments
            .iter()
            .cloned()
            .chain(separator)
            .chain(self.separated.iter().cloned())
    }

    /// Applies a per-token transformation, producing a new stream.
    ///
    /// Directives are passed through unchanged when `skip_directives` is set,
    /// and separated tokens when `skip_separated` is set.
    pub fn transform<F>(&self, skip_directives: bool, skip_separated: bool, mut f: F) -> Tokens
    where
        F: FnMut(&Token) -> Vec<Token>,
    {
        let mut apply = |tokens: &[Token], skip: &dyn Fn(&Token) -> bool| -> Vec<Token> {
            tokens
                .iter()
                .flat_map(|t| if skip(t) { vec![t.clone()] } else { f(t) })
                .collect()
        };

        let arguments = apply(&self.arguments, &|t: &Token| {
            skip_directives && t.is_directive()
        });
        let separated = apply(&self.separated, &|_: &Token| skip_separated);

        Tokens {
            arguments,
            separated,
            has_separator: self.has_separator,
        }
    }

    /// Removes leading directives, returning the stream the parser consumes.
    pub fn strip_directives(&self) -> Tokens {
        Tokens {
            arguments: self.without_directives().cloned().collect(),
            separated: self.separated.clone(),
            has_separator: self.has_separator,
        }
    }
}
