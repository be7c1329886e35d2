//! The token transformation pipeline.
//!
//! Transformations rewrite the token stream between tokenizing and parsing.
//! Two built-ins always run: assignment splitting first and clubbed-flag
//! expansion last. User transformations run between them, stable-sorted by
//! their `order`, so they see assignments already split but clubbed runs
//! still intact.

use std::error::Error;
use std::fmt;

use tracing::debug;

use crate::error::ConfigError;
use crate::token::{OptionPrefix, Token, Tokens};

/// Error type a transformation may fail with.
pub type TransformError = Box<dyn Error + Send + Sync + 'static>;

type TransformFn = Box<dyn Fn(&Tokens) -> Result<Tokens, TransformError> + Send + Sync>;

/// Name of the built-in stage splitting `--opt=value` into two tokens.
pub const SPLIT_ASSIGNMENTS: &str = "split-option-assignments";
/// Name of the built-in stage expanding `-abc` into `-a -b -c`.
pub const EXPAND_CLUBBED_FLAGS: &str = "expand-clubbed-flags";

/// A named, ordered rewrite of the token stream.
pub struct TokenTransformation {
    name: String,
    order: i32,
    f: TransformFn,
}

impl TokenTransformation {
    pub fn new<F>(name: impl Into<String>, order: i32, f: F) -> Self
    where
        F: Fn(&Tokens) -> Result<Tokens, TransformError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            order,
            f: Box::new(f),
        }
    }

    /// A transformation that cannot fail, applied token by token.
    ///
    /// Directives and separated tokens pass through untouched when the
    /// corresponding skip flag is set.
    pub fn per_token<F>(
        name: impl Into<String>,
        order: i32,
        skip_directives: bool,
        skip_separated: bool,
        f: F,
    ) -> Self
    where
        F: Fn(&Token) -> Vec<Token> + Send + Sync + 'static,
    {
        Self::new(name, order, move |tokens: &Tokens| {
            Ok(tokens.transform(skip_directives, skip_separated, &f))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn apply(&self, tokens: &Tokens) -> Result<Tokens, TransformError> {
        (self.f)(tokens)
    }
}

impl fmt::Debug for TokenTransformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenTransformation")
            .field("name", &self.name)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Receives `(stage name, before, after)` for every stage that ran.
pub type TransformObserver<'a> = &'a mut dyn FnMut(&str, &Tokens, &Tokens);

/// The ordered set of transformations applied before parsing.
#[derive(Debug)]
pub struct TransformationPipeline {
    split: TokenTransformation,
    user: Vec<TokenTransformation>,
    expand: TokenTransformation,
}

impl Default for TransformationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformationPipeline {
    /// A pipeline holding only the built-in stages.
    pub fn new() -> Self {
        Self {
            split: split_option_assignments(),
            user: Vec::new(),
            expand: expand_clubbed_flags(),
        }
    }

    /// Registers a user transformation.
    pub fn add(&mut self, transformation: TokenTransformation) {
        self.user.push(transformation);
        // stable: equal orders keep registration order
        self.user.sort_by_key(|t| t.order);
    }

    pub fn with(mut self, transformation: TokenTransformation) -> Self {
        self.add(transformation);
        self
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages().map(TokenTransformation::name).collect()
    }

    fn stages(&self) -> impl Iterator<Item = &TokenTransformation> {
        std::iter::once(&self.split)
            .chain(self.user.iter())
            .chain(std::iter::once(&self.expand))
    }

    /// Runs every stage in order.
    pub fn run(&self, tokens: Tokens) -> Result<Tokens, ConfigError> {
        self.run_observed(tokens, &mut |_, _, _| {})
    }

    /// Runs every stage in order, reporting each stage to `observer`.
    ///
    /// A failing stage aborts the pipeline with
    /// [`ConfigError::TransformationFailed`].
    pub fn run_observed(
        &self,
        tokens: Tokens,
        observer: TransformObserver<'_>,
    ) -> Result<Tokens, ConfigError> {
        let mut current = tokens;
        for stage in self.stages() {
            let next = stage
                .apply(&current)
                .map_err(|source| ConfigError::TransformationFailed {
                    name: stage.name.clone(),
                    source,
                })?;
            if next != current {
                debug!(stage = %stage.name, before = current.len(), after = next.len(), "transformed tokens");
            }
            observer(&stage.name, &current, &next);
            current = next;
        }
        Ok(current)
    }
}

/// Rewrites `--opt=value`, `--opt:value`, and `-o=value` into an option
/// token followed by a value token.
pub fn split_option_assignments() -> TokenTransformation {
    TokenTransformation::per_token(SPLIT_ASSIGNMENTS, i32::MIN, true, true, |token| {
        match &token.option {
            Some(opt) if opt.has_assignment() => {
                let bare = Token::option(opt.prefixed_name(), opt.prefix, opt.name.clone(), None);
                let value = Token::assigned_value(opt.assignment.clone().unwrap_or_default());
                vec![bare, value]
            }
            _ => vec![token.clone()],
        }
    })
}

/// Rewrites a clubbed short run `-abc` into `-a -b -c`.
///
/// Expansion is purely syntactic: whether each letter names a flag is for
/// the parser to decide. Already-expanded streams pass through unchanged.
pub fn expand_clubbed_flags() -> TokenTransformation {
    TokenTransformation::per_token(EXPAND_CLUBBED_FLAGS, i32::MAX, true, true, |token| {
        match &token.option {
            Some(opt) if opt.is_clubbed() && !opt.has_assignment() => opt
                .name
                .chars()
                .map(|c| Token::option(format!("-{c}"), OptionPrefix::Short, c.to_string(), None))
                .collect(),
            _ => vec![token.clone()],
        }
    })
}
