//! Per-run state shared by middleware and handlers.
//!
//! # App State vs Extensions
//!
//! | Field | Mutability | Lifetime | Purpose |
//! |-------|------------|----------|---------|
//! | `app_state` | Immutable | The runner's lifetime | Database, config, API clients |
//! | `extensions` | Mutable | One run | Values injected by middleware |
//!
//! ```
//! use argot_dispatch::Extensions;
//!
//! struct UserScope { user_id: u64 }
//!
//! let mut extensions = Extensions::new();
//! extensions.insert(UserScope { user_id: 7 });
//! assert_eq!(extensions.get::<UserScope>().map(|s| s.user_id), Some(7));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use argot::{BoundArguments, CommandTree, ParseError, ParseResult, Tokens};

use crate::console::Console;
use crate::runner::AppRunner;

/// A type-keyed map for injecting state into middleware and handlers.
///
/// Cloning yields an empty map; wrap shared values in `Rc` or `Arc`.
#[derive(Default)]
pub struct Extensions {
    map: HashMap<TypeId, Box<dyn Any>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value of the same type.
    pub fn insert<T: 'static>(&mut self, val: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(val))
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut())
    }

    /// Like [`get`](Self::get), but missing values are an error.
    pub fn get_required<T: 'static>(&self) -> Result<&T, anyhow::Error> {
        self.get::<T>().ok_or_else(|| {
            anyhow::anyhow!(
                "Extension missing: type {} not found in context",
                std::any::type_name::<T>()
            )
        })
    }

    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

impl Clone for Extensions {
    fn clone(&self) -> Self {
        // Box<dyn Any> is not Clone
        Self::new()
    }
}

/// The token stream after one transformation stage.
#[derive(Debug, Clone)]
pub struct TransformStep {
    pub name: String,
    pub tokens: Tokens,
    /// The stage produced a stream different from its input.
    pub changed: bool,
}

/// State of one run, threaded through every middleware stage.
///
/// Fields fill in as the run advances: `shell_tokens` after tokenizing,
/// `tokens` after transformation, `parse` after parsing, and `bound` after
/// binding.
pub struct RunContext<'a> {
    pub app: &'a AppRunner,
    /// The arguments the process received, without the program name.
    pub original_args: Vec<String>,
    pub shell_tokens: Tokens,
    pub transformations: Vec<TransformStep>,
    pub tokens: Tokens,
    pub parse: Option<Result<ParseResult, ParseError>>,
    pub bound: Option<BoundArguments>,
    pub console: &'a mut dyn Console,
    pub extensions: Extensions,
    pub app_state: Rc<Extensions>,
}

impl<'a> RunContext<'a> {
    pub(crate) fn new(app: &'a AppRunner, args: Vec<String>, console: &'a mut dyn Console) -> Self {
        Self {
            app,
            original_args: args,
            shell_tokens: Tokens::default(),
            transformations: Vec::new(),
            tokens: Tokens::default(),
            parse: None,
            bound: None,
            console,
            extensions: Extensions::new(),
            app_state: app.app_state(),
        }
    }

    pub fn tree(&self) -> &'a CommandTree {
        self.app.tree()
    }

    /// The successful parse, if parsing ran and succeeded.
    pub fn parse_result(&self) -> Option<&ParseResult> {
        self.parse.as_ref().and_then(|p| p.as_ref().ok())
    }

    pub fn parse_result_mut(&mut self) -> Option<&mut ParseResult> {
        self.parse.as_mut().and_then(|p| p.as_mut().ok())
    }

    /// Names of the target command's path, root excluded.
    pub fn command_path(&self) -> Vec<String> {
        self.parse_result()
            .map(|p| self.tree().path_names(p.target))
            .unwrap_or_default()
    }

    /// Directive contents by name, from the shell tokens.
    pub fn directive(&self, name: &str) -> Option<&str> {
        if !self.app.settings().directives_enabled() {
            return None;
        }
        self.shell_tokens.directive(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Database {
        url: String,
    }

    #[test]
    fn test_extensions_insert_get_remove() {
        let mut ext = Extensions::new();
        assert!(ext.is_empty());
        ext.insert(Database { url: "pg".into() });
        assert!(ext.contains::<Database>());
        assert_eq!(ext.get::<Database>().map(|d| d.url.as_str()), Some("pg"));

        if let Some(db) = ext.get_mut::<Database>() {
            db.url = "sqlite".into();
        }
        assert_eq!(ext.remove::<Database>(), Some(Database { url: "sqlite".into() }));
        assert!(!ext.contains::<Database>());
    }

    #[test]
    fn test_extensions_insert_replaces() {
        let mut ext = Extensions::new();
        assert_eq!(ext.insert(1u32), None);
        assert_eq!(ext.insert(2u32), Some(1));
        assert_eq!(ext.len(), 1);
    }

    #[test]
    fn test_extensions_get_required_names_type() {
        let ext = Extensions::new();
        let err = ext.get_required::<Database>().unwrap_err();
        assert!(err.to_string().contains("Database"));
    }

    #[test]
    fn test_extensions_clone_is_empty() {
        let mut ext = Extensions::new();
        ext.insert(5i32);
        assert!(ext.clone().is_empty());
    }
}
