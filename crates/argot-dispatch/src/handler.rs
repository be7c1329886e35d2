//! Command handlers, keyed by dot-separated command path.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use argot::BoundArguments;

use crate::context::RunContext;

/// Function type of a command handler.
///
/// Handlers read their arguments from [`BoundArguments`] and write through
/// `ctx.console`. An error ends the run with exit code 1.
pub type HandlerFn = Rc<dyn Fn(&BoundArguments, &mut RunContext<'_>) -> anyhow::Result<()>>;

/// Converts a command path vector to a dot-separated string.
///
/// For example, `["db", "migrate"]` becomes `"db.migrate"`; the root is `""`.
pub fn path_to_string(path: &[String]) -> String {
    path.join(".")
}

/// Parses a dot-separated command path string into a vector.
pub fn string_to_path(s: &str) -> Vec<String> {
    if s.is_empty() {
        Vec::new()
    } else {
        s.split('.').map(String::from).collect()
    }
}

#[derive(Clone, Default)]
pub(crate) struct HandlerRegistry {
    handlers: HashMap<String, HandlerFn>,
}

impl HandlerRegistry {
    pub(crate) fn insert(&mut self, path: String, handler: HandlerFn) {
        self.handlers.insert(path, handler);
    }

    pub(crate) fn get(&self, path: &[String]) -> Option<&HandlerFn> {
        self.handlers.get(&path_to_string(path))
    }

    pub(crate) fn paths(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<&str> = self.paths().collect();
        paths.sort_unstable();
        f.debug_struct("HandlerRegistry").field("paths", &paths).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_round_trip() {
        assert_eq!(path_to_string(&["db".into(), "migrate".into()]), "db.migrate");
        assert_eq!(string_to_path("db.migrate"), vec!["db", "migrate"]);
        assert!(string_to_path("").is_empty());
        assert_eq!(path_to_string(&[]), "");
    }
}
