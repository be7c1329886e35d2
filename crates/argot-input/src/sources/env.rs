//! Environment variable default source.

use std::sync::Arc;

use argot::{Argument, CommandTree, DefaultPayload, DefaultSource, DefaultValue};
use tracing::trace;

use crate::env::{EnvReader, RealEnv};
use crate::sources::convention_keys;

/// Source label reported in [`DefaultValue::source`].
pub const ENV_VAR: &str = "EnvVar";

/// Reads defaults from environment variables.
///
/// The key declared with `env_var(...)` on the argument is tried first.
/// With [`with_conventions`](Self::with_conventions), keys derived from the
/// command and alias are tried next (see [`convention_keys`]). Empty
/// variables count as unset.
///
/// # Testing
///
/// ```ignore
/// use argot_input::{EnvVarSource, MockEnv};
///
/// let source = EnvVarSource::with_reader(MockEnv::new().with_var("CALC_OP", "*"));
/// ```
#[derive(Clone)]
pub struct EnvVarSource<R: EnvReader = RealEnv> {
    reader: Arc<R>,
    conventions: bool,
}

impl EnvVarSource<RealEnv> {
    pub fn new() -> Self {
        Self::with_reader(RealEnv)
    }
}

impl Default for EnvVarSource<RealEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: EnvReader> EnvVarSource<R> {
    /// Creates a source with a custom reader, usually a mock.
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader: Arc::new(reader),
            conventions: false,
        }
    }

    /// Also try `"{command} {alias}"` and bare alias keys.
    pub fn with_conventions(mut self, enabled: bool) -> Self {
        self.conventions = enabled;
        self
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.reader.var(key).filter(|v| !v.is_empty())
    }
}

impl<R: EnvReader> DefaultSource for EnvVarSource<R> {
    fn default_for(&self, tree: &CommandTree, argument: &Argument) -> Option<DefaultValue> {
        let mut keys: Vec<String> = argument.env_var.iter().cloned().collect();
        if self.conventions {
            keys.extend(convention_keys(tree, argument));
        }
        keys.into_iter().find_map(|key| {
            let value = self.lookup(&key)?;
            trace!(argument = %argument.name, key = %key, "default from environment");
            Some(DefaultValue::new(ENV_VAR, Some(key), DefaultPayload::Text(value)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockEnv;
    use argot::{AppSettings, CommandDef, CommandId, OptionDef, TypeInfo};

    fn tree() -> CommandTree {
        CommandTree::build(
            CommandDef::new("calc").subcommand(
                CommandDef::new("add").option(
                    OptionDef::new("operator", TypeInfo::text())
                        .short('o')
                        .env_var("CALC_OPERATOR"),
                ),
            ),
            &AppSettings::default(),
        )
        .unwrap()
    }

    fn operator(tree: &CommandTree) -> &Argument {
        let add = tree.find_subcommand(CommandId::ROOT, "add").unwrap();
        tree.argument(tree.find_option(add, "o").unwrap())
    }

    #[test]
    fn declared_key() {
        let tree = tree();
        let source = EnvVarSource::with_reader(MockEnv::new().with_var("CALC_OPERATOR", "*"));
        let default = source.default_for(&tree, operator(&tree)).unwrap();
        assert_eq!(default.source, ENV_VAR);
        assert_eq!(default.key.as_deref(), Some("CALC_OPERATOR"));
        assert_eq!(default.payload, DefaultPayload::Text("*".into()));
    }

    #[test]
    fn empty_value_is_unset() {
        let tree = tree();
        let source = EnvVarSource::with_reader(MockEnv::new().with_var("CALC_OPERATOR", ""));
        assert!(source.default_for(&tree, operator(&tree)).is_none());
    }

    #[test]
    fn conventions_are_opt_in() {
        let tree = tree();
        let env = MockEnv::new().with_var("add --operator", "-").with_var("--operator", "/");
        let plain = EnvVarSource::with_reader(env.clone());
        assert!(plain.default_for(&tree, operator(&tree)).is_none());

        let source = EnvVarSource::with_reader(env).with_conventions(true);
        let default = source.default_for(&tree, operator(&tree)).unwrap();
        assert_eq!(default.key.as_deref(), Some("add --operator"));
    }

    #[test]
    fn long_name_keys_win_over_short_ones() {
        let tree = tree();
        let env = MockEnv::new().with_var("add -o", "*").with_var("--operator", "/");
        let source = EnvVarSource::with_reader(env).with_conventions(true);
        let default = source.default_for(&tree, operator(&tree)).unwrap();
        assert_eq!(default.key.as_deref(), Some("--operator"));
        assert_eq!(default.payload, DefaultPayload::Text("/".into()));
    }
}
