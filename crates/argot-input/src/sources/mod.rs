//! Default-value and piped-input sources.
//!
//! [`EnvVarSource`] and [`AppSettingSource`] implement
//! [`argot::DefaultSource`] and are consulted by the binder, in registration
//! order, before an argument's declared default. [`PipedInput`] drains
//! redirected stdin into lines.

mod app_setting;
mod env;
mod stdin;

pub use app_setting::AppSettingSource;
pub use env::EnvVarSource;
pub use stdin::PipedInput;

use argot::{Argument, CommandTree};

/// Lookup keys derived from an argument's position in the tree.
///
/// Aliases are taken long name first (`--operator`, then `-o`; an operand
/// uses its name). Each alias yields `"{command} {alias}"` and then the
/// bare alias, so the first key set in the source wins.
pub fn convention_keys(tree: &CommandTree, argument: &Argument) -> Vec<String> {
    let aliases: Vec<String> = match argument.option_names() {
        Some(names) => names.prefixed_aliases().into_iter().rev().collect(),
        None => vec![argument.name.clone()],
    };
    let command = &tree.command(argument.command).name;
    aliases
        .into_iter()
        .flat_map(|alias| [format!("{command} {alias}"), alias])
        .collect()
}
