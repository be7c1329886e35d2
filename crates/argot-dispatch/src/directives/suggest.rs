//! The `[suggest]` directive: completion candidates for shell integration.
//!
//! `[suggest]` considers every argument; `[suggest:N]` only the first `N`.
//! Candidates are printed one per line: subcommand names and aliases
//! (sorted), visible option aliases (sorted), then the allowed values of
//! the next unfilled enum operand. When the input ends in a token that
//! could not be placed, only candidates starting with its text are shown.

use argot::{tokenize, CommandId, CommandTree, ParseError, ParseResult, Parser};
use tracing::debug;

use crate::context::RunContext;
use crate::exit_code;
use crate::pipeline::Flow;

pub(crate) const NAME: &str = "suggest";

pub(crate) fn stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    let Some(contents) = ctx.directive(NAME) else {
        return Ok(Flow::Continue);
    };
    let position = contents
        .split_once(':')
        .and_then(|(_, n)| n.trim().parse::<usize>().ok());

    let parse = match position {
        Some(n) => reparse_prefix(ctx, n)?,
        None => match &ctx.parse {
            Some(parse) => parse.clone(),
            None => return Ok(Flow::Continue),
        },
    };

    let candidates = suggestions(ctx.tree(), &parse);
    debug!(count = candidates.len(), "suggestions");
    for candidate in candidates {
        ctx.console.outln(&candidate);
    }
    Ok(Flow::Exit(exit_code::SUCCESS))
}

/// Parses again using only the first `n` arguments from the shell.
fn reparse_prefix(ctx: &RunContext<'_>, n: usize) -> anyhow::Result<Result<ParseResult, ParseError>> {
    let args: Vec<String> = ctx
        .shell_tokens
        .iter_all()
        .filter(|t| !t.is_directive())
        .take(n)
        .map(|t| t.raw)
        .collect();
    let tokens = ctx.app.transformations().run(tokenize(&args, false))?;
    Ok(Parser::new(ctx.tree(), ctx.app.settings()).parse(&tokens))
}

pub(crate) fn suggestions(tree: &CommandTree, parse: &Result<ParseResult, ParseError>) -> Vec<String> {
    match parse {
        Ok(result) => {
            let mut all = command_candidates(tree, result.target);
            all.extend(next_operand_values(tree, result));
            all
        }
        Err(ParseError::MissingOptionValue { command, option }) => tree
            .all_options(*command, true)
            .into_iter()
            .map(|o| tree.argument(o))
            .find(|o| &o.name == option)
            .and_then(|o| o.allowed_values())
            .map(<[String]>::to_vec)
            .unwrap_or_default(),
        Err(err) => match err.unrecognized_text() {
            Some(text) => {
                let lowered = text.to_lowercase();
                command_candidates(tree, err.command())
                    .into_iter()
                    .filter(|c| c.to_lowercase().starts_with(&lowered))
                    .collect()
            }
            None => Vec::new(),
        },
    }
}

fn command_candidates(tree: &CommandTree, id: CommandId) -> Vec<String> {
    let command = tree.command(id);
    let mut commands: Vec<String> = command
        .subcommands
        .iter()
        .map(|c| tree.command(*c))
        .flat_map(|c| std::iter::once(c.name.clone()).chain(c.aliases.iter().cloned()))
        .collect();
    commands.sort();

    let mut options: Vec<String> = tree
        .all_options(id, true)
        .into_iter()
        .map(|o| tree.argument(o))
        .filter(|o| !o.is_hidden())
        .filter_map(|o| o.option_names().map(|n| n.prefixed_aliases()))
        .flatten()
        .collect();
    options.sort();

    commands.extend(options);
    commands
}

fn next_operand_values(tree: &CommandTree, result: &ParseResult) -> Vec<String> {
    let operands = &tree.command(result.target).operands;
    let next = operands
        .iter()
        .map(|o| tree.argument(*o))
        .find(|o| !result.values.has_user_input(o.id) || o.arity.allows_many());
    next.and_then(|o| o.allowed_values())
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}
