//! Injects redirected stdin into the parse result.
//!
//! The target is the target command's arity-many operand. With
//! `piped_input.to_options` set, an arity-many option given the target
//! indicator (`%piped%` by default) takes precedence; the indicator itself
//! is removed from the option's values. Lines are only read once a target
//! is known.

use argot::{ArgumentId, ConfigError, InputValue, ParseResult, ValueSource};
use argot_input::PipedInput;
use tracing::debug;

use crate::context::RunContext;
use crate::pipeline::{Flow, Middleware, Stage};

pub(crate) fn middleware() -> Middleware {
    Middleware::new("piped-input", Stage::PostParseInputPreBindValues, 0, stage)
}

fn stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    let settings = &ctx.app.settings().piped_input;
    if !settings.enabled {
        return Ok(Flow::Continue);
    }
    let redirected = ctx.console.is_input_redirected();
    let stdin = ctx.console.stdin();
    let tree = ctx.tree();
    let Some(result) = ctx.parse_result_mut() else {
        return Ok(Flow::Continue);
    };

    let mut target = None;
    if settings.to_options {
        let marked = marked_options(many_options(tree, result), result, &settings.target_indicator);
        if marked.len() > 1 {
            return Err(ConfigError::AmbiguousPipeTarget {
                command: tree.command(result.target).name.clone(),
                count: marked.len(),
            }
            .into());
        }
        if let Some(id) = marked.first().copied() {
            result.values.remove_value(id, &settings.target_indicator);
            target = Some(id);
        }
    }
    if target.is_none() {
        target = tree
            .command(result.target)
            .operands
            .iter()
            .copied()
            .find(|o| tree.argument(*o).arity.allows_many());
    }

    let Some(target) = target else {
        return Ok(Flow::Continue);
    };
    if !redirected {
        return Ok(Flow::Continue);
    }
    if let Some(lines) = PipedInput::with_reader(stdin).take_lines()? {
        debug!(
            argument = %tree.argument(target).name,
            lines = lines.len(),
            "piped input assigned"
        );
        result
            .values
            .push_batch(target, InputValue::new(ValueSource::Piped, lines));
    }
    Ok(Flow::Continue)
}

fn many_options(tree: &argot::CommandTree, result: &ParseResult) -> Vec<ArgumentId> {
    tree.all_options(result.target, true)
        .into_iter()
        .filter(|o| tree.argument(*o).arity.allows_many())
        .collect()
}

fn marked_options(candidates: Vec<ArgumentId>, result: &ParseResult, indicator: &str) -> Vec<ArgumentId> {
    candidates
        .into_iter()
        .filter(|o| result.values.user_values(*o).iter().any(|v| v == indicator))
        .collect()
}
