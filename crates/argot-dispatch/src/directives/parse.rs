//! The `[parse]` directive family.
//!
//! - `[parse]` reports the parse target and each argument's inputs and
//!   default, without invoking the command.
//! - `[parse:tokens]` also lists the tokens from the shell and after the
//!   transformations that changed them.
//! - `[parse:help]` lists these options.

use std::fmt::Write as _;

use argot::Tokens;

use crate::context::RunContext;
use crate::exit_code;
use crate::pipeline::Flow;

use super::report::{arguments_report, command_label};

pub(crate) const NAME: &str = "parse";

const HINT: &str = "use [parse:help] to see additional parse options";

const OPTIONS_HELP: &str = "\
Parse directive options:
  [parse]         show the target command and the inputs and default of each argument
  [parse:tokens]  also show the tokens from the shell and after each transformation
  [parse:help]    show this help
";

/// Options given after the directive name: `tokens` for `[parse:tokens]`.
fn options(contents: &str) -> Vec<&str> {
    contents
        .split(':')
        .skip(1)
        .flat_map(|o| o.split(','))
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .collect()
}

/// Serves `[parse:help]` before any transformation runs.
pub(crate) fn help_stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    let wants_help = ctx
        .directive(NAME)
        .is_some_and(|c| options(c).contains(&"help"));
    if !wants_help {
        return Ok(Flow::Continue);
    }
    ctx.console.out(OPTIONS_HELP);
    Ok(Flow::Exit(exit_code::SUCCESS))
}

/// Serves `[parse]` and `[parse:tokens]` once parsing has run.
pub(crate) fn report_stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    let Some(contents) = ctx.directive(NAME) else {
        return Ok(Flow::Continue);
    };
    let show_tokens = options(contents).contains(&"tokens");

    let mut out = String::new();
    if show_tokens {
        out.push_str(&tokens_report(ctx));
        out.push('\n');
    }
    match &ctx.parse {
        Some(Ok(result)) => out.push_str(&arguments_report(ctx, result, None)),
        Some(Err(err)) => {
            let _ = writeln!(out, "command: {}", command_label(ctx, err.command()));
            let _ = writeln!(out, "\nparse error: {err}");
        }
        None => {}
    }
    out.push('\n');
    out.push_str(HINT);
    out.push('\n');
    ctx.console.out(&out);
    Ok(Flow::Exit(exit_code::SUCCESS))
}

fn token_lines(out: &mut String, tokens: &Tokens) {
    for token in tokens.iter_all() {
        let _ = writeln!(out, "  {:<9}: {}", token.token_type, token.raw);
    }
}

fn tokens_report(ctx: &RunContext<'_>) -> String {
    let mut out = String::from(">>> from shell\n");
    token_lines(&mut out, &ctx.shell_tokens);

    let changed: Vec<&str> = ctx
        .transformations
        .iter()
        .filter(|s| s.changed)
        .map(|s| s.name.as_str())
        .collect();
    if changed.is_empty() {
        let all: Vec<&str> = ctx.transformations.iter().map(|s| s.name.as_str()).collect();
        let _ = writeln!(out, ">>> no changes after: {}", all.join(" > "));
    } else {
        let _ = writeln!(out, ">>> transformed after: {}", changed.join(" > "));
        token_lines(&mut out, &ctx.tokens);
    }
    out
}
