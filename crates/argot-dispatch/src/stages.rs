//! Core pipeline steps: tokenize, transform, parse, report, and bind.

use argot::{tokenize, Binder, Parser};
use tracing::debug;

use crate::context::{RunContext, TransformStep};
use crate::exit_code;
use crate::help::help_text;
use crate::pipeline::{Flow, Middleware, Stage};

pub(crate) fn middleware() -> Vec<Middleware> {
    vec![
        Middleware::new("tokenize", Stage::Tokenize, i32::MIN, tokenize_stage),
        Middleware::new("transform", Stage::Tokenize, 0, transform_stage),
        Middleware::new("parse", Stage::ParseInput, 0, parse_stage),
        Middleware::new(
            "report-parse",
            Stage::PostParseInputPreBindValues,
            -100,
            report_stage,
        ),
        Middleware::new("bind", Stage::BindValues, 0, bind_stage),
    ]
}

fn tokenize_stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    let directives = ctx.app.settings().directives_enabled();
    ctx.shell_tokens = tokenize(&ctx.original_args, directives);
    debug!(tokens = ctx.shell_tokens.len(), "tokenized arguments");
    Ok(Flow::Continue)
}

fn transform_stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    let mut steps = Vec::new();
    let tokens = ctx.app.transformations().run_observed(
        ctx.shell_tokens.clone(),
        &mut |name, before, after| {
            steps.push(TransformStep {
                name: name.to_string(),
                tokens: after.clone(),
                changed: before != after,
            });
        },
    )?;
    ctx.transformations = steps;
    ctx.tokens = tokens;
    Ok(Flow::Continue)
}

fn parse_stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    let parsed = Parser::new(ctx.tree(), ctx.app.settings()).parse(&ctx.tokens);
    if let Err(err) = &parsed {
        debug!(error = %err, "parse failed");
    }
    ctx.parse = Some(parsed);
    Ok(Flow::Continue)
}

/// Prints help, the version, or the parse error with the failing
/// command's help.
fn report_stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    let tree = ctx.tree();
    let styled = ctx.console.colors_enabled();
    match &ctx.parse {
        Some(Err(err)) => {
            let message = err.to_string();
            let help = help_text(tree, ctx.app.registry(), err.command(), styled);
            ctx.console.errln(&message);
            ctx.console.out("\n");
            ctx.console.out(&help);
            Ok(Flow::Exit(exit_code::ERROR))
        }
        Some(Ok(result)) if result.help_requested => {
            let help = help_text(tree, ctx.app.registry(), result.target, styled);
            ctx.console.out(&help);
            Ok(Flow::Exit(exit_code::SUCCESS))
        }
        Some(Ok(result)) if result.version_requested => {
            let root = tree.root();
            let line = format!("{} {}", root.name, root.version.as_deref().unwrap_or_default());
            ctx.console.outln(line.trim_end());
            Ok(Flow::Exit(exit_code::SUCCESS))
        }
        _ => Ok(Flow::Continue),
    }
}

fn bind_stage(ctx: &mut RunContext<'_>) -> anyhow::Result<Flow> {
    let Some(result) = ctx.parse_result() else {
        anyhow::bail!("binding requires a successful parse");
    };
    let binder = Binder::new(ctx.tree(), ctx.app.registry(), ctx.app.default_sources());
    match binder.bind(result) {
        Ok(bound) => {
            ctx.bound = Some(bound);
            Ok(Flow::Continue)
        }
        Err(err) => {
            ctx.console.errln(&err.to_string());
            Ok(Flow::Exit(exit_code::BINDING_FAILURE))
        }
    }
}
