//! Argument reports shared by `[parse]` and `[cmdlog]`.

use std::fmt::Write as _;

use argot::{Argument, BoundArguments, CommandId, InputValue, ParseResult, ValueSource};

use crate::context::RunContext;

/// `calc add` for the `add` subcommand of `calc`.
pub(crate) fn command_label(ctx: &RunContext<'_>, id: CommandId) -> String {
    let tree = ctx.tree();
    tree.path(id)
        .into_iter()
        .map(|c| tree.command(c).name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lists every argument in scope of the parse target with its inputs and
/// default. Bound values are included when `bound` is given.
pub(crate) fn arguments_report(
    ctx: &RunContext<'_>,
    result: &ParseResult,
    bound: Option<&BoundArguments>,
) -> String {
    let tree = ctx.tree();
    let mut operands = Vec::new();
    let mut options = Vec::new();
    for id in tree.arguments_in_scope(result.target) {
        let argument = tree.argument(id);
        if argument.builtin().is_some() {
            continue;
        }
        let block = argument_block(ctx, argument, result, bound);
        if argument.is_operand() {
            operands.push(block);
        } else {
            options.push(block);
        }
    }

    let mut out = format!("command: {}\n", command_label(ctx, result.target));
    for (title, blocks) in [("arguments", operands), ("options", options)] {
        if blocks.is_empty() {
            continue;
        }
        let _ = write!(out, "\n{title}:\n");
        for block in blocks {
            out.push('\n');
            out.push_str(&block);
        }
    }
    if !result.unparsed.is_empty() {
        let _ = write!(out, "\nunparsed: {}\n", result.unparsed_raw().join(", "));
    }
    out
}

fn argument_block(
    ctx: &RunContext<'_>,
    argument: &Argument,
    result: &ParseResult,
    bound: Option<&BoundArguments>,
) -> String {
    let type_name = ctx.app.registry().display_name(&argument.type_info);
    let mut out = format!("  {} <{}>\n", argument.name, type_name);
    if let Some(value) = bound.and_then(|b| b.by_id(argument.id)) {
        let _ = writeln!(out, "    value: {}", value.value);
    }
    let _ = writeln!(out, "    inputs: {}", inputs_line(result.values.inputs(argument.id)));
    let default = match ctx.app.default_for(argument) {
        Some(d) if d.key.is_some() || d.source != "declared" => format!(
            "source={} key={}: {}",
            d.source,
            d.key.as_deref().unwrap_or_default(),
            d.display_values().join(", ")
        ),
        Some(d) => d.display_values().join(", "),
        None => "(none)".to_string(),
    };
    let _ = writeln!(out, "    default: {default}");
    out
}

fn inputs_line(inputs: &[InputValue]) -> String {
    if inputs.is_empty() {
        return "(none)".to_string();
    }
    inputs
        .iter()
        .map(|input| {
            let values = input.values.join(", ");
            match input.source {
                ValueSource::Argument => values,
                ValueSource::Piped => format!("[piped stream] {values}"),
                ValueSource::Prompt => format!("[prompt] {values}"),
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
